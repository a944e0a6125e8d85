use crate::api::types::{ListResponse, RecordResponse};
use crate::api::{ApiFuture, EmailApi};
use crate::error::ApiError;
use crate::models::{EmailPatch, EmailRecord, EmailView};

/// HTTP client for the CRM email API.
pub struct CrmClient {
    base_url: String,
    http: reqwest::Client,
}

impl CrmClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

async fn read_body(response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

impl EmailApi for CrmClient {
    fn list_emails(&self, view: EmailView, owner_id: &str) -> ApiFuture<'_, Vec<EmailRecord>> {
        let url = format!(
            "{}/emails?view={}&owner={}",
            self.base_url,
            view.as_str(),
            owner_id
        );
        Box::pin(async move {
            let body = read_body(self.http.get(&url).send().await?).await?;
            let parsed: ListResponse = serde_json::from_str(&body)?;
            Ok(parsed.data)
        })
    }

    fn fetch_email(&self, email_id: &str) -> ApiFuture<'_, EmailRecord> {
        let url = format!("{}/emails/{}", self.base_url, email_id);
        Box::pin(async move {
            let body = read_body(self.http.get(&url).send().await?).await?;
            let parsed: RecordResponse = serde_json::from_str(&body)?;
            Ok(parsed.into_record())
        })
    }

    fn update_email(&self, email_id: &str, patch: &EmailPatch) -> ApiFuture<'_, EmailRecord> {
        let url = format!("{}/emails/{}", self.base_url, email_id);
        let patch = patch.clone();
        Box::pin(async move {
            let body = read_body(self.http.put(&url).json(&patch).send().await?).await?;
            let parsed: RecordResponse = serde_json::from_str(&body)?;
            Ok(parsed.into_record())
        })
    }
}
