/// Errors that can come back from the CRM email API.
///
/// These never abort an in-progress view switch; callers convert them to
/// local state (retained list, degraded detail, "save failed" indicator).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed server response: {0}")]
    Decode(#[from] serde_json::Error),
}
