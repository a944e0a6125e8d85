//! Programmable in-memory `EmailApi` for engine tests: per-id latency,
//! failure switches, and call logs so tests can assert dedup and ordering.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;

use crate::api::{ApiFuture, EmailApi};
use crate::error::ApiError;
use crate::models::{EmailPatch, EmailRecord, EmailView};

#[derive(Default)]
struct MockState {
    lists: HashMap<EmailView, Vec<EmailRecord>>,
    records: HashMap<String, EmailRecord>,
    fetch_delays: HashMap<String, Duration>,
    list_delay: Option<Duration>,
    update_delay: Option<Duration>,
    fail_views: HashSet<EmailView>,
    fail_fetch: bool,
    fail_update: bool,
    /// Interleaved operation log: "list:draft", "fetch:rec-1", "update:rec-1"
    op_log: Vec<String>,
}

#[derive(Clone, Default)]
pub(crate) struct MockApi {
    state: Arc<Mutex<MockState>>,
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        body: "internal error".into(),
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a view's list and index its records for detail fetches.
    pub fn set_list(&self, view: EmailView, records: Vec<EmailRecord>) {
        let mut state = self.state.lock();
        for record in &records {
            state.records.insert(record.id.clone(), record.clone());
        }
        state.lists.insert(view, records);
    }

    /// Overwrite one record without touching lists (simulates a server-side
    /// mutation the client's list copy does not know about).
    pub fn set_record(&self, record: EmailRecord) {
        self.state.lock().records.insert(record.id.clone(), record);
    }

    pub fn set_fetch_delay(&self, email_id: &str, delay: Duration) {
        self.state
            .lock()
            .fetch_delays
            .insert(email_id.to_string(), delay);
    }

    pub fn set_list_delay(&self, delay: Duration) {
        self.state.lock().list_delay = Some(delay);
    }

    pub fn set_update_delay(&self, delay: Duration) {
        self.state.lock().update_delay = Some(delay);
    }

    pub fn set_fail_view(&self, view: EmailView, fail: bool) {
        let mut state = self.state.lock();
        if fail {
            state.fail_views.insert(view);
        } else {
            state.fail_views.remove(&view);
        }
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.state.lock().fail_fetch = fail;
    }

    pub fn set_fail_update(&self, fail: bool) {
        self.state.lock().fail_update = fail;
    }

    pub fn op_log(&self) -> Vec<String> {
        self.state.lock().op_log.clone()
    }

    pub fn count_ops(&self, op: &str) -> usize {
        self.state.lock().op_log.iter().filter(|o| *o == op).count()
    }

    pub fn fetch_count(&self, email_id: &str) -> usize {
        self.count_ops(&format!("fetch:{email_id}"))
    }

    pub fn update_count(&self, email_id: &str) -> usize {
        self.count_ops(&format!("update:{email_id}"))
    }
}

impl EmailApi for MockApi {
    fn list_emails(&self, view: EmailView, _owner_id: &str) -> ApiFuture<'_, Vec<EmailRecord>> {
        let state = self.state.clone();
        Box::pin(async move {
            let delay = {
                let mut s = state.lock();
                s.op_log.push(format!("list:{view}"));
                s.list_delay
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let s = state.lock();
            if s.fail_views.contains(&view) {
                return Err(server_error());
            }
            Ok(s.lists.get(&view).cloned().unwrap_or_default())
        })
    }

    fn fetch_email(&self, email_id: &str) -> ApiFuture<'_, EmailRecord> {
        let state = self.state.clone();
        let email_id = email_id.to_string();
        Box::pin(async move {
            let delay = {
                let mut s = state.lock();
                s.op_log.push(format!("fetch:{email_id}"));
                s.fetch_delays.get(&email_id).copied()
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let s = state.lock();
            if s.fail_fetch {
                return Err(server_error());
            }
            s.records.get(&email_id).cloned().ok_or(ApiError::Status {
                status: 404,
                body: "not found".into(),
            })
        })
    }

    fn update_email(&self, email_id: &str, patch: &EmailPatch) -> ApiFuture<'_, EmailRecord> {
        let state = self.state.clone();
        let email_id = email_id.to_string();
        let patch = patch.clone();
        Box::pin(async move {
            let delay = {
                let mut s = state.lock();
                s.op_log.push(format!("update:{email_id}"));
                s.update_delay
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let mut s = state.lock();
            if s.fail_update {
                return Err(server_error());
            }
            let canonical = match s.records.get_mut(&email_id) {
                Some(record) => {
                    record.subject = patch.subject.clone();
                    record.body = patch.body.clone();
                    record.from = patch.from.clone();
                    record.clone()
                }
                None => {
                    return Err(ApiError::Status {
                        status: 404,
                        body: "not found".into(),
                    })
                }
            };
            for list in s.lists.values_mut() {
                if let Some(entry) = list.iter_mut().find(|r| r.id == email_id) {
                    *entry = canonical.clone();
                }
            }
            Ok(canonical)
        })
    }
}

/// Test fixture: a draft record with plausible content.
pub(crate) fn make_record(id: &str, subject: &str) -> EmailRecord {
    EmailRecord {
        id: id.to_string(),
        to: vec!["investor@example.com".into()],
        from: "founder@example.com".into(),
        subject: subject.to_string(),
        body: format!("<p>{subject}</p>"),
        created_at: Utc::now(),
        investor_id: Some("inv-1".into()),
    }
}
