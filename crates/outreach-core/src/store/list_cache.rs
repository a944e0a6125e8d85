use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use crate::api::SharedApi;
use crate::error::ApiError;
use crate::models::{EmailRecord, EmailView};

/// Fingerprint of an in-flight list fetch. Issuing the same fingerprint again
/// while the first is outstanding is suppressed; a caller that wants a forced
/// reload bumps the refresh generation instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListFingerprint {
    pub view: EmailView,
    pub owner_id: String,
    pub refresh_generation: u64,
}

#[derive(Debug, PartialEq)]
pub enum ListLoad {
    /// The list was replaced wholesale with the server's ordering
    Fresh(Vec<EmailRecord>),
    /// An identical fetch was already in flight; nothing was issued
    Suppressed,
}

/// Per-view cache of summary records.
///
/// Lists are replaced wholesale on success, never merged field-by-field.
/// On failure the previous list is retained so the UI never clears to empty.
pub struct ListCache {
    api: SharedApi,
    state: Mutex<ListState>,
}

#[derive(Default)]
struct ListState {
    lists: HashMap<EmailView, Vec<EmailRecord>>,
    in_flight: HashSet<ListFingerprint>,
    last_error: Option<String>,
}

impl ListCache {
    pub fn new(api: SharedApi) -> Self {
        Self {
            api,
            state: Mutex::new(ListState::default()),
        }
    }

    pub async fn load(
        &self,
        view: EmailView,
        owner_id: &str,
        refresh_generation: u64,
    ) -> Result<ListLoad, ApiError> {
        let fingerprint = ListFingerprint {
            view,
            owner_id: owner_id.to_string(),
            refresh_generation,
        };
        {
            let mut state = self.state.lock();
            if !state.in_flight.insert(fingerprint.clone()) {
                tracing::debug!(%view, refresh_generation, "list fetch suppressed, identical fetch in flight");
                return Ok(ListLoad::Suppressed);
            }
        }

        let result = self.api.list_emails(view, owner_id).await;

        let mut state = self.state.lock();
        state.in_flight.remove(&fingerprint);
        match result {
            Ok(records) => {
                tracing::debug!(%view, count = records.len(), "list loaded");
                state.last_error = None;
                state.lists.insert(view, records.clone());
                Ok(ListLoad::Fresh(records))
            }
            Err(err) => {
                tracing::warn!(%view, error = %err, "list fetch failed, keeping previous list");
                state.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Last successfully loaded list for a view (empty if never loaded).
    pub fn get(&self, view: EmailView) -> Vec<EmailRecord> {
        self.state
            .lock()
            .lists
            .get(&view)
            .cloned()
            .unwrap_or_default()
    }

    /// Summary for one record, used as degraded detail when the detail fetch fails.
    pub fn record_for(&self, view: EmailView, email_id: &str) -> Option<EmailRecord> {
        self.state
            .lock()
            .lists
            .get(&view)
            .and_then(|list| list.iter().find(|r| r.id == email_id))
            .cloned()
    }

    /// Replace the matching entry with the canonical record after a save.
    pub fn apply_update(&self, view: EmailView, record: &EmailRecord) {
        let mut state = self.state.lock();
        if let Some(list) = state.lists.get_mut(&view) {
            if let Some(entry) = list.iter_mut().find(|r| r.id == record.id) {
                *entry = record.clone();
            }
        }
    }

    pub fn len(&self, view: EmailView) -> usize {
        self.state
            .lock()
            .lists
            .get(&view)
            .map(|l| l.len())
            .unwrap_or(0)
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }
}
