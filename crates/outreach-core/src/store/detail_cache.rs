use parking_lot::Mutex;

use crate::api::SharedApi;
use crate::models::{EmailRecord, EmailView};
use crate::store::ListCache;

/// What the detail pane should show.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailContent {
    None,
    Loading { email_id: String },
    Ready { record: EmailRecord, degraded: bool },
    Unavailable { email_id: String },
}

impl DetailContent {
    fn email_id(&self) -> Option<&str> {
        match self {
            DetailContent::None => None,
            DetailContent::Loading { email_id } => Some(email_id),
            DetailContent::Ready { record, .. } => Some(&record.id),
            DetailContent::Unavailable { email_id } => Some(email_id),
        }
    }
}

/// Cache of the full content of the record open in the detail pane.
///
/// At most one in-flight fetch per id; a second standard fetch for the same id
/// is a no-op. AI-originated selections bypass the dedup because the record
/// was just mutated server-side and any cached copy is known stale. A
/// generation counter decides at completion time whether a result still
/// corresponds to the current request, so superseded fetches are fetched but
/// discarded (there is no network-level cancellation).
pub struct DetailCache {
    api: SharedApi,
    state: Mutex<DetailState>,
}

struct DetailState {
    content: DetailContent,
    generation: u64,
    in_flight: Option<String>,
}

impl DetailCache {
    pub fn new(api: SharedApi) -> Self {
        Self {
            api,
            state: Mutex::new(DetailState {
                content: DetailContent::None,
                generation: 0,
                in_flight: None,
            }),
        }
    }

    /// Fetch the full record and make it the displayed detail.
    ///
    /// Returns the record that was applied, or `None` when the fetch was
    /// deduplicated, superseded, or fell through to `Unavailable`. The
    /// displayed content is cleared to `Loading` before the fetch starts so
    /// the previous record is never shown under the new record's chrome.
    pub async fn load(
        &self,
        email_id: &str,
        bypass_dedup: bool,
        lists: &ListCache,
        view: EmailView,
    ) -> Option<EmailRecord> {
        let my_generation = {
            let mut state = self.state.lock();
            if !bypass_dedup && state.in_flight.as_deref() == Some(email_id) {
                tracing::debug!(email_id, "detail fetch already in flight, skipping");
                return None;
            }
            state.generation += 1;
            state.in_flight = Some(email_id.to_string());
            state.content = DetailContent::Loading {
                email_id: email_id.to_string(),
            };
            state.generation
        };

        let result = self.api.fetch_email(email_id).await;

        let mut state = self.state.lock();
        if state.generation != my_generation {
            tracing::debug!(email_id, "discarding superseded detail fetch");
            return None;
        }
        state.in_flight = None;
        match result {
            Ok(record) => {
                state.content = DetailContent::Ready {
                    record: record.clone(),
                    degraded: false,
                };
                Some(record)
            }
            Err(err) => {
                tracing::warn!(email_id, error = %err, "detail fetch failed");
                match lists.record_for(view, email_id) {
                    Some(summary) => {
                        // Degraded but non-empty: show what the list knows
                        state.content = DetailContent::Ready {
                            record: summary.clone(),
                            degraded: true,
                        };
                        Some(summary)
                    }
                    None => {
                        state.content = DetailContent::Unavailable {
                            email_id: email_id.to_string(),
                        };
                        None
                    }
                }
            }
        }
    }

    /// Replace the displayed detail with the canonical record after a save.
    pub fn apply_saved(&self, record: &EmailRecord) {
        let mut state = self.state.lock();
        if state.content.email_id() == Some(record.id.as_str()) {
            state.content = DetailContent::Ready {
                record: record.clone(),
                degraded: false,
            };
        }
    }

    pub fn current(&self) -> DetailContent {
        self.state.lock().content.clone()
    }
}
