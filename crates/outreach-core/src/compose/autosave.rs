use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};

use crate::api::SharedApi;
use crate::error::ApiError;
use crate::events::EngineEvent;
use crate::models::{EditField, EmailRecord, EmailView, PendingEdit};
use crate::store::{DetailCache, ListCache};

/// Buffers field edits on the open record, debounces persistence, and exposes
/// a flush for navigation.
///
/// Every `field_changed` restarts the debounce by bumping a timer generation;
/// a timer that wakes with a stale generation does nothing. `flush` bumps the
/// generation too, so a snapshot is persisted at most once. Only this
/// scheduler writes the snapshot or the save-in-flight flag; everything else
/// reads them.
#[derive(Clone)]
pub struct AutosaveScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    api: SharedApi,
    lists: Arc<ListCache>,
    detail: Arc<DetailCache>,
    events: mpsc::UnboundedSender<EngineEvent>,
    saving: watch::Sender<bool>,
    field_debounce: Duration,
    body_debounce: Duration,
    state: Mutex<AutosaveState>,
}

#[derive(Default)]
struct AutosaveState {
    /// Snapshot for the open record; `None` when the open record is read-only
    pending: Option<PendingEdit>,
    /// Whether the snapshot has edits the server has not seen
    dirty: bool,
    /// Bumped to cancel outstanding debounce timers
    timer_generation: u64,
}

impl AutosaveScheduler {
    pub fn new(
        api: SharedApi,
        lists: Arc<ListCache>,
        detail: Arc<DetailCache>,
        events: mpsc::UnboundedSender<EngineEvent>,
        field_debounce: Duration,
        body_debounce: Duration,
    ) -> Self {
        let (saving, _) = watch::channel(false);
        Self {
            inner: Arc::new(SchedulerInner {
                api,
                lists,
                detail,
                events,
                saving,
                field_debounce,
                body_debounce,
                state: Mutex::new(AutosaveState::default()),
            }),
        }
    }

    /// Make `record` the open record. Read-only views never get a snapshot,
    /// so no edit can ever be buffered for a sent/answered record.
    pub fn open_record(&self, record: &EmailRecord, view: EmailView) {
        let mut state = self.inner.state.lock();
        state.timer_generation += 1;
        state.dirty = false;
        state.pending = if view.is_editable() {
            Some(PendingEdit::from_record(record))
        } else {
            None
        };
    }

    /// Drop the snapshot entirely (no record open). Cancels any pending timer.
    pub fn close_record(&self) {
        let mut state = self.inner.state.lock();
        state.timer_generation += 1;
        state.dirty = false;
        state.pending = None;
    }

    /// Fold an edit into the snapshot and (re)start the debounce timer.
    pub fn field_changed(&self, field: EditField, value: String) {
        let (generation, delay) = {
            let mut state = self.inner.state.lock();
            match state.pending.as_mut() {
                Some(pending) => pending.set(field, value),
                None => {
                    tracing::debug!("edit ignored, no editable record open");
                    return;
                }
            }
            state.dirty = true;
            state.timer_generation += 1;
            let delay = match field {
                EditField::Body => self.inner.body_debounce,
                _ => self.inner.field_debounce,
            };
            (state.timer_generation, delay)
        };

        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.fire_timer(generation).await;
        });
    }

    async fn fire_timer(&self, generation: u64) {
        // An earlier save may still be on the wire; let it settle first
        self.wait_idle().await;
        let snapshot = {
            let mut state = self.inner.state.lock();
            if state.timer_generation != generation || !state.dirty {
                return;
            }
            state.dirty = false;
            match &state.pending {
                Some(pending) => pending.clone(),
                None => return,
            }
        };
        let _ = self.perform_save(snapshot).await;
    }

    /// Cancel any pending timer and persist the latest snapshot immediately.
    /// Resolves when the network round trip completes; a clean snapshot is a
    /// no-op success.
    pub async fn flush(&self) -> Result<(), ApiError> {
        {
            let mut state = self.inner.state.lock();
            state.timer_generation += 1;
        }
        self.wait_idle().await;
        let snapshot = {
            let mut state = self.inner.state.lock();
            if !state.dirty {
                return Ok(());
            }
            state.dirty = false;
            match &state.pending {
                Some(pending) => pending.clone(),
                None => return Ok(()),
            }
        };
        self.perform_save(snapshot).await
    }

    /// True while a persistence call is on the wire.
    pub fn is_saving(&self) -> bool {
        *self.inner.saving.borrow()
    }

    async fn wait_idle(&self) {
        let mut rx = self.inner.saving.subscribe();
        let _ = rx.wait_for(|saving| !saving).await;
    }

    async fn perform_save(&self, snapshot: PendingEdit) -> Result<(), ApiError> {
        let email_id = snapshot.email_id.clone();
        let patch = snapshot.to_patch();
        let _ = self.inner.saving.send(true);
        let _ = self.inner.events.send(EngineEvent::SaveStarted {
            email_id: email_id.clone(),
        });

        let result = self.inner.api.update_email(&email_id, &patch).await;

        let outcome = match result {
            Ok(record) => {
                tracing::debug!(email_id = %email_id, "autosave persisted");
                // The server response is authoritative: reconcile both caches
                self.inner.lists.apply_update(EmailView::Draft, &record);
                self.inner.detail.apply_saved(&record);
                let _ = self.inner.events.send(EngineEvent::EmailUpdated(record));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(email_id = %email_id, error = %err, "autosave failed, edit kept for retry");
                let mut state = self.inner.state.lock();
                // Re-arm only if the user has not moved to another record
                if state.pending.as_ref().map(|p| p.email_id.as_str()) == Some(email_id.as_str()) {
                    state.dirty = true;
                }
                Err(err)
            }
        };

        let _ = self.inner.saving.send(false);
        let _ = self.inner.events.send(EngineEvent::SaveFinished {
            email_id,
            ok: outcome.is_ok(),
        });
        outcome
    }
}
