use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::api::SharedApi;
use crate::compose::{AutosaveScheduler, SelectionAction, SelectionController};
use crate::config::EngineConfig;
use crate::error::ApiError;
use crate::events::EngineEvent;
use crate::models::{EditField, EmailRecord, EmailView};
use crate::store::{refresh_counts, DetailCache, DetailContent, ListCache, ListLoad, ViewCounts};

/// Where a view switch currently is. A switch away from the draft view goes
/// through `Flushing` first so buffered edits reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPhase {
    Idle,
    Flushing,
    Switching,
}

/// The engine facade: owns the caches, the autosave scheduler, and the
/// selection, and coordinates them so the detail pane never shows stale
/// content and no edit is silently lost.
///
/// All waits on in-flight saves are bounded by `flush_timeout`. A timeout
/// only releases the navigation; the save keeps running in the background.
pub struct EngineRuntime {
    api: SharedApi,
    config: EngineConfig,
    owner_id: String,
    lists: Arc<ListCache>,
    detail: Arc<DetailCache>,
    scheduler: AutosaveScheduler,
    selection: SelectionController,
    events_tx: mpsc::UnboundedSender<EngineEvent>,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<EngineEvent>>>,
    active_view: Mutex<EmailView>,
    phase: Mutex<SwitchPhase>,
    refresh_generation: AtomicU64,
    counts: Mutex<ViewCounts>,
}

impl EngineRuntime {
    pub fn new(api: SharedApi, owner_id: impl Into<String>, config: EngineConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let lists = Arc::new(ListCache::new(api.clone()));
        let detail = Arc::new(DetailCache::new(api.clone()));
        let scheduler = AutosaveScheduler::new(
            api.clone(),
            lists.clone(),
            detail.clone(),
            events_tx.clone(),
            config.field_debounce,
            config.body_debounce,
        );
        Self {
            api,
            config,
            owner_id: owner_id.into(),
            lists,
            detail,
            scheduler,
            selection: SelectionController::new(),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            active_view: Mutex::new(EmailView::Draft),
            phase: Mutex::new(SwitchPhase::Idle),
            refresh_generation: AtomicU64::new(0),
            counts: Mutex::new(ViewCounts::default()),
        }
    }

    /// Take the event stream. Can only be taken once.
    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<EngineEvent>> {
        self.events_rx.lock().take()
    }

    pub fn active_view(&self) -> EmailView {
        *self.active_view.lock()
    }

    pub fn phase(&self) -> SwitchPhase {
        *self.phase.lock()
    }

    pub fn counts(&self) -> ViewCounts {
        self.counts.lock().clone()
    }

    pub fn list(&self, view: EmailView) -> Vec<EmailRecord> {
        self.lists.get(view)
    }

    pub fn detail_content(&self) -> DetailContent {
        self.detail.current()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selection.selected_id()
    }

    pub fn is_saving(&self) -> bool {
        self.scheduler.is_saving()
    }

    /// Load the initial draft view: list, default selection, counts.
    pub async fn start(&self) -> Result<(), ApiError> {
        self.load_list(false).await?;
        self.refresh_counts().await;
        Ok(())
    }

    /// Switch the active view. Leaving the draft view flushes buffered edits
    /// first, bounded by the flush timeout; afterwards the counts and the
    /// target view's list are refreshed.
    pub async fn switch_view(&self, target: EmailView) {
        let current = self.active_view();
        if current == target {
            return;
        }

        if current == EmailView::Draft {
            *self.phase.lock() = SwitchPhase::Flushing;
            self.bounded_flush().await;
        }

        *self.phase.lock() = SwitchPhase::Switching;
        *self.active_view.lock() = target;
        self.selection.clear_selected();
        self.scheduler.close_record();

        if let Err(err) = self.load_list(false).await {
            tracing::warn!(view = %target, error = %err, "list refresh after switch failed");
        }
        self.refresh_counts().await;
        *self.phase.lock() = SwitchPhase::Idle;
    }

    /// User clicked a record in the list.
    pub async fn select_email(&self, email_id: &str) {
        if self.selection.selected_id().as_deref() == Some(email_id) {
            return;
        }
        self.selection.set_selected(email_id, false);
        self.open_email(email_id, false).await;
    }

    /// External trigger: a newly created (possibly AI-generated) record should
    /// become the selection in the current view.
    pub async fn inject_selection(&self, email_id: &str, ai_generated: bool) {
        self.selection.inject(email_id, ai_generated);
        self.reconcile_selection().await;
    }

    /// An edit in the open record's form. Fire-and-forget; persistence is
    /// debounced by the scheduler.
    pub fn field_changed(&self, field: EditField, value: String) {
        self.scheduler.field_changed(field, value);
    }

    /// Persist any buffered edit now.
    pub async fn flush(&self) -> Result<(), ApiError> {
        self.scheduler.flush().await
    }

    /// A record left the draft view: notify collaborators and reload both
    /// lists and the counts.
    pub async fn email_sent(&self, investor_id: Option<String>) {
        let _ = self.events_tx.send(EngineEvent::EmailSent { investor_id });
        let generation = self.bump_refresh_generation();
        if let Err(err) = self
            .lists
            .load(EmailView::Draft, &self.owner_id, generation)
            .await
        {
            tracing::warn!(error = %err, "draft list reload after send failed");
        }
        if let Err(err) = self
            .lists
            .load(EmailView::Sent, &self.owner_id, generation)
            .await
        {
            tracing::warn!(error = %err, "sent list reload after send failed");
        }
        self.refresh_counts().await;

        // The sent record is gone from the draft list; move the selection off it
        if let Some(selected) = self.selection.selected_id() {
            let view = self.active_view();
            if self.lists.record_for(view, &selected).is_none() {
                self.selection.clear_selected();
            }
        }
        self.reconcile_selection().await;
    }

    /// Reload the active view's list. `force` bumps the refresh generation so
    /// the fetch is not deduplicated against an in-flight one.
    pub async fn load_list(&self, force: bool) -> Result<(), ApiError> {
        let generation = if force {
            self.bump_refresh_generation()
        } else {
            self.refresh_generation.load(Ordering::SeqCst)
        };
        let view = self.active_view();
        match self.lists.load(view, &self.owner_id, generation).await {
            Ok(ListLoad::Fresh(_)) => {
                self.reconcile_selection().await;
                Ok(())
            }
            Ok(ListLoad::Suppressed) => Ok(()),
            Err(err) => {
                let _ = self.events_tx.send(EngineEvent::ListError {
                    view,
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    pub async fn refresh_counts(&self) -> ViewCounts {
        let counts = refresh_counts(self.api.as_ref(), &self.owner_id).await;
        *self.counts.lock() = counts.clone();
        counts
    }

    fn bump_refresh_generation(&self) -> u64 {
        self.refresh_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn reconcile_selection(&self) {
        let view = self.active_view();
        let list = self.lists.get(view);
        match self.selection.reconcile(&list) {
            SelectionAction::Adopt {
                email_id,
                ai_generated,
            } => {
                self.selection.set_selected(&email_id, ai_generated);
                // Clear the injection now that we are committed to the fetch,
                // so a reconciliation racing with it cannot adopt twice
                let cleared = self.selection.take_injected();
                self.open_email(&email_id, ai_generated).await;
                if let Some(email_id) = cleared {
                    let _ = self
                        .events_tx
                        .send(EngineEvent::SelectionProcessed { email_id });
                }
            }
            SelectionAction::SelectFirst { email_id } => {
                self.selection.set_selected(&email_id, false);
                self.open_email(&email_id, false).await;
            }
            SelectionAction::Keep => {}
        }
    }

    /// Fetch and display one record's detail. In the draft view the previous
    /// record's buffered edit is flushed first (bounded), so the fetch cannot
    /// read back a version the server has not seen yet.
    async fn open_email(&self, email_id: &str, ai_originated: bool) {
        let view = self.active_view();
        if view == EmailView::Draft {
            self.bounded_flush().await;
        }

        let record = self
            .detail
            .load(email_id, ai_originated, &self.lists, view)
            .await;

        if let Some(record) = record {
            // Only seed the editor if this record is still the selection
            if self.selection.selected_id().as_deref() == Some(record.id.as_str()) {
                self.scheduler.open_record(&record, view);
            }
        }
    }

    /// Flush with the configured bound. The flush runs as its own task, so a
    /// timeout stops the waiting, never the save.
    async fn bounded_flush(&self) {
        let scheduler = self.scheduler.clone();
        let handle = tokio::spawn(async move { scheduler.flush().await });
        match tokio::time::timeout(self.config.flush_timeout, handle).await {
            Err(_) => {
                tracing::warn!("flush did not settle within the bound, navigation proceeds");
            }
            Ok(Err(join_err)) => {
                tracing::warn!(error = %join_err, "flush task failed");
            }
            Ok(Ok(Err(err))) => {
                tracing::warn!(error = %err, "flush failed, navigation proceeds");
            }
            Ok(Ok(Ok(()))) => {}
        }
    }
}
