use crate::models::{EmailRecord, EmailView};

/// Notifications emitted by the engine so a hosting view can react
/// (saving indicator, badge counts, list refresh) without owning the state.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A persistence call succeeded; the payload is the canonical server record
    EmailUpdated(EmailRecord),
    /// A record left the draft view
    EmailSent { investor_id: Option<String> },
    SaveStarted { email_id: String },
    SaveFinished { email_id: String, ok: bool },
    /// An injected selection has been consumed - the trigger must not reprocess it
    SelectionProcessed { email_id: String },
    /// A list fetch failed; the previously loaded list is still being shown
    ListError { view: EmailView, message: String },
}
