use std::time::Duration;

/// Tunables for the draft engine.
///
/// The debounce windows mirror the form behavior they buffer: plain form
/// fields settle quickly, while a rich-text body widget emits bursty
/// keystroke-level change events and gets a longer quiet period.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the CRM email API
    pub base_url: String,
    /// Debounce window for subject/from edits
    pub field_debounce: Duration,
    /// Debounce window for rich-text body edits
    pub body_debounce: Duration,
    /// How long navigation waits for a flush before proceeding anyway
    pub flush_timeout: Duration,
}

impl EngineConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            field_debounce: Duration::from_millis(1500),
            body_debounce: Duration::from_millis(3000),
            flush_timeout: Duration::from_millis(3000),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new("http://localhost:3001")
    }
}
