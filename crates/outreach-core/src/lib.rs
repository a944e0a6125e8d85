pub mod api;
pub mod compose;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod runtime;
pub mod store;
pub mod tracing_setup;

// Re-export the main entry points at crate root for convenience
pub use api::{CrmClient, EmailApi, SharedApi};
pub use config::EngineConfig;
pub use error::ApiError;
pub use events::EngineEvent;
pub use models::{EditField, EmailPatch, EmailRecord, EmailView, PendingEdit};
pub use runtime::{EngineRuntime, SwitchPhase};
pub use store::{DetailContent, ViewCounts};
