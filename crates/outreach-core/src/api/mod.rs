use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{EmailPatch, EmailRecord, EmailView};

pub mod client;
#[cfg(test)]
pub(crate) mod mock;
pub mod types;

pub use client::CrmClient;

pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// The seam between the engine and the remote store.
///
/// Implementations must copy borrowed arguments before the returned future
/// suspends, so the future only borrows `self`.
pub trait EmailApi: Send + Sync {
    /// Ordered (most-recent-first) records for one view and owner
    fn list_emails(&self, view: EmailView, owner_id: &str) -> ApiFuture<'_, Vec<EmailRecord>>;

    /// Full content of one record
    fn fetch_email(&self, email_id: &str) -> ApiFuture<'_, EmailRecord>;

    /// Persist subject/body/from and return the canonical record
    fn update_email(&self, email_id: &str, patch: &EmailPatch) -> ApiFuture<'_, EmailRecord>;
}

pub type SharedApi = Arc<dyn EmailApi>;
