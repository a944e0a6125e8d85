use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One email record as the remote store returns it.
///
/// List endpoints return full records, so the same type serves as both the
/// list summary and the detail content; a summary doubles as degraded detail
/// when the dedicated detail fetch fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: String,
    /// Recipient addresses
    #[serde(default)]
    pub to: Vec<String>,
    /// Sender address
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub subject: String,
    /// Rich-text markup
    #[serde(default)]
    pub body: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// The investor/contact this email concerns
    #[serde(rename = "investorId", default)]
    pub investor_id: Option<String>,
}

/// The partial update sent to the store: subject/body/from are overwritten
/// wholesale from the client snapshot (last-write-wins, no conflict detection).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailPatch {
    pub subject: String,
    pub body: String,
    pub from: String,
}
