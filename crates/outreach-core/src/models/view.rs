use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mutually exclusive buckets of email records. Only the draft view permits
/// edits; sent and answered records are immutable from the client's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailView {
    Draft,
    Sent,
    Answered,
    Scheduled,
}

impl EmailView {
    pub fn is_editable(self) -> bool {
        matches!(self, EmailView::Draft)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EmailView::Draft => "draft",
            EmailView::Sent => "sent",
            EmailView::Answered => "answered",
            EmailView::Scheduled => "scheduled",
        }
    }
}

impl fmt::Display for EmailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmailView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(EmailView::Draft),
            "sent" => Ok(EmailView::Sent),
            "answered" => Ok(EmailView::Answered),
            "scheduled" => Ok(EmailView::Scheduled),
            other => Err(format!("unknown view: {other}")),
        }
    }
}
