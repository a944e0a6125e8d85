use serde::Deserialize;

use crate::models::EmailRecord;

/// List endpoints wrap their payload in `data`.
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    pub data: Vec<EmailRecord>,
}

/// The record endpoint returns either `{ "message": Record }` or the record
/// directly, depending on the backend path that produced it. Accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecordResponse {
    Wrapped { message: EmailRecord },
    Bare(EmailRecord),
}

impl RecordResponse {
    pub fn into_record(self) -> EmailRecord {
        match self {
            RecordResponse::Wrapped { message } => message,
            RecordResponse::Bare(record) => record,
        }
    }
}
