use crate::models::{EmailPatch, EmailRecord};

/// Which editable field of the open draft changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Subject,
    Body,
    From,
}

/// In-memory snapshot of the editable fields of the open record.
///
/// Kept outside any rendering cycle so the latest values are available to a
/// deferred save without a state-read round trip. Carries the id it was
/// captured for, so a timer firing after the user moved on still targets the
/// record it was scheduled against.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit {
    pub email_id: String,
    pub subject: String,
    pub body: String,
    pub from: String,
}

impl PendingEdit {
    pub fn from_record(record: &EmailRecord) -> Self {
        Self {
            email_id: record.id.clone(),
            subject: record.subject.clone(),
            body: record.body.clone(),
            from: record.from.clone(),
        }
    }

    pub fn set(&mut self, field: EditField, value: String) {
        match field {
            EditField::Subject => self.subject = value,
            EditField::Body => self.body = value,
            EditField::From => self.from = value,
        }
    }

    pub fn to_patch(&self) -> EmailPatch {
        EmailPatch {
            subject: self.subject.clone(),
            body: self.body.clone(),
            from: self.from.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record() -> EmailRecord {
        EmailRecord {
            id: "rec-1".into(),
            to: vec!["investor@example.com".into()],
            from: "founder@example.com".into(),
            subject: "Intro".into(),
            body: "<p>Hello</p>".into(),
            created_at: Utc::now(),
            investor_id: Some("inv-1".into()),
        }
    }

    #[test]
    fn test_snapshot_seeds_from_record() {
        let edit = PendingEdit::from_record(&record());
        assert_eq!(edit.email_id, "rec-1");
        assert_eq!(edit.subject, "Intro");
        assert_eq!(edit.body, "<p>Hello</p>");
        assert_eq!(edit.from, "founder@example.com");
    }

    #[test]
    fn test_patch_carries_all_three_fields() {
        let mut edit = PendingEdit::from_record(&record());
        edit.set(EditField::Subject, "Follow up".into());
        let patch = edit.to_patch();
        // Unchanged fields still ship; the update is wholesale
        assert_eq!(patch.subject, "Follow up");
        assert_eq!(patch.body, "<p>Hello</p>");
        assert_eq!(patch.from, "founder@example.com");
    }
}
