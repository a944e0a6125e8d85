use serde::Serialize;

use crate::api::EmailApi;
use crate::models::EmailView;

/// Per-view badge counts. `opened` and `answered` stay zero pending backend
/// support for those views.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewCounts {
    pub draft: usize,
    pub sent: usize,
    pub opened: usize,
    pub answered: usize,
}

/// Read the draft and sent list sizes concurrently. A failed sub-fetch
/// degrades that count to zero instead of failing the aggregation.
pub async fn refresh_counts(api: &dyn EmailApi, owner_id: &str) -> ViewCounts {
    let (draft, sent) = tokio::join!(
        api.list_emails(EmailView::Draft, owner_id),
        api.list_emails(EmailView::Sent, owner_id),
    );

    ViewCounts {
        draft: draft.map(|l| l.len()).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "draft count fetch failed, showing zero");
            0
        }),
        sent: sent.map(|l| l.len()).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "sent count fetch failed, showing zero");
            0
        }),
        opened: 0,
        answered: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{make_record, MockApi};

    #[tokio::test]
    async fn test_counts_from_both_lists() {
        let api = MockApi::new();
        api.set_list(
            EmailView::Draft,
            vec![make_record("a", "A"), make_record("b", "B")],
        );
        api.set_list(EmailView::Sent, vec![make_record("c", "C")]);

        let counts = refresh_counts(&api, "owner").await;
        assert_eq!(
            counts,
            ViewCounts {
                draft: 2,
                sent: 1,
                opened: 0,
                answered: 0
            }
        );
    }

    #[tokio::test]
    async fn test_failed_subfetch_degrades_to_zero() {
        let api = MockApi::new();
        api.set_list(
            EmailView::Draft,
            vec![make_record("a", "A"), make_record("b", "B")],
        );
        api.set_list(EmailView::Sent, vec![make_record("c", "C")]);
        api.set_fail_view(EmailView::Sent, true);

        let counts = refresh_counts(&api, "owner").await;
        assert_eq!(counts.draft, 2);
        assert_eq!(counts.sent, 0);
    }
}
