use parking_lot::Mutex;

use crate::models::EmailRecord;

#[derive(Debug, Clone)]
struct InjectedSelection {
    email_id: String,
    ai_generated: bool,
}

/// What the engine should do after reconciling the selection against the list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionAction {
    /// Adopt an externally injected id; `ai_generated` selections fetch with
    /// dedup bypassed because the record was just mutated server-side
    Adopt {
        email_id: String,
        ai_generated: bool,
    },
    /// No selection yet and the list is non-empty: take the first
    /// (most-recent-first) entry
    SelectFirst { email_id: String },
    Keep,
}

/// Owns "which record id is open".
///
/// Reconciles the default selection, user clicks, and externally injected ids
/// (AI-generated drafts). An injection is honored exactly once: the engine
/// clears it via `take_injected` when it dispatches the resulting detail
/// fetch, so later list refreshes do not re-trigger it.
pub struct SelectionController {
    state: Mutex<SelectionState>,
}

#[derive(Default)]
struct SelectionState {
    selected_id: Option<String>,
    injected: Option<InjectedSelection>,
    ai_originated: bool,
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SelectionState::default()),
        }
    }

    pub fn inject(&self, email_id: &str, ai_generated: bool) {
        let mut state = self.state.lock();
        state.injected = Some(InjectedSelection {
            email_id: email_id.to_string(),
            ai_generated,
        });
    }

    /// Decide the next selection. Does not mutate: the engine applies the
    /// action with `set_selected` and clears the injection with
    /// `take_injected` once the fetch is dispatched.
    ///
    /// An injection matching the current selection is still adopted - the
    /// whole point of injecting an already-open id is the fresh bypass fetch.
    pub fn reconcile(&self, list: &[EmailRecord]) -> SelectionAction {
        let state = self.state.lock();
        if let Some(injected) = &state.injected {
            return SelectionAction::Adopt {
                email_id: injected.email_id.clone(),
                ai_generated: injected.ai_generated,
            };
        }
        if state.selected_id.is_none() {
            if let Some(first) = list.first() {
                return SelectionAction::SelectFirst {
                    email_id: first.id.clone(),
                };
            }
        }
        SelectionAction::Keep
    }

    pub fn set_selected(&self, email_id: &str, ai_originated: bool) {
        let mut state = self.state.lock();
        state.selected_id = Some(email_id.to_string());
        state.ai_originated = ai_originated;
    }

    pub fn clear_selected(&self) {
        let mut state = self.state.lock();
        state.selected_id = None;
        state.ai_originated = false;
    }

    /// Consume the pending injection, returning its id for the
    /// processed-notification. The AI flag only governs the single fetch the
    /// injection caused, so it is reset here as well.
    pub fn take_injected(&self) -> Option<String> {
        let mut state = self.state.lock();
        state.ai_originated = false;
        state.injected.take().map(|i| i.email_id)
    }

    pub fn selected_id(&self) -> Option<String> {
        self.state.lock().selected_id.clone()
    }

    pub fn is_ai_originated(&self) -> bool {
        self.state.lock().ai_originated
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::make_record;

    #[test]
    fn test_defaults_to_first_item() {
        let selection = SelectionController::new();
        let list = vec![make_record("a", "A"), make_record("b", "B")];
        assert_eq!(
            selection.reconcile(&list),
            SelectionAction::SelectFirst {
                email_id: "a".into()
            }
        );
        // Empty list: nothing to select
        assert_eq!(selection.reconcile(&[]), SelectionAction::Keep);
    }

    #[test]
    fn test_existing_selection_kept() {
        let selection = SelectionController::new();
        selection.set_selected("b", false);
        let list = vec![make_record("a", "A"), make_record("b", "B")];
        assert_eq!(selection.reconcile(&list), SelectionAction::Keep);
    }

    #[test]
    fn test_injection_wins_over_default() {
        let selection = SelectionController::new();
        selection.inject("b", true);
        let list = vec![make_record("a", "A"), make_record("b", "B")];
        assert_eq!(
            selection.reconcile(&list),
            SelectionAction::Adopt {
                email_id: "b".into(),
                ai_generated: true
            }
        );
    }

    #[test]
    fn test_injection_consumed_once() {
        let selection = SelectionController::new();
        selection.inject("b", true);
        let list = vec![make_record("a", "A"), make_record("b", "B")];

        let action = selection.reconcile(&list);
        assert!(matches!(action, SelectionAction::Adopt { .. }));
        selection.set_selected("b", true);
        assert_eq!(selection.take_injected(), Some("b".into()));

        // A second reconciliation pass must not reselect the cleared injection
        assert_eq!(selection.reconcile(&list), SelectionAction::Keep);
        assert!(!selection.is_ai_originated());
    }

    #[test]
    fn test_injection_of_open_id_still_adopted() {
        let selection = SelectionController::new();
        selection.set_selected("a", false);
        selection.inject("a", true);
        let list = vec![make_record("a", "A")];
        assert_eq!(
            selection.reconcile(&list),
            SelectionAction::Adopt {
                email_id: "a".into(),
                ai_generated: true
            }
        );
    }
}
