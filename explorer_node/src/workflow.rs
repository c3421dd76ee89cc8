//! Creation-workflow state machine
//!
//! Models the attestation submission flow as explicit immutable snapshots:
//! `Idle -> Composing -> Validated -> Submitting -> Confirmed | Failed`.
//! Every UI event produces a new state via the pure [`step`] reducer; there
//! are no automatic retries, a failed submission returns to `Composing`
//! only on an explicit user retry.

use serde::{Deserialize, Serialize};

use crate::types::TxHash;

/// State of one attestation creation flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CreationState {
    /// Nothing started yet
    Idle,
    /// The user is editing fields or uploading a CSV
    Composing,
    /// All required fields (or the whole batch) passed validation
    Validated,
    /// The transaction was handed to the wallet/submission layer
    Submitting,
    /// The transaction was mined
    Confirmed { transaction_hash: TxHash },
    /// Wallet rejection, simulation failure, revert, or network error
    Failed { message: String },
}

impl CreationState {
    /// Whether a submission may be started from this state
    pub fn can_submit(&self) -> bool {
        matches!(self, CreationState::Validated)
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, CreationState::Confirmed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CreationState::Failed { .. })
    }
}

/// Events produced by the user or the submission layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationEvent {
    /// The creation view was opened
    Open,
    /// Any field edit or CSV upload
    Edit,
    /// Validation of the current fields/batch succeeded
    ValidationPassed,
    /// Validation of the current fields/batch failed
    ValidationFailed,
    /// Explicit user submission
    Submit,
    /// The transaction was mined
    Mined(TxHash),
    /// The submission was rejected or reverted, with the verbatim message
    Rejected(String),
    /// Explicit user retry after a failure
    Retry,
}

/// Pure reducer: compute the next state for an event
///
/// Events that are illegal in the current state leave it unchanged.
pub fn step(state: &CreationState, event: CreationEvent) -> CreationState {
    use CreationEvent::*;
    use CreationState::*;

    match (state, event) {
        (Idle, Open) => Composing,
        (Composing, ValidationPassed) => Validated,
        (Validated, ValidationFailed) => Composing,
        (Validated, Edit) => Composing,
        (Validated, Submit) => Submitting,
        (Submitting, Mined(transaction_hash)) => Confirmed { transaction_hash },
        (Submitting, Rejected(message)) => Failed { message },
        (Failed { .. }, Retry) => Composing,
        (current, _) => current.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx() -> TxHash {
        TxHash::parse(&format!("0x{}", "ab".repeat(32))).unwrap()
    }

    #[test]
    fn test_happy_path_to_confirmed() {
        let mut state = CreationState::Idle;
        for event in [
            CreationEvent::Open,
            CreationEvent::ValidationPassed,
            CreationEvent::Submit,
            CreationEvent::Mined(tx()),
        ] {
            state = step(&state, event);
        }
        assert_eq!(
            state,
            CreationState::Confirmed {
                transaction_hash: tx()
            }
        );
    }

    #[test]
    fn test_failure_requires_explicit_retry() {
        let submitting = CreationState::Submitting;
        let failed = step(&submitting, CreationEvent::Rejected("reverted".into()));
        assert!(failed.is_failed());

        // No automatic transition out of Failed
        assert_eq!(step(&failed, CreationEvent::ValidationPassed), failed);
        assert_eq!(step(&failed, CreationEvent::Retry), CreationState::Composing);
    }

    #[test]
    fn test_edit_invalidates_validated_state() {
        let validated = CreationState::Validated;
        assert_eq!(step(&validated, CreationEvent::Edit), CreationState::Composing);
        assert_eq!(
            step(&validated, CreationEvent::ValidationFailed),
            CreationState::Composing
        );
    }

    #[test]
    fn test_illegal_events_leave_state_unchanged() {
        assert_eq!(
            step(&CreationState::Idle, CreationEvent::Submit),
            CreationState::Idle
        );
        assert_eq!(
            step(&CreationState::Composing, CreationEvent::Submit),
            CreationState::Composing
        );
        assert_eq!(
            step(&CreationState::Composing, CreationEvent::Mined(tx())),
            CreationState::Composing
        );
    }

    #[test]
    fn test_reducer_does_not_mutate_input() {
        let state = CreationState::Validated;
        let next = step(&state, CreationEvent::Submit);
        assert_eq!(state, CreationState::Validated);
        assert_eq!(next, CreationState::Submitting);
    }
}
