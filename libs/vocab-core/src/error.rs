//! Error types for vocab-core.

use crate::types::WordId;
use thiserror::Error;

/// Result type alias using SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Misuse of the review session state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("word {given} is not the current card (expected {expected})")]
    WordMismatch { expected: WordId, given: WordId },
}
