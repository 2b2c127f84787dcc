//! Error types for quiz-core.

use crate::session::SessionState;
use thiserror::Error;

/// Result type alias using SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Rejected user actions.
///
/// None of these leave the session in a different state than before the call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while in {state} state")]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },

    #[error("question {0} has already been answered")]
    AlreadyAnswered(u32),

    #[error("question {got} is not the current question (expected {expected})")]
    NotCurrentQuestion { expected: u32, got: u32 },

    #[error("a generation request is already in progress")]
    GenerationInProgress,

    #[error("no source material supplied")]
    NoMaterial,

    #[error("select at least one topic")]
    NoTopicsSelected,

    #[error("current question is not an ordering question")]
    NotOrdering,

    #[error("item position {0} is out of range")]
    OutOfRange(usize),
}

/// Errors from the durable review store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("failed to serialize review map: {0}")]
    Serialize(#[from] serde_json::Error),
}
