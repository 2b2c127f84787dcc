//! Commands exposed to the presentation layer.
//!
//! These are the only legal inputs into the quiz core. Rejected actions come
//! back as a [`CommandError`] and leave all state unchanged.

pub mod export;
pub mod generation;
pub mod quiz;
pub mod review;

pub use export::{export_mistakes, ExportResponse};
pub use generation::{generate_from_topics, generate_quiz, scan_topics};
pub use quiz::{
    back_to_summary, cancel_topics, get_view, move_item, new_session, start_quiz,
    submit_answer, submit_working_order, toggle_topic, view_details, AnswerFeedback, QuizView,
};
pub use review::{get_due_count, start_review, ReviewResponse};

use quiz_core::{SessionError, StoreError};

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CommandError {
    pub message: String,
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<SessionError> for CommandError {
    fn from(e: SessionError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<StoreError> for CommandError {
    fn from(e: StoreError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<crate::db::DbError> for CommandError {
    fn from(e: crate::db::DbError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<crate::source::SourceError> for CommandError {
    fn from(e: crate::source::SourceError) -> Self {
        Self { message: e.to_string() }
    }
}

/// Log a rejected user action and turn it into a command error.
pub(crate) fn reject(e: SessionError) -> CommandError {
    tracing::warn!(error = %e, "rejected action");
    e.into()
}
