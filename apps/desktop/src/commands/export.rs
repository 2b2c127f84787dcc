//! Mistake export command.

use crate::state::AppState;
use chrono::Utc;
use quiz_core::{MistakeExport, SessionError, SessionState};
use serde::Serialize;

use super::{reject, CommandError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportResponse {
    NoMistakes,
    Report { filename: String, body: String },
}

impl From<MistakeExport> for ExportResponse {
    fn from(export: MistakeExport) -> Self {
        match export {
            MistakeExport::NoMistakes => Self::NoMistakes,
            MistakeExport::Report { filename, body } => Self::Report { filename, body },
        }
    }
}

/// Export the incorrect answers of a finished session as a text report.
pub fn export_mistakes(state: &AppState) -> Result<ExportResponse, CommandError> {
    let session = state.session.lock().expect("session lock");
    match session.state() {
        SessionState::Summary | SessionState::Review => {}
        other => {
            return Err(reject(SessionError::InvalidTransition {
                action: "export mistakes",
                state: other,
            }))
        }
    }

    let export = quiz_core::export_mistakes(
        session.questions(),
        session.answers(),
        Utc::now().date_naive(),
    );
    if let MistakeExport::Report { filename, .. } = &export {
        tracing::info!(session_id = %session.id(), filename = %filename, "exported mistakes");
    }
    Ok(export.into())
}
