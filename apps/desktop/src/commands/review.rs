//! Review session commands.

use crate::state::AppState;
use chrono::Utc;
use quiz_core::ReviewStart;
use serde::Serialize;

use super::quiz::{get_view, QuizView};
use super::{reject, CommandError};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReviewResponse {
    Started { count: usize, view: QuizView },
    NothingDue,
}

/// Count review records due now, picking up writes from other processes.
pub fn get_due_count(state: &AppState) -> usize {
    let mut scheduler = state.scheduler.lock().expect("scheduler lock");
    scheduler.refresh();
    scheduler.due_count(Utc::now())
}

/// Start a review session over everything currently due.
pub fn start_review(state: &AppState) -> Result<ReviewResponse, CommandError> {
    let started = {
        let mut session = state.session.lock().expect("session lock");
        let mut scheduler = state.scheduler.lock().expect("scheduler lock");
        scheduler.refresh();
        let batch = scheduler.build_review_batch(Utc::now(), &mut rand::rng());
        session.start_review(batch).map_err(reject)?
    };

    match started {
        ReviewStart::Started(count) => {
            tracing::info!(count, "started review session");
            Ok(ReviewResponse::Started {
                count,
                view: get_view(state),
            })
        }
        ReviewStart::NothingDue => {
            tracing::info!("no reviews due");
            Ok(ReviewResponse::NothingDue)
        }
    }
}
