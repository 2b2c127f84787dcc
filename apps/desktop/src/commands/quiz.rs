//! Quiz session commands.

use crate::state::AppState;
use chrono::Utc;
use quiz_core::{
    Answer, AnswerRecord, ConceptSummary, Question, QuizSession, Score, SessionOrigin,
    SessionState,
};
use serde::Serialize;
use uuid::Uuid;

use super::{reject, CommandError};

/// Everything the presentation layer needs to render the current screen.
#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
    pub session_id: Uuid,
    pub state: SessionState,
    pub origin: SessionOrigin,
    pub current_question: Option<Question>,
    pub current_index: usize,
    pub total_questions: usize,
    pub answers: Vec<AnswerRecord>,
    pub score: Score,
    pub working_order: Vec<String>,
    pub concepts: Vec<ConceptSummary>,
    pub topics: Vec<String>,
    pub selected_topics: Vec<String>,
    /// Full question list, only while reviewing answers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
    pub last_error: Option<String>,
    pub due_count: usize,
}

/// Immediate feedback after an answer.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerFeedback {
    pub record: AnswerRecord,
    pub correct_answer: Answer,
    pub explanation: String,
    pub finished: bool,
    pub view: QuizView,
}

/// Snapshot the current session.
pub fn get_view(state: &AppState) -> QuizView {
    let session = state.session.lock().expect("session lock");
    let due_count = state
        .scheduler
        .lock()
        .expect("scheduler lock")
        .due_count(Utc::now());
    build_view(&session, due_count)
}

fn build_view(session: &QuizSession, due_count: usize) -> QuizView {
    let questions = match session.state() {
        SessionState::Review => session.questions().to_vec(),
        _ => Vec::new(),
    };
    QuizView {
        session_id: session.id(),
        state: session.state(),
        origin: session.origin(),
        current_question: session.current_question().cloned(),
        current_index: session.current_index(),
        total_questions: session.questions().len(),
        answers: session.answers().to_vec(),
        score: session.score(),
        working_order: session.working_order().to_vec(),
        concepts: session.concepts().to_vec(),
        topics: session.topics().to_vec(),
        selected_topics: session.selected_topics().to_vec(),
        questions,
        last_error: session.last_error().map(str::to_string),
        due_count,
    }
}

/// Run one session transition and return the new view.
pub(crate) fn apply<F>(state: &AppState, f: F) -> Result<QuizView, CommandError>
where
    F: FnOnce(&mut QuizSession) -> quiz_core::Result<()>,
{
    {
        let mut session = state.session.lock().expect("session lock");
        f(&mut session).map_err(reject)?;
    }
    Ok(get_view(state))
}

/// Grade an answer to the current question and update the review schedule.
pub fn submit_answer(
    state: &AppState,
    question_id: u32,
    answer: Answer,
) -> Result<AnswerFeedback, CommandError> {
    submit_with(state, |session| session.submit_answer(question_id, answer))
}

/// Submit the working order of the current ordering question.
pub fn submit_working_order(
    state: &AppState,
    question_id: u32,
) -> Result<AnswerFeedback, CommandError> {
    submit_with(state, |session| session.submit_working_order(question_id))
}

fn submit_with<F>(state: &AppState, f: F) -> Result<AnswerFeedback, CommandError>
where
    F: FnOnce(&mut QuizSession) -> quiz_core::Result<quiz_core::SubmitOutcome>,
{
    let mut session = state.session.lock().expect("session lock");
    let outcome = f(&mut session).map_err(reject)?;

    let mut scheduler = state.scheduler.lock().expect("scheduler lock");
    let now = Utc::now();
    if let Err(e) = scheduler.record_result(&outcome.question, outcome.record.is_correct, now) {
        // The answer stands even if the schedule could not be persisted.
        tracing::error!(error = %e, question_id = outcome.question.id, "failed to persist review schedule");
    }
    let view = build_view(&session, scheduler.due_count(now));

    Ok(AnswerFeedback {
        record: outcome.record,
        correct_answer: outcome.question.correct_answer,
        explanation: outcome.question.explanation,
        finished: outcome.finished,
        view,
    })
}

/// Reorder an item of the current ordering question.
pub fn move_item(state: &AppState, from: usize, to: usize) -> Result<QuizView, CommandError> {
    apply(state, |session| session.move_item(from, to))
}

/// Leave the concept summary and start answering.
pub fn start_quiz(state: &AppState) -> Result<QuizView, CommandError> {
    apply(state, QuizSession::start_quiz)
}

pub fn view_details(state: &AppState) -> Result<QuizView, CommandError> {
    apply(state, QuizSession::view_details)
}

pub fn back_to_summary(state: &AppState) -> Result<QuizView, CommandError> {
    apply(state, QuizSession::back_to_summary)
}

pub fn new_session(state: &AppState) -> Result<QuizView, CommandError> {
    apply(state, QuizSession::new_session)
}

pub fn toggle_topic(state: &AppState, index: usize) -> Result<QuizView, CommandError> {
    apply(state, |session| session.toggle_topic(index))
}

pub fn cancel_topics(state: &AppState) -> Result<QuizView, CommandError> {
    apply(state, QuizSession::cancel_topics)
}
