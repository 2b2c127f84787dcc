//! Generation driver.
//!
//! Every call into the content source holds the source claim in
//! [`AppState`], so a topic scan and a generation never overlap. Requests are
//! issued under the session lock, the source is awaited with no lock held,
//! and the result is applied under the lock again.

use crate::source::ContentSource;
use crate::state::{AppState, SourceGuard};
use quiz_core::{normalize_batch, normalize_concepts, GenerationRequest, SessionError, SessionState};
use std::time::Duration;

use super::quiz::{get_view, QuizView};
use super::{reject, CommandError};

/// Default upper bound on a single generation call.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Generate a quiz directly from the supplied material.
pub async fn generate_quiz<S: ContentSource>(
    state: &AppState,
    source: &S,
    source_text: &str,
) -> Result<QuizView, CommandError> {
    let claim = claim_source(state)?;
    let request = {
        let mut session = state.session.lock().expect("session lock");
        session
            .submit_content(source_text, &state.settings)
            .map_err(reject)?
    };
    run_generation(state, source, request, claim).await
}

/// Scan the material for topics and enter topic selection.
pub async fn scan_topics<S: ContentSource>(
    state: &AppState,
    source: &S,
    source_text: &str,
) -> Result<QuizView, CommandError> {
    {
        let session = state.session.lock().expect("session lock");
        match session.state() {
            SessionState::Setup => {}
            SessionState::Generating => return Err(reject(SessionError::GenerationInProgress)),
            other => {
                return Err(reject(SessionError::InvalidTransition {
                    action: "scan topics",
                    state: other,
                }))
            }
        }
    }
    if source_text.trim().is_empty() {
        return Err(reject(SessionError::NoMaterial));
    }

    let _claim = claim_source(state)?;
    let topics = source.scan_topics(source_text).await.map_err(|e| {
        tracing::warn!(error = %e, "topic scan failed");
        CommandError::from(e)
    })?;
    tracing::info!(count = topics.len(), "scanned topics");

    {
        let mut session = state.session.lock().expect("session lock");
        session
            .request_topic_scan(source_text, &state.settings, topics)
            .map_err(reject)?;
    }
    Ok(get_view(state))
}

/// Generate a quiz restricted to the selected topics.
pub async fn generate_from_topics<S: ContentSource>(
    state: &AppState,
    source: &S,
) -> Result<QuizView, CommandError> {
    let claim = claim_source(state)?;
    let request = {
        let mut session = state.session.lock().expect("session lock");
        session.confirm_topics().map_err(reject)?
    };
    run_generation(state, source, request, claim).await
}

fn claim_source(state: &AppState) -> Result<SourceGuard<'_>, CommandError> {
    state
        .claim_source()
        .ok_or_else(|| reject(SessionError::GenerationInProgress))
}

async fn run_generation<S: ContentSource>(
    state: &AppState,
    source: &S,
    request: GenerationRequest,
    _claim: SourceGuard<'_>,
) -> Result<QuizView, CommandError> {
    tracing::info!(
        question_count = request.question_count,
        question_type = request.question_type.as_str(),
        topics = request.topics.len(),
        "requesting generation"
    );
    let result = tokio::time::timeout(state.generation_timeout(), source.generate(&request)).await;

    {
        let mut session = state.session.lock().expect("session lock");
        match result {
            Ok(Ok(batch)) => {
                let normalized = normalize_batch(&batch.questions);
                let concepts = normalize_concepts(&batch.concepts);
                session
                    .complete_generation(normalized.questions, concepts)
                    .map_err(reject)?;
            }
            Ok(Err(e)) => {
                session.fail_generation(&e.to_string()).map_err(reject)?;
            }
            Err(_) => {
                session.fail_generation("Generation timed out").map_err(reject)?;
            }
        }
    }
    Ok(get_view(state))
}
