//! Quiz session state machine.
//!
//! ```text
//! Setup ──submit──▶ Generating ──batch+concepts──▶ Knowledge ──start──▶ Playing
//!   │  ╲                │   ╲──batch──────────────────────────────────▶ Playing
//!   │   ╲scan           ╰──failed──▶ Setup                              │
//!   │    ▼                                                              ▼
//!   │  TopicSelection ──confirm──▶ Generating            Summary ◀──last answer
//!   │        ╰──cancel──▶ Setup                           │   ▲
//!   ╰──review──▶ Playing                         details ▼   │ back
//!                                                       Review
//! ```
//!
//! Every method either performs one legal transition or returns a
//! [`SessionError`] and leaves the session untouched.

use crate::error::{Result, SessionError};
use crate::grading::grade;
use crate::types::{
    Answer, AnswerRecord, ConceptSummary, GenerationRequest, Question, QuestionKind, QuizSettings,
    Score,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Current mode of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Setup,
    TopicSelection,
    Generating,
    Knowledge,
    Playing,
    Summary,
    Review,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::TopicSelection => "topic_selection",
            Self::Generating => "generating",
            Self::Knowledge => "knowledge",
            Self::Playing => "playing",
            Self::Summary => "summary",
            Self::Review => "review",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the current question list was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOrigin {
    #[default]
    Generated,
    Review,
}

/// Result of a successful answer submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub record: AnswerRecord,
    /// Snapshot of the graded question, for the review scheduler.
    pub question: Question,
    /// True when this answer moved the session to Summary.
    pub finished: bool,
}

/// Result of asking for a review session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStart {
    Started(usize),
    NothingDue,
}

/// One quiz session, owned by the caller.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    state: SessionState,
    origin: SessionOrigin,
    pending: Option<GenerationRequest>,
    topics: Vec<String>,
    selected_topics: Vec<String>,
    questions: Vec<Question>,
    concepts: Vec<ConceptSummary>,
    current_index: usize,
    answers: Vec<AnswerRecord>,
    working_order: Vec<String>,
    last_error: Option<String>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Setup,
            origin: SessionOrigin::default(),
            pending: None,
            topics: Vec::new(),
            selected_topics: Vec::new(),
            questions: Vec::new(),
            concepts: Vec::new(),
            current_index: 0,
            answers: Vec::new(),
            working_order: Vec::new(),
            last_error: None,
        }
    }

    // Setup and generation

    /// Start generation directly from the supplied material.
    pub fn submit_content(
        &mut self,
        source_text: &str,
        settings: &QuizSettings,
    ) -> Result<GenerationRequest> {
        self.guard_generation_start("submit content", SessionState::Setup)?;
        let request = build_request(source_text, settings)?;

        self.clear_batch();
        self.pending = Some(request.clone());
        self.transition(SessionState::Generating);
        Ok(request)
    }

    /// Enter topic selection with the candidate topics found in the material.
    pub fn request_topic_scan(
        &mut self,
        source_text: &str,
        settings: &QuizSettings,
        candidates: Vec<String>,
    ) -> Result<()> {
        self.guard_generation_start("scan topics", SessionState::Setup)?;
        let request = build_request(source_text, settings)?;

        self.clear_batch();
        self.pending = Some(request);
        self.selected_topics = candidates.clone();
        self.topics = candidates;
        self.transition(SessionState::TopicSelection);
        Ok(())
    }

    /// Select or deselect the topic at `index`.
    pub fn toggle_topic(&mut self, index: usize) -> Result<()> {
        self.expect_state("toggle topic", SessionState::TopicSelection)?;
        let topic = self
            .topics
            .get(index)
            .cloned()
            .ok_or(SessionError::OutOfRange(index))?;

        if self.selected_topics.contains(&topic) {
            self.selected_topics.retain(|t| t != &topic);
        } else {
            let topics = &self.topics;
            self.selected_topics.push(topic);
            self.selected_topics
                .sort_by_key(|t| topics.iter().position(|c| c == t));
        }
        Ok(())
    }

    /// Start generation restricted to the selected topics.
    pub fn confirm_topics(&mut self) -> Result<GenerationRequest> {
        self.guard_generation_start("confirm topics", SessionState::TopicSelection)?;
        if self.selected_topics.is_empty() {
            return Err(SessionError::NoTopicsSelected);
        }
        let mut request = self.pending.clone().ok_or(SessionError::NoMaterial)?;
        request.topics = self.selected_topics.clone();

        self.pending = Some(request.clone());
        self.transition(SessionState::Generating);
        Ok(request)
    }

    pub fn cancel_topics(&mut self) -> Result<()> {
        self.expect_state("cancel topics", SessionState::TopicSelection)?;
        self.enter_setup();
        Ok(())
    }

    /// Accept a generated batch. An empty batch is treated as a failure.
    pub fn complete_generation(
        &mut self,
        questions: Vec<Question>,
        concepts: Vec<ConceptSummary>,
    ) -> Result<SessionState> {
        self.expect_state("complete generation", SessionState::Generating)?;
        self.pending = None;

        if questions.is_empty() {
            self.fail_generation("No questions were generated")?;
            return Ok(self.state);
        }

        self.questions = questions;
        self.origin = SessionOrigin::Generated;
        if concepts.is_empty() {
            self.concepts.clear();
            self.enter_playing();
        } else {
            self.concepts = concepts;
            self.transition(SessionState::Knowledge);
        }
        Ok(self.state)
    }

    /// Return to Setup, surfacing `message` to the user.
    pub fn fail_generation(&mut self, message: &str) -> Result<()> {
        self.expect_state("fail generation", SessionState::Generating)?;
        tracing::warn!(session_id = %self.id, error = message, "generation failed");
        self.enter_setup();
        self.last_error = Some(message.to_string());
        Ok(())
    }

    /// Leave the concept summary and begin answering.
    pub fn start_quiz(&mut self) -> Result<()> {
        self.expect_state("start quiz", SessionState::Knowledge)?;
        self.enter_playing();
        Ok(())
    }

    /// Start playing a batch of due review questions, bypassing generation.
    pub fn start_review(&mut self, questions: Vec<Question>) -> Result<ReviewStart> {
        self.expect_state("start review", SessionState::Setup)?;
        if questions.is_empty() {
            return Ok(ReviewStart::NothingDue);
        }

        let count = questions.len();
        self.clear_batch();
        self.questions = questions;
        self.origin = SessionOrigin::Review;
        self.enter_playing();
        Ok(ReviewStart::Started(count))
    }

    // Playing

    /// Grade and record an answer to the current question.
    pub fn submit_answer(&mut self, question_id: u32, answer: Answer) -> Result<SubmitOutcome> {
        self.expect_state("submit answer", SessionState::Playing)?;
        if self.answers.iter().any(|r| r.question_id == question_id) {
            return Err(SessionError::AlreadyAnswered(question_id));
        }
        let question = self
            .questions
            .get(self.current_index)
            .cloned()
            .ok_or(SessionError::InvalidTransition {
                action: "submit answer",
                state: self.state,
            })?;
        if question.id != question_id {
            return Err(SessionError::NotCurrentQuestion {
                expected: question.id,
                got: question_id,
            });
        }

        let is_correct = grade(&question, &answer);
        let record = AnswerRecord {
            question_id,
            submitted_answer: answer,
            is_correct,
        };
        self.answers.push(record.clone());

        let finished = self.current_index + 1 >= self.questions.len();
        if finished {
            self.transition(SessionState::Summary);
        } else {
            self.current_index += 1;
            self.reset_working_order();
        }

        Ok(SubmitOutcome {
            record,
            question,
            finished,
        })
    }

    /// Submit the current working order of an ordering question.
    pub fn submit_working_order(&mut self, question_id: u32) -> Result<SubmitOutcome> {
        self.expect_state("submit order", SessionState::Playing)?;
        if self.current_question().map(|q| q.kind) != Some(QuestionKind::Ordering) {
            return Err(SessionError::NotOrdering);
        }
        let order = Answer::Sequence(self.working_order.clone());
        self.submit_answer(question_id, order)
    }

    /// Move one item of the working order from `from` to `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        self.expect_state("reorder items", SessionState::Playing)?;
        if self.current_question().map(|q| q.kind) != Some(QuestionKind::Ordering) {
            return Err(SessionError::NotOrdering);
        }
        let len = self.working_order.len();
        if from >= len {
            return Err(SessionError::OutOfRange(from));
        }
        if to >= len {
            return Err(SessionError::OutOfRange(to));
        }
        let item = self.working_order.remove(from);
        self.working_order.insert(to, item);
        Ok(())
    }

    // Summary and review

    pub fn view_details(&mut self) -> Result<()> {
        self.expect_state("view details", SessionState::Summary)?;
        self.transition(SessionState::Review);
        Ok(())
    }

    pub fn back_to_summary(&mut self) -> Result<()> {
        self.expect_state("go back", SessionState::Review)?;
        self.transition(SessionState::Summary);
        Ok(())
    }

    /// Discard this session and return to Setup.
    pub fn new_session(&mut self) -> Result<()> {
        self.expect_state("start a new session", SessionState::Summary)?;
        self.enter_setup();
        Ok(())
    }

    // Accessors

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question awaiting an answer, only while playing.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::Playing => self.questions.get(self.current_index),
            _ => None,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn concepts(&self) -> &[ConceptSummary] {
        &self.concepts
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn selected_topics(&self) -> &[String] {
        &self.selected_topics
    }

    pub fn working_order(&self) -> &[String] {
        &self.working_order
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn score(&self) -> Score {
        Score::from_records(&self.answers)
    }

    // Internals

    fn expect_state(&self, action: &'static str, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }

    fn guard_generation_start(&self, action: &'static str, expected: SessionState) -> Result<()> {
        if self.state == SessionState::Generating {
            return Err(SessionError::GenerationInProgress);
        }
        self.expect_state(action, expected)
    }

    fn transition(&mut self, to: SessionState) {
        tracing::info!(
            session_id = %self.id,
            from = %self.state,
            to = %to,
            "session transition"
        );
        self.state = to;
    }

    fn clear_batch(&mut self) {
        self.questions.clear();
        self.concepts.clear();
        self.answers.clear();
        self.current_index = 0;
        self.working_order.clear();
        self.last_error = None;
    }

    fn enter_setup(&mut self) {
        self.transition(SessionState::Setup);
        self.id = Uuid::new_v4();
        self.origin = SessionOrigin::default();
        self.pending = None;
        self.topics.clear();
        self.selected_topics.clear();
        self.clear_batch();
    }

    fn enter_playing(&mut self) {
        self.current_index = 0;
        self.answers.clear();
        self.last_error = None;
        self.transition(SessionState::Playing);
        self.reset_working_order();
    }

    fn reset_working_order(&mut self) {
        self.working_order = match self.questions.get(self.current_index) {
            Some(q) if q.kind == QuestionKind::Ordering => q.choices.clone(),
            _ => Vec::new(),
        };
    }
}

fn build_request(source_text: &str, settings: &QuizSettings) -> Result<GenerationRequest> {
    if source_text.trim().is_empty() {
        return Err(SessionError::NoMaterial);
    }
    Ok(GenerationRequest {
        source_text: source_text.to_string(),
        question_count: settings.question_count,
        question_type: settings.question_type,
        topics: Vec::new(),
    })
}
