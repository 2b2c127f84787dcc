//! Core quiz engine shared by every front end.
//!
//! Provides:
//! - Normalizer turning loosely-typed generator output into canonical questions
//! - Answer grading for true/false, single-choice and ordering questions
//! - Content identity hashing and a spaced repetition scheduler over a
//!   pluggable key/value store
//! - The quiz session state machine
//! - Plain-text export of mistakes

pub mod algorithm;
pub mod content_id;
pub mod error;
pub mod export;
pub mod grading;
pub mod normalizer;
pub mod scheduler;
pub mod session;
pub mod types;

pub use algorithm::{get_policy, IntervalPolicy, IntervalPolicyKind};
pub use content_id::ContentId;
pub use error::{Result, SessionError, StoreError};
pub use export::{export_mistakes, render_answer, MistakeExport};
pub use grading::{grade, normalize_item};
pub use normalizer::{normalize_batch, normalize_concepts, normalize_question, NormalizedBatch};
pub use scheduler::{KeyValueStore, MemoryStore, ReviewMap, ScheduleOutcome, Scheduler};
pub use session::{QuizSession, ReviewStart, SessionOrigin, SessionState, SubmitOutcome};
pub use types::{
    Answer, AnswerRecord, ConceptSummary, GenerationRequest, Question, QuestionKind,
    QuestionTypeFilter, QuizSettings, ReviewRecord, Score,
};
