//! Core types for the quiz engine.

use crate::algorithm::IntervalPolicyKind;
use crate::content_id::ContentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a materialized question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionKind {
    Boolean,
    SingleChoice,
    Ordering,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::SingleChoice => "SINGLE_CHOICE",
            Self::Ordering => "ORDERING",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A correct or submitted answer.
///
/// Serialized untagged, so the JSON form is a plain bool, string or array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Boolean(bool),
    Text(String),
    Sequence(Vec<String>),
}

impl Answer {
    /// Textual form used for scalar comparison and display.
    pub fn to_text(&self) -> String {
        match self {
            Self::Boolean(b) => b.to_string(),
            Self::Text(s) => s.clone(),
            Self::Sequence(items) => items.join(", "),
        }
    }

    pub fn as_sequence(&self) -> Option<&[String]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The question kind this answer shape belongs to.
    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::Boolean(_) => QuestionKind::Boolean,
            Self::Text(_) => QuestionKind::SingleChoice,
            Self::Sequence(_) => QuestionKind::Ordering,
        }
    }
}

impl From<bool> for Answer {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for Answer {
    fn from(value: Vec<String>) -> Self {
        Self::Sequence(value)
    }
}

/// One canonical quiz item.
///
/// The JSON field names match what the generator emits, so a serialized
/// question is itself a valid raw record for the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(rename = "options", default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: Answer,
    pub explanation: String,
}

impl Question {
    pub fn boolean(id: u32, prompt: &str, answer: bool, explanation: &str) -> Self {
        Self {
            id,
            kind: QuestionKind::Boolean,
            prompt: prompt.to_string(),
            choices: Vec::new(),
            correct_answer: Answer::Boolean(answer),
            explanation: explanation.to_string(),
        }
    }

    pub fn single_choice(
        id: u32,
        prompt: &str,
        choices: &[&str],
        answer: &str,
        explanation: &str,
    ) -> Self {
        Self {
            id,
            kind: QuestionKind::SingleChoice,
            prompt: prompt.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            correct_answer: Answer::Text(answer.to_string()),
            explanation: explanation.to_string(),
        }
    }

    pub fn ordering(
        id: u32,
        prompt: &str,
        choices: &[&str],
        answer: &[&str],
        explanation: &str,
    ) -> Self {
        Self {
            id,
            kind: QuestionKind::Ordering,
            prompt: prompt.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            correct_answer: Answer::Sequence(answer.iter().map(|a| a.to_string()).collect()),
            explanation: explanation.to_string(),
        }
    }

    /// Stable identity of this question across sessions.
    pub fn content_id(&self) -> ContentId {
        ContentId::of(&self.prompt)
    }
}

/// One user response, graded once at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: u32,
    pub submitted_answer: Answer,
    pub is_correct: bool,
}

/// Durable review state for a question that has been missed at least once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub content_id: ContentId,
    pub question: Question,
    pub interval_days: u32,
    pub success_streak: u32,
    pub due_at: DateTime<Utc>,
}

impl ReviewRecord {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at <= now
    }
}

/// Short concept explanation shown before the quiz starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptSummary {
    pub concept: String,
    pub summary: String,
}

/// Question type requested from the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionTypeFilter {
    Boolean,
    SingleChoice,
    Ordering,
    #[default]
    Mixed,
}

impl QuestionTypeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::SingleChoice => "SINGLE_CHOICE",
            Self::Ordering => "ORDERING",
            Self::Mixed => "MIXED",
        }
    }

    /// Parse from a config string, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BOOLEAN" => Some(Self::Boolean),
            "SINGLE_CHOICE" => Some(Self::SingleChoice),
            "ORDERING" => Some(Self::Ordering),
            "MIXED" => Some(Self::Mixed),
            _ => None,
        }
    }
}

/// Request handed to the content source when generation starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub source_text: String,
    pub question_count: u32,
    pub question_type: QuestionTypeFilter,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
}

/// Correct answers out of total answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    pub fn from_records(records: &[AnswerRecord]) -> Self {
        Self {
            correct: records.iter().filter(|r| r.is_correct).count(),
            total: records.len(),
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64 * 100.0
    }
}

/// Quiz settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    pub question_count: u32,
    pub question_type: QuestionTypeFilter,
    pub interval_policy: IntervalPolicyKind,
    pub storage_key: String,
}

/// Storage key under which the review map is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "quiz_srs_data";

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_count: 10,
            question_type: QuestionTypeFilter::default(),
            interval_policy: IntervalPolicyKind::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}
