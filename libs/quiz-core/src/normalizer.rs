//! Normalizer for raw generator output.
//!
//! The generator is untrusted: it may omit the type tag, use different field
//! names for the answer, or put the answer in the wrong shape. Every record
//! becomes exactly one canonical [`Question`]. Missing data is replaced with
//! a default and never causes an error.
//!
//! # Resolution order
//! - Kind: explicit `type` / `questionType` / `kind` tag, otherwise inferred
//!   from the answer fields (a bool means BOOLEAN, an array means ORDERING,
//!   anything else SINGLE_CHOICE).
//! - BOOLEAN: `correctAnswerBoolean`, `correctAnswer`, `answer` as bools, then
//!   `correctAnswer`, `answer` parsed from "true"/"false", then `false`.
//! - ORDERING: `correctOrder`, `correctAnswerArray`, `correctAnswer`, `answer`
//!   as non-empty arrays, then the choices themselves (flagged).
//! - SINGLE_CHOICE: `correctAnswer`, `correctAnswerString`, `answer` as
//!   non-empty strings, then `"Unknown Answer"`.

use crate::types::{Answer, ConceptSummary, Question, QuestionKind};
use serde_json::{Map, Value};

pub const UNKNOWN_ANSWER: &str = "Unknown Answer";
pub const PLACEHOLDER_PROMPT: &str = "Untitled question";
pub const PLACEHOLDER_EXPLANATION: &str = "No explanation provided.";
const PLACEHOLDER_CONCEPT: &str = "Key concept";

const TYPE_KEYS: &[&str] = &["type", "questionType", "kind"];
const PROMPT_KEYS: &[&str] = &["question", "prompt", "text"];
const CHOICE_KEYS: &[&str] = &["options", "choices"];
const EXPLANATION_KEYS: &[&str] = &["explanation", "rationale"];

const BOOLEAN_KEYS: &[&str] = &["correctAnswerBoolean", "correctAnswer", "answer"];
const BOOLEAN_TEXT_KEYS: &[&str] = &["correctAnswer", "answer"];
const ORDERING_KEYS: &[&str] = &["correctOrder", "correctAnswerArray", "correctAnswer", "answer"];
const CHOICE_ANSWER_KEYS: &[&str] = &["correctAnswer", "correctAnswerString", "answer"];
const INFERENCE_KEYS: &[&str] = &[
    "correctAnswerBoolean",
    "correctOrder",
    "correctAnswerArray",
    "correctAnswer",
    "correctAnswerString",
    "answer",
];

const CONCEPT_KEYS: &[&str] = &["concept", "title", "name"];
const SUMMARY_KEYS: &[&str] = &["summary", "description", "explanation"];

/// Result of normalizing a batch of raw records.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub questions: Vec<Question>,
    /// Ids of ordering questions whose correct order fell back to the choices.
    pub fallbacks: Vec<u32>,
}

/// Normalize a batch, assigning sequential ids starting at 1.
pub fn normalize_batch(records: &[Value]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();

    for (idx, record) in records.iter().enumerate() {
        let id = idx as u32 + 1;
        let (question, fell_back) = normalize_record(record, id);
        if fell_back {
            tracing::warn!(
                question_id = id,
                prompt = %question.prompt,
                "ordering question has no correct order, using choices as given"
            );
            batch.fallbacks.push(id);
        }
        batch.questions.push(question);
    }

    tracing::debug!(count = batch.questions.len(), "normalized question batch");
    batch
}

/// Normalize a single record with the given id.
pub fn normalize_question(record: &Value, id: u32) -> Question {
    normalize_record(record, id).0
}

fn normalize_record(record: &Value, id: u32) -> (Question, bool) {
    let empty = Map::new();
    let fields = record.as_object().unwrap_or(&empty);

    let kind = resolve_kind(fields);
    let prompt = text_field(fields, PROMPT_KEYS).unwrap_or_else(|| PLACEHOLDER_PROMPT.to_string());
    let explanation =
        text_field(fields, EXPLANATION_KEYS).unwrap_or_else(|| PLACEHOLDER_EXPLANATION.to_string());
    let choices = match kind {
        QuestionKind::Boolean => Vec::new(),
        _ => choices_field(fields),
    };

    let mut fell_back = false;
    let correct_answer = match kind {
        QuestionKind::Boolean => Answer::Boolean(resolve_boolean(fields)),
        QuestionKind::SingleChoice => Answer::Text(resolve_choice(fields)),
        QuestionKind::Ordering => match resolve_ordering(fields) {
            Some(order) => Answer::Sequence(order),
            None => {
                fell_back = true;
                Answer::Sequence(choices.clone())
            }
        },
    };

    let question = Question {
        id,
        kind,
        prompt,
        choices,
        correct_answer,
        explanation,
    };
    (question, fell_back)
}

/// Map a type tag such as "True/False" or "MCQ" to a kind.
pub fn parse_kind(tag: &str) -> Option<QuestionKind> {
    let key: String = tag
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    match key.as_str() {
        "truefalse" | "trueorfalse" | "boolean" | "bool" | "tf" => Some(QuestionKind::Boolean),
        "mcq" | "multiplechoice" | "singlechoice" | "choice" | "mc" | "multiple" => {
            Some(QuestionKind::SingleChoice)
        }
        "ordering" | "order" | "ranking" | "rank" | "sequence" | "sort" => {
            Some(QuestionKind::Ordering)
        }
        _ => None,
    }
}

fn resolve_kind(fields: &Map<String, Value>) -> QuestionKind {
    let tagged = TYPE_KEYS
        .iter()
        .filter_map(|key| fields.get(*key)?.as_str())
        .find_map(parse_kind);
    if let Some(kind) = tagged {
        return kind;
    }

    let values: Vec<&Value> = INFERENCE_KEYS.iter().filter_map(|k| fields.get(*k)).collect();
    if values.iter().any(|v| v.is_boolean()) {
        QuestionKind::Boolean
    } else if values.iter().any(|v| v.is_array()) {
        QuestionKind::Ordering
    } else {
        QuestionKind::SingleChoice
    }
}

fn resolve_boolean(fields: &Map<String, Value>) -> bool {
    if let Some(b) = BOOLEAN_KEYS
        .iter()
        .find_map(|key| fields.get(*key)?.as_bool())
    {
        return b;
    }
    BOOLEAN_TEXT_KEYS
        .iter()
        .filter_map(|key| fields.get(*key)?.as_str())
        .find_map(parse_bool_text)
        .unwrap_or(false)
}

fn parse_bool_text(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn resolve_ordering(fields: &Map<String, Value>) -> Option<Vec<String>> {
    ORDERING_KEYS.iter().find_map(|key| {
        let items = string_list(fields.get(*key)?.as_array()?);
        (!items.is_empty()).then_some(items)
    })
}

fn resolve_choice(fields: &Map<String, Value>) -> String {
    CHOICE_ANSWER_KEYS
        .iter()
        .find_map(|key| match fields.get(*key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| UNKNOWN_ANSWER.to_string())
}

fn text_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match fields.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    })
}

fn choices_field(fields: &Map<String, Value>) -> Vec<String> {
    CHOICE_KEYS
        .iter()
        .find_map(|key| fields.get(*key)?.as_array().map(|items| string_list(items)))
        .unwrap_or_default()
}

fn string_list(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect()
}

/// Normalize concept-summary records, dropping ones with no content at all.
pub fn normalize_concepts(records: &[Value]) -> Vec<ConceptSummary> {
    let empty = Map::new();
    records
        .iter()
        .filter_map(|record| {
            let fields = record.as_object().unwrap_or(&empty);
            let concept = text_field(fields, CONCEPT_KEYS);
            let summary = text_field(fields, SUMMARY_KEYS);
            if concept.is_none() && summary.is_none() {
                return None;
            }
            Some(ConceptSummary {
                concept: concept.unwrap_or_else(|| PLACEHOLDER_CONCEPT.to_string()),
                summary: summary.unwrap_or_default(),
            })
        })
        .collect()
}
