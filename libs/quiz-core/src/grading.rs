//! Answer grading.
//!
//! Grading is pure: the same question and answer always produce the same
//! verdict. Scalar kinds compare case-insensitively on their textual form, so
//! a boolean `true` and the string `"True"` grade the same. Ordering questions
//! compare element by element after [`normalize_item`].

use crate::types::{Answer, Question, QuestionKind};

/// Decide whether `submitted` is a correct answer to `question`.
pub fn grade(question: &Question, submitted: &Answer) -> bool {
    match question.kind {
        QuestionKind::Boolean | QuestionKind::SingleChoice => {
            if submitted.as_sequence().is_some() {
                return false;
            }
            submitted.to_text().trim().to_lowercase()
                == question.correct_answer.to_text().trim().to_lowercase()
        }
        QuestionKind::Ordering => {
            let (Some(given), Some(expected)) = (
                submitted.as_sequence(),
                question.correct_answer.as_sequence(),
            ) else {
                return false;
            };
            given.len() == expected.len()
                && given
                    .iter()
                    .zip(expected)
                    .all(|(a, b)| normalize_item(a) == normalize_item(b))
        }
    }
}

/// Normalize an ordering item: trim, lowercase and collapse inner whitespace.
pub fn normalize_item(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
