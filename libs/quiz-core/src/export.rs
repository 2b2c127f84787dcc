//! Plain-text export of the questions answered incorrectly.

use crate::types::{Answer, AnswerRecord, Question};
use chrono::NaiveDate;
use std::fmt;

/// Result of exporting a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MistakeExport {
    /// Every answer was correct; there is nothing to write.
    NoMistakes,
    Report { filename: String, body: String },
}

/// Render every incorrect answer as a numbered text report.
pub fn export_mistakes(
    questions: &[Question],
    answers: &[AnswerRecord],
    date: NaiveDate,
) -> MistakeExport {
    let mistakes: Vec<(&AnswerRecord, Option<&Question>)> = answers
        .iter()
        .filter(|r| !r.is_correct)
        .map(|r| (r, questions.iter().find(|q| q.id == r.question_id)))
        .collect();

    if mistakes.is_empty() {
        return MistakeExport::NoMistakes;
    }

    let report = MistakeReport {
        date,
        answered: answers.len(),
        mistakes: &mistakes,
    };
    MistakeExport::Report {
        filename: format!("quiz-mistakes-{}.txt", date.format("%Y-%m-%d")),
        body: report.to_string(),
    }
}

struct MistakeReport<'a> {
    date: NaiveDate,
    answered: usize,
    mistakes: &'a [(&'a AnswerRecord, Option<&'a Question>)],
}

impl fmt::Display for MistakeReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quiz mistakes - {}", self.date.format("%Y-%m-%d"))?;
        writeln!(f, "{} incorrect of {} answered", self.mistakes.len(), self.answered)?;

        for (n, (record, question)) in self.mistakes.iter().enumerate() {
            writeln!(f)?;
            match question {
                Some(q) => {
                    writeln!(f, "{}. {}", n + 1, q.prompt)?;
                    writeln!(f, "Your answer: {}", render_answer(&record.submitted_answer))?;
                    writeln!(f, "Correct answer: {}", render_answer(&q.correct_answer))?;
                    writeln!(f, "Explanation: {}", q.explanation)?;
                }
                None => {
                    writeln!(f, "{}. (question {} unavailable)", n + 1, record.question_id)?;
                    writeln!(f, "Your answer: {}", render_answer(&record.submitted_answer))?;
                }
            }
        }
        Ok(())
    }
}

/// Booleans as True/False, sequences joined with arrows.
pub fn render_answer(answer: &Answer) -> String {
    match answer {
        Answer::Boolean(true) => "True".to_string(),
        Answer::Boolean(false) => "False".to_string(),
        Answer::Text(s) => s.clone(),
        Answer::Sequence(items) => items.join(" → "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn record(question_id: u32, submitted: Answer, is_correct: bool) -> AnswerRecord {
        AnswerRecord {
            question_id,
            submitted_answer: submitted,
            is_correct,
        }
    }

    #[test]
    fn no_mistakes_signal() {
        let questions = vec![Question::boolean(1, "A", true, "")];
        let answers = vec![record(1, Answer::Boolean(true), true)];
        assert_eq!(export_mistakes(&questions, &answers, date()), MistakeExport::NoMistakes);
        assert_eq!(export_mistakes(&[], &[], date()), MistakeExport::NoMistakes);
    }

    #[test]
    fn report_lists_only_mistakes() {
        let questions = vec![
            Question::boolean(1, "Is water wet?", true, "Yes."),
            Question::ordering(2, "Order steps", &["b", "a"], &["a", "b"], "Alphabetical."),
            Question::single_choice(3, "Pick A", &["A", "B"], "A", "A."),
        ];
        let answers = vec![
            record(1, Answer::Boolean(false), false),
            record(2, Answer::Sequence(vec!["b".into(), "a".into()]), false),
            record(3, Answer::Text("A".into()), true),
        ];

        let MistakeExport::Report { filename, body } = export_mistakes(&questions, &answers, date())
        else {
            panic!("expected a report");
        };
        assert_eq!(filename, "quiz-mistakes-2025-03-01.txt");
        assert!(body.contains("2 incorrect of 3 answered"));
        assert!(body.contains("1. Is water wet?\nYour answer: False\nCorrect answer: True"));
        assert!(body.contains("Your answer: b → a\nCorrect answer: a → b"));
        assert!(body.contains("Explanation: Alphabetical."));
        assert!(!body.contains("Pick A"));
    }

    #[test]
    fn report_layout_and_missing_question() {
        let questions = vec![Question::boolean(1, "Is water wet?", true, "Yes.")];
        let answers = vec![
            record(1, Answer::Boolean(false), false),
            record(9, Answer::Text("guess".into()), false),
        ];

        let MistakeExport::Report { body, .. } = export_mistakes(&questions, &answers, date())
        else {
            panic!("expected a report");
        };
        assert_eq!(
            body,
            "Quiz mistakes - 2025-03-01\n\
             2 incorrect of 2 answered\n\
             \n\
             1. Is water wet?\n\
             Your answer: False\n\
             Correct answer: True\n\
             Explanation: Yes.\n\
             \n\
             2. (question 9 unavailable)\n\
             Your answer: guess\n"
        );
    }

    #[test]
    fn render_answer_forms() {
        assert_eq!(render_answer(&Answer::Text("Paris".into())), "Paris");
        assert_eq!(
            render_answer(&Answer::Sequence(vec!["1".into(), "2".into(), "3".into()])),
            "1 → 2 → 3"
        );
    }
}
