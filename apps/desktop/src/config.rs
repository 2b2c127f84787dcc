//! Application configuration loaded from the environment.
//!
//! `.env` is read first (if present), then:
//! - `QUIZ_DB_PATH`: SQLite file holding the review store
//! - `QUIZ_QUESTION_COUNT`: questions requested per batch
//! - `QUIZ_QUESTION_TYPE`: BOOLEAN, SINGLE_CHOICE, ORDERING or MIXED
//! - `QUIZ_INTERVAL_POLICY`: ladder or doubling
//! - `QUIZ_STORAGE_KEY`: key the review map is stored under
//!
//! Invalid values are logged and replaced with defaults.

use quiz_core::{IntervalPolicyKind, QuestionTypeFilter, QuizSettings};
use std::path::PathBuf;

/// Upper bound on questions per batch.
const MAX_QUESTION_COUNT: u32 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub settings: QuizSettings,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = QuizSettings::default();

        let db_path = lookup("QUIZ_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let question_count = parse_or_default(
            "QUIZ_QUESTION_COUNT",
            lookup("QUIZ_QUESTION_COUNT"),
            |s| s.trim().parse::<u32>().ok().filter(|n| (1..=MAX_QUESTION_COUNT).contains(n)),
            defaults.question_count,
        );
        let question_type = parse_or_default(
            "QUIZ_QUESTION_TYPE",
            lookup("QUIZ_QUESTION_TYPE"),
            QuestionTypeFilter::parse,
            defaults.question_type,
        );
        let interval_policy = parse_or_default(
            "QUIZ_INTERVAL_POLICY",
            lookup("QUIZ_INTERVAL_POLICY"),
            IntervalPolicyKind::parse,
            defaults.interval_policy,
        );
        let storage_key = lookup("QUIZ_STORAGE_KEY")
            .filter(|k| !k.trim().is_empty())
            .unwrap_or(defaults.storage_key);

        Self {
            db_path,
            settings: QuizSettings {
                question_count,
                question_type,
                interval_policy,
                storage_key,
            },
        }
    }
}

fn parse_or_default<T, P>(name: &str, raw: Option<String>, parse: P, default: T) -> T
where
    P: Fn(&str) -> Option<T>,
{
    match raw {
        None => default,
        Some(value) => parse(&value).unwrap_or_else(|| {
            tracing::warn!(variable = name, value = %value, "invalid config value, using default");
            default
        }),
    }
}

fn default_db_path() -> PathBuf {
    // Falls back to the working directory when no data dir is known.
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizgen")
        .join("quiz.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.settings, QuizSettings::default());
        assert!(cfg.db_path.ends_with("quizgen/quiz.db"));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("QUIZ_DB_PATH", "/tmp/q.db"),
            ("QUIZ_QUESTION_COUNT", "20"),
            ("QUIZ_QUESTION_TYPE", "ordering"),
            ("QUIZ_INTERVAL_POLICY", "doubling"),
            ("QUIZ_STORAGE_KEY", "custom"),
        ]);
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/q.db"));
        assert_eq!(cfg.settings.question_count, 20);
        assert_eq!(cfg.settings.question_type, QuestionTypeFilter::Ordering);
        assert_eq!(cfg.settings.interval_policy, IntervalPolicyKind::Doubling);
        assert_eq!(cfg.settings.storage_key, "custom");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = config(&[
            ("QUIZ_QUESTION_COUNT", "0"),
            ("QUIZ_QUESTION_TYPE", "essay"),
            ("QUIZ_INTERVAL_POLICY", "weekly"),
            ("QUIZ_STORAGE_KEY", "  "),
        ]);
        assert_eq!(cfg.settings, QuizSettings::default());
    }
}
