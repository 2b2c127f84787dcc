//! Review interval policies.
//!
//! A policy maps the interval granted last time to the next one after a
//! correct answer. Failures always reset to zero and are handled by the
//! scheduler, not the policy.

pub mod doubling;
pub mod ladder;

use serde::{Deserialize, Serialize};

/// Trait for review interval policies.
pub trait IntervalPolicy: Send + Sync {
    /// Policy identifier.
    fn name(&self) -> &'static str;

    /// Interval in days to grant after a correct answer, given the previous one.
    fn next_interval(&self, previous_days: u32) -> u32;
}

/// Serializable choice of policy, used in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalPolicyKind {
    #[default]
    Ladder,
    Doubling,
}

impl IntervalPolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ladder => "ladder",
            Self::Doubling => "doubling",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ladder" => Some(Self::Ladder),
            "doubling" => Some(Self::Doubling),
            _ => None,
        }
    }

    pub fn build(self) -> Box<dyn IntervalPolicy> {
        match self {
            Self::Ladder => Box::new(ladder::Ladder::default()),
            Self::Doubling => Box::new(doubling::Doubling::default()),
        }
    }
}

/// Get policy by name.
pub fn get_policy(name: &str) -> Option<Box<dyn IntervalPolicy>> {
    IntervalPolicyKind::parse(name).map(IntervalPolicyKind::build)
}
