//! Fixed step ladder: 1, 3, 7, 14, 30 days.

use super::IntervalPolicy;

/// Ladder policy with configurable steps.
///
/// The next interval is the first step strictly greater than the previous
/// interval, so 0 moves to 1, anything in 1..3 moves to 3, and so on. Once the
/// top step is reached the interval stays there.
#[derive(Debug, Clone)]
pub struct Ladder {
    pub steps: Vec<u32>,
}

impl Default for Ladder {
    fn default() -> Self {
        Self {
            steps: vec![1, 3, 7, 14, 30],
        }
    }
}

impl IntervalPolicy for Ladder {
    fn name(&self) -> &'static str {
        "ladder"
    }

    fn next_interval(&self, previous_days: u32) -> u32 {
        self.steps
            .iter()
            .copied()
            .find(|&step| step > previous_days)
            .or_else(|| self.steps.last().copied())
            .unwrap_or(1)
    }
}
