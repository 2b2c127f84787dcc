//! Doubling policy: 1, 2, 4, 8, ... days up to a cap.

use super::IntervalPolicy;

#[derive(Debug, Clone)]
pub struct Doubling {
    pub max_interval: u32,
}

impl Default for Doubling {
    fn default() -> Self {
        Self { max_interval: 180 }
    }
}

impl IntervalPolicy for Doubling {
    fn name(&self) -> &'static str {
        "doubling"
    }

    fn next_interval(&self, previous_days: u32) -> u32 {
        let next = if previous_days == 0 {
            1
        } else {
            previous_days.saturating_mul(2)
        };
        next.min(self.max_interval.max(1))
    }
}
