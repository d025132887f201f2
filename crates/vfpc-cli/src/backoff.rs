//! Exponential poll schedule bounded by a total wait budget.
//!
//! The live source answers `Pending` while it fetches; callers poll again
//! after each delay until data arrives or the budget runs out.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PollBackoff {
    max: Duration,
    current: Duration,
    deadline: Instant,
}

impl PollBackoff {
    pub fn new(base: Duration, max: Duration, budget: Duration) -> Self {
        let base = base.max(Duration::from_millis(1));
        Self {
            max: max.max(base),
            current: base,
            deadline: Instant::now() + budget,
        }
    }

    /// Delay before the next poll, or `None` once the budget is spent.
    pub fn next_delay(&mut self) -> Option<Duration> {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return None;
        }

        let delay = self.current.min(remaining);
        self.current = self.current.saturating_mul(2).min(self.max);
        Some(delay)
    }
}
