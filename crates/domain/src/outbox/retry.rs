//! Retry/backoff policy for the relay.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

/// Exponential backoff with a cap, plus the attempt ceiling.
///
/// All values are operator-tunable; nothing in the data model fixes them.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Delay before the first retry
    pub base: Duration,
    /// Growth factor applied per attempt
    pub multiplier: f64,
    /// Upper bound on any single delay
    pub cap: Duration,
    /// Attempts after which a message is left FAILED for the operator
    pub max_attempts: i32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            multiplier: 2.0,
            cap: Duration::from_secs(30),
            max_attempts: 5,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_for(&self, attempt: i32) -> Duration {
        let exponent = attempt.saturating_sub(1).max(0) as u32;
        let factor = self.multiplier.powi(exponent as i32);
        let raw = self.base.as_secs_f64() * factor;
        Duration::from_secs_f64(raw.min(self.cap.as_secs_f64()))
    }

    /// Schedule for the next attempt, strictly after `now`.
    pub fn next_attempt_at(&self, now: DateTime<Utc>, attempt: i32) -> DateTime<Utc> {
        let delay = self.delay_for(attempt);
        let delay = ChronoDuration::from_std(delay).unwrap_or(ChronoDuration::seconds(1));
        // A zero-length delay would violate backoff monotonicity.
        let delay = delay.max(ChronoDuration::milliseconds(1));
        now + delay
    }

    pub fn is_exhausted(&self, attempt: i32) -> bool {
        attempt >= self.max_attempts
    }
}
