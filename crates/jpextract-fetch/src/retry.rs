use std::time::Duration;

/// Bounded retry on transient server errors.
///
/// `max_attempts` counts the first request, so the default of 5 allows four
/// retries. The first retry is immediate; retry `n` after that waits
/// `backoff_factor * 2^(n-1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_factor: Duration,
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_factor: Duration::from_millis(100),
            retry_statuses: vec![500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// Default statuses and budget with no waiting between attempts.
    pub fn immediate() -> Self {
        Self {
            backoff_factor: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Whether a response with `status` on 1-based `attempt` earns another try.
    pub fn should_retry(&self, status: u16, attempt: u32) -> bool {
        attempt < self.max_attempts && self.retry_statuses.contains(&status)
    }

    /// Wait before the next attempt, given `failures` consecutive failures so far.
    pub fn backoff(&self, failures: u32) -> Duration {
        if failures <= 1 {
            return Duration::ZERO;
        }
        let exponent = (failures - 1).min(16);
        self.backoff_factor.saturating_mul(1 << exponent)
    }
}
