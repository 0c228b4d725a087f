use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Bounded retry with a fixed pause between attempts.
///
/// `max_retries` is the total number of attempts, not the number of repeats
/// after the first one. Zero means the send gives up without trying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Whether another attempt follows the failed 0-indexed `attempt`.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_retries
    }

    /// Upper bound on the time a fully failing send spends sleeping.
    #[cfg(test)]
    pub(crate) fn total_backoff(&self) -> Duration {
        self.backoff * self.max_retries.saturating_sub(1)
    }
}
