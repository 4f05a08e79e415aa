//! Retry policy.

use std::time::Duration;

/// Default delay between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);

/// How failed destination calls are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of invocations, `None` for no limit.
    max_attempts: Option<u32>,

    /// Fixed delay before each re-invocation.
    delay: Duration,

    /// Whether permanent failures stop retrying immediately.
    fail_fast_on_permanent: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded(DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy {
    /// Retries forever with a fixed delay.
    #[must_use]
    pub fn unbounded(delay: Duration) -> Self {
        Self {
            max_attempts: None,
            delay,
            fail_fast_on_permanent: false,
        }
    }

    /// Gives up after `max_attempts` invocations.
    #[must_use]
    pub fn bounded(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
            delay,
            fail_fast_on_permanent: false,
        }
    }

    /// Sets whether permanent failures stop retrying immediately.
    #[must_use]
    pub fn with_fail_fast_on_permanent(mut self, fail_fast: bool) -> Self {
        self.fail_fast_on_permanent = fail_fast;
        self
    }

    /// Returns the maximum number of invocations.
    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Returns the delay between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns whether permanent failures stop retrying immediately.
    pub fn fail_fast_on_permanent(&self) -> bool {
        self.fail_fast_on_permanent
    }

    /// Returns true if no attempt may follow attempt number `attempt`.
    #[must_use]
    pub fn is_exhausted(&self, attempt: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempt >= max)
    }
}
