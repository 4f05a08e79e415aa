//! Retrying destination calls.
//!
//! Every destination call goes through a [`RetryingDriver`]. With the default
//! policy a call is re-invoked after a fixed delay until it succeeds; a run
//! stalls on a broken destination rather than skipping ahead and breaking
//! the replay order.

mod error;
mod policy;

pub use error::RetryError;
pub use policy::{RetryPolicy, DEFAULT_RETRY_DELAY};

use crate::destination::DestinationError;
use crate::rate_limit::MAX_WAIT_SECS;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{error, warn};

/// Runs destination calls under a [`RetryPolicy`].
#[derive(Debug, Default)]
pub struct RetryingDriver {
    policy: RetryPolicy,
    retries: AtomicU64,
}

impl RetryingDriver {
    /// Creates a driver for a policy.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            retries: AtomicU64::new(0),
        }
    }

    /// Number of re-invocations performed so far.
    pub fn retries(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }

    /// Invokes `call` until it succeeds or the policy stops it.
    ///
    /// The operation must have no partial effect when it fails, since it is
    /// invoked again.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError`] only for bounded or fail-fast policies.
    pub async fn run<T, F, Fut>(
        &self,
        operation: &'static str,
        mut call: F,
    ) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DestinationError>>,
    {
        let mut attempt: u32 = 1;
        loop {
            let error = match call().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if error.is_permanent() && self.policy.fail_fast_on_permanent() {
                error!(operation, error = %error, "Destination call failed permanently");
                return Err(RetryError::Permanent {
                    operation,
                    source: error,
                });
            }

            if self.policy.is_exhausted(attempt) {
                error!(
                    operation,
                    attempts = attempt,
                    error = %error,
                    "Giving up on destination call"
                );
                return Err(RetryError::Exhausted {
                    operation,
                    attempts: attempt,
                    source: error,
                });
            }

            let delay = self.delay_after(&error);
            warn!(
                operation,
                attempt,
                error = %error,
                delay_ms = delay.as_millis() as u64,
                "Destination call failed, retrying"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            self.retries.fetch_add(1, Ordering::Relaxed);
            attempt = attempt.saturating_add(1);
        }
    }

    /// Delay before the next attempt, honouring a server-requested wait.
    fn delay_after(&self, error: &DestinationError) -> Duration {
        let requested = error
            .retry_after_secs()
            .map(|secs| Duration::from_secs(secs.min(MAX_WAIT_SECS)))
            .unwrap_or_default();
        self.policy.delay().max(requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::AtomicU32;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock().unwrap())
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn failing_times(
        failures: u32,
        error: DestinationError,
    ) -> (AtomicU32, impl Fn(&AtomicU32) -> Result<u32, DestinationError>) {
        let calls = AtomicU32::new(0);
        let call = move |calls: &AtomicU32| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= failures {
                Err(error.clone())
            } else {
                Ok(n)
            }
        };
        (calls, call)
    }

    #[tokio::test]
    async fn succeeds_first_time_without_retry() {
        let driver = RetryingDriver::new(RetryPolicy::unbounded(Duration::ZERO));
        let value = driver.run("noop", || async { Ok(7) }).await.unwrap();

        assert_eq!(value, 7);
        assert_eq!(driver.retries(), 0);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let driver = RetryingDriver::new(RetryPolicy::unbounded(Duration::ZERO));
        let (calls, call) = failing_times(5, DestinationError::remote("boom"));

        let value = driver
            .run("create issue", || std::future::ready(call(&calls)))
            .await
            .unwrap();

        assert_eq!(value, 6);
        assert_eq!(driver.retries(), 5);
    }

    #[tokio::test]
    async fn permission_denied_is_retried_by_default() {
        let driver = RetryingDriver::new(RetryPolicy::unbounded(Duration::ZERO));
        let denied = DestinationError::PermissionDenied {
            message: "no push access".to_string(),
        };
        let (calls, call) = failing_times(2, denied);

        assert!(driver
            .run("create issue", || std::future::ready(call(&calls)))
            .await
            .is_ok());
        assert_eq!(driver.retries(), 2);
    }

    #[tokio::test]
    async fn permission_denied_fails_fast_when_enabled() {
        let policy = RetryPolicy::unbounded(Duration::ZERO).with_fail_fast_on_permanent(true);
        let driver = RetryingDriver::new(policy);
        let denied = DestinationError::PermissionDenied {
            message: "no push access".to_string(),
        };
        let (calls, call) = failing_times(u32::MAX, denied);

        let result = driver.run("create issue", || std::future::ready(call(&calls))).await;

        assert!(matches!(result, Err(RetryError::Permanent { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(driver.retries(), 0);
    }

    #[tokio::test]
    async fn fail_fast_still_retries_transient_errors() {
        let policy = RetryPolicy::unbounded(Duration::ZERO).with_fail_fast_on_permanent(true);
        let driver = RetryingDriver::new(policy);
        let (calls, call) = failing_times(3, DestinationError::remote("timeout"));

        assert!(driver
            .run("create comment", || std::future::ready(call(&calls)))
            .await
            .is_ok());
        assert_eq!(driver.retries(), 3);
    }

    #[tokio::test]
    async fn bounded_policy_gives_up() {
        let driver = RetryingDriver::new(RetryPolicy::bounded(3, Duration::ZERO));
        let (calls, call) = failing_times(u32::MAX, DestinationError::remote("down"));

        let result = driver.run("edit issue", || std::future::ready(call(&calls))).await;

        assert!(matches!(
            result,
            Err(RetryError::Exhausted { attempts: 3, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(driver.retries(), 2);
    }

    #[test]
    fn retry_after_extends_delay() {
        let driver = RetryingDriver::new(RetryPolicy::unbounded(Duration::from_secs(10)));

        let throttled = DestinationError::RateLimited {
            retry_after_secs: Some(60),
        };
        assert_eq!(driver.delay_after(&throttled), Duration::from_secs(60));
        assert_eq!(
            driver.delay_after(&DestinationError::remote("x")),
            Duration::from_secs(10)
        );
    }

    #[tokio::test]
    async fn each_retry_logs_one_warning() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let driver = RetryingDriver::new(RetryPolicy::unbounded(Duration::ZERO));
        let (calls, call) = failing_times(2, DestinationError::remote("502 Bad Gateway"));
        driver
            .run("create issue", || std::future::ready(call(&calls)))
            .await
            .unwrap();

        let lines = logs.lines();
        assert_eq!(lines.len(), 2, "unexpected log output: {lines:?}");
        assert!(lines.iter().all(|line| line.contains("WARN")
            && line.contains("Destination call failed, retrying")
            && line.contains("502 Bad Gateway")));
    }
}
