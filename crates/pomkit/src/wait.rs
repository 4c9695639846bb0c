//! Bounded polling.
//!
//! Every suspending primitive is built on [`poll_until`]: probe, sleep for the
//! poll interval, probe again, until the probe is ready or the budget runs out.
//! There are no unbounded waits and no fixed sleeps in page objects.

use crate::result::PomResult;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Default timeout for wait operations (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// What a single probe observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    /// Condition holds; stop waiting
    Ready(T),
    /// Condition does not hold yet, with the reason
    Pending(String),
}

/// How a wait ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    /// The probe became ready
    Ready(T),
    /// The budget ran out; carries the last pending reason
    TimedOut {
        /// Time spent waiting
        elapsed: Duration,
        /// Last reason the condition did not hold
        reason: String,
    },
}

/// Poll `probe` until it is ready or `options.timeout()` elapses.
///
/// The probe always runs at least once, even with a zero budget. Driver errors
/// from the probe end the wait immediately.
pub async fn poll_until<T, F, Fut>(
    options: WaitOptions,
    description: &str,
    mut probe: F,
) -> PomResult<WaitOutcome<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PomResult<Probe<T>>>,
{
    let start = Instant::now();
    let deadline = start + options.timeout();
    loop {
        let reason = match probe().await? {
            Probe::Ready(value) => return Ok(WaitOutcome::Ready(value)),
            Probe::Pending(reason) => reason,
        };
        let now = Instant::now();
        if now >= deadline {
            tracing::debug!(wait = description, %reason, "wait budget exhausted");
            return Ok(WaitOutcome::TimedOut {
                elapsed: now - start,
                reason,
            });
        }
        let remaining = deadline - now;
        tokio::time::sleep(options.poll_interval().min(remaining)).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::result::PomError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_default() {
            let options = WaitOptions::default();
            assert_eq!(options.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(options.poll_interval(), Duration::from_millis(50));
        }

        #[test]
        fn test_chained() {
            let options = WaitOptions::new().with_timeout(200).with_poll_interval(10);
            assert_eq!(options.timeout(), Duration::from_millis(200));
            assert_eq!(options.poll_interval_ms, 10);
        }
    }

    mod poll_until_tests {
        use super::*;

        #[tokio::test]
        async fn test_ready_after_a_few_polls() {
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&calls);
            let options = WaitOptions::new().with_timeout(1_000).with_poll_interval(5);
            let outcome = poll_until(options, "counter", || {
                let counter = Arc::clone(&counter);
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok(if n >= 3 {
                        Probe::Ready(n)
                    } else {
                        Probe::Pending(format!("only {n}"))
                    })
                }
            })
            .await
            .unwrap();
            assert_eq!(outcome, WaitOutcome::Ready(3));
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn test_times_out_with_last_reason() {
            let options = WaitOptions::new().with_timeout(30).with_poll_interval(5);
            let outcome: WaitOutcome<()> = poll_until(options, "never", || async {
                Ok(Probe::Pending("still hidden".to_string()))
            })
            .await
            .unwrap();
            match outcome {
                WaitOutcome::TimedOut { elapsed, reason } => {
                    assert!(elapsed >= Duration::from_millis(30));
                    assert_eq!(reason, "still hidden");
                }
                WaitOutcome::Ready(()) => panic!("expected timeout"),
            }
        }

        #[tokio::test]
        async fn test_zero_budget_probes_once() {
            let options = WaitOptions::new().with_timeout(0);
            let outcome = poll_until(options, "instant", || async { Ok(Probe::Ready(7)) })
                .await
                .unwrap();
            assert_eq!(outcome, WaitOutcome::Ready(7));
        }

        #[tokio::test]
        async fn test_probe_error_propagates() {
            let options = WaitOptions::new().with_timeout(1_000);
            let result: PomResult<WaitOutcome<()>> =
                poll_until(options, "broken", || async { Err(PomError::driver("gone")) }).await;
            assert!(matches!(result, Err(PomError::Driver { .. })));
        }
    }
}
