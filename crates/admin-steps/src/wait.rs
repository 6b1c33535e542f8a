//! Bounded polling waits.
//!
//! Both popin waits (open and close) go through [`poll_until`], so they share
//! one deadline/poll-interval policy.

use crate::result::{StepError, StepResult};
use std::time::{Duration, Instant};

/// Default timeout for popin waits (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

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

    /// Reject a zero poll interval, which would turn a wait into a busy loop
    pub fn validate(&self) -> StepResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(StepError::Config {
                message: "poll_interval_ms must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Result of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
}

/// Poll `predicate` until it returns `Ok(true)` or the deadline passes.
///
/// The predicate runs at least once, even with a zero timeout. An `Err` from
/// the predicate aborts the wait immediately.
///
/// # Errors
///
/// Returns [`StepError::Config`] for a zero poll interval (the predicate never
/// runs), [`StepError::Timeout`] when the deadline passes, or the first error
/// the predicate returns.
pub fn poll_until<F>(
    waited_for: &str,
    options: &WaitOptions,
    mut predicate: F,
) -> StepResult<WaitResult>
where
    F: FnMut() -> StepResult<bool>,
{
    options.validate()?;
    let start = Instant::now();
    let timeout = options.timeout();

    loop {
        if predicate()? {
            return Ok(WaitResult {
                elapsed: start.elapsed(),
                waited_for: waited_for.to_string(),
            });
        }
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            break;
        }
        std::thread::sleep(options.poll_interval().min(timeout - elapsed));
    }

    tracing::warn!(waited_for, timeout_ms = options.timeout_ms, "wait timed out");
    Err(StepError::Timeout {
        waited_for: waited_for.to_string(),
        ms: options.timeout_ms,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_wait_options_default() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_wait_options_chained() {
            let opts = WaitOptions::new().with_timeout(200).with_poll_interval(10);
            assert_eq!(opts.timeout(), Duration::from_millis(200));
            assert_eq!(opts.poll_interval(), Duration::from_millis(10));
        }

        #[test]
        fn test_wait_options_zero_interval_invalid() {
            assert!(WaitOptions::default().validate().is_ok());
            let err = WaitOptions::new().with_poll_interval(0).validate().unwrap_err();
            assert!(matches!(err, StepError::Config { .. }));
        }
    }

    mod poll_tests {
        use super::*;

        fn fast() -> WaitOptions {
            WaitOptions::new().with_timeout(100).with_poll_interval(5)
        }

        #[test]
        fn test_poll_immediate_success() {
            let result = poll_until("ready", &fast(), || Ok(true)).unwrap();
            assert_eq!(result.waited_for, "ready");
            assert!(result.elapsed < Duration::from_millis(100));
        }

        #[test]
        fn test_poll_becomes_true() {
            let mut calls = 0;
            let result = poll_until("third call", &fast(), || {
                calls += 1;
                Ok(calls >= 3)
            });
            assert!(result.is_ok());
            assert_eq!(calls, 3);
        }

        #[test]
        fn test_poll_timeout() {
            let err = poll_until("never", &fast(), || Ok(false)).unwrap_err();
            match err {
                StepError::Timeout { waited_for, ms } => {
                    assert_eq!(waited_for, "never");
                    assert_eq!(ms, 100);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_poll_zero_timeout_checks_once() {
            let mut calls = 0;
            let opts = WaitOptions::new().with_timeout(0);
            let result = poll_until("once", &opts, || {
                calls += 1;
                Ok(false)
            });
            assert!(matches!(result, Err(StepError::Timeout { .. })));
            assert_eq!(calls, 1);
        }

        #[test]
        fn test_poll_zero_interval_never_polls() {
            let mut calls = 0;
            let opts = WaitOptions::new().with_timeout(30).with_poll_interval(0);
            let err = poll_until("busy", &opts, || {
                calls += 1;
                Ok(false)
            })
            .unwrap_err();
            assert!(matches!(err, StepError::Config { .. }));
            assert_eq!(calls, 0);
        }

        #[test]
        fn test_poll_propagates_predicate_error() {
            let mut calls = 0;
            let err = poll_until("broken", &fast(), || {
                calls += 1;
                Err(StepError::session("gone"))
            })
            .unwrap_err();
            assert!(matches!(err, StepError::Session { .. }));
            assert_eq!(calls, 1);
        }
    }
}
