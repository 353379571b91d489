//! Bounded retry with a fixed delay between attempts.
//!
//! The contract is narrow: at most `max_attempts` calls, the
//! same `delay` before every call after the first, and a single
//! [`RetryExhausted`] carrying the last error once the budget is spent.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{FetchError, RetryExhausted};

/// Suspends the current run for a fixed duration.
pub trait Sleeper: Send + Sync {
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Configuration for the retry controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of calls, including the first one.
    pub max_attempts: u32,
    /// Delay slept before each retry.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(4),
        }
    }
}

impl RetryConfig {
    pub fn fixed(delay: Duration, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// A single attempt and no sleep.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    /// Runs `operation` until it succeeds, fails terminally or the budget is spent.
    ///
    /// The operation receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(
        &self,
        label: &str,
        sleeper: &dyn Sleeper,
        mut operation: F,
    ) -> Result<T, RetryExhausted>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            info!(
                target: "fxsnap::retry",
                source = label,
                attempt,
                max_attempts,
                "attempt {attempt}/{max_attempts}"
            );

            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    warn!(
                        target: "fxsnap::retry",
                        source = label,
                        attempt,
                        code = error.code(),
                        "attempt failed: {}",
                        error.message()
                    );

                    if !error.retryable() || attempt >= max_attempts {
                        return Err(RetryExhausted {
                            attempts: attempt,
                            last: error,
                        });
                    }

                    let delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX);
                    info!(
                        target: "fxsnap::retry",
                        source = label,
                        delay_ms,
                        "waiting before retry"
                    );
                    sleeper.sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
