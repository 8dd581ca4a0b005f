//! Bounded fixed-delay retry.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::FetchError;

/// Default number of attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);

/// Errors that know whether another attempt could succeed.
pub trait Retryable {
    /// Returns true if the operation may be attempted again.
    fn is_retryable(&self) -> bool;
}

impl Retryable for FetchError {
    fn is_retryable(&self) -> bool {
        FetchError::is_retryable(self)
    }
}

/// How a retried operation ended.
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    /// An attempt succeeded.
    Success(T),
    /// A non-retryable error stopped the loop.
    Aborted(E),
    /// Every attempt failed.
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Error of the final attempt.
        last_error: E,
    },
}

/// Strategy for retrying failed requests.
///
/// The delay is fixed; there is no backoff.
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl RetryStrategy {
    /// Creates a strategy with the default delay.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: DEFAULT_DELAY,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    /// Sets the delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or
    /// runs out of attempts.
    ///
    /// `op` receives the 1-based attempt number. `on_retry(attempt, max,
    /// &error)` runs after a retryable failure, before the pause.
    pub async fn run<T, E, F, Fut, R>(&self, mut op: F, mut on_retry: R) -> RetryOutcome<T, E>
    where
        E: Retryable + std::fmt::Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: FnMut(u32, u32, &E),
    {
        let max = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => {
                    debug!(attempt, "Attempt succeeded");
                    return RetryOutcome::Success(value);
                }
                Err(e) if !e.is_retryable() => {
                    debug!(attempt, error = %e, "Non-retryable failure");
                    return RetryOutcome::Aborted(e);
                }
                Err(e) if attempt >= max => {
                    warn!(attempts = attempt, error = %e, "All attempts failed");
                    return RetryOutcome::Exhausted {
                        attempts: attempt,
                        last_error: e,
                    };
                }
                Err(e) => {
                    warn!(attempt, max, error = %e, "Attempt failed, retrying");
                    on_retry(attempt, max, &e);
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}
