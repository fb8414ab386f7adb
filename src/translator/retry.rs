//! Retry Policy
//!
//! Bounded retry with linearly increasing delay for the translator façade.
//! Adapted from the usual exponential-backoff executor shape; the delay
//! here is `base_delay * attempt_number`, and whether an error is eligible
//! comes from [`EngineError::is_retryable`].

use std::time::Duration;

use tokio::time::sleep;

use crate::error::EngineError;

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, first try included.
    pub max_attempts: u32,
    /// Base delay; attempt `n` waits `base_delay * n` before retrying.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay after the `attempt`-th failure (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Run `operation` until it succeeds, a non-retryable error occurs, or
    /// attempts are exhausted; the last-seen error is surfaced.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, EngineError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, EngineError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if !error.is_retryable() {
                        return Err(error);
                    }
                    tracing::warn!(attempt, error = %error, "engine attempt failed");
                    last_error = Some(error);
                    if attempt < attempts {
                        sleep(self.delay_for(attempt)).await;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| EngineError::InternalError("retry loop without error".to_string())))
    }
}
