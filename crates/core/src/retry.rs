//! Exponential backoff retry utility
//!
//! Provides a configurable retry mechanism with exponential backoff and
//! jitter for transient failures, primarily used while establishing the
//! database pool at service startup.
//!
//! # Examples
//!
//! ```
//! use bookstar_core::retry::{retry_with_backoff, RetryPolicy};
//!
//! async fn fallible_operation() -> Result<String, std::io::Error> {
//!     Ok("success".to_string())
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let result = retry_with_backoff(
//!     || async { fallible_operation().await },
//!     RetryPolicy::default(),
//!     |err: &std::io::Error| err.kind() == std::io::ErrorKind::ConnectionRefused,
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry policy configuration for exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (0 means only the initial attempt)
    pub max_retries: u32,

    /// Base delay in milliseconds for the first retry
    pub base_delay_ms: u64,

    /// Maximum delay in milliseconds to cap exponential growth
    pub max_delay_ms: u64,

    /// Whether to add random jitter to delays
    pub jitter: bool,
}

impl Default for RetryPolicy {
    /// Default policy: 3 retries, 100ms base delay, 5s cap, jitter on
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 5000,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Create a retry policy with custom parameters
    pub fn new(max_retries: u32, base_delay_ms: u64, max_delay_ms: u64, jitter: bool) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms,
            jitter,
        }
    }

    /// Startup policy: more patient, for operations that must eventually
    /// succeed before the service can serve traffic (e.g. the first
    /// database connection).
    pub fn startup() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            jitter: true,
        }
    }

    /// Calculate the delay for a given retry attempt
    ///
    /// delay = min(base * 2^attempt, max_delay), plus up to 30% jitter.
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponential_delay = self
            .base_delay_ms
            .saturating_mul(2_u64.saturating_pow(attempt));

        let capped_delay = exponential_delay.min(self.max_delay_ms);

        let final_delay = if self.jitter {
            let jitter_range = (capped_delay as f64 * 0.3) as u64;
            let jitter = if jitter_range > 0 {
                rand::thread_rng().gen_range(0..=jitter_range)
            } else {
                0
            };
            capped_delay.saturating_add(jitter)
        } else {
            capped_delay
        };

        Duration::from_millis(final_delay)
    }
}

/// Retry an async operation with exponential backoff
///
/// Executes the operation and retries on failure according to the policy,
/// but only while `is_retryable` returns true for the error.
pub async fn retry_with_backoff<F, Fut, T, E, P>(
    mut operation: F,
    policy: RetryPolicy,
    is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => {
                tracing::debug!(attempt, "Operation succeeded");
                return Ok(result);
            }
            Err(error) => {
                if attempt >= policy.max_retries {
                    tracing::warn!(
                        attempt,
                        max_retries = policy.max_retries,
                        "All retry attempts exhausted"
                    );
                    return Err(error);
                }

                if !is_retryable(&error) {
                    tracing::debug!(attempt, "Error is not retryable, failing immediately");
                    return Err(error);
                }

                let delay = policy.calculate_delay(attempt);
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying after delay"
                );

                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
