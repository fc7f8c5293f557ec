//! Retry logic with exponential backoff
//!
//! Rate-limited calls are retried on a fixed doubling schedule:
//! `base_delay * 2^attempt`. Any other failure is surfaced immediately.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::ProviderError;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt
    pub max_retries: u32,

    /// Base delay between retries (seconds)
    pub base_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_secs: 10,
        }
    }
}

impl RetryConfig {
    /// Create a config with no retries
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Total number of attempts this config allows
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Calculate delay for a given attempt (0-indexed), doubling each time
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let secs = self
            .base_delay_secs
            .saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_secs(secs)
    }
}

/// Error classification for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClassification {
    /// Should not retry (permanent error)
    NoRetry,

    /// Rate limited - retry on the backoff schedule
    RateLimited,
}

/// Trait for errors that can be classified for retry
pub trait RetryableError {
    fn classify(&self) -> RetryClassification;
}

/// Execute an async operation, retrying rate-limited failures.
///
/// Makes up to `max_retries + 1` attempts. When the budget is spent the
/// last failure is wrapped in [`ProviderError::RetriesExhausted`] so the
/// caller sees both the diagnosis and the original cause.
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => match e.classify() {
                RetryClassification::NoRetry => {
                    debug!(
                        "{}: non-retryable error on attempt {}: {}",
                        operation_name,
                        attempt + 1,
                        e
                    );
                    return Err(e);
                }
                RetryClassification::RateLimited => {
                    if attempt >= config.max_retries {
                        warn!(
                            "{}: rate limited, giving up after {} attempts",
                            operation_name,
                            attempt + 1
                        );
                        return Err(ProviderError::retries_exhausted(
                            operation_name,
                            attempt + 1,
                            e,
                        ));
                    }

                    let delay = config.delay_for_attempt(attempt);
                    warn!(
                        "{}: rate limited on attempt {}/{}, retrying in {:?}: {}",
                        operation_name,
                        attempt + 1,
                        config.max_attempts(),
                        delay,
                        e
                    );

                    sleep(delay).await;
                    attempt += 1;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn rate_limited() -> ProviderError {
        ProviderError::RateLimited {
            message: "RESOURCE_EXHAUSTED".to_string(),
            retry_after_ms: None,
        }
    }

    #[test]
    fn test_delay_calculation() {
        let config = RetryConfig {
            max_retries: 5,
            base_delay_secs: 10,
        };

        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(10));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(20));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(40));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(80));
    }

    #[test]
    fn test_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.base_delay_secs, 10);
        assert_eq!(config.max_attempts(), 6);
    }

    #[tokio::test]
    async fn test_exhaustion_makes_max_retries_plus_one_attempts() {
        let config = RetryConfig {
            max_retries: 3,
            base_delay_secs: 0,
        };
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retry(&config, "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(rate_limited())
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        match result.unwrap_err() {
            ProviderError::RetriesExhausted {
                attempts, source, ..
            } => {
                assert_eq!(attempts, 4);
                assert!(matches!(*source, ProviderError::RateLimited { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_retryable_fails_on_first_attempt() {
        let config = RetryConfig::default();
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retry(&config, "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Authentication("bad key".to_string()))
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result.unwrap_err(),
            ProviderError::Authentication(_)
        ));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_rate_limit() {
        let config = RetryConfig {
            max_retries: 5,
            base_delay_secs: 0,
        };
        let calls = AtomicU32::new(0);

        let result = with_retry(&config, "test", || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(rate_limited())
            } else {
                Ok("ok")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_retries_single_attempt() {
        let config = RetryConfig::no_retry();
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retry(&config, "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(rate_limited())
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result.unwrap_err(),
            ProviderError::RetriesExhausted { attempts: 1, .. }
        ));
    }
}
