//! Bounded retry with exponential backoff for user API calls.

use crate::error::{UserApiError, UserApiResult};
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy configuration.
///
/// These calls run inside an authentication attempt whose overall
/// deadline is enforced externally, so the default retry budget is small.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (0 = no retries).
    pub max_retries: u32,
    /// Base delay in seconds for exponential backoff.
    pub base_delay_secs: u64,
    /// Maximum delay cap in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_secs: 1,
            max_delay_secs: 10,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy with the given max retries and base delay.
    /// The maximum delay cap defaults to 10 seconds.
    #[must_use]
    pub fn new(max_retries: u32, base_delay_secs: u64) -> Self {
        Self {
            max_retries,
            base_delay_secs,
            max_delay_secs: 10,
        }
    }

    /// Whether the error should be retried at the given attempt number.
    #[must_use]
    pub fn should_retry(&self, attempt: u32, error: &UserApiError) -> bool {
        if attempt >= self.max_retries {
            return false;
        }
        error.is_retryable() || error.is_server_error()
    }

    /// Calculate delay for the given attempt using exponential backoff.
    ///
    /// A [`UserApiError::RateLimited`] with a `retry_after_secs` value
    /// overrides the backoff (capped at `max_delay_secs`).
    #[must_use]
    pub fn delay_for(&self, attempt: u32, error: &UserApiError) -> Duration {
        let secs = if let UserApiError::RateLimited {
            retry_after_secs: Some(retry_after),
        } = error
        {
            (*retry_after).min(self.max_delay_secs)
        } else {
            let exponential = self
                .base_delay_secs
                .saturating_mul(2u64.saturating_pow(attempt));
            exponential.min(self.max_delay_secs)
        };
        Duration::from_secs(secs)
    }

    /// Execute an async operation with retry.
    ///
    /// The closure `f` is called repeatedly until it succeeds, a
    /// non-retryable error is encountered, or the retry budget is
    /// exhausted.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut f: F) -> UserApiResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = UserApiResult<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(
                            operation = operation_name,
                            attempt = attempt + 1,
                            "Operation succeeded after retries"
                        );
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !self.should_retry(attempt, &error) {
                        if attempt >= self.max_retries && (error.is_retryable() || error.is_server_error()) {
                            warn!(
                                operation = operation_name,
                                attempts = attempt + 1,
                                error = %error,
                                "Max retries exceeded"
                            );
                            return Err(UserApiError::MaxRetriesExceeded {
                                attempts: attempt + 1,
                                message: format!(
                                    "{operation_name} failed after {} attempt(s): {error}",
                                    attempt + 1
                                ),
                            });
                        }
                        // Non-retryable error, return immediately.
                        return Err(error);
                    }

                    let delay = self.delay_for(attempt, &error);
                    debug!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_secs = delay.as_secs(),
                        error = %error,
                        "Retrying after transient error"
                    );

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn server_error() -> UserApiError {
        UserApiError::Api {
            status: 503,
            detail: "service unavailable".to_string(),
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.base_delay_secs, 1);
        assert_eq!(policy.max_delay_secs, 10);
    }

    #[test]
    fn test_should_retry_transient_errors() {
        let policy = RetryPolicy::new(2, 1);
        let rate_limited = UserApiError::RateLimited {
            retry_after_secs: None,
        };

        assert!(policy.should_retry(0, &rate_limited));
        assert!(policy.should_retry(1, &rate_limited));
        assert!(!policy.should_retry(2, &rate_limited)); // at max

        assert!(policy.should_retry(0, &server_error()));
    }

    #[test]
    fn test_should_not_retry_client_errors() {
        let policy = RetryPolicy::new(2, 1);

        assert!(!policy.should_retry(0, &UserApiError::NotFound("user-1".to_string())));
        assert!(!policy.should_retry(0, &UserApiError::Auth("bad token".to_string())));
        assert!(!policy.should_retry(
            0,
            &UserApiError::Api {
                status: 400,
                detail: "bad request".to_string(),
            }
        ));
    }

    #[test]
    fn test_delay_exponential_backoff() {
        let policy = RetryPolicy::new(5, 1);

        assert_eq!(policy.delay_for(0, &server_error()), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1, &server_error()), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2, &server_error()), Duration::from_secs(4));
        // Capped at max_delay_secs.
        assert_eq!(policy.delay_for(6, &server_error()), Duration::from_secs(10));
    }

    #[test]
    fn test_delay_honors_retry_after() {
        let policy = RetryPolicy::new(2, 1);
        let error = UserApiError::RateLimited {
            retry_after_secs: Some(7),
        };
        assert_eq!(policy.delay_for(0, &error), Duration::from_secs(7));

        let error = UserApiError::RateLimited {
            retry_after_secs: Some(120),
        };
        assert_eq!(policy.delay_for(0, &error), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_execute_succeeds_first_try() {
        let policy = RetryPolicy::new(2, 0);
        let result = policy
            .execute("test_op", || async { Ok::<_, UserApiError>(42) })
            .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_execute_succeeds_after_retries() {
        let policy = RetryPolicy::new(2, 0);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = policy
            .execute("test_op", move || {
                let counter = counter_clone.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(server_error())
                    } else {
                        Ok(99)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 99);
        assert_eq!(counter.load(Ordering::SeqCst), 3); // initial + 2 retries
    }

    #[tokio::test]
    async fn test_execute_non_retryable_fails_immediately() {
        let policy = RetryPolicy::new(2, 0);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: UserApiResult<()> = policy
            .execute("test_op", move || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(UserApiError::NotFound("user-1".to_string()))
                }
            })
            .await;

        assert!(matches!(result, Err(UserApiError::NotFound(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execute_max_retries_exceeded() {
        let policy = RetryPolicy::new(2, 0);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: UserApiResult<()> = policy
            .execute("test_op", move || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(server_error())
                }
            })
            .await;

        match result {
            Err(UserApiError::MaxRetriesExceeded { attempts, .. }) => {
                assert_eq!(attempts, 3); // 1 initial + 2 retries
            }
            other => panic!("Expected MaxRetriesExceeded, got: {other:?}"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }
}
