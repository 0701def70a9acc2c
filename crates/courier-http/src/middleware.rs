//! Fixed-delay retry for dispatch attempts

use std::time::Duration;

use tracing::{debug, warn};

use crate::{error::HttpError, Result};

/// When and how often a failed attempt is re-issued
///
/// Only timeouts and transport errors are retried, and only when a delay is
/// set. The delay is constant: no jitter, no growth. Without `max_attempts`
/// a persistently failing endpoint is retried until the caller drops the
/// future.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    delay: Option<Duration>,
    max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Never retry
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Retry forever, waiting `delay` between attempts
    pub fn fixed(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            max_attempts: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Cap the total number of attempts, the first one included
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts.max(1));
        self
    }

    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn is_enabled(&self) -> bool {
        self.delay.is_some()
    }

    /// Delay before the attempt following `attempt` (1-based), if any
    pub fn delay_after(&self, attempt: u32, error: &HttpError) -> Option<Duration> {
        if !error.is_retryable() {
            return None;
        }
        let delay = self.delay?;
        match self.max_attempts {
            Some(max) if attempt >= max => None,
            _ => Some(delay),
        }
    }

    /// Run `operation` until it succeeds or fails in a way this policy does not retry
    ///
    /// `operation` receives the 1-based attempt number. When the attempt cap
    /// stops a retry that would otherwise happen, the last error is wrapped
    /// in [`HttpError::RetryLimitExceeded`].
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Request succeeded after {} retries", attempt - 1);
                    }
                    return Ok(result);
                }
                Err(e) => {
                    if !e.is_retryable() || !self.is_enabled() {
                        debug!("Not retrying: {e}");
                        return Err(e);
                    }

                    match self.delay_after(attempt, &e) {
                        Some(delay) => {
                            warn!(
                                "Request failed (attempt {}), retrying in {:?}: {}",
                                attempt, delay, e
                            );
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        None => {
                            return Err(HttpError::RetryLimitExceeded {
                                attempts: attempt,
                                last: Box::new(e),
                            });
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn timeout() -> HttpError {
        HttpError::Timeout(Duration::from_secs(1))
    }

    #[test]
    fn test_delay_after() {
        let policy = RetryPolicy::fixed(Duration::from_millis(100)).with_max_attempts(3);

        assert_eq!(policy.delay_after(1, &timeout()), Some(Duration::from_millis(100)));
        assert_eq!(policy.delay_after(2, &timeout()), Some(Duration::from_millis(100)));
        assert_eq!(policy.delay_after(3, &timeout()), None);
        assert_eq!(
            policy.delay_after(1, &HttpError::InvalidRequest("x".into())),
            None
        );
    }

    #[test]
    fn test_delay_is_constant_without_cap() {
        let policy = RetryPolicy::fixed(Duration::from_millis(50));
        assert_eq!(policy.delay_after(1, &timeout()), Some(Duration::from_millis(50)));
        assert_eq!(policy.delay_after(1_000, &timeout()), Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_zero_cap_is_clamped() {
        let policy = RetryPolicy::disabled().with_max_attempts(0);
        assert_eq!(policy.max_attempts(), Some(1));
    }

    #[tokio::test]
    async fn test_retry_success_on_first_attempt() {
        let policy = RetryPolicy::fixed(Duration::from_millis(10));

        let result = policy.execute(|_| async { Ok::<_, HttpError>(42) }).await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_success_on_second_attempt() {
        let policy = RetryPolicy::fixed(Duration::from_millis(10));

        let result = policy
            .execute(|attempt| async move {
                if attempt == 1 {
                    Err(timeout())
                } else {
                    Ok(attempt)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_disabled_policy_returns_first_error() {
        let calls = AtomicU32::new(0);
        let result = RetryPolicy::disabled()
            .execute(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<i32, _>(timeout()) }
            })
            .await;

        assert!(matches!(result, Err(HttpError::Timeout(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_limit_exceeded() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::fixed(Duration::from_millis(10)).with_max_attempts(3);

        let result = policy
            .execute(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<i32, _>(HttpError::Transport("refused".into())) }
            })
            .await;

        assert!(matches!(
            result,
            Err(HttpError::RetryLimitExceeded { attempts: 3, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::fixed(Duration::from_millis(10));

        let result = policy
            .execute(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<i32, _>(HttpError::InvalidUrl("bad".to_string())) }
            })
            .await;

        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
