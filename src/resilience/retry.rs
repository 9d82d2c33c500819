//! Retry policy implementation.

use std::future::Future;
use std::time::Duration;
use tracing::instrument;

use crate::errors::ProviderError;

/// Which error classes a [`RetryPolicy`] retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryOn {
    /// Rate limits, timeouts, network faults and 5xx responses.
    #[default]
    Transient,
    /// Only timeouts and rate limits; everything else fails at once.
    TimeoutOrRateLimit,
}

impl RetryOn {
    fn matches(&self, err: &ProviderError) -> bool {
        match self {
            RetryOn::Transient => err.is_retryable(),
            RetryOn::TimeoutOrRateLimit => err.is_timeout() || err.is_rate_limit(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first call.
    pub max_retries: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Delay multiplier for exponential backoff.
    pub multiplier: f64,
    /// Whether to add jitter.
    pub jitter: bool,
    /// Error classes that trigger a retry.
    pub retry_on: RetryOn,
    /// Extra factor applied to the backoff after a rate-limit response.
    pub rate_limit_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: true,
            retry_on: RetryOn::Transient,
            rate_limit_multiplier: 1.0,
        }
    }
}

impl RetryConfig {
    /// Creates a new retry configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of retries.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the initial delay.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the multiplier.
    pub fn multiplier(mut self, mult: f64) -> Self {
        self.multiplier = mult;
        self
    }

    /// Sets whether to use jitter.
    pub fn jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Sets which errors are retried.
    pub fn retry_on(mut self, retry_on: RetryOn) -> Self {
        self.retry_on = retry_on;
        self
    }

    /// Sets the extra backoff factor for rate limits.
    pub fn rate_limit_multiplier(mut self, mult: f64) -> Self {
        self.rate_limit_multiplier = mult;
        self
    }

    /// Creates a configuration with no retries.
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Three attempts in total, 1s then 2s apart, only on timeouts and rate
    /// limits, with rate-limit waits doubled.
    pub fn long_running() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            jitter: false,
            retry_on: RetryOn::TimeoutOrRateLimit,
            rate_limit_multiplier: 2.0,
        }
    }
}

/// Retry policy with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Creates a new retry policy.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Executes an operation with retries.
    #[instrument(skip(self, operation), fields(max_retries = self.config.max_retries))]
    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T, ProviderError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    if !self.config.retry_on.matches(&err) || attempt >= self.config.max_retries {
                        return Err(err);
                    }

                    let delay = self.calculate_delay(attempt, &err);

                    tracing::info!(
                        attempt = attempt + 1,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying after error"
                    );

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Calculates the delay for a retry attempt.
    fn calculate_delay(&self, attempt: u32, error: &ProviderError) -> Duration {
        if let Some(retry_after) = error.retry_after() {
            return retry_after.min(self.config.max_delay);
        }

        let mut delay_ms = self.config.initial_delay.as_millis() as f64
            * self.config.multiplier.powi(attempt as i32);

        if error.is_rate_limit() {
            delay_ms *= self.config.rate_limit_multiplier;
        }

        let delay_ms = delay_ms.min(self.config.max_delay.as_millis() as f64);

        // 0-25% random variation
        let delay_ms = if self.config.jitter {
            let jitter = rand::random::<f64>() * 0.25;
            delay_ms * (1.0 + jitter)
        } else {
            delay_ms
        };

        Duration::from_millis(delay_ms as u64)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn server_error() -> ProviderError {
        ProviderError::Server {
            message: "error".to_string(),
            status_code: 500,
            request_id: None,
        }
    }

    fn timeout() -> ProviderError {
        ProviderError::Timeout {
            message: "deadline".to_string(),
        }
    }

    #[tokio::test]
    async fn test_retry_success_after_failures() {
        let config = RetryConfig::new()
            .max_retries(3)
            .initial_delay(Duration::from_millis(10))
            .jitter(false);

        let policy = RetryPolicy::new(config);
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = policy
            .execute(|| {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    let count = attempts.fetch_add(1, Ordering::SeqCst);
                    if count < 2 {
                        Err(server_error())
                    } else {
                        Ok("success")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_retries_runs_once() {
        let policy = RetryPolicy::new(RetryConfig::no_retries());
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = policy
            .execute(|| {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(timeout())
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_or_rate_limit_skips_server_errors() {
        let policy = RetryPolicy::new(RetryConfig::long_running());
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = policy
            .execute(|| {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(server_error())
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_running_gives_up_after_three_attempts() {
        let policy = RetryPolicy::new(RetryConfig::long_running());
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = policy
            .execute(|| {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(timeout())
                }
            })
            .await;

        assert!(result.unwrap_err().is_timeout());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_delay_calculation() {
        let policy = RetryPolicy::new(RetryConfig::long_running());

        assert_eq!(policy.calculate_delay(0, &timeout()), Duration::from_secs(1));
        assert_eq!(policy.calculate_delay(1, &timeout()), Duration::from_secs(2));

        let limited = ProviderError::RateLimit {
            message: "slow down".to_string(),
            retry_after: None,
        };
        assert_eq!(policy.calculate_delay(0, &limited), Duration::from_secs(2));
        assert_eq!(policy.calculate_delay(1, &limited), Duration::from_secs(4));
    }

    #[test]
    fn test_retry_after_header_wins() {
        let policy = RetryPolicy::new(RetryConfig::long_running());
        let limited = ProviderError::RateLimit {
            message: "slow down".to_string(),
            retry_after: Some(Duration::from_secs(9)),
        };

        assert_eq!(policy.calculate_delay(0, &limited), Duration::from_secs(9));
    }
}
