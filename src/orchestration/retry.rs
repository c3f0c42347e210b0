//! Retry with Exponential Backoff
//!
//! Retries failed service calls a bounded number of times. The delay starts at
//! `initial_delay` and doubles per attempt (1s, 2s, 4s with defaults), capped
//! at `max_delay`.
//!
//! Client errors (`HTTP 4xx`) and timeouts are surfaced immediately; see
//! [`ErrorClassifier::should_retry`].

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tracing::warn;

use crate::config::RetryConfig;
use crate::constants::retry as retry_constants;
use crate::types::{ErrorClassifier, PhotomonixError, Result};

/// Retry behaviour for one wrapped call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Backoff multiplier
    pub factor: f32,
    /// Cap for a single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: retry_constants::DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(retry_constants::INITIAL_DELAY_MS),
            factor: retry_constants::BACKOFF_FACTOR,
            max_delay: Duration::from_secs(retry_constants::MAX_DELAY_SECS),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            factor: config.factor,
            max_delay: Duration::from_secs(config.max_delay_secs),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_factor(self.factor)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries)
    }
}

/// Run `operation`, retrying retryable failures per `policy`.
///
/// The last error is returned once retries are exhausted.
pub async fn call_with_retry<T, F, Fut>(policy: &RetryPolicy, operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    operation
        .retry(policy.backoff())
        .sleep(tokio::time::sleep)
        .when(ErrorClassifier::should_retry)
        .notify(|err: &PhotomonixError, delay: Duration| {
            warn!(
                error = %err,
                category = %err.category(),
                delay_ms = delay.as_millis() as u64,
                "Call failed, retrying after backoff"
            );
        })
        .await
}
