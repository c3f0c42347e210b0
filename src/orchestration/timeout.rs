//! Per-call Timeouts
//!
//! Every outbound call gets its own deadline. When the deadline passes the
//! in-flight future is dropped, which aborts the underlying request.

use std::future::Future;
use std::time::Duration;

use crate::config::TimeoutsConfig;
use crate::types::{PhotomonixError, Result};

/// Resolved timeout durations for each call type
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Image analysis (default: 30 seconds)
    pub suggestion: Duration,
    /// Image generation (default: 60 seconds)
    pub generation: Duration,
    /// Service health checks (default: 5 seconds)
    pub health: Duration,
    /// Auth and token tracking calls (default: 15 seconds)
    pub auth: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from(&TimeoutsConfig::default())
    }
}

impl From<&TimeoutsConfig> for TimeoutConfig {
    fn from(config: &TimeoutsConfig) -> Self {
        Self {
            suggestion: Duration::from_secs(config.suggestion_secs),
            generation: Duration::from_secs(config.generation_secs),
            health: Duration::from_secs(config.health_secs),
            auth: Duration::from_secs(config.auth_secs),
        }
    }
}

/// Execute an async operation with a timeout
///
/// Returns a timeout error if the operation doesn't complete within the specified duration.
///
/// # Example
///
/// ```ignore
/// let response = with_timeout(
///     Duration::from_secs(30),
///     async { client.post(url).send().await.map_err(transport_error) },
///     "Image analysis is taking too long"
/// ).await?;
/// ```
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(PhotomonixError::timeout(operation_name, timeout)),
    }
}
