//! Token Usage Tracking
//!
//! Reports tokens consumed by a generation to the user service. Tracking is
//! telemetry: failures are logged and a zeroed balance is returned.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, warn};

use super::{build_http_client, endpoint_url, error_from_response, transport_error};
use crate::config::Config;
use crate::constants::endpoints;
use crate::orchestration::{TimeoutConfig, with_timeout};
use crate::types::{PhotomonixError, Result, TokenUsage};

#[derive(Debug, Clone)]
pub struct TokenTracker {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl TokenTracker {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            timeout,
            client: build_http_client(timeout + Duration::from_secs(5))?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.services.auth_url.clone(),
            TimeoutConfig::from(&config.timeouts).auth,
        )
    }

    /// Record `tokens_used` for the user behind `access_token`.
    ///
    /// Never fails; on any error the result echoes `tokens_used` with a
    /// zero balance.
    pub async fn track(&self, tokens_used: u64, access_token: &SecretString) -> TokenUsage {
        match self.try_track(tokens_used, access_token).await {
            Ok(usage) => {
                debug!(
                    tokens_used = usage.tokens_used,
                    tokens_remaining = usage.tokens_remaining,
                    "Token usage recorded"
                );
                usage
            }
            Err(e) => {
                warn!(error = %e, tokens_used, "Token tracking failed");
                TokenUsage::untracked(tokens_used)
            }
        }
    }

    async fn try_track(&self, tokens_used: u64, access_token: &SecretString) -> Result<TokenUsage> {
        let url = endpoint_url(&self.base_url, endpoints::TOKEN_TRACKING);
        let request = self
            .client
            .post(&url)
            .bearer_auth(access_token.expose_secret())
            .json(&json!({ "tokens_used": tokens_used }));

        let response = with_timeout(
            self.timeout,
            async { request.send().await.map_err(transport_error) },
            "Token tracking is not responding",
        )
        .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "Failed to track tokens").await);
        }

        response
            .json::<TokenUsage>()
            .await
            .map_err(|_| PhotomonixError::InvalidResponse("token tracking".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failure_returns_untracked_usage() {
        let tracker = TokenTracker::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let token = SecretString::from("t".to_string());

        let usage = tracker.track(120, &token).await;
        assert_eq!(usage, TokenUsage::untracked(120));
        assert_eq!(usage.tokens_remaining, 0);
    }
}
