//! Suggestion Service Client
//!
//! Uploads an image to `/refine-image` and returns categorized enhancement
//! ideas (Background, Lighting, Style and optional extras).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::Form;
use tracing::{debug, info};

use super::{
    SuggestionService, build_http_client, endpoint_url, error_from_response, transport_error,
};
use crate::config::Config;
use crate::constants::{endpoints, network};
use crate::orchestration::{TimeoutConfig, with_timeout};
use crate::types::{ImageFile, PhotomonixError, Result, SuggestionSet};

const TIMEOUT_MESSAGE: &str =
    "Image analysis is taking too long. Please try with a smaller image.";
const FALLBACK_ERROR: &str = "Failed to get suggestions";

/// HTTP client for the suggestion service
#[derive(Debug, Clone)]
pub struct SuggestionClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl SuggestionClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            timeout,
            client: build_http_client(timeout + Duration::from_secs(5))?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.services.suggestion_url.clone(),
            TimeoutConfig::from(&config.timeouts).suggestion,
        )
    }

    /// Client with the default address and timeout
    pub fn with_defaults() -> Result<Self> {
        Self::new(
            crate::constants::services::DEFAULT_SUGGESTION_URL,
            Duration::from_secs(network::SUGGESTION_TIMEOUT_SECS),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_image(&self, image: &ImageFile) -> Result<SuggestionSet> {
        let url = endpoint_url(&self.base_url, endpoints::REFINE);
        let form = Form::new().part("file", image.to_part()?);

        debug!(url = %url, bytes = image.len(), "Requesting suggestions");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response, FALLBACK_ERROR).await);
        }

        let suggestions: SuggestionSet = response.json().await.map_err(|e| {
            debug!(error = %e, "Suggestion body did not parse");
            PhotomonixError::InvalidResponse("suggestion service".to_string())
        })?;
        suggestions.validate()?;
        Ok(suggestions)
    }
}

#[async_trait]
impl SuggestionService for SuggestionClient {
    async fn suggest(&self, image: &ImageFile) -> Result<SuggestionSet> {
        let suggestions = with_timeout(self.timeout, self.post_image(image), TIMEOUT_MESSAGE).await?;
        info!(
            categories = suggestions.0.len(),
            total = suggestions.total(),
            "Suggestions received"
        );
        Ok(suggestions)
    }

    fn name(&self) -> &str {
        "suggestion"
    }
}
