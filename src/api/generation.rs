//! Generation Service Client
//!
//! Uploads the image with the selected options to `/image-to-image` and
//! decodes the returned base64 variants. The service gives no progress, so
//! a time-based estimate is reported until the response arrives.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::Form;
use serde::Deserialize;
use tracing::{debug, info};

use super::{
    GenerationService, build_http_client, endpoint_url, error_from_response, transport_error,
};
use crate::config::Config;
use crate::constants::{endpoints, network, services};
use crate::orchestration::{ProgressCallback, ProgressEstimator, TimeoutConfig, with_timeout};
use crate::types::{
    GeneratedImage, GenerationRequest, GenerationResult, PhotomonixError, Result,
};

const TIMEOUT_MESSAGE: &str =
    "Image generation is taking too long. Please try again or use a simpler enhancement.";
const FALLBACK_ERROR: &str = "Failed to generate images";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    images: Option<Vec<String>>,
    #[serde(default)]
    prompt_used: String,
    #[serde(default)]
    enh_text: String,
    #[serde(default)]
    error: Option<String>,
}

impl GenerateResponse {
    fn into_result(self) -> Result<GenerationResult> {
        if let Some(error) = self.error.filter(|e| !e.trim().is_empty()) {
            return Err(PhotomonixError::Service(error));
        }

        let encoded = self
            .images
            .ok_or_else(|| PhotomonixError::InvalidResponse("image service".to_string()))?;
        let images = encoded
            .iter()
            .map(|b64| GeneratedImage::from_base64(b64))
            .collect::<Result<Vec<_>>>()?;

        Ok(GenerationResult {
            images,
            prompt_used: self.prompt_used,
            enh_text: self.enh_text,
        })
    }
}

/// HTTP client for the generation service
#[derive(Debug, Clone)]
pub struct GenerationClient {
    base_url: String,
    timeout: Duration,
    estimator: ProgressEstimator,
    client: reqwest::Client,
}

impl GenerationClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        estimator: ProgressEstimator,
    ) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            timeout,
            estimator,
            client: build_http_client(timeout + Duration::from_secs(5))?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.services.generation_url.clone(),
            TimeoutConfig::from(&config.timeouts).generation,
            ProgressEstimator::from(&config.progress),
        )
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(
            services::DEFAULT_GENERATION_URL,
            Duration::from_secs(network::GENERATION_TIMEOUT_SECS),
            ProgressEstimator::default(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_form(request: &GenerationRequest) -> Result<Form> {
        let selected = serde_json::to_string(&request.options.cleaned())?;
        let mut form = Form::new()
            .part("file", request.image.to_part()?)
            .text("selected", selected);

        let notes = request.reference_notes.trim();
        if !notes.is_empty() {
            form = form.text("reference_notes", notes.to_string());
        }
        Ok(form)
    }

    async fn post_request(
        &self,
        request: &GenerationRequest,
        progress: Option<&ProgressCallback>,
    ) -> Result<GenerationResult> {
        let url = endpoint_url(&self.base_url, endpoints::GENERATE);
        let form = Self::build_form(request)?;

        debug!(
            url = %url,
            bytes = request.image.len(),
            categories = request.options.0.len(),
            "Requesting generation"
        );

        let send = async {
            self.client
                .post(&url)
                .multipart(form)
                .send()
                .await
                .map_err(transport_error)
        };
        // 100 marks the response arriving, whatever its status or body
        let response = self.estimator.track(send, progress).await?;

        if !response.status().is_success() {
            return Err(error_from_response(response, FALLBACK_ERROR).await);
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            debug!(error = %e, "Generation body did not parse");
            PhotomonixError::InvalidResponse("image service".to_string())
        })?;
        body.into_result()
    }
}

#[async_trait]
impl GenerationService for GenerationClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
        progress: Option<&ProgressCallback>,
    ) -> Result<GenerationResult> {
        let result = with_timeout(
            self.timeout,
            self.post_request(request, progress),
            TIMEOUT_MESSAGE,
        )
        .await?;
        info!(images = result.images.len(), "Generation completed");
        Ok(result)
    }

    fn name(&self) -> &str {
        "generation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<GenerationResult> {
        serde_json::from_str::<GenerateResponse>(json)
            .unwrap()
            .into_result()
    }

    #[test]
    fn test_response_decodes_images() {
        let result =
            parse(r#"{"images":["iVBORw0KGgo="],"prompt_used":"p","enh_text":"Background: White"}"#)
                .unwrap();
        assert_eq!(result.images.len(), 1);
        assert_eq!(result.images[0].bytes, b"\x89PNG\r\n\x1a\n");
        assert_eq!(result.prompt_used, "p");
        assert_eq!(result.enh_text, "Background: White");
    }

    #[test]
    fn test_body_error_wins() {
        let err = parse(r#"{"images":[],"error":"GPU out of memory"}"#).unwrap_err();
        assert!(matches!(err, PhotomonixError::Service(ref m) if m == "GPU out of memory"));
    }

    #[test]
    fn test_missing_images_is_invalid() {
        let err = parse(r#"{"prompt_used":"p"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Invalid response format from image service");
    }

    #[test]
    fn test_blank_error_is_ignored() {
        let result = parse(r#"{"images":[],"error":""}"#).unwrap();
        assert!(result.images.is_empty());
    }
}
