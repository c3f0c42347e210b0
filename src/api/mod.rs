//! HTTP Clients for the Photomonix Services
//!
//! The two AI services sit behind the [`SuggestionService`] and
//! [`GenerationService`] traits so orchestration can run against fakes.
//! Auth, token tracking and health checks are plain clients.
//!
//! ## Modules
//!
//! - `suggestion`: image analysis (`/refine-image`)
//! - `generation`: image-to-image enhancement (`/image-to-image`)
//! - `auth`: account endpoints with an in-memory session
//! - `tokens`: non-fatal token usage reporting
//! - `health`: concurrent reachability checks

mod auth;
mod generation;
mod health;
mod suggestion;
mod tokens;

pub use auth::{AuthClient, Credentials, Registration};
pub use generation::GenerationClient;
pub use health::HealthChecker;
pub use suggestion::SuggestionClient;
pub use tokens::TokenTracker;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::orchestration::ProgressCallback;
use crate::types::{
    GenerationRequest, GenerationResult, ImageFile, PhotomonixError, Result, SuggestionSet,
};

// =============================================================================
// Service Traits
// =============================================================================

/// Analyzes an image and proposes categorized enhancements
#[async_trait]
pub trait SuggestionService: Send + Sync {
    async fn suggest(&self, image: &ImageFile) -> Result<SuggestionSet>;

    /// Service name for logging
    fn name(&self) -> &str;
}

/// Produces enhanced variants of an image
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Run one generation, reporting estimated progress through `progress`
    async fn generate(
        &self,
        request: &GenerationRequest,
        progress: Option<&ProgressCallback>,
    ) -> Result<GenerationResult>;

    fn name(&self) -> &str;
}

pub type SharedSuggestionService = Arc<dyn SuggestionService>;
pub type SharedGenerationService = Arc<dyn GenerationService>;

// =============================================================================
// Shared HTTP Helpers
// =============================================================================

/// Build the reqwest client used by every service client.
///
/// Deadlines are applied per call with `with_timeout`; the client-level
/// timeout is only a backstop.
pub(crate) fn build_http_client(backstop: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(backstop)
        .build()
        .map_err(|e| PhotomonixError::Network(format!("Failed to create HTTP client: {}", e)))
}

/// Join a base URL and an endpoint path without doubling slashes
pub(crate) fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

pub(crate) fn transport_error(err: reqwest::Error) -> PhotomonixError {
    PhotomonixError::Network(err.to_string())
}

/// Pull the most specific message out of an error body
///
/// Services report failures as `detail`, `error` or `message`.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    ["detail", "error", "message"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Null | Value::String(_) => None,
            other => Some(other.to_string()),
        })
}

/// Turn a non-success response into `HTTP <status>: <message>`
pub(crate) async fn error_from_response(
    response: reqwest::Response,
    fallback: &str,
) -> PhotomonixError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| error_message(&value))
        .unwrap_or_else(|| fallback.to_string());
    debug!(status, message = %message, "Service returned error status");
    PhotomonixError::http(status, message)
}
