//! Service Health Checks

use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use super::{build_http_client, endpoint_url};
use crate::config::Config;
use crate::constants::endpoints;
use crate::orchestration::TimeoutConfig;
use crate::types::{HealthReport, HealthStatus, Result, ServiceHealth};

const SUGGESTION_SERVICE: &str = "Suggestion Service";
const GENERATION_SERVICE: &str = "Generation Service";

/// Checks both AI services concurrently
#[derive(Debug, Clone)]
pub struct HealthChecker {
    suggestion_url: String,
    generation_url: String,
    client: reqwest::Client,
}

impl HealthChecker {
    pub fn new(
        suggestion_url: impl Into<String>,
        generation_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            suggestion_url: suggestion_url.into(),
            generation_url: generation_url.into(),
            client: build_http_client(timeout)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.services.suggestion_url.clone(),
            config.services.generation_url.clone(),
            TimeoutConfig::from(&config.timeouts).health,
        )
    }

    /// Check both services. Never fails; unreachable services are `offline`.
    pub async fn check(&self) -> HealthReport {
        let (suggestion, generation) = tokio::join!(
            self.check_service(&self.suggestion_url, SUGGESTION_SERVICE),
            self.check_service(&self.generation_url, GENERATION_SERVICE),
        );
        HealthReport {
            suggestion,
            generation,
        }
    }

    async fn check_service(&self, base_url: &str, service: &str) -> ServiceHealth {
        let url = endpoint_url(base_url, endpoints::HEALTH);
        let status = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => HealthStatus::Healthy,
            Ok(response) => {
                debug!(service, status = response.status().as_u16(), "Health check failed");
                HealthStatus::Offline
            }
            Err(e) => {
                debug!(service, error = %e, "Health check unreachable");
                HealthStatus::Offline
            }
        };

        ServiceHealth {
            status,
            service: service.to_string(),
            timestamp: Utc::now(),
        }
    }
}
