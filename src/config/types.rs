//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/photomonix/) and project (.photomonix/) level configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{cache, network, progress, retry, services, upload};
use crate::types::{PhotomonixError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Service base URLs
    pub services: ServicesConfig,

    /// Per-call timeouts
    pub timeouts: TimeoutsConfig,

    /// Retry wrapper settings
    pub retry: RetryConfig,

    /// Suggestion cache settings
    pub cache: CacheConfig,

    /// Upload validation and compression
    pub upload: UploadConfig,

    /// Simulated generation progress
    pub progress: ProgressConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            services: ServicesConfig::default(),
            timeouts: TimeoutsConfig::default(),
            retry: RetryConfig::default(),
            cache: CacheConfig::default(),
            upload: UploadConfig::default(),
            progress: ProgressConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `PhotomonixError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("services.suggestion_url", &self.services.suggestion_url),
            ("services.generation_url", &self.services.generation_url),
            ("services.auth_url", &self.services.auth_url),
        ] {
            Url::parse(value).map_err(|e| {
                PhotomonixError::Config(format!("{} is not a valid URL ({}): {}", name, e, value))
            })?;
        }

        if self.timeouts.suggestion_secs == 0
            || self.timeouts.generation_secs == 0
            || self.timeouts.health_secs == 0
            || self.timeouts.auth_secs == 0
        {
            return Err(PhotomonixError::Config(
                "All timeouts must be greater than 0".to_string(),
            ));
        }

        if self.retry.factor < 1.0 {
            return Err(PhotomonixError::Config(format!(
                "retry.factor must be at least 1.0, got {}",
                self.retry.factor
            )));
        }

        if self.cache.ttl_secs == 0 {
            return Err(PhotomonixError::Config(
                "cache.ttl_secs must be greater than 0".to_string(),
            ));
        }

        if !(1..=100).contains(&self.upload.jpeg_quality) {
            return Err(PhotomonixError::Config(format!(
                "upload.jpeg_quality must be between 1 and 100, got {}",
                self.upload.jpeg_quality
            )));
        }

        if self.upload.max_width == 0 || self.upload.max_file_size == 0 {
            return Err(PhotomonixError::Config(
                "upload.max_width and upload.max_file_size must be greater than 0".to_string(),
            ));
        }

        if self.progress.tick_secs == 0 || self.progress.estimated_total_secs == 0 {
            return Err(PhotomonixError::Config(
                "progress intervals must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Services
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Suggestion service base URL
    pub suggestion_url: String,
    /// Generation service base URL
    pub generation_url: String,
    /// Auth / user service base URL
    pub auth_url: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            suggestion_url: services::DEFAULT_SUGGESTION_URL.to_string(),
            generation_url: services::DEFAULT_GENERATION_URL.to_string(),
            auth_url: services::DEFAULT_AUTH_URL.to_string(),
        }
    }
}

// =============================================================================
// Timeouts
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutsConfig {
    pub suggestion_secs: u64,
    pub generation_secs: u64,
    pub health_secs: u64,
    pub auth_secs: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            suggestion_secs: network::SUGGESTION_TIMEOUT_SECS,
            generation_secs: network::GENERATION_TIMEOUT_SECS,
            health_secs: network::HEALTH_TIMEOUT_SECS,
            auth_secs: network::AUTH_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Retry
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: usize,
    /// Delay before the first retry (milliseconds)
    pub initial_delay_ms: u64,
    /// Backoff multiplier
    pub factor: f32,
    /// Cap for a single delay (seconds)
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: retry::DEFAULT_MAX_RETRIES,
            initial_delay_ms: retry::INITIAL_DELAY_MS,
            factor: retry::BACKOFF_FACTOR,
            max_delay_secs: retry::MAX_DELAY_SECS,
        }
    }
}

// =============================================================================
// Cache
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Suggestion cache time-to-live (seconds)
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: cache::SUGGESTION_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

// =============================================================================
// Upload
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted file (bytes)
    pub max_file_size: usize,
    /// Accepted MIME types
    pub supported_formats: Vec<String>,
    /// Wider images are downscaled to this width
    pub max_width: u32,
    /// JPEG re-encode quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: upload::MAX_FILE_SIZE,
            supported_formats: upload::SUPPORTED_FORMATS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_width: upload::MAX_WIDTH,
            jpeg_quality: upload::JPEG_QUALITY,
        }
    }
}

// =============================================================================
// Progress
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Typical generation duration the estimate assumes (seconds)
    pub estimated_total_secs: u64,
    /// Interval between updates (seconds)
    pub tick_secs: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            estimated_total_secs: progress::ESTIMATED_TOTAL_SECS,
            tick_secs: progress::TICK_SECS,
        }
    }
}
