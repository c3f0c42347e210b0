//! CLI Common Utilities
//!
//! Shared context and file helpers for command handlers.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::api::{AuthClient, HealthChecker, TokenTracker};
use crate::cli::ui::output::Output;
use crate::config::{Config, ConfigLoader};
use crate::enhancer::Enhancer;
use crate::types::{GeneratedImage, ImageFile, PhotomonixError, Result};

/// Prefix for downloaded images
pub const OUTPUT_PREFIX: &str = "photomonix-enhanced";

/// Command execution context
///
/// Loaded configuration plus output settings. Service clients are built on
/// demand so commands that do not talk to a service never construct one.
pub struct CommandContext {
    pub config: Config,
    pub output: Output,
    pub quiet: bool,
}

impl CommandContext {
    /// Load configuration through the full resolution chain
    pub fn load(quiet: bool) -> Result<Self> {
        Ok(Self::with_config(ConfigLoader::load()?, quiet))
    }

    pub fn with_config(config: Config, quiet: bool) -> Self {
        Self {
            config,
            output: Output::quiet(quiet),
            quiet,
        }
    }

    pub fn enhancer(&self) -> Result<Enhancer> {
        Enhancer::from_config(&self.config)
    }

    pub fn auth_client(&self) -> Result<AuthClient> {
        AuthClient::from_config(&self.config)
    }

    pub fn token_tracker(&self) -> Result<TokenTracker> {
        TokenTracker::from_config(&self.config)
    }

    pub fn health_checker(&self) -> Result<HealthChecker> {
        HealthChecker::from_config(&self.config)
    }
}

/// Read an image from disk
pub async fn read_image(path: &Path) -> Result<ImageFile> {
    if !path.is_file() {
        return Err(PhotomonixError::validation(format!(
            "No such file: {}",
            path.display()
        )));
    }
    ImageFile::from_path(path).await
}

/// File name for the `index`-th (0-based) image of a run started at `timestamp_ms`
pub fn output_file_name(timestamp_ms: i64, index: usize) -> String {
    format!("{}-{}-{}.png", OUTPUT_PREFIX, timestamp_ms, index + 1)
}

/// Write generated images into `dir`, returning the written paths
pub async fn write_images(dir: &Path, images: &[GeneratedImage]) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;

    let timestamp_ms = Utc::now().timestamp_millis();
    let mut written = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        let path = dir.join(output_file_name(timestamp_ms, index));
        tokio::fs::write(&path, &image.bytes).await?;
        written.push(path);
    }
    Ok(written)
}

/// Human-readable byte size
pub fn format_file_size(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exponent])
}
