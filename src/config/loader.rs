//! Configuration Loader
//!
//! Layers, lowest priority first:
//! 1. Built-in defaults
//! 2. Global file (`$XDG_CONFIG_HOME/photomonix/config.toml`, else `~/.config/...`)
//! 3. Project file (`.photomonix/config.toml` under the working directory)
//! 4. `PHOTOMONIX_*` environment variables, `__` between section and key

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use tracing::{debug, info};

use super::types::Config;
use crate::types::{PhotomonixError, Result};

const APP_DIR: &str = "photomonix";
const PROJECT_DIR: &str = ".photomonix";
const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "PHOTOMONIX_";

/// Where a configuration layer comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Global,
    Project,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "Global"),
            Self::Project => write!(f, "Project"),
        }
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the merged configuration for the current directory
    pub fn load() -> Result<Config> {
        Self::load_in(Path::new("."))
    }

    /// Load the merged configuration with `project_root` as the project
    pub fn load_in(project_root: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        for (source, path) in Self::sources(project_root) {
            if path.is_file() {
                debug!(source = %source, path = %path.display(), "Merging config file");
                figment = figment.merge(Toml::file(&path));
            }
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Defaults overlaid with a single file, ignoring every other layer
    pub fn load_from_file(path: &Path) -> Result<Config> {
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file(path)),
        )
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| PhotomonixError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Paths
    // =========================================================================

    /// Global config directory, if a home can be determined
    pub fn global_dir() -> Option<PathBuf> {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .map(|dir| dir.join(APP_DIR))
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    pub fn project_config_path(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_DIR).join(CONFIG_FILE)
    }

    /// File layers in merge order
    pub fn sources(project_root: &Path) -> Vec<(ConfigSource, PathBuf)> {
        let mut sources = Vec::with_capacity(2);
        if let Some(global) = Self::global_config_path() {
            sources.push((ConfigSource::Global, global));
        }
        sources.push((ConfigSource::Project, Self::project_config_path(project_root)));
        sources
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write the commented default template to the global config file
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let dir = Self::global_dir().ok_or_else(|| {
            PhotomonixError::Config("Cannot determine global config directory".to_string())
        })?;
        Self::write_template(&dir, force)
    }

    /// Write the template into `dir/config.toml` unless it exists
    pub fn write_template(dir: &Path, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let path = dir.join(CONFIG_FILE);
        if path.exists() && !force {
            info!(path = %path.display(), "Config already exists");
            return Ok(path);
        }

        fs::write(&path, Self::template())?;
        info!(path = %path.display(), "Wrote default config");
        Ok(path)
    }

    fn template() -> String {
        let defaults = Config::default();
        format!(
            r#"# Photomonix client configuration
# Project files (.photomonix/config.toml) and PHOTOMONIX_* variables override this.

version = "{version}"

[services]
suggestion_url = "{suggestion_url}"
generation_url = "{generation_url}"
auth_url = "{auth_url}"

# Seconds before a call is abandoned
[timeouts]
suggestion_secs = {suggestion_secs}
generation_secs = {generation_secs}
health_secs = {health_secs}
auth_secs = {auth_secs}

# Server and network failures are retried; 4xx and timeouts are not
[retry]
max_retries = {max_retries}
initial_delay_ms = {initial_delay_ms}
factor = {factor:.1}
max_delay_secs = {max_delay_secs}

[cache]
ttl_secs = {ttl_secs}

# Images wider than max_width are downscaled and re-encoded as JPEG
[upload]
max_file_size = {max_file_size}
max_width = {max_width}
jpeg_quality = {jpeg_quality}

[progress]
estimated_total_secs = {estimated_total_secs}
tick_secs = {tick_secs}
"#,
            version = defaults.version,
            suggestion_url = defaults.services.suggestion_url,
            generation_url = defaults.services.generation_url,
            auth_url = defaults.services.auth_url,
            suggestion_secs = defaults.timeouts.suggestion_secs,
            generation_secs = defaults.timeouts.generation_secs,
            health_secs = defaults.timeouts.health_secs,
            auth_secs = defaults.timeouts.auth_secs,
            max_retries = defaults.retry.max_retries,
            initial_delay_ms = defaults.retry.initial_delay_ms,
            factor = defaults.retry.factor,
            max_delay_secs = defaults.retry.max_delay_secs,
            ttl_secs = defaults.cache.ttl_secs,
            max_file_size = defaults.upload.max_file_size,
            max_width = defaults.upload.max_width,
            jpeg_quality = defaults.upload.jpeg_quality,
            estimated_total_secs = defaults.progress.estimated_total_secs,
            tick_secs = defaults.progress.tick_secs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_in_empty_project() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_in(dir.path()).unwrap();
        assert_eq!(config.version, "1.0");
    }

    #[test]
    fn test_template_round_trips_defaults() {
        let dir = TempDir::new().unwrap();
        let path = ConfigLoader::write_template(dir.path(), false).unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        let defaults = Config::default();
        assert_eq!(config.retry.max_retries, defaults.retry.max_retries);
        assert_eq!(config.upload.max_width, 1920);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.services.auth_url, defaults.services.auth_url);
    }

    #[test]
    fn test_existing_file_is_kept_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[cache]\nttl_secs = 60\n").unwrap();

        ConfigLoader::write_template(dir.path(), false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[cache]\nttl_secs = 60\n");

        ConfigLoader::write_template(dir.path(), true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("# Photomonix"));
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(PROJECT_DIR)).unwrap();
        fs::write(
            ConfigLoader::project_config_path(dir.path()),
            "[services]\nsuggestion_url = \"http://suggest.internal:9000\"\n\n[cache]\nttl_secs = 600\n",
        )
        .unwrap();

        let config = ConfigLoader::load_in(dir.path()).unwrap();
        assert_eq!(config.services.suggestion_url, "http://suggest.internal:9000");
        assert_eq!(config.cache.ttl_secs, 600);
        assert_eq!(
            config.services.generation_url,
            crate::constants::services::DEFAULT_GENERATION_URL
        );
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[upload]\njpeg_quality = 0\n").unwrap();

        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(matches!(err, PhotomonixError::Config(_)));
    }

    #[test]
    fn test_sources_end_with_project() {
        let sources = ConfigLoader::sources(Path::new("/work"));
        let (source, path) = sources.last().unwrap();
        assert_eq!(*source, ConfigSource::Project);
        assert_eq!(path, Path::new("/work/.photomonix/config.toml"));
    }

    #[test]
    fn test_env_override() {
        let dir = TempDir::new().unwrap();
        // SAFETY: no other test reads this variable
        unsafe {
            std::env::set_var("PHOTOMONIX_PROGRESS__TICK_SECS", "7");
        }
        let config = ConfigLoader::load_in(dir.path()).unwrap();
        unsafe {
            std::env::remove_var("PHOTOMONIX_PROGRESS__TICK_SECS");
        }
        assert_eq!(config.progress.tick_secs, 7);
    }
}
