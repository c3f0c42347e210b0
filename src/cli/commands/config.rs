//! Config Command
//!
//! Usage:
//!   photomonix config show [-f json]
//!   photomonix config path
//!   photomonix config init [--force]

use std::path::Path;

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{PhotomonixError, Result};

/// Print the merged effective configuration
pub fn show(format: &str) -> Result<()> {
    let config = ConfigLoader::load()?;

    let rendered = match format {
        "json" => serde_json::to_string_pretty(&config)?,
        "text" | "toml" => {
            toml::to_string_pretty(&config).map_err(|e| PhotomonixError::Config(e.to_string()))?
        }
        other => {
            return Err(PhotomonixError::validation(format!(
                "Unknown format '{}': expected text or json",
                other
            )));
        }
    };
    println!("{}", rendered);
    Ok(())
}

/// List the config files in merge order and whether each exists
pub fn path() -> Result<()> {
    let output = Output::new();
    output.header("Configuration files");

    for (source, file) in ConfigLoader::sources(Path::new(".")) {
        let marker = if file.is_file() { "✓" } else { "✗" };
        output.field(&source.to_string(), &format!("{} {}", marker, file.display()));
    }
    output.info("PHOTOMONIX_* environment variables override both files");
    Ok(())
}

/// Write the default global configuration
pub fn init(force: bool) -> Result<()> {
    let path = ConfigLoader::init_global(force)?;
    let output = Output::new();
    output.success("Global configuration ready");
    output.field("Config", &path.display().to_string());
    Ok(())
}
