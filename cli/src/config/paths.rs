//! Platform-specific path utilities for the gitpod CLI.

use std::path::PathBuf;

use crate::config::settings::env;
use crate::error::{GitpodError, Result};

/// Get the configuration directory for the gitpod CLI.
///
/// - Linux: `~/.config/gitpod`
/// - macOS: `~/Library/Application Support/gitpod`
/// - Windows: `%APPDATA%\gitpod`
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| GitpodError::Config("Cannot determine config directory".to_string()))?;
    Ok(base.join("gitpod"))
}

/// Get the main configuration file path.
///
/// `GITPOD_CONFIG` takes precedence over the platform default.
pub fn config_file() -> Result<PathBuf> {
    match std::env::var_os(env::CONFIG_PATH) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(config_dir()?.join("config.toml")),
    }
}
