//! Configuration loading and discovery for `tsheet.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::TsheetConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery.
pub const CONFIG_FILE: &str = "tsheet.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse tsheet.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override viewport scale
    pub scale: Option<f32>,
    /// Enable error collection
    pub collect_errors: Option<bool>,
}

/// Find tsheet.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for tsheet.toml
/// 2. Check XDG_CONFIG_HOME/tilesheet/tsheet.toml (or ~/.config/tilesheet/tsheet.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find tsheet.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("tilesheet").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find tsheet.toml by walking up from `start`.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a tsheet.toml file.
///
/// With no explicit path the file is discovered with [`find_config`]; when
/// nothing is found the defaults are returned. Relative sheet paths in a
/// loaded file are resolved against the file's directory.
pub fn load_config(path: Option<&Path>) -> Result<TsheetConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(default_config()),
    }
}

fn load_config_file(path: &Path) -> Result<TsheetConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: TsheetConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = config_root(path) {
        config.tilesets.lynx = resolve_path(root, &config.tilesets.lynx);
        config.tilesets.ms = resolve_path(root, &config.tilesets.ms);
        config.telemetry.error_log = resolve_path(root, &config.telemetry.error_log);
    }

    Ok(config)
}

/// Configuration used when no tsheet.toml is found.
pub fn default_config() -> TsheetConfig {
    TsheetConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut TsheetConfig, overrides: &CliOverrides) {
    if let Some(scale) = overrides.scale {
        config.viewport.scale = scale;
    }

    if let Some(collect_errors) = overrides.collect_errors {
        config.telemetry.collect_errors = collect_errors;
    }
}

/// Directory holding a config file, if it has one.
pub fn config_root(config_path: &Path) -> Option<&Path> {
    config_path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Resolve a path relative to the config directory.
///
/// If the path is absolute, returns it unchanged.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
