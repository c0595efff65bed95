//! Configuration schema for `tsheet.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::level::Ruleset;

/// Sheets drawn for each ruleset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetsConfig {
    /// Sheet for the Lynx ruleset
    #[serde(default = "default_lynx_sheet")]
    pub lynx: PathBuf,
    /// Sheet for the MS ruleset
    #[serde(default = "default_ms_sheet")]
    pub ms: PathBuf,
}

impl Default for TilesetsConfig {
    fn default() -> Self {
        Self { lynx: default_lynx_sheet(), ms: default_ms_sheet() }
    }
}

impl TilesetsConfig {
    pub fn path_for(&self, ruleset: Ruleset) -> &PathBuf {
        match ruleset {
            Ruleset::Lynx => &self.lynx,
            Ruleset::Ms => &self.ms,
        }
    }
}

fn default_lynx_sheet() -> PathBuf {
    PathBuf::from("atiles.bmp")
}

fn default_ms_sheet() -> PathBuf {
    PathBuf::from("tiles.bmp")
}

/// Viewport dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Width in tiles
    #[serde(default = "default_view_tiles")]
    pub width: u32,
    /// Height in tiles
    #[serde(default = "default_view_tiles")]
    pub height: u32,
    /// Output pixels per sheet pixel
    #[serde(default = "default_scale")]
    pub scale: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { width: default_view_tiles(), height: default_view_tiles(), scale: default_scale() }
    }
}

fn default_view_tiles() -> u32 {
    9
}

fn default_scale() -> f32 {
    1.0
}

/// Error telemetry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Append tileset load failures to `error_log`
    #[serde(default)]
    pub collect_errors: bool,
    /// JSONL file receiving collected errors
    #[serde(default = "default_error_log")]
    pub error_log: PathBuf,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { collect_errors: false, error_log: default_error_log() }
    }
}

fn default_error_log() -> PathBuf {
    PathBuf::from(".tsheet-errors.jsonl")
}

/// Complete `tsheet.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TsheetConfig {
    #[serde(default)]
    pub tilesets: TilesetsConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "viewport.width")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tsheet.toml: '{}' {}", self.field, self.message)
    }
}

impl TsheetConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.viewport.width == 0 {
            errors.push(ConfigValidationError {
                field: "viewport.width".to_string(),
                message: "must be at least 1 tile".to_string(),
            });
        }
        if self.viewport.height == 0 {
            errors.push(ConfigValidationError {
                field: "viewport.height".to_string(),
                message: "must be at least 1 tile".to_string(),
            });
        }
        if !(self.viewport.scale.is_finite() && self.viewport.scale > 0.0) {
            errors.push(ConfigValidationError {
                field: "viewport.scale".to_string(),
                message: "must be a positive number".to_string(),
            });
        }

        for (field, path) in [("tilesets.lynx", &self.tilesets.lynx), ("tilesets.ms", &self.tilesets.ms)] {
            if path.as_os_str().is_empty() {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must name an image file".to_string(),
                });
            }
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: TsheetConfig = toml::from_str("").unwrap();
        assert_eq!(config, TsheetConfig::default());
        assert_eq!(config.tilesets.lynx, PathBuf::from("atiles.bmp"));
        assert_eq!(config.tilesets.ms, PathBuf::from("tiles.bmp"));
        assert_eq!((config.viewport.width, config.viewport.height), (9, 9));
        assert_eq!(config.viewport.scale, 1.0);
        assert!(!config.telemetry.collect_errors);
        assert!(config.is_valid());
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[tilesets]
lynx = "art/lynx.png"
ms = "art/ms.png"

[viewport]
width = 11
height = 7
scale = 2.5

[telemetry]
collect_errors = true
error_log = "errors.jsonl"
"#;
        let config: TsheetConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.tilesets.path_for(Ruleset::Lynx), &PathBuf::from("art/lynx.png"));
        assert_eq!(config.tilesets.path_for(Ruleset::Ms), &PathBuf::from("art/ms.png"));
        assert_eq!((config.viewport.width, config.viewport.height), (11, 7));
        assert_eq!(config.viewport.scale, 2.5);
        assert!(config.telemetry.collect_errors);
        assert_eq!(config.telemetry.error_log, PathBuf::from("errors.jsonl"));
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: TsheetConfig = toml::from_str("[viewport]\nwidth = 13\n").unwrap();
        assert_eq!(config.viewport.width, 13);
        assert_eq!(config.viewport.height, 9);
        assert_eq!(config.viewport.scale, 1.0);
    }

    #[test]
    fn test_validation_zero_viewport() {
        let config: TsheetConfig = toml::from_str("[viewport]\nwidth = 0\nheight = 0\n").unwrap();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "viewport.width"));
        assert!(errors.iter().any(|e| e.field == "viewport.height"));
    }

    #[test]
    fn test_validation_non_positive_scale() {
        let config: TsheetConfig = toml::from_str("[viewport]\nscale = 0.0\n").unwrap();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "tsheet.toml: 'viewport.scale' must be a positive number");
    }

    #[test]
    fn test_validation_empty_sheet_path() {
        let config: TsheetConfig = toml::from_str("[tilesets]\nms = \"\"\n").unwrap();
        assert!(config.validate().iter().any(|e| e.field == "tilesets.ms"));
    }

    #[test]
    fn test_defaults_round_trip() {
        let text = toml::to_string(&TsheetConfig::default()).unwrap();
        let parsed: TsheetConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, TsheetConfig::default());
    }
}
