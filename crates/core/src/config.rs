//! Planner configuration schema and loader
//!
//! Read from `planner.toml` in the platform config directory. Every field
//! has a default, so a missing or partial file is valid.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_TABLE_SIZE;

/// Top-level planner configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub geometry: GeometryConfig,
    pub overview: OverviewConfig,
    pub canvas: CanvasConfig,
}

/// Content bounds tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Padding added around the tightest box containing every table
    pub margin: f64,
    /// Minimum span of the content bounds on each axis
    pub min_span: f64,
    /// Size assumed for tables without a usable width/height
    pub default_table_size: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            margin: 500.0,
            min_span: 2000.0,
            default_table_size: DEFAULT_TABLE_SIZE,
        }
    }
}

/// Overview panel ("minimap") settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewConfig {
    /// Content area width in pixels
    pub width: f64,
    /// Content area height in pixels
    pub height: f64,
    /// Upper bound for the overview scale factor
    pub scale_cap: f64,
    /// Height of the draggable title strip above the content area
    pub chrome_height: f64,
    /// Whether the panel starts visible
    pub visible: bool,
    /// Initial screen position of the panel
    pub x: f64,
    pub y: f64,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            width: 240.0,
            height: 180.0,
            scale_cap: 0.1,
            chrome_height: 24.0,
            visible: true,
            x: 16.0,
            y: 16.0,
        }
    }
}

/// Seating canvas zoom limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom change per wheel notch
    pub wheel_step: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.25,
            max_zoom: 4.0,
            wheel_step: 0.1,
        }
    }
}

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

impl PlannerConfig {
    /// Load configuration from a file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML content
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.geometry.min_span > 0.0) {
            return Err(ConfigError::Invalid("geometry.min_span must be positive".into()));
        }
        if !(self.geometry.margin >= 0.0) {
            return Err(ConfigError::Invalid("geometry.margin must not be negative".into()));
        }
        if !(self.overview.width > 0.0 && self.overview.height > 0.0) {
            return Err(ConfigError::Invalid("overview size must be positive".into()));
        }
        if !(self.canvas.min_zoom > 0.0 && self.canvas.min_zoom <= self.canvas.max_zoom) {
            return Err(ConfigError::Invalid(
                "canvas zoom range must be positive and ordered".into(),
            ));
        }
        Ok(())
    }

    /// Default config file location (`<config dir>/planner.toml`)
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "onyx", "seatplan").map(|dirs| dirs.config_dir().join("planner.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = PlannerConfig::from_toml("").unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.geometry.margin, 500.0);
        assert_eq!(config.geometry.min_span, 2000.0);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
[overview]
width = 300.0
visible = false

[canvas]
max_zoom = 2.0
"#;
        let config = PlannerConfig::from_toml(toml).unwrap();
        assert_eq!(config.overview.width, 300.0);
        assert_eq!(config.overview.height, 180.0);
        assert!(!config.overview.visible);
        assert_eq!(config.canvas.max_zoom, 2.0);
        assert_eq!(config.canvas.min_zoom, 0.25);
    }

    #[test]
    fn test_invalid_zoom_range() {
        let toml = r#"
[canvas]
min_zoom = 3.0
max_zoom = 2.0
"#;
        let err = PlannerConfig::from_toml(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = PlannerConfig::from_toml("[geometry\nmargin = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[geometry]\nmargin = 100.0").unwrap();

        let config = PlannerConfig::load(&path).unwrap();
        assert_eq!(config.geometry.margin, 100.0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlannerConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, PlannerConfig::default());
    }
}
