// SPDX-License-Identifier: GPL-3.0-only

//! Renderer configuration.
//!
//! Every field has a default, so a configuration file only needs to name
//! the values it changes:
//!
//! ```json
//! { "border_width": 2.0, "foreground": { "red": 0.9, "green": 0.9, "blue": 0.9 } }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app_settings::{
    DEFAULT_BORDER_WIDTH, DEFAULT_FONT_SIZE, FUNCTION_LABEL_SCALE, KEYNAME_LABEL_SCALE,
};
use crate::renderer::theme::{
    Color, default_background_color, default_foreground_color, default_pressed_background_color,
};

/// User configuration for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Key border width in keyboard units.
    pub border_width: f64,
    /// Label color and border source color.
    pub foreground: Color,
    /// Key fill color.
    pub background: Color,
    /// Key fill color while pressed.
    pub pressed_background: Color,
    /// Letter font size used when no key can be measured.
    pub default_font_size: f64,
    /// Function label size relative to letters.
    pub function_label_scale: f64,
    /// Key name label size relative to letters.
    pub keyname_label_scale: f64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            border_width: DEFAULT_BORDER_WIDTH,
            foreground: default_foreground_color(),
            background: default_background_color(),
            pressed_background: default_pressed_background_color(),
            default_font_size: DEFAULT_FONT_SIZE,
            function_label_scale: FUNCTION_LABEL_SCALE,
            keyname_label_scale: KEYNAME_LABEL_SCALE,
        }
    }
}

/// Error loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the file
    IoError(std::io::Error),
    /// Failed to parse JSON
    JsonError(serde_json::Error),
    /// A value is out of range
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::JsonError(e) => write!(f, "JSON error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::JsonError(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::JsonError(err)
    }
}

impl RendererConfig {
    /// Loads a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&content)?;
        tracing::debug!("Loaded renderer config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RendererConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that sizes and fractions are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "border_width must be non-negative, got {}",
                self.border_width
            )));
        }
        if !self.default_font_size.is_finite() || self.default_font_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_font_size must be positive, got {}",
                self.default_font_size
            )));
        }
        for (name, value) in [
            ("function_label_scale", self.function_label_scale),
            ("keyname_label_scale", self.keyname_label_scale),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Test 1: Partial files keep defaults for the missing fields.
    #[test]
    fn test_partial_config_uses_defaults() {
        let config = RendererConfig::from_json(r#"{ "border_width": 2.5 }"#).unwrap();

        assert_eq!(config.border_width, 2.5);
        assert_eq!(config.background, default_background_color());
        assert_eq!(config.function_label_scale, FUNCTION_LABEL_SCALE);
    }

    /// Test 2: Out-of-range values are rejected.
    #[test]
    fn test_invalid_values() {
        let err = RendererConfig::from_json(r#"{ "border_width": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = RendererConfig::from_json(r#"{ "keyname_label_scale": 1.5 }"#).unwrap_err();
        assert!(err.to_string().contains("keyname_label_scale"));
    }

    /// Test 3: Loading from a file.
    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "default_font_size": 20.0 }}"#).unwrap();

        let config = RendererConfig::load(file.path()).unwrap();
        assert_eq!(config.default_font_size, 20.0);

        let missing = RendererConfig::load("/nonexistent/oskboard.json");
        assert!(matches!(missing, Err(ConfigError::IoError(_))));
    }
}
