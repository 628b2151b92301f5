//! Viewer configuration, loaded from an optional JSON file

use std::path::Path;

use serde::{Deserialize, Serialize};
use stellar_core::catalog::Language;
use stellar_core::config::EngineConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    /// Fraction of the window resolution the software canvas renders at
    pub render_scale: f32,
    pub language: Language,
    /// Font asset for the stage text; Korean titles need one with Hangul glyphs
    pub font: Option<String>,
    pub engine: EngineConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Stellar Life Cycle".to_string(),
            width: 1280.0,
            height: 720.0,
            render_scale: 0.5,
            language: Language::English,
            font: None,
            engine: EngineConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Canvas size in pixels for a window of the given logical size
    pub fn canvas_size(&self, width: f32, height: f32) -> (usize, usize) {
        let scale = self.render_scale.clamp(0.1, 1.0);
        (
            (width * scale).round().max(0.0) as usize,
            (height * scale).round().max(0.0) as usize,
        )
    }
}

/// Errors that can occur while loading the viewer config
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Config parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{ "language": "ko", "engine": { "seed": 3 } }"#).unwrap();
        assert_eq!(config.language, Language::Korean);
        assert_eq!(config.engine.seed, Some(3));
        assert_eq!(config.engine.star_count, 200);
        assert_eq!(config.width, 1280.0);
        assert_eq!(config.render_scale, 0.5);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ViewerConfig::load("/nonexistent/stellar-viewer.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let path = std::env::temp_dir().join("stellar-viewer-bad-config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = ViewerConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("Config parse error"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_canvas_size_scales_and_clamps() {
        let mut config = ViewerConfig::default();
        assert_eq!(config.canvas_size(1280.0, 720.0), (640, 360));
        config.render_scale = 4.0;
        assert_eq!(config.canvas_size(100.0, 50.0), (100, 50));
        assert_eq!(config.canvas_size(0.0, 0.0), (0, 0));
    }
}
