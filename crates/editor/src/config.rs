//! Editor settings loaded from JSON. Every field has a default, so a config
//! file only needs the keys it changes.

use crate::picking::PickOptions;
use glam::Vec3;
use lain_geom::Viewport;
use lain_persist::LevelFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub lerp: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw_degrees: 0.0,
            pitch_degrees: 0.0,
            speed: 20.0,
            sensitivity: 0.1,
            lerp: 0.1,
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub square_size: f32,
    pub half_extent: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            square_size: 0.5,
            half_extent: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            width: viewport.width,
            height: viewport.height,
        }
    }
}

impl From<ViewportConfig> for Viewport {
    fn from(config: ViewportConfig) -> Self {
        Viewport::new(config.width, config.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub camera: CameraConfig,
    pub picking: PickOptions,
    /// Directory holding `<name>.level` files.
    pub levels_dir: PathBuf,
    /// Format used for new saves. Loading accepts both.
    pub save_format: LevelFormat,
    pub viewport: ViewportConfig,
    pub grid: GridConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            picking: PickOptions::default(),
            levels_dir: PathBuf::from("levels"),
            save_format: LevelFormat::default(),
            viewport: ViewportConfig::default(),
            grid: GridConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "editor config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picking::PickPolicy;

    #[test]
    fn defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.camera.speed, 20.0);
        assert_eq!(config.camera.sensitivity, 0.1);
        assert_eq!(config.picking.policy, PickPolicy::FirstHit);
        assert!(!config.picking.exclude_selected);
        assert_eq!(config.levels_dir, PathBuf::from("levels"));
        assert_eq!(config.save_format, LevelFormat::Versioned);
        assert_eq!(config.grid, GridConfig::default());
        assert_eq!(Viewport::from(config.viewport), Viewport::new(1280.0, 720.0));
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = EditorConfig::from_json_str(
            r#"{
                "camera": { "speed": 5.0 },
                "picking": { "policy": "nearest_hit" },
                "save_format": "legacy",
                "levels_dir": "maps"
            }"#,
        )
        .unwrap();
        assert_eq!(config.camera.speed, 5.0);
        assert_eq!(config.camera.lerp, 0.1);
        assert_eq!(config.picking.policy, PickPolicy::NearestHit);
        assert_eq!(config.save_format, LevelFormat::Legacy);
        assert_eq!(config.levels_dir, PathBuf::from("maps"));
        assert_eq!(config.viewport, ViewportConfig::default());
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(EditorConfig::from_json_str("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn file_errors() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            EditorConfig::from_json_file(tmp.path().join("absent.json")),
            Err(ConfigError::Io(_))
        ));

        let bad = tmp.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(EditorConfig::from_json_file(&bad), Err(ConfigError::Json(_))));

        let good = tmp.path().join("good.json");
        std::fs::write(&good, r#"{ "grid": { "square_size": 1.0 } }"#).unwrap();
        let config = EditorConfig::from_json_file(&good).unwrap();
        assert_eq!(config.grid.square_size, 1.0);
        assert_eq!(config.grid.half_extent, 20.0);
    }
}
