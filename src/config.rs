//! Sandbox configuration, loaded from TOML.
//!
//! Every section and field is optional; anything left out keeps its default.
//!
//! ```toml
//! [window]
//! title = "Scene Sandbox"
//! width = 800
//! height = 600
//!
//! [assets]
//! tree_model = "assets/retrourban/tree-small.glb"
//! character_model = "assets/characters/character-a.glb"
//!
//! [camera]
//! position = [2.0, 1.5, 2.0]
//! target = [0.0, 0.0, 0.0]
//! fov_y = 45.0
//!
//! [physics]
//! falling_boxes = 10
//!
//! [headless]
//! frames = 600
//! frame_time = 0.016666668
//! switch_every = 0
//! ```

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Scene Sandbox".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub tree_model: PathBuf,
    pub character_model: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            tree_model: PathBuf::from("assets/retrourban/tree-small.glb"),
            character_model: PathBuf::from("assets/characters/character-a.glb"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_y: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [2.0, 1.5, 2.0],
            target: [0.0, 0.0, 0.0],
            fov_y: 45.0,
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> Camera {
        Camera {
            position: Vec3::from(self.position),
            target: Vec3::from(self.target),
            fov_y_degrees: self.fov_y,
            ..Camera::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub falling_boxes: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self { falling_boxes: 10 }
    }
}

/// Frame loop settings for runs without a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    pub frames: u64,
    /// Simulated seconds per frame.
    pub frame_time: f32,
    /// Advance to the next scene every N frames; 0 disables.
    pub switch_every: u64,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            frame_time: 1.0 / 60.0,
            switch_every: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub window: WindowConfig,
    pub assets: AssetConfig,
    pub camera: CameraConfig,
    pub physics: PhysicsConfig,
    pub headless: HeadlessConfig,
}

impl SandboxConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse TOML text; `origin` only labels errors.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!(
            "scene-sandbox-{}-absent.toml",
            std::process::id()
        ));
        assert_eq!(SandboxConfig::load(&path).unwrap(), SandboxConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = SandboxConfig::parse(
            "[window]\nwidth = 1024\n\n[headless]\nswitch_every = 120\n",
            Path::new("inline.toml"),
        )
        .unwrap();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.headless.switch_every, 120);
        assert_eq!(config.physics.falling_boxes, 10);
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "scene-sandbox-{}-config.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[camera]\nfov_y = 60.0\nposition = [0.0, 5.0, 10.0]\n").unwrap();
        let config = SandboxConfig::load(&path);
        std::fs::remove_file(&path).ok();

        let camera = config.unwrap().camera.to_camera();
        assert_eq!(camera.fov_y_degrees, 60.0);
        assert_eq!(camera.position, Vec3::new(0.0, 5.0, 10.0));
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn test_invalid_toml() {
        let err = SandboxConfig::parse("[window\nwidth = ", Path::new("broken.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_wrong_type() {
        let err = SandboxConfig::parse("[window]\nwidth = \"wide\"\n", Path::new("typed.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
