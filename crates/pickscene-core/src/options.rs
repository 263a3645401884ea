//! Configuration options for pickscene.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Environment variable naming a JSON options file.
pub const OPTIONS_ENV_VAR: &str = "PICKSCENE_OPTIONS";

/// Application-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Initial window width in physical pixels.
    pub window_width: u32,

    /// Initial window height in physical pixels.
    pub window_height: u32,

    /// Window title.
    pub title: String,

    /// Distance in front of the camera at which a selected object is held.
    pub reach: f32,

    /// Whether to grab and hide the cursor for mouse look.
    pub capture_mouse: bool,

    /// Draw the visible pass as wireframe when the adapter supports it.
    pub wireframe: bool,

    /// Background color of the visible pass.
    pub clear_color: Vec3,

    /// Camera movement and projection settings.
    pub camera: CameraOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            window_width: 640,
            window_height: 480,
            title: "pickscene".to_string(),
            reach: 3.0,
            capture_mouse: true,
            wireframe: true,
            clear_color: Vec3::new(0.1, 0.1, 0.1),
            camera: CameraOptions::default(),
        }
    }
}

impl Options {
    /// Reads options from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Loads from the file named by [`OPTIONS_ENV_VAR`], or returns defaults
    /// when the variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(OPTIONS_ENV_VAR) {
            Some(path) => {
                log::info!("loading options from {}", Path::new(&path).display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Camera settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Base movement speed in world units per second.
    pub move_speed: f32,
    /// Speed multiplier while `SlowMove` is held.
    pub slow_multiplier: f32,
    /// Speed multiplier while `FastMove` is held.
    pub fast_multiplier: f32,
    /// Degrees of rotation per pixel of mouse motion.
    pub mouse_sensitivity: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            near: 0.01,
            far: 100.0,
            move_speed: 2.0,
            slow_multiplier: 0.25,
            fast_multiplier: 3.0,
            mouse_sensitivity: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let options = Options {
            reach: 5.0,
            wireframe: false,
            ..Default::default()
        };
        let json = serde_json::to_string(&options).unwrap();
        let back: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options: Options =
            serde_json::from_str(r#"{ "reach": 1.5, "camera": { "far": 20.0 } }"#).unwrap();
        assert_eq!(options.reach, 1.5);
        assert_eq!(options.window_width, 640);
        assert_eq!(options.camera.far, 20.0);
        assert_eq!(options.camera.near, CameraOptions::default().near);
    }

    #[test]
    fn test_camera_fields_by_name() {
        let options: Options = serde_json::from_str(
            r#"{ "window_width": 1280, "reach": 4.0, "camera": { "fov_degrees": 75.0 } }"#,
        )
        .unwrap();
        assert_eq!(options.window_width, 1280);
        assert_eq!(options.camera.fov_degrees, 75.0);
        assert_eq!(options.camera.far, CameraOptions::default().far);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Options::load("/nonexistent/pickscene.json").unwrap_err();
        assert!(matches!(err, crate::SceneError::IoError(_)));
    }
}
