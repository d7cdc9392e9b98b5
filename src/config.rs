//! Scene configuration
//!
//! Handles loading/saving of JSON configuration files. Every field has a
//! default, so partial files are valid and an empty object yields the
//! stock tuning.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hand tracking and stabilization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackingConfig {
    /// Exponential smoothing factor applied to the pointer (0-1)
    pub smoothing_alpha: f32,
    /// Number of raw gesture labels kept for the majority vote
    pub history_len: usize,
    /// Votes a label needs inside the history before it is emitted
    pub majority: usize,
    /// Mirror the pointer horizontally (selfie camera)
    pub mirror_x: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.1,
            history_len: 5,
            majority: 3,
            mirror_x: true,
        }
    }
}

/// Capture tick settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureConfig {
    /// Capture/inference rate in ticks per second
    pub target_fps: f32,
    /// Frames that may wait for the inference worker before new ones are dropped
    pub queue_depth: usize,
    /// Resolution frames are downscaled to before inference
    pub inference_size: [u32; 2],
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            target_fps: 30.0,
            queue_depth: 2,
            inference_size: [256, 256],
        }
    }
}

/// Interpolation rates and mode targets for the object animator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationConfig {
    /// Position approach rate while assembled (per second)
    pub assembled_rate: f32,
    /// Position approach rate while scattered or focused (per second)
    pub free_rate: f32,
    /// Scale approach rate (per second)
    pub scale_rate: f32,
    /// Rotation approach rate (per second)
    pub rotation_rate: f32,
    /// Per-axis oscillation amplitude while scattered
    pub oscillation_amplitude: [f32; 3],
    /// Per-axis oscillation frequency (radians per second)
    pub oscillation_frequency: [f32; 3],
    /// Scale multiplier for objects that are not the current selection
    pub unselected_scale: f32,
    /// World position of the focused photo
    pub focus_position: [f32; 3],
    /// Scale of the focused photo
    pub focus_scale: f32,
    /// Distance multiplier applied to scattered anchors of receding objects
    pub recede_distance: f32,
    /// Scale multiplier for receding objects
    pub recede_scale: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            assembled_rate: 2.5,
            free_rate: 1.8,
            scale_rate: 3.0,
            rotation_rate: 2.0,
            oscillation_amplitude: [0.35, 0.25, 0.3],
            oscillation_frequency: [0.6, 0.8, 0.5],
            unselected_scale: 0.6,
            focus_position: [0.0, 0.0, 12.0],
            focus_scale: 3.5,
            recede_distance: 1.6,
            recede_scale: 0.4,
        }
    }
}

/// Anchor layout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Seed for the first layout; every reshuffle derives a new one from it
    pub seed: u64,
    /// Number of primitive objects created at population time
    pub primitive_count: usize,
    /// Height of the assembled cone
    pub formation_height: f32,
    /// Base radius of the assembled cone
    pub formation_radius: f32,
    /// Inner radius of the scatter shell
    pub scatter_inner_radius: f32,
    /// Outer radius of the scatter shell
    pub scatter_outer_radius: f32,
    /// Radius of the sphere new objects fly in from
    pub initial_radius: f32,
    /// Base scale of primitive objects
    pub primitive_scale: f32,
    /// Base scale of photo objects
    pub photo_scale: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            primitive_count: 240,
            formation_height: 10.0,
            formation_radius: 4.5,
            scatter_inner_radius: 6.0,
            scatter_outer_radius: 13.0,
            initial_radius: 40.0,
            primitive_scale: 0.25,
            photo_scale: 1.0,
        }
    }
}

/// Pointer selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionConfig {
    /// Maximum NDC distance between pointer and anchor for a selection
    pub threshold: f32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { threshold: 0.4 }
    }
}

/// Scene camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    /// Camera position
    pub eye: [f32; 3],
    /// Point the camera looks at
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Aspect ratio (width/height)
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, 20.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 200.0,
        }
    }
}

/// Complete scene configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    pub tracking: TrackingConfig,
    pub capture: CaptureConfig,
    pub animation: AnimationConfig,
    pub layout: LayoutConfig,
    pub selection: SelectionConfig,
    pub camera: CameraConfig,
}

impl SceneConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration, falling back to defaults if the file is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Using default scene configuration");
                Self::default()
            }
        }
    }

    /// Save configuration as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Saved scene configuration");
        Ok(())
    }
}
