// config.rs - Tunable parameters, loadable from a JSON file
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::projection::WindowGeometry;
use crate::tracking::device::CaptureRequest;
use crate::tracking::smoother::SmoothingFactors;

/// Skin-color heuristic thresholds and the pixel-to-portal mapping
///
/// None of these are ground truth; they were tuned by eye against a webcam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Sample every Nth pixel in both axes
    pub stride: u32,
    pub min_red: u8,
    pub min_green: u8,
    pub min_blue: u8,
    /// Minimum max(r,g,b) - min(r,g,b)
    pub min_spread: u8,
    /// Minimum |r - g|
    pub min_red_green_gap: u8,
    /// Detections with this many samples or fewer are discarded
    pub min_samples: u32,
    /// Sample count mapped to zero proximity
    pub depth_pivot: f32,
    /// Sample count change mapped to one unit of proximity
    pub depth_span: f32,
    pub horizontal_gain: f32,
    pub vertical_gain: f32,
    /// Distance reported at zero proximity
    pub baseline_distance: f32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            stride: 4,
            min_red: 60,
            min_green: 40,
            min_blue: 20,
            min_spread: 15,
            min_red_green_gap: 15,
            min_samples: 50,
            depth_pivot: 3000.0,
            depth_span: 8000.0,
            horizontal_gain: 2.0,
            vertical_gain: 1.5,
            baseline_distance: 3.0,
        }
    }
}

/// Pointer-to-portal mapping: full container width/height spans these ranges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    pub horizontal_range: f32,
    pub vertical_range: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            horizontal_range: 4.0,
            vertical_range: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub near: f32,
    pub far: f32,
    /// Eye distances below this are clamped before dividing
    pub min_eye_distance: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 100.0,
            min_eye_distance: 0.1,
        }
    }
}

/// Cosmetic floating motion of the model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Seconds the idle clock advances per rendered frame
    pub time_step: f32,
    pub bob_amplitude: f32,
    pub bob_rate: f32,
    /// Yaw amplitude in radians
    pub sway_amplitude: f32,
    pub sway_rate: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            time_step: 0.016,
            bob_amplitude: 0.05,
            bob_rate: 2.0,
            sway_amplitude: 0.1,
            sway_rate: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Largest extent of a loaded model after auto-fit
    pub target_size: f32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self { target_size: 2.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// z of the neutral tracked position restored on every return to idle
    pub default_distance: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            default_distance: 3.0,
        }
    }
}

/// Complete runtime configuration; every section falls back to its defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub estimator: EstimatorConfig,
    pub pointer: PointerConfig,
    pub smoothing: SmoothingFactors,
    pub window: WindowGeometry,
    pub projection: ProjectionConfig,
    pub capture: CaptureRequest,
    pub animation: AnimationConfig,
    pub asset: AssetConfig,
    pub tracking: TrackingConfig,
}

impl Config {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("Invalid config file: {:?}", path))?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.estimator.stride == 0 {
            return Err(ConfigError::invalid("estimator.stride", "must be at least 1"));
        }
        if self.estimator.depth_span <= 0.0 {
            return Err(ConfigError::invalid("estimator.depth_span", "must be positive"));
        }
        for (field, factor) in [
            ("smoothing.planar", self.smoothing.planar),
            ("smoothing.depth", self.smoothing.depth),
        ] {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(ConfigError::invalid(field, format!("{factor} is outside (0, 1]")));
            }
        }
        if !(self.window.width > 0.0 && self.window.height > 0.0) {
            return Err(ConfigError::invalid("window", "width and height must be positive"));
        }
        if self.projection.near <= 0.0 {
            return Err(ConfigError::invalid("projection.near", "must be positive"));
        }
        if self.projection.far <= self.projection.near {
            return Err(ConfigError::invalid("projection.far", "must exceed projection.near"));
        }
        if self.projection.min_eye_distance <= 0.0 {
            return Err(ConfigError::invalid("projection.min_eye_distance", "must be positive"));
        }
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(ConfigError::invalid("capture", "resolution must be non-zero"));
        }
        if self.asset.target_size <= 0.0 {
            return Err(ConfigError::invalid("asset.target_size", "must be positive"));
        }
        if self.tracking.default_distance <= 0.0 {
            return Err(ConfigError::invalid("tracking.default_distance", "must be positive"));
        }
        Ok(())
    }
}
