use crate::config::{EstimatorConfig, PointerConfig};

use super::frame::RawFrame;
use super::position::Position3D;

/// Anything that turns one input sample into a viewer position
///
/// `None` means "no update this sample"; callers keep the previous position.
pub trait PositionEstimator {
    type Input: ?Sized;

    fn estimate(&self, input: &Self::Input) -> Option<Position3D>;
}

/// Result of the skin-pixel scan, in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub centroid_x: f32,
    pub centroid_y: f32,
    pub samples: u32,
    pub frame_width: u32,
    pub frame_height: u32,
}

/// Coarse head locator: centroid of skin-colored pixels on a sparse grid
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorHeuristicEstimator {
    config: EstimatorConfig,
}

impl ColorHeuristicEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Skin rule on a single RGB sample
    pub fn is_skin(&self, [r, g, b]: [u8; 3]) -> bool {
        let c = &self.config;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);

        r > c.min_red
            && g > c.min_green
            && b > c.min_blue
            && r > g
            && r > b
            && max - min > c.min_spread
            && r.abs_diff(g) > c.min_red_green_gap
    }

    /// Scan the frame on a stride grid; None when too few pixels qualify
    pub fn detect(&self, frame: &RawFrame) -> Option<Detection> {
        if frame.is_empty() {
            return None;
        }

        let stride = self.config.stride.max(1) as usize;
        let mut sum_x = 0u64;
        let mut sum_y = 0u64;
        let mut samples = 0u32;

        for y in (0..frame.height()).step_by(stride) {
            for x in (0..frame.width()).step_by(stride) {
                let Some(rgb) = frame.pixel(x, y) else {
                    continue;
                };
                if self.is_skin(rgb) {
                    sum_x += x as u64;
                    sum_y += y as u64;
                    samples += 1;
                }
            }
        }

        if samples <= self.config.min_samples {
            return None;
        }

        Some(Detection {
            centroid_x: sum_x as f32 / samples as f32,
            centroid_y: sum_y as f32 / samples as f32,
            samples,
            frame_width: frame.width(),
            frame_height: frame.height(),
        })
    }

    /// Map a detection into portal space
    ///
    /// Horizontal is mirrored so moving left in front of the camera moves the
    /// viewpoint the way a mirror would. More skin pixels means a closer face.
    pub fn to_position(&self, detection: &Detection) -> Position3D {
        let c = &self.config;
        let nx = (detection.centroid_x / detection.frame_width as f32 - 0.5) * 2.0;
        let ny = (detection.centroid_y / detection.frame_height as f32 - 0.5) * 2.0;
        let proximity = ((detection.samples as f32 - c.depth_pivot) / c.depth_span).clamp(-1.0, 1.0);

        Position3D::new(
            -nx * c.horizontal_gain,
            -ny * c.vertical_gain,
            c.baseline_distance + proximity,
        )
    }
}

impl PositionEstimator for ColorHeuristicEstimator {
    type Input = RawFrame;

    fn estimate(&self, frame: &RawFrame) -> Option<Position3D> {
        self.detect(frame).map(|d| self.to_position(&d))
    }
}

/// Pointer location relative to the top-left of the tracking container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub container_width: f32,
    pub container_height: f32,
}

/// Linear mouse/touch mapping; depth stays at the neutral distance
#[derive(Debug, Clone, Copy)]
pub struct PointerEstimator {
    config: PointerConfig,
    default_distance: f32,
}

impl PointerEstimator {
    pub fn new(config: PointerConfig, default_distance: f32) -> Self {
        Self {
            config,
            default_distance,
        }
    }
}

impl PositionEstimator for PointerEstimator {
    type Input = PointerSample;

    fn estimate(&self, sample: &PointerSample) -> Option<Position3D> {
        if sample.container_width <= 0.0 || sample.container_height <= 0.0 {
            return None;
        }
        let x = (sample.x / sample.container_width - 0.5) * self.config.horizontal_range;
        let y = -(sample.y / sample.container_height - 0.5) * self.config.vertical_range;
        Some(Position3D::new(x, y, self.default_distance))
    }
}
