use glam::{Mat4, Vec3};
use log::{debug, error};

use crate::asset::SceneAsset;
use crate::config::{AnimationConfig, Config};
use crate::error::RenderError;
use crate::projection::{OffAxisProjector, Projection, WindowGeometry};
use crate::tracking::Position3D;

/// Deterministic floating motion; the clock advances a fixed step per frame
#[derive(Debug, Clone)]
pub struct IdleAnimation {
    time: f32,
    config: AnimationConfig,
}

impl IdleAnimation {
    pub fn new(config: AnimationConfig) -> Self {
        Self { time: 0.0, config }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Step the clock and return `(bob, sway)`: vertical offset and yaw in radians
    pub fn advance(&mut self) -> (f32, f32) {
        self.time += self.config.time_step;
        let bob = (self.time * self.config.bob_rate).sin() * self.config.bob_amplitude;
        let sway = (self.time * self.config.sway_rate).sin() * self.config.sway_amplitude;
        (bob, sway)
    }
}

/// Everything a backend needs to draw one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Viewer position the projection was built from
    pub eye: Position3D,
    pub projection: Projection,
    pub view: Mat4,
    pub proj: Mat4,
    pub model: Mat4,
    pub camera_position: Vec3,
}

impl FrameState {
    pub fn view_projection(&self) -> Mat4 {
        self.proj * self.view
    }
}

/// Draw submission boundary
pub trait RenderBackend {
    /// Draw and present one frame
    ///
    /// `Transient` errors skip this frame only; `Fatal` means the backend
    /// cannot draw again.
    fn draw(&mut self, frame: &FrameState) -> Result<(), RenderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    Presented,
    Skipped,
    /// The backend failed for good on this frame; the loop is now stopped
    Failed,
    /// The loop has shut down; no more frames should be scheduled
    Stopped,
}

/// Per-frame driver: animate, project from the tracked position, submit
pub struct RenderLoop {
    animation: IdleAnimation,
    projector: OffAxisProjector,
    window: WindowGeometry,
    running: bool,
    presented: u64,
}

impl RenderLoop {
    pub fn new(config: &Config) -> Self {
        Self {
            animation: IdleAnimation::new(config.animation),
            projector: OffAxisProjector::new(config.projection, config.tracking.default_distance),
            window: config.window,
            running: true,
            presented: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn presented_frames(&self) -> u64 {
        self.presented
    }

    pub fn animation(&self) -> &IdleAnimation {
        &self.animation
    }

    /// Build the frame for `tracked` without drawing or advancing the clock
    pub fn prepare(&self, asset: &SceneAsset, tracked: Position3D) -> FrameState {
        let projection = self.projector.project(tracked, &self.window);
        FrameState {
            eye: tracked,
            projection,
            view: projection.pose.view_matrix(),
            proj: projection.frustum.projection_matrix(),
            model: asset.transform.model_matrix(),
            camera_position: projection.pose.position,
        }
    }

    /// Run one frame; the frustum is rebuilt from `tracked` every time
    pub fn frame<B: RenderBackend + ?Sized>(
        &mut self,
        asset: &mut SceneAsset,
        tracked: Position3D,
        backend: &mut B,
    ) -> LoopStatus {
        if !self.running {
            return LoopStatus::Stopped;
        }

        let (bob, sway) = self.animation.advance();
        asset.transform.set_idle_motion(bob, sway);
        let frame = self.prepare(asset, tracked);

        match backend.draw(&frame) {
            Ok(()) => {
                self.presented += 1;
                LoopStatus::Presented
            }
            Err(RenderError::Transient(reason)) => {
                debug!("Frame skipped: {}", reason);
                LoopStatus::Skipped
            }
            Err(RenderError::Fatal(reason)) => {
                error!("Rendering stopped after {} frames: {}", self.presented, reason);
                self.running = false;
                LoopStatus::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_clock_is_fixed_step() {
        let mut animation = IdleAnimation::new(AnimationConfig::default());
        animation.advance();
        animation.advance();
        assert!((animation.time() - 0.032).abs() < 1e-6);
    }

    #[test]
    fn test_idle_motion_values() {
        let mut animation = IdleAnimation::new(AnimationConfig::default());
        let (bob, sway) = animation.advance();
        assert!((bob - (0.032f32).sin() * 0.05).abs() < 1e-7);
        assert!((sway - (0.008f32).sin() * 0.1).abs() < 1e-7);
    }

    #[test]
    fn test_idle_motion_is_bounded() {
        let config = AnimationConfig::default();
        let mut animation = IdleAnimation::new(config);
        for _ in 0..2000 {
            let (bob, sway) = animation.advance();
            assert!(bob.abs() <= config.bob_amplitude + 1e-6);
            assert!(sway.abs() <= config.sway_amplitude + 1e-6);
        }
    }
}
