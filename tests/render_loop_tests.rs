use std::collections::VecDeque;

use parallax_portal::asset::{Axis, SceneAsset};
use parallax_portal::config::Config;
use parallax_portal::error::RenderError;
use parallax_portal::render::{FrameState, LoopStatus, RenderBackend, RenderLoop};
use parallax_portal::tracking::Position3D;
use parallax_portal::{create_default_model, AssetSource};

/// Mock backend replaying scripted results and keeping every frame it was given
#[derive(Default)]
struct MockBackend {
    script: VecDeque<Result<(), RenderError>>,
    frames: Vec<FrameState>,
}

impl MockBackend {
    fn scripted(results: Vec<Result<(), RenderError>>) -> Self {
        Self {
            script: results.into(),
            frames: Vec::new(),
        }
    }
}

impl RenderBackend for MockBackend {
    fn draw(&mut self, frame: &FrameState) -> Result<(), RenderError> {
        self.frames.push(*frame);
        self.script.pop_front().unwrap_or(Ok(()))
    }
}

fn asset() -> SceneAsset {
    SceneAsset::new(create_default_model(), AssetSource::Default)
}

#[test]
fn test_transient_error_skips_one_frame() {
    let mut render_loop = RenderLoop::new(&Config::default());
    let mut backend = MockBackend::scripted(vec![Err(RenderError::Transient("outdated".into()))]);
    let mut asset = asset();
    let eye = Position3D::neutral(3.0);

    assert_eq!(render_loop.frame(&mut asset, eye, &mut backend), LoopStatus::Skipped);
    assert_eq!(render_loop.frame(&mut asset, eye, &mut backend), LoopStatus::Presented);
    assert!(render_loop.is_running());
    assert_eq!(render_loop.presented_frames(), 1);
}

#[test]
fn test_fatal_error_stops_the_loop() {
    let mut render_loop = RenderLoop::new(&Config::default());
    let mut backend = MockBackend::scripted(vec![Ok(()), Err(RenderError::Fatal("device lost".into()))]);
    let mut asset = asset();
    let eye = Position3D::neutral(3.0);

    assert_eq!(render_loop.frame(&mut asset, eye, &mut backend), LoopStatus::Presented);
    assert_eq!(render_loop.frame(&mut asset, eye, &mut backend), LoopStatus::Failed);
    assert!(!render_loop.is_running());

    // Failure is reported once; no further draws are attempted
    for _ in 0..3 {
        assert_eq!(render_loop.frame(&mut asset, eye, &mut backend), LoopStatus::Stopped);
    }
    assert_eq!(backend.frames.len(), 2);
}

#[test]
fn test_frustum_follows_tracked_position_every_frame() {
    let mut render_loop = RenderLoop::new(&Config::default());
    let mut backend = MockBackend::default();
    let mut asset = asset();

    render_loop.frame(&mut asset, Position3D::new(0.0, 0.0, 3.0), &mut backend);
    render_loop.frame(&mut asset, Position3D::new(1.0, 0.0, 3.0), &mut backend);

    let [first, second] = [backend.frames[0], backend.frames[1]];
    assert!(first.projection.frustum.horizontal_center().abs() < 1e-6);
    assert!(second.projection.frustum.horizontal_center() < 0.0);
    assert_eq!(second.camera_position.x, 1.0);
    assert_eq!(second.eye, Position3D::new(1.0, 0.0, 3.0));
}

#[test]
fn test_idle_motion_does_not_overwrite_rotation() {
    let mut render_loop = RenderLoop::new(&Config::default());
    let mut backend = MockBackend::default();
    let mut asset = asset();
    asset.transform.set_rotation_degrees(Axis::Y, 90.0);

    for _ in 0..10 {
        render_loop.frame(&mut asset, Position3D::neutral(3.0), &mut backend);
    }

    assert_eq!(asset.transform.rotation_degrees().y, 90.0);
    // The model still floats: consecutive frames differ
    assert_ne!(backend.frames[8].model, backend.frames[9].model);
}

#[test]
fn test_idle_clock_advances_once_per_frame() {
    let mut render_loop = RenderLoop::new(&Config::default());
    let mut backend = MockBackend::scripted(vec![Err(RenderError::Transient("timeout".into()))]);
    let mut asset = asset();

    for _ in 0..5 {
        render_loop.frame(&mut asset, Position3D::neutral(3.0), &mut backend);
    }
    assert!((render_loop.animation().time() - 5.0 * 0.016).abs() < 1e-5);
}
