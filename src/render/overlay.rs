use std::ops::RangeInclusive;

use egui::{Align2, Color32, RichText};
use glam::Vec3;

use crate::asset::{Axis, SceneAsset, MAX_SCALE_MULTIPLIER, MIN_SCALE_MULTIPLIER};
use crate::tracking::{
    Detection, Position3D, RawFrame, SessionEvent, TrackingMode, TrackingSession, VideoInput,
};

const ACCENT: Color32 = Color32::from_rgb(0, 255, 255);
const ERROR: Color32 = Color32::from_rgb(255, 90, 90);
const MUTED: Color32 = Color32::GRAY;

const PREVIEW_WIDTH: f32 = 160.0;
// Crosshair circle radius and arm length, in camera pixels
const CROSSHAIR_RADIUS: f32 = 30.0;
const CROSSHAIR_ARM: f32 = 40.0;

// Stored rotation wraps at 360, so the slider stops one degree short
const ROTATION_RANGE: RangeInclusive<f32> = 0.0..=359.0;

/// Rotation/scale values shown in the model controls panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelControls {
    pub rotation_degrees: Vec3,
    pub scale_multiplier: f32,
}

/// Mirrored camera image with the detected face position
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPreview {
    pub frame: RawFrame,
    /// Detection centroid in the mirrored image, normalized to [0, 1]
    pub crosshair: Option<[f32; 2]>,
}

impl CameraPreview {
    pub fn new(frame: &RawFrame, detection: Option<&Detection>) -> Self {
        let crosshair = detection
            .filter(|d| d.frame_width > 0 && d.frame_height > 0)
            .map(|d| {
                [
                    1.0 - d.centroid_x / d.frame_width as f32,
                    d.centroid_y / d.frame_height as f32,
                ]
            });
        Self {
            frame: frame.mirrored(),
            crosshair,
        }
    }
}

/// Snapshot of what the overlay displays this frame
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    pub visible: bool,
    pub mode: TrackingMode,
    pub error: Option<String>,
    pub tracked: Position3D,
    pub detection: Option<Detection>,
    pub fps: f32,
    /// Present only while camera tracking has delivered a frame
    pub preview: Option<CameraPreview>,
    /// Present only for user-supplied models while tracking
    pub model_controls: Option<ModelControls>,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self {
            visible: true,
            mode: TrackingMode::Idle,
            error: None,
            tracked: Position3D::neutral(3.0),
            detection: None,
            fps: 0.0,
            preview: None,
            model_controls: None,
        }
    }
}

impl OverlayState {
    pub fn capture<D: VideoInput>(session: &TrackingSession<D>, asset: &SceneAsset, fps: f32, visible: bool) -> Self {
        let tracking = session.mode() != TrackingMode::Idle;
        let model_controls = (tracking && asset.is_user_supplied()).then(|| ModelControls {
            rotation_degrees: asset.transform.rotation_degrees(),
            scale_multiplier: asset.transform.scale_multiplier(),
        });
        Self {
            visible,
            mode: session.mode(),
            error: session.last_error().map(|e| e.to_string()),
            tracked: session.tracked(),
            detection: session.last_detection().copied(),
            fps,
            preview: session.preview().map(|(frame, detection)| CameraPreview::new(frame, detection)),
            model_controls,
        }
    }
}

/// Requests raised by overlay widgets or keyboard shortcuts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    StartCamera,
    StartManual,
    Stop,
    DismissError,
    SetRotation(Axis, f32),
    SetScale(f32),
    ResetControls,
}

impl UiAction {
    /// Apply to the session or asset; returns the session events it caused
    pub fn apply<D: VideoInput>(self, session: &mut TrackingSession<D>, asset: &mut SceneAsset) -> Vec<SessionEvent> {
        match self {
            UiAction::StartCamera => session.start_camera(),
            UiAction::StartManual => session.start_manual(),
            UiAction::Stop => session.stop(),
            UiAction::DismissError => {
                session.dismiss_error();
                Vec::new()
            }
            UiAction::SetRotation(axis, degrees) => {
                asset.transform.set_rotation_degrees(axis, degrees);
                Vec::new()
            }
            UiAction::SetScale(multiplier) => {
                asset.transform.set_scale_multiplier(multiplier);
                Vec::new()
            }
            UiAction::ResetControls => {
                asset.transform.reset_controls();
                Vec::new()
            }
        }
    }
}

/// Draw every overlay panel and collect the actions the user triggered
pub fn show(ctx: &egui::Context, state: &OverlayState) -> Vec<UiAction> {
    let mut actions = Vec::new();
    if !state.visible {
        return actions;
    }

    mode_panel(ctx, state, &mut actions);
    if let Some(error) = &state.error {
        error_panel(ctx, error, &mut actions);
    }
    if let Some(controls) = state.model_controls {
        controls_panel(ctx, controls, &mut actions);
    }
    if let Some(preview) = &state.preview {
        preview_panel(ctx, preview);
    }
    stats_panel(ctx, state);

    actions
}

fn mode_panel(ctx: &egui::Context, state: &OverlayState, actions: &mut Vec<UiAction>) {
    egui::Window::new("Portal")
        .anchor(Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            match state.mode {
                TrackingMode::Idle => {
                    ui.label("Look into the window from different angles.");
                    ui.label(RichText::new("Camera: move your head. Manual: move the mouse.").color(MUTED));
                    ui.horizontal(|ui| {
                        if ui.button("Start camera (C)").clicked() {
                            actions.push(UiAction::StartCamera);
                        }
                        if ui.button("Manual (M)").clicked() {
                            actions.push(UiAction::StartManual);
                        }
                    });
                }
                mode => {
                    let text = match mode {
                        TrackingMode::CameraTracking => "Head tracking active",
                        _ => "Manual tracking active",
                    };
                    ui.label(RichText::new(text).color(ACCENT).strong());
                    if ui.button("Stop (X)").clicked() {
                        actions.push(UiAction::Stop);
                    }
                }
            }
        });
}

fn error_panel(ctx: &egui::Context, error: &str, actions: &mut Vec<UiAction>) {
    egui::Window::new("Camera error")
        .anchor(Align2::CENTER_TOP, [0.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.label(RichText::new(error).color(ERROR));
            ui.label(RichText::new("Manual mode still works.").color(MUTED));
            ui.horizontal(|ui| {
                if ui.button("Use manual").clicked() {
                    actions.push(UiAction::DismissError);
                    actions.push(UiAction::StartManual);
                }
                if ui.button("Dismiss").clicked() {
                    actions.push(UiAction::DismissError);
                }
            });
        });
}

fn controls_panel(ctx: &egui::Context, controls: ModelControls, actions: &mut Vec<UiAction>) {
    egui::Window::new("Model")
        .anchor(Align2::RIGHT_TOP, [-10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            let r = controls.rotation_degrees;
            for (axis, label, mut degrees) in [(Axis::X, "Rotate X", r.x), (Axis::Y, "Rotate Y", r.y), (Axis::Z, "Rotate Z", r.z)] {
                let slider = egui::Slider::new(&mut degrees, ROTATION_RANGE).text(label).suffix("°");
                if ui.add(slider).changed() {
                    actions.push(UiAction::SetRotation(axis, degrees));
                }
            }

            let mut scale = controls.scale_multiplier;
            let slider = egui::Slider::new(&mut scale, MIN_SCALE_MULTIPLIER..=MAX_SCALE_MULTIPLIER)
                .step_by(0.05)
                .text("Scale");
            if ui.add(slider).changed() {
                actions.push(UiAction::SetScale(scale));
            }

            if ui.button("Reset (R)").clicked() {
                actions.push(UiAction::ResetControls);
            }
        });
}

fn preview_panel(ctx: &egui::Context, preview: &CameraPreview) {
    let frame = &preview.frame;
    if frame.is_empty() {
        return;
    }
    let size = [frame.width() as usize, frame.height() as usize];
    let image = egui::ColorImage::from_rgb(size, frame.pixels());

    // One texture, refreshed in place every frame
    let id = egui::Id::new("camera_preview");
    let texture = match ctx.data_mut(|d| d.get_temp::<egui::TextureHandle>(id)) {
        Some(mut texture) => {
            texture.set(image, egui::TextureOptions::LINEAR);
            texture
        }
        None => {
            let texture = ctx.load_texture("camera_preview", image, egui::TextureOptions::LINEAR);
            ctx.data_mut(|d| d.insert_temp(id, texture.clone()));
            texture
        }
    };

    egui::Window::new("Camera")
        .title_bar(false)
        .resizable(false)
        .anchor(Align2::RIGHT_BOTTOM, [-10.0, -10.0])
        .show(ctx, |ui| {
            let height = PREVIEW_WIDTH * frame.height() as f32 / frame.width() as f32;
            let response = ui.add(egui::Image::new((texture.id(), egui::vec2(PREVIEW_WIDTH, height))));

            if let Some([x, y]) = preview.crosshair {
                let rect = response.rect;
                let center = rect.min + egui::vec2(x * rect.width(), y * rect.height());
                let scale = rect.width() / frame.width() as f32;
                let arm = CROSSHAIR_ARM * scale;
                let stroke = egui::Stroke::new(2.0, ACCENT);
                let painter = ui.painter_at(rect);
                painter.circle_stroke(center, CROSSHAIR_RADIUS * scale, stroke);
                painter.line_segment([center - egui::vec2(arm, 0.0), center + egui::vec2(arm, 0.0)], stroke);
                painter.line_segment([center - egui::vec2(0.0, arm), center + egui::vec2(0.0, arm)], stroke);
            }
            ui.label(RichText::new("Tracking").small().color(ACCENT));
        });
}

fn stats_panel(ctx: &egui::Context, state: &OverlayState) {
    egui::Window::new("Stats")
        .title_bar(false)
        .resizable(false)
        .anchor(Align2::LEFT_BOTTOM, [10.0, -10.0])
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            ui.label(RichText::new(format!("{:.0} FPS", state.fps)).size(18.0).color(ACCENT));
            let p = state.tracked;
            ui.label(
                RichText::new(format!("{}  eye ({:+.2}, {:+.2}, {:.2})", state.mode.label(), p.x, p.y, p.z))
                    .color(MUTED),
            );
            if let Some(d) = &state.detection {
                ui.label(
                    RichText::new(format!(
                        "face at ({:.0}, {:.0}) of {}x{}, {} samples",
                        d.centroid_x, d.centroid_y, d.frame_width, d.frame_height, d.samples
                    ))
                    .color(MUTED),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetSource, Mesh};
    use crate::config::Config;
    use crate::tracking::DisabledCamera;

    fn file_asset() -> SceneAsset {
        SceneAsset::new(Mesh::default(), AssetSource::File("model.glb".into()))
    }

    #[test]
    fn test_controls_only_for_user_models_while_tracking() {
        let mut session = TrackingSession::new(DisabledCamera, &Config::default());
        let builtin = SceneAsset::new(Mesh::default(), AssetSource::Default);
        assert!(OverlayState::capture(&session, &file_asset(), 60.0, true).model_controls.is_none());

        session.start_manual();
        assert!(OverlayState::capture(&session, &builtin, 60.0, true).model_controls.is_none());
        assert!(OverlayState::capture(&session, &file_asset(), 60.0, true).model_controls.is_some());
    }

    #[test]
    fn test_asset_actions() {
        let mut session = TrackingSession::new(DisabledCamera, &Config::default());
        let mut asset = file_asset();

        UiAction::SetScale(5.0).apply(&mut session, &mut asset);
        assert_eq!(asset.transform.scale_multiplier(), MAX_SCALE_MULTIPLIER);

        UiAction::SetRotation(Axis::Z, 45.0).apply(&mut session, &mut asset);
        assert_eq!(asset.transform.rotation_degrees().z, 45.0);

        UiAction::ResetControls.apply(&mut session, &mut asset);
        assert_eq!(asset.transform.rotation_degrees(), Vec3::ZERO);
        assert_eq!(asset.transform.scale_multiplier(), 1.0);
    }

    #[test]
    fn test_rotation_slider_ends_are_kept() {
        let mut session = TrackingSession::new(DisabledCamera, &Config::default());
        let mut asset = file_asset();

        for degrees in [*ROTATION_RANGE.start(), *ROTATION_RANGE.end()] {
            UiAction::SetRotation(Axis::Y, degrees).apply(&mut session, &mut asset);
            assert_eq!(asset.transform.rotation_degrees().y, degrees);
        }
    }

    #[test]
    fn test_failed_camera_shows_error_until_dismissed() {
        let mut session = TrackingSession::new(DisabledCamera, &Config::default());
        let mut asset = file_asset();

        UiAction::StartCamera.apply(&mut session, &mut asset);
        assert!(OverlayState::capture(&session, &asset, 0.0, true).error.is_some());

        UiAction::DismissError.apply(&mut session, &mut asset);
        assert!(OverlayState::capture(&session, &asset, 0.0, true).error.is_none());
    }

    #[test]
    fn test_preview_crosshair_is_mirrored() {
        let frame = RawFrame::filled(320, 240, [0, 0, 0]);
        let detection = Detection {
            centroid_x: 80.0,
            centroid_y: 60.0,
            samples: 400,
            frame_width: 320,
            frame_height: 240,
        };

        let preview = CameraPreview::new(&frame, Some(&detection));
        assert_eq!(preview.crosshair, Some([0.75, 0.25]));
        assert!(CameraPreview::new(&frame, None).crosshair.is_none());
    }

    #[test]
    fn test_preview_only_while_camera_tracking() {
        let mut session = TrackingSession::new(DisabledCamera, &Config::default());
        let asset = file_asset();
        session.start_manual();
        assert!(OverlayState::capture(&session, &asset, 0.0, true).preview.is_none());
    }

    #[test]
    fn test_preview_panel_draws() {
        let ctx = egui::Context::default();
        let frame = RawFrame::filled(32, 24, [200, 150, 120]);
        let state = OverlayState {
            preview: Some(CameraPreview {
                frame,
                crosshair: Some([0.5, 0.5]),
            }),
            ..OverlayState::default()
        };
        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                show(ctx, &state);
            });
        }
    }

    #[test]
    fn test_hidden_overlay_emits_nothing() {
        let ctx = egui::Context::default();
        let state = OverlayState {
            visible: false,
            ..OverlayState::default()
        };
        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| actions = show(ctx, &state));
        assert!(actions.is_empty());
    }
}
