use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use parallax_portal::asset::{load_scene_asset, SceneAsset};
use parallax_portal::cli::Cli;
use parallax_portal::config::Config;
use parallax_portal::input::PointerTracker;
use parallax_portal::render::{LoopStatus, MeshRenderer, OverlayState, RenderLoop, UiAction};
use parallax_portal::tracking::{CameraTick, SystemCamera, TrackingMode, TrackingSession};

const FPS_UPDATE_INTERVAL: f32 = 1.0;
// 3:2, same as the default portal aperture
const INITIAL_WINDOW_WIDTH: u32 = 960;
const INITIAL_WINDOW_HEIGHT: u32 = 640;

struct App {
    window: Option<Arc<Window>>,
    renderer: Option<MeshRenderer>,
    pointer: Option<PointerTracker>,
    session: TrackingSession<SystemCamera>,
    asset: SceneAsset,
    render_loop: RenderLoop,
    start_mode: TrackingMode,
    show_ui: bool,
    last_frame_time: Instant,
    frame_count: u32,
    fps: f32,
    fps_update_timer: f32,
}

impl App {
    fn new(cli: &Cli, config: &Config, asset: SceneAsset) -> Self {
        Self {
            window: None,
            renderer: None,
            pointer: None,
            session: TrackingSession::new(SystemCamera::default(), config),
            asset,
            render_loop: RenderLoop::new(config),
            start_mode: cli.mode.into(),
            show_ui: !cli.no_ui,
            last_frame_time: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            fps_update_timer: 0.0,
        }
    }

    fn update_fps(&mut self, delta: f32) {
        self.frame_count += 1;
        self.fps_update_timer += delta;

        if self.fps_update_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.fps_update_timer;
            debug!("FPS: {:.1} ({} mode)", self.fps, self.session.mode().label());
            self.frame_count = 0;
            self.fps_update_timer = 0.0;
        }
    }

    fn apply(&mut self, action: UiAction) {
        for event in action.apply(&mut self.session, &mut self.asset) {
            debug!("Session event: {:?}", event);
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        let action = match key {
            KeyCode::Escape => {
                event_loop.exit();
                return;
            }
            KeyCode::KeyC => UiAction::StartCamera,
            KeyCode::KeyM => UiAction::StartManual,
            KeyCode::KeyX => UiAction::Stop,
            KeyCode::KeyR => UiAction::ResetControls,
            _ => return,
        };
        self.apply(action);
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;
        self.update_fps(delta);

        if let CameraTick::Lost(events) = self.session.on_camera_tick() {
            for event in events {
                debug!("Session event: {:?}", event);
            }
        }

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        renderer.set_overlay(OverlayState::capture(
            &self.session,
            &self.asset,
            self.fps,
            self.show_ui,
        ));
        let status = self
            .render_loop
            .frame(&mut self.asset, self.session.tracked(), &mut *renderer);

        for action in renderer.take_actions() {
            self.apply(action);
        }
        if status == LoopStatus::Failed {
            warn!("Render loop stopped; close the window to exit");
            for event in self.session.stop() {
                debug!("Session event: {:?}", event);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Parallax Portal")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    INITIAL_WINDOW_WIDTH,
                    INITIAL_WINDOW_HEIGHT,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match pollster::block_on(MeshRenderer::new(window.clone(), self.asset.mesh())) {
            Ok(r) => r,
            Err(e) => {
                error!("Failed to initialize renderer: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        self.pointer = Some(PointerTracker::new(window.inner_size()));
        self.window = Some(window);
        self.renderer = Some(renderer);

        if self.start_mode != TrackingMode::Idle {
            for event in self.session.request(self.start_mode) {
                debug!("Session event: {:?}", event);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::Resized(size) = event {
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(size);
            }
        }
        if let Some(sample) = self.pointer.as_mut().and_then(|p| p.process_event(&event)) {
            let over_ui = self.renderer.as_ref().is_some_and(|r| r.wants_pointer());
            if !over_ui {
                self.session.on_pointer(sample);
            }
        }

        // Let egui handle the event first
        if let Some(renderer) = &mut self.renderer {
            if renderer.handle_event(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.render_loop.is_running() {
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(index) = cli.camera_index {
        config.capture.camera_index = index;
    }

    let asset = load_scene_asset(cli.model.as_deref(), config.asset.target_size);
    info!(
        "Showing {} ({} triangles)",
        match asset.source() {
            parallax_portal::AssetSource::File(path) => path.display().to_string(),
            parallax_portal::AssetSource::Default => "built-in model".to_string(),
        },
        asset.mesh().triangle_count()
    );

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(&cli, &config, asset);

    info!("Controls: C camera, M manual, X stop, R reset model, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
