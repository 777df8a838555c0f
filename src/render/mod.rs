pub mod overlay;
pub mod render_loop;
pub mod renderer;

pub use overlay::{OverlayState, UiAction};
pub use render_loop::{FrameState, IdleAnimation, LoopStatus, RenderBackend, RenderLoop};
pub use renderer::MeshRenderer;
