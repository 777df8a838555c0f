//! Viewer tracking: input frames and pointer samples in, smoothed position out
pub mod device;
pub mod estimator;
pub mod frame;
pub mod position;
pub mod session;
pub mod smoother;

pub use device::{CaptureRequest, DisabledCamera, SystemCamera, VideoInput};
pub use estimator::{
    ColorHeuristicEstimator, Detection, PointerEstimator, PointerSample, PositionEstimator,
};
pub use frame::RawFrame;
pub use position::Position3D;
pub use session::{CameraTick, SessionEvent, TrackingMode, TrackingSession};
pub use smoother::{SmoothingFactors, Smoother};
