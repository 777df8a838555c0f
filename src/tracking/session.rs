use log::{debug, info, warn};

use crate::config::Config;
use crate::error::TrackingError;

use super::device::{CaptureRequest, VideoInput};
use super::estimator::{ColorHeuristicEstimator, Detection, PointerEstimator, PointerSample, PositionEstimator};
use super::frame::RawFrame;
use super::position::Position3D;
use super::smoother::Smoother;

/// Which input, if any, currently drives the tracked position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingMode {
    #[default]
    Idle,
    CameraTracking,
    ManualTracking,
}

impl TrackingMode {
    pub fn label(&self) -> &'static str {
        match self {
            TrackingMode::Idle => "idle",
            TrackingMode::CameraTracking => "camera",
            TrackingMode::ManualTracking => "manual",
        }
    }
}

/// Side effects of a mode transition, in the order they happened
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    DeviceOpened,
    DeviceReleased,
    PointerAttached,
    PointerDetached,
    PositionReset(Position3D),
    AcquisitionFailed(TrackingError),
}

/// Result of one camera estimation step
#[derive(Debug, Clone, PartialEq)]
pub enum CameraTick {
    /// Not camera tracking, or no new frame yet
    Waiting,
    /// A frame arrived without a face-like region
    NoDetection,
    Moved,
    /// The stream died; the session fell back to Idle
    Lost(Vec<SessionEvent>),
}

impl CameraTick {
    pub fn moved(&self) -> bool {
        matches!(self, CameraTick::Moved)
    }
}

/// Tracking state machine
///
/// Idle is the hub: camera and manual tracking are only entered from Idle,
/// and leaving either one always goes back through Idle, which releases the
/// input and resets the tracked position. The session is the sole writer of
/// the tracked position.
pub struct TrackingSession<D: VideoInput> {
    mode: TrackingMode,
    device: D,
    capture: CaptureRequest,
    camera_estimator: ColorHeuristicEstimator,
    pointer_estimator: PointerEstimator,
    smoother: Smoother,
    neutral: Position3D,
    last_error: Option<TrackingError>,
    last_detection: Option<Detection>,
    /// Newest camera frame and whether a detection was found in it
    last_frame: Option<(RawFrame, bool)>,
}

impl<D: VideoInput> TrackingSession<D> {
    pub fn new(device: D, config: &Config) -> Self {
        let neutral = Position3D::neutral(config.tracking.default_distance);
        Self {
            mode: TrackingMode::Idle,
            device,
            capture: config.capture,
            camera_estimator: ColorHeuristicEstimator::new(config.estimator),
            pointer_estimator: PointerEstimator::new(config.pointer, config.tracking.default_distance),
            smoother: Smoother::new(neutral, config.smoothing),
            neutral,
            last_error: None,
            last_detection: None,
            last_frame: None,
        }
    }

    pub fn mode(&self) -> TrackingMode {
        self.mode
    }

    /// Copy of the smoothed viewer position for this render frame
    pub fn tracked(&self) -> Position3D {
        self.smoother.position()
    }

    /// Last camera acquisition failure, kept until a successful start or dismissal
    pub fn last_error(&self) -> Option<&TrackingError> {
        self.last_error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Most recent successful skin detection while camera tracking
    pub fn last_detection(&self) -> Option<&Detection> {
        self.last_detection.as_ref()
    }

    /// Newest camera frame, with the detection made in that frame if any
    pub fn preview(&self) -> Option<(&RawFrame, Option<&Detection>)> {
        let (frame, detected) = self.last_frame.as_ref()?;
        let detection = if *detected { self.last_detection.as_ref() } else { None };
        Some((frame, detection))
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Transition to `mode`, passing through Idle when switching sources
    pub fn request(&mut self, mode: TrackingMode) -> Vec<SessionEvent> {
        match mode {
            TrackingMode::Idle => self.stop(),
            TrackingMode::CameraTracking => self.start_camera(),
            TrackingMode::ManualTracking => self.start_manual(),
        }
    }

    pub fn start_camera(&mut self) -> Vec<SessionEvent> {
        if self.mode == TrackingMode::CameraTracking {
            return Vec::new();
        }
        let mut events = self.stop();

        match self.device.open(&self.capture) {
            Ok(()) => {
                info!("Camera tracking started (camera {})", self.capture.camera_index);
                self.mode = TrackingMode::CameraTracking;
                self.last_error = None;
                events.push(SessionEvent::DeviceOpened);
            }
            Err(e) => {
                warn!("Camera unavailable, staying idle: {}", e);
                self.last_error = Some(e.clone());
                events.push(SessionEvent::AcquisitionFailed(e));
            }
        }
        events
    }

    pub fn start_manual(&mut self) -> Vec<SessionEvent> {
        if self.mode == TrackingMode::ManualTracking {
            return Vec::new();
        }
        let mut events = self.stop();

        info!("Manual tracking started");
        self.mode = TrackingMode::ManualTracking;
        self.last_error = None;
        events.push(SessionEvent::PointerAttached);
        events
    }

    /// Return to Idle: release the active input and snap to the neutral position
    pub fn stop(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        match self.mode {
            TrackingMode::Idle => return events,
            TrackingMode::CameraTracking => {
                self.device.release();
                events.push(SessionEvent::DeviceReleased);
            }
            TrackingMode::ManualTracking => events.push(SessionEvent::PointerDetached),
        }

        info!("Tracking stopped ({})", self.mode.label());
        self.mode = TrackingMode::Idle;
        self.last_detection = None;
        self.last_frame = None;
        self.smoother.reset(self.neutral);
        events.push(SessionEvent::PositionReset(self.neutral));
        events
    }

    /// Estimation step for camera tracking
    ///
    /// The mode is checked first on every call so a stop takes effect before
    /// any frame still in flight is processed. A dead stream is handled like a
    /// failed start: back to Idle with the error kept for display.
    pub fn on_camera_tick(&mut self) -> CameraTick {
        if self.mode != TrackingMode::CameraTracking {
            return CameraTick::Waiting;
        }
        let frame = match self.device.poll_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return CameraTick::Waiting,
            Err(e) => {
                warn!("Camera stream lost, returning to idle: {}", e);
                let mut events = self.stop();
                self.last_error = Some(e.clone());
                events.push(SessionEvent::AcquisitionFailed(e));
                return CameraTick::Lost(events);
            }
        };
        let Some(detection) = self.camera_estimator.detect(&frame) else {
            debug!("No face-like region in frame");
            self.last_frame = Some((frame, false));
            return CameraTick::NoDetection;
        };

        let target = self.camera_estimator.to_position(&detection);
        self.last_detection = Some(detection);
        self.last_frame = Some((frame, true));
        self.smoother.update(target);
        CameraTick::Moved
    }

    /// Estimation step for manual tracking; ignored unless pointer input is attached
    pub fn on_pointer(&mut self, sample: PointerSample) -> bool {
        if self.mode != TrackingMode::ManualTracking {
            return false;
        }
        match self.pointer_estimator.estimate(&sample) {
            Some(target) => {
                self.smoother.update(target);
                true
            }
            None => false,
        }
    }
}

impl<D: VideoInput> Drop for TrackingSession<D> {
    fn drop(&mut self) {
        if self.mode == TrackingMode::CameraTracking {
            self.device.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::device::DisabledCamera;

    #[test]
    fn test_starts_idle_at_neutral() {
        let session = TrackingSession::new(DisabledCamera, &Config::default());
        assert_eq!(session.mode(), TrackingMode::Idle);
        assert_eq!(session.tracked(), Position3D::neutral(3.0));
    }

    #[test]
    fn test_camera_failure_falls_back_to_idle() {
        let mut session = TrackingSession::new(DisabledCamera, &Config::default());
        let events = session.start_camera();

        assert_eq!(session.mode(), TrackingMode::Idle);
        assert_eq!(
            events,
            vec![SessionEvent::AcquisitionFailed(TrackingError::CaptureUnsupported)]
        );
        assert!(session.last_error().is_some());

        session.dismiss_error();
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut session = TrackingSession::new(DisabledCamera, &Config::default());
        assert!(session.stop().is_empty());
    }

    #[test]
    fn test_pointer_ignored_outside_manual_mode() {
        let mut session = TrackingSession::new(DisabledCamera, &Config::default());
        let sample = PointerSample {
            x: 0.0,
            y: 0.0,
            container_width: 100.0,
            container_height: 100.0,
        };
        assert!(!session.on_pointer(sample));
        assert_eq!(session.tracked(), Position3D::neutral(3.0));
    }
}
