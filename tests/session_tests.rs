use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use parallax_portal::config::Config;
use parallax_portal::error::TrackingError;
use parallax_portal::tracking::{
    CameraTick, CaptureRequest, PointerSample, Position3D, RawFrame, SessionEvent, TrackingMode,
    TrackingSession, VideoInput,
};

/// Mock camera recording every call, fed frames by the test
#[derive(Default)]
struct MockCamera {
    calls: Rc<RefCell<Vec<&'static str>>>,
    frames: Rc<RefCell<VecDeque<RawFrame>>>,
    fail_with: Option<TrackingError>,
    /// Once set, the stream dies after the queued frames are drained
    lost: Rc<RefCell<Option<TrackingError>>>,
    open: bool,
}

impl VideoInput for MockCamera {
    fn open(&mut self, _request: &CaptureRequest) -> Result<(), TrackingError> {
        self.calls.borrow_mut().push("open");
        if let Some(e) = &self.fail_with {
            return Err(e.clone());
        }
        self.open = true;
        Ok(())
    }

    fn poll_frame(&mut self) -> Result<Option<RawFrame>, TrackingError> {
        self.calls.borrow_mut().push("poll");
        if let Some(frame) = self.frames.borrow_mut().pop_front() {
            return Ok(Some(frame));
        }
        match self.lost.borrow_mut().take() {
            Some(e) => {
                self.open = false;
                Err(e)
            }
            None => Ok(None),
        }
    }

    fn release(&mut self) {
        self.calls.borrow_mut().push("release");
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

fn session() -> (
    TrackingSession<MockCamera>,
    Rc<RefCell<Vec<&'static str>>>,
    Rc<RefCell<VecDeque<RawFrame>>>,
) {
    let camera = MockCamera::default();
    let calls = Rc::clone(&camera.calls);
    let frames = Rc::clone(&camera.frames);
    (TrackingSession::new(camera, &Config::default()), calls, frames)
}

fn face_frame() -> RawFrame {
    let mut frame = RawFrame::filled(320, 240, [128, 128, 128]);
    frame.fill_rect(20, 20, 64, 64, [200, 150, 120]);
    frame
}

fn neutral() -> Position3D {
    Position3D::neutral(Config::default().tracking.default_distance)
}

#[test]
fn test_manual_while_camera_releases_device_first() {
    let (mut session, calls, _) = session();
    assert_eq!(session.request(TrackingMode::CameraTracking), vec![SessionEvent::DeviceOpened]);

    let events = session.request(TrackingMode::ManualTracking);
    assert_eq!(
        events,
        vec![
            SessionEvent::DeviceReleased,
            SessionEvent::PositionReset(neutral()),
            SessionEvent::PointerAttached,
        ]
    );
    assert_eq!(session.mode(), TrackingMode::ManualTracking);
    assert!(!session.device().is_open());
    assert_eq!(*calls.borrow(), vec!["open", "release"]);
}

#[test]
fn test_camera_while_manual_detaches_pointer_first() {
    let (mut session, _, _) = session();
    session.request(TrackingMode::ManualTracking);

    let events = session.request(TrackingMode::CameraTracking);
    assert_eq!(
        events,
        vec![
            SessionEvent::PointerDetached,
            SessionEvent::PositionReset(neutral()),
            SessionEvent::DeviceOpened,
        ]
    );
    assert!(session.device().is_open());
}

#[test]
fn test_stop_takes_effect_before_pending_frame() {
    let (mut session, calls, frames) = session();
    session.start_camera();
    frames.borrow_mut().push_back(face_frame());

    session.stop();
    assert_eq!(session.on_camera_tick(), CameraTick::Waiting);
    assert_eq!(session.tracked(), neutral());
    assert_eq!(*calls.borrow(), vec!["open", "release"]);
}

#[test]
fn test_camera_frames_pull_tracked_position() {
    let (mut session, _, frames) = session();
    session.start_camera();

    for _ in 0..30 {
        frames.borrow_mut().push_back(face_frame());
        assert!(session.on_camera_tick().moved());
    }
    // Face in the upper-left of the mirrored image: eye up and to the right
    let p = session.tracked();
    assert!(p.x > 0.5);
    assert!(p.y > 0.5);
    assert!(session.last_detection().is_some());
}

#[test]
fn test_empty_or_faceless_frames_keep_position() {
    let (mut session, _, frames) = session();
    session.start_camera();

    assert_eq!(session.on_camera_tick(), CameraTick::Waiting);
    frames.borrow_mut().push_back(RawFrame::filled(320, 240, [128, 128, 128]));
    assert_eq!(session.on_camera_tick(), CameraTick::NoDetection);
    assert_eq!(session.tracked(), neutral());
}

#[test]
fn test_preview_tracks_newest_frame() {
    let (mut session, _, frames) = session();
    assert!(session.preview().is_none());
    session.start_camera();

    frames.borrow_mut().push_back(face_frame());
    session.on_camera_tick();
    let (frame, detection) = session.preview().unwrap();
    assert_eq!(frame, &face_frame());
    assert!(detection.is_some());

    // A faceless frame replaces the image and drops the crosshair
    frames.borrow_mut().push_back(RawFrame::filled(320, 240, [128, 128, 128]));
    session.on_camera_tick();
    let (_, detection) = session.preview().unwrap();
    assert!(detection.is_none());
    assert!(session.last_detection().is_some());

    session.stop();
    assert!(session.preview().is_none());
}

#[test]
fn test_acquisition_failure_stays_idle() {
    let camera = MockCamera {
        fail_with: Some(TrackingError::CameraUnavailable {
            index: 0,
            reason: "permission denied".into(),
        }),
        ..MockCamera::default()
    };
    let mut session = TrackingSession::new(camera, &Config::default());

    let events = session.start_camera();
    assert!(matches!(events.as_slice(), [SessionEvent::AcquisitionFailed(_)]));
    assert_eq!(session.mode(), TrackingMode::Idle);
    assert!(session.last_error().is_some());

    // Manual mode is still available and clears the error
    session.start_manual();
    assert_eq!(session.mode(), TrackingMode::ManualTracking);
    assert!(session.last_error().is_none());
}

#[test]
fn test_stream_lost_mid_session_falls_back_to_idle() {
    let camera = MockCamera::default();
    let frames = Rc::clone(&camera.frames);
    let lost = Rc::clone(&camera.lost);
    let mut session = TrackingSession::new(camera, &Config::default());
    session.start_camera();

    for _ in 0..10 {
        frames.borrow_mut().push_back(face_frame());
        assert!(session.on_camera_tick().moved());
    }
    assert_ne!(session.tracked(), neutral());

    let error = TrackingError::StreamLost {
        index: 0,
        reason: "device unplugged".into(),
    };
    *lost.borrow_mut() = Some(error.clone());

    assert_eq!(
        session.on_camera_tick(),
        CameraTick::Lost(vec![
            SessionEvent::DeviceReleased,
            SessionEvent::PositionReset(neutral()),
            SessionEvent::AcquisitionFailed(error.clone()),
        ])
    );
    assert_eq!(session.mode(), TrackingMode::Idle);
    assert_eq!(session.last_error(), Some(&error));
    assert_eq!(session.tracked(), neutral());
    assert!(session.last_detection().is_none());

    // Later ticks are inert and the camera can be started again
    assert_eq!(session.on_camera_tick(), CameraTick::Waiting);
    assert_eq!(session.start_camera(), vec![SessionEvent::DeviceOpened]);
    assert!(session.last_error().is_none());
}

#[test]
fn test_repeated_request_is_noop() {
    let (mut session, calls, _) = session();
    session.start_camera();
    assert!(session.start_camera().is_empty());
    assert_eq!(*calls.borrow(), vec!["open"]);
}

#[test]
fn test_pointer_moves_eye_in_manual_mode() {
    let (mut session, _, _) = session();
    session.start_manual();

    let sample = PointerSample {
        x: 800.0,
        y: 0.0,
        container_width: 800.0,
        container_height: 600.0,
    };
    for _ in 0..100 {
        assert!(session.on_pointer(sample));
    }
    let p = session.tracked();
    assert!((p.x - 2.0).abs() < 1e-3);
    assert!((p.y - 1.5).abs() < 1e-3);
    assert!((p.z - 3.0).abs() < 1e-6);

    session.stop();
    assert_eq!(session.tracked(), neutral());
}

#[test]
fn test_drop_releases_open_device() {
    let (mut session, calls, _) = session();
    session.start_camera();
    drop(session);
    assert_eq!(calls.borrow().last(), Some(&"release"));
}
