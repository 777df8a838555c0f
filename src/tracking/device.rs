use serde::{Deserialize, Serialize};

use crate::error::TrackingError;

use super::frame::RawFrame;

/// What to ask the capture device for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureRequest {
    /// Platform camera index; 0 is the default (usually user-facing) camera
    pub camera_index: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            camera_index: 0,
            width: 320,
            height: 240,
        }
    }
}

/// Video input boundary
///
/// Frames arrive at the device's own cadence; `poll_frame` never blocks and
/// returns the newest frame delivered since the previous call, if any.
/// An error means the stream is gone and the device has closed itself.
pub trait VideoInput {
    fn open(&mut self, request: &CaptureRequest) -> Result<(), TrackingError>;

    fn poll_frame(&mut self) -> Result<Option<RawFrame>, TrackingError>;

    /// Stop streaming and close the device. Must be safe to call when closed.
    fn release(&mut self);

    fn is_open(&self) -> bool;
}

/// Stand-in used when the crate is built without a capture backend
#[derive(Debug, Default)]
pub struct DisabledCamera;

impl VideoInput for DisabledCamera {
    fn open(&mut self, _request: &CaptureRequest) -> Result<(), TrackingError> {
        Err(TrackingError::CaptureUnsupported)
    }

    fn poll_frame(&mut self) -> Result<Option<RawFrame>, TrackingError> {
        Ok(None)
    }

    fn release(&mut self) {}

    fn is_open(&self) -> bool {
        false
    }
}

#[cfg(feature = "camera")]
pub use opencv_camera::OpenCvCamera;

/// The capture backend compiled into this build
#[cfg(feature = "camera")]
pub type SystemCamera = OpenCvCamera;

/// The capture backend compiled into this build
#[cfg(not(feature = "camera"))]
pub type SystemCamera = DisabledCamera;

#[cfg(feature = "camera")]
mod opencv_camera {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
    use std::sync::Arc;
    use std::thread::{self, JoinHandle};
    use std::time::Duration;

    use log::{debug, info, warn};
    use opencv::{
        core::Mat,
        prelude::*,
        videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH},
    };

    use super::{CaptureRequest, RawFrame, TrackingError, VideoInput};

    const EMPTY_READ_BACKOFF: Duration = Duration::from_millis(5);
    // About two seconds without a frame counts as a dead stream
    const MAX_EMPTY_READS: u32 = 400;

    /// Webcam capture on a dedicated thread
    ///
    /// Device reads block, so they run off the event loop. The worker checks
    /// `active` at the top of every iteration and exits within one read.
    #[derive(Default)]
    pub struct OpenCvCamera {
        worker: Option<CaptureWorker>,
    }

    struct CaptureWorker {
        index: i32,
        active: Arc<AtomicBool>,
        frames: Receiver<RawFrame>,
        /// Yields the read failure that ended the stream, if any
        handle: JoinHandle<Option<String>>,
    }

    impl VideoInput for OpenCvCamera {
        fn open(&mut self, request: &CaptureRequest) -> Result<(), TrackingError> {
            self.release();

            let unavailable = |reason: String| TrackingError::CameraUnavailable {
                index: request.camera_index,
                reason,
            };

            info!("Opening camera {}", request.camera_index);
            let mut capture = VideoCapture::new(request.camera_index, videoio::CAP_ANY)
                .map_err(|e| unavailable(e.to_string()))?;
            if !capture.is_opened().map_err(|e| unavailable(e.to_string()))? {
                return Err(unavailable("device did not open".into()));
            }

            // Best effort: drivers are free to ignore these
            let _ = capture.set(CAP_PROP_FRAME_WIDTH, request.width as f64);
            let _ = capture.set(CAP_PROP_FRAME_HEIGHT, request.height as f64);
            let _ = capture.set(CAP_PROP_BUFFERSIZE, 1.0);

            let active = Arc::new(AtomicBool::new(true));
            let (sender, frames) = mpsc::sync_channel(1);
            let worker_active = Arc::clone(&active);
            let handle = thread::Builder::new()
                .name("camera-capture".into())
                .spawn(move || capture_loop(capture, worker_active, sender))
                .map_err(|e| unavailable(e.to_string()))?;

            self.worker = Some(CaptureWorker {
                index: request.camera_index,
                active,
                frames,
                handle,
            });
            Ok(())
        }

        fn poll_frame(&mut self) -> Result<Option<RawFrame>, TrackingError> {
            let Some(worker) = self.worker.as_ref() else {
                return Ok(None);
            };
            if let Some(frame) = worker.frames.try_iter().last() {
                return Ok(Some(frame));
            }
            if !worker.handle.is_finished() {
                return Ok(None);
            }

            // The worker exited on its own: the stream died
            let Some(worker) = self.worker.take() else {
                return Ok(None);
            };
            let reason = match worker.handle.join() {
                Ok(Some(reason)) => reason,
                Ok(None) => "capture stopped unexpectedly".to_string(),
                Err(_) => "capture thread panicked".to_string(),
            };
            warn!("Camera {} lost: {}", worker.index, reason);
            Err(TrackingError::StreamLost {
                index: worker.index,
                reason,
            })
        }

        fn release(&mut self) {
            if let Some(worker) = self.worker.take() {
                worker.active.store(false, Ordering::Release);
                // Unblocks a worker waiting on a full channel
                drop(worker.frames);
                if worker.handle.join().is_err() {
                    warn!("Camera capture thread panicked");
                }
                info!("Camera released");
            }
        }

        fn is_open(&self) -> bool {
            self.worker.is_some()
        }
    }

    impl Drop for OpenCvCamera {
        fn drop(&mut self) {
            self.release();
        }
    }

    fn capture_loop(
        mut capture: VideoCapture,
        active: Arc<AtomicBool>,
        sender: SyncSender<RawFrame>,
    ) -> Option<String> {
        let mut delivered = 0u64;
        let mut failure = None;
        let mut empty_reads = 0u32;

        while active.load(Ordering::Acquire) {
            let mut mat = Mat::default();
            match capture.read(&mut mat) {
                Ok(true) if !mat.empty() => empty_reads = 0,
                Ok(_) => {
                    empty_reads += 1;
                    if empty_reads >= MAX_EMPTY_READS {
                        warn!("Camera delivered no frames for {} reads, stopping capture", empty_reads);
                        failure = Some("no frames received".to_string());
                        break;
                    }
                    thread::sleep(EMPTY_READ_BACKOFF);
                    continue;
                }
                Err(e) => {
                    warn!("Camera read failed, stopping capture: {}", e);
                    failure = Some(e.to_string());
                    break;
                }
            }

            let Some(frame) = mat_to_frame(&mat) else {
                debug!("Skipping unsupported camera frame layout");
                continue;
            };

            match sender.try_send(frame) {
                Ok(()) => delivered += 1,
                // Consumer has not taken the previous frame yet
                Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => break,
            }
        }

        if let Err(e) = capture.release() {
            warn!("Camera release reported: {}", e);
        }
        debug!("Capture thread exiting after {} frames", delivered);
        failure
    }

    fn mat_to_frame(mat: &Mat) -> Option<RawFrame> {
        if mat.channels() != 3 || !mat.is_continuous() {
            return None;
        }
        let width = u32::try_from(mat.cols()).ok()?;
        let height = u32::try_from(mat.rows()).ok()?;
        let bytes = mat.data_bytes().ok()?;
        RawFrame::from_bgr(width, height, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_camera_reports_unsupported() {
        let mut camera = DisabledCamera;
        assert_eq!(
            camera.open(&CaptureRequest::default()),
            Err(TrackingError::CaptureUnsupported)
        );
        assert!(!camera.is_open());
        assert!(matches!(camera.poll_frame(), Ok(None)));
    }

    #[test]
    fn test_default_request_is_low_resolution() {
        let request = CaptureRequest::default();
        assert_eq!((request.width, request.height), (320, 240));
    }
}
