use thiserror::Error;

/// Failures acquiring the video input device
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackingError {
    /// The device exists but refused access or failed to start streaming
    #[error("camera {index} could not be opened: {reason}")]
    CameraUnavailable { index: i32, reason: String },

    /// The device opened but stopped delivering frames (unplugged, access revoked)
    #[error("camera {index} stopped streaming: {reason}")]
    StreamLost { index: i32, reason: String },

    /// The binary was built without a capture backend
    #[error("camera capture is not available in this build (enable the `camera` feature)")]
    CaptureUnsupported,
}

/// Failures reported by a render backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The frame could not be drawn but the next one may succeed
    #[error("frame skipped: {0}")]
    Transient(String),

    /// The backend is gone (device lost, out of memory); rendering must stop
    #[error("render backend failed: {0}")]
    Fatal(String),
}

/// Rejected configuration values
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
