use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no back-facing wide angle camera is available")]
    DeviceUnavailable,
    #[error("device configuration failed: {0}")]
    DeviceConfiguration(String),
    #[error("device has no torch")]
    TorchUnavailable,
    #[error("capture session is not running")]
    NotRunning,
    #[error("could not convert frame: {0}")]
    FrameConversion(String),
    #[error("timed out waiting for a still frame")]
    FrameTimeout,
    #[error("still frame request was dropped before a frame arrived")]
    FrameDropped,
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classification service error: {0}")]
    Service(String),
    #[error("could not reach classification service: {0}")]
    Transport(String),
    #[error("invalid response from classification service: {0}")]
    InvalidResponse(String),
    #[error("could not encode image: {0}")]
    Encode(String),
}

impl From<reqwest::Error> for ClassifyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClassifyError::InvalidResponse(e.to_string())
        } else {
            ClassifyError::Transport(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store document is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("no prediction with id {0}")]
    NotFound(u64),
    #[error("prediction store is closed")]
    Closed,
    #[error("prediction write failed: {0}")]
    WriteFailed(String),
}

#[derive(Debug, Error)]
#[error("capture controller is not running")]
pub struct ControllerStopped;
