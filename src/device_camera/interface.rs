use crate::error::CaptureError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::mpsc::Receiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevicePosition {
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    WideAngle,
    Telephoto,
    UltraWide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPreset {
    #[default]
    High,
    Medium,
    Low,
}

impl SessionPreset {
    /// Landscape sensor dimensions delivered for this preset.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            SessionPreset::High => (1920, 1080),
            SessionPreset::Medium => (1280, 720),
            SessionPreset::Low => (640, 480),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TorchMode {
    #[default]
    Off,
    On,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    AutoFocus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureMode {
    ContinuousAutoExposure,
}

/// Point in the sensor's own coordinate space, both axes in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePoint {
    pub x: f64,
    pub y: f64,
}

/// A video frame as pushed by the device: tightly packed BGRA8 rows.
#[derive(Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub bgra: Vec<u8>,
    pub captured_at: DateTime<Utc>,
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.bgra.len())
            .field("captured_at", &self.captured_at)
            .finish()
    }
}

pub trait DeviceCamera: Send + Sync {
    fn name(&self) -> String;
    fn position(&self) -> DevicePosition;
    fn kind(&self) -> DeviceKind;

    /// Starts streaming. Frames arrive on the returned receiver in capture order
    /// until `close` is called.
    fn open(&self, preset: SessionPreset) -> Result<Receiver<RawFrame>, CaptureError>;
    fn close(&self) -> Result<(), CaptureError>;

    /// Exclusive access for torch/focus/exposure changes. Every successful lock
    /// must be paired with `unlock_for_configuration`.
    fn lock_for_configuration(&self) -> Result<(), CaptureError>;
    fn unlock_for_configuration(&self);

    fn has_torch(&self) -> bool;
    fn torch_mode(&self) -> TorchMode;
    fn set_torch_mode(&self, mode: TorchMode) -> Result<(), CaptureError>;

    fn supports_focus_point(&self) -> bool;
    fn set_focus(&self, point: DevicePoint, mode: FocusMode) -> Result<(), CaptureError>;

    fn supports_exposure_point(&self) -> bool;
    fn set_exposure(&self, point: DevicePoint, mode: ExposureMode) -> Result<(), CaptureError>;
}
