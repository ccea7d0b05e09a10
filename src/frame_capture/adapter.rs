use crate::device_camera::interface::{
    DeviceCamera, DeviceKind, DevicePosition, ExposureMode, FocusMode, RawFrame, SessionPreset,
    TorchMode,
};
use crate::error::CaptureError;
use crate::frame_capture::convert::frame_from_raw;
use crate::frame_capture::frame::Frame;
use crate::frame_capture::point::PreviewPoint;
use crate::library::logger::interface::Logger;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

const DELIVERY_POLL: Duration = Duration::from_millis(50);

/// State shared with the delivery thread.
struct Shared {
    running: AtomicBool,
    still_armed: AtomicBool,
    still_slot: Mutex<Option<Sender<Frame>>>,
    frames_delivered: AtomicU64,
}

struct Session {
    device: Arc<dyn DeviceCamera + Send + Sync>,
    delivery: JoinHandle<()>,
}

/// Owns the camera session and hands out still frames from the live stream.
pub struct FrameCaptureAdapter {
    devices: Vec<Arc<dyn DeviceCamera + Send + Sync>>,
    preset: SessionPreset,
    logger: Arc<dyn Logger + Send + Sync>,
    session: Mutex<Option<Session>>,
    shared: Arc<Shared>,
}

/// Holds the device's configuration lock and releases it on drop.
struct ConfigurationLock<'a> {
    device: &'a dyn DeviceCamera,
}

impl<'a> ConfigurationLock<'a> {
    fn acquire(device: &'a dyn DeviceCamera) -> Result<Self, CaptureError> {
        device.lock_for_configuration()?;
        Ok(Self { device })
    }
}

impl Drop for ConfigurationLock<'_> {
    fn drop(&mut self) {
        self.device.unlock_for_configuration();
    }
}

impl FrameCaptureAdapter {
    pub fn new(
        devices: Vec<Arc<dyn DeviceCamera + Send + Sync>>,
        preset: SessionPreset,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            devices,
            preset,
            logger: logger.with_namespace("capture"),
            session: Mutex::new(None),
            shared: Arc::new(Shared {
                running: AtomicBool::new(false),
                still_armed: AtomicBool::new(false),
                still_slot: Mutex::new(None),
                frames_delivered: AtomicU64::new(0),
            }),
        }
    }

    pub fn start(&self) -> Result<(), CaptureError> {
        let mut session = self.lock_session()?;
        if session.is_some() {
            return Ok(());
        }

        let device = self
            .devices
            .iter()
            .find(|d| d.position() == DevicePosition::Back && d.kind() == DeviceKind::WideAngle)
            .cloned()
            .ok_or(CaptureError::DeviceUnavailable)
            .map_err(|e| self.log_failure("start", e))?;

        let frames = device
            .open(self.preset)
            .map_err(|e| self.log_failure("start", e))?;

        self.shared.running.store(true, Ordering::SeqCst);
        let shared = Arc::clone(&self.shared);
        let logger = self.logger.with_namespace("delivery");
        let delivery = std::thread::Builder::new()
            .name("frame-delivery".to_string())
            .spawn(move || deliver_frames(shared, frames, logger));

        let delivery = match delivery {
            Ok(handle) => handle,
            Err(e) => {
                self.shared.running.store(false, Ordering::SeqCst);
                let _ = device.close();
                return Err(self.log_failure(
                    "start",
                    CaptureError::DeviceConfiguration(e.to_string()),
                ));
            }
        };

        let _ = self
            .logger
            .info(&format!("Session started on {}", device.name()));
        *session = Some(Session { device, delivery });
        Ok(())
    }

    pub fn stop(&self) -> Result<(), CaptureError> {
        let session = self.lock_session()?.take();
        let Some(session) = session else {
            return Ok(());
        };

        self.shared.running.store(false, Ordering::SeqCst);
        let closed = session.device.close();
        if session.delivery.join().is_err() {
            let _ = self.logger.error("Frame delivery thread panicked");
        }
        self.cancel_still_request();

        let _ = self.logger.info("Session stopped");
        closed.map_err(|e| self.log_failure("stop", e))
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    pub fn frames_delivered(&self) -> u64 {
        self.shared.frames_delivered.load(Ordering::SeqCst)
    }

    /// Arms the one-shot flag. The next frame off the stream is converted and sent
    /// on the returned receiver; nothing else is ever sent on it.
    pub fn request_still_frame(&self) -> Result<Receiver<Frame>, CaptureError> {
        if !self.is_running() {
            return Err(CaptureError::NotRunning);
        }
        let (tx, rx) = channel();
        let mut slot = self
            .shared
            .still_slot
            .lock()
            .map_err(|e| CaptureError::DeviceConfiguration(e.to_string()))?;
        if slot.replace(tx).is_some() {
            let _ = self.logger.info("Replacing pending still frame request");
        }
        self.shared.still_armed.store(true, Ordering::SeqCst);
        let _ = self.logger.info("Still frame requested");
        Ok(rx)
    }

    pub fn capture_still(&self, timeout: Duration) -> Result<Frame, CaptureError> {
        let receiver = self.request_still_frame()?;
        match receiver.recv_timeout(timeout) {
            Ok(frame) => Ok(frame),
            Err(RecvTimeoutError::Timeout) => {
                self.cancel_still_request();
                Err(self.log_failure("capture_still", CaptureError::FrameTimeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(self.log_failure("capture_still", CaptureError::FrameDropped))
            }
        }
    }

    pub fn set_torch(&self, on: bool) -> Result<(), CaptureError> {
        let device = self.current_device()?;
        let target = if on { TorchMode::On } else { TorchMode::Off };

        if device.torch_mode() == target {
            return Ok(());
        }
        if !device.has_torch() {
            return Err(self.log_failure("set_torch", CaptureError::TorchUnavailable));
        }

        let result = ConfigurationLock::acquire(&*device).and_then(|_lock| {
            if device.torch_mode() == target {
                return Ok(());
            }
            device.set_torch_mode(target)
        });
        result.map_err(|e| self.log_failure("set_torch", e))
    }

    pub fn set_focus_and_exposure(&self, point: PreviewPoint) -> Result<(), CaptureError> {
        let device = self.current_device()?;
        let device_point = point.to_device();

        let result = ConfigurationLock::acquire(&*device).and_then(|_lock| {
            if device.supports_focus_point() {
                device.set_focus(device_point, FocusMode::AutoFocus)?;
            }
            if device.supports_exposure_point() {
                device.set_exposure(device_point, ExposureMode::ContinuousAutoExposure)?;
            }
            Ok(())
        });
        result.map_err(|e| self.log_failure("set_focus_and_exposure", e))
    }

    fn cancel_still_request(&self) {
        self.shared.still_armed.store(false, Ordering::SeqCst);
        if let Ok(mut slot) = self.shared.still_slot.lock() {
            slot.take();
        }
    }

    fn current_device(&self) -> Result<Arc<dyn DeviceCamera + Send + Sync>, CaptureError> {
        self.lock_session()?
            .as_ref()
            .map(|s| Arc::clone(&s.device))
            .ok_or(CaptureError::NotRunning)
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Option<Session>>, CaptureError> {
        self.session
            .lock()
            .map_err(|e| CaptureError::DeviceConfiguration(e.to_string()))
    }

    fn log_failure(&self, operation: &str, error: CaptureError) -> CaptureError {
        let _ = self.logger.error(&format!("{} failed: {}", operation, error));
        error
    }
}

impl Drop for FrameCaptureAdapter {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            let _ = self
                .logger
                .error(&format!("Failed to stop session during shutdown: {}", e));
        }
    }
}

fn deliver_frames(
    shared: Arc<Shared>,
    frames: Receiver<RawFrame>,
    logger: Arc<dyn Logger + Send + Sync>,
) {
    while shared.running.load(Ordering::SeqCst) {
        match frames.recv_timeout(DELIVERY_POLL) {
            Ok(raw) => {
                shared.frames_delivered.fetch_add(1, Ordering::SeqCst);
                if shared.still_armed.swap(false, Ordering::SeqCst) {
                    intercept_still(&shared, &raw, logger.as_ref());
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn intercept_still(shared: &Shared, raw: &RawFrame, logger: &dyn Logger) {
    let sender = match shared.still_slot.lock() {
        Ok(mut slot) => slot.take(),
        Err(_) => None,
    };
    let Some(sender) = sender else {
        return;
    };

    match frame_from_raw(raw) {
        Ok(frame) => {
            if sender.send(frame).is_err() {
                let _ = logger.info("Still frame requester went away");
            }
        }
        Err(e) => {
            let _ = logger.error(&format!("Dropping still frame: {}", e));
        }
    }
}
