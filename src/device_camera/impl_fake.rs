use crate::device_camera::interface::{
    DeviceCamera, DeviceKind, DevicePoint, DevicePosition, ExposureMode, FocusMode, RawFrame,
    SessionPreset, TorchMode,
};
use crate::error::CaptureError;
use crate::library::logger::interface::Logger;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DeviceCameraFakeConfig {
    pub position: DevicePosition,
    pub kind: DeviceKind,
    pub has_torch: bool,
    pub supports_focus_point: bool,
    pub supports_exposure_point: bool,
    /// Size of emitted frames. Kept small so tests stay fast.
    pub frame_size: (u32, u32),
    /// `None` means frames are only produced through `emit_frame`.
    pub frame_interval: Option<Duration>,
}

impl Default for DeviceCameraFakeConfig {
    fn default() -> Self {
        Self {
            position: DevicePosition::Back,
            kind: DeviceKind::WideAngle,
            has_torch: true,
            supports_focus_point: true,
            supports_exposure_point: true,
            frame_size: (8, 6),
            frame_interval: None,
        }
    }
}

#[derive(Default)]
struct FakeState {
    sender: Option<Sender<RawFrame>>,
    generator_stop: Option<Arc<AtomicBool>>,
    torch: TorchMode,
    configuration_locked: bool,
    focus: Option<(DevicePoint, FocusMode)>,
    exposure: Option<(DevicePoint, ExposureMode)>,
}

pub struct DeviceCameraFake {
    config: DeviceCameraFakeConfig,
    logger: Arc<dyn Logger + Send + Sync>,
    state: Mutex<FakeState>,
    frames_emitted: Arc<AtomicU64>,
    lock_count: AtomicU64,
    fail_open: AtomicBool,
    fail_configuration: AtomicBool,
}

impl DeviceCameraFake {
    pub fn new(config: DeviceCameraFakeConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            logger: logger.with_namespace("camera").with_namespace("fake"),
            state: Mutex::new(FakeState::default()),
            frames_emitted: Arc::new(AtomicU64::new(0)),
            lock_count: AtomicU64::new(0),
            fail_open: AtomicBool::new(false),
            fail_configuration: AtomicBool::new(false),
        }
    }

    pub fn fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    pub fn fail_configuration(&self, fail: bool) {
        self.fail_configuration.store(fail, Ordering::SeqCst);
    }

    /// Pushes one frame into the open stream. Returns false when the stream is closed.
    pub fn emit_frame(&self) -> bool {
        let sender = match self.state.lock() {
            Ok(state) => state.sender.clone(),
            Err(_) => None,
        };
        match sender {
            Some(sender) => {
                let frame = make_frame(self.config.frame_size, &self.frames_emitted);
                sender.send(frame).is_ok()
            }
            None => false,
        }
    }

    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted.load(Ordering::SeqCst)
    }

    pub fn is_streaming(&self) -> bool {
        self.state.lock().map(|s| s.sender.is_some()).unwrap_or(false)
    }

    pub fn is_configuration_locked(&self) -> bool {
        self.state
            .lock()
            .map(|s| s.configuration_locked)
            .unwrap_or(false)
    }

    pub fn lock_count(&self) -> u64 {
        self.lock_count.load(Ordering::SeqCst)
    }

    pub fn focus(&self) -> Option<(DevicePoint, FocusMode)> {
        self.state.lock().ok().and_then(|s| s.focus)
    }

    pub fn exposure(&self) -> Option<(DevicePoint, ExposureMode)> {
        self.state.lock().ok().and_then(|s| s.exposure)
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut FakeState) -> T) -> Result<T, CaptureError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| CaptureError::DeviceConfiguration(e.to_string()))?;
        Ok(f(&mut state))
    }

    fn require_lock(&self, state: &FakeState) -> Result<(), CaptureError> {
        if !state.configuration_locked {
            return Err(CaptureError::DeviceConfiguration(
                "device is not locked for configuration".to_string(),
            ));
        }
        Ok(())
    }
}

fn make_frame((width, height): (u32, u32), counter: &AtomicU64) -> RawFrame {
    let shade: u8 = rand::random();
    let sequence = counter.fetch_add(1, Ordering::SeqCst);
    let mut bgra = vec![0u8; (width * height * 4) as usize];
    for pixel in bgra.chunks_exact_mut(4) {
        pixel[0] = shade;
        pixel[1] = (sequence % 256) as u8;
        pixel[2] = 255 - shade;
        pixel[3] = 255;
    }
    RawFrame {
        width,
        height,
        bgra,
        captured_at: Utc::now(),
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn name(&self) -> String {
        format!("Fake {:?} {:?} camera", self.config.position, self.config.kind)
    }

    fn position(&self) -> DevicePosition {
        self.config.position
    }

    fn kind(&self) -> DeviceKind {
        self.config.kind
    }

    fn open(&self, preset: SessionPreset) -> Result<Receiver<RawFrame>, CaptureError> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(CaptureError::DeviceConfiguration(
                "could not create device input".to_string(),
            ));
        }
        let _ = self
            .logger
            .info(&format!("Opening camera with preset {:?}", preset));

        let (tx, rx) = channel();
        let generator_stop = self.config.frame_interval.map(|interval| {
            let stop = Arc::new(AtomicBool::new(false));
            let thread_stop = Arc::clone(&stop);
            let thread_tx = tx.clone();
            let counter = Arc::clone(&self.frames_emitted);
            let frame_size = self.config.frame_size;
            std::thread::spawn(move || {
                while !thread_stop.load(Ordering::SeqCst) {
                    if thread_tx.send(make_frame(frame_size, &counter)).is_err() {
                        break;
                    }
                    std::thread::sleep(interval);
                }
            });
            stop
        });

        self.with_state(|state| {
            state.sender = Some(tx);
            state.generator_stop = generator_stop;
        })?;

        Ok(rx)
    }

    fn close(&self) -> Result<(), CaptureError> {
        self.with_state(|state| {
            state.sender = None;
            if let Some(stop) = state.generator_stop.take() {
                stop.store(true, Ordering::SeqCst);
            }
        })?;
        let _ = self.logger.info("Camera closed");
        Ok(())
    }

    fn lock_for_configuration(&self) -> Result<(), CaptureError> {
        if self.fail_configuration.load(Ordering::SeqCst) {
            return Err(CaptureError::DeviceConfiguration(
                "device is busy".to_string(),
            ));
        }
        self.with_state(|state| {
            if state.configuration_locked {
                return Err(CaptureError::DeviceConfiguration(
                    "device is already locked".to_string(),
                ));
            }
            state.configuration_locked = true;
            Ok(())
        })??;
        self.lock_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn unlock_for_configuration(&self) {
        let _ = self.with_state(|state| state.configuration_locked = false);
    }

    fn has_torch(&self) -> bool {
        self.config.has_torch
    }

    fn torch_mode(&self) -> TorchMode {
        self.state.lock().map(|s| s.torch).unwrap_or_default()
    }

    fn set_torch_mode(&self, mode: TorchMode) -> Result<(), CaptureError> {
        if !self.config.has_torch {
            return Err(CaptureError::TorchUnavailable);
        }
        self.with_state(|state| {
            self.require_lock(state)?;
            state.torch = mode;
            Ok(())
        })?
    }

    fn supports_focus_point(&self) -> bool {
        self.config.supports_focus_point
    }

    fn set_focus(&self, point: DevicePoint, mode: FocusMode) -> Result<(), CaptureError> {
        self.with_state(|state| {
            self.require_lock(state)?;
            state.focus = Some((point, mode));
            Ok(())
        })?
    }

    fn supports_exposure_point(&self) -> bool {
        self.config.supports_exposure_point
    }

    fn set_exposure(&self, point: DevicePoint, mode: ExposureMode) -> Result<(), CaptureError> {
        self.with_state(|state| {
            self.require_lock(state)?;
            state.exposure = Some((point, mode));
            Ok(())
        })?
    }
}

impl Drop for DeviceCameraFake {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(stop) = state.generator_stop.take() {
                stop.store(true, Ordering::SeqCst);
            }
        }
    }
}
