use crate::capture_controller::core::{CameraState, Model};
use crate::capture_controller::main::{CaptureController, CaptureHandle};
use crate::config::Config;
use crate::device_camera::impl_fake::{DeviceCameraFake, DeviceCameraFakeConfig};
use crate::device_camera::interface::DeviceCamera;
use crate::frame_capture::adapter::FrameCaptureAdapter;
use crate::image_classifier::impl_fake::ImageClassifierFake;
use crate::library::logger::impl_fake::LoggerFake;
use crate::notifier::impl_fake::NotifierFake;
use crate::prediction_store::impl_in_memory::PredictionStoreInMemory;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

#[allow(dead_code)]
pub struct Fixture {
    pub logger: LoggerFake,
    pub camera: Arc<DeviceCameraFake>,
    pub image_classifier: Arc<ImageClassifierFake>,
    pub prediction_store: Arc<PredictionStoreInMemory>,
    pub notifier: Arc<NotifierFake>,
    pub controller: CaptureController,
    pub handle: CaptureHandle,
    running: Option<JoinHandle<()>>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::build(DeviceCameraFakeConfig {
            frame_interval: Some(Duration::from_millis(5)),
            ..Default::default()
        }, Duration::ZERO)
    }

    pub fn with_classifier_latency(latency: Duration) -> Self {
        Self::build(DeviceCameraFakeConfig {
            frame_interval: Some(Duration::from_millis(5)),
            ..Default::default()
        }, latency)
    }

    pub fn with_camera(camera_config: DeviceCameraFakeConfig) -> Self {
        Self::build(camera_config, Duration::ZERO)
    }

    fn build(camera_config: DeviceCameraFakeConfig, latency: Duration) -> Self {
        let mut config = Config::default();
        config.still_frame_timeout = Duration::from_secs(2);

        let logger = LoggerFake::new();
        let camera = Arc::new(DeviceCameraFake::new(camera_config, Arc::new(logger.clone())));
        let devices: Vec<Arc<dyn DeviceCamera + Send + Sync>> = vec![camera.clone()];
        let frame_capture = Arc::new(FrameCaptureAdapter::new(
            devices,
            config.session_preset,
            Arc::new(logger.clone()),
        ));
        let image_classifier =
            Arc::new(ImageClassifierFake::new(Arc::new(logger.clone())).with_latency(latency));
        let prediction_store = Arc::new(PredictionStoreInMemory::new());
        let notifier = Arc::new(NotifierFake::new());

        let controller = CaptureController::new(
            config,
            Arc::new(logger.clone()),
            frame_capture,
            image_classifier.clone(),
            prediction_store.clone(),
            notifier.clone(),
        );
        let handle = controller.handle();
        let running = Some(controller.spawn());

        Self {
            logger,
            camera,
            image_classifier,
            prediction_store,
            notifier,
            controller,
            handle,
            running,
        }
    }

    pub fn wait_for_camera(&self) -> Model {
        self.wait_for_model(|m| m.camera != CameraState::Starting)
    }

    pub fn wait_for_model(&self, condition: impl Fn(&Model) -> bool) -> Model {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let model = self.controller.model();
            if condition(&model) {
                return model;
            }
            assert!(Instant::now() < deadline, "model never matched: {:?}", model);
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(running) = self.running.take() {
            self.handle.shutdown().unwrap();
            running.join().unwrap();
        }
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            let _ = self.handle.shutdown();
            let _ = running.join();
        }
    }
}
