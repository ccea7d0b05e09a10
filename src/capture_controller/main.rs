use crate::capture_controller::core::{Model, Msg};
use crate::config::Config;
use crate::error::ControllerStopped;
use crate::frame_capture::adapter::FrameCaptureAdapter;
use crate::frame_capture::point::PreviewPoint;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use crate::notifier::interface::Notifier;
use crate::prediction_store::interface::PredictionStore;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct CaptureController {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub frame_capture: Arc<FrameCaptureAdapter>,
    pub image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    pub prediction_store: Arc<dyn PredictionStore>,
    pub notifier: Arc<dyn Notifier>,
    pub(super) model: Arc<Mutex<Model>>,
    pub(super) msg_sender: Sender<Msg>,
    pub(super) msg_receiver: Arc<Mutex<Receiver<Msg>>>,
}

/// The UI side of the controller: each call queues a message and returns.
#[derive(Clone)]
pub struct CaptureHandle {
    msg_sender: Sender<Msg>,
}

impl CaptureController {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        frame_capture: Arc<FrameCaptureAdapter>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        prediction_store: Arc<dyn PredictionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (msg_sender, msg_receiver) = channel();

        Self {
            config,
            logger: logger.with_namespace("controller"),
            frame_capture,
            image_classifier,
            prediction_store,
            notifier,
            model: Arc::new(Mutex::new(Model::default())),
            msg_sender,
            msg_receiver: Arc::new(Mutex::new(msg_receiver)),
        }
    }

    pub fn handle(&self) -> CaptureHandle {
        CaptureHandle {
            msg_sender: self.msg_sender.clone(),
        }
    }

    /// Snapshot of the current model.
    pub fn model(&self) -> Model {
        self.model.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub(super) fn send(&self, msg: Msg) {
        if self.msg_sender.send(msg).is_err() {
            let _ = self.logger.error("Controller loop is gone, dropping message");
        }
    }
}

impl CaptureHandle {
    pub fn trigger_capture(&self) -> Result<(), ControllerStopped> {
        self.send(Msg::CaptureTriggered)
    }

    pub fn toggle_flash(&self) -> Result<(), ControllerStopped> {
        self.send(Msg::FlashToggled)
    }

    pub fn focus_at(&self, point: PreviewPoint) -> Result<(), ControllerStopped> {
        self.send(Msg::FocusRequested(point))
    }

    pub fn open_settings(&self) -> Result<(), ControllerStopped> {
        self.send(Msg::SettingsRequested)
    }

    pub fn shutdown(&self) -> Result<(), ControllerStopped> {
        self.send(Msg::Shutdown)
    }

    fn send(&self, msg: Msg) -> Result<(), ControllerStopped> {
        self.msg_sender.send(msg).map_err(|_| ControllerStopped)
    }
}
