use crate::error::{CaptureError, ClassifyError, StoreError};
use crate::frame_capture::frame::Frame;
use crate::frame_capture::point::PreviewPoint;
use crate::image_classifier::interface::{Classification, ClassificationResult};
use crate::notifier::interface::Notice;
use crate::prediction_store::record::StoredPrediction;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CameraState {
    #[default]
    Starting,
    Ready,
    Unavailable,
}

/// One capture at a time moves through these states and always ends in `Idle`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    FrameRequested,
    Classifying {
        frame: Frame,
    },
    /// Classification succeeded; the result is being written to the store.
    Persisting {
        label: String,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub camera: CameraState,
    pub capture: CaptureState,
    pub torch_on: bool,
    pub completed: u64,
    pub failed: u64,
}

impl Model {
    pub fn is_idle(&self) -> bool {
        self.capture == CaptureState::Idle
    }
}

#[derive(Debug)]
pub enum Msg {
    CameraStartDone(Result<(), CaptureError>),
    CaptureTriggered,
    FrameCaptureDone(Result<Frame, CaptureError>),
    ClassifyDone(Result<ClassificationResult, ClassifyError>),
    PersistDone(Result<StoredPrediction, StoreError>),
    FlashToggled,
    TorchDone {
        on: bool,
        result: Result<(), CaptureError>,
    },
    FocusRequested(PreviewPoint),
    FocusDone(Result<(), CaptureError>),
    SettingsRequested,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartCamera,
    RequestFrame,
    Classify {
        frame: Frame,
    },
    Persist {
        frame: Frame,
        classification: Classification,
    },
    SetTorch {
        on: bool,
    },
    Focus {
        point: PreviewPoint,
    },
    Notify(Notice),
}

pub fn init() -> (Model, Vec<Effect>) {
    (Model::default(), vec![Effect::StartCamera])
}

pub fn transition(model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    match (model.capture.clone(), msg) {
        // Camera
        (_, Msg::CameraStartDone(Ok(()))) => (
            Model {
                camera: CameraState::Ready,
                ..model
            },
            vec![],
        ),
        (_, Msg::CameraStartDone(Err(e))) => (
            Model {
                camera: CameraState::Unavailable,
                ..model
            },
            vec![Effect::Notify(Notice::error(format!(
                "Camera unavailable: {}",
                e
            )))],
        ),

        // Capture pipeline
        (CaptureState::Idle, Msg::CaptureTriggered) => {
            if model.camera == CameraState::Ready {
                (
                    Model {
                        capture: CaptureState::FrameRequested,
                        ..model
                    },
                    vec![Effect::RequestFrame],
                )
            } else {
                (
                    model,
                    vec![Effect::Notify(Notice::warning("Camera is not ready"))],
                )
            }
        }
        (_, Msg::CaptureTriggered) => (model, vec![]),

        (CaptureState::FrameRequested, Msg::FrameCaptureDone(Ok(frame))) => (
            Model {
                capture: CaptureState::Classifying {
                    frame: frame.clone(),
                },
                ..model
            },
            vec![Effect::Classify { frame }],
        ),
        (CaptureState::FrameRequested, Msg::FrameCaptureDone(Err(e))) => failed(
            model,
            Notice::error(format!("Could not take photo: {}", e)),
        ),

        (CaptureState::Classifying { frame }, Msg::ClassifyDone(Ok(result))) => {
            match result.top() {
                Some(top) => (
                    Model {
                        capture: CaptureState::Persisting {
                            label: top.label.clone(),
                        },
                        ..model
                    },
                    vec![Effect::Persist {
                        frame,
                        classification: top.clone(),
                    }],
                ),
                None => failed(model, Notice::warning("Nothing recognized in photo")),
            }
        }
        (CaptureState::Classifying { .. }, Msg::ClassifyDone(Err(e))) => failed(
            model,
            Notice::error(format!("Classification failed: {}", e)),
        ),

        (CaptureState::Persisting { .. }, Msg::PersistDone(Ok(prediction))) => (
            Model {
                capture: CaptureState::Idle,
                completed: model.completed + 1,
                ..model
            },
            vec![Effect::Notify(Notice::info(format!(
                "Saved \"{}\"",
                prediction.label
            )))],
        ),
        (CaptureState::Persisting { label }, Msg::PersistDone(Err(e))) => failed(
            model,
            Notice::error(format!("Could not save \"{}\": {}", label, e)),
        ),

        // Device controls
        (_, Msg::FlashToggled) => {
            let on = !model.torch_on;
            (
                Model {
                    torch_on: on,
                    ..model
                },
                vec![Effect::SetTorch { on }],
            )
        }
        (_, Msg::TorchDone { on, result: Err(e) }) => {
            let torch_on = if model.torch_on == on { !on } else { model.torch_on };
            (
                Model { torch_on, ..model },
                vec![Effect::Notify(Notice::error(format!(
                    "Could not switch flash: {}",
                    e
                )))],
            )
        }
        (_, Msg::FocusRequested(point)) => (model, vec![Effect::Focus { point }]),
        (_, Msg::FocusDone(Err(e))) => (
            model,
            vec![Effect::Notify(Notice::warning(format!(
                "Could not focus: {}",
                e
            )))],
        ),

        // Late results, successful device calls, settings, shutdown
        _ => (model, vec![]),
    }
}

fn failed(model: Model, notice: Notice) -> (Model, Vec<Effect>) {
    (
        Model {
            capture: CaptureState::Idle,
            failed: model.failed + 1,
            ..model
        },
        vec![Effect::Notify(notice)],
    )
}
