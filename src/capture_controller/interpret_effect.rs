use super::main::CaptureController;
use crate::capture_controller::core::{Effect, Msg};
use crate::error::StoreError;
use crate::prediction_store::record::NewPrediction;

impl CaptureController {
    pub fn interpret_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::StartCamera => {
                let started = self.frame_capture.start();
                self.send(Msg::CameraStartDone(started));
            }
            Effect::RequestFrame => {
                let frame = self
                    .frame_capture
                    .capture_still(self.config.still_frame_timeout);
                self.send(Msg::FrameCaptureDone(frame));
            }
            Effect::Classify { frame } => {
                let result = self
                    .image_classifier
                    .classify(&frame, &self.config.classifier.model_id);
                if let Err(e) = &result {
                    let _ = self
                        .logger
                        .error(&format!("Classification failed, discarding photo: {}", e));
                }
                self.send(Msg::ClassifyDone(result));
            }
            Effect::Persist {
                frame,
                classification,
            } => {
                let stored = frame
                    .encode_jpeg()
                    .map_err(|e| StoreError::WriteFailed(e.to_string()))
                    .and_then(|image| {
                        self.prediction_store.append(NewPrediction {
                            label: classification.label,
                            confidence: classification.confidence,
                            image,
                        })
                    });
                if let Err(e) = &stored {
                    let _ = self.logger.error(&format!("Could not store prediction: {}", e));
                }
                self.send(Msg::PersistDone(stored));
            }
            Effect::SetTorch { on } => {
                let result = self.frame_capture.set_torch(on);
                self.send(Msg::TorchDone { on, result });
            }
            Effect::Focus { point } => {
                let result = self.frame_capture.set_focus_and_exposure(point);
                self.send(Msg::FocusDone(result));
            }
            Effect::Notify(notice) => {
                if let Err(e) = self.notifier.notify(&notice) {
                    let _ = self
                        .logger
                        .error(&format!("Could not show notice {:?}: {}", notice, e));
                }
            }
        }
    }
}
