use super::{core::Effect, main::CaptureController};
use crate::capture_controller::core::{init, transition, Model, Msg};
use std::sync::mpsc::{channel, Sender};
use std::thread::JoinHandle;

impl CaptureController {
    /// Processes messages until `Msg::Shutdown`, then stops the camera.
    pub fn run(&self) {
        let (device_sender, device_worker) = self.spawn_device_worker();

        let (mut current_model, effects) = init();
        self.publish(&current_model);
        self.execute_effects(effects, &device_sender);

        loop {
            let msg = match self.msg_receiver.lock() {
                Ok(receiver) => receiver.recv(),
                Err(_) => break,
            };
            let msg = match msg {
                Ok(Msg::Shutdown) | Err(_) => break,
                Ok(msg) => msg,
            };

            let _ = self.logger.info(&format!(
                "\nold model:\n\t{:?}\n\nmsg:\n\t{:?}",
                current_model, msg,
            ));

            let (new_model, effects) = transition(current_model, msg);

            let _ = self.logger.info(&format!(
                "\nnew model:\n\t{:?}\n\neffects:\n\t{:?}",
                new_model, effects
            ));

            self.publish(&new_model);
            current_model = new_model;

            self.execute_effects(effects, &device_sender);
        }

        let _ = self.logger.info("Shutting down");
        drop(device_sender);
        if device_worker.join().is_err() {
            let _ = self.logger.error("Device control worker panicked");
        }
        if let Err(e) = self.frame_capture.stop() {
            let _ = self
                .logger
                .error(&format!("Failed to stop camera during shutdown: {}", e));
        }
    }

    pub fn spawn(&self) -> JoinHandle<()> {
        let controller = self.clone();
        std::thread::spawn(move || controller.run())
    }

    fn publish(&self, model: &Model) {
        if let Ok(mut shared) = self.model.lock() {
            *shared = model.clone();
        }
    }

    /// Torch and focus changes run one at a time, in the order the loop
    /// emitted them, so the device ends up where the model says it is.
    fn spawn_device_worker(&self) -> (Sender<Effect>, JoinHandle<()>) {
        let (sender, receiver) = channel::<Effect>();
        let self_clone = self.clone();
        let worker = std::thread::spawn(move || {
            for effect in receiver {
                self_clone.interpret_effect(effect);
            }
        });
        (sender, worker)
    }

    fn execute_effects(&self, effects: Vec<Effect>, device_sender: &Sender<Effect>) {
        for effect in effects {
            match effect {
                Effect::SetTorch { .. } | Effect::Focus { .. } => {
                    if let Err(e) = device_sender.send(effect) {
                        let _ = self
                            .logger
                            .error(&format!("Device control worker is gone: {:?}", e.0));
                    }
                }
                effect => {
                    let self_clone = self.clone();
                    std::thread::spawn(move || self_clone.interpret_effect(effect));
                }
            }
        }
    }
}
