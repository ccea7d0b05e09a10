use crate::error::ClassifyError;
use crate::frame_capture::frame::Frame;
use crate::image_classifier::interface::{
    Classification, ClassificationResult, ImageClassifier, ModelId,
};
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const OBJECTS: [&str; 18] = [
    "dog", "cat", "person", "car", "chair", "table", "bird", "tree", "bicycle", "book", "laptop",
    "phone", "cup", "bottle", "keyboard", "mouse", "plant", "clock",
];

/// Answers with scripted results first, then random labels.
pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    scripted: Mutex<VecDeque<Result<ClassificationResult, ClassifyError>>>,
    latency: Duration,
    calls: AtomicUsize,
}

impl ImageClassifierFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("classifier").with_namespace("fake"),
            scripted: Mutex::new(VecDeque::new()),
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn push_result(&self, result: Result<ClassificationResult, ClassifyError>) {
        if let Ok(mut scripted) = self.scripted.lock() {
            scripted.push_back(result);
        }
    }

    pub fn push_labels(&self, labels: &[(&str, f32)]) {
        self.push_result(Ok(ClassificationResult::new(
            labels
                .iter()
                .map(|(label, confidence)| Classification {
                    label: label.to_string(),
                    confidence: *confidence,
                })
                .collect(),
        )));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn random_result(&self) -> Result<ClassificationResult, ClassifyError> {
        let mut rng = rand::rng();
        let index_dist =
            Uniform::new(0, OBJECTS.len()).map_err(|e| ClassifyError::Service(e.to_string()))?;
        let confidence_dist =
            Uniform::new(0.0f32, 1.0).map_err(|e| ClassifyError::Service(e.to_string()))?;

        let classifications = (0..3)
            .map(|_| Classification {
                label: OBJECTS[index_dist.sample(&mut rng)].to_string(),
                confidence: confidence_dist.sample(&mut rng),
            })
            .collect();

        Ok(ClassificationResult::new(classifications))
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(
        &self,
        frame: &Frame,
        model: &ModelId,
    ) -> Result<ClassificationResult, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.logger.info(&format!(
            "Classifying {}x{} frame with model {}",
            frame.width(),
            frame.height(),
            model
        ));

        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        let scripted = self
            .scripted
            .lock()
            .map_err(|e| ClassifyError::Service(e.to_string()))?
            .pop_front();

        match scripted {
            Some(result) => result,
            None => self.random_result(),
        }
    }
}
