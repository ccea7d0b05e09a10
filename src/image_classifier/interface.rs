use crate::error::ClassifyError;
use crate::frame_capture::frame::Frame;
use std::fmt;

/// Identifier of the remote model a frame is classified against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The hosted "general" image model.
    pub fn general() -> Self {
        Self::new("aaa03c23b3724a16a56b629203edc62c")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

/// Labels ranked by descending confidence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassificationResult {
    ranked: Vec<Classification>,
}

impl ClassificationResult {
    /// Entries without a finite confidence are dropped; the rest are clamped to `[0, 1]`.
    pub fn new(mut classifications: Vec<Classification>) -> Self {
        classifications.retain(|c| c.confidence.is_finite());
        for c in classifications.iter_mut() {
            c.confidence = c.confidence.clamp(0.0, 1.0);
        }
        classifications.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        Self {
            ranked: classifications,
        }
    }

    pub fn top(&self) -> Option<&Classification> {
        self.ranked.first()
    }

    pub fn ranked(&self) -> &[Classification] {
        &self.ranked
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

pub trait ImageClassifier {
    /// Blocks until the service answers. Callers that must not block run this
    /// on their own thread.
    fn classify(
        &self,
        frame: &Frame,
        model: &ModelId,
    ) -> Result<ClassificationResult, ClassifyError>;
}
