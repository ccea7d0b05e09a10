use crate::error::StoreError;
use crate::prediction_store::record::{NewPrediction, PredictionId, StoredPrediction};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The whole collection, in insertion order. Both store implementations keep
/// one of these and only replace it after a write has fully succeeded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    next_id: PredictionId,
    predictions: Vec<StoredPrediction>,
}

impl Document {
    pub fn validate(prediction: &NewPrediction) -> Result<(), StoreError> {
        if prediction.label.trim().is_empty() {
            return Err(StoreError::WriteFailed("prediction has no label".to_string()));
        }
        if !prediction.confidence.is_finite() {
            return Err(StoreError::WriteFailed(format!(
                "prediction confidence {} is not a number",
                prediction.confidence
            )));
        }
        if prediction.image.is_empty() {
            return Err(StoreError::WriteFailed("prediction has no image".to_string()));
        }
        Ok(())
    }

    /// Returns the document with the record appended; `self` is left untouched.
    pub fn with_appended(&self, prediction: NewPrediction) -> (Document, StoredPrediction) {
        let stored = StoredPrediction {
            id: self.next_id + 1,
            label: prediction.label,
            confidence: prediction.confidence,
            image: prediction.image,
            created_at: Utc::now(),
        };
        let mut next = self.clone();
        next.next_id = stored.id;
        next.predictions.push(stored.clone());
        (next, stored)
    }

    pub fn with_removed(
        &self,
        id: PredictionId,
    ) -> Result<(Document, StoredPrediction), StoreError> {
        let index = self
            .predictions
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let mut next = self.clone();
        let removed = next.predictions.remove(index);
        Ok((next, removed))
    }

    /// Most recent first.
    pub fn newest_first(&self) -> Vec<StoredPrediction> {
        self.predictions.iter().rev().cloned().collect()
    }

    pub fn get(&self, id: PredictionId) -> Option<StoredPrediction> {
        self.predictions.iter().find(|p| p.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}
