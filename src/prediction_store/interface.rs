use crate::error::StoreError;
use crate::prediction_store::record::{NewPrediction, PredictionId, StoredPrediction};

/// Durable collection of predictions. Every mutation is all-or-nothing and
/// readers never see a half-applied write.
pub trait PredictionStore: Send + Sync {
    fn append(&self, prediction: NewPrediction) -> Result<StoredPrediction, StoreError>;

    /// Snapshot of every record, most recent first.
    fn list_all(&self) -> Result<Vec<StoredPrediction>, StoreError>;

    fn get(&self, id: PredictionId) -> Result<Option<StoredPrediction>, StoreError>;

    /// Fails with `StoreError::NotFound` when no record has this id.
    fn delete(&self, id: PredictionId) -> Result<StoredPrediction, StoreError>;

    fn len(&self) -> Result<usize, StoreError>;

    fn close(&self) -> Result<(), StoreError>;
}
