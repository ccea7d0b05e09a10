use crate::error::StoreError;
use crate::prediction_store::document::Document;
use crate::prediction_store::interface::PredictionStore;
use crate::prediction_store::record::{NewPrediction, PredictionId, StoredPrediction};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

pub struct PredictionStoreInMemory {
    document: Mutex<Option<Document>>,
    fail_writes: AtomicBool,
}

impl Default for PredictionStoreInMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionStoreInMemory {
    pub fn new() -> Self {
        Self {
            document: Mutex::new(Some(Document::default())),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Makes every following append/delete fail as if the transaction aborted.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Document>>, StoreError> {
        self.document
            .lock()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))
    }

    fn commit(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteFailed("transaction aborted".to_string()));
        }
        Ok(())
    }
}

impl PredictionStore for PredictionStoreInMemory {
    fn append(&self, prediction: NewPrediction) -> Result<StoredPrediction, StoreError> {
        Document::validate(&prediction)?;
        let mut guard = self.lock()?;
        let document = guard.as_ref().ok_or(StoreError::Closed)?;
        let (next, stored) = document.with_appended(prediction);
        self.commit()?;
        *guard = Some(next);
        Ok(stored)
    }

    fn list_all(&self) -> Result<Vec<StoredPrediction>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.as_ref().ok_or(StoreError::Closed)?.newest_first())
    }

    fn get(&self, id: PredictionId) -> Result<Option<StoredPrediction>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.as_ref().ok_or(StoreError::Closed)?.get(id))
    }

    fn delete(&self, id: PredictionId) -> Result<StoredPrediction, StoreError> {
        let mut guard = self.lock()?;
        let document = guard.as_ref().ok_or(StoreError::Closed)?;
        let (next, removed) = document.with_removed(id)?;
        self.commit()?;
        *guard = Some(next);
        Ok(removed)
    }

    fn len(&self) -> Result<usize, StoreError> {
        let guard = self.lock()?;
        guard
            .as_ref()
            .map(Document::len)
            .ok_or(StoreError::Closed)
    }

    fn close(&self) -> Result<(), StoreError> {
        self.lock()?.take();
        Ok(())
    }
}
