use crate::error::StoreError;
use crate::library::logger::interface::Logger;
use crate::prediction_store::document::Document;
use crate::prediction_store::interface::PredictionStore;
use crate::prediction_store::record::{NewPrediction, PredictionId, StoredPrediction};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Keeps the collection as one JSON document on disk.
///
/// Writes go to a sibling temp file which is synced and then renamed over the
/// store file, so the file on disk is always either the old or the new
/// document. The in-memory copy is only replaced after the rename succeeds.
///
/// Every append or delete rewrites the whole document, images included, so
/// write cost grows with the size of the history. Fine for a personal photo
/// log; a large history wants images in their own files and an index here.
pub struct PredictionStoreFile {
    path: PathBuf,
    logger: Arc<dyn Logger + Send + Sync>,
    document: Mutex<Option<Document>>,
}

impl PredictionStoreFile {
    pub fn open(
        path: impl AsRef<Path>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let logger = logger.with_namespace("store");

        let document = if path.exists() {
            let contents = fs::read(&path)?;
            serde_json::from_slice(&contents)?
        } else {
            let document = Document::default();
            write_atomically(&path, &document)?;
            document
        };

        let _ = logger.info(&format!(
            "Opened {} with {} predictions",
            path.display(),
            document.len()
        ));

        Ok(Self {
            path,
            logger,
            document: Mutex::new(Some(document)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Document>>, StoreError> {
        self.document
            .lock()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_atomically(path: &Path, document: &Document) -> Result<(), StoreError> {
    let temp = temp_path(path);
    let bytes = serde_json::to_vec(document)?;

    let written = (|| -> Result<(), StoreError> {
        let mut file = File::create(&temp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&temp, path)?;
        Ok(())
    })();

    if written.is_err() {
        let _ = fs::remove_file(&temp);
    }
    written
}

impl PredictionStore for PredictionStoreFile {
    fn append(&self, prediction: NewPrediction) -> Result<StoredPrediction, StoreError> {
        Document::validate(&prediction)?;
        let mut guard = self.lock()?;
        let document = guard.as_ref().ok_or(StoreError::Closed)?;

        let (next, stored) = document.with_appended(prediction);
        write_atomically(&self.path, &next).map_err(|e| {
            let _ = self.logger.error(&format!("Append failed: {}", e));
            e
        })?;
        *guard = Some(next);

        let _ = self.logger.info(&format!(
            "Stored prediction {} ({})",
            stored.id, stored.label
        ));
        Ok(stored)
    }

    fn list_all(&self) -> Result<Vec<StoredPrediction>, StoreError> {
        let guard = self.lock()?;
        let document = guard.as_ref().ok_or(StoreError::Closed)?;
        Ok(document.newest_first())
    }

    fn get(&self, id: PredictionId) -> Result<Option<StoredPrediction>, StoreError> {
        let guard = self.lock()?;
        let document = guard.as_ref().ok_or(StoreError::Closed)?;
        Ok(document.get(id))
    }

    fn delete(&self, id: PredictionId) -> Result<StoredPrediction, StoreError> {
        let mut guard = self.lock()?;
        let document = guard.as_ref().ok_or(StoreError::Closed)?;

        let (next, removed) = document.with_removed(id)?;
        write_atomically(&self.path, &next).map_err(|e| {
            let _ = self.logger.error(&format!("Delete failed: {}", e));
            e
        })?;
        *guard = Some(next);

        let _ = self.logger.info(&format!("Deleted prediction {}", id));
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
        if self.lock()?.take().is_some() {
            let _ = self.logger.info("Closed");
        }
        Ok(())
    }
}
