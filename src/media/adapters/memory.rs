//! In-memory media store with failure injection.

use crate::media::domain::{StoredImage, UploadedFile};
use crate::media::ports::{MediaStore, MediaStoreError, MediaStoreResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Debug, Default)]
struct InMemoryMediaState {
    objects: HashMap<String, Vec<u8>>,
    rejected_names: HashSet<String>,
    failing_deletes: HashSet<String>,
}

/// Thread-safe media store that keeps uploads in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMediaStore {
    state: Arc<RwLock<InMemoryMediaState>>,
}

impl InMemoryMediaStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes uploads of files with this sanitized name fail.
    pub fn reject_uploads_named(&self, file_name: &str) {
        if let Ok(mut state) = self.state.write() {
            state.rejected_names.insert(file_name.to_owned());
        }
    }

    /// Makes deletion of this media identifier fail.
    pub fn fail_deletes_for(&self, media_id: &str) {
        if let Ok(mut state) = self.state.write() {
            state.failing_deletes.insert(media_id.to_owned());
        }
    }

    /// Returns whether the media identifier is currently stored.
    #[must_use]
    pub fn contains(&self, media_id: &str) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.objects.contains_key(media_id))
    }

    /// Returns the number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().map_or(0, |state| state.objects.len())
    }

    /// Returns whether the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn upload(&self, file: &UploadedFile, folder: &str) -> MediaStoreResult<StoredImage> {
        let mut state = self
            .state
            .write()
            .map_err(|err| MediaStoreError::backend(std::io::Error::other(err.to_string())))?;
        if state.rejected_names.contains(file.file_name()) {
            return Err(MediaStoreError::Rejected(format!(
                "upload of {} refused",
                file.file_name()
            )));
        }
        let media_id = format!("{folder}/{}", Uuid::new_v4().simple());
        state.objects.insert(media_id.clone(), file.bytes().to_vec());
        Ok(StoredImage::new(
            format!("memory://{media_id}/{}", file.file_name()),
            media_id,
        ))
    }

    async fn delete(&self, media_id: &str) -> MediaStoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| MediaStoreError::backend(std::io::Error::other(err.to_string())))?;
        if state.failing_deletes.contains(media_id) {
            return Err(MediaStoreError::backend(std::io::Error::other(format!(
                "deletion of {media_id} failed"
            ))));
        }
        state.objects.remove(media_id);
        Ok(())
    }
}
