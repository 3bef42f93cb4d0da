//! Media store port.

use super::domain::{StoredImage, UploadedFile};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for media store operations.
pub type MediaStoreResult<T> = Result<T, MediaStoreError>;

/// Upload and delete contract for image storage.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Uploads `file` into `folder` and returns its reference.
    ///
    /// # Errors
    ///
    /// Returns [`MediaStoreError::Rejected`] when the store refuses the file
    /// and [`MediaStoreError::Backend`] when the store is unreachable.
    async fn upload(&self, file: &UploadedFile, folder: &str) -> MediaStoreResult<StoredImage>;

    /// Deletes the media with the given identifier.
    ///
    /// Deleting media that no longer exists succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`MediaStoreError`] when the store fails to delete.
    async fn delete(&self, media_id: &str) -> MediaStoreResult<()>;
}

/// Errors returned by media store implementations.
#[derive(Debug, Clone, Error)]
pub enum MediaStoreError {
    /// The store refused the request.
    #[error("media store rejected the request: {0}")]
    Rejected(String),

    /// The media identifier is not one this store issues.
    #[error("invalid media identifier: {0}")]
    InvalidMediaId(String),

    /// Transport or storage failure.
    #[error("media store error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl MediaStoreError {
    /// Wraps a transport or storage failure.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
