//! Multi-file upload and cascade deletion helpers.

use super::domain::{StoredImage, UploadedFile};
use super::ports::{MediaStore, MediaStoreResult};
use tracing::{debug, warn};

/// Uploads every file into `folder`, in order.
///
/// When any upload fails, images already uploaded by this call are removed
/// again (best effort) before the error is returned.
///
/// # Errors
///
/// Returns the first upload error.
pub async fn upload_all<M>(
    store: &M,
    files: &[UploadedFile],
    folder: &str,
) -> MediaStoreResult<Vec<StoredImage>>
where
    M: MediaStore + ?Sized,
{
    let mut stored = Vec::with_capacity(files.len());
    for file in files {
        match store.upload(file, folder).await {
            Ok(image) => {
                debug!(media_id = %image.media_id, folder, "uploaded image");
                stored.push(image);
            }
            Err(err) => {
                warn!(file = file.file_name(), error = %err, "image upload failed");
                let orphaned = purge_images(store, &stored).await;
                if !orphaned.is_empty() {
                    warn!(?orphaned, "could not roll back uploaded images");
                }
                return Err(err);
            }
        }
    }
    Ok(stored)
}

/// Deletes every image, continuing past failures.
///
/// Returns the media identifiers that could not be deleted.
pub async fn purge_images<M>(store: &M, images: &[StoredImage]) -> Vec<String>
where
    M: MediaStore + ?Sized,
{
    let mut failed = Vec::new();
    for image in images {
        if let Err(err) = store.delete(&image.media_id).await {
            warn!(media_id = %image.media_id, error = %err, "image deletion failed");
            failed.push(image.media_id.clone());
        }
    }
    failed
}
