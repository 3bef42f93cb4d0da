//! Multipart form reading for routes that accept images.

use super::MAX_FILES_PER_REQUEST;
use super::error::{ApiError, ApiResult};
use crate::media::domain::{StoredImage, UploadedFile};
use crate::media::ports::MediaStore;
use crate::media::services::{purge_images, upload_all};
use axum::extract::Multipart;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Field name every file part must use.
pub const IMAGE_FIELD: &str = "images";

/// Text fields and image files read from a multipart body.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: BTreeMap<String, String>,
    files: Vec<UploadedFile>,
}

impl UploadForm {
    /// Reads every part of `multipart`.
    ///
    /// Files with a name already seen are dropped.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed bodies, file parts outside
    /// the `images` field, empty or oversized files, and more than
    /// [`MAX_FILES_PER_REQUEST`] distinct files.
    pub async fn read(mut multipart: Multipart, max_file_bytes: usize) -> ApiResult<Self> {
        let mut form = Self::default();
        let mut seen_names = BTreeSet::new();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_owned();
            let file_name = field.file_name().map(ToOwned::to_owned);
            let content_type = field.content_type().map(ToOwned::to_owned);
            let Some(original_name) = file_name else {
                if name == IMAGE_FIELD {
                    return Err(ApiError::validation("image parts must carry a file name"));
                }
                let value = field.text().await?;
                form.fields.insert(name, value);
                continue;
            };
            if name != IMAGE_FIELD {
                return Err(ApiError::validation(format!(
                    "files must be sent in the '{IMAGE_FIELD}' field, not '{name}'"
                )));
            }
            let bytes = field.bytes().await?;
            if bytes.is_empty() {
                return Err(ApiError::validation(format!(
                    "uploaded file '{original_name}' is empty"
                )));
            }
            if bytes.len() > max_file_bytes {
                return Err(ApiError::validation(format!(
                    "uploaded file '{original_name}' exceeds {max_file_bytes} bytes"
                )));
            }
            if !seen_names.insert(original_name.clone()) {
                debug!(file = %original_name, "dropping duplicate upload");
                continue;
            }
            if form.files.len() >= MAX_FILES_PER_REQUEST {
                return Err(ApiError::validation(format!(
                    "at most {MAX_FILES_PER_REQUEST} images may be uploaded at once"
                )));
            }
            form.files
                .push(UploadedFile::new(&original_name, content_type, bytes.to_vec()));
        }
        Ok(form)
    }

    /// Returns a trimmed text field, treating blank values as absent.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Returns a required text field.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the missing field.
    pub fn require(&self, name: &str) -> ApiResult<&str> {
        self.text(name)
            .ok_or_else(|| ApiError::validation(format!("'{name}' is required")))
    }

    /// Returns a boolean field; only `true` (any case) is true.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.text(name)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }

    /// Returns the uploaded files.
    #[must_use]
    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }
}

/// Uploads the form's files into `folder`.
///
/// # Errors
///
/// Returns the media store error mapped for the client.
pub async fn store_uploads(
    store: &dyn MediaStore,
    form: &UploadForm,
    folder: &str,
) -> ApiResult<Vec<StoredImage>> {
    Ok(upload_all(store, form.files(), folder).await?)
}

/// Removes images uploaded for a request that then failed.
pub async fn discard_uploads(store: &dyn MediaStore, images: &[StoredImage]) {
    let orphaned = purge_images(store, images).await;
    if !orphaned.is_empty() {
        warn!(?orphaned, "could not remove uploads of a failed request");
    }
}
