//! Media value types.

use serde::{Deserialize, Serialize};

/// Folder holding issue images.
pub const ISSUE_IMAGE_FOLDER: &str = "issues";

/// Folder holding catalog product images.
pub const PRODUCT_IMAGE_FOLDER: &str = "shop_products";

/// Reference to an image held by the media store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    /// Public URL of the image.
    pub url: String,
    /// Store-specific identifier used for deletion.
    pub media_id: String,
}

impl StoredImage {
    /// Creates an image reference.
    #[must_use]
    pub fn new(url: impl Into<String>, media_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            media_id: media_id.into(),
        }
    }
}

/// File received from a client, not yet stored.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl UploadedFile {
    /// Creates an uploaded file; the name is sanitized for storage.
    #[must_use]
    pub fn new(file_name: &str, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: sanitize_file_name(file_name),
            content_type,
            bytes,
        }
    }

    /// Returns the sanitized file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the declared content type.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the file contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns whether the file has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Replaces whitespace with `_` and drops characters outside
/// `[A-Za-z0-9_.-]`.
///
/// Leading dots are stripped so a name can never address a parent or
/// hidden entry. An empty result becomes `"file"`.
#[must_use]
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .filter_map(|ch| {
            if ch.is_whitespace() {
                Some('_')
            } else if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-') {
                Some(ch)
            } else {
                None
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_owned()
    } else {
        trimmed.to_owned()
    }
}
