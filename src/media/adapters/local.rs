//! Filesystem media store rooted in a capability directory.
//!
//! Files land under `<root>/<folder>/<uuid>-<name>` and are served back by
//! the HTTP layer below the configured public prefix.

use crate::media::domain::{StoredImage, UploadedFile};
use crate::media::ports::{MediaStore, MediaStoreError, MediaStoreResult};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io::ErrorKind;
use std::sync::Arc;
use uuid::Uuid;

/// Media store writing into a local directory.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: Arc<Dir>,
    root_path: Utf8PathBuf,
    public_prefix: String,
}

impl LocalMediaStore {
    /// Opens (creating if needed) the directory at `root`.
    ///
    /// `public_prefix` is prepended to media identifiers to build URLs, for
    /// example `/uploads`.
    ///
    /// # Errors
    ///
    /// Returns [`MediaStoreError::Backend`] when the directory cannot be
    /// created or opened.
    pub fn open(root: &Utf8Path, public_prefix: &str) -> MediaStoreResult<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(MediaStoreError::backend)?;
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(MediaStoreError::backend)?;
        Ok(Self {
            root: Arc::new(dir),
            root_path: root.to_owned(),
            public_prefix: public_prefix.trim_end_matches('/').to_owned(),
        })
    }

    /// Returns the directory this store writes into.
    #[must_use]
    pub fn root_path(&self) -> &Utf8Path {
        &self.root_path
    }

    /// Reads a stored file.
    ///
    /// Returns `None` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`MediaStoreError::InvalidMediaId`] for identifiers that do not
    /// have the `folder/file` shape and [`MediaStoreError::Backend`] for I/O
    /// failures.
    pub async fn read(&self, media_id: &str) -> MediaStoreResult<Option<Vec<u8>>> {
        let path = validate_media_id(media_id)?;
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || match root.read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(MediaStoreError::backend(err)),
        })
        .await
        .map_err(MediaStoreError::backend)?
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn upload(&self, file: &UploadedFile, folder: &str) -> MediaStoreResult<StoredImage> {
        let folder_name = validate_segment(folder)?;
        let media_id = format!(
            "{folder_name}/{}-{}",
            Uuid::new_v4().simple(),
            file.file_name()
        );
        let url = format!("{}/{media_id}", self.public_prefix);
        let root = Arc::clone(&self.root);
        let bytes = file.bytes().to_vec();
        let target = media_id.clone();

        tokio::task::spawn_blocking(move || {
            root.create_dir_all(&folder_name)?;
            root.write(&target, bytes)
        })
        .await
        .map_err(MediaStoreError::backend)?
        .map_err(MediaStoreError::backend)?;

        Ok(StoredImage::new(url, media_id))
    }

    async fn delete(&self, media_id: &str) -> MediaStoreResult<()> {
        let path = validate_media_id(media_id)?;
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || match root.remove_file(&path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(MediaStoreError::backend(err)),
            _ => Ok(()),
        })
        .await
        .map_err(MediaStoreError::backend)?
    }
}

fn validate_segment(segment: &str) -> MediaStoreResult<String> {
    let valid = !segment.is_empty()
        && !segment.starts_with('.')
        && segment
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-'));
    if valid {
        Ok(segment.to_owned())
    } else {
        Err(MediaStoreError::InvalidMediaId(segment.to_owned()))
    }
}

fn validate_media_id(media_id: &str) -> MediaStoreResult<String> {
    let Some((folder, file)) = media_id.split_once('/') else {
        return Err(MediaStoreError::InvalidMediaId(media_id.to_owned()));
    };
    validate_segment(folder)
        .and_then(|_| validate_segment(file))
        .map_err(|_| MediaStoreError::InvalidMediaId(media_id.to_owned()))?;
    Ok(media_id.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::domain::ISSUE_IMAGE_FOLDER;
    use rstest::rstest;

    fn open_store(dir: &tempfile::TempDir) -> LocalMediaStore {
        let root = Utf8Path::from_path(dir.path()).expect("temp dir should be UTF-8");
        LocalMediaStore::open(&root.join("uploads"), "/uploads/").expect("store should open")
    }

    #[tokio::test]
    async fn upload_read_and_delete_round_trip() {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = open_store(&temp);
        let file = UploadedFile::new("ac unit.jpg", None, b"jpeg".to_vec());

        let image = store
            .upload(&file, ISSUE_IMAGE_FOLDER)
            .await
            .expect("upload should succeed");

        assert!(image.media_id.starts_with("issues/"));
        assert!(image.media_id.ends_with("-ac_unit.jpg"));
        assert_eq!(image.url, format!("/uploads/{}", image.media_id));
        assert_eq!(
            store.read(&image.media_id).await.expect("read should succeed"),
            Some(b"jpeg".to_vec())
        );

        store.delete(&image.media_id).await.expect("delete should succeed");
        store
            .delete(&image.media_id)
            .await
            .expect("repeated delete should succeed");
        assert_eq!(store.read(&image.media_id).await.expect("read"), None);
    }

    #[rstest]
    #[case("../secrets")]
    #[case("issues/../../etc")]
    #[case("issues")]
    #[case("issues/.hidden")]
    #[tokio::test]
    async fn rejects_escaping_identifiers(#[case] media_id: &str) {
        let temp = tempfile::tempdir().expect("temp dir");
        let store = open_store(&temp);

        let result = store.delete(media_id).await;

        assert!(matches!(result, Err(MediaStoreError::InvalidMediaId(_))));
    }
}
