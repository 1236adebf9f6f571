//! Rendered document store.
//!
//! Documents are kept as `<root>/<id>.pdf`. Writes go to a temporary sibling first and
//! are renamed into place, so a reader never sees a half-written file.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use super::engine::document_filename;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid document id '{0}'")]
    InvalidId(String),
}

/// Storage for rendered PDFs, keyed by record id.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Store `bytes` under `id`, replacing any previous document.
    async fn put(&self, id: &str, bytes: &[u8]) -> Result<PathBuf, StorageError>;

    /// Read a stored document. `Ok(None)` when nothing is stored under `id`.
    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Remove a stored document. Returns whether one existed.
    async fn delete(&self, id: &str) -> Result<bool, StorageError>;

    fn path_for(&self, id: &str) -> Result<PathBuf, StorageError>;
}

/// Rejects ids that would not map to a single plain file name.
pub fn validate_id(id: &str) -> Result<&str, StorageError> {
    let trimmed = id.trim();
    if trimmed.is_empty()
        || trimmed != id
        || id == "."
        || id == ".."
        || sanitize_filename::sanitize(id) != id
    {
        return Err(StorageError::InvalidId(id.to_string()));
    }
    Ok(id)
}

/// Document store on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalDocumentStorage {
    root: PathBuf,
}

impl LocalDocumentStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn io_error(path: &Path, source: io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
impl DocumentStorage for LocalDocumentStorage {
    async fn put(&self, id: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.path_for(id)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Self::io_error(&self.root, e))?;

        let tmp = self
            .root
            .join(format!("{}.tmp-{}", document_filename(id), Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&tmp, bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(Self::io_error(&tmp, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(Self::io_error(&path, e));
        }

        log::debug!("Stored document {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let path = self.path_for(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StorageError> {
        let id = validate_id(id)?;
        Ok(self.root.join(document_filename(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalDocumentStorage::new(dir.path().join("documents"));

        let path = storage.put("abc", b"first").await.unwrap();
        assert_eq!(path, dir.path().join("documents").join("abc.pdf"));

        storage.put("abc", b"second").await.unwrap();
        assert_eq!(storage.get("abc").await.unwrap(), Some(b"second".to_vec()));

        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("documents"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_get_and_delete_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalDocumentStorage::new(dir.path());

        assert_eq!(storage.get("nope").await.unwrap(), None);
        assert!(!storage.delete("nope").await.unwrap());

        storage.put("yes", b"%PDF").await.unwrap();
        assert!(storage.delete("yes").await.unwrap());
        assert_eq!(storage.get("yes").await.unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_ids() {
        let storage = LocalDocumentStorage::new("/tmp/docs");
        for id in ["", " ", "..", "../etc", "a/b", " padded"] {
            assert!(
                matches!(storage.path_for(id), Err(StorageError::InvalidId(_))),
                "{:?} should be rejected",
                id
            );
        }
        assert!(storage
            .path_for("7f0c2b9e-4d4a-4c1f-9d6e-1b2a3c4d5e6f")
            .is_ok());
    }
}
