//! Document generation against a recording storage double.

mod common;

use async_trait::async_trait;
use calibration_docs_server::documents::{
    AssetSource, DocumentError, DocumentGenerator, DocumentStorage, Generator, StorageError,
};
use common::{fixed_time, sample_certificate, sample_service};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Storage double that keeps documents in memory and counts writes.
struct MockStorage {
    put_count: AtomicUsize,
    files: Mutex<HashMap<String, Vec<u8>>>,
    should_fail: bool,
}

impl MockStorage {
    fn new() -> Self {
        Self {
            put_count: AtomicUsize::new(0),
            files: Mutex::new(HashMap::new()),
            should_fail: false,
        }
    }

    fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }
}

#[async_trait]
impl DocumentStorage for MockStorage {
    async fn put(&self, id: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        if self.should_fail {
            return Err(StorageError::Io {
                path: self.path_for(id)?,
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        self.put_count.fetch_add(1, Ordering::SeqCst);
        self.files.lock().await.insert(id.to_string(), bytes.to_vec());
        self.path_for(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.files.lock().await.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.files.lock().await.remove(id).is_some())
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StorageError> {
        Ok(PathBuf::from("/mock").join(format!("{}.pdf", id)))
    }
}

fn generator(storage: Arc<MockStorage>) -> DocumentGenerator {
    DocumentGenerator::new(storage, AssetSource::new("/nonexistent/assets"))
        .with_fixed_time(fixed_time())
}

#[tokio::test]
async fn test_generated_documents_are_stored_once_each() {
    let storage = Arc::new(MockStorage::new());
    let generator = generator(storage.clone());

    let stored = generator
        .generate_certificate_pdf(&sample_certificate("c-1", 2))
        .await
        .unwrap();
    assert_eq!(stored.path, PathBuf::from("/mock/c-1.pdf"));

    let stored_service = generator.generate(&sample_service("s-1", 2)).await.unwrap();
    assert_eq!(stored_service.id, "s-1");

    assert_eq!(storage.put_count.load(Ordering::SeqCst), 2);
    let bytes = generator.fetch("c-1").await.unwrap().unwrap();
    assert_eq!(bytes.len(), stored.size);
}

#[tokio::test]
async fn test_regeneration_overwrites_previous_document() {
    let storage = Arc::new(MockStorage::new());
    let generator = generator(storage.clone());

    let mut record = sample_certificate("c-1", 1);
    generator.generate_certificate_pdf(&record).await.unwrap();
    let before = generator.fetch("c-1").await.unwrap().unwrap();

    record.status = Some("Fail".to_string());
    generator.generate_certificate_pdf(&record).await.unwrap();
    let after = generator.fetch("c-1").await.unwrap().unwrap();

    assert_ne!(before, after);
    assert_eq!(storage.files.lock().await.len(), 1);
}

#[tokio::test]
async fn test_storage_failure_is_a_document_error() {
    let storage = Arc::new(MockStorage::new_failing());
    let generator = generator(storage);

    let err = generator
        .generate_service_pdf(&sample_service("s-1", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::Storage(_)));
    assert!(err.to_string().starts_with("could not generate document"));
}

#[tokio::test]
async fn test_remove_reports_whether_document_existed() {
    let storage = Arc::new(MockStorage::new());
    let generator = generator(storage);

    generator
        .generate_certificate_pdf(&sample_certificate("c-9", 0))
        .await
        .unwrap();
    assert!(generator.remove("c-9").await.unwrap());
    assert!(!generator.remove("c-9").await.unwrap());
}
