//! Application state and record operations.
//!
//! - `records` - the in-process record tables
//!
//! `AppState` ties the record tables to the serial allocator and the document
//! generator. Every create or update re-renders the record's PDF. Renders for one
//! record run one at a time and always read the newest version from its table, so the
//! stored PDF never falls behind the record.

pub mod records;

use actix_web::HttpResponse;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::certificate::model::{
    CertificateRecord, CreateCertificateRequest, UpdateCertificateRequest,
};
use crate::config::AppConfig;
use crate::documents::{
    AssetSource, DocumentError, DocumentGenerator, Generator, LocalDocumentStorage,
};
use crate::numbering::{JsonFileCounterStore, NumberingError, SerialAllocator};
use crate::service_report::model::{CreateServiceRequest, ServiceRecord, UpdateServiceRequest};
use crate::ErrorResponse;

pub use records::{Record, RecordTable};

/// Errors from record operations, mapped to HTTP responses by the routes.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    Numbering(#[from] NumberingError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("background task failed: {0}")]
    Task(String),
}

impl RecordError {
    /// HTTP response for this error. Numbering and rendering details stay in the log.
    pub fn to_response(&self) -> HttpResponse {
        match self {
            RecordError::NotFound(what) => {
                HttpResponse::NotFound().json(ErrorResponse::not_found(&format!("{} not found", what)))
            }
            RecordError::Numbering(e) => {
                log::error!("Certificate number allocation failed: {}", e);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::internal_error("could not allocate certificate number"))
            }
            RecordError::Document(e) => {
                log::error!("{}", e);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::internal_error("could not generate document"))
            }
            RecordError::Task(e) => {
                log::error!("Background task failed: {}", e);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::internal_error("internal error"))
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub certificates: RecordTable<CertificateRecord>,
    pub services: RecordTable<ServiceRecord>,
    pub allocator: Arc<SerialAllocator>,
    pub documents: DocumentGenerator,
    render_locks: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl AppState {
    pub fn new(allocator: Arc<SerialAllocator>, documents: DocumentGenerator) -> Self {
        Self {
            certificates: RecordTable::new(),
            services: RecordTable::new(),
            allocator,
            documents,
            render_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let counter_store = Arc::new(JsonFileCounterStore::new(&config.counter_file));
        let allocator = SerialAllocator::new(counter_store, config.certificate_prefix.clone())
            .with_policy(config.persistence_policy());

        let storage = Arc::new(LocalDocumentStorage::new(&config.documents_dir));
        let documents = DocumentGenerator::new(storage, AssetSource::new(&config.assets_dir));

        log::info!(
            "Counter file {}, documents in {}, assets from {}",
            config.counter_file.display(),
            config.documents_dir.display(),
            config.assets_dir.display()
        );

        Self::new(Arc::new(allocator), documents)
    }

    /// Issue a certificate number, store the new record and render its PDF.
    ///
    /// The record is kept even when rendering fails; its PDF is rebuilt on the next
    /// download.
    pub async fn create_certificate(
        &self,
        req: CreateCertificateRequest,
    ) -> Result<CertificateRecord, RecordError> {
        let allocator = Arc::clone(&self.allocator);
        let number = tokio::task::spawn_blocking(move || allocator.allocate())
            .await
            .map_err(|e| RecordError::Task(e.to_string()))??;

        let record = CertificateRecord::from_request(
            Uuid::new_v4().to_string(),
            number.to_string(),
            req,
            Utc::now(),
        );
        self.certificates.put(record.clone());
        log::info!(
            "Created certificate {} ({})",
            record.certificate_id,
            record.certificate_no
        );

        self.render_latest(&self.certificates, &record.certificate_id)
            .await?;
        Ok(record)
    }

    pub async fn update_certificate(
        &self,
        id: &str,
        req: UpdateCertificateRequest,
    ) -> Result<CertificateRecord, RecordError> {
        let record = self
            .certificates
            .update(id, |record| record.apply_update(req, Utc::now()))
            .ok_or_else(|| RecordError::NotFound(format!("Certificate {}", id)))?;

        self.render_latest(&self.certificates, id).await?;
        Ok(record)
    }

    pub async fn delete_certificate(&self, id: &str) -> Result<(), RecordError> {
        let lock = self.render_lock(id);
        let guard = lock.lock().await;
        let record = self
            .certificates
            .remove(id)
            .ok_or_else(|| RecordError::NotFound(format!("Certificate {}", id)))?;
        self.discard_document(&record.certificate_id).await;
        drop(guard);
        self.render_locks.lock().remove(id);
        log::info!("Deleted certificate {}", record.certificate_id);
        Ok(())
    }

    pub async fn certificate_pdf(
        &self,
        id: &str,
    ) -> Result<(CertificateRecord, Vec<u8>), RecordError> {
        let record = self
            .certificates
            .get(id)
            .ok_or_else(|| RecordError::NotFound(format!("Certificate {}", id)))?;
        let bytes = self.stored_or_rendered(&self.certificates, id).await?;
        Ok((record, bytes))
    }

    /// Store a new service record and render its PDF.
    pub async fn create_service(
        &self,
        req: CreateServiceRequest,
    ) -> Result<ServiceRecord, RecordError> {
        let record = ServiceRecord::from_request(Uuid::new_v4().to_string(), req, Utc::now());
        self.services.put(record.clone());
        log::info!("Created service report {}", record.service_id);

        self.render_latest(&self.services, &record.service_id).await?;
        Ok(record)
    }

    pub async fn update_service(
        &self,
        id: &str,
        req: UpdateServiceRequest,
    ) -> Result<ServiceRecord, RecordError> {
        let record = self
            .services
            .update(id, |record| record.apply_update(req, Utc::now()))
            .ok_or_else(|| RecordError::NotFound(format!("Service report {}", id)))?;

        self.render_latest(&self.services, id).await?;
        Ok(record)
    }

    pub async fn delete_service(&self, id: &str) -> Result<(), RecordError> {
        let lock = self.render_lock(id);
        let guard = lock.lock().await;
        let record = self
            .services
            .remove(id)
            .ok_or_else(|| RecordError::NotFound(format!("Service report {}", id)))?;
        self.discard_document(&record.service_id).await;
        drop(guard);
        self.render_locks.lock().remove(id);
        log::info!("Deleted service report {}", record.service_id);
        Ok(())
    }

    pub async fn service_pdf(&self, id: &str) -> Result<(ServiceRecord, Vec<u8>), RecordError> {
        let record = self
            .services
            .get(id)
            .ok_or_else(|| RecordError::NotFound(format!("Service report {}", id)))?;
        let bytes = self.stored_or_rendered(&self.services, id).await?;
        Ok((record, bytes))
    }

    fn render_lock(&self, id: &str) -> Arc<tokio::sync::Mutex<()>> {
        Arc::clone(self.render_locks.lock().entry(id.to_string()).or_default())
    }

    /// Render and store the newest version of `id` held in `table`.
    async fn render_latest<R>(&self, table: &RecordTable<R>, id: &str) -> Result<(), RecordError>
    where
        R: Record,
        DocumentGenerator: Generator<R>,
    {
        let lock = self.render_lock(id);
        let _guard = lock.lock().await;
        match table.get(id) {
            Some(latest) => {
                self.documents.generate(&latest).await?;
            }
            None => log::debug!("{} was deleted before its document was rendered", id),
        }
        Ok(())
    }

    /// The stored PDF for `id`, rendering it first when it is missing.
    async fn stored_or_rendered<R>(
        &self,
        table: &RecordTable<R>,
        id: &str,
    ) -> Result<Vec<u8>, RecordError>
    where
        R: Record,
        DocumentGenerator: Generator<R>,
    {
        let lock = self.render_lock(id);
        let _guard = lock.lock().await;
        if let Some(bytes) = self.documents.fetch(id).await? {
            return Ok(bytes);
        }

        let latest = table
            .get(id)
            .ok_or_else(|| RecordError::NotFound(format!("Record {}", id)))?;
        log::info!("No stored document for {}, rendering", id);
        self.documents.generate(&latest).await?;
        self.documents
            .fetch(id)
            .await?
            .ok_or_else(|| RecordError::NotFound(format!("Document {}", id)))
    }

    async fn discard_document(&self, id: &str) {
        match self.documents.remove(id).await {
            Ok(true) => log::debug!("Removed stored document {}", id),
            Ok(false) => log::debug!("No stored document for {}", id),
            Err(e) => log::warn!("Failed to remove stored document {}: {}", id, e),
        }
    }
}
