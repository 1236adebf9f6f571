//! Render-and-store entry points.
//!
//! Layout and serialization are CPU bound and asset loading touches the disk, so both run
//! on the blocking pool. The finished bytes are handed to the document store.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::path::PathBuf;
use std::sync::Arc;

use super::assets::AssetSource;
use super::certificate::CertificateLayout;
use super::engine::PdfRenderEngine;
use super::service::ServiceLayout;
use super::storage::DocumentStorage;
use super::traits::{DocumentLayout, Generator};
use super::{DocumentError, RenderContext, RenderError, RenderReport};
use crate::certificate::model::CertificateRecord;
use crate::metrics::{DOCUMENTS_RENDERED, DOCUMENT_RENDER_FAILURES};
use crate::service_report::model::ServiceRecord;

/// A rendered document that has been written to the store.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: String,
    pub filename: String,
    pub path: PathBuf,
    pub size: usize,
    pub page_count: usize,
    pub report: RenderReport,
}

/// Renders records and stores the resulting PDFs.
#[derive(Clone)]
pub struct DocumentGenerator {
    storage: Arc<dyn DocumentStorage>,
    assets: AssetSource,
    fixed_time: Option<NaiveDateTime>,
}

impl DocumentGenerator {
    pub fn new(storage: Arc<dyn DocumentStorage>, assets: AssetSource) -> Self {
        Self {
            storage,
            assets,
            fixed_time: None,
        }
    }

    /// Stamp every document with `generated_at` instead of the current time.
    pub fn with_fixed_time(mut self, generated_at: NaiveDateTime) -> Self {
        self.fixed_time = Some(generated_at);
        self
    }

    pub fn storage(&self) -> &Arc<dyn DocumentStorage> {
        &self.storage
    }

    pub async fn generate_certificate_pdf(
        &self,
        record: &CertificateRecord,
    ) -> Result<StoredDocument, DocumentError> {
        <Self as Generator<CertificateRecord>>::generate(self, record).await
    }

    pub async fn generate_service_pdf(
        &self,
        record: &ServiceRecord,
    ) -> Result<StoredDocument, DocumentError> {
        <Self as Generator<ServiceRecord>>::generate(self, record).await
    }

    /// Stored bytes for `id`, if any.
    pub async fn fetch(&self, id: &str) -> Result<Option<Vec<u8>>, DocumentError> {
        Ok(self.storage.get(id).await?)
    }

    /// Remove the stored document for `id`. Returns whether one existed.
    pub async fn remove(&self, id: &str) -> Result<bool, DocumentError> {
        Ok(self.storage.delete(id).await?)
    }

    async fn render_and_store<L>(
        &self,
        layout: L,
        record: L::Record,
    ) -> Result<StoredDocument, DocumentError>
    where
        L: DocumentLayout + Send + 'static,
        L::Record: Send + 'static,
    {
        let kind = layout.kind();
        let id = layout.document_id(&record).to_string();

        let result = self.render_blocking(layout, record).await;
        let output = match result {
            Ok(output) => output,
            Err(e) => {
                DOCUMENT_RENDER_FAILURES.with_label_values(&[kind.as_str()]).inc();
                log::error!("Failed to render {} {}: {}", kind, id, e);
                return Err(e);
            }
        };

        let path = match self.storage.put(&id, &output.pdf).await {
            Ok(path) => path,
            Err(e) => {
                DOCUMENT_RENDER_FAILURES.with_label_values(&[kind.as_str()]).inc();
                log::error!("Failed to store {} {}: {}", kind, id, e);
                return Err(e.into());
            }
        };

        DOCUMENTS_RENDERED.with_label_values(&[kind.as_str()]).inc();
        if output.report.is_clean() {
            log::info!(
                "Generated {} {} ({} pages) at {}",
                kind,
                id,
                output.page_count,
                path.display()
            );
        } else {
            log::warn!(
                "Generated {} {} with {} issues at {}",
                kind,
                id,
                output.report.issues.len(),
                path.display()
            );
        }

        Ok(StoredDocument {
            id,
            filename: output.filename,
            path,
            size: output.pdf.len(),
            page_count: output.page_count,
            report: output.report,
        })
    }

    async fn render_blocking<L>(
        &self,
        layout: L,
        record: L::Record,
    ) -> Result<super::engine::RenderOutput, DocumentError>
    where
        L: DocumentLayout + Send + 'static,
        L::Record: Send + 'static,
    {
        let assets = self.assets.clone();
        let fixed_time = self.fixed_time;

        let joined = tokio::task::spawn_blocking(move || {
            let generated_at =
                fixed_time.unwrap_or_else(|| chrono::Local::now().naive_local());
            let ctx = RenderContext::new(generated_at, assets.load());
            PdfRenderEngine::render_to_vec(&layout, &record, &ctx)
        })
        .await;

        match joined {
            Ok(rendered) => rendered.map_err(|e: RenderError| e.into()),
            Err(e) => Err(DocumentError::Task(e.to_string())),
        }
    }
}

#[async_trait]
impl Generator<CertificateRecord> for DocumentGenerator {
    async fn generate(&self, record: &CertificateRecord) -> Result<StoredDocument, DocumentError> {
        self.render_and_store(CertificateLayout, record.clone()).await
    }
}

#[async_trait]
impl Generator<ServiceRecord> for DocumentGenerator {
    async fn generate(&self, record: &ServiceRecord) -> Result<StoredDocument, DocumentError> {
        self.render_and_store(ServiceLayout, record.clone()).await
    }
}
