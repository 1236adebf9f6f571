//! Documents module - fixed-layout PDF rendering for certificates and service reports.
//!
//! Rendering is split in two stages. A layout (`certificate`, `service`) turns a record
//! into a `PageDescription` of positioned text, rectangles and images; the `pdf` writer
//! then serializes that description. Everything between the record and the description
//! is a pure function of the record and the `RenderContext`.
//!
//! - `canvas` - pages, drawing operations and the vertical cursor
//! - `fonts` - base-14 font metrics and text encoding
//! - `fields` - the label/value field schema and its formatters
//! - `table` - bordered tables with fixed row heights
//! - `assets` - optional logo and banner images
//! - `engine` - layout + PDF serialization into a byte sink
//! - `storage` - the rendered document store
//! - `generator` - render-and-store entry points used by the HTTP layer

pub mod assets;
pub mod canvas;
pub mod certificate;
pub mod engine;
pub mod fields;
pub mod fonts;
pub mod generator;
pub mod pdf;
pub mod service;
pub mod storage;
pub mod table;
pub mod traits;


pub use assets::{AssetSource, DocumentAssets, ImageAsset};
pub use canvas::{Canvas, DrawOp, Page, PageDescription};
pub use certificate::CertificateLayout;
pub use engine::{PdfRenderEngine, RenderOutput};
pub use generator::{DocumentGenerator, StoredDocument};
pub use service::ServiceLayout;
pub use storage::{DocumentStorage, LocalDocumentStorage, StorageError};
pub use traits::{DocumentLayout, Generator};

use chrono::NaiveDateTime;
use std::fmt;
use thiserror::Error;

/// Fatal rendering errors. Field and row problems never surface here.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write PDF to output sink: {0}")]
    Sink(#[source] std::io::Error),
    #[error("failed to serialize PDF: {0}")]
    Pdf(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(e: lopdf::Error) -> Self {
        RenderError::Pdf(e.to_string())
    }
}

/// A single field or table cell that could not be formatted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("'{0}' is not a number")]
    InvalidAmount(String),
    #[error("field '{0}' cannot be formatted as {1}")]
    UnsupportedFormat(&'static str, &'static str),
}

/// Errors from the render-and-store operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("could not generate document: {0}")]
    Render(#[from] RenderError),
    #[error("could not generate document: {0}")]
    Storage(#[from] StorageError),
    #[error("could not generate document: render task failed: {0}")]
    Task(String),
}

/// Kind of rendered document, used in file names, logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Certificate,
    Service,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Certificate => "certificate",
            DocumentKind::Service => "service",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem absorbed while rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderIssue {
    /// Field name or table cell, e.g. `range` or `remarks row 2 / Rate`.
    pub location: String,
    pub message: String,
}

/// Everything that was degraded during a render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub issues: Vec<RenderIssue>,
    /// Required fields that were rendered with the placeholder.
    pub missing_required: Vec<String>,
}

impl RenderReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_issue(&mut self, location: impl Into<String>, error: &FieldError) {
        let issue = RenderIssue {
            location: location.into(),
            message: error.to_string(),
        };
        log::warn!("Render issue at {}: {}", issue.location, issue.message);
        self.issues.push(issue);
    }

    pub fn record_missing(&mut self, field: &str) {
        log::debug!("Required field '{}' is empty, using placeholder", field);
        self.missing_required.push(field.to_string());
    }

    /// True when nothing was left blank because of an error.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Inputs to a render besides the record itself.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Printed in the generation footer.
    pub generated_at: NaiveDateTime,
    pub assets: DocumentAssets,
}

impl RenderContext {
    pub fn new(generated_at: NaiveDateTime, assets: DocumentAssets) -> Self {
        Self {
            generated_at,
            assets,
        }
    }

    /// Context stamped with the current local time and no images.
    pub fn now() -> Self {
        Self::new(chrono::Local::now().naive_local(), DocumentAssets::none())
    }
}
