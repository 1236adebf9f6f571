//! Traits for the layout and generator system.

use async_trait::async_trait;

use super::canvas::PageDescription;
use super::generator::StoredDocument;
use super::{DocumentError, DocumentKind, RenderContext, RenderReport};

/// A fixed page layout for one record type.
pub trait DocumentLayout {
    type Record;

    fn kind(&self) -> DocumentKind;

    /// Id the rendered document is stored under.
    fn document_id<'a>(&self, record: &'a Self::Record) -> &'a str;

    /// Title written into the PDF metadata.
    fn title(&self, record: &Self::Record) -> String;

    /// Position the record's content. Problems with individual fields or rows are
    /// recorded in `report`; this never fails.
    fn layout(
        &self,
        record: &Self::Record,
        ctx: &RenderContext,
        report: &mut RenderReport,
    ) -> PageDescription;
}

/// Render a record and put the result in the document store.
#[async_trait]
pub trait Generator<R: Sync> {
    async fn generate(&self, record: &R) -> Result<StoredDocument, DocumentError>;
}
