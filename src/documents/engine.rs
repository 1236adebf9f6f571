//! PDF rendering engine.
//!
//! Runs a layout over a record and serializes the positioned pages. The engine holds no
//! state; the same record and context always produce the same bytes.

use std::io::Write;

use super::canvas::PageDescription;
use super::pdf::write_pdf;
use super::traits::DocumentLayout;
use super::{RenderContext, RenderError, RenderReport};

/// Result of rendering into memory.
#[derive(Debug)]
pub struct RenderOutput {
    pub filename: String,
    pub pdf: Vec<u8>,
    pub page_count: usize,
    pub report: RenderReport,
}

/// Stateless engine for rendering records to PDF.
pub struct PdfRenderEngine;

impl PdfRenderEngine {
    /// Position a record's content without serializing it.
    pub fn layout<L: DocumentLayout>(
        layout: &L,
        record: &L::Record,
        ctx: &RenderContext,
    ) -> (PageDescription, RenderReport) {
        let mut report = RenderReport::new();
        let description = layout.layout(record, ctx, &mut report);
        (description, report)
    }

    /// Render a record into `sink`.
    ///
    /// Field and row problems are absorbed into the returned report. Only a failure to
    /// serialize or to write the sink is an error.
    pub fn render<L: DocumentLayout, W: Write>(
        layout: &L,
        record: &L::Record,
        ctx: &RenderContext,
        sink: &mut W,
    ) -> Result<RenderReport, RenderError> {
        let output = Self::render_to_vec(layout, record, ctx)?;
        sink.write_all(&output.pdf).map_err(RenderError::Sink)?;
        sink.flush().map_err(RenderError::Sink)?;
        Ok(output.report)
    }

    /// Render a record into an in-memory PDF.
    pub fn render_to_vec<L: DocumentLayout>(
        layout: &L,
        record: &L::Record,
        ctx: &RenderContext,
    ) -> Result<RenderOutput, RenderError> {
        let (description, report) = Self::layout(layout, record, ctx);
        let title = layout.title(record);
        let pdf = write_pdf(&description, &title)?;

        let id = layout.document_id(record);
        log::debug!(
            "Rendered {} {} ({} pages, {} bytes, {} issues)",
            layout.kind(),
            id,
            description.page_count(),
            pdf.len(),
            report.issues.len()
        );

        Ok(RenderOutput {
            filename: document_filename(id),
            pdf,
            page_count: description.page_count(),
            report,
        })
    }
}

/// File name a rendered document is stored and served under.
pub fn document_filename(id: &str) -> String {
    format!("{}.pdf", id)
}
