//! Field service report layout.

use std::sync::Arc;

use super::canvas::{Canvas, PageDescription, PAGE_HEIGHT, PAGE_WIDTH};
use super::fields::{
    format_quantity, format_rate, format_text, render_field_block, FieldBlockStyle, FieldFormat,
    FieldSpec, FieldValue,
};
use super::fonts::Font;
use super::table::{Column, TableRow, TableSpec};
use super::traits::DocumentLayout;
use super::{DocumentKind, RenderContext, RenderReport};
use crate::service_report::model::{EngineerRemark, ServiceRecord};

pub const TITLE: &str = "SERVICE REPORT";

const MARGIN_X: f32 = 40.0;

const HEADER_BANNER_NAME: &str = "header";
const FOOTER_BANNER_NAME: &str = "footer";
const HEADER_BANNER_MAX_HEIGHT: f32 = 80.0;
const FOOTER_BANNER_MAX_HEIGHT: f32 = 50.0;

const TITLE_Y: f32 = 95.0;
const TITLE_SIZE: f32 = 16.0;

pub const FIELD_BLOCK_TOP: f32 = 130.0;
pub const FIELD_LINE_HEIGHT: f32 = 17.0;
pub const LONG_VALUE_SPACE: f32 = 17.0;

const FIELD_STYLE: FieldBlockStyle = FieldBlockStyle {
    label_x: MARGIN_X,
    value_x: 200.0,
    value_width: PAGE_WIDTH - MARGIN_X - 200.0,
    line_height: FIELD_LINE_HEIGHT,
    font_size: 9.5,
};

const TABLE_HEADING_GAP: f32 = 14.0;

const REMARK_COLUMNS: [Column; 6] = [
    Column { title: "Sr. No", width: 40.0 },
    Column { title: "Service / Spares", width: 170.0 },
    Column { title: "Part No", width: 85.0 },
    Column { title: "Rate", width: 85.0 },
    Column { title: "Quantity", width: 55.0 },
    Column { title: "PO No", width: 80.28 },
];

pub const REMARKS_TABLE: TableSpec = TableSpec {
    name: "engineerRemarks",
    columns: &REMARK_COLUMNS,
    header_height: 26.0,
    row_height: 20.0,
    inset: 5.0,
    header_font_size: 9.0,
    body_font_size: 9.0,
    line_width: 0.75,
};

const SIGNATURE_GAP: f32 = 50.0;
const SIGNATURE_BLOCK_HEIGHT: f32 = 40.0;
const SIGNATURE_LEFT_X: f32 = MARGIN_X;
const SIGNATURE_RIGHT_X: f32 = 385.0;
const SIGNATURE_LINE_WIDTH: f32 = 150.0;

const FOOTER_TEXT_Y: f32 = PAGE_HEIGHT - FOOTER_BANNER_MAX_HEIGHT - 22.0;
const FOOTER_SIZE: f32 = 8.0;
/// Content stops here to leave room for the footer banner.
pub const BOTTOM_LIMIT: f32 = PAGE_HEIGHT - FOOTER_BANNER_MAX_HEIGHT - 40.0;
/// Content restarts below the header banner on continuation pages.
const CONTINUATION_TOP: f32 = HEADER_BANNER_MAX_HEIGHT + 20.0;

fn text(value: &Option<String>) -> FieldValue<'_> {
    FieldValue::Text(value.as_deref())
}

type Spec = FieldSpec<ServiceRecord>;

pub fn service_fields() -> Vec<Spec> {
    vec![
        Spec::new("reportNo", "Report No", |r| text(&r.report_no)).required(),
        Spec::new("date", "Date", |r| text(&r.date))
            .required()
            .format(FieldFormat::Date),
        Spec::new("natureOfJob", "Nature of Job", |r| text(&r.nature_of_job)).required(),
        Spec::new("place", "Place", |r| text(&r.place)),
        Spec::new("placeOptions", "Place Options", |r| text(&r.place_options)),
        Spec::new("customerName", "Customer Name", |r| text(&r.customer_name)).required(),
        Spec::new("customerLocation", "Customer Location", |r| {
            text(&r.customer_location)
        })
        .extra_space(LONG_VALUE_SPACE),
        Spec::new("contactPerson", "Contact Person", |r| text(&r.contact_person)),
        Spec::new("contactNumber", "Contact Number", |r| text(&r.contact_number)),
        Spec::new("serviceEngineer", "Service Engineer", |r| text(&r.service_engineer)),
        Spec::new("engineerEmail", "Engineer Email", |r| text(&r.engineer_email)),
        Spec::new("makeModelNumbers", "Make & Model Numbers", |r| {
            FieldValue::List(&r.make_model_numbers)
        })
        .format(FieldFormat::List)
        .extra_space(LONG_VALUE_SPACE),
        Spec::new("serialNumbers", "Serial Numbers", |r| {
            FieldValue::List(&r.serial_numbers)
        })
        .format(FieldFormat::List)
        .extra_space(LONG_VALUE_SPACE),
    ]
}

fn remark_row(index: usize, remark: &EngineerRemark) -> TableRow {
    vec![
        Ok((index + 1).to_string()),
        Ok(format_text(remark.service_spares.as_deref())),
        Ok(format_text(remark.part_no.as_deref())),
        format_rate(remark.rate.as_deref()),
        format_quantity(remark.quantity.as_deref()),
        Ok(format_text(remark.po_no.as_deref())),
    ]
}

/// Fixed layout of a field service report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceLayout;

impl ServiceLayout {
    fn draw_signature(&self, canvas: &mut Canvas, record: &ServiceRecord) {
        canvas.advance(SIGNATURE_GAP);
        canvas.ensure_space(SIGNATURE_BLOCK_HEIGHT);
        let y = canvas.cursor();

        let engineer = record
            .engineer_name
            .as_deref()
            .or(record.service_engineer.as_deref());

        let page = canvas.page();
        page.line(SIGNATURE_LEFT_X, y, SIGNATURE_LEFT_X + SIGNATURE_LINE_WIDTH, y, 0.5);
        page.text(SIGNATURE_LEFT_X, y + 6.0, Font::Bold, 10.0, "Service Engineer");
        page.text(SIGNATURE_LEFT_X, y + 20.0, Font::Regular, 10.0, format_text(engineer));

        page.line(SIGNATURE_RIGHT_X, y, SIGNATURE_RIGHT_X + SIGNATURE_LINE_WIDTH, y, 0.5);
        page.text(SIGNATURE_RIGHT_X, y + 6.0, Font::Bold, 10.0, "Customer Signature");

        canvas.advance(SIGNATURE_BLOCK_HEIGHT);
    }

    /// Banners, generation stamp and page numbers on every page.
    fn decorate_pages(&self, description: &mut PageDescription, ctx: &RenderContext) {
        let header = ctx.assets.header_banner.as_ref().map(|banner| {
            let size = banner.fit_within(PAGE_WIDTH, HEADER_BANNER_MAX_HEIGHT);
            description
                .images
                .insert(HEADER_BANNER_NAME.to_string(), Arc::clone(banner));
            size
        });
        let footer = ctx.assets.footer_banner.as_ref().map(|banner| {
            let size = banner.fit_within(PAGE_WIDTH, FOOTER_BANNER_MAX_HEIGHT);
            description
                .images
                .insert(FOOTER_BANNER_NAME.to_string(), Arc::clone(banner));
            size
        });

        let total = description.pages.len();
        let generated = format!(
            "Generated on {}",
            ctx.generated_at.format("%d-%m-%Y %H:%M")
        );
        for (index, page) in description.pages.iter_mut().enumerate() {
            if let Some((width, height)) = header {
                let x = (PAGE_WIDTH - width) / 2.0;
                page.image(HEADER_BANNER_NAME, x, 0.0, width, height);
            }
            if let Some((width, height)) = footer {
                let x = (PAGE_WIDTH - width) / 2.0;
                page.image(FOOTER_BANNER_NAME, x, PAGE_HEIGHT - height, width, height);
            }
            if index + 1 == total {
                page.text(MARGIN_X, FOOTER_TEXT_Y, Font::Italic, FOOTER_SIZE, generated.as_str());
            }
            page.right_aligned_text(
                PAGE_WIDTH - MARGIN_X,
                FOOTER_TEXT_Y,
                Font::Regular,
                FOOTER_SIZE,
                &format!("Page {} of {}", index + 1, total),
            );
        }
    }
}

impl DocumentLayout for ServiceLayout {
    type Record = ServiceRecord;

    fn kind(&self) -> DocumentKind {
        DocumentKind::Service
    }

    fn document_id<'a>(&self, record: &'a ServiceRecord) -> &'a str {
        &record.service_id
    }

    fn title(&self, record: &ServiceRecord) -> String {
        match record.report_no.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(report_no) => format!("Service Report {}", report_no),
            None => "Service Report".to_string(),
        }
    }

    fn layout(
        &self,
        record: &ServiceRecord,
        ctx: &RenderContext,
        report: &mut RenderReport,
    ) -> PageDescription {
        let mut canvas = Canvas::new(CONTINUATION_TOP, BOTTOM_LIMIT);

        canvas.page().centered_text(TITLE_Y, Font::Bold, TITLE_SIZE, TITLE);

        canvas.set_cursor(FIELD_BLOCK_TOP);
        render_field_block(&mut canvas, &service_fields(), record, &FIELD_STYLE, report);

        canvas.advance(TABLE_HEADING_GAP);
        let rows = record
            .engineer_remarks
            .iter()
            .enumerate()
            .map(|(i, remark)| remark_row(i, remark))
            .collect();
        REMARKS_TABLE.draw_with_heading(&mut canvas, MARGIN_X, "Engineer Remarks", rows, report);

        self.draw_signature(&mut canvas, record);

        let mut description = canvas.finish();
        self.decorate_pages(&mut description, ctx);
        description
    }
}
