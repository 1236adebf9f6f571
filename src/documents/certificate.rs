//! Calibration certificate layout.

use std::sync::Arc;

use super::canvas::{Canvas, PageDescription, PAGE_HEIGHT, PAGE_WIDTH};
use super::fields::{format_text, render_field_block, FieldBlockStyle, FieldFormat, FieldSpec, FieldValue};
use super::fonts::{wrap_text, Font};
use super::table::{Column, TableRow, TableSpec};
use super::traits::DocumentLayout;
use super::{DocumentKind, RenderContext, RenderReport};
use crate::certificate::model::{CertificateRecord, Observation};

pub const TITLE: &str = "CALIBRATION CERTIFICATE";

const MARGIN_X: f32 = 50.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;

const LOGO_NAME: &str = "logo";
const LOGO_X: f32 = MARGIN_X;
const LOGO_Y: f32 = 30.0;
const LOGO_MAX_WIDTH: f32 = 90.0;
const LOGO_MAX_HEIGHT: f32 = 55.0;

const TITLE_Y: f32 = 95.0;
const TITLE_SIZE: f32 = 18.0;

pub const FIELD_BLOCK_TOP: f32 = 135.0;
pub const FIELD_LINE_HEIGHT: f32 = 18.0;
/// Extra room for rows whose values are usually long (addresses, canister details).
pub const LONG_VALUE_SPACE: f32 = 18.0;

const FIELD_STYLE: FieldBlockStyle = FieldBlockStyle {
    label_x: MARGIN_X,
    value_x: 220.0,
    value_width: PAGE_WIDTH - MARGIN_X - 220.0,
    line_height: FIELD_LINE_HEIGHT,
    font_size: 10.0,
};

const TABLE_HEADING_GAP: f32 = 14.0;

const OBSERVATION_COLUMNS: [Column; 4] = [
    Column { title: "Sr. No", width: 50.0 },
    Column { title: "Concentration of Gas", width: 195.28 },
    Column { title: "Reading Before Calibration", width: 125.0 },
    Column { title: "Reading After Calibration", width: 125.0 },
];

pub const OBSERVATION_TABLE: TableSpec = TableSpec {
    name: "observations",
    columns: &OBSERVATION_COLUMNS,
    header_height: 32.0,
    row_height: 20.0,
    inset: 6.0,
    header_font_size: 9.0,
    body_font_size: 9.0,
    line_width: 0.75,
};

/// Where the certification statement sits when the table leaves room for it.
pub const STATEMENT_ANCHOR: f32 = 600.0;
const STATEMENT_GAP: f32 = 25.0;
const STATEMENT_SIZE: f32 = 10.0;
const STATEMENT_LINE_HEIGHT: f32 = 14.0;
pub const STATEMENT: &str = "This is to certify that the above instrument has been calibrated using \
certified calibration gases traceable to national standards, and that the readings recorded above \
were observed at the time of calibration. The results relate only to the instrument identified in \
this certificate and are valid on the date of calibration.";

const SIGNATURE_GAP: f32 = 45.0;
const SIGNATURE_BLOCK_HEIGHT: f32 = 40.0;
const SIGNATURE_LEFT_X: f32 = MARGIN_X;
const SIGNATURE_RIGHT_X: f32 = 380.0;
const SIGNATURE_LINE_WIDTH: f32 = 150.0;

const FOOTER_RULE_Y: f32 = PAGE_HEIGHT - 55.0;
const FOOTER_TEXT_Y: f32 = PAGE_HEIGHT - 45.0;
const FOOTER_SIZE: f32 = 8.0;
/// Content stops here to leave room for the footer.
pub const BOTTOM_LIMIT: f32 = PAGE_HEIGHT - 70.0;
const CONTINUATION_TOP: f32 = 50.0;

fn text(value: &Option<String>) -> FieldValue<'_> {
    FieldValue::Text(value.as_deref())
}

type Spec = FieldSpec<CertificateRecord>;

pub fn certificate_fields() -> Vec<Spec> {
    vec![
        Spec::new("certificateNo", "Certificate No", |r| {
            FieldValue::Text(Some(r.certificate_no.as_str()))
        })
        .required(),
        Spec::new("customerName", "Customer Name", |r| text(&r.customer_name)).required(),
        Spec::new("siteLocation", "Site Location", |r| text(&r.site_location))
            .extra_space(LONG_VALUE_SPACE),
        Spec::new("makeModel", "Make & Model", |r| text(&r.make_model)).required(),
        Spec::new("range", "Range", |r| text(&r.range)),
        Spec::new("serialNo", "Serial No", |r| text(&r.serial_no)).required(),
        Spec::new("calibrationGas", "Calibration Gas", |r| text(&r.calibration_gas)),
        Spec::new("gasCanisterDetails", "Gas Canister Details", |r| {
            text(&r.gas_canister_details)
        })
        .extra_space(LONG_VALUE_SPACE),
        Spec::new("dateOfCalibration", "Date of Calibration", |r| {
            text(&r.date_of_calibration)
        })
        .required()
        .format(FieldFormat::Date),
        Spec::new("calibrationDueDate", "Calibration Due Date", |r| {
            text(&r.calibration_due_date)
        })
        .required()
        .format(FieldFormat::Date),
        Spec::new("status", "Status", |r| text(&r.status)),
    ]
}

fn observation_row(index: usize, observation: &Observation) -> TableRow {
    vec![
        Ok((index + 1).to_string()),
        Ok(format_text(observation.gas.as_deref())),
        Ok(format_text(observation.before.as_deref())),
        Ok(format_text(observation.after.as_deref())),
    ]
}

/// Fixed layout of a calibration certificate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CertificateLayout;

impl CertificateLayout {
    fn draw_header(&self, canvas: &mut Canvas, ctx: &RenderContext) {
        if let Some(logo) = &ctx.assets.logo {
            let (width, height) = logo.fit_within(LOGO_MAX_WIDTH, LOGO_MAX_HEIGHT);
            canvas.register_image(LOGO_NAME, Arc::clone(logo));
            canvas.page().image(LOGO_NAME, LOGO_X, LOGO_Y, width, height);
        }
        canvas.page().centered_text(TITLE_Y, Font::Bold, TITLE_SIZE, TITLE);
    }

    fn draw_statement_and_signature(&self, canvas: &mut Canvas, record: &CertificateRecord) {
        let lines = wrap_text(STATEMENT, Font::Regular, STATEMENT_SIZE, CONTENT_WIDTH);
        let statement_height = lines.len() as f32 * STATEMENT_LINE_HEIGHT;

        let mut top = canvas.cursor() + STATEMENT_GAP;
        if canvas.page_index() == 0 {
            top = top.max(STATEMENT_ANCHOR);
        }
        canvas.set_cursor(top);
        if canvas.ensure_space(statement_height + SIGNATURE_GAP + SIGNATURE_BLOCK_HEIGHT) {
            top = canvas.cursor();
        }

        let page = canvas.page();
        for (i, line) in lines.into_iter().enumerate() {
            page.text(
                MARGIN_X,
                top + i as f32 * STATEMENT_LINE_HEIGHT,
                Font::Regular,
                STATEMENT_SIZE,
                line,
            );
        }

        let signature_y = top + statement_height + SIGNATURE_GAP;
        page.line(
            SIGNATURE_LEFT_X,
            signature_y,
            SIGNATURE_LEFT_X + SIGNATURE_LINE_WIDTH,
            signature_y,
            0.5,
        );
        page.text(SIGNATURE_LEFT_X, signature_y + 6.0, Font::Bold, 10.0, "Authorised Signatory");

        page.line(
            SIGNATURE_RIGHT_X,
            signature_y,
            SIGNATURE_RIGHT_X + SIGNATURE_LINE_WIDTH,
            signature_y,
            0.5,
        );
        page.text(SIGNATURE_RIGHT_X, signature_y + 6.0, Font::Bold, 10.0, "Calibrated By");
        page.text(
            SIGNATURE_RIGHT_X,
            signature_y + 20.0,
            Font::Regular,
            10.0,
            format_text(record.engineer_name.as_deref()),
        );

        canvas.set_cursor(signature_y + SIGNATURE_BLOCK_HEIGHT);
    }

    fn draw_footers(&self, description: &mut PageDescription, ctx: &RenderContext) {
        let total = description.pages.len();
        let generated = format!(
            "Generated on {}",
            ctx.generated_at.format("%d-%m-%Y %H:%M")
        );
        for (index, page) in description.pages.iter_mut().enumerate() {
            page.line(MARGIN_X, FOOTER_RULE_Y, PAGE_WIDTH - MARGIN_X, FOOTER_RULE_Y, 0.5);
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

impl DocumentLayout for CertificateLayout {
    type Record = CertificateRecord;

    fn kind(&self) -> DocumentKind {
        DocumentKind::Certificate
    }

    fn document_id<'a>(&self, record: &'a CertificateRecord) -> &'a str {
        &record.certificate_id
    }

    fn title(&self, record: &CertificateRecord) -> String {
        format!("Calibration Certificate {}", record.certificate_no)
    }

    fn layout(
        &self,
        record: &CertificateRecord,
        ctx: &RenderContext,
        report: &mut RenderReport,
    ) -> PageDescription {
        let mut canvas = Canvas::new(CONTINUATION_TOP, BOTTOM_LIMIT);

        self.draw_header(&mut canvas, ctx);

        canvas.set_cursor(FIELD_BLOCK_TOP);
        render_field_block(&mut canvas, &certificate_fields(), record, &FIELD_STYLE, report);

        canvas.advance(TABLE_HEADING_GAP);
        let rows = record
            .observations
            .iter()
            .enumerate()
            .map(|(i, observation)| observation_row(i, observation))
            .collect();
        OBSERVATION_TABLE.draw_with_heading(&mut canvas, MARGIN_X, "Observations", rows, report);

        self.draw_statement_and_signature(&mut canvas, record);

        let mut description = canvas.finish();
        self.draw_footers(&mut description, ctx);
        description
    }
}
