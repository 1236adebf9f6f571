//! Label/value field blocks.
//!
//! A layout declares its fields as a table of `FieldSpec`s; `render_field_block` is the
//! only code that turns them into drawing operations. Row positions depend on the
//! schema alone, never on the values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::canvas::Canvas;
use super::fonts::{wrap_text, Font};
use super::{FieldError, RenderReport};

/// Shown for absent or empty values.
pub const PLACEHOLDER: &str = "N/A";
/// Shown for a date value that is present but cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Raw value pulled out of a record.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    List(&'a [String]),
}

/// How a value is turned into display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Text,
    /// `dd-mm-yyyy`.
    Date,
    /// Items joined with `, `.
    List,
}

/// One row of a field block.
pub struct FieldSpec<R> {
    /// Record field name, used in render reports.
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub value: fn(&R) -> FieldValue<'_>,
    pub format: FieldFormat,
    /// Extra vertical space reserved below the row for a long value.
    pub extra_space: f32,
}

impl<R> FieldSpec<R> {
    /// An optional plain-text row.
    pub fn new(name: &'static str, label: &'static str, value: fn(&R) -> FieldValue<'_>) -> Self {
        Self {
            name,
            label,
            required: false,
            value,
            format: FieldFormat::Text,
            extra_space: 0.0,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn format(mut self, format: FieldFormat) -> Self {
        self.format = format;
        self
    }

    pub fn extra_space(mut self, extra_space: f32) -> Self {
        self.extra_space = extra_space;
        self
    }
}

/// Geometry of a field block.
#[derive(Debug, Clone, Copy)]
pub struct FieldBlockStyle {
    pub label_x: f32,
    pub value_x: f32,
    pub value_width: f32,
    pub line_height: f32,
    pub font_size: f32,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Format a date as `dd-mm-yyyy`.
///
/// Accepts RFC 3339 timestamps, ISO dates with or without a time part, and
/// already-formatted `dd-mm-yyyy` / `dd/mm/yyyy` dates.
pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = non_empty(value) else {
        return PLACEHOLDER.to_string();
    };
    match parse_date(raw) {
        Some(date) => date.format("%d-%m-%Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Text value with the placeholder fallback.
pub fn format_text(value: Option<&str>) -> String {
    non_empty(value).unwrap_or(PLACEHOLDER).to_string()
}

/// Indian rupee amount as printed on service reports, e.g. `Rs 1500 /-`.
pub fn format_rate(value: Option<&str>) -> Result<String, FieldError> {
    match non_empty(value) {
        None => Ok(PLACEHOLDER.to_string()),
        Some(raw) => {
            validate_number(raw)?;
            Ok(format!("Rs {} /-", raw))
        }
    }
}

/// A quantity; must be numeric when present.
pub fn format_quantity(value: Option<&str>) -> Result<String, FieldError> {
    match non_empty(value) {
        None => Ok(PLACEHOLDER.to_string()),
        Some(raw) => {
            validate_number(raw)?;
            Ok(raw.to_string())
        }
    }
}

fn validate_number(raw: &str) -> Result<(), FieldError> {
    match raw.replace(',', "").parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(()),
        _ => Err(FieldError::InvalidAmount(raw.to_string())),
    }
}

/// Apply `format` to a raw value.
pub fn format_field(
    name: &'static str,
    value: FieldValue<'_>,
    format: FieldFormat,
) -> Result<String, FieldError> {
    match (value, format) {
        (FieldValue::Text(v), FieldFormat::Text) | (FieldValue::Text(v), FieldFormat::List) => {
            Ok(format_text(v))
        }
        (FieldValue::Text(v), FieldFormat::Date) => Ok(format_date(v)),
        (FieldValue::List(items), FieldFormat::List) | (FieldValue::List(items), FieldFormat::Text) => {
            let joined = items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            Ok(format_text(Some(&joined)))
        }
        (FieldValue::List(_), FieldFormat::Date) => Err(FieldError::UnsupportedFormat(name, "date")),
    }
}

fn is_missing(value: FieldValue<'_>) -> bool {
    match value {
        FieldValue::Text(v) => non_empty(v).is_none(),
        FieldValue::List(items) => items.iter().all(|item| item.trim().is_empty()),
    }
}

/// Draw `specs` for `record` starting at the canvas cursor.
///
/// Each row takes `line_height + extra_space`. A value in a row with extra space wraps
/// into the reserved lines; anything beyond them is cut off. A value that fails to
/// format leaves the value slot empty and is recorded in `report`.
pub fn render_field_block<R>(
    canvas: &mut Canvas,
    specs: &[FieldSpec<R>],
    record: &R,
    style: &FieldBlockStyle,
    report: &mut RenderReport,
) {
    for spec in specs {
        let row_height = style.line_height + spec.extra_space;
        canvas.ensure_space(row_height);
        let y = canvas.cursor();

        let raw = (spec.value)(record);
        if spec.required && is_missing(raw) {
            report.record_missing(spec.name);
        }

        let page = canvas.page();
        page.text(style.label_x, y, Font::Bold, style.font_size, spec.label);
        page.text(style.value_x - 10.0, y, Font::Bold, style.font_size, ":");

        match format_field(spec.name, raw, spec.format) {
            Ok(text) => {
                let max_lines = 1 + (spec.extra_space / style.line_height).floor() as usize;
                let lines = if max_lines > 1 {
                    wrap_text(&text, Font::Regular, style.font_size, style.value_width)
                } else {
                    vec![text]
                };
                for (i, line) in lines.into_iter().take(max_lines).enumerate() {
                    let line_y = y + i as f32 * style.line_height;
                    page.text(style.value_x, line_y, Font::Regular, style.font_size, line);
                }
            }
            Err(e) => report.record_issue(spec.name, &e),
        }

        canvas.advance(row_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_variants() {
        assert_eq!(format_date(Some("2024-03-15")), "15-03-2024");
        assert_eq!(format_date(Some("2024-03-15T10:30:00.000Z")), "15-03-2024");
        assert_eq!(format_date(Some("2024-03-15T10:30:00")), "15-03-2024");
        assert_eq!(format_date(Some("15/03/2024")), "15-03-2024");
        assert_eq!(format_date(Some("15-03-2024")), "15-03-2024");
    }

    #[test]
    fn test_format_date_distinguishes_missing_from_invalid() {
        assert_eq!(format_date(None), PLACEHOLDER);
        assert_eq!(format_date(Some("  ")), PLACEHOLDER);
        assert_eq!(format_date(Some("next tuesday")), INVALID_DATE);
        assert_eq!(format_date(Some("2024-02-30")), INVALID_DATE);
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Some("1500")).unwrap(), "Rs 1500 /-");
        assert_eq!(format_rate(Some("1,250.50")).unwrap(), "Rs 1,250.50 /-");
        assert_eq!(format_rate(None).unwrap(), PLACEHOLDER);
        assert_eq!(
            format_rate(Some("free")),
            Err(FieldError::InvalidAmount("free".to_string()))
        );
    }

    #[test]
    fn test_format_list_skips_blank_items() {
        let items = vec!["Alpha".to_string(), " ".to_string(), "Beta".to_string()];
        assert_eq!(
            format_field("x", FieldValue::List(&items), FieldFormat::List).unwrap(),
            "Alpha, Beta"
        );
        assert_eq!(
            format_field("x", FieldValue::List(&[]), FieldFormat::List).unwrap(),
            PLACEHOLDER
        );
    }

    #[test]
    fn test_list_cannot_be_a_date() {
        assert!(format_field("x", FieldValue::List(&[]), FieldFormat::Date).is_err());
    }
}
