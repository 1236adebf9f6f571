//! Bordered tables with fixed column widths and fixed row heights.
//!
//! Row `i` of a table segment sits at `table_top + header_height + i * row_height`.
//! Cell text is never measured, so long values run past the cell border instead of
//! growing the row.

use super::canvas::{Canvas, Page};
use super::fonts::{wrap_text, Font};
use super::{FieldError, RenderReport};

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    pub width: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    /// Used in render reports, e.g. `observations`.
    pub name: &'static str,
    pub columns: &'static [Column],
    pub header_height: f32,
    pub row_height: f32,
    /// Offset of cell text from the cell's top-left corner.
    pub inset: f32,
    pub header_font_size: f32,
    pub body_font_size: f32,
    pub line_width: f32,
}

/// Distance from a table heading to the table header.
const HEADING_LEAD: f32 = 22.0;
const HEADING_SIZE: f32 = 11.0;

/// Cells of one row; an `Err` cell is drawn empty.
pub type TableRow = Vec<Result<String, FieldError>>;

/// Where a run of rows landed on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSegment {
    pub page_index: usize,
    pub table_top: f32,
    pub first_row: usize,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TablePlacement {
    pub segments: Vec<TableSegment>,
    /// Bottom edge of the last drawn row (or header).
    pub bottom: f32,
}

impl TableSpec {
    pub fn width(&self) -> f32 {
        self.columns.iter().map(|c| c.width).sum()
    }

    /// Left edge of column `index` for a table starting at `left`.
    pub fn column_x(&self, left: f32, index: usize) -> f32 {
        left + self.columns[..index].iter().map(|c| c.width).sum::<f32>()
    }

    /// Top edge of row `index` within a segment starting at `table_top`.
    pub fn row_top(&self, table_top: f32, index: usize) -> f32 {
        table_top + self.header_height + index as f32 * self.row_height
    }

    /// Height of the header plus the first row, which never split across pages.
    pub fn opening_height(&self, row_count: usize) -> f32 {
        if row_count == 0 {
            self.header_height
        } else {
            self.header_height + self.row_height
        }
    }

    fn draw_header(&self, page: &mut Page, left: f32, top: f32) {
        let line_height = self.header_font_size + 2.0;
        for (i, column) in self.columns.iter().enumerate() {
            let x = self.column_x(left, i);
            page.rect(x, top, column.width, self.header_height, self.line_width);

            let lines = wrap_text(
                column.title,
                Font::Bold,
                self.header_font_size,
                column.width - 2.0 * self.inset,
            );
            for (n, line) in lines.into_iter().enumerate() {
                page.text(
                    x + self.inset,
                    top + self.inset + n as f32 * line_height,
                    Font::Bold,
                    self.header_font_size,
                    line,
                );
            }
        }
    }

    fn draw_row(&self, page: &mut Page, left: f32, top: f32, cells: &[String]) {
        for (i, column) in self.columns.iter().enumerate() {
            let x = self.column_x(left, i);
            page.rect(x, top, column.width, self.row_height, self.line_width);
            if let Some(text) = cells.get(i) {
                page.text(
                    x + self.inset,
                    top + self.inset,
                    Font::Regular,
                    self.body_font_size,
                    text.as_str(),
                );
            }
        }
    }

    /// Draw the header and `rows` at the canvas cursor, continuing on new pages with a
    /// repeated header when a row would cross the canvas bottom limit.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        left: f32,
        rows: Vec<TableRow>,
        report: &mut RenderReport,
    ) -> TablePlacement {
        canvas.ensure_space(self.opening_height(rows.len()));

        let mut segment = TableSegment {
            page_index: canvas.page_index(),
            table_top: canvas.cursor(),
            first_row: 0,
            row_count: 0,
        };
        let mut segments = Vec::new();
        self.draw_header(canvas.page(), left, segment.table_top);

        for (row_index, row) in rows.into_iter().enumerate() {
            let mut top = self.row_top(segment.table_top, segment.row_count);
            if top + self.row_height > canvas.bottom_limit() {
                segments.push(segment);
                canvas.new_page();
                segment = TableSegment {
                    page_index: canvas.page_index(),
                    table_top: canvas.cursor(),
                    first_row: row_index,
                    row_count: 0,
                };
                self.draw_header(canvas.page(), left, segment.table_top);
                top = self.row_top(segment.table_top, 0);
            }

            let cells: Vec<String> = row
                .into_iter()
                .enumerate()
                .map(|(col, cell)| {
                    cell.unwrap_or_else(|e| {
                        let title = self.columns.get(col).map(|c| c.title).unwrap_or("?");
                        report.record_issue(
                            format!("{} row {} / {}", self.name, row_index + 1, title),
                            &e,
                        );
                        String::new()
                    })
                })
                .collect();
            self.draw_row(canvas.page(), left, top, &cells);
            segment.row_count += 1;
        }

        let bottom = self.row_top(segment.table_top, segment.row_count);
        segments.push(segment);
        canvas.set_cursor(bottom);

        TablePlacement { segments, bottom }
    }

    /// Draw a bold `heading` and then the table. The heading only goes on a page that
    /// also has room for the header and first row.
    pub fn draw_with_heading(
        &self,
        canvas: &mut Canvas,
        left: f32,
        heading: &str,
        rows: Vec<TableRow>,
        report: &mut RenderReport,
    ) -> TablePlacement {
        canvas.ensure_space(HEADING_LEAD + self.opening_height(rows.len()));
        let heading_y = canvas.cursor();
        canvas.page().text(left, heading_y, Font::Bold, HEADING_SIZE, heading);
        canvas.advance(HEADING_LEAD);
        self.draw(canvas, left, rows, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::canvas::DrawOp;

    const COLUMNS: [Column; 3] = [
        Column { title: "A", width: 50.0 },
        Column { title: "B", width: 100.0 },
        Column { title: "C", width: 25.0 },
    ];

    fn spec() -> TableSpec {
        TableSpec {
            name: "test",
            columns: &COLUMNS,
            header_height: 20.0,
            row_height: 15.0,
            inset: 4.0,
            header_font_size: 9.0,
            body_font_size: 9.0,
            line_width: 0.5,
        }
    }

    fn row(values: &[&str]) -> TableRow {
        values.iter().map(|v| Ok(v.to_string())).collect()
    }

    #[test]
    fn test_column_boundaries_are_cumulative() {
        let spec = spec();
        assert_eq!(spec.column_x(10.0, 0), 10.0);
        assert_eq!(spec.column_x(10.0, 1), 60.0);
        assert_eq!(spec.column_x(10.0, 2), 160.0);
        assert_eq!(spec.width(), 175.0);
    }

    #[test]
    fn test_heading_moves_with_first_row() {
        let mut canvas = Canvas::new(50.0, 200.0);
        canvas.set_cursor(150.0);
        let mut report = RenderReport::new();
        let placement = spec().draw_with_heading(
            &mut canvas,
            10.0,
            "Readings",
            vec![row(&["1", "2", "3"]), row(&["4", "5", "6"])],
            &mut report,
        );

        assert_eq!(placement.segments[0].page_index, 1);
        assert_eq!(placement.segments[0].table_top, 50.0 + HEADING_LEAD);
        let description = canvas.finish();
        assert!(description.pages[0].find_text("Readings").is_none());
        match description.pages[1].find_text("Readings") {
            Some(DrawOp::Text { y, .. }) => assert_eq!(*y, 50.0),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_heading_stays_when_opening_fits() {
        let mut canvas = Canvas::new(50.0, 200.0);
        canvas.set_cursor(100.0);
        let mut report = RenderReport::new();
        let placement =
            spec().draw_with_heading(&mut canvas, 10.0, "Readings", vec![], &mut report);

        assert_eq!(placement.segments[0].page_index, 0);
        assert_eq!(placement.bottom, 100.0 + HEADING_LEAD + 20.0);
    }

    #[test]
    fn test_every_cell_has_its_own_border() {
        let mut canvas = Canvas::new(0.0, 1000.0);
        let mut report = RenderReport::new();
        spec().draw(&mut canvas, 0.0, vec![row(&["1", "2", "3"]), row(&["4", "5", "6"])], &mut report);

        let page = &canvas.finish().pages[0];
        assert_eq!(page.rects().count(), 3 * 3);
    }

    #[test]
    fn test_cell_text_is_inset() {
        let mut canvas = Canvas::new(100.0, 1000.0);
        let mut report = RenderReport::new();
        spec().draw(&mut canvas, 10.0, vec![row(&["x", "y", "z"])], &mut report);

        let description = canvas.finish();
        match description.pages[0].find_text("y") {
            Some(DrawOp::Text { x, y, .. }) => {
                assert_eq!(*x, 60.0 + 4.0);
                assert_eq!(*y, 100.0 + 20.0 + 4.0);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_failed_cell_is_blank_and_reported() {
        let mut canvas = Canvas::new(0.0, 1000.0);
        let mut report = RenderReport::new();
        let bad_row = vec![
            Ok("1".to_string()),
            Err(FieldError::InvalidAmount("abc".to_string())),
            Ok("3".to_string()),
        ];
        spec().draw(&mut canvas, 0.0, vec![bad_row], &mut report);

        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].location, "test row 1 / B");
        let page = &canvas.finish().pages[0];
        assert!(page.find_text("1").is_some());
        assert!(page.find_text("3").is_some());
        assert!(page.find_text("abc").is_none());
    }

    #[test]
    fn test_overflowing_rows_continue_on_new_page() {
        // Room for the header plus 4 rows on the first page.
        let mut canvas = Canvas::new(0.0, 80.0);
        let mut report = RenderReport::new();
        let rows = (0..6).map(|i| row(&[&i.to_string(), "", ""])).collect();

        let placement = spec().draw(&mut canvas, 0.0, rows, &mut report);

        assert_eq!(placement.segments.len(), 2);
        assert_eq!(placement.segments[0].row_count, 4);
        assert_eq!(placement.segments[1].first_row, 4);
        assert_eq!(placement.segments[1].row_count, 2);
        assert_eq!(placement.segments[1].page_index, 1);
        assert_eq!(placement.bottom, 20.0 + 2.0 * 15.0);
    }
}
