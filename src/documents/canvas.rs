//! Page description and the layout cursor.
//!
//! Layout coordinates use a top-left origin in points; `y` grows down the page.
//! The PDF writer flips them into PDF space.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::assets::ImageAsset;
use super::fonts::Font;

/// A4 portrait, in points.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text whose box starts at (`x`, `y`); the baseline sits below `y`.
    Text {
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        text: String,
    },
    /// Stroked rectangle with its top-left corner at (`x`, `y`).
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        line_width: f32,
    },
    /// Image resource `name` drawn into the box at (`x`, `y`).
    Image {
        name: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn text(&mut self, x: f32, y: f32, font: Font, size: f32, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        self.ops.push(DrawOp::Text {
            x,
            y,
            font,
            size,
            text,
        });
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            line_width,
        });
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, line_width: f32) {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            line_width,
        });
    }

    pub fn image(&mut self, name: impl Into<String>, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::Image {
            name: name.into(),
            x,
            y,
            width,
            height,
        });
    }

    /// Text centered horizontally on the page.
    pub fn centered_text(&mut self, y: f32, font: Font, size: f32, text: &str) {
        let width = font.text_width(text, size);
        self.text((PAGE_WIDTH - width) / 2.0, y, font, size, text);
    }

    /// Text whose right edge ends at `right`.
    pub fn right_aligned_text(&mut self, right: f32, y: f32, font: Font, size: f32, text: &str) {
        let width = font.text_width(text, size);
        self.text(right - width, y, font, size, text);
    }

    /// First text op with exactly this content.
    pub fn find_text(&self, needle: &str) -> Option<&DrawOp> {
        self.ops
            .iter()
            .find(|op| matches!(op, DrawOp::Text { text, .. } if text == needle))
    }

    pub fn rects(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Rect { .. }))
    }
}

/// The complete, positioned content of a document.
#[derive(Debug, Clone, Default)]
pub struct PageDescription {
    pub pages: Vec<Page>,
    /// Image resources referenced by `DrawOp::Image`, keyed by name.
    pub images: BTreeMap<String, Arc<ImageAsset>>,
}

impl PageDescription {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Places content top to bottom, starting new pages when it runs out of room.
pub struct Canvas {
    pages: Vec<Page>,
    images: BTreeMap<String, Arc<ImageAsset>>,
    cursor: f32,
    top_margin: f32,
    bottom_limit: f32,
}

impl Canvas {
    /// `top_margin` is where content resumes on continuation pages; nothing is placed
    /// below `bottom_limit` by the flow helpers.
    pub fn new(top_margin: f32, bottom_limit: f32) -> Self {
        Self {
            pages: vec![Page::default()],
            images: BTreeMap::new(),
            cursor: top_margin,
            top_margin,
            bottom_limit,
        }
    }

    pub fn page(&mut self) -> &mut Page {
        // pages is never empty
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn set_cursor(&mut self, y: f32) {
        self.cursor = y;
    }

    pub fn advance(&mut self, dy: f32) {
        self.cursor += dy;
    }

    pub fn top_margin(&self) -> f32 {
        self.top_margin
    }

    pub fn bottom_limit(&self) -> f32 {
        self.bottom_limit
    }

    /// Whether a block of `height` fits below the cursor on the current page.
    pub fn fits(&self, height: f32) -> bool {
        self.cursor + height <= self.bottom_limit
    }

    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = self.top_margin;
    }

    /// Start a new page unless `height` fits. Returns true when a page was started.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.fits(height) {
            false
        } else {
            self.new_page();
            true
        }
    }

    pub fn register_image(&mut self, name: &str, asset: Arc<ImageAsset>) {
        self.images.insert(name.to_string(), asset);
    }

    pub fn finish(self) -> PageDescription {
        PageDescription {
            pages: self.pages,
            images: self.images,
        }
    }
}
