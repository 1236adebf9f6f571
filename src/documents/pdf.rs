//! Serializes a `PageDescription` into PDF bytes using `lopdf`.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::io::Write;

use super::canvas::{DrawOp, Page, PageDescription, PAGE_HEIGHT, PAGE_WIDTH};
use super::fonts::{encode_win_ansi, Font};
use super::RenderError;

/// Distance from the top of a text box to its baseline, as a fraction of the font size.
const BASELINE_RATIO: f32 = 0.8;

fn deflate(data: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| RenderError::Pdf(format!("compression failed: {e}")))?;
    encoder
        .finish()
        .map_err(|e| RenderError::Pdf(format!("compression failed: {e}")))
}

fn image_resource_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

/// Content stream operations for one page.
fn page_operations(page: &Page, image_names: &[(String, String)]) -> Vec<Operation> {
    let mut ops = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                font,
                size,
                text,
            } => {
                let baseline = PAGE_HEIGHT - (y + size * BASELINE_RATIO);
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![
                        Object::Name(font.resource_name().as_bytes().to_vec()),
                        (*size).into(),
                    ],
                ));
                ops.push(Operation::new("Td", vec![(*x).into(), baseline.into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_win_ansi(text))],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                line_width,
            } => {
                let pdf_y = PAGE_HEIGHT - (y + height);
                ops.push(Operation::new("w", vec![(*line_width).into()]));
                ops.push(Operation::new(
                    "re",
                    vec![(*x).into(), pdf_y.into(), (*width).into(), (*height).into()],
                ));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                line_width,
            } => {
                ops.push(Operation::new("w", vec![(*line_width).into()]));
                ops.push(Operation::new("m", vec![(*x1).into(), (PAGE_HEIGHT - y1).into()]));
                ops.push(Operation::new("l", vec![(*x2).into(), (PAGE_HEIGHT - y2).into()]));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Image {
                name,
                x,
                y,
                width,
                height,
            } => {
                let Some((_, resource)) = image_names.iter().find(|(n, _)| n == name) else {
                    log::warn!("Image '{}' has no registered resource, skipping", name);
                    continue;
                };
                let pdf_y = PAGE_HEIGHT - (y + height);
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        (*width).into(),
                        0.into(),
                        0.into(),
                        (*height).into(),
                        (*x).into(),
                        pdf_y.into(),
                    ],
                ));
                ops.push(Operation::new(
                    "Do",
                    vec![Object::Name(resource.as_bytes().to_vec())],
                ));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }
    ops
}

/// Build the PDF object graph for `description` and return the file bytes.
///
/// The output carries no timestamps or random identifiers, so equal descriptions
/// produce equal bytes.
pub fn write_pdf(description: &PageDescription, title: &str) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in Font::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }

    let mut xobjects = Dictionary::new();
    let mut image_names = Vec::new();
    for (index, (name, asset)) in description.images.iter().enumerate() {
        let resource = image_resource_name(index);
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => asset.width_px as i64,
                "Height" => asset.height_px as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            deflate(&asset.rgb)?,
        );
        let image_id = doc.add_object(stream);
        xobjects.set(resource.as_bytes().to_vec(), image_id);
        image_names.push((name.clone(), resource));
    }

    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
        "XObject" => xobjects,
    });

    let mut kids = Vec::with_capacity(description.pages.len());
    for page in &description.pages {
        let content = Content {
            operations: page_operations(page, &image_names),
        };
        let encoded = content.encode()?;
        let content_id = doc.add_object(Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            deflate(&encoded)?,
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_win_ansi(title)),
        "Producer" => Object::string_literal("calibration-docs-server"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_description() -> PageDescription {
        let mut page = Page::default();
        page.text(50.0, 50.0, Font::Bold, 12.0, "Hello");
        page.rect(50.0, 80.0, 100.0, 20.0, 0.5);
        PageDescription {
            pages: vec![page.clone(), page],
            images: Default::default(),
        }
    }

    #[test]
    fn test_output_is_a_pdf() {
        let bytes = write_pdf(&sample_description(), "Test").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let first = write_pdf(&sample_description(), "Test").unwrap();
        let second = write_pdf(&sample_description(), "Test").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_page_count_is_preserved() {
        let bytes = write_pdf(&sample_description(), "Test").unwrap();
        let parsed = Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 2);
    }
}
