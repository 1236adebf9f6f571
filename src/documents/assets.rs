//! Optional images placed on rendered documents.
//!
//! A missing or undecodable image is never an error for a render; the document is
//! produced without it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub const LOGO_FILE: &str = "logo.png";
pub const HEADER_BANNER_FILE: &str = "header.png";
pub const FOOTER_BANNER_FILE: &str = "footer.png";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read image {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("failed to decode image {0}: {1}")]
    Decode(String, #[source] image::ImageError),
}

/// A decoded image as 8-bit RGB samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub width_px: u32,
    pub height_px: u32,
    pub rgb: Vec<u8>,
}

impl ImageAsset {
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| AssetError::Decode(name.to_string(), e))?
            .to_rgb8();
        Ok(Self {
            width_px: decoded.width(),
            height_px: decoded.height(),
            rgb: decoded.into_raw(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let name = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|e| AssetError::Io(name.clone(), e))?;
        Self::from_bytes(&name, &bytes)
    }

    /// Largest size with the image's aspect ratio that fits in `max_width` x `max_height`.
    pub fn fit_within(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        if self.width_px == 0 || self.height_px == 0 {
            return (0.0, 0.0);
        }
        let scale = (max_width / self.width_px as f32).min(max_height / self.height_px as f32);
        (self.width_px as f32 * scale, self.height_px as f32 * scale)
    }
}

/// Images available to a render.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssets {
    pub logo: Option<Arc<ImageAsset>>,
    pub header_banner: Option<Arc<ImageAsset>>,
    pub footer_banner: Option<Arc<ImageAsset>>,
}

impl DocumentAssets {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Reads the asset images from a directory on every call.
#[derive(Debug, Clone)]
pub struct AssetSource {
    dir: PathBuf,
}

impl AssetSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load(&self) -> DocumentAssets {
        DocumentAssets {
            logo: self.load_optional(LOGO_FILE),
            header_banner: self.load_optional(HEADER_BANNER_FILE),
            footer_banner: self.load_optional(FOOTER_BANNER_FILE),
        }
    }

    fn load_optional(&self, file: &str) -> Option<Arc<ImageAsset>> {
        let path = self.dir.join(file);
        if !path.exists() {
            log::debug!("Asset {} not present, skipping", path.display());
            return None;
        }
        match ImageAsset::load(&path) {
            Ok(asset) => Some(Arc::new(asset)),
            Err(e) => {
                log::warn!("Ignoring unusable asset: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_yields_no_assets() {
        let source = AssetSource::new("/nonexistent/assets/dir");
        let assets = source.load();
        assert!(assets.logo.is_none());
        assert!(assets.header_banner.is_none());
        assert!(assets.footer_banner.is_none());
    }

    #[test]
    fn test_undecodable_image_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LOGO_FILE), b"definitely not a png").unwrap();

        let assets = AssetSource::new(dir.path()).load();
        assert!(assets.logo.is_none());
    }

    #[test]
    fn test_png_is_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let img = image::RgbImage::from_pixel(4, 2, image::Rgb([255, 0, 0]));
        img.save(dir.path().join(LOGO_FILE)).unwrap();

        let logo = AssetSource::new(dir.path()).load().logo.unwrap();
        assert_eq!((logo.width_px, logo.height_px), (4, 2));
        assert_eq!(logo.rgb.len(), 4 * 2 * 3);
        assert_eq!(logo.fit_within(80.0, 80.0), (80.0, 40.0));
    }
}
