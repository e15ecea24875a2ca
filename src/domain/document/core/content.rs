// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/core/content.rs
//
// Source image: the decoded, immutable raster a crop session works on.

use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use image::{DynamicImage, ImageFormat, RgbaImage};

/// Upload formats accepted from the user.
const ACCEPTED_FORMATS: [ImageFormat; 2] = [ImageFormat::Jpeg, ImageFormat::Png];

/// Decoded source image.
///
/// Pixels are shared, so cloning is cheap and handing the original back on
/// reset never copies the buffer.
#[derive(Clone)]
pub struct SourceImage {
    pixels: Arc<RgbaImage>,
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceImage({}x{})", self.width(), self.height())
    }
}

impl SourceImage {
    /// Wrap an RGBA buffer. Returns `None` for zero-sized buffers.
    #[must_use]
    pub fn from_rgba(pixels: RgbaImage) -> Option<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return None;
        }
        Some(Self {
            pixels: Arc::new(pixels),
        })
    }

    /// Decode encoded bytes (PNG, JPEG). Returns `None` when undecodable.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        match image::load_from_memory(bytes) {
            Ok(decoded) => Self::from_rgba(decoded.to_rgba8()),
            Err(e) => {
                log::warn!("Failed to decode image: {e}");
                None
            }
        }
    }

    /// Read and decode an uploaded file.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let format = ImageFormat::from_path(path).ok();
        if !format.is_some_and(|f| ACCEPTED_FORMATS.contains(&f)) {
            anyhow::bail!(
                "{} is not a supported image, please upload a JPEG or PNG file",
                path.display()
            );
        }

        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::decode(&bytes)
            .ok_or_else(|| anyhow::anyhow!("{} could not be decoded", path.display()))
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Native pixel dimensions (width, height).
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// True if both handles point at the very same buffer.
    #[cfg(test)]
    #[must_use]
    pub fn same_buffer(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Encode as PNG (what both OCR backends consume).
    pub fn to_png(&self) -> image::ImageResult<Vec<u8>> {
        encode_png(&self.pixels)
    }

    /// Save to disk, format picked from the extension.
    ///
    /// JPEG has no alpha channel, so the buffer is flattened to RGB first.
    pub fn save(&self, path: &Path) -> image::ImageResult<()> {
        match ImageFormat::from_path(path)? {
            ImageFormat::Jpeg => {
                DynamicImage::ImageRgba8((*self.pixels).clone())
                    .to_rgb8()
                    .save_with_format(path, ImageFormat::Jpeg)
            }
            format => self.pixels.save_with_format(path, format),
        }
    }
}

/// Encode an RGBA buffer as PNG bytes.
pub fn encode_png(pixels: &RgbaImage) -> image::ImageResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    pixels.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn zero_sized_buffers_are_rejected() {
        assert!(SourceImage::from_rgba(RgbaImage::new(0, 10)).is_none());
        assert!(SourceImage::from_rgba(RgbaImage::new(10, 0)).is_none());
    }

    #[test]
    fn garbage_bytes_do_not_decode() {
        assert!(SourceImage::decode(b"definitely not an image").is_none());
    }

    #[test]
    fn png_survives_encode_and_decode() {
        let pixels = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let source = SourceImage::from_rgba(pixels).unwrap();
        let decoded = SourceImage::decode(&source.to_png().unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.pixels().get_pixel(2, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn unsupported_extension_is_refused() {
        let err = SourceImage::open(Path::new("notes.gif")).unwrap_err();
        assert!(err.to_string().contains("JPEG or PNG"));
    }

    #[test]
    fn jpeg_save_drops_alpha_and_reopens() {
        let path = std::env::temp_dir().join(format!("snapsolve-{}-save.jpg", std::process::id()));
        let source = SourceImage::from_rgba(RgbaImage::from_pixel(40, 30, Rgba([200, 200, 200, 128])))
            .unwrap();
        source.save(&path).unwrap();
        let reopened = SourceImage::open(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(reopened.dimensions(), (40, 30));
        assert_eq!(reopened.pixels().get_pixel(0, 0)[3], 255);
    }

    #[test]
    fn png_save_keeps_alpha() {
        let path = std::env::temp_dir().join(format!("snapsolve-{}-save.png", std::process::id()));
        let source = SourceImage::from_rgba(RgbaImage::from_pixel(5, 4, Rgba([1, 2, 3, 128])))
            .unwrap();
        source.save(&path).unwrap();
        let reopened = SourceImage::open(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(reopened.pixels().get_pixel(4, 3), &Rgba([1, 2, 3, 128]));
    }

    #[test]
    fn clones_share_pixels() {
        let source = SourceImage::from_rgba(RgbaImage::new(4, 4)).unwrap();
        let copy = source.clone();
        assert!(source.same_buffer(&copy));
        let other = SourceImage::from_rgba(RgbaImage::new(4, 4)).unwrap();
        assert!(!source.same_buffer(&other));
    }
}
