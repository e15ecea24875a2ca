// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/operations/crop.rs
//
// Crop operation domain model: source-space rectangles and the raster copy.

use image::RgbaImage;

use crate::domain::document::core::SourceImage;

/// Normalized crop rectangle in source-image coordinates.
///
/// Always satisfies `0 <= start <= end <= image size` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRect {
    pub start_x: f32,
    pub start_y: f32,
    pub end_x: f32,
    pub end_y: f32,
}

impl SourceRect {
    /// Map a normalized canvas rectangle `(min_x, min_y, max_x, max_y)` into
    /// source space and clamp it to the image bounds.
    #[must_use]
    pub fn from_canvas(
        (min_x, min_y, max_x, max_y): (f32, f32, f32, f32),
        (scale_x, scale_y): (f32, f32),
        (img_width, img_height): (u32, u32),
    ) -> Self {
        let w = img_width as f32;
        let h = img_height as f32;
        Self {
            start_x: (min_x * scale_x).clamp(0.0, w),
            start_y: (min_y * scale_y).clamp(0.0, h),
            end_x: (max_x * scale_x).clamp(0.0, w),
            end_y: (max_y * scale_y).clamp(0.0, h),
        }
    }

    /// Whole-pixel region covered by this rectangle.
    #[must_use]
    pub fn to_region(&self) -> CropRegion {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (x0, y0, x1, y1) = (
            self.start_x.round() as u32,
            self.start_y.round() as u32,
            self.end_x.round() as u32,
            self.end_y.round() as u32,
        );
        CropRegion::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

/// Crop region in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Check if region has valid dimensions.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        right.is_some_and(|r| r <= width) && bottom.is_some_and(|b| b <= height)
    }
}

/// Errors a crop can surface to the caller. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CropError {
    #[error("crop region is empty")]
    Empty,
    #[error("crop region {region:?} lies outside the {width}x{height} image")]
    OutOfBounds {
        region: CropRegion,
        width: u32,
        height: u32,
    },
    #[error("a {width}x{height} crop exceeds the limit of {limit} pixels")]
    TooLarge { width: u32, height: u32, limit: u64 },
    #[error("not enough memory for a {bytes} byte crop buffer")]
    Allocation { bytes: usize },
}

/// Copy `region` out of `source` 1:1, without resampling.
///
/// The destination buffer is reserved fallibly so an oversized selection
/// becomes a [`CropError`] instead of an abort.
pub fn rasterize(
    source: &RgbaImage,
    region: CropRegion,
    max_pixels: u64,
) -> Result<RgbaImage, CropError> {
    if !region.is_valid() {
        return Err(CropError::Empty);
    }
    let (img_width, img_height) = source.dimensions();
    if !region.fits_within(img_width, img_height) {
        return Err(CropError::OutOfBounds {
            region,
            width: img_width,
            height: img_height,
        });
    }

    let area = u64::from(region.width) * u64::from(region.height);
    if area > max_pixels {
        return Err(CropError::TooLarge {
            width: region.width,
            height: region.height,
            limit: max_pixels,
        });
    }

    let bytes = area
        .checked_mul(4)
        .and_then(|b| usize::try_from(b).ok())
        .ok_or(CropError::Allocation { bytes: usize::MAX })?;
    let mut buffer: Vec<u8> = Vec::new();
    buffer
        .try_reserve_exact(bytes)
        .map_err(|_| CropError::Allocation { bytes })?;

    let stride = img_width as usize * 4;
    let row_len = region.width as usize * 4;
    let raw = source.as_raw();
    for row in region.y..region.y + region.height {
        let start = row as usize * stride + region.x as usize * 4;
        buffer.extend_from_slice(&raw[start..start + row_len]);
    }

    RgbaImage::from_raw(region.width, region.height, buffer).ok_or(CropError::Empty)
}

/// Result of a committed selection: a fresh raster plus the rectangle it came from.
#[derive(Debug, Clone)]
pub struct CroppedImage {
    pub image: SourceImage,
    pub source_rect: SourceRect,
}

impl CroppedImage {
    /// Crop `source` to `source_rect`.
    pub fn from_source(
        source: &SourceImage,
        source_rect: SourceRect,
        max_pixels: u64,
    ) -> Result<Self, CropError> {
        let pixels = rasterize(source.pixels(), source_rect.to_region(), max_pixels)?;
        let image = SourceImage::from_rgba(pixels).ok_or(CropError::Empty)?;
        Ok(Self { image, source_rect })
    }

    #[must_use]
    pub fn crop_width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn crop_height(&self) -> u32 {
        self.image.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Every pixel encodes its own coordinates.
    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn canvas_rect_scales_into_source_space() {
        let rect = SourceRect::from_canvas((100.0, 100.0, 300.0, 250.0), (2.0, 2.0), (1600, 1200));
        assert_eq!(
            rect,
            SourceRect {
                start_x: 200.0,
                start_y: 200.0,
                end_x: 600.0,
                end_y: 500.0
            }
        );
        assert_eq!(rect.to_region(), CropRegion::new(200, 200, 400, 300));
    }

    #[test]
    fn rect_is_clamped_to_the_image() {
        let rect = SourceRect::from_canvas((-20.0, -5.0, 900.0, 700.0), (2.0, 2.0), (1600, 1200));
        assert_eq!(rect.start_x, 0.0);
        assert_eq!(rect.start_y, 0.0);
        assert_eq!(rect.end_x, 1600.0);
        assert_eq!(rect.end_y, 1200.0);
    }

    #[test]
    fn rasterize_copies_pixels_verbatim() {
        let source = gradient(50, 40);
        let out = rasterize(&source, CropRegion::new(10, 5, 20, 15), u64::MAX).unwrap();
        assert_eq!(out.dimensions(), (20, 15));
        assert_eq!(out.get_pixel(0, 0), &Rgba([10, 5, 0, 255]));
        assert_eq!(out.get_pixel(19, 14), &Rgba([29, 19, 0, 255]));
    }

    #[test]
    fn full_image_region_is_identity() {
        let source = gradient(8, 6);
        let out = rasterize(&source, CropRegion::new(0, 0, 8, 6), u64::MAX).unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn empty_region_is_rejected() {
        let source = gradient(8, 8);
        assert_eq!(
            rasterize(&source, CropRegion::new(2, 2, 0, 4), u64::MAX),
            Err(CropError::Empty)
        );
    }

    #[test]
    fn out_of_bounds_region_is_rejected() {
        let source = gradient(8, 8);
        let err = rasterize(&source, CropRegion::new(4, 4, 5, 2), u64::MAX).unwrap_err();
        assert!(matches!(err, CropError::OutOfBounds { width: 8, height: 8, .. }));
        let err = rasterize(&source, CropRegion::new(u32::MAX, 0, 2, 2), u64::MAX).unwrap_err();
        assert!(matches!(err, CropError::OutOfBounds { .. }));
    }

    #[test]
    fn pixel_budget_is_enforced() {
        let source = gradient(100, 100);
        let err = rasterize(&source, CropRegion::new(0, 0, 100, 100), 9_999).unwrap_err();
        assert_eq!(
            err,
            CropError::TooLarge {
                width: 100,
                height: 100,
                limit: 9_999
            }
        );
    }

    #[test]
    fn cropped_image_reports_its_size() {
        let source = SourceImage::from_rgba(gradient(64, 64)).unwrap();
        let rect = SourceRect {
            start_x: 8.0,
            start_y: 16.0,
            end_x: 40.0,
            end_y: 48.0,
        };
        let cropped = CroppedImage::from_source(&source, rect, u64::MAX).unwrap();
        assert_eq!((cropped.crop_width(), cropped.crop_height()), (32, 32));
        assert_eq!(cropped.image.pixels().get_pixel(0, 0), &Rgba([8, 16, 0, 255]));
        assert_eq!(cropped.source_rect, rect);
    }
}
