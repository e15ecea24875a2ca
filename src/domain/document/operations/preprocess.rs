// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/operations/preprocess.rs
//
// Binarization pass that improves local OCR on photographed pages.

use image::{Rgba, RgbaImage};

/// Turn every pixel black or white by its average RGB value. Alpha is kept.
#[must_use]
pub fn threshold(image: &RgbaImage, cutoff: u8) -> RgbaImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let avg = (u16::from(r) + u16::from(g) + u16::from(b)) / 3;
        let value = if avg > u16::from(cutoff) { 255 } else { 0 };
        *pixel = Rgba([value, value, value, a]);
    }
    out
}
