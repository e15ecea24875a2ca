// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/core/viewport.rs
//
// Display viewport: capped-width, aspect-preserving preview size.

/// Canvas dimensions derived from a source image and a maximum display width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Fit a `src_width` x `src_height` image into at most `max_width` canvas pixels.
    ///
    /// Images narrower than `max_width` are shown 1:1. Returns `None` for a zero
    /// dimension so callers never divide by zero when deriving scale factors.
    #[must_use]
    pub fn fit(src_width: u32, src_height: u32, max_width: u32) -> Option<Self> {
        if src_width == 0 || src_height == 0 || max_width == 0 {
            return None;
        }
        let width = src_width.min(max_width) as f32;
        let height = src_height as f32 * (width / src_width as f32);
        Some(Self { width, height })
    }

    /// Canvas-to-source scale factors `(W / Cw, H / Ch)`.
    #[must_use]
    pub fn scale_factors(&self, src_width: u32, src_height: u32) -> (f32, f32) {
        (
            src_width as f32 / self.width,
            src_height as f32 / self.height,
        )
    }

    /// Integer size of the backing canvas (at least 1x1).
    #[must_use]
    pub fn pixel_size(&self) -> (u32, u32) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        (
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }
}
