// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/canvas.rs
//
// Preview canvas: rasterizes a crop scene at viewport resolution.

use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};

use crate::app::view::crop::overlay::{CanvasRect, DrawCommand, Scene};
use crate::domain::document::core::{SourceImage, Viewport};

/// Fixed-size drawing surface owned by one crop tool.
pub struct Canvas {
    /// Source image pre-scaled to the viewport, drawn by `DrawCommand::Image`.
    base: Option<RgbaImage>,
    /// Last painted frame.
    frame: RgbaImage,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            base: None,
            frame: RgbaImage::new(0, 0),
        }
    }
}

impl Canvas {
    /// Resize the surface to `viewport` and cache the scaled source.
    pub fn set_source(&mut self, source: &SourceImage, viewport: Viewport) {
        let (width, height) = viewport.pixel_size();
        let base = if source.dimensions() == (width, height) {
            source.pixels().clone()
        } else {
            imageops::resize(source.pixels(), width, height, FilterType::Triangle)
        };
        self.frame = RgbaImage::new(width, height);
        self.base = Some(base);
    }

    pub fn clear_source(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    /// Execute a draw list against the surface.
    pub fn paint(&mut self, scene: &Scene) {
        for command in &scene.commands {
            match command {
                DrawCommand::Clear { .. } => {
                    for pixel in self.frame.pixels_mut() {
                        *pixel = Rgba([0, 0, 0, 0]);
                    }
                }
                DrawCommand::Image { .. } => {
                    if let Some(base) = &self.base {
                        self.frame.clone_from(base);
                    }
                }
                DrawCommand::StrokeRect {
                    rect,
                    color,
                    line_width,
                } => {
                    let lw = line_width.min(rect.width).min(rect.height);
                    let bands = [
                        CanvasRect { height: lw, ..*rect },
                        CanvasRect {
                            y: rect.y + rect.height - lw,
                            height: lw,
                            ..*rect
                        },
                        CanvasRect { width: lw, ..*rect },
                        CanvasRect {
                            x: rect.x + rect.width - lw,
                            width: lw,
                            ..*rect
                        },
                    ];
                    for band in bands {
                        fill_quad(&mut self.frame, band, *color);
                    }
                }
                DrawCommand::FillRect { rect, color } => {
                    fill_quad(&mut self.frame, *rect, *color);
                }
            }
        }
    }
}

/// Alpha-blend `color` over the pixels covered by `rect`, clipped to the surface.
fn fill_quad(frame: &mut RgbaImage, rect: CanvasRect, color: [u8; 4]) {
    let (width, height) = frame.dimensions();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let clip = |v: f32, max: u32| v.round().clamp(0.0, max as f32) as u32;

    let x0 = clip(rect.x, width);
    let x1 = clip(rect.x + rect.width, width);
    let y0 = clip(rect.y, height);
    let y1 = clip(rect.y + rect.height, height);

    let paint = Rgba(color);
    for y in y0..y1 {
        for x in x0..x1 {
            frame.get_pixel_mut(x, y).blend(&paint);
        }
    }
}
