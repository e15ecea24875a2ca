// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/crop/tool.rs
//
// Interactive crop tool: pointer-driven selection over a scaled preview,
// mapped back to source pixels on commit.

use crate::app::view::canvas::Canvas;
use crate::app::view::crop::overlay::{self, Scene};
use crate::app::view::crop::selection::SelectionRect;
use crate::config::AppConfig;
use crate::domain::document::core::{SourceImage, Viewport};
use crate::domain::document::operations::{CropError, CroppedImage, SourceRect};

/// Identifies one `load` request. Only the newest ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What the tool hands to downstream processing.
#[derive(Debug, Clone)]
pub enum CropOutput {
    /// A committed selection.
    Cropped(CroppedImage),
    /// The untouched original (emitted by `reset`).
    Original(SourceImage),
}

impl CropOutput {
    #[must_use]
    pub fn image(&self) -> &SourceImage {
        match self {
            Self::Cropped(cropped) => &cropped.image,
            Self::Original(image) => image,
        }
    }
}

pub struct CropTool {
    max_width: u32,
    min_drag_distance: f32,
    max_crop_pixels: u64,

    load_seq: u64,
    source: Option<SourceImage>,
    viewport: Option<Viewport>,
    selection: SelectionRect,
    committed: Option<CroppedImage>,

    scene: Scene,
    canvas: Canvas,
}

impl CropTool {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            max_width: config.max_canvas_width,
            min_drag_distance: config.min_drag_distance,
            max_crop_pixels: config.max_crop_pixels,
            load_seq: 0,
            source: None,
            viewport: None,
            selection: SelectionRect::default(),
            committed: None,
            scene: Scene::default(),
            canvas: Canvas::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Start a load. Any in-flight drag is dropped and every older ticket goes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_seq += 1;
        if self.selection.is_selecting {
            log::debug!("Discarding in-progress selection for load #{}", self.load_seq);
            self.selection.reset();
            self.redraw();
        }
        LoadTicket(self.load_seq)
    }

    /// Complete a load once decoding finished.
    ///
    /// Returns `true` if the image was installed. Stale tickets and
    /// undecodable images leave the tool untouched.
    pub fn finish_load(&mut self, ticket: LoadTicket, image: Option<SourceImage>) -> bool {
        if !self.is_current(ticket) {
            log::debug!(
                "Ignoring stale decode #{} (current #{})",
                ticket.0,
                self.load_seq
            );
            return false;
        }
        let Some(image) = image else {
            return false;
        };
        let (width, height) = image.dimensions();
        let Some(viewport) = Viewport::fit(width, height, self.max_width) else {
            return false;
        };

        log::debug!(
            "Loaded {width}x{height} image into a {}x{} canvas",
            viewport.width,
            viewport.height
        );
        self.canvas.set_source(&image, viewport);
        self.source = Some(image);
        self.viewport = Some(viewport);
        self.selection.reset();
        self.committed = None;
        self.redraw();
        true
    }

    /// True if `ticket` belongs to the most recent load.
    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.load_seq
    }

    /// Synchronous load of an already decoded image.
    #[cfg(test)]
    pub fn load(&mut self, image: SourceImage) -> bool {
        let ticket = self.begin_load();
        self.finish_load(ticket, Some(image))
    }

    /// Decode and load encoded bytes. No-op if they do not decode.
    #[cfg(test)]
    pub fn load_bytes(&mut self, bytes: &[u8]) -> bool {
        let ticket = self.begin_load();
        self.finish_load(ticket, SourceImage::decode(bytes))
    }

    /// Forget the current image and invalidate pending loads.
    pub fn unload(&mut self) {
        self.load_seq += 1;
        self.source = None;
        self.viewport = None;
        self.selection.reset();
        self.committed = None;
        self.canvas.clear_source();
        self.redraw();
    }

    // -------------------------------------------------------------------------
    // Pointer events (canvas-space coordinates)
    // -------------------------------------------------------------------------

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        if self.viewport.is_none() {
            return;
        }
        self.selection.begin(x, y);
        self.redraw();
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if !self.selection.is_selecting {
            return;
        }
        self.selection.update(x, y);
        self.redraw();
    }

    pub fn on_pointer_up(&mut self) -> Result<Option<CropOutput>, CropError> {
        self.commit()
    }

    pub fn on_pointer_leave(&mut self) -> Result<Option<CropOutput>, CropError> {
        self.commit()
    }

    /// Clear the selection and hand back the original image.
    pub fn reset(&mut self) -> Option<CropOutput> {
        self.selection.reset();
        self.committed = None;
        self.redraw();
        self.source.clone().map(CropOutput::Original)
    }

    fn commit(&mut self) -> Result<Option<CropOutput>, CropError> {
        if !self.selection.finish() {
            return Ok(None);
        }

        if !self.selection.exceeds_threshold(self.min_drag_distance) {
            log::debug!("Discarding selection below threshold: {:?}", self.selection.delta());
            self.selection.reset();
            self.redraw();
            return Ok(None);
        }
        self.redraw();

        let (Some(source), Some(viewport)) = (&self.source, self.viewport) else {
            return Ok(None);
        };
        let (width, height) = source.dimensions();
        let source_rect = SourceRect::from_canvas(
            self.selection.normalized(),
            viewport.scale_factors(width, height),
            (width, height),
        );
        if !source_rect.to_region().is_valid() {
            log::debug!("Selection lies outside the image: {source_rect:?}");
            self.selection.reset();
            self.redraw();
            return Ok(None);
        }

        let cropped = match CroppedImage::from_source(source, source_rect, self.max_crop_pixels) {
            Ok(cropped) => cropped,
            Err(e) => {
                log::warn!("Crop failed: {e}");
                self.selection.reset();
                self.redraw();
                return Err(e);
            }
        };
        log::info!(
            "Cropped {}x{} region at ({}, {})",
            cropped.crop_width(),
            cropped.crop_height(),
            source_rect.start_x,
            source_rect.start_y
        );
        self.committed = Some(cropped.clone());
        Ok(Some(CropOutput::Cropped(cropped)))
    }

    /// Rebuild the frame from the current state and paint it.
    fn redraw(&mut self) {
        self.scene = overlay::scene(self.viewport, &self.selection);
        self.canvas.paint(&self.scene);
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Image downstream processing should use: last committed crop, else the original.
    #[must_use]
    pub fn current(&self) -> Option<&SourceImage> {
        self.committed
            .as_ref()
            .map(|cropped| &cropped.image)
            .or(self.source.as_ref())
    }

    #[must_use]
    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    #[must_use]
    pub fn committed(&self) -> Option<&CroppedImage> {
        self.committed.as_ref()
    }

    #[cfg(test)]
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    #[cfg(test)]
    #[must_use]
    pub fn selection(&self) -> &SelectionRect {
        &self.selection
    }

    #[cfg(test)]
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}
