// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/crop/overlay.rs
//
// Crop overlay scene: the draw list issued after every selection change.

use crate::app::view::crop::selection::SelectionRect;
use crate::domain::document::core::Viewport;

pub const BORDER_COLOR: [u8; 4] = [0x0e, 0xa5, 0xe9, 0xff];
pub const OVERLAY_COLOR: [u8; 4] = [0x0e, 0xa5, 0xe9, 0x33];
pub const BORDER_WIDTH: f32 = 2.0;

/// Axis-aligned rectangle in canvas pixels with non-negative size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f32, height: f32 },
    Image { width: f32, height: f32 },
    StrokeRect { rect: CanvasRect, color: [u8; 4], line_width: f32 },
    FillRect { rect: CanvasRect, color: [u8; 4] },
}

/// Ordered draw list for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    /// The highlighted selection, if this frame draws one.
    #[cfg(test)]
    #[must_use]
    pub fn selection(&self) -> Option<CanvasRect> {
        self.commands.iter().find_map(|cmd| match cmd {
            DrawCommand::StrokeRect { rect, .. } => Some(*rect),
            _ => None,
        })
    }

    #[cfg(test)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Build the frame for `selection` over an image shown at `viewport`.
///
/// Without a viewport nothing is drawn. The selection is drawn only with
/// positive area, mid-drag or committed, in whichever direction it was dragged.
#[must_use]
pub fn scene(viewport: Option<Viewport>, selection: &SelectionRect) -> Scene {
    let Some(viewport) = viewport else {
        return Scene::default();
    };

    let mut commands = vec![
        DrawCommand::Clear {
            width: viewport.width,
            height: viewport.height,
        },
        DrawCommand::Image {
            width: viewport.width,
            height: viewport.height,
        },
    ];

    if selection.has_area() {
        let (min_x, min_y, max_x, max_y) = selection.normalized();
        let rect = CanvasRect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        };
        commands.push(DrawCommand::StrokeRect {
            rect,
            color: BORDER_COLOR,
            line_width: BORDER_WIDTH,
        });
        commands.push(DrawCommand::FillRect {
            rect,
            color: OVERLAY_COLOR,
        });
    }

    Scene { commands }
}
