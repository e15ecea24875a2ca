// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/crop/selection.rs
//
// Crop selection state: the canvas-space drag rectangle and its Idle/Selecting gate.

/// Drag rectangle in canvas pixels.
///
/// Not normalized while dragging; `start` may exceed `end` on either axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionRect {
    pub start_x: f32,
    pub start_y: f32,
    pub end_x: f32,
    pub end_y: f32,
    pub is_selecting: bool,
}

impl SelectionRect {
    /// Idle -> Selecting, anchored at the pointer.
    pub fn begin(&mut self, x: f32, y: f32) {
        *self = Self {
            start_x: x,
            start_y: y,
            end_x: x,
            end_y: y,
            is_selecting: true,
        };
    }

    /// Track the pointer. Ignored while idle.
    pub fn update(&mut self, x: f32, y: f32) {
        if !self.is_selecting {
            return;
        }
        self.end_x = x;
        self.end_y = y;
    }

    /// Selecting -> Idle. Returns `false` if no drag was active.
    pub fn finish(&mut self) -> bool {
        if !self.is_selecting {
            return false;
        }
        self.is_selecting = false;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn delta(&self) -> (f32, f32) {
        (
            (self.end_x - self.start_x).abs(),
            (self.end_y - self.start_y).abs(),
        )
    }

    /// True when the drag moved further than `min_distance` on both axes.
    #[must_use]
    pub fn exceeds_threshold(&self, min_distance: f32) -> bool {
        let (dx, dy) = self.delta();
        dx > min_distance && dy > min_distance
    }

    #[must_use]
    pub fn has_area(&self) -> bool {
        let (dx, dy) = self.delta();
        dx > 0.0 && dy > 0.0
    }

    /// `(min_x, min_y, max_x, max_y)` regardless of drag direction.
    #[must_use]
    pub fn normalized(&self) -> (f32, f32, f32, f32) {
        (
            self.start_x.min(self.end_x),
            self.start_y.min(self.end_y),
            self.start_x.max(self.end_x),
            self.start_y.max(self.end_y),
        )
    }
}
