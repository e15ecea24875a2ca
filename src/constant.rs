// SPDX-License-Identifier: GPL-3.0-or-later
// src/constant.rs
//
// Application constants that should not be changed by the user.

/// Maximum width of the crop preview canvas in pixels.
pub const MAX_CANVAS_WIDTH: u32 = 800;

/// A drag must move further than this (canvas pixels, both axes) to count as a selection.
pub const MIN_DRAG_DISTANCE: f32 = 10.0;

/// Upper bound for a single crop raster (64 megapixels, ~256 MiB of RGBA).
pub const MAX_CROP_PIXELS: u64 = 64_000_000;

/// Luminance cutoff used by the binarization pass before local OCR.
pub const DEFAULT_THRESHOLD: u8 = 120;

/// Configuration directory name.
pub const CONFIG_DIR: &str = "snapsolve";

/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.ron";

/// Environment variable holding the LLM service key.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable holding the cloud vision key.
pub const GOOGLE_KEY_VAR: &str = "GOOGLE_API_KEY";
