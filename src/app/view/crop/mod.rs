// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/crop/mod.rs
//
// Crop module: selection state, overlay scene and the interactive tool.

pub mod overlay;
mod selection;
mod tool;

pub use selection::SelectionRect;
pub use tool::{CropOutput, CropTool, LoadTicket};
