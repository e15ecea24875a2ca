// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/operations/mod.rs
//
// Pixel operations applied to source images.

pub mod crop;
pub mod preprocess;

pub use crop::{CropError, CropRegion, CroppedImage, SourceRect};
