// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/core/mod.rs
//
// Core document types: the loaded source image and its display viewport.

pub mod content;
pub mod viewport;

pub use content::SourceImage;
pub use viewport::Viewport;
