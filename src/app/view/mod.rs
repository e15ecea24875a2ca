// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/view/mod.rs
//
// View layer: preview canvas and the crop tool drawn on it.

pub mod canvas;
pub mod crop;
