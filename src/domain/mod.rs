// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/mod.rs
//
// Domain layer: images, viewport math and pixel operations. No UI or service concerns.

pub mod document;
