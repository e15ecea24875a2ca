// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/message.rs
//
// Application messages: events, user actions, and internal signals.

use std::path::PathBuf;

use crate::app::view::crop::LoadTicket;
use crate::domain::document::core::SourceImage;

#[derive(Debug, Clone)]
pub enum AppMessage {
    // Upload.
    Open(PathBuf),
    ImageDecoded {
        ticket: LoadTicket,
        image: Option<SourceImage>,
    },

    // Crop pointer events (canvas coordinates).
    PointerDown {
        x: f32,
        y: f32,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp,
    PointerLeave,
    ResetCrop,

    // Processing.
    Process,
    OcrProgress(f32),
    OcrFinished(Result<String, String>),
    SolveFinished(Result<String, String>),

    // Navigation.
    Back,
}
