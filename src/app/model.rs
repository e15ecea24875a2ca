// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/model.rs
//
// Application state for one solving session.

use crate::app::view::crop::CropTool;
use crate::config::AppConfig;

// =============================================================================
// Enums
// =============================================================================

/// What kind of page the user uploaded. Picks the OCR backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DocumentKind {
    /// Printed or typed text, read by the local engine.
    #[default]
    Typed,
    /// Handwriting, read by the cloud vision service.
    Handwritten,
}

impl DocumentKind {
    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Typed => "Typed Document",
            DocumentKind::Handwritten => "Handwritten Document",
        }
    }
}

// =============================================================================
// Model
// =============================================================================

pub struct AppModel {
    // Document.
    pub document_kind: DocumentKind,
    pub crop: CropTool,

    // Results.
    pub ocr_text: Option<String>,
    pub solution: Option<String>,
    /// Continue from OCR into solving automatically.
    pub auto_solve: bool,

    // UI state.
    pub ocr_progress: f32,
    pub is_processing: bool,
    pub error: Option<String>,
}

impl AppModel {
    pub fn new(config: &AppConfig, document_kind: DocumentKind) -> Self {
        Self {
            document_kind,
            crop: CropTool::new(config),
            ocr_text: None,
            solution: None,
            auto_solve: true,
            ocr_progress: 0.0,
            is_processing: false,
            error: None,
        }
    }

    pub fn set_error<S: Into<String>>(&mut self, msg: S) {
        self.error = Some(msg.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Drop results of a previous run.
    pub fn clear_results(&mut self) {
        self.ocr_text = None;
        self.solution = None;
        self.ocr_progress = 0.0;
    }
}
