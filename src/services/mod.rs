// SPDX-License-Identifier: GPL-3.0-or-later
// src/services/mod.rs
//
// External capabilities: text extraction (OCR) and assignment solving (LLM).

pub mod ocr;
pub mod solver;

use base64::Engine;

use crate::app::model::DocumentKind;
use crate::config::{AppConfig, Credentials};
use crate::domain::document::core::SourceImage;

use self::ocr::{OcrEngine, ProxyOcr, TesseractOcr, VisionOcr};
use self::solver::{OpenAiSolver, ProxySolver, Solver};

/// The set of backends one session talks to.
pub struct Services {
    typed_ocr: Box<dyn OcrEngine>,
    handwritten_ocr: Box<dyn OcrEngine>,
    solver: Box<dyn Solver>,
}

impl Services {
    /// Wire up backends from config. Proxies take precedence over direct APIs.
    pub fn new(config: &AppConfig, credentials: &Credentials) -> Self {
        let client = reqwest::Client::new();

        let handwritten_ocr: Box<dyn OcrEngine> = match &config.ocr_proxy_url {
            Some(url) => Box::new(ProxyOcr::new(client.clone(), url.clone())),
            None => Box::new(VisionOcr::new(
                client.clone(),
                config,
                credentials.google_api_key.clone(),
            )),
        };

        let solver: Box<dyn Solver> = match &config.solver_proxy_url {
            Some(url) => Box::new(ProxySolver::new(client, url.clone())),
            None => Box::new(OpenAiSolver::new(
                client,
                config,
                credentials.openai_api_key.clone(),
            )),
        };

        Self {
            typed_ocr: Box::new(TesseractOcr::new(config)),
            handwritten_ocr,
            solver,
        }
    }

    /// Assemble from explicit backends.
    #[cfg(test)]
    pub fn with_backends(
        typed_ocr: Box<dyn OcrEngine>,
        handwritten_ocr: Box<dyn OcrEngine>,
        solver: Box<dyn Solver>,
    ) -> Self {
        Self {
            typed_ocr,
            handwritten_ocr,
            solver,
        }
    }

    /// Typed pages go to the local engine, handwriting to the cloud.
    pub fn ocr_for(&self, kind: DocumentKind) -> &dyn OcrEngine {
        match kind {
            DocumentKind::Typed => self.typed_ocr.as_ref(),
            DocumentKind::Handwritten => self.handwritten_ocr.as_ref(),
        }
    }

    pub fn solver(&self) -> &dyn Solver {
        self.solver.as_ref()
    }
}

/// PNG-encode and base64 an image for JSON request bodies.
pub(crate) fn base64_png(image: &SourceImage) -> image::ImageResult<String> {
    Ok(base64::engine::general_purpose::STANDARD.encode(image.to_png()?))
}

/// `{ "error": { "message": ... } }` as returned by both Google and OpenAI.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ApiError {
    pub message: String,
}
