// SPDX-License-Identifier: GPL-3.0-or-later
// src/services/ocr/mod.rs
//
// OCR capability: two interchangeable providers behind one trait.

mod proxy;
mod tesseract;
mod vision;

pub use proxy::ProxyOcr;
pub use tesseract::TesseractOcr;
pub use vision::VisionOcr;

use futures_util::future::BoxFuture;
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::document::core::SourceImage;

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("{var} is not set, the OCR service needs an API key")]
    MissingCredential { var: &'static str },
    #[error("could not read the image, please try a clearer picture ({0})")]
    UnclearImage(String),
    #[error("no text was detected in the image")]
    NoTextDetected,
    #[error("local OCR engine failed: {0}")]
    Engine(String),
    #[error("OCR request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("OCR service error: {0}")]
    Upstream(String),
}

impl From<image::ImageError> for OcrError {
    fn from(e: image::ImageError) -> Self {
        Self::UnclearImage(e.to_string())
    }
}

/// Where an engine reports completion as a fraction in `0.0..=1.0`.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    tx: Option<UnboundedSender<f32>>,
}

impl Progress {
    pub fn new(tx: UnboundedSender<f32>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn report(&self, fraction: f32) {
        if let Some(tx) = &self.tx {
            // Receiver gone means nobody is watching any more.
            let _ = tx.send(fraction.clamp(0.0, 1.0));
        }
    }
}

pub trait OcrEngine: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Extract all readable text from `image`.
    fn extract_text<'a>(
        &'a self,
        image: &'a SourceImage,
        progress: Progress,
    ) -> BoxFuture<'a, Result<String, OcrError>>;
}

/// Trim engine output and treat whitespace-only results as "no text".
pub(crate) fn non_empty(text: &str) -> Result<String, OcrError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(OcrError::NoTextDetected)
    } else {
        Ok(trimmed.to_string())
    }
}
