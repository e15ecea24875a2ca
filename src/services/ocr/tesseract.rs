// SPDX-License-Identifier: GPL-3.0-or-later
// src/services/ocr/tesseract.rs
//
// Local OCR for typed documents via the tesseract executable.

use std::process::Stdio;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{OcrEngine, OcrError, Progress, non_empty};
use crate::config::AppConfig;
use crate::domain::document::core::SourceImage;
use crate::domain::document::core::content::encode_png;
use crate::domain::document::operations::preprocess;

pub struct TesseractOcr {
    command: String,
    language: String,
    /// Binarization cutoff, `None` to feed the image as-is.
    threshold: Option<u8>,
}

impl TesseractOcr {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            command: config.tesseract_command.clone(),
            language: config.ocr_language.clone(),
            threshold: config.preprocess_typed.then_some(config.threshold),
        }
    }

    fn prepare(&self, image: &SourceImage) -> image::ImageResult<Vec<u8>> {
        match self.threshold {
            Some(cutoff) => encode_png(&preprocess::threshold(image.pixels(), cutoff)),
            None => image.to_png(),
        }
    }

    async fn recognize(&self, image: &SourceImage, progress: Progress) -> Result<String, OcrError> {
        progress.report(0.0);
        let png = self.prepare(image)?;
        progress.report(0.1);

        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "-l", self.language.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| OcrError::Engine(format!("cannot start `{}`: {e}", self.command)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OcrError::Engine("engine stdin is not available".to_string()))?;
        stdin
            .write_all(&png)
            .await
            .map_err(|e| OcrError::Engine(format!("cannot send image to engine: {e}")))?;
        drop(stdin);
        progress.report(0.4);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| OcrError::Engine(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!(
                "`{}` exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }
        progress.report(1.0);

        non_empty(&String::from_utf8_lossy(&output.stdout))
    }
}

impl OcrEngine for TesseractOcr {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn extract_text<'a>(
        &'a self,
        image: &'a SourceImage,
        progress: Progress,
    ) -> BoxFuture<'a, Result<String, OcrError>> {
        self.recognize(image, progress).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn page() -> SourceImage {
        SourceImage::from_rgba(RgbaImage::from_pixel(4, 4, Rgba([90, 90, 90, 255]))).unwrap()
    }

    #[test]
    fn preprocessing_follows_config() {
        let engine = TesseractOcr::new(&AppConfig::default());
        assert_eq!(engine.threshold, Some(120));

        let png = engine.prepare(&page()).unwrap();
        let decoded = SourceImage::decode(&png).unwrap();
        assert_eq!(decoded.pixels().get_pixel(0, 0), &Rgba([0, 0, 0, 255]));

        let raw = TesseractOcr::new(&AppConfig {
            preprocess_typed: false,
            ..AppConfig::default()
        });
        let decoded = SourceImage::decode(&raw.prepare(&page()).unwrap()).unwrap();
        assert_eq!(decoded.pixels().get_pixel(0, 0), &Rgba([90, 90, 90, 255]));
    }

    #[tokio::test]
    async fn missing_engine_is_reported() {
        let engine = TesseractOcr::new(&AppConfig {
            tesseract_command: "snapsolve-no-such-ocr-engine".to_string(),
            ..AppConfig::default()
        });
        let err = engine
            .extract_text(&page(), Progress::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Engine(_)), "{err}");
    }
}
