// SPDX-License-Identifier: GPL-3.0-or-later
// src/services/ocr/vision.rs
//
// Cloud OCR for handwriting via the Google Cloud Vision annotate API.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::{OcrEngine, OcrError, Progress, non_empty};
use crate::config::AppConfig;
use crate::constant::GOOGLE_KEY_VAR;
use crate::domain::document::core::SourceImage;
use crate::services::{ApiError, base64_png};

/// Dense-text detector, better suited to pages than `TEXT_DETECTION`.
const FEATURE: &str = "DOCUMENT_TEXT_DETECTION";

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: [AnnotateImageRequest<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageRequest<'a> {
    image: ImageContent,
    features: [Feature; 1],
    image_context: ImageContext<'a>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    max_results: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageContext<'a> {
    language_hints: &'a [String],
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageAnnotation>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageAnnotation {
    full_text_annotation: Option<TextAnnotation>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct TextAnnotation {
    text: String,
}

pub struct VisionOcr {
    client: reqwest::Client,
    endpoint: String,
    language_hints: Vec<String>,
    api_key: Option<String>,
}

impl VisionOcr {
    pub fn new(client: reqwest::Client, config: &AppConfig, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: config.vision_endpoint.clone(),
            language_hints: config.vision_language_hints.clone(),
            api_key,
        }
    }

    fn request_body(&self, content: String) -> AnnotateRequest<'_> {
        AnnotateRequest {
            requests: [AnnotateImageRequest {
                image: ImageContent { content },
                features: [Feature {
                    kind: FEATURE,
                    max_results: 1,
                }],
                image_context: ImageContext {
                    language_hints: &self.language_hints,
                },
            }],
        }
    }

    async fn annotate(&self, image: &SourceImage, progress: Progress) -> Result<String, OcrError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(OcrError::MissingCredential { var: GOOGLE_KEY_VAR })?;

        progress.report(0.0);
        let body = self.request_body(base64_png(image)?);
        progress.report(0.2);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;
        progress.report(0.8);

        let text = response.text().await?;
        progress.report(1.0);
        parse_response(&text)
    }
}

impl OcrEngine for VisionOcr {
    fn name(&self) -> &'static str {
        "cloud-vision"
    }

    fn extract_text<'a>(
        &'a self,
        image: &'a SourceImage,
        progress: Progress,
    ) -> BoxFuture<'a, Result<String, OcrError>> {
        self.annotate(image, progress).boxed()
    }
}

fn parse_response(body: &str) -> Result<String, OcrError> {
    let response: AnnotateResponse = serde_json::from_str(body)
        .map_err(|e| OcrError::Upstream(format!("malformed response: {e}")))?;

    if let Some(error) = response.error {
        return Err(OcrError::Upstream(error.message));
    }
    let annotation = response
        .responses
        .into_iter()
        .next()
        .ok_or(OcrError::NoTextDetected)?;
    if let Some(error) = annotation.error {
        return Err(OcrError::Upstream(error.message));
    }
    match annotation.full_text_annotation {
        Some(found) => non_empty(&found.text),
        None => Err(OcrError::NoTextDetected),
    }
}
