// SPDX-License-Identifier: GPL-3.0-or-later
// src/services/ocr/proxy.rs
//
// Handwritten OCR through a backend proxy that holds the cloud key.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Deserialize;

use super::{OcrEngine, OcrError, Progress, non_empty};
use crate::domain::document::core::SourceImage;
use crate::services::base64_png;

#[derive(Deserialize)]
struct ProxyResponse {
    text: Option<String>,
    message: Option<String>,
}

pub struct ProxyOcr {
    client: reqwest::Client,
    url: String,
}

impl ProxyOcr {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    async fn forward(&self, image: &SourceImage, progress: Progress) -> Result<String, OcrError> {
        progress.report(0.0);
        let body = serde_json::json!({ "image": base64_png(image)? });
        let response = self.client.post(&self.url).json(&body).send().await?;
        progress.report(0.8);

        let ok = response.status().is_success();
        let text = response.text().await?;
        progress.report(1.0);
        parse_response(ok, &text)
    }
}

impl OcrEngine for ProxyOcr {
    fn name(&self) -> &'static str {
        "ocr-proxy"
    }

    fn extract_text<'a>(
        &'a self,
        image: &'a SourceImage,
        progress: Progress,
    ) -> BoxFuture<'a, Result<String, OcrError>> {
        self.forward(image, progress).boxed()
    }
}

fn parse_response(ok: bool, body: &str) -> Result<String, OcrError> {
    let parsed: Option<ProxyResponse> = serde_json::from_str(body).ok();
    match (ok, parsed) {
        (true, Some(ProxyResponse { text: Some(text), .. })) => non_empty(&text),
        (true, Some(_)) => Err(OcrError::NoTextDetected),
        (true, None) => Err(OcrError::Upstream("malformed proxy response".to_string())),
        (false, parsed) => Err(OcrError::Upstream(
            parsed
                .and_then(|p| p.message)
                .unwrap_or_else(|| "error processing handwritten text".to_string()),
        )),
    }
}
