// SPDX-License-Identifier: GPL-3.0-or-later
// src/services/solver/openai.rs
//
// Chat-completion solver (OpenAI-compatible API).

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::{SolveError, Solver};
use crate::config::AppConfig;
use crate::constant::OPENAI_KEY_VAR;
use crate::services::ApiError;

const SYSTEM_PROMPT: &str = "You are a helpful academic assistant that solves problems and \
    assignments. Provide detailed, step-by-step solutions with explanations. Format your \
    response using markdown, including math notation where appropriate.";

fn user_prompt(ocr_text: &str) -> String {
    format!(
        "Correct the OCR text if needed and solve the assignment questions it contains. \
         Return the solution with clear, step-by-step markdown formatting.\n\nOCR Text: {ocr_text}"
    )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiSolver {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
}

impl OpenAiSolver {
    pub fn new(client: reqwest::Client, config: &AppConfig, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: config.openai_endpoint.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
            temperature: config.temperature,
            api_key,
        }
    }

    async fn complete(&self, text: &str) -> Result<String, SolveError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SolveError::MissingCredential { var: OPENAI_KEY_VAR })?;

        let prompt = user_prompt(text);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: self.temperature,
        };

        log::debug!("Requesting solution from {} ({})", self.endpoint, self.model);
        let body = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?
            .text()
            .await?;
        parse_completion(&body)
    }
}

impl Solver for OpenAiSolver {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn solve<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<String, SolveError>> {
        self.complete(text).boxed()
    }
}

fn parse_completion(body: &str) -> Result<String, SolveError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| SolveError::Upstream(format!("malformed response: {e}")))?;
    if let Some(error) = response.error {
        return Err(SolveError::Upstream(error.message));
    }
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(SolveError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_ocr_text() {
        let prompt = user_prompt("What is 2 + 2?");
        assert!(prompt.starts_with("Correct the OCR text"));
        assert!(prompt.ends_with("OCR Text: What is 2 + 2?"));
    }

    #[test]
    fn request_serializes_like_the_chat_api() {
        let request = ChatRequest {
            model: "gpt-4",
            messages: [
                ChatMessage { role: "system", content: "sys" },
                ChatMessage { role: "user", content: "usr" },
            ],
            temperature: 0.5,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "model": "gpt-4",
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "usr" }
                ],
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn first_choice_is_the_solution() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"**Step 1:** x = 3"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "**Step 1:** x = 3");
    }

    #[test]
    fn api_error_message_is_kept() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        let Err(SolveError::Upstream(msg)) = parse_completion(body) else {
            panic!("expected upstream error");
        };
        assert_eq!(msg, "Incorrect API key provided");
    }

    #[test]
    fn no_choices_is_empty() {
        assert!(matches!(parse_completion(r#"{"choices":[]}"#), Err(SolveError::EmptyResponse)));
        assert!(matches!(
            parse_completion(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(SolveError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn missing_key_is_reported() {
        let solver = OpenAiSolver::new(reqwest::Client::new(), &AppConfig::default(), None);
        assert!(matches!(
            solver.solve("1 + 1").await,
            Err(SolveError::MissingCredential { var: OPENAI_KEY_VAR })
        ));
    }

    #[test]
    fn trailing_slash_is_dropped_from_endpoint() {
        let config = AppConfig {
            openai_endpoint: "http://localhost:8080/v1/".to_string(),
            ..AppConfig::default()
        };
        let solver = OpenAiSolver::new(reqwest::Client::new(), &config, None);
        assert_eq!(solver.endpoint, "http://localhost:8080/v1");
    }
}
