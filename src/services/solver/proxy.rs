// SPDX-License-Identifier: GPL-3.0-or-later
// src/services/solver/proxy.rs
//
// Solver through a backend proxy that holds the LLM key.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Deserialize;

use super::{SolveError, Solver};

#[derive(Deserialize)]
struct ProxyResponse {
    solution: Option<String>,
    message: Option<String>,
}

pub struct ProxySolver {
    client: reqwest::Client,
    url: String,
}

impl ProxySolver {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    async fn forward(&self, text: &str) -> Result<String, SolveError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;
        let ok = response.status().is_success();
        let body = response.text().await?;
        parse_response(ok, &body)
    }
}

impl Solver for ProxySolver {
    fn name(&self) -> &'static str {
        "solver-proxy"
    }

    fn solve<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<String, SolveError>> {
        self.forward(text).boxed()
    }
}

fn parse_response(ok: bool, body: &str) -> Result<String, SolveError> {
    let parsed: Option<ProxyResponse> = serde_json::from_str(body).ok();
    if !ok {
        return Err(SolveError::Upstream(
            parsed
                .and_then(|p| p.message)
                .unwrap_or_else(|| "error generating solution".to_string()),
        ));
    }
    parsed
        .and_then(|p| p.solution)
        .filter(|s| !s.trim().is_empty())
        .ok_or(SolveError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solution_field_is_returned() {
        assert_eq!(parse_response(true, r#"{"solution":"x = 4"}"#).unwrap(), "x = 4");
    }

    #[test]
    fn failure_uses_proxy_message() {
        let Err(SolveError::Upstream(msg)) = parse_response(false, r#"{"message":"rate limited"}"#)
        else {
            panic!("expected upstream error");
        };
        assert_eq!(msg, "rate limited");
    }

    #[test]
    fn missing_solution_is_empty() {
        assert!(matches!(parse_response(true, "{}"), Err(SolveError::EmptyResponse)));
    }
}
