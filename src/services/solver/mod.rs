// SPDX-License-Identifier: GPL-3.0-or-later
// src/services/solver/mod.rs
//
// Solve capability: turn OCR text into a formatted, step-by-step solution.

mod openai;
mod proxy;

pub use openai::OpenAiSolver;
pub use proxy::ProxySolver;

use futures_util::future::BoxFuture;

#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error("{var} is not set, the solver needs an API key")]
    MissingCredential { var: &'static str },
    #[error("solver service error: {0}")]
    Upstream(String),
    #[error("could not reach the solver, check your network connection ({0})")]
    Network(#[from] reqwest::Error),
    #[error("the solver returned no answer")]
    EmptyResponse,
}

pub trait Solver: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Produce a Markdown solution for the assignment in `text`.
    fn solve<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<String, SolveError>>;
}
