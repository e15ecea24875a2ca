// SPDX-License-Identifier: GPL-3.0-or-later
// src/config.rs
//
// Global configuration loaded from a RON file, plus credentials from the environment.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::constant::{
    CONFIG_DIR, CONFIG_FILE, DEFAULT_THRESHOLD, GOOGLE_KEY_VAR, MAX_CANVAS_WIDTH, MAX_CROP_PIXELS,
    MIN_DRAG_DISTANCE, OPENAI_KEY_VAR,
};

/// Global configuration for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Maximum preview canvas width (e.g., 800 px).
    pub max_canvas_width: u32,
    /// Minimum drag distance in canvas pixels before a selection is committed.
    pub min_drag_distance: f32,
    /// Largest crop (in source pixels) that will be rasterized.
    pub max_crop_pixels: u64,
    /// Tesseract language code for typed documents.
    pub ocr_language: String,
    /// Executable used for local OCR.
    pub tesseract_command: String,
    /// Whether typed documents are binarized before local OCR.
    pub preprocess_typed: bool,
    /// Binarization cutoff (average RGB above this turns white).
    pub threshold: u8,
    /// Language hints passed to the cloud vision service.
    pub vision_language_hints: Vec<String>,
    /// Cloud vision annotate endpoint.
    pub vision_endpoint: String,
    /// Base URL of the chat completion API.
    pub openai_endpoint: String,
    /// Chat completion model name.
    pub openai_model: String,
    /// Sampling temperature for the solver.
    pub temperature: f32,
    /// Optional backend proxy for handwritten OCR (keeps the key off the client).
    pub ocr_proxy_url: Option<String>,
    /// Optional backend proxy for the solver.
    pub solver_proxy_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_canvas_width: MAX_CANVAS_WIDTH,
            min_drag_distance: MIN_DRAG_DISTANCE,
            max_crop_pixels: MAX_CROP_PIXELS,
            ocr_language: "eng".to_string(),
            tesseract_command: "tesseract".to_string(),
            preprocess_typed: true,
            threshold: DEFAULT_THRESHOLD,
            vision_language_hints: vec!["en".to_string()],
            vision_endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            openai_endpoint: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4".to_string(),
            temperature: 0.5,
            ocr_proxy_url: None,
            solver_proxy_url: None,
        }
    }
}

impl AppConfig {
    /// Default location of the config file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the config from the default location, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path().filter(|p| p.exists()) else {
            return Self::default();
        };
        Self::load_from(&path).unwrap_or_else(|e| {
            log::warn!("Ignoring config at {}: {e:#}", path.display());
            Self::default()
        })
    }

    /// Load the config from an explicit path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    fn parse(data: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(data)?)
    }
}

/// Service keys. Only ever read from the environment, never from the config file.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub google_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: read_key(OPENAI_KEY_VAR),
            google_api_key: read_key(GOOGLE_KEY_VAR),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<set>"))
            .field("google_api_key", &self.google_api_key.as_ref().map(|_| "<set>"))
            .finish()
    }
}

fn read_key(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
