// SPDX-License-Identifier: GPL-3.0-or-later
// src/main.rs
//
// Entry point: parse arguments, set up logging and run one solving session.

mod app;
mod config;
mod constant;
mod domain;
mod services;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use crate::app::{AppMessage, AppModel, DocumentKind, Runner};
use crate::config::{AppConfig, Credentials};
use crate::services::Services;

/// Photograph an assignment, crop it, read it and get a step-by-step solution.
#[derive(Debug, Clone, Parser)]
#[command(name = "snapsolve", version, about)]
pub struct Args {
    /// Image of the assignment page (JPEG or PNG).
    pub file: PathBuf,

    /// Kind of text on the page; picks the OCR backend.
    #[arg(long, value_enum, default_value_t = DocumentKind::Typed)]
    pub kind: DocumentKind,

    /// Region to keep, as a drag in preview-canvas pixels: X0,Y0:X1,Y1.
    #[arg(long, value_parser = parse_drag)]
    pub select: Option<Drag>,

    /// Write the preview canvas (with the selection drawn) to this PNG.
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Write the image that will be processed to this file.
    #[arg(long)]
    pub save_crop: Option<PathBuf>,

    /// Also write the extracted text to this file.
    #[arg(long, value_name = "PATH")]
    pub save_text: Option<PathBuf>,

    /// Also write the solution to this file.
    #[arg(long, value_name = "PATH")]
    pub save_solution: Option<PathBuf>,

    /// Stop after text extraction.
    #[arg(long)]
    pub ocr_only: bool,

    /// Config file to use instead of the default location.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// A pointer drag between two canvas points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub from: (f32, f32),
    pub to: (f32, f32),
}

fn parse_point(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in `{s}`: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in `{s}`: {e}"))?;
    Ok((x, y))
}

fn parse_drag(s: &str) -> Result<Drag, String> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| format!("expected X0,Y0:X1,Y1 but got `{s}`"))?;
    Ok(Drag {
        from: parse_point(from)?,
        to: parse_point(to)?,
    })
}

/// Write a result text next to the printed output.
fn write_text(path: &Path, text: &str) -> anyhow::Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Text written to {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    log::debug!("Using config {config:?}");

    let services = Services::new(&config, &Credentials::from_env());
    let mut model = AppModel::new(&config, args.kind);
    model.auto_solve = !args.ocr_only;
    let mut runner = Runner::new(model, services);

    runner.dispatch(AppMessage::Open(args.file.clone())).await;
    if let Some(err) = runner.model().error.as_deref() {
        anyhow::bail!("{err}");
    }

    if let Some(drag) = args.select {
        runner
            .dispatch(AppMessage::PointerDown {
                x: drag.from.0,
                y: drag.from.1,
            })
            .await;
        runner
            .dispatch(AppMessage::PointerMove {
                x: drag.to.0,
                y: drag.to.1,
            })
            .await;
        runner.dispatch(AppMessage::PointerUp).await;

        let model = runner.model_mut();
        if let Some(err) = model.error.take() {
            log::warn!("{err}, continuing with the full image");
        } else if model.crop.committed().is_none() {
            log::warn!("Selection too small, continuing with the full image");
        }
    }

    if let Some(path) = &args.preview {
        runner
            .model()
            .crop
            .canvas()
            .frame()
            .save(path)
            .with_context(|| format!("Failed to write preview {}", path.display()))?;
        log::info!("Preview written to {}", path.display());
    }

    if let Some(path) = &args.save_crop {
        if let Some(image) = runner.model().crop.current() {
            image
                .save(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Image written to {}", path.display());
        }
    }

    runner.dispatch(AppMessage::Process).await;

    let model = runner.model();
    if let Some(text) = &model.ocr_text {
        println!("## Extracted Text\n\n{text}\n");
        if let Some(path) = &args.save_text {
            write_text(path, text)?;
        }
    }
    if let Some(solution) = &model.solution {
        println!("## Solution\n\n{solution}");
        if let Some(path) = &args.save_solution {
            write_text(path, solution)?;
        }
    }
    if let Some(err) = &model.error {
        anyhow::bail!("{err}");
    }
    Ok(())
}
