// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/runner.rs
//
// Drives the update loop: feeds messages in, executes the effects it asks for.

use std::collections::VecDeque;

use tokio::sync::mpsc;

use crate::app::message::AppMessage;
use crate::app::model::AppModel;
use crate::app::update::{self, Effect, UpdateResult};
use crate::domain::document::core::SourceImage;
use crate::services::Services;
use crate::services::ocr::Progress;

pub struct Runner {
    model: AppModel,
    services: Services,
}

impl Runner {
    pub fn new(model: AppModel, services: Services) -> Self {
        Self { model, services }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut AppModel {
        &mut self.model
    }

    /// Apply `message` and every follow-up message its effects produce.
    pub async fn dispatch(&mut self, message: AppMessage) {
        let mut messages = VecDeque::from([message]);
        let mut effects = VecDeque::new();
        loop {
            if let Some(effect) = effects.pop_front() {
                let outcome = self.execute(effect).await;
                messages.extend(outcome.messages);
                effects.extend(outcome.effects);
                continue;
            }
            let Some(message) = messages.pop_front() else {
                break;
            };
            if let UpdateResult::Task(effect) = update::update(&mut self.model, message) {
                effects.push_back(effect);
            }
        }
    }

    async fn execute(&mut self, effect: Effect) -> Outcome {
        match effect {
            Effect::Decode { ticket, path } => {
                let decoded = tokio::task::spawn_blocking(move || SourceImage::open(&path)).await;
                let image = match decoded {
                    Ok(Ok(image)) => Some(image),
                    Ok(Err(e)) => {
                        log::error!("{e:#}");
                        None
                    }
                    Err(e) => {
                        log::error!("Decode task failed: {e}");
                        None
                    }
                };
                Outcome::messages(vec![AppMessage::ImageDecoded { ticket, image }])
            }

            Effect::RunOcr { kind, image } => {
                let engine = self.services.ocr_for(kind);
                log::info!("Extracting text with {}", engine.name());

                let mut effects = Vec::new();
                let (tx, mut rx) = mpsc::unbounded_channel();
                let result = {
                    let mut ocr = engine.extract_text(&image, Progress::new(tx));
                    loop {
                        tokio::select! {
                            result = &mut ocr => break result,
                            Some(fraction) = rx.recv() => {
                                log::info!("OCR {:.0}%", fraction * 100.0);
                                apply(&mut self.model, AppMessage::OcrProgress(fraction), &mut effects);
                            }
                        }
                    }
                };

                let mut messages: Vec<AppMessage> = std::iter::from_fn(|| rx.try_recv().ok())
                    .map(AppMessage::OcrProgress)
                    .collect();
                messages.push(AppMessage::OcrFinished(result.map_err(|e| {
                    log::warn!("OCR failed: {e}");
                    e.to_string()
                })));
                Outcome { messages, effects }
            }

            Effect::RunSolve { text } => {
                let solver = self.services.solver();
                log::info!("Requesting solution from {}", solver.name());
                let result = solver.solve(&text).await.map_err(|e| {
                    log::warn!("Solver failed: {e}");
                    e.to_string()
                });
                Outcome::messages(vec![AppMessage::SolveFinished(result)])
            }
        }
    }
}

/// Apply a message while an effect is still running. Any work it asks
/// for is queued behind the running effect.
fn apply(model: &mut AppModel, message: AppMessage, effects: &mut Vec<Effect>) {
    if let UpdateResult::Task(effect) = update::update(model, message) {
        log::debug!("Queueing {effect:?} until the running task finishes");
        effects.push(effect);
    }
}

/// What a finished effect hands back to the loop.
struct Outcome {
    messages: Vec<AppMessage>,
    effects: Vec<Effect>,
}

impl Outcome {
    fn messages(messages: Vec<AppMessage>) -> Self {
        Self {
            messages,
            effects: Vec::new(),
        }
    }
}
