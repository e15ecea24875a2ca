// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/update.rs
//
// State transitions. Side effects are returned to the runner, never performed here.

use std::path::PathBuf;

use crate::app::message::AppMessage;
use crate::app::model::{AppModel, DocumentKind};
use crate::app::view::crop::{CropOutput, LoadTicket};
use crate::domain::document::core::SourceImage;
use crate::domain::document::operations::CropError;

/// Work the runner must carry out on behalf of `update`.
#[derive(Debug)]
pub enum Effect {
    Decode { ticket: LoadTicket, path: PathBuf },
    RunOcr { kind: DocumentKind, image: SourceImage },
    RunSolve { text: String },
}

#[derive(Debug)]
pub enum UpdateResult {
    None,
    Task(Effect),
}

pub fn update(model: &mut AppModel, message: AppMessage) -> UpdateResult {
    match message {
        AppMessage::Open(path) => {
            model.clear_error();
            model.clear_results();
            // Results still in flight belong to the previous image.
            model.is_processing = false;
            let ticket = model.crop.begin_load();
            return UpdateResult::Task(Effect::Decode { ticket, path });
        }

        AppMessage::ImageDecoded { ticket, image } => {
            // Only the newest load may report a failure.
            let report = model.crop.is_current(ticket) && image.is_none();
            model.crop.finish_load(ticket, image);
            if report {
                model.set_error("Unable to read the selected image, please upload a JPEG or PNG");
            }
        }

        AppMessage::PointerDown { x, y } => model.crop.on_pointer_down(x, y),
        AppMessage::PointerMove { x, y } => model.crop.on_pointer_move(x, y),
        AppMessage::PointerUp => {
            let result = model.crop.on_pointer_up();
            handle_commit(model, result);
        }
        AppMessage::PointerLeave => {
            let result = model.crop.on_pointer_leave();
            handle_commit(model, result);
        }

        AppMessage::ResetCrop => {
            if model.crop.reset().is_some() {
                log::info!("Crop reset, using the full image");
            }
        }

        AppMessage::Process => {
            if model.is_processing {
                log::debug!("Already processing, ignoring request");
                return UpdateResult::None;
            }
            let Some(image) = model.crop.current().cloned() else {
                model.set_error("No image loaded");
                return UpdateResult::None;
            };
            model.clear_error();
            model.clear_results();
            model.is_processing = true;
            log::info!(
                "Processing {}x{} image as {}",
                image.width(),
                image.height(),
                model.document_kind.label()
            );
            return UpdateResult::Task(Effect::RunOcr {
                kind: model.document_kind,
                image,
            });
        }

        AppMessage::OcrProgress(fraction) => {
            if model.is_processing {
                model.ocr_progress = fraction;
            }
        }

        AppMessage::OcrFinished(result) => {
            if !model.is_processing {
                return UpdateResult::None;
            }
            model.ocr_progress = 1.0;
            match result {
                Ok(text) if text.trim().is_empty() => {
                    model.is_processing = false;
                    model.set_error("No text detected in the image");
                }
                Ok(text) => {
                    model.ocr_text = Some(text.clone());
                    if model.auto_solve {
                        return UpdateResult::Task(Effect::RunSolve { text });
                    }
                    model.is_processing = false;
                }
                Err(msg) => {
                    model.is_processing = false;
                    model.set_error(msg);
                }
            }
        }

        AppMessage::SolveFinished(result) => {
            if !model.is_processing {
                return UpdateResult::None;
            }
            model.is_processing = false;
            match result {
                Ok(solution) => model.solution = Some(solution),
                Err(msg) => model.set_error(msg),
            }
        }

        AppMessage::Back => {
            model.crop.unload();
            model.clear_results();
            model.clear_error();
            model.is_processing = false;
        }
    }

    UpdateResult::None
}

fn handle_commit(model: &mut AppModel, result: Result<Option<CropOutput>, CropError>) {
    match result {
        Ok(Some(output)) => {
            model.clear_error();
            log::debug!("Crop committed: {:?}", output.image());
        }
        Ok(None) => {}
        Err(e) => model.set_error(format!("Could not crop the image: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use image::RgbaImage;

    fn model() -> AppModel {
        AppModel::new(&AppConfig::default(), DocumentKind::Typed)
    }

    fn loaded(width: u32, height: u32) -> AppModel {
        let mut model = model();
        let UpdateResult::Task(Effect::Decode { ticket, .. }) =
            update(&mut model, AppMessage::Open(PathBuf::from("page.png")))
        else {
            panic!("open must request a decode");
        };
        let image = SourceImage::from_rgba(RgbaImage::new(width, height));
        update(&mut model, AppMessage::ImageDecoded { ticket, image });
        model
    }

    #[test]
    fn decoded_image_is_installed() {
        let model = loaded(1600, 1200);
        assert_eq!(model.crop.source().unwrap().dimensions(), (1600, 1200));
        assert!(model.error.is_none());
    }

    #[test]
    fn stale_decode_does_not_win() {
        let mut model = model();
        let UpdateResult::Task(Effect::Decode { ticket: first, .. }) =
            update(&mut model, AppMessage::Open("a.png".into()))
        else {
            panic!()
        };
        let UpdateResult::Task(Effect::Decode { ticket: second, .. }) =
            update(&mut model, AppMessage::Open("b.png".into()))
        else {
            panic!()
        };
        update(&mut model, AppMessage::ImageDecoded {
            ticket: second,
            image: SourceImage::from_rgba(RgbaImage::new(300, 200)),
        });
        update(&mut model, AppMessage::ImageDecoded {
            ticket: first,
            image: SourceImage::from_rgba(RgbaImage::new(1600, 1200)),
        });
        assert_eq!(model.crop.source().unwrap().dimensions(), (300, 200));
    }

    #[test]
    fn failed_decode_reports_an_error() {
        let mut model = model();
        let UpdateResult::Task(Effect::Decode { ticket, .. }) =
            update(&mut model, AppMessage::Open("broken.png".into()))
        else {
            panic!()
        };
        update(&mut model, AppMessage::ImageDecoded { ticket, image: None });
        assert!(model.error.is_some());
    }

    #[test]
    fn process_uses_cropped_image() {
        let mut model = loaded(1600, 1200);
        update(&mut model, AppMessage::PointerDown { x: 100.0, y: 100.0 });
        update(&mut model, AppMessage::PointerMove { x: 300.0, y: 250.0 });
        update(&mut model, AppMessage::PointerUp);

        let UpdateResult::Task(Effect::RunOcr { kind, image }) =
            update(&mut model, AppMessage::Process)
        else {
            panic!("process must start OCR");
        };
        assert_eq!(kind, DocumentKind::Typed);
        assert_eq!(image.dimensions(), (400, 300));
        assert!(model.is_processing);
    }

    #[test]
    fn process_after_reset_uses_original() {
        let mut model = loaded(1600, 1200);
        update(&mut model, AppMessage::PointerDown { x: 100.0, y: 100.0 });
        update(&mut model, AppMessage::PointerMove { x: 300.0, y: 250.0 });
        update(&mut model, AppMessage::PointerLeave);
        update(&mut model, AppMessage::ResetCrop);

        let UpdateResult::Task(Effect::RunOcr { image, .. }) = update(&mut model, AppMessage::Process)
        else {
            panic!()
        };
        assert_eq!(image.dimensions(), (1600, 1200));
    }

    #[test]
    fn process_without_image_is_an_error() {
        let mut model = model();
        assert!(matches!(update(&mut model, AppMessage::Process), UpdateResult::None));
        assert_eq!(model.error.as_deref(), Some("No image loaded"));
    }

    #[test]
    fn second_process_is_ignored_while_busy() {
        let mut model = loaded(100, 100);
        assert!(matches!(update(&mut model, AppMessage::Process), UpdateResult::Task(_)));
        assert!(matches!(update(&mut model, AppMessage::Process), UpdateResult::None));
    }

    #[test]
    fn ocr_text_flows_into_solve() {
        let mut model = loaded(100, 100);
        update(&mut model, AppMessage::Process);
        update(&mut model, AppMessage::OcrProgress(0.4));
        assert_eq!(model.ocr_progress, 0.4);

        let UpdateResult::Task(Effect::RunSolve { text }) =
            update(&mut model, AppMessage::OcrFinished(Ok("2x = 6".into())))
        else {
            panic!("OCR text must be solved");
        };
        assert_eq!(text, "2x = 6");
        assert!(model.is_processing);

        update(&mut model, AppMessage::SolveFinished(Ok("x = 3".into())));
        assert!(!model.is_processing);
        assert_eq!(model.ocr_text.as_deref(), Some("2x = 6"));
        assert_eq!(model.solution.as_deref(), Some("x = 3"));
    }

    #[test]
    fn ocr_only_stops_after_text() {
        let mut model = loaded(100, 100);
        model.auto_solve = false;
        update(&mut model, AppMessage::Process);
        assert!(matches!(
            update(&mut model, AppMessage::OcrFinished(Ok("text".into()))),
            UpdateResult::None
        ));
        assert!(!model.is_processing);
        assert_eq!(model.ocr_text.as_deref(), Some("text"));
    }

    #[test]
    fn empty_ocr_text_skips_solving() {
        let mut model = loaded(100, 100);
        update(&mut model, AppMessage::Process);
        assert!(matches!(
            update(&mut model, AppMessage::OcrFinished(Ok("  \n".into()))),
            UpdateResult::None
        ));
        assert!(!model.is_processing);
        assert_eq!(model.error.as_deref(), Some("No text detected in the image"));
    }

    #[test]
    fn ocr_failure_is_shown() {
        let mut model = loaded(100, 100);
        update(&mut model, AppMessage::Process);
        update(&mut model, AppMessage::OcrFinished(Err("GOOGLE_API_KEY is not set".into())));
        assert!(!model.is_processing);
        assert!(model.solution.is_none());
        assert_eq!(model.error.as_deref(), Some("GOOGLE_API_KEY is not set"));
    }

    #[test]
    fn solve_failure_keeps_ocr_text() {
        let mut model = loaded(100, 100);
        update(&mut model, AppMessage::Process);
        update(&mut model, AppMessage::OcrFinished(Ok("q".into())));
        update(&mut model, AppMessage::SolveFinished(Err("network down".into())));
        assert_eq!(model.ocr_text.as_deref(), Some("q"));
        assert_eq!(model.error.as_deref(), Some("network down"));
    }

    #[test]
    fn oversized_crop_surfaces_error() {
        let config = AppConfig {
            max_crop_pixels: 10,
            ..AppConfig::default()
        };
        let mut model = AppModel::new(&config, DocumentKind::Handwritten);
        model.crop.load(SourceImage::from_rgba(RgbaImage::new(200, 200)).unwrap());
        update(&mut model, AppMessage::PointerDown { x: 0.0, y: 0.0 });
        update(&mut model, AppMessage::PointerMove { x: 50.0, y: 50.0 });
        update(&mut model, AppMessage::PointerUp);
        assert!(model.error.as_deref().unwrap().starts_with("Could not crop"));
        assert_eq!(model.crop.current().unwrap().dimensions(), (200, 200));
    }

    #[test]
    fn back_clears_the_session() {
        let mut model = loaded(100, 100);
        update(&mut model, AppMessage::Process);
        update(&mut model, AppMessage::Back);
        assert!(model.crop.current().is_none());
        assert!(!model.is_processing);
        // Late results from the abandoned run are dropped.
        assert!(matches!(
            update(&mut model, AppMessage::OcrFinished(Ok("late".into()))),
            UpdateResult::None
        ));
        assert!(model.ocr_text.is_none());
    }

    #[test]
    fn open_abandons_the_running_process() {
        let mut model = loaded(100, 100);
        update(&mut model, AppMessage::Process);
        update(&mut model, AppMessage::Open(PathBuf::from("next.png")));
        assert!(!model.is_processing);
        assert!(matches!(
            update(&mut model, AppMessage::OcrFinished(Ok("old page".into()))),
            UpdateResult::None
        ));
        assert!(matches!(
            update(&mut model, AppMessage::SolveFinished(Ok("old answer".into()))),
            UpdateResult::None
        ));
        assert!(model.ocr_text.is_none());
        assert!(model.solution.is_none());
    }

    #[test]
    fn ocr_progress_only_records_the_fraction() {
        let mut model = loaded(100, 100);
        update(&mut model, AppMessage::Process);
        assert!(matches!(
            update(&mut model, AppMessage::OcrProgress(0.4)),
            UpdateResult::None
        ));
        assert_eq!(model.ocr_progress, 0.4);
    }
}
