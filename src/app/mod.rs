// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/mod.rs
//
// Application layer: state, messages, update loop and the crop view.

pub mod message;
pub mod model;
pub mod runner;
pub mod update;
pub mod view;

pub use message::AppMessage;
pub use model::{AppModel, DocumentKind};
pub use runner::Runner;
