// SPDX-License-Identifier: GPL-3.0-only

//! Oskboard - An on-screen keyboard model and rendering engine
//!
//! This crate models a virtual keyboard as a tree of elements and computes
//! everything a drawing toolkit needs to show it: scaled and rotated key
//! geometry, hit-testing, label sizes and cached key surfaces.
//!
//! # Architecture
//!
//! The crate consists of two layers:
//!
//! 1. **Model** (`model`): The keyboard tree (keyboard, sections, keys), the
//!    outline registry, symbol matrices and the modifier state machine. Key
//!    presses bubble through a synchronous listener registry.
//!
//! 2. **Renderer** (`renderer`): Maps the model to output coordinates for an
//!    allocation and drives a pluggable drawing backend, caching outline
//!    surfaces until the model changes.
//!
//! Keyboards are usually loaded from JSON layout documents (`layout`).
//!
//! # Modules
//!
//! - `app_settings`: Centralized constants
//! - `config`: Renderer configuration loaded from JSON
//! - `error`: Errors raised by the model
//! - `layout`: Layout document parsing, validation and writing
//! - `model`: The keyboard tree and its state
//! - `renderer`: Geometry, hit-testing and rendering

pub mod app_settings;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod renderer;

pub use crate::config::RendererConfig;
pub use crate::error::ModelError;
pub use crate::layout::{parse_layout_file, parse_layout_from_string, ParseError, ParseResult};
pub use crate::model::Keyboard;
pub use crate::renderer::{RenderError, Renderer};

// ============================================================================
// Integration Tests
// ============================================================================
