// SPDX-License-Identifier: GPL-3.0-only

//! Values the renderer hands to a drawing backend.
//!
//! All lengths are in output units (keyboard units times the renderer
//! scale). Key bounds inside a [`SectionScene`] are relative to the
//! section origin, before the section rotation is applied.

use serde::{Deserialize, Serialize};

use crate::model::{Bounds, KeyId, Point, SectionId};
use crate::renderer::theme::Color;

/// Text placed on a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyLabel {
    pub text: String,
    pub font_size: f64,
    /// Width available to the text inside the key border.
    pub max_width: f64,
    /// Cut overflowing text with an ellipsis instead of letting it spill.
    pub ellipsize: bool,
    /// Top-left corner of the text, relative to the key's top-left corner.
    pub position: Point,
    pub color: Color,
}

/// What is drawn on top of a key outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyFace {
    Blank,
    Label(KeyLabel),
    Icon { name: String },
}

/// Transform a backend applies before painting a key in its own surface.
///
/// The backend scales by `scale`, then translates by `translate`, then
/// rotates by `angle` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyTransform {
    pub scale: f64,
    pub translate: Point,
    pub angle: f64,
}

impl KeyTransform {
    pub const IDENTITY: KeyTransform = KeyTransform {
        scale: 1.0,
        translate: Point::new(0.0, 0.0),
        angle: 0.0,
    };
}

/// One rendered key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyScene<S> {
    pub key: KeyId,
    pub bounds: Bounds,
    /// Cached outline surface; `None` for keys without an outline.
    pub outline: Option<S>,
    pub face: KeyFace,
}

/// A standalone key render, as returned by `Renderer::render_key`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedKey<S> {
    pub scene: KeyScene<S>,
    pub transform: KeyTransform,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionScene<S> {
    pub section: SectionId,
    /// Section origin in output units.
    pub origin: Point,
    /// Rotation about `origin`, in degrees.
    pub angle: f64,
    pub keys: Vec<KeyScene<S>>,
}

/// Everything needed to compose the whole keyboard.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardScene<S> {
    pub width: f64,
    pub height: f64,
    pub background: Color,
    pub foreground: Color,
    pub sections: Vec<SectionScene<S>>,
}
