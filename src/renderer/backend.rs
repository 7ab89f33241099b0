// SPDX-License-Identifier: GPL-3.0-only

//! Drawing backends.
//!
//! The renderer computes geometry, colors and font sizes; a backend turns
//! them into surfaces. Surfaces are opaque to the renderer, which only
//! caches and clones them.
//!
//! [`DisplayListBackend`] is the built-in backend. It records vector draw
//! operations instead of pixels, which is enough for hosts that replay them
//! on their own canvas and for inspecting output in tests.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::app_settings::{APPROX_GLYPH_WIDTH, APPROX_LINE_HEIGHT};
use crate::model::{Bounds, Point};
use crate::renderer::scene::{KeyFace, KeyboardScene};
use crate::renderer::theme::Color;

// ============================================================================
// Backend Trait
// ============================================================================

/// Logical size of a laid-out string.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtents {
    pub width: f64,
    pub height: f64,
}

/// Paint parameters for a key outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlineStyle {
    pub fill: Color,
    pub border: Color,
    pub border_width: f64,
    pub corner_radius: f64,
}

/// A key outline ready to be painted.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineRequest<'a> {
    /// Surface size.
    pub width: f64,
    pub height: f64,
    /// Offset of the polygon inside the surface (half the border width).
    pub origin: Point,
    /// Polygon points, already scaled.
    pub points: &'a [Point],
    pub style: OutlineStyle,
}

/// Pixel or vector drawing primitives behind a renderer.
pub trait DrawingBackend {
    /// Rendered artifact. Cloning must be cheap (a handle or a shared
    /// pointer) since caches hand out clones.
    type Surface: Clone + 'static;

    /// Measures `text` laid out at `font_size`.
    fn measure_text(&self, text: &str, font_size: f64) -> TextExtents;

    /// Paints one key outline into a new surface.
    fn render_outline(&mut self, request: &OutlineRequest<'_>) -> Self::Surface;

    /// Composes the whole keyboard into a new surface.
    fn render_keyboard(&mut self, scene: &KeyboardScene<Self::Surface>) -> Self::Surface;
}

// ============================================================================
// Display List Backend
// ============================================================================

/// A recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// Fills the whole surface.
    Paint { color: Color },
    /// Rounded polygon, filled then stroked.
    Polygon {
        origin: Point,
        points: Vec<Point>,
        style: OutlineStyle,
    },
    Text {
        text: String,
        position: Point,
        font_size: f64,
        max_width: f64,
        ellipsize: bool,
        color: Color,
    },
    Icon { name: String, bounds: Bounds },
    /// Another display list drawn at `origin`, rotated by `angle` degrees.
    Surface {
        origin: Point,
        angle: f64,
        surface: Rc<DisplayList>,
    },
}

/// A sized list of draw operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayList {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Collects the text of every label in drawing order, descending into
    /// nested surfaces.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_texts(&mut out);
        out
    }

    fn collect_texts<'a>(&'a self, out: &mut Vec<&'a str>) {
        for op in &self.ops {
            match op {
                DrawOp::Text { text, .. } => out.push(text),
                DrawOp::Surface { surface, .. } => surface.collect_texts(out),
                _ => {}
            }
        }
    }
}

/// Backend recording [`DisplayList`]s with approximate text metrics.
#[derive(Debug, Clone, Default)]
pub struct DisplayListBackend {
    outlines_rendered: usize,
    keyboards_rendered: usize,
}

impl DisplayListBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of outline surfaces painted so far.
    pub fn outlines_rendered(&self) -> usize {
        self.outlines_rendered
    }

    /// Number of keyboard composites painted so far.
    pub fn keyboards_rendered(&self) -> usize {
        self.keyboards_rendered
    }
}

impl DrawingBackend for DisplayListBackend {
    type Surface = Rc<DisplayList>;

    fn measure_text(&self, text: &str, font_size: f64) -> TextExtents {
        let glyphs = text.chars().count() as f64;
        TextExtents {
            width: glyphs * font_size * APPROX_GLYPH_WIDTH,
            height: if glyphs > 0.0 {
                font_size * APPROX_LINE_HEIGHT
            } else {
                0.0
            },
        }
    }

    fn render_outline(&mut self, request: &OutlineRequest<'_>) -> Self::Surface {
        self.outlines_rendered += 1;

        let mut list = DisplayList::new(request.width, request.height);
        list.ops.push(DrawOp::Paint {
            color: Color::TRANSPARENT,
        });
        list.ops.push(DrawOp::Polygon {
            origin: request.origin,
            points: request.points.to_vec(),
            style: request.style,
        });
        Rc::new(list)
    }

    fn render_keyboard(&mut self, scene: &KeyboardScene<Self::Surface>) -> Self::Surface {
        self.keyboards_rendered += 1;

        let mut list = DisplayList::new(scene.width, scene.height);
        list.ops.push(DrawOp::Paint {
            color: scene.background,
        });

        for section in &scene.sections {
            let mut section_list = DisplayList::default();
            for key in &section.keys {
                let origin = Point::new(key.bounds.x, key.bounds.y);
                if let Some(outline) = &key.outline {
                    section_list.ops.push(DrawOp::Surface {
                        origin,
                        angle: 0.0,
                        surface: Rc::clone(outline),
                    });
                }
                match &key.face {
                    KeyFace::Label(label) => section_list.ops.push(DrawOp::Text {
                        text: label.text.clone(),
                        position: label.position.translated(origin.x, origin.y),
                        font_size: label.font_size,
                        max_width: label.max_width,
                        ellipsize: label.ellipsize,
                        color: label.color,
                    }),
                    KeyFace::Icon { name } => section_list.ops.push(DrawOp::Icon {
                        name: name.clone(),
                        bounds: key.bounds,
                    }),
                    KeyFace::Blank => {}
                }
            }
            list.ops.push(DrawOp::Surface {
                origin: section.origin,
                angle: section.angle,
                surface: Rc::new(section_list),
            });
        }

        Rc::new(list)
    }
}

// ============================================================================
// Tests
// ============================================================================
