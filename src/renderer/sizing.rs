// SPDX-License-Identifier: GPL-3.0-only

//! Sizing calculations for the keyboard renderer.
//!
//! # Scale
//!
//! The renderer draws the keyboard at a uniform scale chosen so the whole
//! keyboard fits the allocation: `min(width / keyboard.width, height /
//! keyboard.height)`.
//!
//! # Font Sizes
//!
//! The letter font size is the largest size at which every letter label
//! fits its key. Each key starts from its long side and shrinks by the
//! factor its measured label overflows the key. The smallest result over
//! all keys wins. Function and key-name labels use fixed fractions of the
//! letter size.

use serde::{Deserialize, Serialize};

use crate::app_settings::FALLBACK_MEASURE_LABEL;
use crate::config::RendererConfig;
use crate::model::{Bounds, Keyboard, SymbolCategory};
use crate::renderer::backend::DrawingBackend;

// ============================================================================
// Scale
// ============================================================================

/// Calculates the uniform scale fitting `keyboard` into an allocation.
///
/// # Arguments
///
/// * `keyboard` - Natural bounds of the keyboard
/// * `width` - Allocation width
/// * `height` - Allocation height
///
/// # Returns
///
/// `None` if the keyboard or the allocation has no area.
///
/// # Example
///
/// ```rust,ignore
/// let scale = calculate_scale(Bounds::new(0.0, 0.0, 400.0, 100.0), 800.0, 300.0);
/// // width ratio 2.0, height ratio 3.0
/// assert_eq!(scale, Some(2.0));
/// ```
pub fn calculate_scale(keyboard: Bounds, width: f64, height: f64) -> Option<f64> {
    if keyboard.width <= 0.0 || keyboard.height <= 0.0 || width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some((width / keyboard.width).min(height / keyboard.height))
}

/// Factor that shrinks a key's content so a border of `border_width` fits
/// inside the key bounds.
pub fn border_inset_scale(bounds: Bounds, border_width: f64) -> f64 {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return 1.0;
    }
    ((bounds.width - border_width) / bounds.width)
        .min((bounds.height - border_width) / bounds.height)
        .max(0.0)
}

// ============================================================================
// Text Properties
// ============================================================================

/// How labels of a symbol category are set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextProperty {
    /// Size relative to the letter font size.
    pub scale: f64,
    /// Cut overflowing text with an ellipsis.
    pub ellipsize: bool,
}

/// Text property for a symbol category.
///
/// Letters use the full letter size; function symbols and key names are
/// smaller and key names are ellipsized. Other categories are set like
/// letters.
pub fn text_property(category: SymbolCategory, config: &RendererConfig) -> TextProperty {
    match category {
        SymbolCategory::Function => TextProperty {
            scale: config.function_label_scale,
            ellipsize: false,
        },
        SymbolCategory::Keyname => TextProperty {
            scale: config.keyname_label_scale,
            ellipsize: true,
        },
        _ => TextProperty {
            scale: 1.0,
            ellipsize: false,
        },
    }
}

// ============================================================================
// Font Sizes
// ============================================================================

/// Base font sizes per label kind, in keyboard units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSizes {
    pub letter: f64,
    pub function: f64,
    pub keyname: f64,
}

impl FontSizes {
    /// Derives the function and key-name sizes from the letter size.
    pub fn from_letter_size(letter: f64, config: &RendererConfig) -> Self {
        Self {
            letter,
            function: letter * text_property(SymbolCategory::Function, config).scale,
            keyname: letter * text_property(SymbolCategory::Keyname, config).scale,
        }
    }

    pub fn for_category(&self, category: SymbolCategory) -> f64 {
        match category {
            SymbolCategory::Function => self.function,
            SymbolCategory::Keyname => self.keyname,
            _ => self.letter,
        }
    }
}

/// Largest letter font size that fits every attached key.
///
/// Keys whose current symbol is not a labelled letter are measured with
/// `"M"`. Keys without area are skipped. Returns `fallback` when nothing
/// could be measured.
pub fn calculate_letter_font_size<B: DrawingBackend + ?Sized>(
    keyboard: &Keyboard,
    backend: &B,
    fallback: f64,
) -> f64 {
    let mut size = f64::MAX;

    for (_, key) in keyboard.keys() {
        let Some(element) = keyboard.element(key) else {
            continue;
        };
        let bounds = element.bounds();
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            continue;
        }

        let label = keyboard
            .symbol_for_key(key)
            .filter(|symbol| symbol.category == SymbolCategory::Letter)
            .and_then(|symbol| symbol.label.as_deref())
            .unwrap_or(FALLBACK_MEASURE_LABEL);

        let mut candidate = bounds.long_side();
        let extents = backend.measure_text(label, candidate);

        let mut sx = 1.0;
        let mut sy = 1.0;
        if extents.width > bounds.width {
            sx = bounds.width / extents.width;
        }
        if extents.height > bounds.height {
            sy = bounds.height / extents.height;
        }
        candidate *= f64::min(sx, sy);

        size = size.min(candidate);
    }

    if size == f64::MAX { fallback } else { size }
}

/// Computes all font sizes for `keyboard`.
pub fn calculate_font_sizes<B: DrawingBackend + ?Sized>(
    keyboard: &Keyboard,
    backend: &B,
    config: &RendererConfig,
) -> FontSizes {
    let letter = calculate_letter_font_size(keyboard, backend, config.default_font_size);
    FontSizes::from_letter_size(letter, config)
}

// ============================================================================
// Tests
// ============================================================================
