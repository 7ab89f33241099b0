// SPDX-License-Identifier: GPL-3.0-only

//! Colors used when painting keys.
//!
//! Theme cascades are outside the renderer; it only knows a default
//! foreground and background, the background of pressed keys, and a border
//! color derived from the first two.
//!
//! - `Color`: RGBA with components in `0.0..=1.0`
//! - `border_color`: `|background - foreground| * 0.7`, keeping the
//!   foreground's alpha

use serde::{Deserialize, Serialize};

use crate::app_settings::BORDER_COLOR_FACTOR;

// ============================================================================
// Color
// ============================================================================

/// RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    #[serde(default = "opaque")]
    pub alpha: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Multiplies the color channels (not alpha) by `factor`.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self {
            red: self.red * factor,
            green: self.green * factor,
            blue: self.blue * factor,
            alpha: self.alpha,
        }
    }

    pub fn approx_eq(&self, other: &Color, epsilon: f64) -> bool {
        (self.red - other.red).abs() <= epsilon
            && (self.green - other.green).abs() <= epsilon
            && (self.blue - other.blue).abs() <= epsilon
            && (self.alpha - other.alpha).abs() <= epsilon
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Default label and border source color.
pub fn default_foreground_color() -> Color {
    Color::BLACK
}

/// Default key fill color.
pub fn default_background_color() -> Color {
    Color::WHITE
}

/// Default fill for pressed keys.
pub fn default_pressed_background_color() -> Color {
    Color::rgb(0.75, 0.75, 0.75)
}

/// Border color derived from a key's background and foreground.
///
/// # Arguments
///
/// * `background` - Fill color of the key
/// * `foreground` - Label color of the key
///
/// # Returns
///
/// The per-channel absolute difference scaled by 0.7, with the
/// foreground's alpha.
pub fn border_color(background: Color, foreground: Color) -> Color {
    Color::rgba(
        (background.red - foreground.red).abs() * BORDER_COLOR_FACTOR,
        (background.green - foreground.green).abs() * BORDER_COLOR_FACTOR,
        (background.blue - foreground.blue).abs() * BORDER_COLOR_FACTOR,
        foreground.alpha,
    )
}

// ============================================================================
// Tests
// ============================================================================
