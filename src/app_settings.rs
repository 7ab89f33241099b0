// SPDX-License-Identifier: GPL-3.0-only

//! Centralized settings and constants.

/// Application name, used as the default log target filter.
pub const APP_NAME: &str = "oskboard";

/// Layout document format version written by the layout writer.
pub const LAYOUT_VERSION: u64 = 1;

/// Default key border width in keyboard units.
pub const DEFAULT_BORDER_WIDTH: f64 = 1.0;

/// Font size used when the keyboard has no keys to measure.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Label size of function symbols relative to letters.
pub const FUNCTION_LABEL_SCALE: f64 = 0.5;

/// Label size of key names relative to letters.
pub const KEYNAME_LABEL_SCALE: f64 = 0.5;

/// Factor applied to `|background - foreground|` for the border color.
pub const BORDER_COLOR_FACTOR: f64 = 0.7;

/// Label measured for keys without a letter symbol.
pub const FALLBACK_MEASURE_LABEL: &str = "M";

/// Approximate glyph advance of the display-list backend, per unit of font
/// size.
pub const APPROX_GLYPH_WIDTH: f64 = 0.6;

/// Approximate line height of the display-list backend, per unit of font
/// size.
pub const APPROX_LINE_HEIGHT: f64 = 1.2;
