// SPDX-License-Identifier: GPL-3.0-only

//! Layout parsing logic for loading JSON layout documents.
//!
//! Parsing happens in three steps: the JSON text is deserialized into a
//! [`KeyboardDocument`], the document is validated (fixing what can be
//! fixed), and the keyboard is built through the model API.

use std::fs;

use crate::layout::builder::build_keyboard;
use crate::layout::types::{KeyboardDocument, ParseError, ParseResult};
use crate::layout::validation::validate_document;
use crate::model::Keyboard;

/// Parses a keyboard layout from a JSON file.
///
/// I/O errors (file not found, permission denied, etc.) and JSON errors
/// (malformed JSON, missing required fields, etc.) are reported separately,
/// both with the file path attached.
///
/// # Arguments
///
/// * `path` - Path to the JSON layout file
///
/// # Returns
///
/// Returns a `ParseResult` containing the keyboard and any warnings,
/// or a `ParseError` if parsing fails.
///
/// # Example
///
/// ```rust,ignore
/// use oskboard::layout::parser::parse_layout_file;
///
/// match parse_layout_file("layouts/us.json") {
///     Ok(result) => {
///         println!("Loaded {} keys", result.layout.keys().count());
///         if result.has_warnings() {
///             println!("Warnings: {}", result.warning_count());
///         }
///     }
///     Err(e) => eprintln!("Failed to parse layout: {}", e),
/// }
/// ```
pub fn parse_layout_file(path: &str) -> Result<ParseResult<Keyboard>, ParseError> {
    let json_str = fs::read_to_string(path).map_err(|e| ParseError::io_error_with_path(e, path))?;

    let result = parse_layout_from_string(&json_str).map_err(|e| e.with_file_path(path))?;

    tracing::info!(
        "Loaded layout {} ({} key(s), {} warning(s))",
        path,
        result.layout.keys().count(),
        result.warning_count()
    );
    Ok(result)
}

/// Parses a keyboard layout from a JSON string.
///
/// Use this when the JSON content is already in memory, or for testing.
/// Warnings are logged as well as returned.
pub fn parse_layout_from_string(json: &str) -> Result<ParseResult<Keyboard>, ParseError> {
    let result = parse_document(json)?;

    for warning in &result.warnings {
        tracing::warn!("{}", warning);
    }

    let keyboard = build_keyboard(&result.layout)?;
    Ok(result.map(|_| keyboard))
}

/// Parses and validates a layout document without building the keyboard.
pub fn parse_document(json: &str) -> Result<ParseResult<KeyboardDocument>, ParseError> {
    let mut document: KeyboardDocument = serde_json::from_str(json).map_err(ParseError::json_error)?;

    let warnings = validate_document(&mut document)?;
    Ok(ParseResult::with_warnings(document, warnings))
}

// ============================================================================
// Tests
// ============================================================================
