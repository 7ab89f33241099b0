// SPDX-License-Identifier: GPL-3.0-only

//! Core data types for keyboard layout documents.
//!
//! This module defines the error types, the validation structures and the
//! serialized form of a keyboard: a tree of `"type"`-tagged objects
//! (`keyboard`, `section`, `key`) holding their fields in a fixed order.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::app_settings::LAYOUT_VERSION;
use crate::error::ModelError;
use crate::model::{
    Bounds, ModifierBehavior, ModifierMask, OutlineId, Point, Row, Symbol, SymbolCategory,
    SymbolIndex,
};

// ============================================================================
// Error Handling Types
// ============================================================================

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal error that prevents the layout from being built
    Error,
    /// Non-fatal issue; the layout was adjusted or used as is
    Warning,
}

/// A validation issue discovered while checking a layout document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Severity level (Error or Warning)
    pub severity: Severity,
    /// Human-readable description of the issue
    pub message: String,
    /// Path to the offending field (e.g., "sections[0].keys[2].oref")
    pub field_path: String,
    /// Optional suggestion for how to fix the issue
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Creates a new validation issue.
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        field_path: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            field_path: field_path.into(),
            suggestion: None,
        }
    }

    /// Creates a warning.
    pub fn warning(message: impl Into<String>, field_path: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message, field_path)
    }

    /// Creates an error.
    pub fn error(message: impl Into<String>, field_path: impl Into<String>) -> Self {
        Self::new(Severity::Error, message, field_path)
    }

    /// Adds a suggestion to the validation issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity_str = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };

        write!(f, "[{}] {}: {}", severity_str, self.field_path, self.message)?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Error type for layout parsing and writing.
#[derive(Debug)]
pub enum ParseError {
    /// I/O error while reading or writing a layout file
    IoError {
        /// The underlying I/O error
        source: std::io::Error,
        /// Optional file path that caused the error
        file_path: Option<String>,
    },

    /// JSON syntax or shape error
    JsonError {
        /// The underlying JSON error
        source: serde_json::Error,
        /// Optional file path being parsed
        file_path: Option<String>,
        /// Line number where the error occurred (from serde_json)
        line_number: Option<usize>,
    },

    /// Fatal validation issues found in the document
    ValidationError {
        /// Every issue found, errors first
        issues: Vec<ValidationIssue>,
        /// Optional file path being validated
        file_path: Option<String>,
    },

    /// The keyboard model rejected the document while building
    Model {
        /// The model error
        source: ModelError,
        /// Path of the element being built
        field_path: String,
    },
}

impl ParseError {
    /// Creates an I/O error with file path.
    pub fn io_error_with_path(source: std::io::Error, file_path: impl Into<String>) -> Self {
        Self::IoError {
            source,
            file_path: Some(file_path.into()),
        }
    }

    /// Creates a JSON error with context.
    pub fn json_error(source: serde_json::Error) -> Self {
        let line_number = Some(source.line()).filter(|&line| line > 0);
        Self::JsonError {
            source,
            file_path: None,
            line_number,
        }
    }

    /// Creates a JSON error with file path.
    pub fn json_error_with_path(source: serde_json::Error, file_path: impl Into<String>) -> Self {
        match Self::json_error(source) {
            Self::JsonError {
                source,
                line_number,
                ..
            } => Self::JsonError {
                source,
                file_path: Some(file_path.into()),
                line_number,
            },
            other => other,
        }
    }

    /// Creates a validation error from a list of issues.
    pub fn validation_error(issues: Vec<ValidationIssue>) -> Self {
        Self::ValidationError {
            issues,
            file_path: None,
        }
    }

    /// Creates a model error at `field_path`.
    pub fn model(source: ModelError, field_path: impl Into<String>) -> Self {
        Self::Model {
            source,
            field_path: field_path.into(),
        }
    }

    /// Attaches a file path to errors that carry one.
    pub fn with_file_path(self, path: &str) -> Self {
        match self {
            Self::IoError { source, .. } => Self::IoError {
                source,
                file_path: Some(path.to_string()),
            },
            Self::JsonError {
                source,
                line_number,
                ..
            } => Self::JsonError {
                source,
                file_path: Some(path.to_string()),
                line_number,
            },
            Self::ValidationError { issues, .. } => Self::ValidationError {
                issues,
                file_path: Some(path.to_string()),
            },
            other => other,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::IoError { source, file_path } => {
                write!(f, "I/O error")?;
                if let Some(path) = file_path {
                    write!(f, " on file '{}'", path)?;
                }
                write!(f, ": {}", source)?;
            }
            ParseError::JsonError {
                source,
                file_path,
                line_number,
            } => {
                write!(f, "JSON parsing error")?;
                if let Some(path) = file_path {
                    write!(f, " in file '{}'", path)?;
                }
                if let Some(line) = line_number {
                    write!(f, " at line {}", line)?;
                }
                write!(f, ": {}", source)?;
            }
            ParseError::ValidationError { issues, file_path } => {
                write!(f, "Validation failed")?;
                if let Some(path) = file_path {
                    write!(f, " for file '{}'", path)?;
                }
                writeln!(f, " with {} issue(s):", issues.len())?;
                for (i, issue) in issues.iter().enumerate() {
                    write!(f, "  {}. {}", i + 1, issue)?;
                    if i + 1 < issues.len() {
                        writeln!(f)?;
                    }
                }
            }
            ParseError::Model { source, field_path } => {
                write!(f, "Cannot build {}: {}", field_path, source)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::IoError { source, .. } => Some(source),
            ParseError::JsonError { source, .. } => Some(source),
            ParseError::Model { source, .. } => Some(source),
            ParseError::ValidationError { .. } => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            source: err,
            file_path: None,
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::json_error(err)
    }
}

impl From<ModelError> for ParseError {
    fn from(err: ModelError) -> Self {
        Self::model(err, "keyboard")
    }
}

// ============================================================================
// ParseResult Type
// ============================================================================

/// Result of successfully parsing a layout with optional warnings.
///
/// The parser is permissive: non-fatal issues are fixed up where possible
/// and reported here instead of failing the parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<T> {
    /// The successfully parsed layout
    pub layout: T,
    /// Non-fatal validation warnings
    pub warnings: Vec<ValidationIssue>,
}

impl<T> ParseResult<T> {
    /// Creates a new parse result with no warnings.
    pub fn new(layout: T) -> Self {
        Self {
            layout,
            warnings: Vec::new(),
        }
    }

    /// Creates a new parse result with warnings.
    pub fn with_warnings(layout: T, warnings: Vec<ValidationIssue>) -> Self {
        Self { layout, warnings }
    }

    /// Returns true if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Consumes the result and returns the layout, discarding warnings.
    pub fn into_layout(self) -> T {
        self.layout
    }

    /// Maps the layout, keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<U> {
        ParseResult {
            layout: f(self.layout),
            warnings: self.warnings,
        }
    }
}

// ============================================================================
// Document Types
// ============================================================================

/// Value of the `"type"` field of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Keyboard,
    Section,
    Key,
}

impl ElementType {
    fn keyboard() -> Self {
        ElementType::Keyboard
    }

    fn section() -> Self {
        ElementType::Section
    }

    fn key() -> Self {
        ElementType::Key
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Keyboard => "keyboard",
            ElementType::Section => "section",
            ElementType::Key => "key",
        };
        write!(f, "{}", name)
    }
}

fn default_version() -> u64 {
    LAYOUT_VERSION
}

fn index_is_unset(index: &SymbolIndex) -> bool {
    index.is_unset()
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// Root of a layout document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardDocument {
    #[serde(rename = "type", default = "ElementType::keyboard")]
    pub element_type: ElementType,
    #[serde(default = "default_version")]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub bounds: Bounds,
    /// Global group
    #[serde(default, skip_serializing_if = "is_zero")]
    pub group: i32,
    /// Global level
    #[serde(default, skip_serializing_if = "is_zero")]
    pub level: i32,
    #[serde(default)]
    pub modifier_behavior: ModifierBehavior,
    /// Outline `i` is registered with oref `i + 1`
    #[serde(default)]
    pub outlines: Vec<OutlineDocument>,
    #[serde(default)]
    pub sections: Vec<SectionDocument>,
}

/// A rounded polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineDocument {
    #[serde(default)]
    pub corner_radius: f64,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDocument {
    #[serde(rename = "type", default = "ElementType::section")]
    pub element_type: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub bounds: Bounds,
    #[serde(default)]
    pub angle: i32,
    #[serde(default, skip_serializing_if = "index_is_unset")]
    pub symbol_index: SymbolIndex,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub keys: Vec<KeyDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDocument {
    #[serde(rename = "type", default = "ElementType::key")]
    pub element_type: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub keycode: u32,
    pub column: usize,
    pub row: usize,
    pub bounds: Bounds,
    #[serde(default)]
    pub oref: OutlineId,
    #[serde(default, skip_serializing_if = "index_is_unset")]
    pub symbol_index: SymbolIndex,
    #[serde(default)]
    pub symbols: SymbolMatrixDocument,
}

/// Row-major group × level grid; `null` cells are empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SymbolMatrixDocument {
    pub num_groups: usize,
    pub num_levels: usize,
    #[serde(default)]
    pub data: Vec<Option<SymbolSpec>>,
}

/// A symbol given either as a bare keysym name or in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SymbolSpec {
    /// Keysym name (e.g., "a", "Shift_L"); label, category and modifier
    /// mask are derived from it
    Name(String),
    /// Explicit fields; omitted ones are derived from the name
    Full(SymbolDocument),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDocument {
    pub name: String,
    /// Absent derives the label from the name; `null` keeps the symbol
    /// unlabelled.
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<SymbolCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier_mask: Option<ModifierMask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
}

impl SymbolSpec {
    /// Resolves into a symbol, deriving omitted fields from the name.
    pub fn to_symbol(&self) -> Symbol {
        match self {
            SymbolSpec::Name(name) => Symbol::from_keysym_name(name),
            SymbolSpec::Full(doc) => {
                let mut symbol = Symbol::from_keysym_name(&doc.name);
                if let Some(label) = &doc.label {
                    symbol.label = label.clone();
                }
                if let Some(category) = doc.category {
                    symbol.category = category;
                }
                if let Some(mask) = doc.modifier_mask {
                    symbol.modifier_mask = mask;
                }
                symbol.icon_name = doc.icon_name.clone();
                symbol
            }
        }
    }
}

/// Distinguishes an explicit `null` from a missing field.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl From<&Symbol> for SymbolSpec {
    fn from(symbol: &Symbol) -> Self {
        SymbolSpec::Full(SymbolDocument {
            name: symbol.name.clone(),
            label: Some(symbol.label.clone()),
            category: Some(symbol.category),
            modifier_mask: Some(symbol.modifier_mask),
            icon_name: symbol.icon_name.clone(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test 1: Bare names and full objects both parse as symbols.
    #[test]
    fn test_symbol_spec_forms() {
        let specs: Vec<SymbolSpec> = serde_json::from_str(
            r#"["Shift_L", {"name": "Return", "label": "Enter", "icon_name": "go-next"}]"#,
        )
        .unwrap();

        let shift = specs[0].to_symbol();
        assert_eq!(shift.modifier_mask, ModifierMask::SHIFT);

        let enter = specs[1].to_symbol();
        assert_eq!(enter.label.as_deref(), Some("Enter"));
        assert_eq!(enter.category, SymbolCategory::Function);
        assert_eq!(enter.icon_name.as_deref(), Some("go-next"));
    }

    /// Test 2: Explicit mask overrides the derived one.
    #[test]
    fn test_symbol_spec_explicit_mask() {
        let full: SymbolSpec =
            serde_json::from_str(r#"{"name": "Shift_L", "modifier_mask": 0}"#).unwrap();
        assert!(full.to_symbol().modifier_mask.is_empty());
    }

    /// Test 3: Missing type tags default to the expected element type.
    #[test]
    fn test_document_type_defaults() {
        let key: KeyDocument = serde_json::from_str(
            r#"{"column": 0, "row": 0, "bounds": {"x": 0, "y": 0, "width": 1, "height": 1}}"#,
        )
        .unwrap();
        assert_eq!(key.element_type, ElementType::Key);
        assert!(key.symbol_index.is_unset());
        assert_eq!(key.oref, OutlineId::NONE);
    }

    /// Test 4: Validation errors list every issue.
    #[test]
    fn test_validation_error_display() {
        let err = ParseError::validation_error(vec![
            ValidationIssue::error("row 3 out of range", "sections[0].keys[1]"),
            ValidationIssue::warning("empty name", "sections[0].name"),
        ]);
        let text = err.to_string();

        assert!(text.contains("2 issue(s)"));
        assert!(text.contains("[ERROR] sections[0].keys[1]"));
    }
}
