// SPDX-License-Identifier: GPL-3.0-only

//! Validation rules for keyboard layout documents.
//!
//! Validation is permissive: problems the builder can work around are fixed
//! in place and reported as warnings. Problems that would make the model
//! reject the document (a key outside its row grid, a malformed outline, a
//! symbol grid of the wrong size) are errors and fail the parse with every
//! issue listed.

use crate::app_settings::LAYOUT_VERSION;
use crate::layout::types::{
    ElementType, KeyDocument, KeyboardDocument, OutlineDocument, ParseError, SectionDocument,
    Severity, ValidationIssue,
};
use crate::model::{Bounds, OutlineId};

/// Angles are normalized into this range, in degrees.
const MAX_ANGLE: i32 = 360;

/// Validates `document`, fixing what can be fixed.
///
/// Returns the warnings on success, or a `ValidationError` holding every
/// issue if any error was found.
pub fn validate_document(document: &mut KeyboardDocument) -> Result<Vec<ValidationIssue>, ParseError> {
    let mut issues = Vec::new();

    validate_keyboard_fields(document, &mut issues);

    for (i, outline) in document.outlines.iter().enumerate() {
        validate_outline(outline, &format!("outlines[{}]", i), &mut issues);
    }

    let num_outlines = document.outlines.len();
    for (i, section) in document.sections.iter_mut().enumerate() {
        validate_section(section, num_outlines, &format!("sections[{}]", i), &mut issues);
    }

    let issues = sort_issues(issues);
    if issues.iter().any(ValidationIssue::is_error) {
        return Err(ParseError::validation_error(issues));
    }
    Ok(issues)
}

fn check_element_type(
    found: ElementType,
    expected: ElementType,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if found != expected {
        issues.push(
            ValidationIssue::error(
                format!("Expected a {} element, found '{}'", expected, found),
                format!("{}.type", path),
            )
            .with_suggestion(format!("Set \"type\": \"{}\"", expected)),
        );
    }
}

fn check_name(name: &Option<String>, path: &str, issues: &mut Vec<ValidationIssue>) {
    if name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        issues.push(
            ValidationIssue::warning("Name is empty", format!("{}.name", path))
                .with_suggestion("Remove the field or give the element a name"),
        );
    }
}

/// Validates the root element's own fields.
pub fn validate_keyboard_fields(document: &KeyboardDocument, issues: &mut Vec<ValidationIssue>) {
    check_element_type(document.element_type, ElementType::Keyboard, "keyboard", issues);
    check_name(&document.name, "keyboard", issues);

    if document.version > LAYOUT_VERSION {
        issues.push(ValidationIssue::warning(
            format!(
                "Layout version {} is newer than supported version {}",
                document.version,
                LAYOUT_VERSION
            ),
            "keyboard.version",
        ));
    }

    if document.group < 0 || document.level < 0 {
        issues.push(ValidationIssue::error(
            format!(
                "Global symbol index ({}, {}) must not be negative",
                document.group, document.level
            ),
            "keyboard.group",
        ));
    }

    if document.bounds.width <= 0.0 || document.bounds.height <= 0.0 {
        issues.push(
            ValidationIssue::warning("Keyboard has no area", "keyboard.bounds")
                .with_suggestion("Renderers cannot scale a keyboard with zero width or height"),
        );
    }
}

/// Validates one outline definition.
pub fn validate_outline(outline: &OutlineDocument, path: &str, issues: &mut Vec<ValidationIssue>) {
    if outline.points.len() < 3 {
        issues.push(ValidationIssue::error(
            format!("Outline has {} point(s), needs at least 3", outline.points.len()),
            format!("{}.points", path),
        ));
    }

    if outline.corner_radius < 0.0 || !outline.corner_radius.is_finite() {
        issues.push(ValidationIssue::error(
            format!("Invalid corner radius {}", outline.corner_radius),
            format!("{}.corner_radius", path),
        ));
    }
}

/// Validates a section and its keys.
pub fn validate_section(
    section: &mut SectionDocument,
    num_outlines: usize,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    check_element_type(section.element_type, ElementType::Section, path, issues);
    check_name(&section.name, path, issues);

    if !(-MAX_ANGLE..=MAX_ANGLE).contains(&section.angle) {
        let normalized = section.angle % MAX_ANGLE;
        issues.push(ValidationIssue::warning(
            format!("Angle {} normalized to {}", section.angle, normalized),
            format!("{}.angle", path),
        ));
        section.angle = normalized;
    }

    check_symbol_index_override(
        section.symbol_index.group,
        section.symbol_index.level,
        path,
        issues,
    );

    let rows: Vec<usize> = section.rows.iter().map(|row| row.num_columns).collect();
    for (i, key) in section.keys.iter_mut().enumerate() {
        let key_path = format!("{}.keys[{}]", path, i);
        validate_key(key, num_outlines, &key_path, issues);
        validate_key_position(key, &rows, &key_path, issues);
    }

    validate_key_placement(section, path, issues);
}

fn check_symbol_index_override(group: i32, level: i32, path: &str, issues: &mut Vec<ValidationIssue>) {
    if group < -1 || level < -1 {
        issues.push(
            ValidationIssue::error(
                format!("Symbol index ({}, {}) is out of range", group, level),
                format!("{}.symbol_index", path),
            )
            .with_suggestion("Use -1 to inherit from the parent"),
        );
    }
}

/// Validates a key's own fields. Unknown outline references are reset.
pub fn validate_key(
    key: &mut KeyDocument,
    num_outlines: usize,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    check_element_type(key.element_type, ElementType::Key, path, issues);
    check_name(&key.name, path, issues);
    check_symbol_index_override(key.symbol_index.group, key.symbol_index.level, path, issues);

    if key.oref.0 as usize > num_outlines {
        issues.push(
            ValidationIssue::warning(
                format!(
                    "Outline {} does not exist ({} defined); key will have no outline",
                    key.oref, num_outlines
                ),
                format!("{}.oref", path),
            )
            .with_suggestion("Outline references start at 1 and follow the order of 'outlines'"),
        );
        key.oref = OutlineId::NONE;
    }

    let symbols = &key.symbols;
    let expected = symbols.num_groups * symbols.num_levels;
    if symbols.data.len() != expected {
        issues.push(ValidationIssue::error(
            format!(
                "Symbol matrix is {} x {} but holds {} cell(s)",
                symbols.num_groups,
                symbols.num_levels,
                symbols.data.len()
            ),
            format!("{}.symbols.data", path),
        ));
    }

    if key.bounds.width <= 0.0 || key.bounds.height <= 0.0 {
        issues.push(ValidationIssue::warning("Key has no area", format!("{}.bounds", path)));
    }
}

fn validate_key_position(
    key: &KeyDocument,
    rows: &[usize],
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    match rows.get(key.row) {
        None => issues.push(ValidationIssue::error(
            format!("Row {} out of range ({} row(s))", key.row, rows.len()),
            format!("{}.row", path),
        )),
        Some(&num_columns) if key.column >= num_columns => {
            issues.push(ValidationIssue::error(
                format!(
                    "Column {} out of range for row {} ({} column(s))",
                    key.column, key.row, num_columns
                ),
                format!("{}.column", path),
            ))
        }
        Some(_) => {}
    }
}

/// Warns about keys that leave their section or overlap each other.
fn validate_key_placement(section: &SectionDocument, path: &str, issues: &mut Vec<ValidationIssue>) {
    let area = Bounds::new(0.0, 0.0, section.bounds.width, section.bounds.height);

    for (i, key) in section.keys.iter().enumerate() {
        let corners = key.bounds.corners();
        if !corners.iter().all(|&corner| area.contains(corner)) {
            issues.push(ValidationIssue::warning(
                "Key extends outside its section",
                format!("{}.keys[{}].bounds", path, i),
            ));
        }

        for (j, other) in section.keys.iter().enumerate().skip(i + 1) {
            if key.bounds.intersects(&other.bounds) {
                issues.push(ValidationIssue::warning(
                    format!("Key overlaps keys[{}]", j),
                    format!("{}.keys[{}].bounds", path, i),
                ));
            }
        }
    }
}

/// Sorts issues by severity (errors first) and then by field path.
pub fn sort_issues(mut issues: Vec<ValidationIssue>) -> Vec<ValidationIssue> {
    issues.sort_by(|a, b| match (a.severity, b.severity) {
        (Severity::Error, Severity::Warning) => std::cmp::Ordering::Less,
        (Severity::Warning, Severity::Error) => std::cmp::Ordering::Greater,
        _ => a.field_path.cmp(&b.field_path),
    });
    issues
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn document(json: &str) -> KeyboardDocument {
        serde_json::from_str(json).unwrap()
    }

    const TWO_KEYS: &str = r#"{
        "type": "keyboard",
        "bounds": {"x": 0, "y": 0, "width": 100, "height": 50},
        "outlines": [{"points": [{"x":0,"y":0},{"x":40,"y":0},{"x":40,"y":40},{"x":0,"y":40}]}],
        "sections": [{
            "type": "section",
            "bounds": {"x": 0, "y": 0, "width": 100, "height": 50},
            "rows": [{"num_columns": 2}],
            "keys": [
                {"type": "key", "column": 0, "row": 0, "oref": 1,
                 "bounds": {"x": 0, "y": 0, "width": 40, "height": 40},
                 "symbols": {"num_groups": 1, "num_levels": 1, "data": ["a"]}},
                {"type": "key", "column": 1, "row": 0, "oref": 1,
                 "bounds": {"x": 50, "y": 0, "width": 40, "height": 40},
                 "symbols": {"num_groups": 1, "num_levels": 1, "data": ["b"]}}
            ]
        }]
    }"#;

    // ========================================================================
    // Accepted documents
    // ========================================================================

    /// Test 1: A clean document produces no issues.
    #[test]
    fn test_valid_document() {
        let mut doc = document(TWO_KEYS);
        let warnings = validate_document(&mut doc).unwrap();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    /// Test 2: Dangling outline references are reset with a warning.
    #[test]
    fn test_dangling_oref_reset() {
        let mut doc = document(TWO_KEYS);
        doc.sections[0].keys[1].oref = OutlineId(7);

        let warnings = validate_document(&mut doc).unwrap();

        assert_eq!(doc.sections[0].keys[1].oref, OutlineId::NONE);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field_path, "sections[0].keys[1].oref");
    }

    /// Test 3: Oversized angles are normalized.
    #[test]
    fn test_angle_normalized() {
        let mut doc = document(TWO_KEYS);
        doc.sections[0].angle = 450;

        let warnings = validate_document(&mut doc).unwrap();

        assert_eq!(doc.sections[0].angle, 90);
        assert!(warnings.iter().any(|w| w.field_path == "sections[0].angle"));

        doc.sections[0].angle = i32::MIN;
        let warnings = validate_document(&mut doc).unwrap();
        assert_eq!(doc.sections[0].angle, -128);
        assert!(warnings.iter().any(|w| w.field_path == "sections[0].angle"));
    }

    /// Test 4: Overlapping and escaping keys are reported but accepted.
    #[test]
    fn test_overlap_warning() {
        let mut doc = document(TWO_KEYS);
        doc.sections[0].keys[1].bounds.x = 20.0;
        doc.sections[0].keys[1].bounds.y = 20.0;

        let warnings = validate_document(&mut doc).unwrap();

        assert!(warnings.iter().any(|w| w.message.contains("overlaps")));
        assert!(warnings.iter().any(|w| w.message.contains("outside")));
        assert!(warnings.iter().all(|w| w.severity == Severity::Warning));
    }

    // ========================================================================
    // Rejected documents
    // ========================================================================

    /// Test 5: Keys outside the row grid fail validation.
    #[test]
    fn test_position_out_of_range() {
        let mut doc = document(TWO_KEYS);
        doc.sections[0].keys[1].column = 2;
        doc.sections[0].keys[0].row = 1;

        match validate_document(&mut doc) {
            Err(ParseError::ValidationError { issues, .. }) => {
                let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).collect();
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field_path, "sections[0].keys[0].row");
                assert_eq!(errors[1].field_path, "sections[0].keys[1].column");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    /// Test 6: Malformed outlines and symbol grids are errors.
    #[test]
    fn test_outline_and_symbols_errors() {
        let mut doc = document(TWO_KEYS);
        doc.outlines[0].points.truncate(2);
        doc.sections[0].keys[0].symbols.num_levels = 2;

        let err = validate_document(&mut doc).unwrap_err();
        let text = err.to_string();

        assert!(text.contains("outlines[0].points"));
        assert!(text.contains("sections[0].keys[0].symbols.data"));
    }

    /// Test 7: Element type tags must match their position.
    #[test]
    fn test_type_mismatch() {
        let mut doc = document(TWO_KEYS);
        doc.sections[0].keys[0].element_type = ElementType::Section;

        assert!(matches!(
            validate_document(&mut doc),
            Err(ParseError::ValidationError { .. })
        ));
    }
}
