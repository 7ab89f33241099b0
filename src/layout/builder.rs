// SPDX-License-Identifier: GPL-3.0-only

//! Builds a [`Keyboard`] from a validated layout document.
//!
//! The builder goes through the public model API only: outlines are
//! registered first so keys can refer to them, then each section is created,
//! given its rows, and filled with keys.

use crate::layout::types::{KeyDocument, KeyboardDocument, ParseError, SectionDocument, SymbolSpec};
use crate::model::{ElementId, Keyboard, Outline, SectionId, SymbolMatrix};

/// Builds the keyboard described by `document`.
///
/// # Errors
///
/// Returns `ParseError::Model` when the model rejects part of the document,
/// with the path of the offending element. Validated documents only fail
/// here on inconsistencies validation does not look for.
pub fn build_keyboard(document: &KeyboardDocument) -> Result<Keyboard, ParseError> {
    let mut keyboard = Keyboard::new();

    keyboard.set_bounds(document.bounds);
    if let Some(root) = keyboard.element_mut(ElementId::ROOT) {
        root.set_name(document.name.clone());
    }
    keyboard.set_modifier_behavior(document.modifier_behavior);
    keyboard
        .set_symbol_index(document.group, document.level)
        .map_err(|e| ParseError::model(e, "keyboard"))?;

    for (i, outline) in document.outlines.iter().enumerate() {
        let outline = Outline::new(outline.corner_radius, outline.points.clone())
            .map_err(|e| ParseError::model(e, format!("outlines[{}]", i)))?;
        keyboard.add_outline(&outline);
    }

    for (i, section) in document.sections.iter().enumerate() {
        build_section(&mut keyboard, section, &format!("sections[{}]", i))?;
    }

    tracing::debug!(
        "Built keyboard with {} section(s), {} key(s), {} outline(s)",
        document.sections.len(),
        keyboard.keys().count(),
        keyboard.outlines().len()
    );

    Ok(keyboard)
}

fn build_section(
    keyboard: &mut Keyboard,
    document: &SectionDocument,
    path: &str,
) -> Result<SectionId, ParseError> {
    let section = keyboard.create_section();

    if let Some(element) = keyboard.element_mut(section) {
        element.set_name(document.name.clone());
        element.set_bounds(document.bounds);
        element
            .set_symbol_index(document.symbol_index.group, document.symbol_index.level)
            .map_err(|e| ParseError::model(e, path))?;
    }

    if let Some(model) = keyboard.section_mut(section) {
        model.set_angle(document.angle);
        for row in &document.rows {
            model.add_row(row.num_columns, row.orientation);
        }
    }

    for (i, key) in document.keys.iter().enumerate() {
        build_key(keyboard, section, key, &format!("{}.keys[{}]", path, i))?;
    }

    Ok(section)
}

fn build_key(
    keyboard: &mut Keyboard,
    section: SectionId,
    document: &KeyDocument,
    path: &str,
) -> Result<(), ParseError> {
    let key = keyboard
        .create_key(section, document.column, document.row)
        .map_err(|e| ParseError::model(e, path))?;

    let symbols = &document.symbols;
    let matrix = SymbolMatrix::from_cells(
        symbols.num_groups,
        symbols.num_levels,
        symbols
            .data
            .iter()
            .map(|cell| cell.as_ref().map(SymbolSpec::to_symbol))
            .collect(),
    )
    .map_err(|e| ParseError::model(e, format!("{}.symbols", path)))?;

    if let Some(element) = keyboard.element_mut(key) {
        element.set_name(document.name.clone());
        element.set_bounds(document.bounds);
        element
            .set_symbol_index(document.symbol_index.group, document.symbol_index.level)
            .map_err(|e| ParseError::model(e, path))?;
    }

    if let Some(model) = keyboard.key_mut(key) {
        model.set_keycode(document.keycode);
        model.set_oref(document.oref);
        model.set_symbol_matrix(matrix);
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::model::{Bounds, OutlineId, SymbolIndex};

    fn document(json: &str) -> KeyboardDocument {
        serde_json::from_str(json).unwrap()
    }

    /// Test 1: Every field of the document lands in the model.
    #[test]
    fn test_build_fields() {
        let doc = document(
            r#"{
            "name": "mini",
            "bounds": {"x": 5, "y": 5, "width": 100, "height": 50},
            "modifier_behavior": "latch",
            "outlines": [{"corner_radius": 2, "points": [{"x":0,"y":0},{"x":40,"y":0},{"x":40,"y":40},{"x":0,"y":40}]}],
            "sections": [{
                "name": "alpha",
                "bounds": {"x": 0, "y": 0, "width": 100, "height": 50},
                "angle": -15,
                "symbol_index": {"group": -1, "level": 1},
                "rows": [{"num_columns": 1, "orientation": "vertical"}],
                "keys": [{"name": "AC01", "keycode": 38, "column": 0, "row": 0, "oref": 1,
                          "bounds": {"x": 0, "y": 0, "width": 40, "height": 40},
                          "symbols": {"num_groups": 1, "num_levels": 2, "data": ["a", "A"]}}]
            }]
        }"#,
        );

        let keyboard = build_keyboard(&doc).unwrap();

        assert_eq!(keyboard.root().name(), Some("mini"));
        assert_eq!(keyboard.bounds(), Bounds::new(5.0, 5.0, 100.0, 50.0));
        assert_eq!(
            keyboard.get_modifier_behavior(),
            crate::model::ModifierBehavior::Latch
        );
        assert_eq!(keyboard.outlines().len(), 1);

        let section = keyboard.sections().next().unwrap();
        assert_eq!(keyboard.section(section).unwrap().angle(), -15);
        assert_eq!(
            keyboard.element(section).unwrap().symbol_index(),
            SymbolIndex::new(-1, 1)
        );

        let key = keyboard.find_key_by_keycode(38).unwrap();
        assert_eq!(keyboard.key(key).unwrap().oref(), OutlineId(1));
        assert_eq!(keyboard.element(key).unwrap().name(), Some("AC01"));
        assert_eq!(
            keyboard.symbol_for_key(key).unwrap().name,
            "A",
            "section override selects level 1"
        );
    }

    /// Test 2: Model errors carry the path of the failing element.
    #[test]
    fn test_build_reports_path() {
        let doc = document(
            r#"{
            "bounds": {"x": 0, "y": 0, "width": 10, "height": 10},
            "sections": [{
                "bounds": {"x": 0, "y": 0, "width": 10, "height": 10},
                "rows": [{"num_columns": 1}],
                "keys": [{"column": 3, "row": 0, "bounds": {"x": 0, "y": 0, "width": 1, "height": 1}}]
            }]
        }"#,
        );

        match build_keyboard(&doc) {
            Err(ParseError::Model { source, field_path }) => {
                assert_eq!(field_path, "sections[0].keys[0]");
                assert!(matches!(source, ModelError::ColumnOutOfRange { column: 3, .. }));
            }
            other => panic!("expected model error, got {:?}", other.map(|_| ())),
        }
    }
}
