// SPDX-License-Identifier: GPL-3.0-only

//! Serializes a [`Keyboard`] back into a layout document.
//!
//! Only the attached tree is written: sections detached from the keyboard
//! and keys detached from their section are skipped. Outlines are written
//! in registry order so outline references survive a round trip.

use std::fs;
use std::path::Path;

use crate::app_settings::LAYOUT_VERSION;
use crate::layout::types::{
    ElementType, KeyDocument, KeyboardDocument, OutlineDocument, ParseError, SectionDocument,
    SymbolMatrixDocument, SymbolSpec,
};
use crate::model::{KeyId, Keyboard, SectionId};

/// Converts `keyboard` into its document form.
pub fn keyboard_to_document(keyboard: &Keyboard) -> KeyboardDocument {
    let index = keyboard.get_symbol_index();

    KeyboardDocument {
        element_type: ElementType::Keyboard,
        version: LAYOUT_VERSION,
        name: keyboard.root().name().map(str::to_string),
        bounds: keyboard.bounds(),
        group: index.group,
        level: index.level,
        modifier_behavior: keyboard.get_modifier_behavior(),
        outlines: keyboard
            .outlines()
            .iter()
            .map(|(_, outline)| OutlineDocument {
                corner_radius: outline.corner_radius(),
                points: outline.points().to_vec(),
            })
            .collect(),
        sections: keyboard
            .sections()
            .filter_map(|section| section_to_document(keyboard, section))
            .collect(),
    }
}

fn section_to_document(keyboard: &Keyboard, section: SectionId) -> Option<SectionDocument> {
    let element = keyboard.element(section)?;
    let model = keyboard.section(section)?;

    Some(SectionDocument {
        element_type: ElementType::Section,
        name: element.name().map(str::to_string),
        bounds: element.bounds(),
        angle: model.angle(),
        symbol_index: element.symbol_index(),
        rows: model.rows().to_vec(),
        keys: keyboard
            .section_keys(section)
            .filter_map(|key| key_to_document(keyboard, key))
            .collect(),
    })
}

fn key_to_document(keyboard: &Keyboard, key: KeyId) -> Option<KeyDocument> {
    let element = keyboard.element(key)?;
    let model = keyboard.key(key)?;
    let matrix = model.symbol_matrix();

    Some(KeyDocument {
        element_type: ElementType::Key,
        name: element.name().map(str::to_string),
        keycode: model.keycode(),
        column: model.column().unwrap_or(0),
        row: model.row().unwrap_or(0),
        bounds: element.bounds(),
        oref: model.oref(),
        symbol_index: element.symbol_index(),
        symbols: SymbolMatrixDocument {
            num_groups: matrix.num_groups(),
            num_levels: matrix.num_levels(),
            data: matrix
                .cells()
                .iter()
                .map(|cell| cell.as_ref().map(SymbolSpec::from))
                .collect(),
        },
    })
}

/// Serializes `keyboard` as pretty-printed JSON.
pub fn layout_to_string(keyboard: &Keyboard) -> Result<String, ParseError> {
    let document = keyboard_to_document(keyboard);
    serde_json::to_string_pretty(&document).map_err(ParseError::json_error)
}

/// Writes `keyboard` to `path` as JSON.
///
/// # Example
///
/// ```rust,ignore
/// let result = parse_layout_file("layouts/us.json")?;
/// write_layout(&result.layout, "/tmp/us-copy.json")?;
/// ```
pub fn write_layout(keyboard: &Keyboard, path: impl AsRef<Path>) -> Result<(), ParseError> {
    let path = path.as_ref();
    let json = layout_to_string(keyboard)?;
    fs::write(path, json).map_err(|e| ParseError::io_error_with_path(e, path.display().to_string()))?;

    tracing::info!("Wrote layout to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::parser::{parse_layout_file, parse_layout_from_string};
    use crate::model::{Bounds, Orientation, Outline, Symbol, SymbolMatrix};
    use tempfile::TempDir;

    fn sample_keyboard() -> Keyboard {
        let mut keyboard = Keyboard::new();
        keyboard.set_bounds(Bounds::new(0.0, 0.0, 100.0, 50.0));
        let oref = keyboard.add_outline(&Outline::rectangle(40.0, 40.0, 3.0).unwrap());

        let section = keyboard.create_section();
        keyboard
            .element_mut(section)
            .unwrap()
            .set_bounds(Bounds::new(0.0, 0.0, 100.0, 50.0));
        keyboard.section_mut(section).unwrap().set_angle(15);
        keyboard
            .section_mut(section)
            .unwrap()
            .add_row(2, Orientation::Horizontal);

        for (column, c) in [(0, 'q'), (1, 'w')] {
            let key = keyboard.create_key(section, column, 0).unwrap();
            keyboard
                .element_mut(key)
                .unwrap()
                .set_bounds(Bounds::new(column as f64 * 50.0, 0.0, 40.0, 40.0));
            let model = keyboard.key_mut(key).unwrap();
            model.set_oref(oref);
            model.set_keycode(24 + column as u32);
            model.set_symbol_matrix(SymbolMatrix::from_levels([
                Symbol::letter(c),
                Symbol::letter(c.to_ascii_uppercase()),
            ]));
        }
        keyboard
    }

    /// Test 1: Written layouts parse back into the same tree.
    #[test]
    fn test_write_and_reparse() {
        let keyboard = sample_keyboard();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");

        write_layout(&keyboard, &path).unwrap();
        let result = parse_layout_file(path.to_str().unwrap()).unwrap();

        assert!(!result.has_warnings(), "warnings: {:?}", result.warnings);
        assert_eq!(
            keyboard_to_document(&result.layout),
            keyboard_to_document(&keyboard)
        );
    }

    /// Test 2: Detached keys are not written.
    #[test]
    fn test_detached_key_skipped() {
        let mut keyboard = sample_keyboard();
        let section = keyboard.sections().next().unwrap();
        let key = keyboard.section_keys(section).last().unwrap();
        keyboard.remove_child(section, key).unwrap();

        let json = layout_to_string(&keyboard).unwrap();
        let reparsed = parse_layout_from_string(&json).unwrap().layout;

        assert_eq!(reparsed.keys().count(), 1);
        assert!(json.contains("\"type\": \"key\""));
        assert!(!json.contains("\"w\""));
    }

    /// Test 3: Unlabelled symbols stay unlabelled after a round trip.
    #[test]
    fn test_write_and_reparse_unlabelled() {
        let mut keyboard = sample_keyboard();
        let key = keyboard.find_key_by_keycode(24).unwrap();
        keyboard
            .key_mut(key)
            .unwrap()
            .set_symbol_matrix(SymbolMatrix::from_levels([Symbol::new("Return")]));

        let json = layout_to_string(&keyboard).unwrap();
        assert!(json.contains("\"label\": null"));

        let reparsed = parse_layout_from_string(&json).unwrap().layout;
        let key = reparsed.find_key_by_keycode(24).unwrap();
        let symbol = reparsed.symbol_for_key(key).unwrap();

        assert_eq!(symbol.label, None);
        assert_eq!(symbol.display_label(), "Return");
        assert_eq!(
            keyboard_to_document(&reparsed),
            keyboard_to_document(&keyboard)
        );
    }
}
