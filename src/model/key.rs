// SPDX-License-Identifier: GPL-3.0-only

//! Leaf element of the keyboard tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::element::ElementId;
use crate::model::outline::OutlineId;
use crate::model::symbol::Symbol;
use crate::model::symbol_matrix::SymbolMatrix;

/// Handle to a key node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(pub(crate) ElementId);

impl KeyId {
    pub fn element(self) -> ElementId {
        self.0
    }
}

impl From<KeyId> for ElementId {
    fn from(id: KeyId) -> Self {
        id.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key{}", self.0)
    }
}

/// Key-specific state. Position and name live in the key's
/// [`Element`](crate::model::Element).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Key {
    keycode: u32,
    symbol_matrix: SymbolMatrix,
    column: Option<usize>,
    row: Option<usize>,
    oref: OutlineId,
    pressed: bool,
}

impl Key {
    pub(crate) fn at(column: usize, row: usize) -> Self {
        Self {
            column: Some(column),
            row: Some(row),
            ..Self::default()
        }
    }

    /// Hardware keycode, `0` when invalid.
    pub fn keycode(&self) -> u32 {
        self.keycode
    }

    pub fn set_keycode(&mut self, keycode: u32) {
        self.keycode = keycode;
    }

    pub fn symbol_matrix(&self) -> &SymbolMatrix {
        &self.symbol_matrix
    }

    /// Replaces the whole matrix.
    pub fn set_symbol_matrix(&mut self, matrix: SymbolMatrix) {
        self.symbol_matrix = matrix;
    }

    pub fn column(&self) -> Option<usize> {
        self.column
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn oref(&self) -> OutlineId {
        self.oref
    }

    pub fn set_oref(&mut self, oref: OutlineId) {
        self.oref = oref;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub(crate) fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Symbol at `(group, level)`, or at the fallback index when the
    /// requested one lies outside the matrix.
    pub fn symbol_with_fallback(
        &self,
        group: usize,
        level: usize,
        fallback_group: usize,
        fallback_level: usize,
    ) -> Option<&Symbol> {
        if self.symbol_matrix.in_range(group, level) {
            self.symbol_matrix.get_symbol(group, level)
        } else {
            self.symbol_matrix.get_symbol(fallback_group, fallback_level)
        }
    }
}
