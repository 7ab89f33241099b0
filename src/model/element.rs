// SPDX-License-Identifier: GPL-3.0-only

//! Base positioned node of the keyboard tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::geometry::Bounds;

/// Index of a node in the keyboard's element arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub(crate) u32);

impl ElementId {
    /// The keyboard itself.
    pub const ROOT: ElementId = ElementId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Group/level pair selecting a cell of a symbol matrix.
///
/// On elements both components default to `-1`, meaning "no override".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolIndex {
    pub group: i32,
    pub level: i32,
}

impl SymbolIndex {
    pub const UNSET: SymbolIndex = SymbolIndex { group: -1, level: -1 };

    pub const fn new(group: i32, level: i32) -> Self {
        Self { group, level }
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }
}

impl Default for SymbolIndex {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Data every node of the tree carries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    name: Option<String>,
    bounds: Bounds,
    parent: Option<ElementId>,
    symbol_index: SymbolIndex,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Bounds relative to the parent's origin.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ElementId>) {
        self.parent = parent;
    }

    /// Sets the symbol-index override. `(-1, -1)` clears it; any component
    /// below `-1` is rejected.
    pub fn set_symbol_index(&mut self, group: i32, level: i32) -> Result<(), ModelError> {
        if group < -1 || level < -1 {
            return Err(ModelError::InvalidIndex { group, level });
        }
        self.symbol_index = SymbolIndex::new(group, level);
        Ok(())
    }

    pub fn symbol_index(&self) -> SymbolIndex {
        self.symbol_index
    }

    /// Override group, `-1` when unset.
    pub fn group(&self) -> i32 {
        self.symbol_index.group
    }

    /// Override level, `-1` when unset.
    pub fn level(&self) -> i32 {
        self.symbol_index.level
    }
}
