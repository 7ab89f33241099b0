// SPDX-License-Identifier: GPL-3.0-only

//! Group x level grid of symbols attached to a key.
//!
//! The group usually selects a layout variant (a language), the level the
//! shift state. Cells may be empty; an empty `0 x 0` matrix is valid and
//! yields no symbol at all.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::symbol::Symbol;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SymbolMatrix {
    num_groups: usize,
    num_levels: usize,
    /// Row-major: `data[group * num_levels + level]`
    data: Vec<Option<Symbol>>,
}

impl SymbolMatrix {
    /// Creates a matrix of the given size with every cell empty.
    pub fn new(num_groups: usize, num_levels: usize) -> Self {
        Self {
            num_groups,
            num_levels,
            data: vec![None; num_groups * num_levels],
        }
    }

    /// Builds a matrix from row-major cells.
    pub fn from_cells(
        num_groups: usize,
        num_levels: usize,
        data: Vec<Option<Symbol>>,
    ) -> Result<Self, ModelError> {
        if data.len() != num_groups * num_levels {
            return Err(ModelError::SymbolOutOfRange {
                group: data.len() / num_levels.max(1),
                level: data.len() % num_levels.max(1),
                num_groups,
                num_levels,
            });
        }
        Ok(Self {
            num_groups,
            num_levels,
            data,
        })
    }

    /// Single-group matrix whose levels hold the given symbols in order.
    pub fn from_levels(levels: impl IntoIterator<Item = Symbol>) -> Self {
        let data: Vec<Option<Symbol>> = levels.into_iter().map(Some).collect();
        let num_levels = data.len();
        Self {
            num_groups: usize::from(num_levels > 0),
            num_levels,
            data,
        }
    }

    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    pub fn num_levels(&self) -> usize {
        self.num_levels
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn index(&self, group: usize, level: usize) -> Option<usize> {
        (group < self.num_groups && level < self.num_levels).then(|| group * self.num_levels + level)
    }

    pub fn set_symbol(&mut self, group: usize, level: usize, symbol: Symbol) -> Result<(), ModelError> {
        let index = self.index(group, level).ok_or(ModelError::SymbolOutOfRange {
            group,
            level,
            num_groups: self.num_groups,
            num_levels: self.num_levels,
        })?;
        self.data[index] = Some(symbol);
        Ok(())
    }

    /// Symbol at `(group, level)`; `None` when out of range or empty.
    pub fn get_symbol(&self, group: usize, level: usize) -> Option<&Symbol> {
        self.index(group, level).and_then(|i| self.data[i].as_ref())
    }

    /// Whether `(group, level)` addresses a cell of this matrix.
    pub fn in_range(&self, group: usize, level: usize) -> bool {
        self.index(group, level).is_some()
    }

    /// Row-major cell slice.
    pub fn cells(&self) -> &[Option<Symbol>] {
        &self.data
    }

    /// Iterates over `(group, level, symbol)` for every non-empty cell.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Symbol)> {
        let num_levels = self.num_levels.max(1);
        self.data
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.as_ref().map(|s| (i / num_levels, i % num_levels, s)))
    }
}

impl<'de> Deserialize<'de> for SymbolMatrix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            num_groups: usize,
            num_levels: usize,
            #[serde(default)]
            data: Vec<Option<Symbol>>,
        }

        let raw = Raw::deserialize(deserializer)?;
        SymbolMatrix::from_cells(raw.num_groups, raw.num_levels, raw.data)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_matrix_yields_nothing() {
        let m = SymbolMatrix::default();
        assert!(m.is_empty());
        assert!(m.get_symbol(0, 0).is_none());
        assert!(!m.in_range(0, 0));
    }

    #[test]
    fn test_set_and_get() {
        let mut m = SymbolMatrix::new(2, 2);
        m.set_symbol(1, 0, Symbol::letter('ф')).unwrap();

        assert_eq!(m.get_symbol(1, 0).unwrap().name, "ф");
        assert!(m.get_symbol(0, 0).is_none(), "unset cell is empty");
        assert!(m.get_symbol(2, 0).is_none(), "group out of range");

        let err = m.set_symbol(0, 2, Symbol::letter('x')).unwrap_err();
        assert!(matches!(err, ModelError::SymbolOutOfRange { level: 2, .. }));
    }

    #[test]
    fn test_from_levels_and_iter() {
        let m = SymbolMatrix::from_levels([Symbol::letter('a'), Symbol::letter('A')]);
        assert_eq!((m.num_groups(), m.num_levels()), (1, 2));

        let cells: Vec<(usize, usize, &str)> =
            m.iter().map(|(g, l, s)| (g, l, s.name.as_str())).collect();
        assert_eq!(cells, vec![(0, 0, "a"), (0, 1, "A")]);
    }

    #[test]
    fn test_deserialize_checks_size() {
        let bad = serde_json::from_str::<SymbolMatrix>(
            r#"{"num_groups": 1, "num_levels": 2, "data": [null]}"#,
        );
        assert!(bad.is_err());

        let ok: SymbolMatrix = serde_json::from_str(
            r#"{"num_groups": 1, "num_levels": 2, "data": [{"name": "a"}, null]}"#,
        )
        .unwrap();
        assert_eq!(ok.get_symbol(0, 0).unwrap().name, "a");
    }
}
