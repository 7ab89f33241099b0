// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the keyboard model.
//!
//! Structural mistakes (adding a child that already has a parent, creating a
//! key outside its section's row grid, ...) and invalid symbol indices are
//! caller bugs and are reported as [`ModelError`]. Lookup misses (unknown
//! outline id, no key at a position) are not errors; they come back as
//! `Option::None`.

use std::fmt;

use crate::model::ElementId;

/// Error type for keyboard model operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The child passed to `add_child` is already attached somewhere.
    ChildHasParent {
        /// The child being added
        child: ElementId,
        /// Its current parent
        parent: ElementId,
    },

    /// The child passed to `remove_child` is not a child of the container.
    NotAChild {
        /// The container
        parent: ElementId,
        /// The element that was expected among its children
        child: ElementId,
    },

    /// The element kind cannot be stored in the given container
    /// (the keyboard holds sections, sections hold keys).
    ChildKindMismatch {
        /// The container
        parent: ElementId,
        /// The rejected child
        child: ElementId,
        /// Human-readable description of what the container accepts
        expected: &'static str,
    },

    /// An element id does not refer to a node of this keyboard, or refers to
    /// a node of the wrong kind.
    UnknownElement {
        /// The offending id
        id: ElementId,
        /// What the caller expected to find
        expected: &'static str,
    },

    /// `create_key` was called with a row that the section does not have.
    RowOutOfRange {
        /// Requested row
        row: usize,
        /// Number of rows in the section
        num_rows: usize,
    },

    /// `create_key` was called with a column past the end of its row.
    ColumnOutOfRange {
        /// Requested column
        column: usize,
        /// Row the column was requested in
        row: usize,
        /// Number of columns in that row
        num_columns: usize,
    },

    /// A group/level pair is negative (other than the `-1` unset sentinel
    /// where that is allowed).
    InvalidIndex {
        /// Requested group
        group: i32,
        /// Requested level
        level: i32,
    },

    /// A symbol matrix cell outside `[0, num_groups) x [0, num_levels)`.
    SymbolOutOfRange {
        /// Requested group
        group: usize,
        /// Requested level
        level: usize,
        /// Matrix group count
        num_groups: usize,
        /// Matrix level count
        num_levels: usize,
    },

    /// An outline violates the polygon invariants.
    InvalidOutline {
        /// Description of the violated invariant
        reason: String,
    },
}

impl ModelError {
    /// Creates an unknown-element error.
    pub fn unknown(id: impl Into<ElementId>, expected: &'static str) -> Self {
        Self::UnknownElement {
            id: id.into(),
            expected,
        }
    }

    /// Creates an invalid-outline error.
    pub fn invalid_outline(reason: impl Into<String>) -> Self {
        Self::InvalidOutline {
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors of the structural class (tree shape and
    /// row/column grid violations).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ModelError::ChildHasParent { .. }
                | ModelError::NotAChild { .. }
                | ModelError::ChildKindMismatch { .. }
                | ModelError::RowOutOfRange { .. }
                | ModelError::ColumnOutOfRange { .. }
        )
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::ChildHasParent { child, parent } => {
                write!(f, "element {} already has parent {}", child, parent)
            }
            ModelError::NotAChild { parent, child } => {
                write!(f, "element {} is not a child of {}", child, parent)
            }
            ModelError::ChildKindMismatch {
                parent,
                child,
                expected,
            } => write!(
                f,
                "element {} cannot be added to {}: expected {}",
                child, parent, expected
            ),
            ModelError::UnknownElement { id, expected } => {
                write!(f, "element {} is not a known {}", id, expected)
            }
            ModelError::RowOutOfRange { row, num_rows } => {
                write!(f, "row {} out of range (section has {} rows)", row, num_rows)
            }
            ModelError::ColumnOutOfRange {
                column,
                row,
                num_columns,
            } => write!(
                f,
                "column {} out of range (row {} has {} columns)",
                column, row, num_columns
            ),
            ModelError::InvalidIndex { group, level } => {
                write!(f, "invalid symbol index (group {}, level {})", group, level)
            }
            ModelError::SymbolOutOfRange {
                group,
                level,
                num_groups,
                num_levels,
            } => write!(
                f,
                "symbol ({}, {}) outside {}x{} matrix",
                group, level, num_groups, num_levels
            ),
            ModelError::InvalidOutline { reason } => write!(f, "invalid outline: {}", reason),
        }
    }
}

impl std::error::Error for ModelError {}
