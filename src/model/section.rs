// SPDX-License-Identifier: GPL-3.0-only

//! Sections group keys into rows and carry a rotation angle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::container::Container;
use crate::model::element::ElementId;
use crate::model::geometry::Orientation;

/// Handle to a section node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub(crate) ElementId);

impl SectionId {
    pub fn element(self) -> ElementId {
        self.0
    }
}

impl From<SectionId> for ElementId {
    fn from(id: SectionId) -> Self {
        id.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section{}", self.0)
    }
}

/// One row of a section's key grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub num_columns: usize,
    #[serde(default)]
    pub orientation: Orientation,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    /// Degrees, applied about the section's own origin
    angle: i32,
    rows: Vec<Row>,
    keys: Container,
}

impl Section {
    pub fn angle(&self) -> i32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: i32) {
        self.angle = angle;
    }

    /// Appends a row and returns its index.
    pub fn add_row(&mut self, num_columns: usize, orientation: Orientation) -> usize {
        self.rows.push(Row {
            num_columns,
            orientation,
        });
        self.rows.len() - 1
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Column count of `row`, `None` if the row does not exist.
    pub fn columns_for(&self, row: usize) -> Option<usize> {
        self.rows.get(row).map(|r| r.num_columns)
    }

    /// Child keys in insertion order.
    pub fn keys(&self) -> &Container {
        &self.keys
    }

    pub(crate) fn keys_mut(&mut self) -> &mut Container {
        &mut self.keys
    }

    /// Checks that `(column, row)` addresses a cell of the row grid.
    pub fn check_position(&self, column: usize, row: usize) -> Result<(), ModelError> {
        let num_columns = self.columns_for(row).ok_or(ModelError::RowOutOfRange {
            row,
            num_rows: self.num_rows(),
        })?;
        if column >= num_columns {
            return Err(ModelError::ColumnOutOfRange {
                column,
                row,
                num_columns,
            });
        }
        Ok(())
    }
}
