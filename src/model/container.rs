// SPDX-License-Identifier: GPL-3.0-only

//! Ordered list of child element ids.
//!
//! Insertion order matters: it is the row/column layout order and the
//! hit-testing order. The container only stores ids; the nodes themselves
//! live in the keyboard's arena, which also maintains the parent links.

use crate::model::element::ElementId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    children: Vec<ElementId>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, child: ElementId) {
        self.children.push(child);
    }

    /// Removes `child`, returning `false` if it was not present.
    pub(crate) fn remove(&mut self, child: ElementId) -> bool {
        match self.children.iter().position(|c| *c == child) {
            Some(pos) => {
                self.children.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, child: ElementId) -> bool {
        self.children.contains(&child)
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Visits children in insertion order.
    pub fn foreach_child(&self, mut f: impl FnMut(ElementId)) {
        for child in &self.children {
            f(*child);
        }
    }

    /// First child satisfying `predicate`.
    pub fn find(&self, mut predicate: impl FnMut(ElementId) -> bool) -> Option<ElementId> {
        self.children.iter().copied().find(|c| predicate(*c))
    }
}
