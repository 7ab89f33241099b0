// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard model.
//!
//! A [`Keyboard`] owns a tree of positioned elements (keyboard, sections,
//! keys), the registry of key outlines, and the modifier state machine that
//! selects which symbol of each key's [`SymbolMatrix`] is current.

pub mod container;
pub mod element;
pub mod event;
pub mod geometry;
pub mod key;
pub mod keyboard;
pub mod modifier;
pub mod outline;
pub mod section;
pub mod symbol;
pub mod symbol_matrix;

pub use container::Container;
pub use element::{Element, ElementId, SymbolIndex};
pub use event::{EventOrigin, KeyboardEvent, Listening, SubscriptionId};
pub use geometry::{Bounds, Orientation, Point};
pub use key::{Key, KeyId};
pub use keyboard::Keyboard;
pub use modifier::{ModifierBehavior, ModifierState};
pub use outline::{Outline, OutlineId, OutlineTable};
pub use section::{Row, Section, SectionId};
pub use symbol::{ModifierMask, Symbol, SymbolCategory, modifier_for_keysym_name};
pub use symbol_matrix::SymbolMatrix;
