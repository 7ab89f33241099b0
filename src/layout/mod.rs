// SPDX-License-Identifier: GPL-3.0-only

//! JSON layout documents for on-screen keyboards.
//!
//! A layout document is the serialized form of a [`Keyboard`](crate::model::Keyboard):
//! a tree of objects tagged with a `"type"` field (`keyboard`, `section`,
//! `key`), plus the list of key outlines the keys refer to by 1-based index.
//!
//! # Features
//!
//! - **Permissive validation**: Fixable problems become warnings, the rest
//!   fail the parse with every issue listed
//! - **Helpful error messages**: Line numbers, field paths and suggestions
//! - **Round trips**: Keyboards can be written back as documents
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use oskboard::layout::{parse_layout_file, write_layout};
//!
//! match parse_layout_file("layouts/us.json") {
//!     Ok(result) => {
//!         for warning in &result.warnings {
//!             println!("  {}", warning);
//!         }
//!         write_layout(&result.layout, "/tmp/us.json")?;
//!     }
//!     Err(e) => eprintln!("Failed to parse layout: {}", e),
//! }
//! ```
//!
//! # Document Format
//!
//! ```json
//! {
//!   "type": "keyboard",
//!   "bounds": {"x": 0, "y": 0, "width": 100, "height": 50},
//!   "outlines": [{"corner_radius": 2, "points": [{"x": 0, "y": 0}, {"x": 40, "y": 0},
//!                                                {"x": 40, "y": 40}, {"x": 0, "y": 40}]}],
//!   "sections": [{
//!     "type": "section",
//!     "bounds": {"x": 0, "y": 0, "width": 100, "height": 50},
//!     "angle": 0,
//!     "rows": [{"num_columns": 2, "orientation": "horizontal"}],
//!     "keys": [{
//!       "type": "key", "keycode": 38, "column": 0, "row": 0, "oref": 1,
//!       "bounds": {"x": 0, "y": 0, "width": 40, "height": 40},
//!       "symbols": {"num_groups": 1, "num_levels": 2, "data": ["a", "A"]}
//!     }]
//!   }]
//! }
//! ```

pub mod builder;
pub mod parser;
pub mod types;
pub mod validation;
pub mod writer;

pub use builder::build_keyboard;
pub use parser::{parse_document, parse_layout_file, parse_layout_from_string};
pub use types::{
    ElementType, KeyDocument, KeyboardDocument, OutlineDocument, ParseError, ParseResult,
    SectionDocument, Severity, SymbolDocument, SymbolMatrixDocument, SymbolSpec, ValidationIssue,
};
pub use validation::validate_document;
pub use writer::{keyboard_to_document, layout_to_string, write_layout};
