//! HRR Workspace Edits
//!
//! File-scoped text replacements for multi-file refactors.
//!
//! # Core Concepts
//!
//! - [`TextEdit`]: replace `start..end` of one file with new text
//! - [`WorkspaceEdit`]: unordered bag of text edits with a derived, per-file
//!   descending-offset view
//! - [`apply_edits`]: tail-to-head splicing that keeps offsets valid
//!
//! # Example
//!
//! ```rust
//! use hrr_edit::WorkspaceEdit;
//! use std::path::Path;
//!
//! let mut edit = WorkspaceEdit::new();
//! edit.add_edit("a.gml", 0, 3, "bar");
//! edit.add_edit("a.gml", 6, 9, "bar");
//! edit.validate().unwrap();
//!
//! let grouped = edit.group_by_file();
//! let out = hrr_edit::apply_edits(Path::new("a.gml"), "foo = foo;", &grouped[Path::new("a.gml")]).unwrap();
//! assert_eq!(out, "bar = bar;");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod edit;
mod error;
mod splice;

// Re-exports
pub use edit::{TextEdit, WorkspaceEdit};
pub use error::{EditError, Span};
pub use splice::apply_edits;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
