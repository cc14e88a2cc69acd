//! Edit validation and application errors

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// Byte span used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Span {
    /// Start byte offset
    pub start: usize,
    /// End byte offset
    pub end: usize,
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Structural problems with a workspace edit
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// Nothing to apply
    #[error("workspace edit contains no edits")]
    Empty,

    /// Edit with `start > end`
    #[error("invalid edit range {span} in {}", path.display())]
    InvalidRange { path: PathBuf, span: Span },

    /// Two edits in one file overlap
    #[error("overlapping edits in {}: {first} and {second}", path.display())]
    Overlap {
        path: PathBuf,
        first: Span,
        second: Span,
    },

    /// Edit falls outside the file or splits a UTF-8 character
    #[error("edit {span} does not fit {} ({len} bytes)", path.display())]
    OutOfBounds {
        path: PathBuf,
        span: Span,
        len: usize,
    },
}
