//! Symbol occurrences reported by the semantic analyzer

use std::path::PathBuf;

/// Whether an occurrence defines or uses the symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceKind {
    /// Declaration site
    Definition,
    /// Any use of the symbol
    Reference,
}

/// One source span where a symbol is defined or used
///
/// Offsets are byte offsets into the file content, `start..end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Occurrence {
    /// File containing the span
    pub path: PathBuf,
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Analyzer scope the occurrence sits in, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
    /// Definition or reference
    pub kind: OccurrenceKind,
}

impl Occurrence {
    /// Create a reference occurrence without scope information
    #[inline]
    #[must_use]
    pub fn reference(path: impl Into<PathBuf>, start: usize, end: usize) -> Self {
        Self {
            path: path.into(),
            start,
            end,
            scope_id: None,
            kind: OccurrenceKind::Reference,
        }
    }

    /// Create a definition occurrence without scope information
    #[inline]
    #[must_use]
    pub fn definition(path: impl Into<PathBuf>, start: usize, end: usize) -> Self {
        Self {
            kind: OccurrenceKind::Definition,
            ..Self::reference(path, start, end)
        }
    }

    /// Attach a scope
    #[inline]
    #[must_use]
    pub fn in_scope(mut self, scope_id: impl Into<String>) -> Self {
        self.scope_id = Some(scope_id.into());
        self
    }

    /// Is this the declaration site
    #[inline]
    #[must_use]
    pub fn is_definition(&self) -> bool {
        self.kind == OccurrenceKind::Definition
    }

    /// Span length in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Zero-length span
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
