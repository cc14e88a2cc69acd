//! Text edits and workspace edits
//!
//! Provides [`TextEdit`] (one file-scoped replacement) and [`WorkspaceEdit`]
//! (the full set of replacements for one logical refactor).

use crate::error::{EditError, Span};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Replace bytes `start..end` of `path` with `new_text`
///
/// # Invariants
/// - `start <= end` (checked by [`WorkspaceEdit::validate`], not at construction)
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TextEdit {
    /// Target file
    pub path: PathBuf,
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Replacement text
    pub new_text: String,
}

impl TextEdit {
    /// Create new edit
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, start: usize, end: usize, new_text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            start,
            end,
            new_text: new_text.into(),
        }
    }

    /// Replaced byte range
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Span for diagnostics
    #[inline]
    #[must_use]
    pub fn span(&self) -> Span {
        Span {
            start: self.start,
            end: self.end,
        }
    }
}

/// Unordered bag of text edits, possibly spanning many files
///
/// Construction never rejects an edit. Ordering and overlap rules only apply
/// to the grouped view produced by [`WorkspaceEdit::group_by_file`], which is
/// recomputed on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WorkspaceEdit {
    edits: Vec<TextEdit>,
}

impl WorkspaceEdit {
    /// Create empty workspace edit
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an edit unconditionally
    pub fn add_edit(
        &mut self,
        path: impl Into<PathBuf>,
        start: usize,
        end: usize,
        new_text: impl Into<String>,
    ) {
        self.edits.push(TextEdit::new(path, start, end, new_text));
    }

    /// Append an existing edit
    #[inline]
    pub fn push(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    /// Move all edits of `other` into this edit
    pub fn merge(&mut self, other: WorkspaceEdit) {
        self.edits.extend(other.edits);
    }

    /// All edits in insertion order
    #[inline]
    #[must_use]
    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    /// Number of edits
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// No edits at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Distinct files touched
    #[must_use]
    pub fn files(&self) -> BTreeSet<PathBuf> {
        self.edits.iter().map(|e| e.path.clone()).collect()
    }

    /// Does any edit target `path`
    #[must_use]
    pub fn touches(&self, path: &Path) -> bool {
        self.edits.iter().any(|e| e.path == path)
    }

    /// Edits targeting `path`, in insertion order
    #[must_use]
    pub fn edits_for(&self, path: &Path) -> Vec<&TextEdit> {
        self.edits.iter().filter(|e| e.path == path).collect()
    }

    /// Edit count per file
    #[must_use]
    pub fn file_edit_counts(&self) -> BTreeMap<PathBuf, usize> {
        let mut counts = BTreeMap::new();
        for edit in &self.edits {
            *counts.entry(edit.path.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Per-file view with edits sorted by descending `start`
    ///
    /// Ties are broken by descending `end`, so a replacement is applied before
    /// an insertion at its start offset. Applying a file's edits in this order
    /// never invalidates the offsets of edits still to come.
    #[must_use]
    pub fn group_by_file(&self) -> BTreeMap<PathBuf, Vec<TextEdit>> {
        let mut grouped: BTreeMap<PathBuf, Vec<TextEdit>> = BTreeMap::new();
        for edit in &self.edits {
            grouped.entry(edit.path.clone()).or_default().push(edit.clone());
        }
        for edits in grouped.values_mut() {
            sort_descending(edits);
        }
        grouped
    }

    /// Structural validation
    ///
    /// # Errors
    /// - `EditError::Empty` if there are no edits
    /// - `EditError::InvalidRange` if any edit has `start > end`
    /// - `EditError::Overlap` if two edits in one file overlap
    pub fn validate(&self) -> Result<(), EditError> {
        if self.edits.is_empty() {
            return Err(EditError::Empty);
        }

        if let Some(bad) = self.edits.iter().find(|e| e.start > e.end) {
            return Err(EditError::InvalidRange {
                path: bad.path.clone(),
                span: bad.span(),
            });
        }

        for (path, edits) in self.group_by_file() {
            check_descending_disjoint(&path, &edits)?;
        }

        Ok(())
    }
}

impl FromIterator<TextEdit> for WorkspaceEdit {
    fn from_iter<I: IntoIterator<Item = TextEdit>>(iter: I) -> Self {
        Self {
            edits: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for WorkspaceEdit {
    type Item = TextEdit;
    type IntoIter = std::vec::IntoIter<TextEdit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.into_iter()
    }
}

impl Extend<TextEdit> for WorkspaceEdit {
    fn extend<I: IntoIterator<Item = TextEdit>>(&mut self, iter: I) {
        self.edits.extend(iter);
    }
}

pub(crate) fn sort_descending(edits: &mut [TextEdit]) {
    edits.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));
}

/// `edits` must already be sorted by [`sort_descending`]
pub(crate) fn check_descending_disjoint(path: &Path, edits: &[TextEdit]) -> Result<(), EditError> {
    for pair in edits.windows(2) {
        let (later, earlier) = (&pair[0], &pair[1]);
        if earlier.end > later.start {
            return Err(EditError::Overlap {
                path: path.to_path_buf(),
                first: earlier.span(),
                second: later.span(),
            });
        }
    }
    Ok(())
}
