//! Error types for the rename engine
//!
//! Provides error handling for:
//! - Malformed requests and identifier grammar violations
//! - Missing symbols and no-op renames
//! - Blocking conflicts, batch collisions and circular rename chains
//! - Structural edit problems and storage failures mid-apply
//! - Collaborator failures (as opposed to absent capabilities)

use crate::types::Conflict;
use hrr_edit::EditError;
use hrr_symbol::{IdentifierError, SymbolId};
use std::path::PathBuf;

/// Main rename engine error type
#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    /// Request shape is unusable, raised before any side effect
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// New name violates the identifier grammar
    #[error(transparent)]
    InvalidIdentifier(#[from] IdentifierError),

    /// Analyzer reports the symbol does not exist
    #[error("symbol not found: {0}")]
    SymbolNotFound(SymbolId),

    /// New name equals the current name
    #[error("'{name}' is already the name of {symbol_id}")]
    NoOpRename { symbol_id: SymbolId, name: String },

    /// Blocking conflicts, all of them
    #[error("rename has {} conflict(s): {}", conflicts.len(), summarize(conflicts))]
    Conflicts { conflicts: Vec<Conflict> },

    /// Structural edit problem (empty, bad range, overlap, out of bounds)
    #[error("edit validation failed: {0}")]
    Edit(#[from] EditError),

    /// Two renames in one batch target the same new name
    #[error("renames of {} all target '{new_name}'", join_ids(symbols))]
    BatchCollision {
        new_name: String,
        symbols: Vec<SymbolId>,
    },

    /// Rename chain loops back on itself
    #[error("circular rename chain: {}", join_ids(cycle))]
    CircularRename { cycle: Vec<SymbolId> },

    /// Analyzer validation hook rejected the edit
    #[error("analyzer rejected edits: {}", errors.join("; "))]
    EditsRejected { errors: Vec<String> },

    /// Storage failed while applying
    #[error("failed to apply edits to {}: {source}", path.display())]
    Application {
        path: PathBuf,
        /// Files already written before the failure
        written: Vec<PathBuf>,
        #[source]
        source: StorageError,
    },

    /// A collaborator failed (not merely unsupported)
    #[error("collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),
}

impl RenameError {
    /// Check if error carries blocking conflicts
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflicts { .. })
    }

    /// Conflicts carried by the error, if any
    #[must_use]
    pub fn conflicts(&self) -> &[Conflict] {
        match self {
            Self::Conflicts { conflicts } => conflicts,
            _ => &[],
        }
    }

    /// Cycle path of a circular rename chain, if any
    #[must_use]
    pub fn cycle(&self) -> Option<&[SymbolId]> {
        match self {
            Self::CircularRename { cycle } => Some(cycle),
            _ => None,
        }
    }

    /// Check if error was raised before anything was planned or written
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::InvalidIdentifier(_)
                | Self::NoOpRename { .. }
                | Self::BatchCollision { .. }
                | Self::CircularRename { .. }
        )
    }
}

fn summarize(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(|c| c.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_ids(ids: &[SymbolId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Collaborator call outcome other than success
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// Capability not provided by this collaborator
    #[error("capability not provided: {capability}")]
    Unsupported { capability: &'static str },

    /// Capability provided but the call failed
    #[error("{capability} failed: {message}")]
    Failed {
        capability: &'static str,
        message: String,
    },
}

impl CollaboratorError {
    /// Absent capability
    #[inline]
    #[must_use]
    pub fn unsupported(capability: &'static str) -> Self {
        Self::Unsupported { capability }
    }

    /// Failed call
    #[inline]
    pub fn failed(capability: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            capability,
            message: message.into(),
        }
    }

    /// Check if the capability is simply missing
    #[inline]
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

/// File store errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No such file
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Path escapes the store root or is otherwise unusable
    #[error("path not allowed: {}", .0.display())]
    Forbidden(PathBuf),

    /// Underlying I/O failure
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Conflict;

    fn id(s: &str) -> SymbolId {
        s.parse().unwrap()
    }

    #[test]
    fn conflict_error_exposes_all_conflicts() {
        let err = RenameError::Conflicts {
            conflicts: vec![Conflict::reserved("if"), Conflict::reserved("if")],
        };
        assert!(err.is_conflict());
        assert_eq!(err.conflicts().len(), 2);
        assert!(err.to_string().starts_with("rename has 2 conflict(s)"));
    }

    #[test]
    fn cycle_path_renders_in_order() {
        let err = RenameError::CircularRename {
            cycle: vec![id("p/script/A"), id("p/script/B"), id("p/script/A")],
        };
        assert_eq!(err.cycle().map(<[_]>::len), Some(3));
        assert_eq!(
            err.to_string(),
            "circular rename chain: p/script/A -> p/script/B -> p/script/A"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn unsupported_is_distinguished_from_failure() {
        assert!(CollaboratorError::unsupported("lookup").is_unsupported());
        assert!(!CollaboratorError::failed("lookup", "index offline").is_unsupported());
        assert!(RenameError::SymbolNotFound(id("p/script/x")).conflicts().is_empty());
    }
}
