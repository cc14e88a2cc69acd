//! HRR Core - Rename Engine
//!
//! Workspace-wide, semantic-safe symbol renames coordinated with a hot
//! reload runtime:
//! - Plans renames into non-overlapping workspace edits
//! - Detects scope shadowing, reserved words, name collisions and circular
//!   rename chains
//! - Validates and applies edits through an injected file store
//! - Computes reload cascades with cycle detection and reload ordering
//! - Classifies hot reload feasibility and previews rename impact
//!
//! The engine keeps no symbol table. Every question about the project goes
//! to a [`SemanticAnalyzer`], [`Parser`] or [`Transpiler`], and every file
//! access goes through a [`FileStore`] passed per call.
//!
//! # Example
//!
//! ```rust,ignore
//! use hrr_core::{RenameEngine, RenameRequest};
//! use std::sync::Arc;
//!
//! # async fn example(analyzer: Arc<dyn hrr_core::SemanticAnalyzer>, store: &dyn hrr_core::FileStore)
//! #     -> Result<(), hrr_core::RenameError> {
//! let engine = RenameEngine::new(analyzer);
//! let request = RenameRequest::parse("proj/script/scr_old", "scr_new")?;
//!
//! let outcome = engine.execute_rename(&request, store, false).await?;
//! println!("edited {} files", outcome.applied.files.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod cascade;
pub mod collaborators;
pub mod config;
pub mod engine;
pub mod error;
pub mod hot_reload;
pub mod impact;
pub mod integrity;
pub mod safety;
pub mod types;

// Operations on RenameEngine
mod apply;
mod batch;
mod conflicts;
mod planner;

// Re-exports for convenience
pub use cascade::{CascadeEntry, CascadeMetadata, HotReloadCascade, DIRECT_CHANGE};
pub use collaborators::{
    content_version, CapabilityExt, Dependent, EditVerdict, FileStore, Parser, PatchRecord,
    ScriptSource, SemanticAnalyzer, SyntaxNode, Transpiler, Unavailable,
};
pub use config::{ConfigError, EngineConfig, DEFAULT_MAX_EDITS_PER_FILE};
pub use engine::RenameEngine;
pub use error::{CollaboratorError, RenameError, StorageError};
pub use hot_reload::{HotReloadPlan, HotReloadUpdate, RenameOutcome, UpdateAction};
pub use impact::{ImpactSummary, RenameImpact, LARGE_RENAME_OCCURRENCES, MANY_DEPENDENTS};
pub use integrity::IntegrityReport;
pub use safety::HotReloadSafety;
pub use types::{
    ApplyOptions, ApplyResult, BatchPlan, Conflict, ConflictKind, RenamePlan, RenameRequest,
    Severity, ValidationReport,
};

pub use hrr_edit::{Span, TextEdit, WorkspaceEdit};
pub use hrr_symbol::{Occurrence, OccurrenceKind, SymbolId, SymbolKind, VariableScope};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the rename engine
    pub use crate::{
        ApplyOptions, Conflict, ConflictKind, EngineConfig, FileStore, Occurrence, RenameEngine,
        RenameError, RenameRequest, SemanticAnalyzer, SymbolId, WorkspaceEdit,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
