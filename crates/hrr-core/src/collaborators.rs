//! Collaborator contracts
//!
//! The engine owns no symbol table, parser or storage. Everything it knows
//! about a project comes through these traits:
//!
//! - [`SemanticAnalyzer`]: symbols, occurrences, scopes, dependents
//! - [`Parser`]: syntax trees, used for cursor lookup and syntax re-checks
//! - [`Transpiler`]: turns script source into a runtime patch record
//! - [`FileStore`]: read and write file text, injected per call
//!
//! Analyzer, parser and transpiler methods are optional capabilities. Each
//! default implementation reports [`CollaboratorError::Unsupported`], and the
//! engine substitutes a permissive default at the call site with
//! [`CapabilityExt::or_fallback`]. A collaborator therefore implements only
//! what it can answer.

use crate::error::{CollaboratorError, StorageError};
use hrr_edit::WorkspaceEdit;
use hrr_symbol::{Occurrence, SymbolId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Substitute a default for an absent capability
pub trait CapabilityExt<T> {
    /// `Unsupported` becomes `Ok(fallback)`; real failures pass through
    ///
    /// # Errors
    /// Returns the collaborator error when the capability exists but failed.
    fn or_fallback(self, fallback: T) -> Result<T, CollaboratorError>;

    /// `Unsupported` becomes `Ok(None)`; real failures pass through
    ///
    /// # Errors
    /// Returns the collaborator error when the capability exists but failed.
    fn supported(self) -> Result<Option<T>, CollaboratorError>;
}

impl<T> CapabilityExt<T> for Result<T, CollaboratorError> {
    fn or_fallback(self, fallback: T) -> Result<T, CollaboratorError> {
        match self {
            Err(CollaboratorError::Unsupported { capability }) => {
                tracing::debug!(capability, "capability unsupported, using default");
                Ok(fallback)
            }
            other => other,
        }
    }

    fn supported(self) -> Result<Option<T>, CollaboratorError> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(CollaboratorError::Unsupported { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Symbol that depends on another
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependent {
    /// Dependent symbol
    pub symbol_id: SymbolId,
    /// File defining the dependent, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

impl Dependent {
    /// Dependent without a known file
    #[inline]
    #[must_use]
    pub fn new(symbol_id: SymbolId) -> Self {
        Self {
            symbol_id,
            file_path: None,
        }
    }

    /// With defining file
    #[inline]
    #[must_use]
    pub fn in_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

/// Analyzer verdict on a proposed workspace edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditVerdict {
    /// Edit may be applied
    pub valid: bool,
    /// Reasons it may not
    #[serde(default)]
    pub errors: Vec<String>,
    /// Non-blocking remarks
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl EditVerdict {
    /// Accepting verdict
    #[must_use]
    pub fn accept() -> Self {
        Self {
            valid: true,
            ..Self::default()
        }
    }

    /// Rejecting verdict
    #[must_use]
    pub fn reject<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            valid: false,
            errors: errors.into_iter().map(Into::into).collect(),
            warnings: Vec::new(),
        }
    }
}

/// Semantic model of the analyzed project
///
/// Every method is optional. Implementations override what they support.
#[async_trait::async_trait]
pub trait SemanticAnalyzer: Send + Sync {
    /// Does the symbol exist
    async fn has_symbol(&self, _symbol_id: &SymbolId) -> Result<bool, CollaboratorError> {
        Err(CollaboratorError::unsupported("has_symbol"))
    }

    /// Every definition and reference of the symbol
    async fn get_symbol_occurrences(
        &self,
        _symbol_id: &SymbolId,
    ) -> Result<Vec<Occurrence>, CollaboratorError> {
        Err(CollaboratorError::unsupported("get_symbol_occurrences"))
    }

    /// Symbol `name` resolves to within `scope_id` (project scope when `None`)
    async fn lookup(
        &self,
        _name: &str,
        _scope_id: Option<&str>,
    ) -> Result<Option<SymbolId>, CollaboratorError> {
        Err(CollaboratorError::unsupported("lookup"))
    }

    /// Reserved words beyond the built-in table
    async fn get_reserved_keywords(&self) -> Result<Vec<String>, CollaboratorError> {
        Err(CollaboratorError::unsupported("get_reserved_keywords"))
    }

    /// Deep validation of a proposed edit
    async fn validate_edits(&self, _edit: &WorkspaceEdit) -> Result<EditVerdict, CollaboratorError> {
        Err(CollaboratorError::unsupported("validate_edits"))
    }

    /// Symbols defined in a file
    async fn get_file_symbols(&self, _path: &Path) -> Result<Vec<SymbolId>, CollaboratorError> {
        Err(CollaboratorError::unsupported("get_file_symbols"))
    }

    /// Direct dependents of the given symbols
    async fn get_dependents(
        &self,
        _symbol_ids: &[SymbolId],
    ) -> Result<Vec<Dependent>, CollaboratorError> {
        Err(CollaboratorError::unsupported("get_dependents"))
    }

    /// Symbol under a byte offset
    async fn get_symbol_at_position(
        &self,
        _path: &Path,
        _offset: usize,
    ) -> Result<Option<SymbolId>, CollaboratorError> {
        Err(CollaboratorError::unsupported("get_symbol_at_position"))
    }
}

/// Syntax tree node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    /// Start byte offset
    pub start: usize,
    /// End byte offset
    pub end: usize,
    /// Child nodes
    #[serde(default)]
    pub children: Vec<SyntaxNode>,
    /// Symbol this node names, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_id: Option<SymbolId>,
}

impl SyntaxNode {
    /// Leaf or container node without a symbol
    #[inline]
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            children: Vec::new(),
            symbol_id: None,
        }
    }

    /// With symbol
    #[inline]
    #[must_use]
    pub fn naming(mut self, symbol_id: SymbolId) -> Self {
        self.symbol_id = Some(symbol_id);
        self
    }

    /// With child
    #[inline]
    #[must_use]
    pub fn with_child(mut self, child: SyntaxNode) -> Self {
        self.children.push(child);
        self
    }

    /// Does the node cover `offset`
    ///
    /// The end offset counts, so a cursor just after an identifier still
    /// selects it.
    #[inline]
    #[must_use]
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Symbol of the innermost node covering `offset` that names one
    #[must_use]
    pub fn symbol_at(&self, offset: usize) -> Option<&SymbolId> {
        if !self.contains(offset) {
            return None;
        }
        self.children
            .iter()
            .find_map(|child| child.symbol_at(offset))
            .or(self.symbol_id.as_ref())
    }
}

/// Source parser
#[async_trait::async_trait]
pub trait Parser: Send + Sync {
    /// Parse a file into a syntax tree
    async fn parse(&self, _path: &Path) -> Result<SyntaxNode, CollaboratorError> {
        Err(CollaboratorError::unsupported("parse"))
    }
}

/// Script handed to the transpiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSource {
    /// Script text
    pub source_text: String,
    /// Script symbol
    pub symbol_id: SymbolId,
}

/// Runtime patch descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRecord {
    /// Patch category, e.g. `script`
    pub kind: String,
    /// Patched symbol
    pub id: SymbolId,
    /// Source the patch was produced from
    pub source_text: String,
    /// Content version; equal sources give equal versions
    pub version: u64,
    /// Transpiled output, when a transpiler produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl PatchRecord {
    /// Script patch carrying only the source
    #[must_use]
    pub fn minimal(id: SymbolId, source_text: impl Into<String>) -> Self {
        let source_text = source_text.into();
        let version = content_version(&source_text);
        Self {
            kind: "script".to_string(),
            id,
            source_text,
            version,
            payload: None,
        }
    }
}

/// Leading 8 bytes of the SHA-256 digest of `text`, big-endian
#[must_use]
pub fn content_version(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Source to runtime transpiler
#[async_trait::async_trait]
pub trait Transpiler: Send + Sync {
    /// Produce a patch for a script
    async fn transpile_script(&self, _source: &ScriptSource) -> Result<PatchRecord, CollaboratorError> {
        Err(CollaboratorError::unsupported("transpile_script"))
    }
}

/// File text storage, injected per call
#[async_trait::async_trait]
pub trait FileStore: Send + Sync {
    /// Read a whole file
    async fn read_file(&self, path: &Path) -> Result<String, StorageError>;

    /// Replace a whole file
    async fn write_file(&self, path: &Path, content: &str) -> Result<(), StorageError>;
}

/// Collaborator with no capabilities
///
/// Stands in for a parser or transpiler the caller did not provide.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

#[async_trait::async_trait]
impl SemanticAnalyzer for Unavailable {}

#[async_trait::async_trait]
impl Parser for Unavailable {}

#[async_trait::async_trait]
impl Transpiler for Unavailable {}
