//! JSON project manifest
//!
//! A manifest is a precomputed dump of what a language server would know
//! about a project: which symbols exist, where they occur, how names resolve
//! per scope and which symbols depend on which. [`ManifestAnalyzer`] answers
//! the [`SemanticAnalyzer`] contract from it.
//!
//! ```json
//! {
//!   "symbols": ["proj/script/scr_move"],
//!   "occurrences": {
//!     "proj/script/scr_move": [
//!       { "path": "scripts/scr_move.gml", "start": 9, "end": 17, "kind": "definition" }
//!     ]
//!   },
//!   "bindings": [{ "name": "scr_walk", "scope_id": null, "symbol_id": "proj/script/scr_walk" }],
//!   "dependents": {
//!     "proj/script/scr_move": [{ "symbol_id": "proj/event/obj_player/step" }]
//!   },
//!   "reserved_words": ["player"],
//!   "file_symbols": { "scripts/scr_move.gml": ["proj/script/scr_move"] }
//! }
//! ```

use hrr_core::{CollaboratorError, Dependent, SemanticAnalyzer};
use hrr_symbol::{Occurrence, SymbolId, SymbolIdError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Name resolution entry: `name` seen from `scope_id` means `symbol_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeBinding {
    pub name: String,
    /// `None` for the global scope
    #[serde(default)]
    pub scope_id: Option<String>,
    pub symbol_id: SymbolId,
}

/// Raw manifest as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectManifest {
    /// Symbols without occurrences can still be declared here
    pub symbols: Vec<SymbolId>,
    pub occurrences: BTreeMap<String, Vec<Occurrence>>,
    pub bindings: Vec<ScopeBinding>,
    /// Keyed by the symbol depended upon
    pub dependents: BTreeMap<String, Vec<Dependent>>,
    pub reserved_words: Vec<String>,
    pub file_symbols: BTreeMap<PathBuf, Vec<SymbolId>>,
}

/// Errors loading a manifest
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("cannot read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("bad symbol id '{id}' in manifest: {source}")]
    SymbolId {
        id: String,
        #[source]
        source: SymbolIdError,
    },
}

/// Analyzer backed by a [`ProjectManifest`]
#[derive(Debug, Default)]
pub struct ManifestAnalyzer {
    symbols: HashSet<SymbolId>,
    occurrences: HashMap<SymbolId, Vec<Occurrence>>,
    bindings: HashMap<(String, Option<String>), SymbolId>,
    dependents: HashMap<SymbolId, Vec<Dependent>>,
    reserved_words: Vec<String>,
    file_symbols: HashMap<PathBuf, Vec<SymbolId>>,
}

impl ManifestAnalyzer {
    /// Index a manifest
    ///
    /// # Errors
    /// Returns `ManifestError::SymbolId` if a map key is not a valid symbol id.
    pub fn new(manifest: ProjectManifest) -> Result<Self, ManifestError> {
        let occurrences = manifest
            .occurrences
            .into_iter()
            .map(|(id, list)| Ok((parse_key(id)?, list)))
            .collect::<Result<HashMap<_, _>, ManifestError>>()?;
        let dependents = manifest
            .dependents
            .into_iter()
            .map(|(id, list)| Ok((parse_key(id)?, list)))
            .collect::<Result<HashMap<_, _>, ManifestError>>()?;

        let mut symbols: HashSet<SymbolId> = manifest.symbols.into_iter().collect();
        symbols.extend(occurrences.keys().cloned());

        let bindings = manifest
            .bindings
            .into_iter()
            .map(|b| ((b.name, b.scope_id), b.symbol_id))
            .collect();

        tracing::debug!(
            symbols = symbols.len(),
            dependents = dependents.len(),
            "indexed project manifest"
        );

        Ok(Self {
            symbols,
            occurrences,
            bindings,
            dependents,
            reserved_words: manifest.reserved_words,
            file_symbols: manifest.file_symbols.into_iter().collect(),
        })
    }

    /// Parse and index manifest JSON
    ///
    /// # Errors
    /// Returns `ManifestError::Parse` for malformed JSON.
    pub fn from_json_str(text: &str) -> Result<Self, ManifestError> {
        Self::new(serde_json::from_str(text)?)
    }

    /// Read a manifest file
    ///
    /// # Errors
    /// Returns `ManifestError::Io` if the file cannot be read.
    pub async fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ManifestError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&text)
    }

    /// Number of known symbols
    #[inline]
    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

fn parse_key(id: String) -> Result<SymbolId, ManifestError> {
    id.parse()
        .map_err(|source| ManifestError::SymbolId { id, source })
}

#[async_trait::async_trait]
impl SemanticAnalyzer for ManifestAnalyzer {
    async fn has_symbol(&self, symbol_id: &SymbolId) -> Result<bool, CollaboratorError> {
        Ok(self.symbols.contains(symbol_id))
    }

    async fn get_symbol_occurrences(
        &self,
        symbol_id: &SymbolId,
    ) -> Result<Vec<Occurrence>, CollaboratorError> {
        Ok(self.occurrences.get(symbol_id).cloned().unwrap_or_default())
    }

    async fn lookup(
        &self,
        name: &str,
        scope_id: Option<&str>,
    ) -> Result<Option<SymbolId>, CollaboratorError> {
        let scoped = scope_id.and_then(|scope| {
            self.bindings
                .get(&(name.to_string(), Some(scope.to_string())))
        });
        // names not bound in the scope resolve globally
        Ok(scoped
            .or_else(|| self.bindings.get(&(name.to_string(), None)))
            .cloned())
    }

    async fn get_reserved_keywords(&self) -> Result<Vec<String>, CollaboratorError> {
        Ok(self.reserved_words.clone())
    }

    async fn get_file_symbols(&self, path: &Path) -> Result<Vec<SymbolId>, CollaboratorError> {
        Ok(self.file_symbols.get(path).cloned().unwrap_or_default())
    }

    async fn get_dependents(
        &self,
        symbol_ids: &[SymbolId],
    ) -> Result<Vec<Dependent>, CollaboratorError> {
        Ok(symbol_ids
            .iter()
            .filter_map(|id| self.dependents.get(id))
            .flatten()
            .cloned()
            .collect())
    }

    async fn get_symbol_at_position(
        &self,
        path: &Path,
        offset: usize,
    ) -> Result<Option<SymbolId>, CollaboratorError> {
        let hit = self.occurrences.iter().find(|(_, list)| {
            list.iter()
                .any(|o| o.path == path && o.start <= offset && offset < o.end)
        });
        Ok(hit.map(|(id, _)| id.clone()))
    }
}
