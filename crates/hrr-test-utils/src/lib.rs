//! Testing utilities for HRR workspace
//!
//! Stub collaborators and an in-memory file store for driving the rename
//! engine without a real parser, analyzer or filesystem.

#![allow(missing_docs)]

use hrr_core::{
    CollaboratorError, Dependent, EditVerdict, FileStore, Parser, PatchRecord, ScriptSource,
    SemanticAnalyzer, StorageError, SyntaxNode, Transpiler,
};
use hrr_edit::WorkspaceEdit;
use hrr_symbol::{Occurrence, SymbolId};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Parse a symbol id, panicking on bad input
pub fn sid(id: &str) -> SymbolId {
    id.parse().unwrap()
}

/// `len` filler characters with `text` written at each offset
pub fn buffer_with(len: usize, text: &str, offsets: &[usize]) -> String {
    let mut buffer = "x".repeat(len);
    for &offset in offsets {
        buffer.replace_range(offset..offset + text.len(), text);
    }
    buffer
}

/// Analyzer answering from fixed tables
///
/// Each capability is unsupported until configured, so tests exercise the
/// permissive defaults by simply not configuring one.
#[derive(Default)]
pub struct StubAnalyzer {
    symbols: Option<HashSet<SymbolId>>,
    occurrences: Option<HashMap<SymbolId, Vec<Occurrence>>>,
    bindings: Option<HashMap<(String, Option<String>), SymbolId>>,
    keywords: Option<Vec<String>>,
    verdict: Option<EditVerdict>,
    file_symbols: Option<HashMap<PathBuf, Vec<SymbolId>>>,
    dependents: Option<HashMap<SymbolId, Vec<Dependent>>>,
    positions: Option<HashMap<(PathBuf, usize), SymbolId>>,
    failing: HashSet<&'static str>,
    lookups: AtomicUsize,
    occurrence_queries: AtomicUsize,
}

impl StubAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a symbol as existing
    pub fn with_symbol(mut self, id: &str) -> Self {
        self.symbols.get_or_insert_with(HashSet::new).insert(sid(id));
        self
    }

    /// Declare a symbol with its occurrences
    pub fn with_occurrences(mut self, id: &str, occurrences: Vec<Occurrence>) -> Self {
        self = self.with_symbol(id);
        self.occurrences
            .get_or_insert_with(HashMap::new)
            .insert(sid(id), occurrences);
        self
    }

    /// `name` resolves to `target` in `scope`
    pub fn with_binding(mut self, name: &str, scope: Option<&str>, target: &str) -> Self {
        self.bindings
            .get_or_insert_with(HashMap::new)
            .insert((name.to_string(), scope.map(str::to_string)), sid(target));
        self
    }

    /// Support name lookup with no bindings
    pub fn with_lookup(mut self) -> Self {
        self.bindings.get_or_insert_with(HashMap::new);
        self
    }

    pub fn with_keywords(mut self, words: &[&str]) -> Self {
        self.keywords = Some(words.iter().map(|w| (*w).to_string()).collect());
        self
    }

    pub fn with_verdict(mut self, verdict: EditVerdict) -> Self {
        self.verdict = Some(verdict);
        self
    }

    pub fn with_file_symbols(mut self, path: &str, ids: &[&str]) -> Self {
        self.file_symbols
            .get_or_insert_with(HashMap::new)
            .insert(PathBuf::from(path), ids.iter().map(|id| sid(id)).collect());
        self
    }

    /// `dependent` depends on `on`
    pub fn with_dependent(mut self, on: &str, dependent: &str, file: Option<&str>) -> Self {
        let mut entry = Dependent::new(sid(dependent));
        if let Some(file) = file {
            entry = entry.in_file(file);
        }
        self.dependents
            .get_or_insert_with(HashMap::new)
            .entry(sid(on))
            .or_default()
            .push(entry);
        self
    }

    /// Support the dependents relation with no edges
    pub fn with_dependents_relation(mut self) -> Self {
        self.dependents.get_or_insert_with(HashMap::new);
        self
    }

    pub fn with_position(mut self, path: &str, offset: usize, id: &str) -> Self {
        self.positions
            .get_or_insert_with(HashMap::new)
            .insert((PathBuf::from(path), offset), sid(id));
        self
    }

    /// Make a capability fail instead of answering
    pub fn failing(mut self, capability: &'static str) -> Self {
        self.failing.insert(capability);
        self
    }

    /// Number of `lookup` calls so far
    pub fn lookup_calls(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of `get_symbol_occurrences` calls so far
    pub fn occurrence_calls(&self) -> usize {
        self.occurrence_queries.load(Ordering::SeqCst)
    }

    fn answer<'a, T>(
        &self,
        capability: &'static str,
        table: Option<&'a T>,
    ) -> Result<&'a T, CollaboratorError> {
        if self.failing.contains(capability) {
            return Err(CollaboratorError::failed(capability, "stub failure"));
        }
        table.ok_or_else(|| CollaboratorError::unsupported(capability))
    }
}

#[async_trait::async_trait]
impl SemanticAnalyzer for StubAnalyzer {
    async fn has_symbol(&self, symbol_id: &SymbolId) -> Result<bool, CollaboratorError> {
        Ok(self.answer("has_symbol", self.symbols.as_ref())?.contains(symbol_id))
    }

    async fn get_symbol_occurrences(
        &self,
        symbol_id: &SymbolId,
    ) -> Result<Vec<Occurrence>, CollaboratorError> {
        self.occurrence_queries.fetch_add(1, Ordering::SeqCst);
        let table = self.answer("get_symbol_occurrences", self.occurrences.as_ref())?;
        Ok(table.get(symbol_id).cloned().unwrap_or_default())
    }

    async fn lookup(
        &self,
        name: &str,
        scope_id: Option<&str>,
    ) -> Result<Option<SymbolId>, CollaboratorError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let table = self.answer("lookup", self.bindings.as_ref())?;
        Ok(table
            .get(&(name.to_string(), scope_id.map(str::to_string)))
            .cloned())
    }

    async fn get_reserved_keywords(&self) -> Result<Vec<String>, CollaboratorError> {
        Ok(self.answer("get_reserved_keywords", self.keywords.as_ref())?.clone())
    }

    async fn validate_edits(&self, _edit: &WorkspaceEdit) -> Result<EditVerdict, CollaboratorError> {
        Ok(self.answer("validate_edits", self.verdict.as_ref())?.clone())
    }

    async fn get_file_symbols(&self, path: &Path) -> Result<Vec<SymbolId>, CollaboratorError> {
        let table = self.answer("get_file_symbols", self.file_symbols.as_ref())?;
        Ok(table.get(path).cloned().unwrap_or_default())
    }

    async fn get_dependents(
        &self,
        symbol_ids: &[SymbolId],
    ) -> Result<Vec<Dependent>, CollaboratorError> {
        let table = self.answer("get_dependents", self.dependents.as_ref())?;
        Ok(symbol_ids
            .iter()
            .filter_map(|id| table.get(id))
            .flatten()
            .cloned()
            .collect())
    }

    async fn get_symbol_at_position(
        &self,
        path: &Path,
        offset: usize,
    ) -> Result<Option<SymbolId>, CollaboratorError> {
        let table = self.answer("get_symbol_at_position", self.positions.as_ref())?;
        Ok(table.get(&(path.to_path_buf(), offset)).cloned())
    }
}

/// In-memory file store counting writes
#[derive(Default)]
pub struct MemoryStore {
    files: Mutex<BTreeMap<PathBuf, String>>,
    failing_writes: Mutex<HashSet<PathBuf>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, content: impl Into<String>) -> Self {
        self.files.lock().insert(PathBuf::from(path), content.into());
        self
    }

    /// Writes to `path` fail with an I/O error
    pub fn failing_writes_to(self, path: &str) -> Self {
        self.failing_writes.lock().insert(PathBuf::from(path));
        self
    }

    pub fn content(&self, path: &str) -> Option<String> {
        self.files.lock().get(Path::new(path)).cloned()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl FileStore for MemoryStore {
    async fn read_file(&self, path: &Path) -> Result<String, StorageError> {
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_path_buf()))
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<(), StorageError> {
        if self.failing_writes.lock().contains(path) {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.files.lock().insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

/// Parser returning fixed trees
#[derive(Default)]
pub struct StubParser {
    trees: HashMap<PathBuf, SyntaxNode>,
    broken: HashSet<PathBuf>,
}

impl StubParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree(mut self, path: &str, tree: SyntaxNode) -> Self {
        self.trees.insert(PathBuf::from(path), tree);
        self
    }

    /// Parsing `path` reports a syntax error
    pub fn with_broken(mut self, path: &str) -> Self {
        self.broken.insert(PathBuf::from(path));
        self
    }
}

#[async_trait::async_trait]
impl Parser for StubParser {
    async fn parse(&self, path: &Path) -> Result<SyntaxNode, CollaboratorError> {
        if self.broken.contains(path) {
            return Err(CollaboratorError::failed("parse", "unexpected token"));
        }
        Ok(self.trees.get(path).cloned().unwrap_or_default())
    }
}

/// Transpiler recording every script it sees
#[derive(Default)]
pub struct RecordingTranspiler {
    seen: Mutex<Vec<ScriptSource>>,
}

impl RecordingTranspiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<ScriptSource> {
        self.seen.lock().clone()
    }
}

#[async_trait::async_trait]
impl Transpiler for RecordingTranspiler {
    async fn transpile_script(&self, source: &ScriptSource) -> Result<PatchRecord, CollaboratorError> {
        self.seen.lock().push(source.clone());
        let mut patch = PatchRecord::minimal(source.symbol_id.clone(), source.source_text.clone());
        patch.kind = "transpiled".to_string();
        patch.payload = Some(serde_json::json!({ "js": format!("/* {} */", source.symbol_id) }));
        Ok(patch)
    }
}
