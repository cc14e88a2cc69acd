//! Request, conflict and plan types shared across engine operations

use crate::error::RenameError;
use hrr_edit::WorkspaceEdit;
use hrr_symbol::{IdentifierError, SymbolId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Rename one symbol to a new display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenameRequest {
    /// Symbol to rename
    pub symbol_id: SymbolId,
    /// Proposed name, replacing the last identifier segment
    pub new_name: String,
}

impl RenameRequest {
    /// Create request
    #[inline]
    pub fn new(symbol_id: SymbolId, new_name: impl Into<String>) -> Self {
        Self {
            symbol_id,
            new_name: new_name.into(),
        }
    }

    /// Create request from a raw identifier string
    ///
    /// # Errors
    /// Returns `RenameError::InvalidInput` if `symbol_id` is not a usable
    /// identifier.
    pub fn parse(symbol_id: &str, new_name: impl Into<String>) -> Result<Self, RenameError> {
        let symbol_id = symbol_id
            .parse::<SymbolId>()
            .map_err(|e| RenameError::InvalidInput(e.to_string()))?;
        Ok(Self::new(symbol_id, new_name))
    }

    /// Current display name
    #[inline]
    #[must_use]
    pub fn old_name(&self) -> &str {
        self.symbol_id.name()
    }

    /// Identifier the symbol will have after the rename
    #[must_use]
    pub fn target_id(&self) -> SymbolId {
        self.symbol_id.with_name(&self.new_name)
    }
}

/// Conflict category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// New name already resolves to another symbol in an occurrence's scope
    Shadow,
    /// New name is a reserved word
    Reserved,
    /// New name breaks the identifier grammar
    InvalidIdentifier,
    /// Symbol to rename does not exist
    MissingSymbol,
    /// Analyzer failed while checking
    AnalysisError,
}

impl ConflictKind {
    /// Kinds that fail a rename on their own
    #[inline]
    #[must_use]
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Shadow | Self::Reserved)
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Shadow => "shadow",
            Self::Reserved => "reserved",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::MissingSymbol => "missing_symbol",
            Self::AnalysisError => "analysis_error",
        };
        f.write_str(text)
    }
}

/// Conflict severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Prevents the rename
    Error,
    /// Reported, does not prevent the rename
    Warning,
    /// Informational
    Info,
}

/// One reason a rename may be unsafe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Category
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    /// Human-readable description
    pub message: String,
    /// Severity, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// File the conflict was found in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Conflict {
    /// Create conflict
    pub fn new(kind: ConflictKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            severity: None,
            path: None,
        }
    }

    /// New name would shadow `existing` in `scope`
    #[must_use]
    pub fn shadow(new_name: &str, existing: &SymbolId, scope: Option<&str>) -> Self {
        let message = match scope {
            Some(scope) => format!("'{new_name}' already refers to {existing} in scope {scope}"),
            None => format!("'{new_name}' already refers to {existing}"),
        };
        Self::new(ConflictKind::Shadow, message).with_severity(Severity::Error)
    }

    /// New name is reserved
    #[must_use]
    pub fn reserved(new_name: &str) -> Self {
        Self::new(
            ConflictKind::Reserved,
            format!("'{new_name}' is a reserved word"),
        )
        .with_severity(Severity::Error)
    }

    /// New name breaks the identifier grammar
    #[must_use]
    pub fn invalid_identifier(err: &IdentifierError) -> Self {
        Self::new(ConflictKind::InvalidIdentifier, err.to_string()).with_severity(Severity::Error)
    }

    /// Symbol does not exist
    #[must_use]
    pub fn missing_symbol(symbol_id: &SymbolId) -> Self {
        Self::new(
            ConflictKind::MissingSymbol,
            format!("symbol {symbol_id} does not exist"),
        )
        .with_severity(Severity::Error)
    }

    /// Analyzer failed during a check
    pub fn analysis_error(message: impl Into<String>) -> Self {
        Self::new(ConflictKind::AnalysisError, message).with_severity(Severity::Warning)
    }

    /// With severity
    #[inline]
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// With file path
    #[inline]
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Does this conflict fail a rename
    #[inline]
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.kind.is_blocking()
    }
}

/// Edit realising one rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePlan {
    /// Renamed symbol
    pub symbol_id: SymbolId,
    /// Name before the rename
    pub old_name: String,
    /// Name after the rename
    pub new_name: String,
    /// One text edit per occurrence
    pub edit: WorkspaceEdit,
    /// Non-blocking conflicts found while planning
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Conflict>,
}

impl RenamePlan {
    /// Request this plan realises
    #[must_use]
    pub fn request(&self) -> RenameRequest {
        RenameRequest::new(self.symbol_id.clone(), self.new_name.clone())
    }
}

/// Merged edit for several renames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPlan {
    /// Individual plans, in request order
    pub plans: Vec<RenamePlan>,
    /// All edits of all plans
    pub edit: WorkspaceEdit,
}

/// Successful structural validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Files touched
    pub files: usize,
    /// Edits checked
    pub edits: usize,
    /// Non-blocking advisories
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Any advisories raised
    #[inline]
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Options for applying a workspace edit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Compute new contents without writing them
    pub dry_run: bool,
}

impl ApplyOptions {
    /// Compute only
    #[inline]
    #[must_use]
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    /// Compute and write
    #[inline]
    #[must_use]
    pub fn write() -> Self {
        Self { dry_run: false }
    }
}

/// New file contents produced by applying an edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResult {
    /// Path to new content
    pub files: BTreeMap<PathBuf, String>,
    /// Whether contents were written to storage
    pub written: bool,
}

impl ApplyResult {
    /// Paths that were edited
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrr_symbol::validate_identifier;

    #[test]
    fn only_shadow_and_reserved_block() {
        assert!(ConflictKind::Shadow.is_blocking());
        assert!(ConflictKind::Reserved.is_blocking());
        assert!(!ConflictKind::InvalidIdentifier.is_blocking());
        assert!(!ConflictKind::MissingSymbol.is_blocking());
        assert!(!ConflictKind::AnalysisError.is_blocking());
    }

    #[test]
    fn validation_report_flags_advisories() {
        let mut report = ValidationReport::default();
        assert!(!report.has_warnings());
        report.warnings.push("a.gml has 51 edits".to_string());
        assert!(report.has_warnings());
    }

    #[test]
    fn conflict_serializes_kind_as_type() {
        let json = serde_json::to_value(Conflict::reserved("if").with_path("a.gml")).unwrap();
        assert_eq!(json["type"], "reserved");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["path"], "a.gml");

        let bare = serde_json::to_value(Conflict::new(ConflictKind::Shadow, "x")).unwrap();
        assert!(bare.get("severity").is_none());
    }

    #[test]
    fn invalid_identifier_conflict_carries_reason() {
        let err = validate_identifier("1abc").unwrap_err();
        let conflict = Conflict::invalid_identifier(&err);
        assert_eq!(conflict.kind, ConflictKind::InvalidIdentifier);
        assert!(conflict.message.contains("1abc"));
    }

    #[test]
    fn request_parse_rejects_blank_identifier() {
        assert!(matches!(
            RenameRequest::parse("  ", "x"),
            Err(RenameError::InvalidInput(_))
        ));
        let request = RenameRequest::parse("proj/script/scr_old", "scr_new").unwrap();
        assert_eq!(request.old_name(), "scr_old");
        assert_eq!(request.target_id().to_string(), "proj/script/scr_new");
    }

    #[test]
    fn request_round_trips_through_json() {
        let json = r#"{"symbol_id":"proj/script/scr_old","new_name":"scr_new"}"#;
        let request: RenameRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.symbol_id.name(), "scr_old");
        assert_eq!(serde_json::to_string(&request).unwrap(), json);
    }
}
