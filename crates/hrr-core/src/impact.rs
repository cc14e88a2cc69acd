//! Non-mutating rename preview

use crate::collaborators::CapabilityExt;
use crate::engine::RenameEngine;
use crate::error::RenameError;
use crate::safety::HotReloadSafety;
use crate::types::{Conflict, ConflictKind, RenameRequest};
use hrr_symbol::{validate_identifier, SymbolId, SymbolKind, VariableScope};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

/// Occurrence count above which a rename is flagged as large
pub const LARGE_RENAME_OCCURRENCES: usize = 50;

/// Dependent count above which a rename is flagged as far-reaching
pub const MANY_DEPENDENTS: usize = 10;

/// Counts behind an impact report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactSummary {
    /// All occurrences
    pub total_occurrences: usize,
    /// Definitions among them
    pub definitions: usize,
    /// References among them
    pub references: usize,
    /// Files containing an occurrence
    pub affected_files: BTreeSet<PathBuf>,
    /// Distinct direct dependents
    pub dependent_symbols: usize,
}

/// Preview of what a rename would do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameImpact {
    /// Symbol to rename
    pub symbol_id: SymbolId,
    /// Current name
    pub old_name: String,
    /// Proposed name
    pub new_name: String,
    /// Kind read from the identifier
    pub kind: SymbolKind,
    /// Rename would plan successfully
    pub valid: bool,
    /// Every conflict found, blocking or not
    pub conflicts: Vec<Conflict>,
    /// Counts
    pub summary: ImpactSummary,
    /// Advisories; never blocking
    pub warnings: Vec<String>,
    /// Reload verdict, present when the rename is valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hot_reload: Option<HotReloadSafety>,
}

impl RenameEngine {
    /// Preview a rename without planning or writing anything
    ///
    /// Invalid identifiers and missing symbols are reported as conflicts in
    /// the returned impact rather than as errors.
    ///
    /// # Errors
    /// Returns `RenameError::Collaborator` if the analyzer fails.
    pub async fn analyze_rename_impact(
        &self,
        request: &RenameRequest,
    ) -> Result<RenameImpact, RenameError> {
        let symbol_id = &request.symbol_id;
        let kind = symbol_id.kind();
        let mut impact = RenameImpact {
            symbol_id: symbol_id.clone(),
            old_name: symbol_id.name().to_string(),
            new_name: request.new_name.clone(),
            kind: kind.clone(),
            valid: false,
            conflicts: Vec::new(),
            summary: ImpactSummary::default(),
            warnings: Vec::new(),
            hot_reload: None,
        };

        if let Err(e) = validate_identifier(&request.new_name) {
            impact.conflicts.push(Conflict::invalid_identifier(&e));
        }
        if !self.symbol_exists(symbol_id).await? {
            impact.conflicts.push(Conflict::missing_symbol(symbol_id));
            return Ok(impact);
        }

        let no_op = impact.old_name == request.new_name;
        if no_op {
            impact
                .warnings
                .push(format!("'{}' is already the current name", request.new_name));
        }

        let occurrences = self.occurrences_of(symbol_id).await?;
        impact.conflicts.extend(
            self.detect_conflicts(symbol_id, &request.new_name, &occurrences)
                .await,
        );

        let summary = &mut impact.summary;
        summary.total_occurrences = occurrences.len();
        summary.definitions = occurrences.iter().filter(|o| o.is_definition()).count();
        summary.references = summary.total_occurrences - summary.definitions;
        summary.affected_files = occurrences.iter().map(|o| o.path.clone()).collect();

        let dependents = self
            .analyzer()
            .get_dependents(std::slice::from_ref(symbol_id))
            .await
            .or_fallback(Vec::new())?;
        summary.dependent_symbols = dependents
            .iter()
            .map(|d| &d.symbol_id)
            .collect::<HashSet<_>>()
            .len();

        impact.warnings.extend(advisories(&kind, &impact.summary));

        impact.valid = !no_op
            && !impact.conflicts.iter().any(|c| {
                c.is_blocking()
                    || matches!(
                        c.kind,
                        ConflictKind::InvalidIdentifier | ConflictKind::MissingSymbol
                    )
            });
        if impact.valid {
            impact.hot_reload = Some(HotReloadSafety::for_kind(&kind));
        }

        tracing::info!(
            symbol = %symbol_id,
            occurrences = impact.summary.total_occurrences,
            files = impact.summary.affected_files.len(),
            dependents = impact.summary.dependent_symbols,
            valid = impact.valid,
            "rename impact analyzed"
        );
        Ok(impact)
    }
}

fn advisories(kind: &SymbolKind, summary: &ImpactSummary) -> Vec<String> {
    let mut warnings = Vec::new();
    if summary.total_occurrences > LARGE_RENAME_OCCURRENCES {
        warnings.push(format!(
            "large rename: {} occurrences across {} files",
            summary.total_occurrences,
            summary.affected_files.len()
        ));
    }
    if summary.dependent_symbols > MANY_DEPENDENTS {
        warnings.push(format!(
            "{} dependent symbols will need to reload",
            summary.dependent_symbols
        ));
    }
    match kind {
        SymbolKind::Variable(VariableScope::Global) => {
            warnings.push("renaming a global variable affects every script that reads it".into());
        }
        SymbolKind::Macro => {
            warnings.push("renaming a macro requires recompiling every use site".into());
        }
        SymbolKind::Enum => {
            warnings.push("renaming an enum requires recompiling every use site".into());
        }
        _ => {}
    }
    warnings
}
