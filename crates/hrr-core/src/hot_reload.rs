//! Hot reload update preparation and end-to-end renames
//!
//! After a rename is written, every symbol in its cascade gets an update:
//! `recompile` when the symbol was renamed or lives in an edited file,
//! `notify` otherwise. Recompiled scripts also get a patch record. Patches
//! are descriptors only; delivering them to a running process is the
//! caller's job.

use crate::cascade::HotReloadCascade;
use crate::collaborators::{CapabilityExt, FileStore, PatchRecord, ScriptSource};
use crate::engine::RenameEngine;
use crate::error::RenameError;
use crate::integrity::IntegrityReport;
use crate::types::{ApplyOptions, ApplyResult, RenamePlan, RenameRequest, ValidationReport};
use hrr_edit::{Span, WorkspaceEdit};
use hrr_symbol::{SymbolId, SymbolKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// What the runtime should do with a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateAction {
    /// Rebuild from source
    Recompile,
    /// Re-resolve references, no rebuild
    Notify,
}

impl fmt::Display for UpdateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recompile => f.write_str("recompile"),
            Self::Notify => f.write_str("notify"),
        }
    }
}

/// Update for one symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotReloadUpdate {
    /// Symbol, under its new identity if it was renamed
    pub symbol_id: SymbolId,
    /// Identity before the rename, for renamed symbols
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_id: Option<SymbolId>,
    /// Recompile or notify
    pub action: UpdateAction,
    /// Defining file, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    /// Edited spans in that file
    pub affected_ranges: Vec<Span>,
}

/// Everything a runtime needs to pick up a rename
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotReloadPlan {
    /// Updates, cascade symbols first in reload order
    pub updates: Vec<HotReloadUpdate>,
    /// Script patches for recompiled scripts
    pub patches: Vec<PatchRecord>,
    /// Cascade the updates were derived from
    pub cascade: HotReloadCascade,
}

impl HotReloadPlan {
    /// Updates with the given action
    pub fn with_action(&self, action: UpdateAction) -> impl Iterator<Item = &HotReloadUpdate> {
        self.updates.iter().filter(move |u| u.action == action)
    }
}

/// Result of [`RenameEngine::execute_rename`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameOutcome {
    /// Plan that was applied
    pub plan: RenamePlan,
    /// Validation advisories
    pub validation: ValidationReport,
    /// New file contents
    pub applied: ApplyResult,
    /// Post-write verification, skipped on dry runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<IntegrityReport>,
    /// Reload updates, skipped on dry runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hot_reload: Option<HotReloadPlan>,
}

impl RenameEngine {
    /// Build reload updates and patches for renames already written
    ///
    /// `store` must hold the post-rename contents; script patches are built
    /// from it.
    ///
    /// # Errors
    /// - `RenameError::Collaborator` if the analyzer or transpiler fail
    /// - `RenameError::Application` if a recompiled script cannot be read
    pub async fn prepare_hot_reload(
        &self,
        edit: &WorkspaceEdit,
        renames: &[RenameRequest],
        store: &dyn FileStore,
    ) -> Result<HotReloadPlan, RenameError> {
        let renamed: HashMap<&SymbolId, SymbolId> = renames
            .iter()
            .map(|r| (&r.symbol_id, r.target_id()))
            .collect();
        let changed: Vec<SymbolId> = renames.iter().map(|r| r.symbol_id.clone()).collect();
        let cascade = self.compute_hot_reload_cascade(&changed).await?;

        let touched = edit.files();
        let mut file_of: IndexMap<SymbolId, PathBuf> = IndexMap::new();
        for path in &touched {
            let symbols = self
                .analyzer()
                .get_file_symbols(path)
                .await
                .or_fallback(Vec::new())?;
            for symbol in symbols {
                file_of.entry(symbol).or_insert_with(|| path.clone());
            }
        }

        let ranges = |path: Option<&Path>| -> Vec<Span> {
            path.map(|p| edit.edits_for(p).into_iter().map(|e| e.span()).collect())
                .unwrap_or_default()
        };

        let mut updates = Vec::new();
        let mut covered: HashSet<SymbolId> = HashSet::new();
        for symbol_id in &cascade.order {
            let target = renamed.get(symbol_id);
            let file_path = cascade
                .entry(symbol_id)
                .and_then(|e| e.file_path.clone())
                .or_else(|| file_of.get(symbol_id).cloned())
                .or_else(|| target.and_then(|t| file_of.get(t).cloned()));
            let in_touched_file = file_path.as_ref().is_some_and(|p| touched.contains(p));
            let action = if target.is_some() || in_touched_file {
                UpdateAction::Recompile
            } else {
                UpdateAction::Notify
            };

            covered.insert(symbol_id.clone());
            if let Some(t) = target {
                covered.insert(t.clone());
            }
            updates.push(HotReloadUpdate {
                symbol_id: target.cloned().unwrap_or_else(|| symbol_id.clone()),
                previous_id: target.map(|_| symbol_id.clone()),
                action,
                affected_ranges: if in_touched_file {
                    ranges(file_path.as_deref())
                } else {
                    Vec::new()
                },
                file_path,
            });
        }

        for (symbol_id, path) in &file_of {
            if covered.contains(symbol_id) {
                continue;
            }
            updates.push(HotReloadUpdate {
                symbol_id: symbol_id.clone(),
                previous_id: None,
                action: UpdateAction::Notify,
                file_path: Some(path.clone()),
                affected_ranges: ranges(Some(path.as_path())),
            });
        }

        let mut patches = Vec::new();
        for update in &updates {
            if update.action != UpdateAction::Recompile || update.symbol_id.kind() != SymbolKind::Script {
                continue;
            }
            let Some(path) = &update.file_path else {
                tracing::debug!(symbol = %update.symbol_id, "script has no known file, no patch");
                continue;
            };
            let source_text = store
                .read_file(path)
                .await
                .map_err(|source| RenameError::Application {
                    path: path.clone(),
                    written: Vec::new(),
                    source,
                })?;
            patches.push(self.script_patch(&update.symbol_id, source_text).await?);
        }

        let plan = HotReloadPlan {
            updates,
            patches,
            cascade,
        };
        tracing::info!(
            updates = plan.updates.len(),
            recompile = plan.with_action(UpdateAction::Recompile).count(),
            patches = plan.patches.len(),
            "hot reload prepared"
        );
        Ok(plan)
    }

    async fn script_patch(
        &self,
        symbol_id: &SymbolId,
        source_text: String,
    ) -> Result<PatchRecord, RenameError> {
        let source = ScriptSource {
            source_text,
            symbol_id: symbol_id.clone(),
        };
        match self.transpiler().transpile_script(&source).await.supported()? {
            Some(patch) => Ok(patch),
            None => Ok(PatchRecord::minimal(source.symbol_id, source.source_text)),
        }
    }

    /// Plan, validate and apply one rename, then verify and prepare reload
    ///
    /// With `dry_run` nothing is written and the integrity check and reload
    /// preparation are skipped.
    ///
    /// # Errors
    /// Any error of the individual steps, from the first step that fails.
    pub async fn execute_rename(
        &self,
        request: &RenameRequest,
        store: &dyn FileStore,
        dry_run: bool,
    ) -> Result<RenameOutcome, RenameError> {
        let plan = self.plan_rename(request).await?;
        let validation = self.validate_rename(&plan.edit).await?;
        if validation.has_warnings() {
            tracing::warn!(
                symbol = %request.symbol_id,
                warnings = validation.warnings.len(),
                "rename validated with advisories"
            );
        }
        let options = ApplyOptions { dry_run };
        let applied = self.apply_workspace_edit(&plan.edit, options, store).await?;

        if dry_run {
            return Ok(RenameOutcome {
                plan,
                validation,
                applied,
                integrity: None,
                hot_reload: None,
            });
        }

        let edited: Vec<PathBuf> = applied.paths().cloned().collect();
        let integrity = self
            .verify_post_edit_integrity(&request.symbol_id, &request.new_name, &edited, store)
            .await?;
        let hot_reload = self
            .prepare_hot_reload(&plan.edit, std::slice::from_ref(request), store)
            .await?;

        Ok(RenameOutcome {
            plan,
            validation,
            applied,
            integrity: Some(integrity),
            hot_reload: Some(hot_reload),
        })
    }
}
