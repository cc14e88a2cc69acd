//! Batch rename coordination
//!
//! Whole-batch checks run before any individual plan: identifier grammar for
//! every request, duplicate sources, name collisions and circular rename
//! chains. Only then is each rename planned and the edits merged.

use crate::engine::RenameEngine;
use crate::error::RenameError;
use crate::types::{BatchPlan, RenameRequest};
use hrr_edit::WorkspaceEdit;
use hrr_graph::detect_cycles;
use hrr_symbol::{validate_identifier, SymbolId};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

impl RenameEngine {
    /// Plan several renames as one merged edit
    ///
    /// Either the whole batch plans and the merged edit passes overlap
    /// validation, or the call fails and nothing is returned.
    ///
    /// # Errors
    /// - `RenameError::InvalidInput` for an empty batch or a symbol renamed twice
    /// - `RenameError::InvalidIdentifier` for the first bad new name
    /// - `RenameError::BatchCollision` if two renames target one new name
    /// - `RenameError::CircularRename` if the renames form a chain that loops
    /// - any error of [`RenameEngine::plan_rename`] for an individual rename
    /// - `RenameError::Edit` if the merged edits overlap
    pub async fn plan_batch_rename(
        &self,
        renames: &[RenameRequest],
    ) -> Result<BatchPlan, RenameError> {
        if renames.is_empty() {
            return Err(RenameError::InvalidInput("batch contains no renames".into()));
        }
        for request in renames {
            validate_identifier(&request.new_name)?;
        }
        check_duplicate_sources(renames)?;
        check_collisions(renames)?;
        if let Some(cycle) = rename_chain_cycles(renames).into_iter().next() {
            return Err(RenameError::CircularRename { cycle });
        }

        let mut plans = Vec::with_capacity(renames.len());
        let mut merged = WorkspaceEdit::new();
        for request in renames {
            let plan = self.plan_rename(request).await?;
            merged.extend(plan.edit.edits().iter().cloned());
            plans.push(plan);
        }

        if !merged.is_empty() {
            merged.validate()?;
        }

        tracing::info!(
            renames = plans.len(),
            edits = merged.len(),
            files = merged.files().len(),
            "batch rename planned"
        );
        Ok(BatchPlan {
            plans,
            edit: merged,
        })
    }
}

fn check_duplicate_sources(renames: &[RenameRequest]) -> Result<(), RenameError> {
    let mut seen = HashSet::new();
    for request in renames {
        if !seen.insert(&request.symbol_id) {
            return Err(RenameError::InvalidInput(format!(
                "{} is renamed more than once",
                request.symbol_id
            )));
        }
    }
    Ok(())
}

fn check_collisions(renames: &[RenameRequest]) -> Result<(), RenameError> {
    let mut by_name: IndexMap<&str, Vec<SymbolId>> = IndexMap::new();
    for request in renames {
        by_name
            .entry(request.new_name.as_str())
            .or_default()
            .push(request.symbol_id.clone());
    }

    match by_name.into_iter().find(|(_, symbols)| symbols.len() > 1) {
        Some((new_name, symbols)) => Err(RenameError::BatchCollision {
            new_name: new_name.to_string(),
            symbols,
        }),
        None => Ok(()),
    }
}

/// Cycles in the source -> synthesized-target graph
///
/// Each rename maps its source id to the same path with the new name. A
/// target that is itself the source of another rename continues the chain.
fn rename_chain_cycles(renames: &[RenameRequest]) -> Vec<Vec<SymbolId>> {
    let targets: HashMap<&SymbolId, SymbolId> = renames
        .iter()
        .map(|r| (&r.symbol_id, r.target_id()))
        .collect();

    detect_cycles(renames.iter().map(|r| r.symbol_id.clone()), |id| {
        targets.get(id).cloned()
    })
}
