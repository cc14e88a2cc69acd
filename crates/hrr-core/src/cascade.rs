//! Hot reload cascade
//!
//! Transitive closure of the analyzer's dependents relation, starting from a
//! set of changed symbols. Every symbol reached is annotated with its hop
//! distance and a readable chain of reasons. The reached edges are then
//! linearised so a runtime can reload dependencies before their dependents.

use crate::collaborators::CapabilityExt;
use crate::engine::RenameEngine;
use crate::error::RenameError;
use hrr_graph::DependencyGraph;
use hrr_symbol::SymbolId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Reason recorded for the changed symbols themselves
pub const DIRECT_CHANGE: &str = "changed directly";

/// Ancestors named in a reason before it is cut short
pub const REASON_HOPS: usize = 3;

/// One symbol in a cascade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeEntry {
    /// Affected symbol
    pub symbol_id: SymbolId,
    /// Hops from the nearest changed symbol on the discovery path
    pub distance: usize,
    /// Why the symbol is affected
    pub reason: String,
    /// Defining file, when the analyzer reported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

/// Summary of a cascade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeMetadata {
    /// Symbols in the cascade, changed ones included
    pub total_symbols: usize,
    /// Largest distance
    pub max_distance: usize,
    /// A cycle was found or some symbol could not be ordered
    pub has_circular: bool,
}

/// Result of [`RenameEngine::compute_hot_reload_cascade`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotReloadCascade {
    /// Entries in discovery order
    pub cascade: Vec<CascadeEntry>,
    /// Reload order: dependencies first, cycle members appended last
    pub order: Vec<SymbolId>,
    /// Dependency cycles found during traversal
    pub circular: Vec<Vec<SymbolId>>,
    /// Summary
    pub metadata: CascadeMetadata,
}

impl HotReloadCascade {
    /// Entry for a symbol
    #[must_use]
    pub fn entry(&self, symbol_id: &SymbolId) -> Option<&CascadeEntry> {
        self.cascade.iter().find(|e| e.symbol_id == *symbol_id)
    }

    /// Does the cascade reach the symbol
    #[must_use]
    pub fn contains(&self, symbol_id: &SymbolId) -> bool {
        self.entry(symbol_id).is_some()
    }

    /// Symbols appearing in any cycle
    #[must_use]
    pub fn circular_members(&self) -> HashSet<&SymbolId> {
        self.circular.iter().flatten().collect()
    }
}

impl RenameEngine {
    /// Symbols to reload after `changed` change, and in which order
    ///
    /// An analyzer without a dependents relation yields a cascade of just the
    /// changed symbols.
    ///
    /// # Errors
    /// Returns `RenameError::Collaborator` if the dependents query fails.
    pub async fn compute_hot_reload_cascade(
        &self,
        changed: &[SymbolId],
    ) -> Result<HotReloadCascade, RenameError> {
        let mut entries: IndexMap<SymbolId, CascadeEntry> = IndexMap::new();
        let mut graph = DependencyGraph::new();
        // nearest ancestors first, at most REASON_HOPS
        let mut lineage: HashMap<SymbolId, Vec<SymbolId>> = HashMap::new();

        for symbol_id in changed {
            graph.add_node(symbol_id.clone());
            entries.entry(symbol_id.clone()).or_insert_with(|| CascadeEntry {
                symbol_id: symbol_id.clone(),
                distance: 0,
                reason: DIRECT_CHANGE.to_string(),
                file_path: None,
            });
        }

        // depth-first: the first dependent of a symbol is expanded next
        let mut stack: Vec<SymbolId> = entries.keys().rev().cloned().collect();
        let mut expanded: HashSet<SymbolId> = HashSet::new();

        while let Some(current) = stack.pop() {
            if !expanded.insert(current.clone()) {
                continue;
            }

            let dependents = self
                .analyzer()
                .get_dependents(std::slice::from_ref(&current))
                .await
                .or_fallback(Vec::new())?;

            let parent_distance = entries.get(&current).map_or(0, |e| e.distance);
            let mut child_lineage = Vec::with_capacity(REASON_HOPS);
            child_lineage.push(current.clone());
            if let Some(ancestors) = lineage.get(&current) {
                child_lineage.extend(ancestors.iter().take(REASON_HOPS - 1).cloned());
            }

            let mut to_visit = Vec::new();
            for dependent in dependents {
                graph.add_edge(current.clone(), dependent.symbol_id.clone());

                match entries.get_mut(&dependent.symbol_id) {
                    Some(entry) => {
                        if entry.file_path.is_none() {
                            entry.file_path = dependent.file_path;
                        }
                    }
                    None => {
                        entries.insert(
                            dependent.symbol_id.clone(),
                            CascadeEntry {
                                symbol_id: dependent.symbol_id.clone(),
                                distance: parent_distance + 1,
                                reason: dependency_reason(&child_lineage, parent_distance + 1),
                                file_path: dependent.file_path,
                            },
                        );
                        lineage.insert(dependent.symbol_id.clone(), child_lineage.clone());
                    }
                }

                if !expanded.contains(&dependent.symbol_id) {
                    to_visit.push(dependent.symbol_id);
                }
            }
            stack.extend(to_visit.into_iter().rev());
        }

        let circular = graph.cycles_from(changed.iter().cloned());
        let order = graph.topological_order();
        let has_circular = !circular.is_empty() || !order.is_complete();
        let order = order.into_sequence();

        let cascade: Vec<CascadeEntry> = entries.into_values().collect();
        let metadata = CascadeMetadata {
            total_symbols: cascade.len(),
            max_distance: cascade.iter().map(|e| e.distance).max().unwrap_or(0),
            has_circular,
        };

        tracing::info!(
            changed = changed.len(),
            total = metadata.total_symbols,
            max_distance = metadata.max_distance,
            cycles = circular.len(),
            "hot reload cascade computed"
        );
        if has_circular {
            tracing::warn!(cycles = circular.len(), "circular dependencies in reload cascade");
        }

        Ok(HotReloadCascade {
            cascade,
            order,
            circular,
            metadata,
        })
    }
}

/// "depends on B, which depends on A", naming at most [`REASON_HOPS`] ancestors
fn dependency_reason(ancestors: &[SymbolId], distance: usize) -> String {
    let chain = ancestors
        .iter()
        .map(|a| format!("depends on {a}"))
        .collect::<Vec<_>>()
        .join(", which ");
    if distance > ancestors.len() {
        format!("{chain}, which ... ({distance} hops from the change)")
    } else {
        chain
    }
}
