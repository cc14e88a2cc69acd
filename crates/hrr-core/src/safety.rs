//! Hot reload feasibility of a rename

use crate::engine::RenameEngine;
use crate::error::RenameError;
use crate::types::{Conflict, RenameRequest};
use hrr_symbol::{validate_identifier, SymbolKind, VariableScope};
use serde::{Deserialize, Serialize};

/// Verdict on whether a rename can be hot reloaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotReloadSafety {
    /// Can be reloaded into a running process as is
    pub safe: bool,
    /// Explanation
    pub reason: String,
    /// A full restart is needed
    pub requires_restart: bool,
    /// Live instances must be re-created to observe the change
    pub requires_instance_reinit: bool,
    /// The engine can make it reloadable (e.g. by recompiling dependents)
    pub can_auto_fix: bool,
    /// What the caller can do about it
    pub suggestions: Vec<String>,
}

impl HotReloadSafety {
    fn safe(reason: impl Into<String>) -> Self {
        Self {
            safe: true,
            reason: reason.into(),
            requires_restart: false,
            requires_instance_reinit: false,
            can_auto_fix: false,
            suggestions: Vec::new(),
        }
    }

    fn unsafe_because(reason: impl Into<String>) -> Self {
        Self {
            safe: false,
            ..Self::safe(reason)
        }
    }

    fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Fixed decision table by symbol kind
    #[must_use]
    pub fn for_kind(kind: &SymbolKind) -> Self {
        match kind {
            SymbolKind::Script => {
                Self::safe("script renames are hot-reloadable; callers are recompiled in place")
            }
            SymbolKind::Variable(VariableScope::Instance) => Self::safe(
                "instance variable renames are hot-reloadable; live instances read the field under its new name",
            ),
            SymbolKind::Variable(VariableScope::Global) => Self::safe(
                "global variable renames are hot-reloadable; the global is rebound under its new name",
            ),
            SymbolKind::Event => {
                let mut verdict = Self::safe(
                    "event renames are hot-reloadable but existing instances keep the old handler binding",
                )
                .suggest("re-create affected instances (or restart the room) after reloading");
                verdict.requires_instance_reinit = true;
                verdict
            }
            kind if kind.is_compile_time() => {
                let mut verdict = Self::unsafe_because(format!(
                    "{kind} values are inlined at compile time; dependents still carry the old name"
                ))
                .suggest("recompile every dependent in the hot reload cascade");
                verdict.can_auto_fix = true;
                verdict
            }
            _ => Self::safe(format!(
                "no reload rule for {kind}; assuming the rename is hot-reloadable"
            ))
            .suggest("verify the running game after reloading"),
        }
    }
}

impl RenameEngine {
    /// Can the rename be hot reloaded
    ///
    /// A bad identifier, a missing symbol or a blocking conflict makes the
    /// rename unsafe before its kind is considered.
    ///
    /// # Errors
    /// Returns `RenameError::Collaborator` if the analyzer fails.
    pub async fn check_hot_reload_safety(
        &self,
        request: &RenameRequest,
    ) -> Result<HotReloadSafety, RenameError> {
        if let Err(e) = validate_identifier(&request.new_name) {
            return Ok(HotReloadSafety::unsafe_because(e.to_string())
                .suggest("use letters, digits and underscores, not starting with a digit"));
        }

        if !self.symbol_exists(&request.symbol_id).await? {
            return Ok(HotReloadSafety::unsafe_because(format!(
                "symbol {} does not exist",
                request.symbol_id
            )));
        }

        let occurrences = self.occurrences_of(&request.symbol_id).await?;
        let blocking: Vec<Conflict> = self
            .detect_conflicts(&request.symbol_id, &request.new_name, &occurrences)
            .await
            .into_iter()
            .filter(Conflict::is_blocking)
            .collect();
        if !blocking.is_empty() {
            let mut verdict = HotReloadSafety::unsafe_because(format!(
                "rename has {} blocking conflict(s)",
                blocking.len()
            ));
            verdict.suggestions = blocking.into_iter().map(|c| c.message).collect();
            return Ok(verdict);
        }

        let kind = request.symbol_id.kind();
        let verdict = HotReloadSafety::for_kind(&kind);
        tracing::debug!(symbol = %request.symbol_id, %kind, safe = verdict.safe, "hot reload safety classified");
        Ok(verdict)
    }
}
