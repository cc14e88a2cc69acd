//! Single-symbol rename planning

use crate::engine::RenameEngine;
use crate::error::RenameError;
use crate::types::{RenamePlan, RenameRequest};
use hrr_edit::WorkspaceEdit;
use hrr_symbol::validate_identifier;

impl RenameEngine {
    /// Turn one rename request into a workspace edit
    ///
    /// Steps, in order: identifier grammar, symbol existence, no-op check,
    /// occurrence gathering, conflict detection. On success the edit holds
    /// exactly one text edit per reported occurrence.
    ///
    /// # Errors
    /// - `RenameError::InvalidIdentifier` if `new_name` breaks the grammar
    /// - `RenameError::SymbolNotFound` if the analyzer says it does not exist
    /// - `RenameError::NoOpRename` if `new_name` equals the current name
    /// - `RenameError::Conflicts` with every conflict if any of them blocks
    /// - `RenameError::Collaborator` if the analyzer fails
    pub async fn plan_rename(&self, request: &RenameRequest) -> Result<RenamePlan, RenameError> {
        let RenameRequest {
            symbol_id,
            new_name,
        } = request;
        validate_identifier(new_name)?;

        if !self.symbol_exists(symbol_id).await? {
            return Err(RenameError::SymbolNotFound(symbol_id.clone()));
        }

        let old_name = symbol_id.name();
        if new_name == old_name {
            return Err(RenameError::NoOpRename {
                symbol_id: symbol_id.clone(),
                name: new_name.clone(),
            });
        }

        let occurrences = self.occurrences_of(symbol_id).await?;
        let conflicts = self.detect_conflicts(symbol_id, new_name, &occurrences).await;
        if conflicts.iter().any(|c| c.is_blocking()) {
            tracing::info!(
                symbol = %symbol_id,
                new_name = %new_name,
                conflicts = conflicts.len(),
                "rename blocked by conflicts"
            );
            return Err(RenameError::Conflicts { conflicts });
        }
        for notice in &conflicts {
            tracing::warn!(symbol = %symbol_id, kind = %notice.kind, "{}", notice.message);
        }

        let edit: WorkspaceEdit = occurrences
            .iter()
            .map(|o| hrr_edit::TextEdit::new(o.path.clone(), o.start, o.end, new_name.clone()))
            .collect();

        tracing::info!(
            symbol = %symbol_id,
            old_name,
            new_name = %new_name,
            edits = edit.len(),
            files = edit.files().len(),
            "rename planned"
        );

        Ok(RenamePlan {
            symbol_id: symbol_id.clone(),
            old_name: old_name.to_string(),
            new_name: new_name.clone(),
            edit,
            notices: conflicts,
        })
    }
}
