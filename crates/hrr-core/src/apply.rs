//! Validation and application of workspace edits
//!
//! Application is all-or-nothing per call: every touched file is read and
//! spliced in memory first, and storage is written only once all of them
//! succeeded.

use crate::collaborators::{CapabilityExt, FileStore};
use crate::engine::RenameEngine;
use crate::error::RenameError;
use crate::types::{ApplyOptions, ApplyResult, ValidationReport};
use hrr_edit::{apply_edits, WorkspaceEdit};
use std::collections::BTreeMap;

impl RenameEngine {
    /// Structural and (optionally) analyzer validation
    ///
    /// Files receiving more edits than `max_edits_per_file` produce warnings,
    /// never failures.
    ///
    /// # Errors
    /// - `RenameError::Edit` for an empty edit, a backwards range or overlap
    /// - `RenameError::EditsRejected` if the analyzer hook rejects the edit
    /// - `RenameError::Collaborator` if the analyzer hook fails
    pub async fn validate_rename(&self, edit: &WorkspaceEdit) -> Result<ValidationReport, RenameError> {
        edit.validate()?;

        let counts = edit.file_edit_counts();
        let threshold = self.config().max_edits_per_file;
        let mut warnings: Vec<String> = counts
            .iter()
            .filter(|(_, &count)| count > threshold)
            .map(|(path, count)| {
                format!(
                    "{} receives {count} edits (threshold {threshold})",
                    path.display()
                )
            })
            .collect();

        if self.config().deep_validation {
            if let Some(verdict) = self.analyzer().validate_edits(edit).await.supported()? {
                if !verdict.valid {
                    tracing::info!(errors = verdict.errors.len(), "analyzer rejected edits");
                    return Err(RenameError::EditsRejected {
                        errors: verdict.errors,
                    });
                }
                warnings.extend(verdict.warnings);
            }
        }

        for warning in &warnings {
            tracing::warn!("{warning}");
        }

        Ok(ValidationReport {
            files: counts.len(),
            edits: edit.len(),
            warnings,
        })
    }

    /// Apply an edit through `store`
    ///
    /// Each file is read once and its edits spliced from the tail toward the
    /// head. With `dry_run` the new contents are returned and nothing is
    /// written.
    ///
    /// # Errors
    /// - `RenameError::Edit` if the edit is structurally invalid or an offset
    ///   does not fit the file content
    /// - `RenameError::Application` if a read or write fails; `written` lists
    ///   files already written when a write fails
    pub async fn apply_workspace_edit(
        &self,
        edit: &WorkspaceEdit,
        options: ApplyOptions,
        store: &dyn FileStore,
    ) -> Result<ApplyResult, RenameError> {
        edit.validate()?;

        let mut files = BTreeMap::new();
        for (path, edits) in edit.group_by_file() {
            let content = store
                .read_file(&path)
                .await
                .map_err(|source| RenameError::Application {
                    path: path.clone(),
                    written: Vec::new(),
                    source,
                })?;
            let updated = apply_edits(&path, &content, &edits)?;
            files.insert(path, updated);
        }

        if options.dry_run {
            tracing::info!(files = files.len(), "dry run, nothing written");
            return Ok(ApplyResult {
                files,
                written: false,
            });
        }

        let mut written = Vec::with_capacity(files.len());
        for (path, content) in &files {
            if let Err(source) = store.write_file(path, content).await {
                tracing::warn!(path = %path.display(), written = written.len(), "write failed mid-apply");
                return Err(RenameError::Application {
                    path: path.clone(),
                    written,
                    source,
                });
            }
            written.push(path.clone());
        }

        tracing::info!(files = written.len(), edits = edit.len(), "workspace edit applied");
        Ok(ApplyResult {
            files,
            written: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{EditVerdict, SemanticAnalyzer, Unavailable};
    use crate::config::EngineConfig;
    use crate::error::{CollaboratorError, StorageError};
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct VecStore {
        files: Mutex<BTreeMap<PathBuf, String>>,
        writes: Mutex<Vec<PathBuf>>,
    }

    impl VecStore {
        fn with(files: &[(&str, &str)]) -> Self {
            let store = Self::default();
            for (path, content) in files {
                store.files.lock().unwrap().insert(PathBuf::from(path), (*content).to_string());
            }
            store
        }
    }

    #[async_trait::async_trait]
    impl FileStore for VecStore {
        async fn read_file(&self, path: &Path) -> Result<String, StorageError> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| StorageError::NotFound(path.to_path_buf()))
        }

        async fn write_file(&self, path: &Path, content: &str) -> Result<(), StorageError> {
            self.writes.lock().unwrap().push(path.to_path_buf());
            self.files.lock().unwrap().insert(path.to_path_buf(), content.to_string());
            Ok(())
        }
    }

    struct Rejecting;

    #[async_trait::async_trait]
    impl SemanticAnalyzer for Rejecting {
        async fn validate_edits(&self, _edit: &WorkspaceEdit) -> Result<EditVerdict, CollaboratorError> {
            Ok(EditVerdict::reject(["breaks a dependent"]))
        }
    }

    fn rename_edit() -> WorkspaceEdit {
        let mut edit = WorkspaceEdit::new();
        edit.add_edit("a.gml", 0, 3, "bar");
        edit.add_edit("b.gml", 4, 7, "bar");
        edit
    }

    #[tokio::test]
    async fn threshold_warns_without_failing() {
        let engine = RenameEngine::new(Arc::new(Unavailable))
            .with_config(EngineConfig::new().with_max_edits_per_file(1));
        let mut edit = WorkspaceEdit::new();
        edit.add_edit("a.gml", 0, 1, "x");
        edit.add_edit("a.gml", 2, 3, "x");

        let report = engine.validate_rename(&edit).await.unwrap();
        assert_eq!(report.files, 1);
        assert_eq!(report.edits, 2);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("a.gml"));
    }

    #[tokio::test]
    async fn analyzer_hook_can_reject_and_can_be_disabled() {
        let engine = RenameEngine::new(Arc::new(Rejecting));
        let err = engine.validate_rename(&rename_edit()).await.unwrap_err();
        assert!(matches!(err, RenameError::EditsRejected { ref errors } if errors.len() == 1));

        let shallow = engine.with_config(EngineConfig::new().with_deep_validation(false));
        assert!(shallow.validate_rename(&rename_edit()).await.is_ok());
    }

    #[tokio::test]
    async fn dry_run_matches_real_run_and_skips_writes() {
        let engine = RenameEngine::new(Arc::new(Unavailable));
        let store = VecStore::with(&[("a.gml", "foo();"), ("b.gml", "var foo;")]);

        let preview = engine
            .apply_workspace_edit(&rename_edit(), ApplyOptions::dry_run(), &store)
            .await
            .unwrap();
        assert!(!preview.written);
        assert!(store.writes.lock().unwrap().is_empty());

        let applied = engine
            .apply_workspace_edit(&rename_edit(), ApplyOptions::write(), &store)
            .await
            .unwrap();
        assert!(applied.written);
        assert_eq!(preview.files, applied.files);
        assert_eq!(applied.files[Path::new("b.gml")], "var bar;");
        assert_eq!(store.writes.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn bad_offset_in_any_file_writes_nothing() {
        let engine = RenameEngine::new(Arc::new(Unavailable));
        // b.gml is too short for its edit
        let store = VecStore::with(&[("a.gml", "foo();"), ("b.gml", "x")]);

        let err = engine
            .apply_workspace_edit(&rename_edit(), ApplyOptions::write(), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, RenameError::Edit(_)));
        assert!(store.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_an_application_error() {
        let engine = RenameEngine::new(Arc::new(Unavailable));
        let store = VecStore::with(&[("a.gml", "foo();")]);

        let err = engine
            .apply_workspace_edit(&rename_edit(), ApplyOptions::write(), &store)
            .await
            .unwrap_err();
        match err {
            RenameError::Application { path, written, .. } => {
                assert_eq!(path, PathBuf::from("b.gml"));
                assert!(written.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
