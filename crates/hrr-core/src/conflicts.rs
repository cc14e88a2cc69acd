//! Conflict detection
//!
//! Two checks, both always run so callers see every problem at once:
//! - shadow: the new name already resolves to a different symbol in the
//!   scope of some occurrence
//! - reserved: the new name is a keyword (built-in table, configured extras
//!   and analyzer-supplied words, case-insensitive)
//!
//! Analyzer failures during either check are recorded as informational
//! `analysis_error` conflicts instead of aborting.

use crate::collaborators::CapabilityExt;
use crate::engine::RenameEngine;
use crate::types::Conflict;
use hrr_symbol::{Occurrence, ReservedWords, SymbolId};
use std::collections::HashSet;

impl RenameEngine {
    /// Every conflict renaming `symbol_id` to `new_name` would cause
    ///
    /// Returns blocking and informational conflicts alike; use
    /// [`Conflict::is_blocking`] to tell them apart.
    pub async fn detect_conflicts(
        &self,
        symbol_id: &SymbolId,
        new_name: &str,
        occurrences: &[Occurrence],
    ) -> Vec<Conflict> {
        let mut conflicts = self.shadow_conflicts(symbol_id, new_name, occurrences).await;
        conflicts.extend(self.reserved_conflicts(new_name).await);

        tracing::debug!(
            symbol = %symbol_id,
            new_name,
            conflicts = conflicts.len(),
            "conflict detection finished"
        );
        conflicts
    }

    async fn shadow_conflicts(
        &self,
        symbol_id: &SymbolId,
        new_name: &str,
        occurrences: &[Occurrence],
    ) -> Vec<Conflict> {
        let mut conflicts = Vec::new();
        let mut scopes_checked: HashSet<Option<&str>> = HashSet::new();
        let mut reported: HashSet<(Option<&str>, SymbolId)> = HashSet::new();

        for occurrence in occurrences {
            let scope = occurrence.scope_id.as_deref();
            if !scopes_checked.insert(scope) {
                continue;
            }

            match self.analyzer().lookup(new_name, scope).await.supported() {
                Ok(None) => {
                    tracing::debug!("analyzer cannot resolve names, skipping shadow check");
                    break;
                }
                Ok(Some(Some(existing))) if existing != *symbol_id => {
                    if reported.insert((scope, existing.clone())) {
                        conflicts.push(
                            Conflict::shadow(new_name, &existing, scope)
                                .with_path(occurrence.path.clone()),
                        );
                    }
                }
                Ok(Some(_)) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "name lookup failed during shadow check");
                    conflicts.push(
                        Conflict::analysis_error(format!("lookup of '{new_name}' failed: {e}"))
                            .with_path(occurrence.path.clone()),
                    );
                }
            }
        }

        conflicts
    }

    async fn reserved_conflicts(&self, new_name: &str) -> Vec<Conflict> {
        let (reserved, failure) = self.reserved_words().await;
        let mut conflicts: Vec<Conflict> = failure.into_iter().collect();
        if reserved.contains(new_name) {
            conflicts.push(Conflict::reserved(new_name));
        }
        conflicts
    }

    /// Built-in table plus configured and analyzer words
    ///
    /// An analyzer failure leaves its words out and is handed back as an
    /// informational conflict.
    pub(crate) async fn reserved_words(&self) -> (ReservedWords, Option<Conflict>) {
        let mut reserved = ReservedWords::builtin().with_words(&self.config().extra_reserved_words);
        match self
            .analyzer()
            .get_reserved_keywords()
            .await
            .or_fallback(Vec::new())
        {
            Ok(words) => {
                reserved.extend(words);
                (reserved, None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "reserved keyword query failed");
                let conflict = Conflict::analysis_error(format!("reserved keyword query failed: {e}"));
                (reserved, Some(conflict))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::collaborators::{SemanticAnalyzer, Unavailable};
    use crate::config::EngineConfig;
    use crate::engine::RenameEngine;
    use crate::error::CollaboratorError;
    use crate::types::ConflictKind;
    use hrr_symbol::{Occurrence, SymbolId};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn id(s: &str) -> SymbolId {
        s.parse().unwrap()
    }

    #[derive(Default)]
    struct ScopedAnalyzer {
        bindings: HashMap<(String, Option<String>), SymbolId>,
        keywords: Option<Vec<String>>,
        failing_lookup: bool,
    }

    #[async_trait::async_trait]
    impl SemanticAnalyzer for ScopedAnalyzer {
        async fn lookup(
            &self,
            name: &str,
            scope_id: Option<&str>,
        ) -> Result<Option<SymbolId>, CollaboratorError> {
            if self.failing_lookup {
                return Err(CollaboratorError::failed("lookup", "index offline"));
            }
            Ok(self
                .bindings
                .get(&(name.to_string(), scope_id.map(str::to_string)))
                .cloned())
        }

        async fn get_reserved_keywords(&self) -> Result<Vec<String>, CollaboratorError> {
            self.keywords
                .clone()
                .ok_or_else(|| CollaboratorError::unsupported("get_reserved_keywords"))
        }
    }

    #[tokio::test]
    async fn reserved_words_match_any_case() {
        let engine = RenameEngine::new(Arc::new(Unavailable));
        let target = id("p/script/scr_old");
        for name in ["if", "If", "IF"] {
            let conflicts = engine.detect_conflicts(&target, name, &[]).await;
            assert_eq!(conflicts.len(), 1, "{name}");
            assert_eq!(conflicts[0].kind, ConflictKind::Reserved);
        }
    }

    #[tokio::test]
    async fn analyzer_and_config_words_are_reserved_too() {
        let analyzer = ScopedAnalyzer {
            keywords: Some(vec!["instance_create".into()]),
            ..Default::default()
        };
        let engine = RenameEngine::new(Arc::new(analyzer))
            .with_config(EngineConfig::new().with_reserved_words(["draw_self"]));
        let target = id("p/script/scr_old");

        assert!(engine.detect_conflicts(&target, "Instance_Create", &[]).await[0].is_blocking());
        assert!(engine.detect_conflicts(&target, "DRAW_SELF", &[]).await[0].is_blocking());
        assert!(engine.detect_conflicts(&target, "scr_new", &[]).await.is_empty());
    }

    #[tokio::test]
    async fn shadowing_is_reported_once_per_scope_and_symbol() {
        let other = id("p/var/obj_enemy/hp");
        let mut bindings = HashMap::new();
        bindings.insert(("hp".to_string(), Some("obj_enemy".to_string())), other.clone());
        let engine = RenameEngine::new(Arc::new(ScopedAnalyzer {
            bindings,
            ..Default::default()
        }));

        let occurrences = vec![
            Occurrence::definition("obj_enemy.gml", 0, 6).in_scope("obj_enemy"),
            Occurrence::reference("obj_enemy.gml", 20, 26).in_scope("obj_enemy"),
            Occurrence::reference("obj_player.gml", 4, 10).in_scope("obj_player"),
        ];
        let conflicts = engine
            .detect_conflicts(&id("p/var/obj_enemy/health"), "hp", &occurrences)
            .await;

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Shadow);
        assert_eq!(conflicts[0].path.as_deref(), Some(std::path::Path::new("obj_enemy.gml")));
        assert!(conflicts[0].message.contains("p/var/obj_enemy/hp"));
    }

    #[tokio::test]
    async fn resolving_to_the_renamed_symbol_is_not_shadowing() {
        let target = id("p/script/scr_old");
        let mut bindings = HashMap::new();
        bindings.insert(("scr_new".to_string(), None), target.clone());
        let engine = RenameEngine::new(Arc::new(ScopedAnalyzer {
            bindings,
            ..Default::default()
        }));

        let occurrences = vec![Occurrence::reference("a.gml", 0, 7)];
        assert!(engine
            .detect_conflicts(&target, "scr_new", &occurrences)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn lookup_failure_is_informational_and_reserved_check_still_runs() {
        let engine = RenameEngine::new(Arc::new(ScopedAnalyzer {
            failing_lookup: true,
            ..Default::default()
        }));
        let occurrences = vec![Occurrence::reference("a.gml", 0, 7)];
        let conflicts = engine
            .detect_conflicts(&id("p/script/scr_old"), "while", &occurrences)
            .await;

        let kinds: Vec<_> = conflicts.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ConflictKind::AnalysisError, ConflictKind::Reserved]);
        assert!(!conflicts[0].is_blocking());
    }
}
