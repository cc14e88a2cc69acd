//! The rename engine
//!
//! A [`RenameEngine`] composes three injected collaborators and holds no
//! state between calls. Operations live in their own modules as further
//! `impl RenameEngine` blocks.

use crate::collaborators::{CapabilityExt, Parser, SemanticAnalyzer, Transpiler, Unavailable};
use crate::config::EngineConfig;
use crate::error::RenameError;
use hrr_symbol::{Occurrence, SymbolId};
use std::path::Path;
use std::sync::Arc;

/// Rename engine over injected collaborators
///
/// # Example
///
/// ```rust
/// use hrr_core::{RenameEngine, Unavailable};
/// use std::sync::Arc;
///
/// let engine = RenameEngine::new(Arc::new(Unavailable));
/// assert_eq!(engine.config().max_edits_per_file, 50);
/// ```
#[derive(Clone)]
pub struct RenameEngine {
    analyzer: Arc<dyn SemanticAnalyzer>,
    parser: Arc<dyn Parser>,
    transpiler: Arc<dyn Transpiler>,
    config: EngineConfig,
}

impl RenameEngine {
    /// Create engine with an analyzer and no parser or transpiler
    #[must_use]
    pub fn new(analyzer: Arc<dyn SemanticAnalyzer>) -> Self {
        Self {
            analyzer,
            parser: Arc::new(Unavailable),
            transpiler: Arc::new(Unavailable),
            config: EngineConfig::default(),
        }
    }

    /// With parser
    #[inline]
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn Parser>) -> Self {
        self.parser = parser;
        self
    }

    /// With transpiler
    #[inline]
    #[must_use]
    pub fn with_transpiler(mut self, transpiler: Arc<dyn Transpiler>) -> Self {
        self.transpiler = transpiler;
        self
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn analyzer(&self) -> &dyn SemanticAnalyzer {
        self.analyzer.as_ref()
    }

    pub(crate) fn parser(&self) -> &dyn Parser {
        self.parser.as_ref()
    }

    pub(crate) fn transpiler(&self) -> &dyn Transpiler {
        self.transpiler.as_ref()
    }

    /// Existence check; an analyzer without the capability assumes it exists
    pub(crate) async fn symbol_exists(&self, symbol_id: &SymbolId) -> Result<bool, RenameError> {
        Ok(self.analyzer.has_symbol(symbol_id).await.or_fallback(true)?)
    }

    /// Occurrences; an analyzer without the capability reports none
    pub(crate) async fn occurrences_of(
        &self,
        symbol_id: &SymbolId,
    ) -> Result<Vec<Occurrence>, RenameError> {
        Ok(self
            .analyzer
            .get_symbol_occurrences(symbol_id)
            .await
            .or_fallback(Vec::new())?)
    }

    /// Symbol under a cursor
    ///
    /// Asks the analyzer first. If it cannot answer position queries, the
    /// file is parsed and the innermost named syntax node covering `offset`
    /// is used.
    ///
    /// # Errors
    /// Returns `RenameError::Collaborator` if the analyzer or parser fail
    /// (rather than lack the capability).
    pub async fn symbol_at_position(
        &self,
        path: &Path,
        offset: usize,
    ) -> Result<Option<SymbolId>, RenameError> {
        if let Some(found) = self
            .analyzer
            .get_symbol_at_position(path, offset)
            .await
            .supported()?
        {
            return Ok(found);
        }

        tracing::debug!(path = %path.display(), offset, "falling back to parser for position lookup");
        let Some(tree) = self.parser.parse(path).await.supported()? else {
            return Ok(None);
        };
        Ok(tree.symbol_at(offset).cloned())
    }
}

impl std::fmt::Debug for RenameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenameEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::SyntaxNode;
    use crate::error::CollaboratorError;

    fn id(s: &str) -> SymbolId {
        s.parse().unwrap()
    }

    struct PositionAnalyzer;

    #[async_trait::async_trait]
    impl SemanticAnalyzer for PositionAnalyzer {
        async fn get_symbol_at_position(
            &self,
            _path: &Path,
            offset: usize,
        ) -> Result<Option<SymbolId>, CollaboratorError> {
            Ok((offset < 10).then(|| id("p/script/from_analyzer")))
        }
    }

    struct TreeParser;

    #[async_trait::async_trait]
    impl Parser for TreeParser {
        async fn parse(&self, _path: &Path) -> Result<SyntaxNode, CollaboratorError> {
            Ok(SyntaxNode::new(0, 50).with_child(SyntaxNode::new(5, 12).naming(id("p/script/from_parser"))))
        }
    }

    #[tokio::test]
    async fn analyzer_answers_position_queries_first() {
        let engine = RenameEngine::new(Arc::new(PositionAnalyzer)).with_parser(Arc::new(TreeParser));
        let found = engine.symbol_at_position(Path::new("a.gml"), 6).await.unwrap();
        assert_eq!(found, Some(id("p/script/from_analyzer")));

        // analyzer answered "nothing here"; parser is not consulted
        let found = engine.symbol_at_position(Path::new("a.gml"), 11).await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn parser_fallback_when_analyzer_lacks_positions() {
        let engine = RenameEngine::new(Arc::new(Unavailable)).with_parser(Arc::new(TreeParser));
        let found = engine.symbol_at_position(Path::new("a.gml"), 6).await.unwrap();
        assert_eq!(found, Some(id("p/script/from_parser")));
    }

    #[tokio::test]
    async fn no_collaborators_means_no_symbol() {
        let engine = RenameEngine::new(Arc::new(Unavailable));
        assert_eq!(engine.symbol_at_position(Path::new("a.gml"), 0).await.unwrap(), None);
        assert!(engine.symbol_exists(&id("p/script/anything")).await.unwrap());
        assert!(engine.occurrences_of(&id("p/script/anything")).await.unwrap().is_empty());
    }
}
