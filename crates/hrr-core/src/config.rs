//! Engine configuration
//!
//! Loaded from TOML; every field has a default so an empty or missing file
//! yields [`EngineConfig::default`].

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default per-file edit count above which validation warns
pub const DEFAULT_MAX_EDITS_PER_FILE: usize = 50;

/// Rename engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Warn when one file receives more edits than this
    pub max_edits_per_file: usize,
    /// Invoke the analyzer edit-validation hook
    pub deep_validation: bool,
    /// Reserved words on top of the built-in table and analyzer words
    pub extra_reserved_words: Vec<String>,
    /// Re-parse edited files during integrity verification
    pub verify_syntax: bool,
    /// Re-query the analyzer for new-name occurrences outside edited files
    pub check_stray_occurrences: bool,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With per-file edit warning threshold
    #[inline]
    #[must_use]
    pub fn with_max_edits_per_file(mut self, max: usize) -> Self {
        self.max_edits_per_file = max;
        self
    }

    /// With or without the analyzer validation hook
    #[inline]
    #[must_use]
    pub fn with_deep_validation(mut self, enabled: bool) -> Self {
        self.deep_validation = enabled;
        self
    }

    /// With additional reserved words
    #[must_use]
    pub fn with_reserved_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_reserved_words
            .extend(words.into_iter().map(Into::into));
        self
    }

    /// With or without syntax re-parse during integrity checks
    #[inline]
    #[must_use]
    pub fn with_verify_syntax(mut self, enabled: bool) -> Self {
        self.verify_syntax = enabled;
        self
    }

    /// With or without stray occurrence re-query during integrity checks
    #[inline]
    #[must_use]
    pub fn with_stray_occurrence_check(mut self, enabled: bool) -> Self {
        self.check_stray_occurrences = enabled;
        self
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` for malformed TOML or mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if the file exists but cannot be read and
    /// `ConfigError::Parse` if it is malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Io(e)),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_edits_per_file: DEFAULT_MAX_EDITS_PER_FILE,
            deep_validation: true,
            extra_reserved_words: Vec::new(),
            verify_syntax: true,
            check_stray_occurrences: true,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid configuration
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
