//! Identifier grammar and reserved words
//!
//! A new name must match `^[A-Za-z_][A-Za-z0-9_]*$` exactly. Reserved words are
//! compared case-insensitively.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

/// Keywords of the scripting language that can never name a symbol
pub const RESERVED_WORDS: &[&str] = &[
    // control flow
    "if", "then", "else", "while", "do", "until", "for", "repeat", "switch",
    "case", "default", "break", "continue", "exit", "return", "with",
    "begin", "end", "try", "catch", "finally", "throw",
    // declarations
    "var", "globalvar", "function", "constructor", "static", "new", "delete",
    "enum", "macro",
    // word operators
    "and", "or", "not", "xor", "div", "mod",
    // built-in instances and literals
    "self", "other", "all", "noone", "global", "true", "false", "undefined",
    "infinity", "nan", "pi",
];

/// Check a proposed name against the identifier grammar
///
/// # Errors
/// Returns the first grammar rule the name violates
pub fn validate_identifier(name: &str) -> Result<(), IdentifierError> {
    if IDENTIFIER.is_match(name) {
        return Ok(());
    }

    let reason = if name.is_empty() {
        IdentifierReason::Empty
    } else if name.trim() != name {
        IdentifierReason::SurroundingWhitespace
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        IdentifierReason::LeadingDigit
    } else {
        IdentifierReason::InvalidCharacter
    };

    Err(IdentifierError {
        name: name.to_string(),
        reason,
    })
}

/// Is the name a built-in keyword (case-insensitive)
#[must_use]
pub fn is_builtin_reserved(name: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(name))
}

/// Case-insensitive reserved word set
///
/// Built from the built-in keywords plus any analyzer or configuration
/// supplied words.
#[derive(Debug, Clone)]
pub struct ReservedWords {
    words: HashSet<String>,
}

impl ReservedWords {
    /// Built-in keywords only
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            words: RESERVED_WORDS.iter().map(|w| w.to_ascii_lowercase()).collect(),
        }
    }

    /// Add extra words
    #[must_use]
    pub fn with_words<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extend(extra);
        self
    }

    /// Add extra words in place
    pub fn extend<I, S>(&mut self, extra: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(
            extra
                .into_iter()
                .map(|w| w.as_ref().trim().to_ascii_lowercase())
                .filter(|w| !w.is_empty()),
        );
    }

    /// Case-insensitive membership
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.words.contains(&name.to_ascii_lowercase())
    }

    /// Number of words
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Empty set
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for ReservedWords {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Rule a rejected identifier broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierReason {
    /// No characters at all
    Empty,
    /// Leading or trailing whitespace
    SurroundingWhitespace,
    /// First character is a digit
    LeadingDigit,
    /// Character outside `[A-Za-z0-9_]`
    InvalidCharacter,
}

impl std::fmt::Display for IdentifierReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Empty => "identifier is empty",
            Self::SurroundingWhitespace => "identifier has surrounding whitespace",
            Self::LeadingDigit => "identifier must not start with a digit",
            Self::InvalidCharacter => "identifier may only contain letters, digits and underscores",
        };
        f.write_str(text)
    }
}

/// Identifier grammar violation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier '{name}': {reason}")]
pub struct IdentifierError {
    /// Rejected name
    pub name: String,
    /// Violated rule
    pub reason: IdentifierReason,
}
