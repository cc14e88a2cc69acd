//! Symbol identifiers
//!
//! Provides [`SymbolId`], the path-like `<domain>/<kind>/<qualified-name>`
//! handle the semantic analyzer hands out for every definable entity.

use crate::kind::SymbolKind;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator between identifier segments
pub const SEGMENT_SEPARATOR: char = '/';

/// Opaque, path-like symbol identifier
///
/// The engine never interprets the domain segment. The second segment names
/// the symbol kind and the last segment is the display name used for text
/// matching.
///
/// # Examples
/// - `proj/script/scr_player_move` → script `scr_player_move`
/// - `proj/var/obj_player/hp` → instance variable `hp` owned by `obj_player`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymbolId(Vec<String>);

impl SymbolId {
    /// Create identifier from segments
    ///
    /// # Errors
    /// Returns error if there are no segments or any segment is empty
    pub fn new(segments: Vec<String>) -> Result<Self, SymbolIdError> {
        if segments.is_empty() {
            return Err(SymbolIdError::Empty);
        }
        if segments.iter().any(String::is_empty) {
            return Err(SymbolIdError::EmptySegment(segments.join("/")));
        }
        Ok(Self(segments))
    }

    /// Get identifier segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; an identifier has at least one segment by construction
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Domain segment (first)
    #[inline]
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.first().map_or("", String::as_str)
    }

    /// Raw kind segment (second), if present
    #[inline]
    #[must_use]
    pub fn kind_segment(&self) -> Option<&str> {
        if self.0.len() < 2 {
            return None;
        }
        self.0.get(1).map(String::as_str)
    }

    /// Classified symbol kind
    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        SymbolKind::classify(self)
    }

    /// Display name (last segment)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    /// Segments between the kind segment and the display name
    #[inline]
    #[must_use]
    pub fn qualifiers(&self) -> &[String] {
        if self.0.len() <= 3 {
            return &[];
        }
        &self.0[2..self.0.len() - 1]
    }

    /// Same path with the display name replaced
    ///
    /// Used to synthesize the identity a symbol would have after a rename.
    #[must_use]
    pub fn with_name(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        if let Some(last) = segments.last_mut() {
            *last = name.to_string();
        }
        Self(segments)
    }
}

impl Display for SymbolId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

impl FromStr for SymbolId {
    type Err = SymbolIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(SymbolIdError::Empty);
        }
        Self::new(s.split(SEGMENT_SEPARATOR).map(str::to_string).collect())
    }
}

impl TryFrom<String> for SymbolId {
    type Error = SymbolIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for SymbolId {
    type Error = SymbolIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SymbolId> for String {
    fn from(id: SymbolId) -> Self {
        id.to_string()
    }
}

/// Errors related to symbol identifiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolIdError {
    /// Identifier string was empty
    #[error("symbol identifier is empty")]
    Empty,

    /// Identifier contains an empty segment
    #[error("symbol identifier '{0}' contains an empty segment")]
    EmptySegment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_parses_segments() {
        let id: SymbolId = "proj/script/scr_old".parse().unwrap();
        assert_eq!(id.segments(), &["proj", "script", "scr_old"]);
        assert_eq!(id.domain(), "proj");
        assert_eq!(id.kind_segment(), Some("script"));
        assert_eq!(id.name(), "scr_old");
    }

    #[test]
    fn single_segment_id_is_its_own_name() {
        let id: SymbolId = "A".parse().unwrap();
        assert_eq!(id.name(), "A");
        assert_eq!(id.kind_segment(), None);
    }

    #[test]
    fn id_rejects_empty_and_hollow_segments() {
        assert_eq!("".parse::<SymbolId>(), Err(SymbolIdError::Empty));
        assert_eq!("   ".parse::<SymbolId>(), Err(SymbolIdError::Empty));
        assert!(matches!(
            "proj//scr".parse::<SymbolId>(),
            Err(SymbolIdError::EmptySegment(_))
        ));
    }

    #[test]
    fn with_name_replaces_last_segment_only() {
        let id: SymbolId = "proj/var/obj_player/hp".parse().unwrap();
        let renamed = id.with_name("health");
        assert_eq!(renamed.to_string(), "proj/var/obj_player/health");
        assert_eq!(id.to_string(), "proj/var/obj_player/hp");
    }

    #[test]
    fn qualifiers_sit_between_kind_and_name() {
        let id: SymbolId = "proj/var/obj_player/hp".parse().unwrap();
        assert_eq!(id.qualifiers(), &["obj_player"]);

        let global: SymbolId = "proj/var/score".parse().unwrap();
        assert!(global.qualifiers().is_empty());
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let id: SymbolId = "proj/macro/MAX_HP".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"proj/macro/MAX_HP\"");

        let back: SymbolId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<SymbolId>("\"\"").is_err());
    }
}
