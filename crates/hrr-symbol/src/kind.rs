//! Symbol kinds
//!
//! The kind is read from the second identifier segment and drives hot-reload
//! feasibility decisions.

use crate::id::SymbolId;
use std::fmt::{self, Display, Formatter};

/// Where a variable lives at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableScope {
    /// Owned by an object instance
    Instance,
    /// Project-wide global
    Global,
}

/// Kind of a definable symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum SymbolKind {
    /// Script function
    Script,
    /// Variable, instance-scoped or global
    Variable(VariableScope),
    /// Object event handler
    Event,
    /// Compile-time macro
    Macro,
    /// Enumeration
    Enum,
    /// Unrecognised kind segment (or none at all)
    Unknown(String),
}

impl SymbolKind {
    /// Classify an identifier by its kind segment
    ///
    /// A variable is instance-scoped when an owner segment sits between the
    /// kind and the name, unless that owner is literally `global`.
    #[must_use]
    pub fn classify(id: &SymbolId) -> Self {
        let Some(segment) = id.kind_segment() else {
            return Self::Unknown(String::new());
        };

        match segment.to_ascii_lowercase().as_str() {
            "script" | "scripts" => Self::Script,
            "var" | "variable" | "variables" => {
                let owner = id.qualifiers().first().map(String::as_str);
                match owner {
                    Some(owner) if !owner.eq_ignore_ascii_case("global") => {
                        Self::Variable(VariableScope::Instance)
                    }
                    _ => Self::Variable(VariableScope::Global),
                }
            }
            "event" | "events" => Self::Event,
            "macro" | "macros" => Self::Macro,
            "enum" | "enums" => Self::Enum,
            _ => Self::Unknown(segment.to_string()),
        }
    }

    /// Kinds whose rename reaches every file in the project
    #[inline]
    #[must_use]
    pub fn is_project_wide(&self) -> bool {
        matches!(
            self,
            Self::Macro | Self::Enum | Self::Variable(VariableScope::Global)
        )
    }

    /// Kinds whose dependents are inlined at compile time
    #[inline]
    #[must_use]
    pub fn is_compile_time(&self) -> bool {
        matches!(self, Self::Macro | Self::Enum)
    }
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Script => write!(f, "script"),
            Self::Variable(VariableScope::Instance) => write!(f, "instance variable"),
            Self::Variable(VariableScope::Global) => write!(f, "global variable"),
            Self::Event => write!(f, "event"),
            Self::Macro => write!(f, "macro"),
            Self::Enum => write!(f, "enum"),
            Self::Unknown(segment) if segment.is_empty() => write!(f, "unknown"),
            Self::Unknown(segment) => write!(f, "unknown ({segment})"),
        }
    }
}
