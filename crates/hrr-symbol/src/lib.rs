//! HRR Symbol Model
//!
//! Identifiers, kinds and occurrences of symbols in the analyzed scripting
//! language.
//!
//! # Overview
//!
//! - **SymbolId**: path-like `<domain>/<kind>/<qualified-name>` identifier
//! - **SymbolKind**: script, variable, event, macro, enum or unknown
//! - **Occurrence**: one definition or reference span
//! - **Identifier grammar**: `validate_identifier` and [`ReservedWords`]
//!
//! # Example
//!
//! ```rust
//! use hrr_symbol::{SymbolId, SymbolKind, validate_identifier};
//!
//! let id: SymbolId = "proj/script/scr_old".parse().unwrap();
//! assert_eq!(id.name(), "scr_old");
//! assert_eq!(id.kind(), SymbolKind::Script);
//! assert!(validate_identifier("scr_new").is_ok());
//! ```

#![warn(missing_docs)]

pub mod id;
pub mod identifier;
pub mod kind;
pub mod occurrence;

// Re-exports
pub use id::{SymbolId, SymbolIdError};
pub use identifier::{
    is_builtin_reserved, validate_identifier, IdentifierError, IdentifierReason, ReservedWords,
    RESERVED_WORDS,
};
pub use kind::{SymbolKind, VariableScope};
pub use occurrence::{Occurrence, OccurrenceKind};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for symbol operations
    pub use crate::{
        validate_identifier, Occurrence, OccurrenceKind, ReservedWords, SymbolId, SymbolKind,
        VariableScope,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
