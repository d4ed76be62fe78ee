//! Error types for identifier decoding and schema resolution

use crate::id::FieldKind;
use thiserror::Error;

/// Errors that can occur while decoding composite identifier strings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The identifier string did not yield every field the call site requires.
    ///
    /// Carries the offending string verbatim together with the field kinds
    /// that could not be obtained from it.
    #[error("invalid identifier '{raw}': missing {missing:?}")]
    Invalid {
        /// The raw identifier string as it appeared in the document
        raw: String,
        /// Field kinds the call site required but the string did not provide
        missing: Vec<FieldKind>,
    },
}

/// Errors that can occur while resolving a document's schema dialect
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The namespace URI does not match any known schema revision.
    ///
    /// Resolution is exact-match only; an unknown URI is never silently
    /// mapped to a known dialect.
    #[error("unsupported schema namespace '{namespace}'")]
    Unsupported {
        /// The namespace URI found in the document
        namespace: String,
    },
}
