//! Error types for classification and document decoding

use thiserror::Error;

/// Errors that can occur while classifying extracted files or decoding
/// documents.
///
/// Classification ambiguity ([`MalformedFileName`](Self::MalformedFileName))
/// fails the whole classify call: a misnamed manufacturer file would
/// corrupt ID attribution for every file in its group. Schema and
/// identifier errors are scoped to the one document (or field) being
/// decoded and leave sibling documents untouched.
#[derive(Error, Debug)]
pub enum BackendError {
    /// IO error while reading an extracted document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Extraction failure surfaced through the facade
    #[error("archive error: {0}")]
    Archive(#[from] knxproj_archive::ArchiveError),

    /// A path matched a classification pattern but its name violates the
    /// expected convention; never guessed around
    #[error("malformed file name '{path}'")]
    MalformedFileName {
        /// The offending manifest path, container-relative
        path: String,
    },

    /// The document is not well-formed XML
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A composite identifier did not decode as its context requires
    #[error("identifier error: {0}")]
    Id(#[from] knxproj_core::IdError),

    /// The document declares a namespace outside the supported table
    #[error("schema error: {0}")]
    Schema(#[from] knxproj_core::SchemaError),

    /// The document parsed but its structure is not the expected shape
    #[error("malformed document: {0}")]
    Document(String),
}

/// Type alias for [`Result<T, BackendError>`]
pub type Result<T> = std::result::Result<T, BackendError>;
