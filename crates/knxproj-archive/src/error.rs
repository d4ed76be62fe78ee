//! Error types for container extraction

use thiserror::Error;

/// Errors that can occur during container extraction.
///
/// Every variant here is fatal to the whole extraction: no partial-archive
/// success is reported, and the caller owns cleanup of whatever was
/// written before the failure.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// IO error while reading the container or writing extracted files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or corrupted container structure
    #[error("invalid container: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// An entry whose path would resolve outside the destination directory.
    ///
    /// Security-relevant: rejected before any byte of the entry is
    /// written.
    #[error("entry '{entry}' escapes the destination directory")]
    PathEscape {
        /// The entry path as stored in the container
        entry: String,
    },

    /// An encrypted entry could not be decrypted (no password available,
    /// wrong password, or corrupt ciphertext)
    #[error("could not decrypt entry '{entry}'")]
    DecryptionFailed {
        /// The entry path as stored in the container
        entry: String,
    },

    /// Nested containers exceed the configured depth bound.
    ///
    /// Guards against containers that directly or indirectly contain
    /// themselves.
    #[error("container nesting exceeds depth limit (max {max})")]
    RecursionLimitExceeded {
        /// The configured maximum nesting depth
        max: usize,
    },
}
