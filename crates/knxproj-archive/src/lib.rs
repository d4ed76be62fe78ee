//! Container extraction for KNX ETS project exports
//!
//! An ETS export (`.knxproj` / `.knxprod`) is a zip-compatible container
//! whose entries may themselves be containers, individually encrypted.
//! This crate opens such an archive, defends every write against
//! path-escape entries, decrypts on demand through a caller-supplied
//! password resolver, expands nested containers with a bounded worklist,
//! and returns a flat [`Manifest`] of the extracted files.
//!
//! # Usage
//!
//! ```no_run
//! use knxproj_archive::{Extractor, FixedPassword};
//! use std::path::Path;
//!
//! let extractor = Extractor::new();
//! let manifest = extractor.extract(
//!     Path::new("site.knxproj"),
//!     Path::new("/tmp/site-extract"),
//!     &FixedPassword("export-password".to_string()),
//! )?;
//!
//! for (relative, _absolute) in manifest.entries() {
//!     println!("extracted {relative}");
//! }
//!
//! // The caller owns the destination tree for the whole decode session.
//! manifest.cleanup()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Extraction aborts on the first entry-level failure; partial trees are
//! the caller's to remove. Irrelevant entries (images, binary catalogs)
//! are skipped silently and never appear in the manifest.

pub mod error;
pub mod extract;
pub mod manifest;
pub mod path;

/// Default bound for nested-container expansion.
///
/// Real exports nest at most two levels; the bound exists so a container
/// that contains itself fails with
/// [`ArchiveError::RecursionLimitExceeded`] instead of looping.
pub const MAX_NESTING_DEPTH: usize = 8;

pub use error::ArchiveError;
pub use extract::{Extractor, FixedPassword, NoPassword, PasswordResolver};
pub use manifest::Manifest;
pub use path::safe_join;
