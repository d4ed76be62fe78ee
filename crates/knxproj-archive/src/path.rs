//! Destination path validation
//!
//! Container entries carry attacker-controlled relative paths. Every write
//! destination is derived through [`safe_join`], which refuses any entry
//! that would lexically leave the destination directory.

use crate::error::ArchiveError;
use std::path::{Component, Path, PathBuf};

/// Join an entry path onto the destination directory, rejecting escapes.
///
/// Only normal path components are accepted; `.` segments are dropped.
/// Parent references (`..`), absolute paths, and drive prefixes fail with
/// [`ArchiveError::PathEscape`] rather than being stripped, since a
/// container that tries to climb out of its destination is corrupt or
/// hostile input. An entry that resolves to the destination itself (e.g.
/// a bare `.`) is rejected the same way.
///
/// # Errors
///
/// Returns [`ArchiveError::PathEscape`] naming the entry verbatim.
pub fn safe_join(destination: &Path, entry_name: &str) -> Result<PathBuf, ArchiveError> {
    let mut joined = destination.to_path_buf();

    for component in Path::new(entry_name).components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ArchiveError::PathEscape {
                    entry: entry_name.to_string(),
                });
            }
        }
    }

    if joined == destination {
        return Err(ArchiveError::PathEscape {
            entry: entry_name.to_string(),
        });
    }

    Ok(joined)
}
