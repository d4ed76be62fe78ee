//! The extraction manifest

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The flat, ordered list of files a full extraction produced.
///
/// Paths are absolute and live under the extraction root; the on-disk
/// layout mirrors the container's internal structure, with nested
/// containers expanded into sibling directories named after the container
/// file minus its extension. The manifest owns no file handles — it is a
/// record of what exists under the root, and the caller is responsible
/// for calling [`cleanup`](Manifest::cleanup) when the decode session
/// ends, successfully or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl Manifest {
    /// Assemble a manifest from a root and file list.
    ///
    /// Normally produced by `Extractor::extract`; constructing one by
    /// hand is useful for classification over an already-extracted tree.
    #[must_use]
    pub fn new(root: PathBuf, files: Vec<PathBuf>) -> Self {
        Self { root, files }
    }

    /// The destination directory the extraction wrote into
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Extracted file paths in extraction order
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate entries as `(relative_path, absolute_path)` pairs.
    ///
    /// Relative paths are slash-separated regardless of platform; they
    /// are the shape classification patterns match against.
    pub fn entries(&self) -> impl Iterator<Item = (String, &Path)> + '_ {
        self.files.iter().filter_map(move |path| {
            let relative = path.strip_prefix(&self.root).ok()?;
            let joined = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            Some((joined, path.as_path()))
        })
    }

    /// Delete the whole destination tree.
    ///
    /// Consumes the manifest; every extracted file (and anything else
    /// under the root) is removed.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if removal fails.
    pub fn cleanup(self) -> io::Result<()> {
        fs::remove_dir_all(&self.root)
    }
}
