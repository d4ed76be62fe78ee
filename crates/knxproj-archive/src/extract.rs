//! Recursive container extraction
//!
//! An export container is a zip-compatible archive whose entries may
//! themselves be (possibly encrypted) containers. [`Extractor::extract`]
//! walks the whole structure with an explicit worklist: the top-level
//! pass completes first, then every nested container found during a pass
//! is expanded in turn, each one level deeper, until the worklist drains
//! or the depth bound trips.

use crate::error::ArchiveError;
use crate::manifest::Manifest;
use crate::path::safe_join;
use crate::MAX_NESTING_DEPTH;
use log::debug;
use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

/// Document extensions worth extracting
const DOCUMENT_EXTENSIONS: [&str; 1] = ["xml"];

/// Extensions identifying nested containers
const CONTAINER_EXTENSIONS: [&str; 3] = ["zip", "knxproj", "knxprod"];

/// Supplies passwords for encrypted entries.
///
/// Invoked once per encrypted entry with the entry's container-internal
/// path, allowing per-entry passwords. Implementations must be pure:
/// the same path always yields the same answer within one extraction.
pub trait PasswordResolver {
    /// The password for the given entry, or `None` if none is known
    fn resolve(&self, entry_path: &str) -> Option<String>;
}

impl<F> PasswordResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, entry_path: &str) -> Option<String> {
        self(entry_path)
    }
}

/// Resolver for unprotected exports: never supplies a password
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPassword;

impl PasswordResolver for NoPassword {
    fn resolve(&self, _entry_path: &str) -> Option<String> {
        None
    }
}

/// Resolver applying one password to every encrypted entry
#[derive(Debug, Clone)]
pub struct FixedPassword(pub String);

impl PasswordResolver for FixedPassword {
    fn resolve(&self, _entry_path: &str) -> Option<String> {
        Some(self.0.clone())
    }
}

/// One container awaiting extraction
struct Job {
    container: PathBuf,
    destination: PathBuf,
    depth: usize,
}

/// Recursive container extractor.
///
/// Holds no state across invocations; independent extractions may run
/// concurrently as long as each uses its own destination directory.
#[derive(Debug, Clone)]
pub struct Extractor {
    max_depth: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    /// Extractor with the default nesting bound ([`MAX_NESTING_DEPTH`])
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
        }
    }

    /// Extractor with a custom nesting bound
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Extract a container (and every nested container) into
    /// `destination`.
    ///
    /// Entries are processed sequentially. Directory markers become
    /// directories; regular files are written only when their extension
    /// is on the processable allow-list (documents and containers),
    /// streamed entry-to-disk. Everything else is skipped and absent
    /// from the returned [`Manifest`].
    ///
    /// Encrypted entries obtain their password from `passwords`; nested
    /// containers expand into a sibling directory named after the
    /// container minus its extension, and their files append to the
    /// outer manifest.
    ///
    /// # Errors
    ///
    /// Any entry-level failure aborts the whole extraction:
    /// [`ArchiveError::PathEscape`] before a single byte of an escaping
    /// entry is written, [`ArchiveError::DecryptionFailed`] naming the
    /// entry, [`ArchiveError::RecursionLimitExceeded`] when nesting
    /// passes the bound, and IO/container errors as they occur.
    /// Partially written files are not cleaned up here; callers tear the
    /// destination tree down via [`Manifest::cleanup`] or by removing
    /// the directory on error.
    pub fn extract(
        &self,
        source: &Path,
        destination: &Path,
        passwords: &impl PasswordResolver,
    ) -> Result<Manifest, ArchiveError> {
        let mut files = Vec::new();
        let mut worklist = VecDeque::new();
        worklist.push_back(Job {
            container: source.to_path_buf(),
            destination: destination.to_path_buf(),
            depth: 0,
        });

        while let Some(job) = worklist.pop_front() {
            if job.depth >= self.max_depth {
                return Err(ArchiveError::RecursionLimitExceeded {
                    max: self.max_depth,
                });
            }
            extract_one(&job, passwords, &mut files, &mut worklist)?;
        }

        Ok(Manifest::new(destination.to_path_buf(), files))
    }
}

/// Extract a single container, appending files to the manifest and
/// nested containers to the worklist.
fn extract_one(
    job: &Job,
    passwords: &impl PasswordResolver,
    files: &mut Vec<PathBuf>,
    worklist: &mut VecDeque<Job>,
) -> Result<(), ArchiveError> {
    let reader = BufReader::new(File::open(&job.container)?);
    let mut archive = ZipArchive::new(reader)?;
    fs::create_dir_all(&job.destination)?;

    for index in 0..archive.len() {
        // Metadata first, without decompressing the entry
        let (name, is_dir, encrypted) = {
            let entry = archive.by_index_raw(index)?;
            (entry.name().to_string(), entry.is_dir(), entry.encrypted())
        };

        // Security gate: nothing is written for an entry that would
        // resolve outside the destination.
        let destination = safe_join(&job.destination, &name)?;

        if is_dir {
            fs::create_dir_all(&destination)?;
            continue;
        }

        let Some(extension) = processable_extension(&name) else {
            debug!("skipping entry outside the allow-list: {name}");
            continue;
        };

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }

        if encrypted {
            let password =
                passwords
                    .resolve(&name)
                    .ok_or_else(|| ArchiveError::DecryptionFailed {
                        entry: name.clone(),
                    })?;
            let mut entry = archive
                .by_index_decrypt(index, password.as_bytes())
                .map_err(|err| match err {
                    ZipError::InvalidPassword => ArchiveError::DecryptionFailed {
                        entry: name.clone(),
                    },
                    other => ArchiveError::Zip(other),
                })?;
            let mut output = File::create(&destination)?;
            copy_decrypted(&mut entry, &mut output, &name)?;
        } else {
            let mut entry = archive.by_index(index)?;
            let mut output = File::create(&destination)?;
            io::copy(&mut entry, &mut output)?;
        }

        files.push(destination.clone());

        if CONTAINER_EXTENSIONS.contains(&extension.as_str()) {
            worklist.push_back(Job {
                destination: destination.with_extension(""),
                container: destination,
                depth: job.depth + 1,
            });
        }
    }

    Ok(())
}

/// Stream an encrypted entry to disk, keeping error provenance.
///
/// A read failure mid-stream means the password validated but the
/// ciphertext did not, so only read errors map to `DecryptionFailed`;
/// write failures on the destination file stay IO errors.
fn copy_decrypted(
    entry: &mut impl Read,
    output: &mut File,
    name: &str,
) -> Result<(), ArchiveError> {
    let mut buffer = [0u8; 8192];
    loop {
        let read = match entry.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(count) => count,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(_) => {
                return Err(ArchiveError::DecryptionFailed {
                    entry: name.to_string(),
                })
            }
        };
        output.write_all(&buffer[..read])?;
    }
}

/// The entry's extension if it is on the processable allow-list
fn processable_extension(name: &str) -> Option<String> {
    let extension = Path::new(name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();

    let known = DOCUMENT_EXTENSIONS.contains(&extension.as_str())
        || CONTAINER_EXTENSIONS.contains(&extension.as_str());
    known.then_some(extension)
}
