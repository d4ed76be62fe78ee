//! Manifest classification
//!
//! An extracted export contains many files the decoders have no interest
//! in (icons, baggages, binary catalogs). The classifier pattern-matches
//! the manifest's container-relative paths against the naming
//! conventions of the four document kinds worth decoding and groups them
//! into typed file references. Everything else is ignored silently.

use crate::error::{BackendError, Result};
use knxproj_core::{ApplicationProgramId, CompositeId, FieldKind, ManufacturerId};
use knxproj_archive::Manifest;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A project meta file with its sibling installation documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFileRef {
    /// Absolute path of the `Project.xml` meta document
    pub meta_path: PathBuf,
    /// Absolute paths of the numeric-named installation documents
    /// sitting beside the meta file, in manifest order
    pub installation_paths: Vec<PathBuf>,
}

/// A manufacturer data file, its identity decoded from the file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerFileRef {
    pub path: PathBuf,
    pub manufacturer_id: ManufacturerId,
    pub application_program_id: ApplicationProgramId,
}

/// A hardware catalog file under a manufacturer directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareFileRef {
    pub path: PathBuf,
    pub manufacturer_id: ManufacturerId,
}

/// The typed grouping of one manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedFiles {
    pub projects: Vec<ProjectFileRef>,
    pub manufacturers: Vec<ManufacturerFileRef>,
    pub hardware: Vec<HardwareFileRef>,
}

/// Pattern-matches manifest paths into typed file references.
///
/// The patterns are compiled once per classifier instance and owned by
/// it; there is no shared matcher state.
#[derive(Debug)]
pub struct FileClassifier {
    project_meta: Regex,
    installation: Regex,
    manufacturer: Regex,
    hardware: Regex,
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FileClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            project_meta: Regex::new(r"^[Pp]-[0-9A-Za-z-]+/[Pp]roject\.xml$")
                .expect("regex is compile-time constant"),
            installation: Regex::new(r"^[0-9]+\.xml$").expect("regex is compile-time constant"),
            manufacturer: Regex::new(r"^[Mm]-[0-9A-Za-z]+/([Mm]-[^/]+)\.xml$")
                .expect("regex is compile-time constant"),
            // Hardware catalogs sit under a directory named by the
            // manufacturer alone or by a manufacturer_hardware composite.
            hardware: Regex::new(r"^([Mm]-[^/]+)/Hardware\.xml$")
                .expect("regex is compile-time constant"),
        }
    }

    /// Group a manifest into typed file references.
    ///
    /// Project meta files pick up their sibling `<digits>.xml`
    /// installation documents. Manufacturer file names must split on `_`
    /// into exactly a manufacturer and an application program component;
    /// any other shape is corrupt input, not something to guess around.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::MalformedFileName`] on the first
    /// manufacturer-patterned path whose base name violates the two-part
    /// convention. The whole classification fails: a misattributed
    /// manufacturer file would poison every decoded ID in its group.
    pub fn classify(&self, manifest: &Manifest) -> Result<ClassifiedFiles> {
        let entries: Vec<(String, PathBuf)> = manifest
            .entries()
            .map(|(relative, path)| (relative, path.to_path_buf()))
            .collect();

        let mut classified = ClassifiedFiles::default();

        for (relative, path) in &entries {
            if self.project_meta.is_match(relative) {
                let installation_paths = self.sibling_installations(relative, &entries);
                classified.projects.push(ProjectFileRef {
                    meta_path: path.clone(),
                    installation_paths,
                });
            } else if let Some(captures) = self.hardware.captures(relative) {
                // The directory name carries at least the manufacturer token
                let directory = CompositeId::decompose(&captures[1]);
                let manufacturer_id = directory.manufacturer.ok_or_else(|| {
                    BackendError::MalformedFileName {
                        path: relative.clone(),
                    }
                })?;
                classified.hardware.push(HardwareFileRef {
                    path: path.clone(),
                    manufacturer_id,
                });
            } else if let Some(captures) = self.manufacturer.captures(relative) {
                let reference = self.manufacturer_ref(relative, &captures[1], path.clone())?;
                classified.manufacturers.push(reference);
            } else {
                debug!("no classification for {relative}");
            }
        }

        Ok(classified)
    }

    /// Numeric-named documents in the same directory as a meta file
    fn sibling_installations(
        &self,
        meta_relative: &str,
        entries: &[(String, PathBuf)],
    ) -> Vec<PathBuf> {
        let directory = match meta_relative.rsplit_once('/') {
            Some((directory, _)) => directory,
            None => return Vec::new(),
        };

        entries
            .iter()
            .filter(|(relative, _)| {
                relative
                    .rsplit_once('/')
                    .is_some_and(|(dir, base)| dir == directory && self.installation.is_match(base))
            })
            .map(|(_, path)| path.clone())
            .collect()
    }

    /// Decode `<ManufacturerID>_<ApplicationProgramID>` from a
    /// manufacturer file's base name, strictly
    fn manufacturer_ref(
        &self,
        relative: &str,
        base_name: &str,
        path: PathBuf,
    ) -> Result<ManufacturerFileRef> {
        let parts: Vec<&str> = base_name.split('_').collect();
        let [manufacturer, program] = parts.as_slice() else {
            return Err(BackendError::MalformedFileName {
                path: relative.to_string(),
            });
        };

        let manufacturer = CompositeId::decompose_as(manufacturer, &[FieldKind::Manufacturer])
            .map_err(|_| BackendError::MalformedFileName {
                path: relative.to_string(),
            })?;
        let program = CompositeId::decompose_as(program, &[FieldKind::ApplicationProgram])
            .map_err(|_| BackendError::MalformedFileName {
                path: relative.to_string(),
            })?;

        Ok(ManufacturerFileRef {
            path,
            manufacturer_id: manufacturer.manufacturer.unwrap_or_default(),
            application_program_id: program.application_program.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn manifest_of(relative_paths: &[&str]) -> Manifest {
        let root = Path::new("/extract");
        let files = relative_paths.iter().map(|p| root.join(p)).collect();
        Manifest::new(root.to_path_buf(), files)
    }

    #[test]
    fn test_classifies_project_with_installations() {
        let manifest = manifest_of(&[
            "P-0497/Project.xml",
            "P-0497/0.xml",
            "P-0497/1.xml",
            "P-0497/ProjectIcon.png",
        ]);

        let classified = FileClassifier::new()
            .classify(&manifest)
            .expect("classification succeeds");

        assert_eq!(classified.projects.len(), 1);
        let project = &classified.projects[0];
        assert_eq!(project.meta_path, Path::new("/extract/P-0497/Project.xml"));
        assert_eq!(
            project.installation_paths,
            vec![
                Path::new("/extract/P-0497/0.xml").to_path_buf(),
                Path::new("/extract/P-0497/1.xml").to_path_buf(),
            ]
        );
    }

    #[test]
    fn test_classifies_manufacturer_file() {
        let manifest = manifest_of(&["M-0083/M-0083_A-0019-21-D29E.xml"]);

        let classified = FileClassifier::new()
            .classify(&manifest)
            .expect("classification succeeds");

        assert_eq!(classified.manufacturers.len(), 1);
        let reference = &classified.manufacturers[0];
        assert_eq!(reference.manufacturer_id.as_str(), "M-0083");
        assert_eq!(reference.application_program_id.as_str(), "A-0019-21-D29E");
    }

    #[test]
    fn test_classifies_hardware_under_composite_directory() {
        let manifest = manifest_of(&[
            "M-0007_H-6131.2F20-1/Hardware.xml",
            "M-0083/Hardware.xml",
        ]);

        let classified = FileClassifier::new()
            .classify(&manifest)
            .expect("classification succeeds");

        assert_eq!(classified.hardware.len(), 2);
        assert_eq!(classified.hardware[0].manufacturer_id.as_str(), "M-0007");
        assert_eq!(classified.hardware[1].manufacturer_id.as_str(), "M-0083");
    }

    #[test]
    fn test_single_part_manufacturer_name_is_malformed() {
        let manifest = manifest_of(&["M-0083/M-0083.xml"]);
        let err = FileClassifier::new().classify(&manifest).unwrap_err();

        match err {
            BackendError::MalformedFileName { path } => {
                assert_eq!(path, "M-0083/M-0083.xml");
            }
            other => panic!("expected MalformedFileName, got {other:?}"),
        }
    }

    #[test]
    fn test_three_part_manufacturer_name_is_malformed() {
        let manifest = manifest_of(&["M-0083/M-0083_A-0019_X-1.xml"]);
        assert!(matches!(
            FileClassifier::new().classify(&manifest),
            Err(BackendError::MalformedFileName { .. })
        ));
    }

    #[test]
    fn test_unrelated_entries_are_ignored() {
        let manifest = manifest_of(&[
            "Baggages/icon.xml",
            "knx_master.xml",
            "P-0497.signature",
        ]);

        let classified = FileClassifier::new()
            .classify(&manifest)
            .expect("classification succeeds");

        assert_eq!(classified, ClassifiedFiles::default());
    }
}
