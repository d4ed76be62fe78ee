//! Opened export archives
//!
//! [`ExportArchive`] ties the pipeline together: extract the container
//! into an owned temporary directory, classify the manifest, and hand
//! out per-document decoders. The extraction tree lives exactly as long
//! as the `ExportArchive` value; dropping it (or calling
//! [`close`](ExportArchive::close)) removes every extracted file.

use crate::classify::{
    ClassifiedFiles, FileClassifier, HardwareFileRef, ManufacturerFileRef, ProjectFileRef,
};
use crate::error::Result;
use crate::hardware::{decode_hardware_data, decode_manufacturer_data};
use crate::model::{HardwareData, ManufacturerData, Project, ProjectInfo};
use crate::project::{decode_project, decode_project_info};
use knxproj_archive::{Extractor, Manifest, PasswordResolver};
use log::debug;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A fully extracted and classified export archive.
///
/// Documents are decoded lazily, one at a time; no file handle survives
/// a single decode call.
#[derive(Debug)]
pub struct ExportArchive {
    workdir: TempDir,
    manifest: Manifest,
    files: ClassifiedFiles,
}

impl ExportArchive {
    /// Open the export archive at `path`.
    ///
    /// Extracts into a fresh temporary directory and classifies the
    /// resulting manifest. Encrypted entries are decrypted through
    /// `passwords`.
    ///
    /// # Errors
    ///
    /// Propagates extraction failures (path escape, decryption,
    /// recursion bound, IO) and classification failures; on error the
    /// temporary directory is removed before returning.
    pub fn open(path: &Path, passwords: &impl PasswordResolver) -> Result<Self> {
        let workdir = TempDir::new()?;
        debug!(
            "extracting {} into {}",
            path.display(),
            workdir.path().display()
        );

        let manifest = Extractor::new().extract(path, workdir.path(), passwords)?;
        let files = FileClassifier::new().classify(&manifest)?;

        Ok(Self {
            workdir,
            manifest,
            files,
        })
    }

    /// Project meta files with their installation documents
    #[must_use]
    pub fn projects(&self) -> &[ProjectFileRef] {
        &self.files.projects
    }

    /// Manufacturer data files
    #[must_use]
    pub fn manufacturers(&self) -> &[ManufacturerFileRef] {
        &self.files.manufacturers
    }

    /// Hardware catalog files
    #[must_use]
    pub fn hardware(&self) -> &[HardwareFileRef] {
        &self.files.hardware
    }

    /// The extraction manifest
    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Decode the meta document of a project reference
    ///
    /// # Errors
    ///
    /// Propagates IO and decode failures for this one document.
    pub fn decode_project_info(&self, project: &ProjectFileRef) -> Result<ProjectInfo> {
        let text = fs::read_to_string(&project.meta_path)?;
        decode_project_info(&text)
    }

    /// Decode one numbered installation document
    ///
    /// # Errors
    ///
    /// Propagates IO and decode failures for this one document.
    pub fn decode_installation(&self, installation_path: &Path) -> Result<Project> {
        let text = fs::read_to_string(installation_path)?;
        decode_project(&text)
    }

    /// Decode a hardware catalog
    ///
    /// # Errors
    ///
    /// Propagates IO and decode failures for this one document.
    pub fn decode_hardware(&self, hardware: &HardwareFileRef) -> Result<HardwareData> {
        let text = fs::read_to_string(&hardware.path)?;
        decode_hardware_data(&text)
    }

    /// Decode a manufacturer data document
    ///
    /// # Errors
    ///
    /// Propagates IO and decode failures for this one document.
    pub fn decode_manufacturer(
        &self,
        manufacturer: &ManufacturerFileRef,
    ) -> Result<ManufacturerData> {
        let text = fs::read_to_string(&manufacturer.path)?;
        decode_manufacturer_data(&text)
    }

    /// Remove the extraction tree now instead of at drop.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if removal fails.
    pub fn close(self) -> Result<()> {
        self.workdir.close()?;
        Ok(())
    }
}
