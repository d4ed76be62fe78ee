//! Classification and document decoding for KNX ETS exports
//!
//! This crate turns an extracted export into a typed object graph:
//!
//! - [`classify`]: pattern-match the extraction manifest into typed file
//!   references (project meta + installations, manufacturer data,
//!   hardware catalogs)
//! - [`project`] / [`hardware`]: decode single documents, resolving each
//!   one's schema revision from its namespace and dispatching on it
//!   exhaustively
//! - [`export`]: the [`ExportArchive`] facade running the whole pipeline
//!   over a `.knxproj`/`.knxprod` file with an owned, self-cleaning
//!   extraction directory
//!
//! # Usage
//!
//! ```no_run
//! use knxproj_archive::NoPassword;
//! use knxproj_backend::ExportArchive;
//! use std::path::Path;
//!
//! let archive = ExportArchive::open(Path::new("site.knxproj"), &NoPassword)?;
//!
//! for project_ref in archive.projects() {
//!     let info = archive.decode_project_info(project_ref)?;
//!     println!("project {} ({})", info.name, info.id);
//!
//!     for installation_path in &project_ref.installation_paths {
//!         let project = archive.decode_installation(installation_path)?;
//!         for installation in &project.installations {
//!             println!("  {} areas", installation.topology.len());
//!         }
//!     }
//! }
//! # Ok::<(), knxproj_backend::BackendError>(())
//! ```

pub mod classify;
pub mod error;
pub mod export;
pub mod hardware;
pub mod model;
pub mod project;
mod xml;

pub use classify::{
    ClassifiedFiles, FileClassifier, HardwareFileRef, ManufacturerFileRef, ProjectFileRef,
};
pub use error::{BackendError, Result};
pub use export::ExportArchive;
pub use hardware::{decode_hardware_data, decode_manufacturer_data};
pub use project::{decode_project, decode_project_info};
