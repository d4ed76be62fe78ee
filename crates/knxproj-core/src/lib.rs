//! Core types for KNX ETS project exports
//!
//! This crate holds the two pure subsystems everything else builds on:
//!
//! - [`id`]: the composite identifier codec. ETS documents pack several
//!   typed sub-identifiers into single delimiter-joined attribute values;
//!   [`CompositeId`] decodes them into a validated record and re-encodes
//!   them byte-for-byte stable.
//! - [`schema`]: namespace-URI-to-dialect resolution. [`SchemaVersion`]
//!   is a closed enum of the known schema revisions, matched exhaustively
//!   by decoders.
//!
//! No I/O happens here; both subsystems are stateless and safe to use
//! concurrently.
//!
//! # Usage
//!
//! ```
//! use knxproj_core::{CompositeId, FieldKind, SchemaVersion};
//!
//! let id = CompositeId::decompose("M-0080_A-1012-10-5227-O00C5_O-0_R-1");
//! id.require(&[FieldKind::ComObject, FieldKind::ComObjectRef])?;
//! assert_eq!(id.com_object.as_ref().unwrap().as_str(), "O-0");
//!
//! let version = SchemaVersion::resolve("http://knx.org/xml/project/21")?;
//! assert_eq!(version, SchemaVersion::V21);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod id;
pub mod schema;

pub use error::{IdError, SchemaError};
pub use id::{
    ApplicationProgramId, AreaId, ComObjectId, ComObjectRefId, CompositeId, DeviceInstanceId,
    FieldKind, GroupAddressId, Hardware2ProgramId, HardwareId, LineId, ManufacturerId, ModuleId,
    ProductId, ProjectId, SpaceId,
};
pub use schema::SchemaVersion;
