//! The decoded object graph
//!
//! Plain data produced by the document decoders: project metadata,
//! installation topology, building locations, group address trees, and
//! the manufacturer-side hardware and application program catalogs.
//! Identifier-valued fields hold the typed IDs from `knxproj_core`;
//! optional IDs are fields the source document may legitimately omit.

use knxproj_core::{
    ApplicationProgramId, AreaId, ComObjectId, ComObjectRefId, DeviceInstanceId, GroupAddressId,
    Hardware2ProgramId, HardwareId, LineId, ManufacturerId, ProductId, ProjectId, SpaceId,
};
use serde::{Deserialize, Serialize};

/// How group addresses are presented in a project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupAddressStyle {
    /// Main/middle/sub presentation
    ThreeLevel,
    /// Main/sub presentation
    TwoLevel,
    /// Flat address space
    #[default]
    Free,
}

/// Project metadata from a `P-XXXX/Project.xml` meta document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub id: ProjectId,
    pub name: String,
    pub comment: String,
    pub address_style: GroupAddressStyle,
}

/// A whole project as stored in a numbered installation document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub installations: Vec<Installation>,
}

/// One installation within a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    pub name: String,
    pub topology: Vec<Area>,
    pub locations: Vec<Space>,
    pub group_addresses: Vec<GroupRange>,
}

/// A topology area
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub project: Option<ProjectId>,
    pub name: String,
    pub address: u16,
    pub lines: Vec<Line>,
}

/// A line within an area
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub project: Option<ProjectId>,
    pub name: String,
    pub address: u16,
    pub devices: Vec<DeviceInstance>,
}

/// A device instance on a line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInstance {
    pub id: DeviceInstanceId,
    pub project: Option<ProjectId>,
    pub manufacturer: Option<ManufacturerId>,
    pub hardware: Option<HardwareId>,
    pub product: Option<ProductId>,
    pub hardware2_program: Option<Hardware2ProgramId>,
    pub name: String,
    pub address: u16,
    pub com_objects: Vec<ComObjectInstanceRef>,
}

/// A communication object reference instantiated on a device, linked to
/// zero or more group addresses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComObjectInstanceRef {
    pub com_object: ComObjectId,
    pub com_object_ref: ComObjectRefId,
    pub datapoint_type: String,
    pub links: Vec<GroupAddressId>,
}

/// Group range identifier, stored verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupRangeId(pub String);

impl GroupRangeId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A range of group addresses, possibly with nested sub-ranges
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupRange {
    pub id: GroupRangeId,
    pub name: String,
    pub range_start: u16,
    pub range_end: u16,
    pub addresses: Vec<GroupAddress>,
    pub sub_ranges: Vec<GroupRange>,
}

/// A single group address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupAddress {
    pub id: GroupAddressId,
    pub project: Option<ProjectId>,
    pub name: String,
    pub description: String,
    pub address: u16,
    pub datapoint_type: String,
}

/// Space type values found in location trees
pub mod space_type {
    pub const BUILDING: &str = "Building";
    pub const BUILDING_PART: &str = "BuildingPart";
    pub const FLOOR: &str = "Floor";
    pub const ROOM: &str = "Room";
    pub const DISTRIBUTION_BOARD: &str = "DistributionBoard";
    pub const STAIRWAY: &str = "Stairway";
    pub const CORRIDOR: &str = "Corridor";
}

/// A space for devices and nested spaces (building, floor, room, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    pub project: Option<ProjectId>,
    pub space_type: String,
    pub name: String,
    pub device_instances: Vec<DeviceInstanceId>,
    pub sub_spaces: Vec<Space>,
}

/// Manufacturer-side hardware catalog from a `Hardware.xml` document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareData {
    pub manufacturer: ManufacturerId,
    pub hardware: Vec<Hardware>,
    pub languages: Vec<Language>,
}

/// One hardware entry with its products and program mappings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hardware {
    pub id: HardwareId,
    pub name: String,
    pub products: Vec<Product>,
    pub hardware2_programs: Vec<Hardware2Program>,
}

/// An orderable product belonging to a hardware entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub manufacturer: Option<ManufacturerId>,
    pub hardware: Option<HardwareId>,
    pub text: String,
}

/// The mapping between a hardware entry and an application program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hardware2Program {
    pub id: Hardware2ProgramId,
    pub manufacturer: Option<ManufacturerId>,
    pub hardware: Option<HardwareId>,
    pub application_program: Option<ApplicationProgramId>,
}

/// Language identifier, e.g. `de-DE`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageId(pub String);

impl LanguageId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Translations for one language
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub id: LanguageId,
    pub translations: Vec<Translation>,
}

/// One translated product text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub manufacturer: Option<ManufacturerId>,
    pub hardware: Option<HardwareId>,
    pub product: Option<ProductId>,
    pub text: String,
}

/// Application program catalog from a manufacturer document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerData {
    pub manufacturer: ManufacturerId,
    pub programs: Vec<ApplicationProgram>,
}

/// An application program with its communication object tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationProgram {
    pub id: ApplicationProgramId,
    pub manufacturer: Option<ManufacturerId>,
    pub name: String,
    pub version: u32,
    pub com_objects: Vec<ComObject>,
    pub com_object_refs: Vec<ComObjectRef>,
}

/// A communication object definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComObject {
    pub id: ComObjectId,
    pub manufacturer: Option<ManufacturerId>,
    pub application_program: Option<ApplicationProgramId>,
    pub name: String,
    pub text: String,
    pub description: String,
    pub function_text: String,
    pub object_size: String,
    pub datapoint_type: String,
    pub priority: String,
    pub read_flag: bool,
    pub write_flag: bool,
    pub communication_flag: bool,
    pub transmit_flag: bool,
    pub update_flag: bool,
    pub read_on_init_flag: bool,
}

/// A communication object reference, overriding selected fields of its
/// referenced object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComObjectRef {
    pub id: ComObjectRefId,
    pub manufacturer: Option<ManufacturerId>,
    pub application_program: Option<ApplicationProgramId>,
    pub com_object: Option<ComObjectId>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub description: Option<String>,
    pub function_text: Option<String>,
    pub object_size: Option<String>,
    pub datapoint_type: Option<String>,
    pub priority: Option<String>,
    pub read_flag: Option<bool>,
    pub write_flag: Option<bool>,
    pub communication_flag: Option<bool>,
    pub transmit_flag: Option<bool>,
    pub update_flag: Option<bool>,
    pub read_on_init_flag: Option<bool>,
}
