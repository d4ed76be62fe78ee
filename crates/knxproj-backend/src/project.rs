//! Project and installation document decoding
//!
//! A project export stores metadata in `P-XXXX/Project.xml` and the
//! actual installation data in numbered sibling documents. The numbered
//! documents come in three structural dialects across the known schema
//! revisions; decoding resolves the document's namespace once and
//! dispatches exhaustively.

use crate::error::Result;
use crate::model::{
    Area, ComObjectInstanceRef, DeviceInstance, GroupAddress, GroupAddressStyle, GroupRange,
    GroupRangeId, Installation, Line, Project, ProjectInfo, Space,
};
use crate::xml::{
    attr_string, attr_u16, child, children, document_version, required_child,
};
use knxproj_core::{CompositeId, FieldKind, GroupAddressId, ProjectId, SchemaVersion};
use log::debug;
use roxmltree::{Document, Node};

/// Structural differences between the schema revisions
#[derive(Debug, Clone, Copy)]
struct Dialect {
    /// Group links are connector child elements rather than a `Links`
    /// attribute
    connector_elements: bool,
    /// Device instances sit inside line segments
    segmented_lines: bool,
    /// The installation carries a location tree
    has_locations: bool,
}

fn dialect_of(version: SchemaVersion) -> Dialect {
    match version {
        SchemaVersion::V11 | SchemaVersion::V12 | SchemaVersion::V13 | SchemaVersion::V14 => {
            Dialect {
                connector_elements: true,
                segmented_lines: false,
                has_locations: true,
            }
        }
        SchemaVersion::V20 => Dialect {
            connector_elements: false,
            segmented_lines: false,
            has_locations: false,
        },
        SchemaVersion::V21 | SchemaVersion::V22 | SchemaVersion::V23 => Dialect {
            connector_elements: false,
            segmented_lines: true,
            has_locations: true,
        },
    }
}

/// Split a project-scoped identifier (`P-xxx_YY-n`) into its project and
/// local halves.
///
/// Some revisions write these IDs bare (`A-1`), some scoped
/// (`P-0497-0_A-1`); both occur in the wild for the same entity kind, so
/// the scoped shape is tried first and the verbatim string kept
/// otherwise.
fn split_scoped(raw: &str, kind: FieldKind) -> (Option<ProjectId>, String) {
    match CompositeId::decompose_as(raw, &[FieldKind::Project, kind]) {
        Ok(id) => {
            let local = id.get(kind).unwrap_or(raw).to_string();
            (id.project, local)
        }
        Err(_) => (None, raw.to_string()),
    }
}

/// Decode a `Project.xml` meta document.
///
/// All known schema revisions share this mapping.
///
/// # Errors
///
/// Fails on malformed XML, an unsupported namespace, or a document
/// without the expected `Project`/`ProjectInformation` elements.
pub fn decode_project_info(text: &str) -> Result<ProjectInfo> {
    let document = Document::parse(text)?;
    document_version(&document)?;

    let project = required_child(document.root_element(), "Project")?;
    let information = required_child(project, "ProjectInformation")?;

    let address_style = match information.attribute("GroupAddressStyle") {
        Some("ThreeLevel") => GroupAddressStyle::ThreeLevel,
        Some("TwoLevel") => GroupAddressStyle::TwoLevel,
        _ => GroupAddressStyle::Free,
    };

    Ok(ProjectInfo {
        id: ProjectId(attr_string(project, "Id")),
        name: attr_string(information, "Name"),
        comment: attr_string(information, "Comment"),
        address_style,
    })
}

/// Decode a numbered installation document into a [`Project`].
///
/// # Errors
///
/// Fails on malformed XML, an unsupported namespace, or a compound
/// identifier that violates its context's required shape; the error
/// carries the offending string verbatim.
pub fn decode_project(text: &str) -> Result<Project> {
    let document = Document::parse(text)?;
    let version = document_version(&document)?;
    let dialect = dialect_of(version);

    let project_node = required_child(document.root_element(), "Project")?;
    let mut project = Project {
        id: ProjectId(attr_string(project_node, "Id")),
        name: attr_string(project_node, "Name"),
        installations: Vec::new(),
    };

    if let Some(installations) = child(project_node, "Installations") {
        for node in children(installations, "Installation") {
            project.installations.push(decode_installation(node, dialect)?);
        }
    }

    Ok(project)
}

fn decode_installation(node: Node<'_, '_>, dialect: Dialect) -> Result<Installation> {
    let mut installation = Installation {
        name: attr_string(node, "Name"),
        ..Installation::default()
    };

    if let Some(topology) = child(node, "Topology") {
        for area in children(topology, "Area") {
            installation.topology.push(decode_area(area, dialect)?);
        }
    }

    if let Some(addresses) = child(node, "GroupAddresses") {
        if let Some(ranges) = child(addresses, "GroupRanges") {
            for range in children(ranges, "GroupRange") {
                installation.group_addresses.push(decode_group_range(range)?);
            }
        }
    }

    if dialect.has_locations {
        if let Some(locations) = child(node, "Locations") {
            for space in children(locations, "Space") {
                installation.locations.push(decode_space(space)?);
            }
        }
    }

    Ok(installation)
}

fn decode_area(node: Node<'_, '_>, dialect: Dialect) -> Result<Area> {
    let (project, local) = split_scoped(&attr_string(node, "Id"), FieldKind::Area);
    let mut area = Area {
        id: local.as_str().into(),
        project,
        name: attr_string(node, "Name"),
        address: attr_u16(node, "Address")?,
        lines: Vec::new(),
    };

    for line in children(node, "Line") {
        area.lines.push(decode_line(line, dialect)?);
    }

    Ok(area)
}

fn decode_line(node: Node<'_, '_>, dialect: Dialect) -> Result<Line> {
    let (project, local) = split_scoped(&attr_string(node, "Id"), FieldKind::Line);
    let mut line = Line {
        id: local.as_str().into(),
        project,
        name: attr_string(node, "Name"),
        address: attr_u16(node, "Address")?,
        devices: Vec::new(),
    };

    if dialect.segmented_lines {
        for segment in children(node, "Segment") {
            for device in children(segment, "DeviceInstance") {
                line.devices.push(decode_device(device, dialect)?);
            }
        }
    } else {
        for device in children(node, "DeviceInstance") {
            line.devices.push(decode_device(device, dialect)?);
        }
    }

    Ok(line)
}

fn decode_device(node: Node<'_, '_>, dialect: Dialect) -> Result<DeviceInstance> {
    let (project, local) = split_scoped(&attr_string(node, "Id"), FieldKind::DeviceInstance);
    let mut device = DeviceInstance {
        id: local.as_str().into(),
        project,
        name: attr_string(node, "Name"),
        address: attr_u16(node, "Address")?,
        ..DeviceInstance::default()
    };

    let product_ref = attr_string(node, "ProductRefId");
    if !product_ref.is_empty() {
        let decomposed = CompositeId::decompose(&product_ref);
        device.manufacturer = decomposed.manufacturer;
        device.hardware = decomposed.hardware;
        device.product = decomposed.product;
    }

    let program_ref = attr_string(node, "Hardware2ProgramRefId");
    if !program_ref.is_empty() {
        device.hardware2_program = CompositeId::decompose(&program_ref).hardware2_program;
    }

    if let Some(refs) = child(node, "ComObjectInstanceRefs") {
        for reference in children(refs, "ComObjectInstanceRef") {
            device
                .com_objects
                .push(decode_com_object_instance(reference, dialect)?);
        }
    }

    Ok(device)
}

fn decode_com_object_instance(
    node: Node<'_, '_>,
    dialect: Dialect,
) -> Result<ComObjectInstanceRef> {
    // The RefId occurs both as `O-x_R-y` and as the fully qualified
    // `M-..._A-..._O-x_R-y`; prefix classification covers both.
    let raw = attr_string(node, "RefId");
    let decomposed = CompositeId::decompose(&raw);
    decomposed.require(&[FieldKind::ComObject, FieldKind::ComObjectRef])?;

    let mut instance = ComObjectInstanceRef {
        com_object: decomposed.com_object.unwrap_or_default(),
        com_object_ref: decomposed.com_object_ref.unwrap_or_default(),
        datapoint_type: attr_string(node, "DatapointType"),
        links: Vec::new(),
    };

    if dialect.connector_elements {
        if let Some(connectors) = child(node, "Connectors") {
            for connector in connectors.children().filter(Node::is_element) {
                let reference = attr_string(connector, "GroupAddressRefId");
                match CompositeId::decompose_as(
                    &reference,
                    &[FieldKind::Project, FieldKind::GroupAddress],
                ) {
                    Ok(id) => instance.links.push(id.group_address.unwrap_or_default()),
                    Err(_) => debug!("ignoring connector without a group link: '{reference}'"),
                }
            }
        }
    } else {
        instance.links = attr_string(node, "Links")
            .split_whitespace()
            .map(|token| GroupAddressId(token.to_string()))
            .collect();
    }

    Ok(instance)
}

fn decode_group_range(node: Node<'_, '_>) -> Result<GroupRange> {
    let mut range = GroupRange {
        id: GroupRangeId(attr_string(node, "Id")),
        name: attr_string(node, "Name"),
        range_start: attr_u16(node, "RangeStart")?,
        range_end: attr_u16(node, "RangeEnd")?,
        ..GroupRange::default()
    };

    for address in children(node, "GroupAddress") {
        let raw = attr_string(address, "Id");
        let id = CompositeId::decompose_as(&raw, &[FieldKind::Project, FieldKind::GroupAddress])?;

        range.addresses.push(GroupAddress {
            id: id.group_address.unwrap_or_default(),
            project: id.project,
            name: attr_string(address, "Name"),
            description: attr_string(address, "Description"),
            address: attr_u16(address, "Address")?,
            datapoint_type: attr_string(address, "DatapointType"),
        });
    }

    for sub_range in children(node, "GroupRange") {
        range.sub_ranges.push(decode_group_range(sub_range)?);
    }

    Ok(range)
}

fn decode_space(node: Node<'_, '_>) -> Result<Space> {
    let (project, local) = split_scoped(&attr_string(node, "Id"), FieldKind::Space);
    let mut space = Space {
        id: local.as_str().into(),
        project,
        space_type: attr_string(node, "Type"),
        name: attr_string(node, "Name"),
        ..Space::default()
    };

    for reference in children(node, "DeviceInstanceRef") {
        let raw = attr_string(reference, "RefId");
        match CompositeId::decompose_as(&raw, &[FieldKind::Project, FieldKind::DeviceInstance]) {
            Ok(id) => space
                .device_instances
                .push(id.device_instance.unwrap_or_default()),
            Err(_) => debug!("ignoring device reference '{raw}'"),
        }
    }

    for sub_space in children(node, "Space") {
        space.sub_spaces.push(decode_space(sub_space)?);
    }

    Ok(space)
}
