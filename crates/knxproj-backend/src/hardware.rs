//! Manufacturer-side document decoding
//!
//! Manufacturer directories carry two document kinds: the hardware
//! catalog (`Hardware.xml`: hardware entries, orderable products,
//! hardware-to-program mappings, translations) and per-program data
//! files (`M-xxxx_A-yyyy.xml`: application programs with their
//! communication object tables).

use crate::error::{BackendError, Result};
use crate::model::{
    ApplicationProgram, ComObject, ComObjectRef, Hardware, Hardware2Program, HardwareData,
    Language, LanguageId, ManufacturerData, Product, Translation,
};
use crate::xml::{
    attr_flag, attr_flag_opt, attr_opt, attr_string, attr_u32, child, children, document_version,
    required_child,
};
use knxproj_core::{CompositeId, FieldKind, ManufacturerId, SchemaError, SchemaVersion};
use roxmltree::{Document, Node};

/// Decode a `Hardware.xml` catalog document.
///
/// The hardware vocabulary exists in revisions 11 through 13 and 20;
/// later revisions moved this data elsewhere, and a document claiming
/// one of them is unsupported for this kind.
///
/// # Errors
///
/// Fails on malformed XML, a namespace outside the supported set for
/// hardware documents, or an identifier violating its required shape.
pub fn decode_hardware_data(text: &str) -> Result<HardwareData> {
    let document = Document::parse(text)?;
    let version = document_version(&document)?;

    match version {
        SchemaVersion::V11 | SchemaVersion::V12 | SchemaVersion::V13 | SchemaVersion::V20 => {}
        SchemaVersion::V14
        | SchemaVersion::V21
        | SchemaVersion::V22
        | SchemaVersion::V23 => {
            return Err(BackendError::Schema(SchemaError::Unsupported {
                namespace: version.namespace().to_string(),
            }))
        }
    }

    let manufacturer_node = manufacturer_element(&document)?;
    let mut data = HardwareData {
        manufacturer: ManufacturerId(attr_string(manufacturer_node, "RefId")),
        ..HardwareData::default()
    };

    if let Some(wrapper) = child(manufacturer_node, "Hardware") {
        for node in children(wrapper, "Hardware") {
            data.hardware.push(decode_hardware(node)?);
        }
    }

    if let Some(wrapper) = child(manufacturer_node, "Languages") {
        for node in children(wrapper, "Language") {
            data.languages.push(decode_language(node)?);
        }
    }

    Ok(data)
}

/// Decode a manufacturer data document (`M-xxxx_A-yyyy.xml`).
///
/// One mapping serves every known revision.
///
/// # Errors
///
/// Fails on malformed XML, an unsupported namespace, or an identifier
/// violating its required shape.
pub fn decode_manufacturer_data(text: &str) -> Result<ManufacturerData> {
    let document = Document::parse(text)?;
    document_version(&document)?;

    let manufacturer_node = manufacturer_element(&document)?;
    let mut data = ManufacturerData {
        manufacturer: ManufacturerId(attr_string(manufacturer_node, "RefId")),
        programs: Vec::new(),
    };

    if let Some(wrapper) = child(manufacturer_node, "ApplicationPrograms") {
        for node in children(wrapper, "ApplicationProgram") {
            data.programs.push(decode_application_program(node)?);
        }
    }

    Ok(data)
}

fn manufacturer_element<'a, 'input>(
    document: &'a Document<'input>,
) -> Result<Node<'a, 'input>> {
    let data = required_child(document.root_element(), "ManufacturerData")?;
    required_child(data, "Manufacturer")
}

fn decode_hardware(node: Node<'_, '_>) -> Result<Hardware> {
    let raw = attr_string(node, "Id");
    let decomposed = CompositeId::decompose(&raw);
    decomposed.require(&[FieldKind::Hardware])?;

    let mut hardware = Hardware {
        id: decomposed.hardware.unwrap_or_default(),
        name: attr_string(node, "Name"),
        ..Hardware::default()
    };

    if let Some(wrapper) = child(node, "Products") {
        for product in children(wrapper, "Product") {
            hardware.products.push(decode_product(product)?);
        }
    }

    if let Some(wrapper) = child(node, "Hardware2Programs") {
        for mapping in children(wrapper, "Hardware2Program") {
            hardware.hardware2_programs.push(decode_mapping(mapping)?);
        }
    }

    Ok(hardware)
}

fn decode_product(node: Node<'_, '_>) -> Result<Product> {
    let raw = attr_string(node, "Id");
    let decomposed = CompositeId::decompose(&raw);
    decomposed.require(&[
        FieldKind::Manufacturer,
        FieldKind::Hardware,
        FieldKind::Product,
    ])?;

    Ok(Product {
        id: decomposed.product.unwrap_or_default(),
        manufacturer: decomposed.manufacturer,
        hardware: decomposed.hardware,
        text: attr_string(node, "Text"),
    })
}

fn decode_mapping(node: Node<'_, '_>) -> Result<Hardware2Program> {
    let raw = attr_string(node, "Id");
    let decomposed = CompositeId::decompose(&raw);
    decomposed.require(&[FieldKind::Hardware2Program])?;

    let application_program = child(node, "ApplicationProgramRef")
        .map(|reference| attr_string(reference, "RefId"))
        .and_then(|raw| CompositeId::decompose(&raw).application_program);

    Ok(Hardware2Program {
        id: decomposed.hardware2_program.unwrap_or_default(),
        manufacturer: decomposed.manufacturer,
        hardware: decomposed.hardware,
        application_program,
    })
}

fn decode_language(node: Node<'_, '_>) -> Result<Language> {
    let mut language = Language {
        id: LanguageId(attr_string(node, "Identifier")),
        translations: Vec::new(),
    };

    for unit in children(node, "TranslationUnit") {
        let raw = attr_string(unit, "RefId");
        let decomposed = CompositeId::decompose(&raw);
        decomposed.require(&[
            FieldKind::Manufacturer,
            FieldKind::Hardware,
            FieldKind::Product,
        ])?;

        let text = child(unit, "TranslationElement")
            .and_then(|element| child(element, "Translation"))
            .map(|translation| attr_string(translation, "Text"))
            .unwrap_or_default();

        language.translations.push(Translation {
            manufacturer: decomposed.manufacturer,
            hardware: decomposed.hardware,
            product: decomposed.product,
            text,
        });
    }

    Ok(language)
}

fn decode_application_program(node: Node<'_, '_>) -> Result<ApplicationProgram> {
    let raw = attr_string(node, "Id");
    let decomposed = CompositeId::decompose(&raw);
    decomposed.require(&[FieldKind::Manufacturer, FieldKind::ApplicationProgram])?;

    let mut program = ApplicationProgram {
        id: decomposed.application_program.unwrap_or_default(),
        manufacturer: decomposed.manufacturer,
        name: attr_string(node, "Name"),
        version: attr_u32(node, "ApplicationVersion")?,
        ..ApplicationProgram::default()
    };

    if let Some(static_node) = child(node, "Static") {
        if let Some(table) = child(static_node, "ComObjectTable") {
            for object in children(table, "ComObject") {
                program.com_objects.push(decode_com_object(object)?);
            }
        }
        if let Some(refs) = child(static_node, "ComObjectRefs") {
            for reference in children(refs, "ComObjectRef") {
                program.com_object_refs.push(decode_com_object_ref(reference)?);
            }
        }
    }

    Ok(program)
}

fn decode_com_object(node: Node<'_, '_>) -> Result<ComObject> {
    let raw = attr_string(node, "Id");
    let decomposed = CompositeId::decompose(&raw);
    decomposed.require(&[
        FieldKind::Manufacturer,
        FieldKind::ApplicationProgram,
        FieldKind::ComObject,
    ])?;

    Ok(ComObject {
        id: decomposed.com_object.unwrap_or_default(),
        manufacturer: decomposed.manufacturer,
        application_program: decomposed.application_program,
        name: attr_string(node, "Name"),
        text: attr_string(node, "Text"),
        description: attr_string(node, "Description"),
        function_text: attr_string(node, "FunctionText"),
        object_size: attr_string(node, "ObjectSize"),
        datapoint_type: attr_string(node, "DatapointType"),
        priority: attr_string(node, "Priority"),
        read_flag: attr_flag(node, "ReadFlag"),
        write_flag: attr_flag(node, "WriteFlag"),
        communication_flag: attr_flag(node, "CommunicationFlag"),
        transmit_flag: attr_flag(node, "TransmitFlag"),
        update_flag: attr_flag(node, "UpdateFlag"),
        read_on_init_flag: attr_flag(node, "ReadOnInitFlag"),
    })
}

fn decode_com_object_ref(node: Node<'_, '_>) -> Result<ComObjectRef> {
    let raw = attr_string(node, "Id");
    let decomposed = CompositeId::decompose(&raw);
    decomposed.require(&[
        FieldKind::Manufacturer,
        FieldKind::ApplicationProgram,
        FieldKind::ComObject,
        FieldKind::ComObjectRef,
    ])?;

    Ok(ComObjectRef {
        id: decomposed.com_object_ref.unwrap_or_default(),
        manufacturer: decomposed.manufacturer,
        application_program: decomposed.application_program,
        com_object: decomposed.com_object,
        name: attr_opt(node, "Name"),
        text: attr_opt(node, "Text"),
        description: attr_opt(node, "Description"),
        function_text: attr_opt(node, "FunctionText"),
        object_size: attr_opt(node, "ObjectSize"),
        datapoint_type: attr_opt(node, "DatapointType"),
        priority: attr_opt(node, "Priority"),
        read_flag: attr_flag_opt(node, "ReadFlag"),
        write_flag: attr_flag_opt(node, "WriteFlag"),
        communication_flag: attr_flag_opt(node, "CommunicationFlag"),
        transmit_flag: attr_flag_opt(node, "TransmitFlag"),
        update_flag: attr_flag_opt(node, "UpdateFlag"),
        read_on_init_flag: attr_flag_opt(node, "ReadOnInitFlag"),
    })
}
