//! Shared roxmltree helpers for the document decoders

use crate::error::{BackendError, Result};
use knxproj_core::SchemaVersion;
use roxmltree::{Document, Node};

/// Resolve the schema revision a parsed document declares.
///
/// The root element's default namespace is the version marker; a missing
/// namespace resolves like an empty one and fails the same way.
///
/// # Errors
///
/// Propagates `SchemaError::Unsupported` for anything outside the known
/// table.
pub(crate) fn document_version(document: &Document<'_>) -> Result<SchemaVersion> {
    let namespace = document
        .root_element()
        .tag_name()
        .namespace()
        .unwrap_or_default();
    Ok(SchemaVersion::resolve(namespace)?)
}

/// First child element with the given local name
pub(crate) fn child<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|candidate| candidate.is_element() && candidate.tag_name().name() == name)
}

/// First child element with the given local name, or a malformed-document
/// error naming the missing element
pub(crate) fn required_child<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Result<Node<'a, 'input>> {
    child(node, name).ok_or_else(|| {
        BackendError::Document(format!(
            "missing element '{name}' under '{}'",
            node.tag_name().name()
        ))
    })
}

/// All child elements with the given local name, in document order
pub(crate) fn children<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Vec<Node<'a, 'input>> {
    node.children()
        .filter(|candidate| candidate.is_element() && candidate.tag_name().name() == name)
        .collect()
}

/// Attribute value, empty string when absent
pub(crate) fn attr_string(node: Node<'_, '_>, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

/// Numeric attribute, zero when absent
pub(crate) fn attr_u16(node: Node<'_, '_>, name: &str) -> Result<u16> {
    match node.attribute(name) {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| {
            BackendError::Document(format!("attribute '{name}' is not a number: '{value}'"))
        }),
    }
}

/// Numeric attribute, zero when absent
pub(crate) fn attr_u32(node: Node<'_, '_>, name: &str) -> Result<u32> {
    match node.attribute(name) {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| {
            BackendError::Document(format!("attribute '{name}' is not a number: '{value}'"))
        }),
    }
}

/// Enabled/Disabled flag attribute, absent reads as disabled
pub(crate) fn attr_flag(node: Node<'_, '_>, name: &str) -> bool {
    node.attribute(name) == Some("Enabled")
}

/// Enabled/Disabled flag attribute, preserving absence
pub(crate) fn attr_flag_opt(node: Node<'_, '_>, name: &str) -> Option<bool> {
    node.attribute(name).map(|value| value == "Enabled")
}

/// String attribute, preserving absence
pub(crate) fn attr_opt(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(ToString::to_string)
}
