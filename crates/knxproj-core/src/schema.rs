//! Schema dialect resolution
//!
//! Every ETS export document declares the schema revision that produced it
//! through the default namespace of its root element. The revisions are
//! mutually incompatible in structure, so decoding starts by resolving the
//! namespace to a [`SchemaVersion`] and dispatching on it exhaustively.

use crate::error::SchemaError;

/// One historical revision of the project XML vocabulary.
///
/// Resolved from a namespace URI, used to select a decoding strategy, and
/// never persisted. Consumers match this enum without a wildcard arm so a
/// new revision is a compile error at every dispatch site instead of a
/// silent fallthrough to some default dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// ETS 4.0 (`http://knx.org/xml/project/11`)
    V11,
    /// ETS 4.1 (`http://knx.org/xml/project/12`)
    V12,
    /// ETS 4.2 (`http://knx.org/xml/project/13`)
    V13,
    /// ETS 5 (`http://knx.org/xml/project/14`)
    V14,
    /// ETS 5.7 (`http://knx.org/xml/project/20`)
    V20,
    /// ETS 6.0 (`http://knx.org/xml/project/21`)
    V21,
    /// ETS 6.1 (`http://knx.org/xml/project/22`)
    V22,
    /// ETS 6.2 (`http://knx.org/xml/project/23`)
    V23,
}

/// Known namespace URIs in resolution order
const NAMESPACES: [(&str, SchemaVersion); 8] = [
    ("http://knx.org/xml/project/11", SchemaVersion::V11),
    ("http://knx.org/xml/project/12", SchemaVersion::V12),
    ("http://knx.org/xml/project/13", SchemaVersion::V13),
    ("http://knx.org/xml/project/14", SchemaVersion::V14),
    ("http://knx.org/xml/project/20", SchemaVersion::V20),
    ("http://knx.org/xml/project/21", SchemaVersion::V21),
    ("http://knx.org/xml/project/22", SchemaVersion::V22),
    ("http://knx.org/xml/project/23", SchemaVersion::V23),
];

impl SchemaVersion {
    /// Resolve a namespace URI to its schema revision.
    ///
    /// Exact match only. Stateless and safe to call concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Unsupported`] naming the URI for anything
    /// outside the known table; an unrecognized revision is never mapped
    /// to the nearest known one.
    pub fn resolve(namespace: &str) -> Result<Self, SchemaError> {
        NAMESPACES
            .iter()
            .find(|(uri, _)| *uri == namespace)
            .map(|&(_, version)| version)
            .ok_or_else(|| SchemaError::Unsupported {
                namespace: namespace.to_string(),
            })
    }

    /// The namespace URI this revision declares
    #[must_use]
    pub const fn namespace(self) -> &'static str {
        match self {
            Self::V11 => "http://knx.org/xml/project/11",
            Self::V12 => "http://knx.org/xml/project/12",
            Self::V13 => "http://knx.org/xml/project/13",
            Self::V14 => "http://knx.org/xml/project/14",
            Self::V20 => "http://knx.org/xml/project/20",
            Self::V21 => "http://knx.org/xml/project/21",
            Self::V22 => "http://knx.org/xml/project/22",
            Self::V23 => "http://knx.org/xml/project/23",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_versions() {
        assert_eq!(
            SchemaVersion::resolve("http://knx.org/xml/project/11").unwrap(),
            SchemaVersion::V11
        );
        assert_eq!(
            SchemaVersion::resolve("http://knx.org/xml/project/21").unwrap(),
            SchemaVersion::V21
        );
    }

    #[test]
    fn test_resolve_unknown_version_is_an_error() {
        let err = SchemaVersion::resolve("http://knx.org/xml/project/99").unwrap_err();
        match err {
            SchemaError::Unsupported { namespace } => {
                assert_eq!(namespace, "http://knx.org/xml/project/99");
            }
        }
    }

    #[test]
    fn test_resolve_rejects_partial_matches() {
        assert!(SchemaVersion::resolve("http://knx.org/xml/project/1").is_err());
        assert!(SchemaVersion::resolve("http://knx.org/xml/project/11/extra").is_err());
        assert!(SchemaVersion::resolve("").is_err());
    }

    #[test]
    fn test_namespace_round_trip() {
        for (uri, version) in NAMESPACES {
            assert_eq!(version.namespace(), uri);
            assert_eq!(SchemaVersion::resolve(uri).unwrap(), version);
        }
    }
}
