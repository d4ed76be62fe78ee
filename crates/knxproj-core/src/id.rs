//! Composite identifier parsing and re-encoding
//!
//! ETS export documents embed compound keys in single attribute values:
//! `_`-joined tokens, each tagged with a short prefix read up to the first
//! dash, e.g. `M-0080_A-1012-10-5227-O00C5_O-0_R-1`. A token's dash-joined
//! remainder is part of the value and is never split further
//! (`H-6131.2F20-1` is one hardware token).
//!
//! Two decoding modes cover the dialects found in the wild:
//!
//! - [`CompositeId::decompose`] classifies tokens by their tag prefix.
//!   Works for every tagged identifier family (com objects, products,
//!   application programs) regardless of token count or order.
//! - [`CompositeId::decompose_as`] decodes the prefix-less positional
//!   shapes (`P-0497-0_DI-1` and friends) against a shape the call site
//!   declares. Token count must match the shape exactly.
//!
//! Semantic validation is call-site-scoped: [`CompositeId::require`]
//! checks that the fields a given decoding context needs are present,
//! while unrecognized tokens are preserved in [`CompositeId::extras`]
//! rather than rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IdError;

/// Token separator within a composite identifier string
const TOKEN_DELIMITER: char = '_';

/// Separator between a token's tag prefix and its value
const TAG_DELIMITER: char = '-';

/// The kind of a single field within a composite identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Manufacturer (`M-`)
    Manufacturer,
    /// Application program (`A-`)
    ApplicationProgram,
    /// Module definition (`MD-`)
    Module,
    /// Communication object (`O-`)
    ComObject,
    /// Communication object reference (`R-`)
    ComObjectRef,
    /// Hardware (`H-`)
    Hardware,
    /// Hardware-to-program mapping (`HP-`)
    Hardware2Program,
    /// Product (`P-`)
    Product,
    /// Project scope, positional dialects only
    Project,
    /// Area, positional dialects only
    Area,
    /// Line, positional dialects only
    Line,
    /// Device instance, positional dialects only
    DeviceInstance,
    /// Space (building structure), positional dialects only
    Space,
    /// Group address, positional dialects only
    GroupAddress,
}

impl FieldKind {
    /// Canonical re-encoding order for tagged fields.
    ///
    /// Round trips through `decompose` then `compose` are stable in this
    /// order regardless of the input token order.
    pub const CANONICAL_ORDER: [FieldKind; 8] = [
        FieldKind::Manufacturer,
        FieldKind::ApplicationProgram,
        FieldKind::Module,
        FieldKind::ComObject,
        FieldKind::ComObjectRef,
        FieldKind::Hardware,
        FieldKind::Hardware2Program,
        FieldKind::Product,
    ];

    /// Classify a token's tag prefix into a tagged field kind.
    ///
    /// Positional-only kinds are never returned here: `A-` always reads as
    /// an application program and `P-` as a product in prefix mode. The
    /// positional kinds are reachable only through a declared shape.
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "M" => Some(Self::Manufacturer),
            "A" => Some(Self::ApplicationProgram),
            "MD" => Some(Self::Module),
            "O" => Some(Self::ComObject),
            "R" => Some(Self::ComObjectRef),
            "H" => Some(Self::Hardware),
            "HP" => Some(Self::Hardware2Program),
            "P" => Some(Self::Product),
            _ => None,
        }
    }

    /// Tag prefixes accepted for this kind in positional shapes
    fn accepted_tags(self) -> &'static [&'static str] {
        match self {
            Self::Manufacturer => &["M"],
            Self::ApplicationProgram => &["A"],
            Self::Module => &["MD"],
            Self::ComObject => &["O"],
            Self::ComObjectRef => &["R"],
            Self::Hardware => &["H"],
            Self::Hardware2Program => &["HP"],
            Self::Product | Self::Project => &["P"],
            Self::Area => &["A"],
            Self::Line => &["L"],
            Self::DeviceInstance => &["DI"],
            // Building parts in every observed revision; plain spaces in
            // drafts of the newer vocabulary.
            Self::Space => &["BP", "S"],
            Self::GroupAddress => &["GA"],
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Manufacturer => "Manufacturer",
            Self::ApplicationProgram => "ApplicationProgram",
            Self::Module => "Module",
            Self::ComObject => "ComObject",
            Self::ComObjectRef => "ComObjectRef",
            Self::Hardware => "Hardware",
            Self::Hardware2Program => "Hardware2Program",
            Self::Product => "Product",
            Self::Project => "Project",
            Self::Area => "Area",
            Self::Line => "Line",
            Self::DeviceInstance => "DeviceInstance",
            Self::Space => "Space",
            Self::GroupAddress => "GroupAddress",
        };
        f.write_str(name)
    }
}

/// The tag prefix of a token: everything up to the first dash.
///
/// A token without a dash is all tag; such tokens never classify.
fn token_tag(token: &str) -> &str {
    token.split(TAG_DELIMITER).next().unwrap_or(token)
}

macro_rules! id_types {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// The identifier as its raw token, tag prefix included
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    )+};
}

id_types! {
    /// Manufacturer identifier, e.g. `M-0080`
    ManufacturerId,
    /// Application program identifier, e.g. `A-1012-10-5227-O00C5`
    ApplicationProgramId,
    /// Module definition identifier, e.g. `MD-2`
    ModuleId,
    /// Communication object identifier, e.g. `O-0`
    ComObjectId,
    /// Communication object reference identifier, e.g. `R-1`
    ComObjectRefId,
    /// Hardware identifier, e.g. `H-6131.2F20-1`
    HardwareId,
    /// Hardware-to-program identifier, e.g. `HP-3120-32-269B`
    Hardware2ProgramId,
    /// Product identifier, e.g. `P-6131.2F20`
    ProductId,
    /// Project identifier, e.g. `P-0497-0`
    ProjectId,
    /// Area identifier, e.g. `A-1`
    AreaId,
    /// Line identifier, e.g. `L-2`
    LineId,
    /// Device instance identifier, e.g. `DI-1`
    DeviceInstanceId,
    /// Space identifier, e.g. `BP-4`
    SpaceId,
    /// Group address identifier, e.g. `GA-1`
    GroupAddressId,
}

/// The decoded form of exactly one composite identifier string.
///
/// Fields absent in the source string stay `None`; an absent field is
/// distinct from an empty one, and a populated field always holds the
/// whole token including its tag prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeId {
    /// The source string this record was decoded from
    pub raw: String,
    pub manufacturer: Option<ManufacturerId>,
    pub application_program: Option<ApplicationProgramId>,
    pub module: Option<ModuleId>,
    pub com_object: Option<ComObjectId>,
    pub com_object_ref: Option<ComObjectRefId>,
    pub hardware: Option<HardwareId>,
    pub hardware2_program: Option<Hardware2ProgramId>,
    pub product: Option<ProductId>,
    pub project: Option<ProjectId>,
    pub area: Option<AreaId>,
    pub line: Option<LineId>,
    pub device_instance: Option<DeviceInstanceId>,
    pub space: Option<SpaceId>,
    pub group_address: Option<GroupAddressId>,
    /// Tokens with an unrecognized tag prefix, preserved verbatim in
    /// input order. Unknown components are data, not errors.
    pub extras: Vec<String>,
}

impl CompositeId {
    /// Decompose a tagged identifier string by prefix classification.
    ///
    /// The structural split always succeeds: recognized tokens populate
    /// their field, everything else lands in [`extras`](Self::extras).
    /// Duplicate tags keep the first occurrence in the field and push
    /// later ones to `extras`, so re-decoding a composed string assigns
    /// fields identically.
    #[must_use]
    pub fn decompose(raw: &str) -> Self {
        let mut id = Self {
            raw: raw.to_string(),
            ..Self::default()
        };

        for token in raw.split(TOKEN_DELIMITER).filter(|t| !t.is_empty()) {
            match FieldKind::from_tag(token_tag(token)) {
                Some(kind) if id.get(kind).is_none() => id.set(kind, token),
                _ => id.extras.push(token.to_string()),
            }
        }

        id
    }

    /// Decompose a positional identifier string against a declared shape.
    ///
    /// The prefix-less dialects reuse the same textual form for different
    /// field sequences, so the call site states which kind sits at which
    /// position. Token count must equal the shape length and every token
    /// must carry a tag its kind accepts.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Invalid`] with the raw string and the
    /// unsatisfiable kinds on arity mismatch or tag mismatch.
    pub fn decompose_as(raw: &str, shape: &[FieldKind]) -> Result<Self, IdError> {
        let tokens: Vec<&str> = raw.split(TOKEN_DELIMITER).collect();
        if tokens.len() != shape.len() {
            return Err(IdError::Invalid {
                raw: raw.to_string(),
                missing: shape.to_vec(),
            });
        }

        let mut id = Self {
            raw: raw.to_string(),
            ..Self::default()
        };

        for (&kind, token) in shape.iter().zip(tokens) {
            let tag_ok = kind.accepted_tags().contains(&token_tag(token));
            if token.is_empty() || !tag_ok {
                return Err(IdError::Invalid {
                    raw: raw.to_string(),
                    missing: vec![kind],
                });
            }
            id.set(kind, token);
        }

        Ok(id)
    }

    /// Check that every one of the given field kinds is populated.
    ///
    /// This is the semantic half of the two-tier contract: the structural
    /// split never fails, and each decoding context declares the subset
    /// it needs.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Invalid`] listing every missing kind, with the
    /// source string verbatim.
    pub fn require(&self, kinds: &[FieldKind]) -> Result<(), IdError> {
        let missing: Vec<FieldKind> = kinds
            .iter()
            .copied()
            .filter(|&kind| self.get(kind).is_none())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(IdError::Invalid {
                raw: self.raw.clone(),
                missing,
            })
        }
    }

    /// Re-encode the populated tagged fields.
    ///
    /// Emits exactly the set fields, `_`-joined in canonical order
    /// ([`FieldKind::CANONICAL_ORDER`]), followed by preserved extras.
    /// Composing the decomposition of a composed string is the identity.
    #[must_use]
    pub fn compose(&self) -> String {
        let mut tokens: Vec<&str> = FieldKind::CANONICAL_ORDER
            .iter()
            .filter_map(|&kind| self.get(kind))
            .collect();
        tokens.extend(self.extras.iter().map(String::as_str));
        tokens.join("_")
    }

    /// Re-encode through a positional shape.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Invalid`] if any kind of the shape is unset.
    pub fn compose_as(&self, shape: &[FieldKind]) -> Result<String, IdError> {
        self.require(shape)?;
        let tokens: Vec<&str> = shape.iter().filter_map(|&kind| self.get(kind)).collect();
        Ok(tokens.join("_"))
    }

    /// The raw token stored for a field kind, if populated
    #[must_use]
    pub fn get(&self, kind: FieldKind) -> Option<&str> {
        match kind {
            FieldKind::Manufacturer => self.manufacturer.as_ref().map(ManufacturerId::as_str),
            FieldKind::ApplicationProgram => self
                .application_program
                .as_ref()
                .map(ApplicationProgramId::as_str),
            FieldKind::Module => self.module.as_ref().map(ModuleId::as_str),
            FieldKind::ComObject => self.com_object.as_ref().map(ComObjectId::as_str),
            FieldKind::ComObjectRef => self.com_object_ref.as_ref().map(ComObjectRefId::as_str),
            FieldKind::Hardware => self.hardware.as_ref().map(HardwareId::as_str),
            FieldKind::Hardware2Program => self
                .hardware2_program
                .as_ref()
                .map(Hardware2ProgramId::as_str),
            FieldKind::Product => self.product.as_ref().map(ProductId::as_str),
            FieldKind::Project => self.project.as_ref().map(ProjectId::as_str),
            FieldKind::Area => self.area.as_ref().map(AreaId::as_str),
            FieldKind::Line => self.line.as_ref().map(LineId::as_str),
            FieldKind::DeviceInstance => {
                self.device_instance.as_ref().map(DeviceInstanceId::as_str)
            }
            FieldKind::Space => self.space.as_ref().map(SpaceId::as_str),
            FieldKind::GroupAddress => self.group_address.as_ref().map(GroupAddressId::as_str),
        }
    }

    fn set(&mut self, kind: FieldKind, token: &str) {
        match kind {
            FieldKind::Manufacturer => self.manufacturer = Some(token.into()),
            FieldKind::ApplicationProgram => self.application_program = Some(token.into()),
            FieldKind::Module => self.module = Some(token.into()),
            FieldKind::ComObject => self.com_object = Some(token.into()),
            FieldKind::ComObjectRef => self.com_object_ref = Some(token.into()),
            FieldKind::Hardware => self.hardware = Some(token.into()),
            FieldKind::Hardware2Program => self.hardware2_program = Some(token.into()),
            FieldKind::Product => self.product = Some(token.into()),
            FieldKind::Project => self.project = Some(token.into()),
            FieldKind::Area => self.area = Some(token.into()),
            FieldKind::Line => self.line = Some(token.into()),
            FieldKind::DeviceInstance => self.device_instance = Some(token.into()),
            FieldKind::Space => self.space = Some(token.into()),
            FieldKind::GroupAddress => self.group_address = Some(token.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_com_object_ref() {
        let id = CompositeId::decompose("M-0080_A-1012-10-5227-O00C5_O-0_R-1");

        assert_eq!(id.manufacturer, Some("M-0080".into()));
        assert_eq!(
            id.application_program,
            Some("A-1012-10-5227-O00C5".into())
        );
        assert_eq!(id.com_object, Some("O-0".into()));
        assert_eq!(id.com_object_ref, Some("R-1".into()));
        assert_eq!(id.module, None);
        assert!(id.extras.is_empty());
    }

    #[test]
    fn test_decompose_short_instance_ref() {
        // The two-token form of the same family decodes with the same call
        let id = CompositeId::decompose("O-10_R-1");
        id.require(&[FieldKind::ComObject, FieldKind::ComObjectRef])
            .expect("both kinds present");
        assert_eq!(id.manufacturer, None);
    }

    #[test]
    fn test_decompose_keeps_dash_joined_token_whole() {
        let id = CompositeId::decompose("M-0080_H-6131.2F20-1_P-6131.2F20");
        assert_eq!(id.hardware, Some("H-6131.2F20-1".into()));
        assert_eq!(id.product, Some("P-6131.2F20".into()));
    }

    #[test]
    fn test_decompose_preserves_unknown_tokens() {
        let id = CompositeId::decompose("M-0080_ZZ-9_O-1");
        assert_eq!(id.extras, vec!["ZZ-9".to_string()]);
        assert_eq!(id.com_object, Some("O-1".into()));
    }

    #[test]
    fn test_require_reports_missing_kinds() {
        let id = CompositeId::decompose("M-0080_O-3");
        let err = id
            .require(&[FieldKind::ApplicationProgram, FieldKind::ComObject])
            .unwrap_err();

        match err {
            IdError::Invalid { raw, missing } => {
                assert_eq!(raw, "M-0080_O-3");
                assert_eq!(missing, vec![FieldKind::ApplicationProgram]);
            }
        }
    }

    #[test]
    fn test_compose_is_canonical_and_idempotent() {
        let shuffled = "R-1_O-0_A-1012-10-5227-O00C5_M-0080";
        let once = CompositeId::decompose(shuffled).compose();
        assert_eq!(once, "M-0080_A-1012-10-5227-O00C5_O-0_R-1");

        let twice = CompositeId::decompose(&once).compose();
        assert_eq!(twice, once);
    }

    #[test]
    fn test_compose_partial_subset() {
        let id = CompositeId::decompose("A-0019-21-D29E_M-0083");
        assert_eq!(id.compose(), "M-0083_A-0019-21-D29E");
    }

    #[test]
    fn test_positional_device_instance() {
        let id = CompositeId::decompose_as(
            "P-0497-0_DI-1",
            &[FieldKind::Project, FieldKind::DeviceInstance],
        )
        .expect("two-token scoped shape");

        assert_eq!(id.project, Some("P-0497-0".into()));
        assert_eq!(id.device_instance, Some("DI-1".into()));
    }

    #[test]
    fn test_positional_arity_mismatch() {
        let err = CompositeId::decompose_as(
            "P-0497-0_DI-1_X-3",
            &[FieldKind::Project, FieldKind::DeviceInstance],
        )
        .unwrap_err();

        match err {
            IdError::Invalid { raw, .. } => assert_eq!(raw, "P-0497-0_DI-1_X-3"),
        }
    }

    #[test]
    fn test_positional_tag_mismatch() {
        // A group address token where a device instance is declared
        let err = CompositeId::decompose_as(
            "P-0497-0_GA-1",
            &[FieldKind::Project, FieldKind::DeviceInstance],
        )
        .unwrap_err();

        match err {
            IdError::Invalid { missing, .. } => {
                assert_eq!(missing, vec![FieldKind::DeviceInstance]);
            }
        }
    }

    #[test]
    fn test_positional_space_accepts_building_part_tag() {
        let id = CompositeId::decompose_as("P-0497-0_BP-7", &[FieldKind::Project, FieldKind::Space])
            .expect("building part token");
        assert_eq!(id.space, Some("BP-7".into()));
    }

    #[test]
    fn test_positional_single_token() {
        let id = CompositeId::decompose_as("A-1", &[FieldKind::Area]).expect("bare area id");
        assert_eq!(id.area, Some("A-1".into()));
    }

    #[test]
    fn test_compose_as_round_trip() {
        let raw = "P-0497-0_GA-12";
        let shape = [FieldKind::Project, FieldKind::GroupAddress];
        let id = CompositeId::decompose_as(raw, &shape).expect("scoped shape");
        assert_eq!(id.compose_as(&shape).expect("both set"), raw);
    }

    #[test]
    fn test_hardware2_program_prefix() {
        let id = CompositeId::decompose("M-0007_H-6131.2F20-1_HP-3120-32-269B");
        id.require(&[FieldKind::Hardware2Program])
            .expect("hp token classified");
        assert_eq!(id.hardware2_program, Some("HP-3120-32-269B".into()));
    }

    #[test]
    fn test_empty_string_decomposes_to_unset() {
        let id = CompositeId::decompose("");
        assert_eq!(id, CompositeId::default());
        assert!(id.require(&[]).is_ok());
    }
}
