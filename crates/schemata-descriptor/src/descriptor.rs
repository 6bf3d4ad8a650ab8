use serde::{Deserialize, Serialize};
use tracing::debug;

use schemata_types::TypeName;

use crate::accessor::{default_getter, default_setter};
use crate::encoding::TypeEncoding;
use crate::error::{ParseError, ParseResult};
use crate::resolver::TypeResolver;

/// Memory management policy declared for an attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryPolicy {
    /// The value is assigned without ownership.
    #[default]
    Assign,
    /// The value is retained (shared ownership).
    RetainShared,
    /// The value is copied on assignment.
    Copy,
}

/// Structured description of one declared attribute.
///
/// Produced once per encoding and immutable afterwards.
///
/// # Invariants
/// - `is_read_only` implies `memory_policy == MemoryPolicy::Assign`.
/// - `getter` and `setter` are always populated. For a read-only attribute
///   `setter` is the name the setter would have.
/// - `backing_storage` is `None` for computed and dynamic attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub name: String,
    pub is_read_only: bool,
    pub is_non_atomic: bool,
    pub is_weak_reference: bool,
    pub is_garbage_collectible: bool,
    pub is_dynamic: bool,
    pub memory_policy: MemoryPolicy,
    pub getter: String,
    pub setter: String,
    pub backing_storage: Option<String>,
    pub declared_type: Option<TypeName>,
    pub type_encoding: TypeEncoding,
}

impl AttributeDescriptor {
    /// Parse the encoding of attribute `name`.
    ///
    /// An empty encoding yields a descriptor with every flag cleared and an
    /// empty type signature. Unknown flag tokens are skipped.
    ///
    /// # Errors
    /// - [`ParseError::MissingTypeSignature`] if the first token is not a `T` token.
    /// - [`ParseError::UnterminatedTypeName`] if a quoted class name never closes.
    /// - [`ParseError::UnterminatedToken`] if `G` or `S` has no name.
    /// - [`ParseError::OldStyleTypeEncoding`] for a `t` token.
    pub fn parse(name: &str, raw: &str, resolver: &dyn TypeResolver) -> ParseResult<Self> {
        let mut desc = Self::bare(name);
        if raw.is_empty() {
            return Ok(desc);
        }

        let (signature, rest) = split_signature(raw)?;
        desc.type_encoding = TypeEncoding::new(signature);
        if let Some(class_name) = desc.type_encoding.class_name() {
            desc.declared_type = resolver.resolve_type(class_name);
            if desc.declared_type.is_none() {
                debug!(attribute = name, class = class_name, "declared class not resolved");
            }
        }

        let mut getter = None;
        let mut setter = None;

        for token in rest.split(',') {
            let mut chars = token.chars();
            let Some(flag) = chars.next() else {
                continue;
            };
            let argument = chars.as_str();
            match flag {
                'R' => desc.is_read_only = true,
                'N' => desc.is_non_atomic = true,
                'W' => desc.is_weak_reference = true,
                'P' => desc.is_garbage_collectible = true,
                'D' => desc.is_dynamic = true,
                'C' => desc.memory_policy = MemoryPolicy::Copy,
                '&' => desc.memory_policy = MemoryPolicy::RetainShared,
                'G' => getter = Some(required_argument(flag, argument)?),
                'S' => setter = Some(required_argument(flag, argument)?),
                'V' => {
                    desc.backing_storage = (!argument.is_empty()).then(|| argument.to_string());
                }
                't' => return Err(ParseError::OldStyleTypeEncoding),
                _ => debug!(attribute = name, token, "skipping unrecognized attribute token"),
            }
        }

        if let Some(getter) = getter {
            desc.getter = getter;
        }
        if let Some(setter) = setter {
            desc.setter = setter;
        }
        if desc.is_read_only {
            desc.memory_policy = MemoryPolicy::Assign;
        }
        Ok(desc)
    }

    fn bare(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_read_only: false,
            is_non_atomic: false,
            is_weak_reference: false,
            is_garbage_collectible: false,
            is_dynamic: false,
            memory_policy: MemoryPolicy::Assign,
            getter: default_getter(name),
            setter: default_setter(name),
            backing_storage: None,
            declared_type: None,
            type_encoding: TypeEncoding::default(),
        }
    }

    /// Returns `true` if a concrete storage slot backs this attribute.
    pub fn has_backing_storage(&self) -> bool {
        self.backing_storage.is_some()
    }
}

/// Split off the leading `T` token. Commas inside a quoted class name do
/// not end the signature.
fn split_signature(raw: &str) -> ParseResult<(&str, &str)> {
    let mut chars = raw.char_indices();
    match chars.next() {
        Some((_, 'T')) => {}
        Some((_, 't')) => return Err(ParseError::OldStyleTypeEncoding),
        Some((_, found)) => return Err(ParseError::MissingTypeSignature { found }),
        None => return Ok(("", "")),
    }

    let mut in_quotes = false;
    for (index, ch) in chars {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return Ok((&raw[1..index], &raw[index + 1..])),
            _ => {}
        }
    }
    if in_quotes {
        return Err(ParseError::UnterminatedTypeName {
            signature: raw[1..].to_string(),
        });
    }
    Ok((&raw[1..], ""))
}

fn required_argument(flag: char, argument: &str) -> ParseResult<String> {
    if argument.is_empty() {
        return Err(ParseError::UnterminatedToken { flag });
    }
    Ok(argument.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::NoTypeResolver;
    use proptest::prelude::*;

    fn known_types(name: &str) -> Option<TypeName> {
        matches!(name, "Person" | "NSString").then(|| TypeName::new(name))
    }

    fn parse(name: &str, raw: &str) -> ParseResult<AttributeDescriptor> {
        AttributeDescriptor::parse(name, raw, &known_types)
    }

    // -----------------------------------------------------------------------
    // Well-formed encodings
    // -----------------------------------------------------------------------

    #[test]
    fn retained_nonatomic_object() {
        let desc = parse("name", r#"T@"Person",&,N,Vname"#).unwrap();
        assert_eq!(desc.type_encoding.as_str(), "@\"Person\"");
        assert!(!desc.is_weak_reference);
        assert!(!desc.is_read_only);
        assert!(desc.is_non_atomic);
        assert_eq!(desc.memory_policy, MemoryPolicy::RetainShared);
        assert_eq!(desc.backing_storage.as_deref(), Some("name"));
        assert_eq!(desc.getter, "name");
        assert_eq!(desc.setter, "setName:");
        assert_eq!(desc.declared_type, Some(TypeName::new("Person")));
    }

    #[test]
    fn copy_policy() {
        let desc = parse("title", r#"T@"NSString",C,N,V_title"#).unwrap();
        assert_eq!(desc.memory_policy, MemoryPolicy::Copy);
        assert_eq!(desc.backing_storage.as_deref(), Some("_title"));
    }

    #[test]
    fn scalar_defaults_to_assign() {
        let desc = parse("count", "Tq,N,V_count").unwrap();
        assert_eq!(desc.type_encoding.as_str(), "q");
        assert_eq!(desc.memory_policy, MemoryPolicy::Assign);
        assert!(desc.declared_type.is_none());
    }

    #[test]
    fn custom_accessors() {
        let desc = parse("enabled", "TB,N,GisEnabled,SmakeEnabled:,V_enabled").unwrap();
        assert_eq!(desc.getter, "isEnabled");
        assert_eq!(desc.setter, "makeEnabled:");
    }

    #[test]
    fn read_only_still_reports_setter_name() {
        let desc = parse("identifier", "T@,R,N").unwrap();
        assert!(desc.is_read_only);
        assert_eq!(desc.setter, "setIdentifier:");
        assert!(desc.backing_storage.is_none());
    }

    #[test]
    fn read_only_forces_assign() {
        let desc = parse("items", r#"T@"NSArray",R,C,N,V_items"#).unwrap();
        assert!(desc.is_read_only);
        assert_eq!(desc.memory_policy, MemoryPolicy::Assign);
    }

    #[test]
    fn dynamic_weak_collectible() {
        let desc = parse("delegate", "T@,W,P,D").unwrap();
        assert!(desc.is_weak_reference);
        assert!(desc.is_garbage_collectible);
        assert!(desc.is_dynamic);
        assert!(!desc.has_backing_storage());
    }

    #[test]
    fn unresolved_class_is_not_an_error() {
        let desc = parse("pet", r#"T@"Unicorn",&,V_pet"#).unwrap();
        assert!(desc.declared_type.is_none());
        assert_eq!(desc.type_encoding.class_name(), Some("Unicorn"));
    }

    #[test]
    fn untyped_object_has_no_declared_type() {
        let desc = parse("payload", "T@,&,V_payload").unwrap();
        assert!(desc.declared_type.is_none());
    }

    #[test]
    fn protocol_qualified_class_resolves_base_name() {
        let desc = parse("owner", r#"T@"Person<Coding>",&,V_owner"#).unwrap();
        assert_eq!(desc.declared_type, Some(TypeName::new("Person")));
    }

    #[test]
    fn struct_signature_kept_verbatim() {
        let desc = parse("origin", "T{CGPoint=dd},N,V_origin").unwrap();
        assert_eq!(desc.type_encoding.as_str(), "{CGPoint=dd}");
    }

    #[test]
    fn signature_only() {
        let desc = parse("x", "Ti").unwrap();
        assert_eq!(desc.type_encoding.as_str(), "i");
        assert!(!desc.is_read_only);
    }

    #[test]
    fn empty_encoding_yields_defaults() {
        let desc = parse("x", "").unwrap();
        assert_eq!(desc.type_encoding.as_str(), "");
        assert_eq!(desc.getter, "x");
        assert_eq!(desc.setter, "setX:");
    }

    #[test]
    fn empty_ivar_means_no_storage() {
        let desc = parse("x", "Ti,V").unwrap();
        assert!(desc.backing_storage.is_none());
    }

    // -----------------------------------------------------------------------
    // Forward compatibility
    // -----------------------------------------------------------------------

    #[test]
    fn unknown_tokens_are_skipped() {
        let desc = parse("name", r#"T@"NSString",?,Z42,C,,N,V_name"#).unwrap();
        assert_eq!(desc.memory_policy, MemoryPolicy::Copy);
        assert!(desc.is_non_atomic);
        assert_eq!(desc.backing_storage.as_deref(), Some("_name"));
    }

    // -----------------------------------------------------------------------
    // Malformed encodings
    // -----------------------------------------------------------------------

    #[test]
    fn missing_type_signature() {
        assert_eq!(
            parse("x", "R,N"),
            Err(ParseError::MissingTypeSignature { found: 'R' })
        );
    }

    #[test]
    fn unterminated_class_name() {
        assert!(matches!(
            parse("x", r#"T@"Person,&,N"#),
            Err(ParseError::UnterminatedTypeName { .. })
        ));
    }

    #[test]
    fn getter_without_name() {
        assert_eq!(
            parse("x", "T@,G,N"),
            Err(ParseError::UnterminatedToken { flag: 'G' })
        );
        assert_eq!(
            parse("x", "T@,S"),
            Err(ParseError::UnterminatedToken { flag: 'S' })
        );
    }

    #[test]
    fn old_style_encoding() {
        assert_eq!(parse("x", "ti"), Err(ParseError::OldStyleTypeEncoding));
        assert_eq!(parse("x", "Ti,tfoo"), Err(ParseError::OldStyleTypeEncoding));
    }

    #[test]
    fn works_without_resolver() {
        let desc = AttributeDescriptor::parse("owner", r#"T@"Person",&"#, &NoTypeResolver).unwrap();
        assert!(desc.declared_type.is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let desc = parse("name", r#"T@"Person",&,N,Vname"#).unwrap();
        let json = serde_json::to_string(&desc).unwrap();
        let back: AttributeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, desc);
    }

    proptest! {
        #[test]
        fn never_panics(raw in ".{0,40}") {
            let _ = parse("p", &raw);
        }

        #[test]
        fn read_only_always_assign(flags in proptest::collection::vec(
            prop_oneof![
                Just("R"), Just("C"), Just("&"), Just("N"), Just("W"), Just("D"), Just("P"),
                Just("Gget"), Just("Sset:"), Just("V_ivar"), Just("X"),
            ],
            0..8,
        )) {
            let raw = std::iter::once("T@").chain(flags.iter().copied()).collect::<Vec<_>>().join(",");
            let desc = parse("p", &raw).unwrap();
            if desc.is_read_only {
                prop_assert_eq!(desc.memory_policy, MemoryPolicy::Assign);
            }
            prop_assert!(!desc.getter.is_empty());
            prop_assert!(!desc.setter.is_empty());
        }
    }
}
