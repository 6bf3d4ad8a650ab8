//! Type signature inspection.

use std::fmt;

use serde::{Deserialize, Serialize};

use schemata_types::Value;

/// Method qualifiers that may prefix a type signature (`const`, `in`,
/// `inout`, `out`, `bycopy`, `byref`, `oneway`).
const QUALIFIERS: &[char] = &['r', 'n', 'N', 'o', 'O', 'R', 'V'];

/// Coarse value category of a type signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodedKind {
    /// An object reference (`@` or `@"ClassName"`).
    Object,
    /// A block (`@?`).
    Block,
    /// A class object (`#`).
    Class,
    /// A selector (`:`).
    Selector,
    /// Any signed or unsigned integer (`c i s l q C I S L Q`).
    Integer,
    /// A C99 bool (`B`).
    Bool,
    /// `f` or `d`.
    Float,
    /// A C string (`*`).
    CString,
    /// `v`.
    Void,
    /// Structs, unions, arrays, pointers, bitfields.
    Other,
    /// An empty signature.
    Unknown,
}

impl EncodedKind {
    fn from_code(code: Option<char>, next: Option<char>) -> Self {
        match code {
            None => Self::Unknown,
            Some('@') if next == Some('?') => Self::Block,
            Some('@') => Self::Object,
            Some('#') => Self::Class,
            Some(':') => Self::Selector,
            Some('c' | 'i' | 's' | 'l' | 'q' | 'C' | 'I' | 'S' | 'L' | 'Q') => Self::Integer,
            Some('B') => Self::Bool,
            Some('f' | 'd') => Self::Float,
            Some('*') => Self::CString,
            Some('v') => Self::Void,
            Some(_) => Self::Other,
        }
    }

    /// Returns `true` for kinds stored by value that can never hold null.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Integer | Self::Bool | Self::Float)
    }

    /// The value a freshly allocated instance holds for this kind.
    pub fn default_value(&self) -> Value {
        match self {
            Self::Integer => Value::Int(0),
            Self::Bool => Value::Bool(false),
            Self::Float => Value::Float(0.0),
            _ => Value::Null,
        }
    }

    /// Whether a slot of this kind can hold `value`.
    ///
    /// Integer slots accept bools and bool slots accept integers, since a
    /// `BOOL` is commonly encoded as a `char`. Float slots accept integers.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Object | Self::Block | Self::Other | Self::Unknown => true,
            Self::Class | Self::Selector | Self::CString => {
                matches!(value, Value::Null | Value::String(_))
            }
            Self::Integer | Self::Bool => matches!(value, Value::Int(_) | Value::Bool(_)),
            Self::Float => matches!(value, Value::Float(_) | Value::Int(_)),
            Self::Void => false,
        }
    }
}

impl fmt::Display for EncodedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Object => "object",
            Self::Block => "block",
            Self::Class => "class",
            Self::Selector => "selector",
            Self::Integer => "integer",
            Self::Bool => "bool",
            Self::Float => "float",
            Self::CString => "c-string",
            Self::Void => "void",
            Self::Other => "other",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A raw type signature, kept verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeEncoding(String);

impl TypeEncoding {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The signature exactly as it appeared in the encoding.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The signature with leading method qualifiers removed.
    pub fn unqualified(&self) -> &str {
        self.0.trim_start_matches(QUALIFIERS)
    }

    /// Coarse value category of the signature.
    pub fn kind(&self) -> EncodedKind {
        let mut chars = self.unqualified().chars();
        let code = chars.next();
        EncodedKind::from_code(code, chars.next())
    }

    /// The concrete class named by an object signature, if any.
    ///
    /// `@"Person"` yields `Person`; `@"NSObject<Coding>"` yields `NSObject`;
    /// `@"<Coding>"`, `@`, and non-object signatures yield `None`.
    pub fn class_name(&self) -> Option<&str> {
        let quoted = self.unqualified().strip_prefix("@\"")?;
        let body = quoted.strip_suffix('"')?;
        let name = body.split('<').next().unwrap_or_default();
        (!name.is_empty()).then_some(name)
    }
}

impl fmt::Display for TypeEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
