//! Dynamically typed attribute values.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A value read from or written to a model attribute.
///
/// `Null` is the null marker: an unset object attribute reads as `Null`, and
/// a `Null` entry in an input map means "no value".
///
/// Floats compare and hash by bit pattern, so `Value` can implement `Eq` and
/// `Hash` consistently. `Int(1)` and `Float(1.0)` are different values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

// Tags for the canonical byte stream fed to the fingerprint hasher.
const TAG_NULL: u8 = 0x00;
const TAG_BOOL: u8 = 0x01;
const TAG_INT: u8 = 0x02;
const TAG_FLOAT: u8 = 0x03;
const TAG_STRING: u8 = 0x04;
const TAG_BYTES: u8 = 0x05;
const TAG_LIST: u8 = 0x06;
const TAG_MAP: u8 = 0x07;

impl Value {
    /// Returns `true` for the null marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short human-readable name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// BLAKE3 fingerprint of the value's canonical encoding.
    ///
    /// Equal values always produce equal fingerprints.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        self.write_canonical(&mut hasher);
        *hasher.finalize().as_bytes()
    }

    /// The first eight bytes of [`Self::fingerprint`] as an integer.
    pub fn digest(&self) -> u64 {
        let fingerprint = self.fingerprint();
        let mut head = [0u8; 8];
        head.copy_from_slice(&fingerprint[..8]);
        u64::from_le_bytes(head)
    }

    fn write_canonical(&self, hasher: &mut blake3::Hasher) {
        match self {
            Self::Null => {
                hasher.update(&[TAG_NULL]);
            }
            Self::Bool(v) => {
                hasher.update(&[TAG_BOOL, u8::from(*v)]);
            }
            Self::Int(v) => {
                hasher.update(&[TAG_INT]);
                hasher.update(&v.to_le_bytes());
            }
            Self::Float(v) => {
                hasher.update(&[TAG_FLOAT]);
                hasher.update(&v.to_bits().to_le_bytes());
            }
            Self::String(v) => {
                hasher.update(&[TAG_STRING]);
                write_len(hasher, v.len());
                hasher.update(v.as_bytes());
            }
            Self::Bytes(v) => {
                hasher.update(&[TAG_BYTES]);
                write_len(hasher, v.len());
                hasher.update(v);
            }
            Self::List(items) => {
                hasher.update(&[TAG_LIST]);
                write_len(hasher, items.len());
                for item in items {
                    item.write_canonical(hasher);
                }
            }
            Self::Map(entries) => {
                hasher.update(&[TAG_MAP]);
                write_len(hasher, entries.len());
                for (key, value) in entries {
                    write_len(hasher, key.len());
                    hasher.update(key.as_bytes());
                    value.write_canonical(hasher);
                }
            }
        }
    }

    /// Convert to a JSON value.
    ///
    /// Bytes become an array of numbers. Non-finite floats become `null`
    /// because JSON cannot represent them.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(v) => serde_json::Value::Bool(*v),
            Self::Int(v) => serde_json::Value::from(*v),
            Self::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(v) => serde_json::Value::String(v.clone()),
            Self::Bytes(v) => {
                serde_json::Value::Array(v.iter().map(|b| serde_json::Value::from(*b)).collect())
            }
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Parse a JSON document into a value.
    pub fn from_json_str(json: &str) -> Result<Self, TypeError> {
        let parsed: serde_json::Value =
            serde_json::from_str(json).map_err(|e| TypeError::Serialization(e.to_string()))?;
        Ok(Self::from(parsed))
    }
}

fn write_len(hasher: &mut blake3::Hasher, len: usize) {
    hasher.update(&(len as u64).to_le_bytes());
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(v) => v.hash(state),
            Self::Int(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::String(v) => v.hash(state),
            Self::Bytes(v) => v.hash(state),
            Self::List(v) => v.hash(state),
            Self::Map(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(v) => Self::Bool(v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(v) => Self::String(v),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}
