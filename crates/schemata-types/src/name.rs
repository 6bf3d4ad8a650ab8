use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Characters that may never appear in a type name. They are all
/// significant inside an encoded attribute string.
const FORBIDDEN_CHARS: &[char] = &[',', '"', '<', '>', ' ', '\t', '\n', '\r'];

/// Identity of a model type.
///
/// Two `TypeName`s are the same type if and only if their strings are equal.
/// The schema cache, the catalog, and every model instance use this as the
/// type key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeName(String);

impl TypeName {
    /// Create a type name without validation.
    ///
    /// Prefer [`Self::parse`] for names that come from untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Parse and validate a type name.
    ///
    /// # Examples
    ///
    /// ```
    /// use schemata_types::TypeName;
    ///
    /// assert!(TypeName::parse("Person").is_ok());
    /// assert!(TypeName::parse("").is_err());
    /// assert!(TypeName::parse("Bad,Name").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self, TypeError> {
        if name.is_empty() {
            return Err(TypeError::EmptyTypeName);
        }
        if let Some(ch) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
            return Err(TypeError::InvalidTypeName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({})", self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
