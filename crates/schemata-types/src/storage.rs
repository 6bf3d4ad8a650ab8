use std::fmt;

use serde::{Deserialize, Serialize};

/// How an attribute participates in a type's model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageClass {
    /// Not part of the model. Never read, merged, compared, or snapshotted.
    #[default]
    None,
    /// Read and written like a model attribute, but excluded from equality,
    /// hashing, and identity.
    Transitory,
    /// Fully part of the model.
    Permanent,
}

impl StorageClass {
    /// Returns `true` for every class except [`StorageClass::None`].
    pub fn is_model_attribute(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns `true` if the attribute takes part in equality and hashing.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent)
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Transitory => write!(f, "transitory"),
            Self::Permanent => write!(f, "permanent"),
        }
    }
}
