use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("type name must not be empty")]
    EmptyTypeName,

    #[error("invalid type name {name:?}: {reason}")]
    InvalidTypeName { name: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}
