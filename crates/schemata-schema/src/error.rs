use schemata_types::TypeName;

/// Errors from schema derivation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The type is not known to the catalog.
    #[error("unknown type: {0}")]
    UnknownType(TypeName),

    /// Walking supertypes from `ty` revisited a type before reaching the root.
    #[error("inheritance cycle detected while walking ancestors of {ty}")]
    InheritanceCycle { ty: TypeName },

    /// The inheritance chain of `ty` exceeds the configured depth limit.
    #[error("inheritance chain of {ty} exceeds {limit} levels")]
    InheritanceTooDeep { ty: TypeName, limit: usize },
}

/// Result alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
