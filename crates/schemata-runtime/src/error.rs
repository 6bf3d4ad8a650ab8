use schemata_types::TypeName;

/// Errors raised by the host object model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// The type is not registered in the catalog.
    #[error("unknown type: {0}")]
    UnknownType(TypeName),

    /// A type with this name is already registered.
    #[error("type already registered: {0}")]
    DuplicateType(TypeName),

    /// A type names a supertype that is not registered.
    #[error("type {ty} extends unknown supertype {supertype}")]
    UnknownSupertype { ty: TypeName, supertype: TypeName },

    /// The attribute is not declared anywhere in the type's chain.
    #[error("{ty} has no attribute named {name:?}")]
    UndefinedAttribute { ty: TypeName, name: String },

    /// The attribute has neither a setter nor backing storage.
    #[error("attribute {name:?} of {ty} is read-only")]
    ReadOnlyAttribute { ty: TypeName, name: String },

    /// The value does not fit the attribute's declared type signature.
    #[error("attribute {name:?} expects {expected}, got {got}")]
    TypeMismatch {
        name: String,
        expected: String,
        got: String,
    },
}

/// Result alias for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
