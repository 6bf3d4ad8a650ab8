use schemata_descriptor::TypeResolver;
use schemata_types::TypeName;

use crate::error::RuntimeResult;
use crate::hooks::TypeHooks;
use crate::model::Model;

/// One attribute as declared on a type: its name and raw encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeHandle {
    pub name: String,
    pub encoding: String,
}

impl AttributeHandle {
    pub fn new(name: impl Into<String>, encoding: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            encoding: encoding.into(),
        }
    }
}

/// The type-level half of the host object model.
///
/// Implementations must satisfy these invariants:
/// - `declared_attributes` returns only a type's *own* declarations, in
///   declaration order. Inherited attributes come from walking `supertype`.
/// - `supertype` of the root type is `None`.
/// - `responds_to` answers for the type and everything it inherits.
/// - `hooks` returns only hooks declared directly on the type.
pub trait TypeCatalog: Send + Sync {
    /// The root model type. It declares no model attributes of its own.
    fn root_type(&self) -> &TypeName;

    /// Whether the type is known.
    fn contains_type(&self, ty: &TypeName) -> bool;

    /// Direct supertype, or `None` for the root or an unknown type.
    fn supertype(&self, ty: &TypeName) -> Option<TypeName>;

    /// Attributes declared directly on `ty`.
    fn declared_attributes(&self, ty: &TypeName) -> Vec<AttributeHandle>;

    /// Whether instances of `ty` implement the accessor `selector`.
    fn responds_to(&self, ty: &TypeName, selector: &str) -> bool;

    /// Hooks declared directly on `ty`.
    fn hooks(&self, ty: &TypeName) -> TypeHooks;

    /// Resolve a class name appearing in a type signature.
    fn resolve_type(&self, name: &str) -> Option<TypeName>;

    /// Allocate a default instance of `ty`.
    fn instantiate(&self, ty: &TypeName) -> RuntimeResult<Box<dyn Model>>;
}

/// Adapts a catalog to the descriptor parser's [`TypeResolver`].
pub struct CatalogResolver<'a>(pub &'a dyn TypeCatalog);

impl TypeResolver for CatalogResolver<'_> {
    fn resolve_type(&self, name: &str) -> Option<TypeName> {
        self.0.resolve_type(name)
    }
}
