use schemata_types::TypeName;

/// Resolves a class name found in a type signature to a known type.
///
/// Implemented by the host runtime's catalog. Returning `None` is not an
/// error: the descriptor simply has no `declared_type`.
pub trait TypeResolver {
    fn resolve_type(&self, name: &str) -> Option<TypeName>;
}

/// A resolver that knows no types.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTypeResolver;

impl TypeResolver for NoTypeResolver {
    fn resolve_type(&self, _name: &str) -> Option<TypeName> {
        None
    }
}

impl<F> TypeResolver for F
where
    F: Fn(&str) -> Option<TypeName>,
{
    fn resolve_type(&self, name: &str) -> Option<TypeName> {
        self(name)
    }
}
