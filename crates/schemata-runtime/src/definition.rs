//! Fluent builder API for type definitions.

use std::collections::BTreeSet;
use std::sync::Arc;

use schemata_types::{StorageClass, TypeName, Value};

use crate::catalog::AttributeHandle;
use crate::error::RuntimeResult;
use crate::hooks::{HookRejection, TypeHooks};
use crate::model::Model;

/// Declaration of one model type for the in-memory runtime.
#[derive(Clone, Debug)]
pub struct TypeDefinition {
    pub name: TypeName,
    /// `None` means "directly below the root type".
    pub supertype: Option<TypeName>,
    /// Own attributes in declaration order.
    pub attributes: Vec<AttributeHandle>,
    /// Accessors implemented by hand, beyond those synthesized for backed
    /// attributes.
    pub selectors: BTreeSet<String>,
    pub hooks: TypeHooks,
}

impl TypeDefinition {
    /// Start building a definition for `name`.
    pub fn builder(name: impl Into<TypeName>) -> TypeDefinitionBuilder {
        TypeDefinitionBuilder::new(name)
    }
}

/// Builder for [`TypeDefinition`].
///
/// ```
/// use schemata_runtime::{HookRejection, TypeDefinition};
/// use schemata_types::{StorageClass, Value};
///
/// let person = TypeDefinition::builder("Person")
///     .attribute("name", r#"T@"NSString",C,N,V_name"#)
///     .attribute("age", "Tq,N,V_age")
///     .attribute("cachedGreeting", r#"T@"NSString",C,N,V_cachedGreeting"#)
///     .storage("cachedGreeting", StorageClass::Transitory)
///     .validator("age", |_, value| match value.as_int() {
///         Some(age) if age < 0 => Err(HookRejection::new("age must not be negative")),
///         _ => Ok(value),
///     })
///     .build();
/// assert_eq!(person.attributes.len(), 3);
/// ```
#[derive(Debug)]
pub struct TypeDefinitionBuilder {
    definition: TypeDefinition,
}

impl TypeDefinitionBuilder {
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            definition: TypeDefinition {
                name: name.into(),
                supertype: None,
                attributes: Vec::new(),
                selectors: BTreeSet::new(),
                hooks: TypeHooks::default(),
            },
        }
    }

    /// Set the direct supertype.
    pub fn extends(mut self, supertype: impl Into<TypeName>) -> Self {
        self.definition.supertype = Some(supertype.into());
        self
    }

    /// Declare an attribute with its raw encoding.
    pub fn attribute(mut self, name: impl Into<String>, encoding: impl Into<String>) -> Self {
        self.definition
            .attributes
            .push(AttributeHandle::new(name, encoding));
        self
    }

    /// Mark an accessor selector as implemented.
    pub fn implements(mut self, selector: impl Into<String>) -> Self {
        self.definition.selectors.insert(selector.into());
        self
    }

    /// Register a validation hook for `name`.
    pub fn validator<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&dyn Model, Value) -> Result<Value, HookRejection> + Send + Sync + 'static,
    {
        self.definition
            .hooks
            .validators
            .insert(name.into(), Arc::new(hook));
        self
    }

    /// Register a merge hook for `name`.
    pub fn merger<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&mut dyn Model, Option<&dyn Model>) -> RuntimeResult<()> + Send + Sync + 'static,
    {
        self.definition
            .hooks
            .mergers
            .insert(name.into(), Arc::new(hook));
        self
    }

    /// Override the storage class of `name` for this type and its subtypes.
    pub fn storage(mut self, name: impl Into<String>, class: StorageClass) -> Self {
        self.definition
            .hooks
            .storage_overrides
            .insert(name.into(), class);
        self
    }

    /// Shorthand for `storage(name, StorageClass::Transitory)`.
    pub fn transitory(self, name: impl Into<String>) -> Self {
        self.storage(name, StorageClass::Transitory)
    }

    pub fn build(self) -> TypeDefinition {
        self.definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_declarations_in_order() {
        let def = TypeDefinition::builder("Employee")
            .extends("Person")
            .attribute("employer", r#"T@"Company",&,N,V_employer"#)
            .attribute("salary", "Td,N,V_salary")
            .implements("displayName")
            .transitory("salary")
            .build();
        assert_eq!(def.name, TypeName::new("Employee"));
        assert_eq!(def.supertype, Some(TypeName::new("Person")));
        let names: Vec<&str> = def.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["employer", "salary"]);
        assert!(def.selectors.contains("displayName"));
        assert_eq!(
            def.hooks.storage_overrides.get("salary"),
            Some(&StorageClass::Transitory)
        );
    }

    #[test]
    fn default_supertype_is_none() {
        let def = TypeDefinition::builder("Thing").build();
        assert!(def.supertype.is_none());
        assert!(def.hooks.is_empty());
    }

    #[test]
    fn hooks_are_registered_by_name() {
        let def = TypeDefinition::builder("Thing")
            .validator("name", |_, value| Ok(value))
            .merger("name", |_, _| Ok(()))
            .build();
        assert!(def.hooks.validators.contains_key("name"));
        assert!(def.hooks.mergers.contains_key("name"));
    }
}
