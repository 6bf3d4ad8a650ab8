use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use schemata_descriptor::{AttributeDescriptor, NoTypeResolver};
use schemata_types::TypeName;

use crate::catalog::{AttributeHandle, TypeCatalog};
use crate::definition::TypeDefinition;
use crate::dynamic::{DynamicModel, ModelLayout, Slot};
use crate::error::{RuntimeError, RuntimeResult};
use crate::hooks::TypeHooks;
use crate::model::Model;

/// Name of the root type of a catalog created with [`InMemoryCatalog::default`].
pub const DEFAULT_ROOT_TYPE: &str = "Model";

/// A registered type together with what the runtime derived from it.
#[derive(Debug)]
struct RegisteredType {
    definition: TypeDefinition,
    /// Own attributes whose encodings parsed.
    descriptors: Vec<AttributeDescriptor>,
    /// Explicit selectors plus accessors provided for backed and dynamic
    /// attributes.
    selectors: BTreeSet<String>,
}

impl RegisteredType {
    fn new(definition: TypeDefinition) -> Self {
        let mut descriptors = Vec::with_capacity(definition.attributes.len());
        let mut selectors = definition.selectors.clone();
        for handle in &definition.attributes {
            // Declared class names are irrelevant here; only accessors and
            // storage matter for instance layout.
            match AttributeDescriptor::parse(&handle.name, &handle.encoding, &NoTypeResolver) {
                Ok(desc) => {
                    // A dynamic attribute promises its accessors are supplied
                    // at run time; this runtime supplies them itself.
                    if desc.has_backing_storage() || desc.is_dynamic {
                        selectors.insert(desc.getter.clone());
                        if !desc.is_read_only {
                            selectors.insert(desc.setter.clone());
                        }
                    }
                    descriptors.push(desc);
                }
                Err(e) => warn!(
                    ty = %definition.name,
                    attribute = %handle.name,
                    error = %e,
                    "attribute encoding does not parse; attribute has no instance slot"
                ),
            }
        }
        Self {
            definition,
            descriptors,
            selectors,
        }
    }
}

/// In-memory, `HashMap`-based type catalog.
///
/// Types are registered once and never change afterwards. A supertype must
/// be registered before its subtypes, so inheritance chains are always
/// finite and acyclic.
pub struct InMemoryCatalog {
    root: TypeName,
    types: RwLock<HashMap<TypeName, Arc<RegisteredType>>>,
    layouts: RwLock<HashMap<TypeName, Arc<ModelLayout>>>,
}

impl InMemoryCatalog {
    /// Create a catalog whose root type is `root`.
    pub fn new(root: impl Into<TypeName>) -> Self {
        let root = root.into();
        let mut types = HashMap::new();
        let definition = TypeDefinition::builder(root.clone()).build();
        types.insert(root.clone(), Arc::new(RegisteredType::new(definition)));
        Self {
            root,
            types: RwLock::new(types),
            layouts: RwLock::new(HashMap::new()),
        }
    }

    /// Register a type.
    ///
    /// A definition without a supertype is placed directly below the root.
    pub fn register(&self, mut definition: TypeDefinition) -> RuntimeResult<()> {
        let supertype = definition
            .supertype
            .get_or_insert_with(|| self.root.clone())
            .clone();

        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        if types.contains_key(&definition.name) {
            return Err(RuntimeError::DuplicateType(definition.name));
        }
        if !types.contains_key(&supertype) {
            return Err(RuntimeError::UnknownSupertype {
                ty: definition.name,
                supertype,
            });
        }
        debug!(
            ty = %definition.name,
            supertype = %supertype,
            attributes = definition.attributes.len(),
            "registered type"
        );
        let name = definition.name.clone();
        types.insert(name, Arc::new(RegisteredType::new(definition)));
        Ok(())
    }

    /// Number of registered types, including the root.
    pub fn len(&self) -> usize {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Always `false`: the root type is registered on construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn get(&self, ty: &TypeName) -> Option<Arc<RegisteredType>> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
            .cloned()
    }

    /// `ty` followed by its ancestors, ending with the root.
    fn chain(&self, ty: &TypeName) -> Vec<Arc<RegisteredType>> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        let mut chain = Vec::new();
        let mut current = types.get(ty).cloned();
        while let Some(registered) = current {
            current = registered
                .definition
                .supertype
                .as_ref()
                .and_then(|sup| types.get(sup).cloned());
            chain.push(registered);
        }
        chain
    }

    /// The flattened attribute table for instances of `ty`.
    pub fn layout(&self, ty: &TypeName) -> RuntimeResult<Arc<ModelLayout>> {
        if let Some(layout) = self
            .layouts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
        {
            return Ok(Arc::clone(layout));
        }

        let chain = self.chain(ty);
        if chain.is_empty() {
            return Err(RuntimeError::UnknownType(ty.clone()));
        }
        let mut slots = BTreeMap::new();
        for registered in &chain {
            for desc in &registered.descriptors {
                if slots.contains_key(&desc.name) {
                    continue;
                }
                let writable = desc.has_backing_storage() || self.responds_to(ty, &desc.setter);
                slots.insert(
                    desc.name.clone(),
                    Slot {
                        kind: desc.type_encoding.kind(),
                        writable,
                    },
                );
            }
        }
        let layout = Arc::new(ModelLayout {
            type_name: ty.clone(),
            slots,
        });
        self.layouts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ty.clone(), Arc::clone(&layout));
        Ok(layout)
    }

    /// Allocate a default [`DynamicModel`] of `ty`.
    pub fn instantiate_dynamic(&self, ty: &TypeName) -> RuntimeResult<DynamicModel> {
        Ok(DynamicModel::new(self.layout(ty)?))
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_TYPE)
    }
}

impl TypeCatalog for InMemoryCatalog {
    fn root_type(&self) -> &TypeName {
        &self.root
    }

    fn contains_type(&self, ty: &TypeName) -> bool {
        self.get(ty).is_some()
    }

    fn supertype(&self, ty: &TypeName) -> Option<TypeName> {
        self.get(ty)?.definition.supertype.clone()
    }

    fn declared_attributes(&self, ty: &TypeName) -> Vec<AttributeHandle> {
        self.get(ty)
            .map(|registered| registered.definition.attributes.clone())
            .unwrap_or_default()
    }

    fn responds_to(&self, ty: &TypeName, selector: &str) -> bool {
        self.chain(ty)
            .iter()
            .any(|registered| registered.selectors.contains(selector))
    }

    fn hooks(&self, ty: &TypeName) -> TypeHooks {
        self.get(ty)
            .map(|registered| registered.definition.hooks.clone())
            .unwrap_or_default()
    }

    fn resolve_type(&self, name: &str) -> Option<TypeName> {
        let candidate = TypeName::new(name);
        self.contains_type(&candidate).then_some(candidate)
    }

    fn instantiate(&self, ty: &TypeName) -> RuntimeResult<Box<dyn Model>> {
        Ok(Box::new(self.instantiate_dynamic(ty)?))
    }
}

impl std::fmt::Debug for InMemoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCatalog")
            .field("root", &self.root)
            .field("type_count", &self.len())
            .finish()
    }
}
