use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use schemata_descriptor::AttributeDescriptor;
use schemata_runtime::{AttributeHandle, CatalogResolver, TypeCatalog};
use schemata_types::{StorageClass, TypeName};

use crate::error::{SchemaError, SchemaResult};
use crate::schema::TypeSchema;

/// Default bound on how many supertypes are walked from any type.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parsed descriptors keyed by (declaring type, attribute name). `None`
/// records an encoding that failed to parse, so it is reported only once.
type DescriptorMap = HashMap<(TypeName, String), Option<Arc<AttributeDescriptor>>>;

/// Lazily built, memoized schemas for every type of one catalog.
///
/// Declared class names are resolved against the catalog when a descriptor
/// is first parsed. A class registered later is not picked up until
/// [`clear`](Self::clear) is called.
pub struct SchemaCache {
    catalog: Arc<dyn TypeCatalog>,
    max_depth: usize,
    descriptors: RwLock<DescriptorMap>,
    schemas: RwLock<HashMap<TypeName, Arc<TypeSchema>>>,
}

impl SchemaCache {
    pub fn new(catalog: Arc<dyn TypeCatalog>) -> Self {
        Self::with_max_depth(catalog, DEFAULT_MAX_DEPTH)
    }

    /// Create a cache that refuses inheritance chains deeper than `max_depth`.
    pub fn with_max_depth(catalog: Arc<dyn TypeCatalog>, max_depth: usize) -> Self {
        Self {
            catalog,
            max_depth,
            descriptors: RwLock::new(HashMap::new()),
            schemas: RwLock::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &Arc<dyn TypeCatalog> {
        &self.catalog
    }

    // -----------------------------------------------------------------------
    // Schemas
    // -----------------------------------------------------------------------

    /// The schema of `ty`, built on first request.
    pub fn schema(&self, ty: &TypeName) -> SchemaResult<Arc<TypeSchema>> {
        if let Some(schema) = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
        {
            return Ok(Arc::clone(schema));
        }

        let schema = Arc::new(self.build_schema(ty)?);
        debug!(
            ty = %ty,
            permanent = schema.permanent_names().len(),
            transitory = schema.transitory_names().len(),
            "built schema"
        );
        // A concurrent builder may have inserted an equivalent schema in the
        // meantime; overwriting it is harmless.
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ty.clone(), Arc::clone(&schema));
        Ok(schema)
    }

    fn build_schema(&self, ty: &TypeName) -> SchemaResult<TypeSchema> {
        let ancestry = self.ancestry(ty)?;

        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for declaring in &ancestry {
            for handle in self.catalog.declared_attributes(declaring) {
                if seen.insert(handle.name.clone()) {
                    names.push(handle.name);
                }
            }
        }

        let mut classified = Vec::with_capacity(names.len());
        let mut descriptors = BTreeMap::new();
        for name in names {
            if let Some(desc) = self.descriptor(ty, &name) {
                descriptors.insert(name.clone(), desc);
            }
            let class = self.classify(ty, &name);
            classified.push((name, class));
        }

        // Root first, so that hooks declared closer to `ty` overwrite
        // inherited ones.
        let mut validators = HashMap::new();
        let mut mergers = HashMap::new();
        for declaring in self.lineage(ty).iter().rev() {
            let hooks = self.catalog.hooks(declaring);
            validators.extend(hooks.validators);
            mergers.extend(hooks.mergers);
        }

        Ok(TypeSchema::new(
            ty.clone(),
            classified,
            descriptors,
            validators,
            mergers,
        ))
    }

    /// Drop the cached schema of `ty`. Returns `true` if one was cached.
    pub fn invalidate(&self, ty: &TypeName) -> bool {
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(ty)
            .is_some()
    }

    /// Drop every cached schema and descriptor.
    pub fn clear(&self) {
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.descriptors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached schemas.
    pub fn len(&self) -> usize {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    /// Storage class of attribute `name` as seen from type `ty`.
    ///
    /// Unknown types and undeclared names classify as `None`.
    pub fn classify(&self, ty: &TypeName, name: &str) -> StorageClass {
        self.classify_at(ty, name, 0)
    }

    fn classify_at(&self, ty: &TypeName, name: &str, depth: usize) -> StorageClass {
        if depth > self.max_depth {
            warn!(ty = %ty, attribute = name, limit = self.max_depth, "classification exceeded inheritance depth");
            return StorageClass::None;
        }
        if let Some(class) = self.storage_override(ty, name) {
            return class;
        }
        let Some(desc) = self.descriptor(ty, name) else {
            return StorageClass::None;
        };

        let has_storage = desc.has_backing_storage();
        let has_getter = self.catalog.responds_to(ty, &desc.getter);
        let has_setter = self.catalog.responds_to(ty, &desc.setter);
        if !(desc.is_dynamic || has_storage || has_getter || has_setter) {
            return StorageClass::None;
        }

        if desc.is_read_only && !has_storage {
            if ty == self.catalog.root_type() {
                return StorageClass::None;
            }
            return match self.catalog.supertype(ty) {
                Some(supertype) => self.classify_at(&supertype, name, depth + 1),
                None => StorageClass::None,
            };
        }

        StorageClass::Permanent
    }

    /// The nearest storage override for `name` on `ty` or an ancestor.
    fn storage_override(&self, ty: &TypeName, name: &str) -> Option<StorageClass> {
        self.lineage(ty)
            .iter()
            .find_map(|t| self.catalog.hooks(t).storage_overrides.get(name).copied())
    }

    // -----------------------------------------------------------------------
    // Descriptors
    // -----------------------------------------------------------------------

    /// Descriptor of the most derived declaration of `name` visible from `ty`.
    pub fn descriptor(&self, ty: &TypeName, name: &str) -> Option<Arc<AttributeDescriptor>> {
        self.lineage(ty).iter().find_map(|declaring| {
            self.catalog
                .declared_attributes(declaring)
                .into_iter()
                .find(|handle| handle.name == name)
                .map(|handle| self.declared_descriptor(declaring, &handle))
        })?
    }

    fn declared_descriptor(
        &self,
        declaring: &TypeName,
        handle: &AttributeHandle,
    ) -> Option<Arc<AttributeDescriptor>> {
        let key = (declaring.clone(), handle.name.clone());
        if let Some(cached) = self
            .descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return cached.clone();
        }

        let resolver = CatalogResolver(self.catalog.as_ref());
        let parsed = match AttributeDescriptor::parse(&handle.name, &handle.encoding, &resolver) {
            Ok(desc) => Some(Arc::new(desc)),
            Err(e) => {
                warn!(
                    ty = %declaring,
                    attribute = %handle.name,
                    encoding = %handle.encoding,
                    error = %e,
                    "skipping attribute with malformed encoding"
                );
                None
            }
        };
        self.descriptors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, parsed.clone());
        parsed
    }

    // -----------------------------------------------------------------------
    // Inheritance walking
    // -----------------------------------------------------------------------

    /// `ty` and its ancestors, excluding the root. Errors on cycles, on
    /// over-deep chains, and on unknown types.
    fn ancestry(&self, ty: &TypeName) -> SchemaResult<Vec<TypeName>> {
        if !self.catalog.contains_type(ty) {
            return Err(SchemaError::UnknownType(ty.clone()));
        }
        let root = self.catalog.root_type();
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(ty.clone());
        while let Some(cur) = current {
            if &cur == root {
                break;
            }
            if !visited.insert(cur.clone()) {
                return Err(SchemaError::InheritanceCycle { ty: ty.clone() });
            }
            if chain.len() >= self.max_depth {
                return Err(SchemaError::InheritanceTooDeep {
                    ty: ty.clone(),
                    limit: self.max_depth,
                });
            }
            current = self.catalog.supertype(&cur);
            chain.push(cur);
        }
        Ok(chain)
    }

    /// `ty` and every ancestor including the root. Stops quietly at a cycle
    /// or at the depth limit.
    fn lineage(&self, ty: &TypeName) -> Vec<TypeName> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(ty.clone());
        while let Some(cur) = current {
            if chain.len() > self.max_depth || !visited.insert(cur.clone()) {
                warn!(ty = %ty, "ancestor walk stopped at cycle or depth limit");
                break;
            }
            current = self.catalog.supertype(&cur);
            chain.push(cur);
        }
        chain
    }
}

impl std::fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCache")
            .field("root", self.catalog.root_type())
            .field("max_depth", &self.max_depth)
            .field("cached_schemas", &self.len())
            .finish()
    }
}
