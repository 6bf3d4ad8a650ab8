use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use schemata_descriptor::AttributeDescriptor;
use schemata_runtime::{MergeHook, ValidateHook};
use schemata_types::{StorageClass, TypeName};

/// The derived description of one type's model attributes.
///
/// # Invariants
/// - `transitory_names` and `permanent_names` are disjoint.
/// - Their union is exactly `attribute_names`.
/// - Hooks are already resolved along the inheritance chain; the most
///   derived declaration of a hook wins.
#[derive(Clone)]
pub struct TypeSchema {
    type_name: TypeName,
    attribute_names: BTreeSet<String>,
    transitory_names: BTreeSet<String>,
    permanent_names: BTreeSet<String>,
    descriptors: BTreeMap<String, Arc<AttributeDescriptor>>,
    validators: HashMap<String, ValidateHook>,
    mergers: HashMap<String, MergeHook>,
}

impl TypeSchema {
    /// Assemble a schema from classified attributes.
    ///
    /// Attributes classified as [`StorageClass::None`] are dropped from the
    /// name sets but keep their descriptors.
    pub(crate) fn new(
        type_name: TypeName,
        classified: Vec<(String, StorageClass)>,
        descriptors: BTreeMap<String, Arc<AttributeDescriptor>>,
        validators: HashMap<String, ValidateHook>,
        mergers: HashMap<String, MergeHook>,
    ) -> Self {
        let mut attribute_names = BTreeSet::new();
        let mut transitory_names = BTreeSet::new();
        let mut permanent_names = BTreeSet::new();
        for (name, class) in classified {
            match class {
                StorageClass::None => continue,
                StorageClass::Transitory => transitory_names.insert(name.clone()),
                StorageClass::Permanent => permanent_names.insert(name.clone()),
            };
            attribute_names.insert(name);
        }
        Self {
            type_name,
            attribute_names,
            transitory_names,
            permanent_names,
            descriptors,
            validators,
            mergers,
        }
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// Every attribute that is part of the model.
    pub fn attribute_names(&self) -> &BTreeSet<String> {
        &self.attribute_names
    }

    pub fn transitory_names(&self) -> &BTreeSet<String> {
        &self.transitory_names
    }

    pub fn permanent_names(&self) -> &BTreeSet<String> {
        &self.permanent_names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attribute_names.contains(name)
    }

    pub fn storage_class(&self, name: &str) -> StorageClass {
        if self.permanent_names.contains(name) {
            StorageClass::Permanent
        } else if self.transitory_names.contains(name) {
            StorageClass::Transitory
        } else {
            StorageClass::None
        }
    }

    /// Descriptor of the most derived declaration of `name`, for any
    /// declared attribute whose encoding parsed, model attribute or not.
    pub fn descriptor(&self, name: &str) -> Option<&Arc<AttributeDescriptor>> {
        self.descriptors.get(name)
    }

    pub fn validator(&self, name: &str) -> Option<&ValidateHook> {
        self.validators.get(name)
    }

    pub fn merger(&self, name: &str) -> Option<&MergeHook> {
        self.mergers.get(name)
    }
}

impl PartialEq for TypeSchema {
    /// Hooks are closures and cannot be compared; two schemas are equal when
    /// they classify the same attributes the same way.
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.transitory_names == other.transitory_names
            && self.permanent_names == other.permanent_names
            && self.descriptors == other.descriptors
    }
}

impl Eq for TypeSchema {}

impl fmt::Debug for TypeSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut validators: Vec<&String> = self.validators.keys().collect();
        validators.sort();
        let mut mergers: Vec<&String> = self.mergers.keys().collect();
        mergers.sort();
        f.debug_struct("TypeSchema")
            .field("type_name", &self.type_name)
            .field("transitory_names", &self.transitory_names)
            .field("permanent_names", &self.permanent_names)
            .field("validators", &validators)
            .field("mergers", &mergers)
            .finish()
    }
}
