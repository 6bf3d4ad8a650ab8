use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use schemata_runtime::{Model, TypeCatalog};
use schemata_schema::{SchemaCache, TypeSchema};
use schemata_types::{TypeName, Value};

use crate::config::ReconcilerConfig;
use crate::error::{ReconcileError, ReconcileResult};

/// Generic model operations driven by cached type schemas.
///
/// Every operation looks up the schema of the instance's concrete type, so
/// construction, equality, hashing, snapshots, and copies all agree on the
/// same attribute set.
pub struct ModelReconciler {
    cache: Arc<SchemaCache>,
    config: ReconcilerConfig,
}

impl ModelReconciler {
    /// A lenient reconciler over an existing schema cache.
    pub fn new(cache: Arc<SchemaCache>) -> Self {
        Self::with_config(cache, ReconcilerConfig::default())
    }

    pub fn with_config(cache: Arc<SchemaCache>, config: ReconcilerConfig) -> Self {
        Self { cache, config }
    }

    /// Build a reconciler and its schema cache for `catalog`.
    pub fn from_catalog(catalog: Arc<dyn TypeCatalog>, config: ReconcilerConfig) -> Self {
        let cache = SchemaCache::with_max_depth(catalog, config.max_inheritance_depth);
        Self::with_config(Arc::new(cache), config)
    }

    pub fn cache(&self) -> &Arc<SchemaCache> {
        &self.cache
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// The schema of `ty`.
    pub fn schema(&self, ty: &TypeName) -> ReconcileResult<Arc<TypeSchema>> {
        Ok(self.cache.schema(ty)?)
    }

    fn schema_of(&self, instance: &dyn Model) -> ReconcileResult<Arc<TypeSchema>> {
        self.schema(instance.type_name())
    }

    // -----------------------------------------------------------------------
    // Construction and validation
    // -----------------------------------------------------------------------

    /// Allocate a default instance of `ty` and apply every entry of `values`
    /// through validation.
    ///
    /// A null entry is not written unless its validation hook substitutes a
    /// non-null value. The first failing entry aborts construction and the
    /// partially built instance is dropped.
    pub fn construct_from_map(
        &self,
        ty: &TypeName,
        values: &BTreeMap<String, Value>,
    ) -> ReconcileResult<Box<dyn Model>> {
        let schema = self.schema(ty)?;
        let mut instance = self.cache.catalog().instantiate(ty)?;

        for (name, value) in values {
            if value.is_null() {
                let Some(validate) = schema.validator(name) else {
                    continue;
                };
                let accepted = validate(instance.as_ref(), Value::Null)
                    .map_err(|rejection| validation_error(name, rejection.reason))?;
                if !accepted.is_null() {
                    self.write(instance.as_mut(), name, accepted)?;
                }
                continue;
            }
            self.apply(&schema, instance.as_mut(), name, value.clone(), true)?;
        }

        debug!(ty = %ty, keys = values.len(), "constructed model from map");
        Ok(instance)
    }

    /// Validate `value` for attribute `name` and store the accepted value.
    ///
    /// The value is written when `force_update` is set or when the
    /// validation hook substituted a different value. Returns whether a
    /// write happened.
    pub fn validate_and_set(
        &self,
        instance: &mut dyn Model,
        name: &str,
        value: Value,
        force_update: bool,
    ) -> ReconcileResult<bool> {
        let schema = self.schema_of(instance)?;
        self.apply(&schema, instance, name, value, force_update)
    }

    /// Re-run validation over every model attribute's current value.
    pub fn validate(&self, instance: &mut dyn Model) -> ReconcileResult<()> {
        let schema = self.schema_of(instance)?;
        for name in schema.attribute_names() {
            let current = instance.value(name);
            self.apply(&schema, instance, name, current, false)?;
        }
        Ok(())
    }

    fn apply(
        &self,
        schema: &TypeSchema,
        instance: &mut dyn Model,
        name: &str,
        value: Value,
        force_update: bool,
    ) -> ReconcileResult<bool> {
        let (accepted, substituted) = match schema.validator(name) {
            Some(validate) => {
                let accepted = validate(&*instance, value.clone())
                    .map_err(|rejection| validation_error(name, rejection.reason))?;
                let substituted = accepted != value;
                (accepted, substituted)
            }
            None => (value, false),
        };
        if !(force_update || substituted) {
            return Ok(false);
        }
        self.write(instance, name, accepted)?;
        Ok(true)
    }

    /// Store a value, escalating or converting a runtime refusal according
    /// to the configuration.
    fn write(&self, instance: &mut dyn Model, name: &str, value: Value) -> ReconcileResult<()> {
        let Err(source) = instance.set_value(name, value) else {
            return Ok(());
        };
        if self.config.strict_write_faults {
            panic!(
                "write fault on {}.{name}: {source}",
                instance.type_name()
            );
        }
        warn!(
            ty = %instance.type_name(),
            attribute = name,
            error = %source,
            "write fault"
        );
        Err(ReconcileError::WriteFault {
            name: name.to_string(),
            source,
        })
    }

    // -----------------------------------------------------------------------
    // Merging
    // -----------------------------------------------------------------------

    /// Merge one attribute from `source` into `target`.
    ///
    /// A merge hook on the target's type decides the result and receives
    /// `None` when there is no source. Without a hook the source value is
    /// copied as is, and nothing happens when `source` is `None`.
    pub fn merge_value(
        &self,
        target: &mut dyn Model,
        name: &str,
        source: Option<&dyn Model>,
    ) -> ReconcileResult<()> {
        let schema = self.schema_of(target)?;
        self.merge_with(&schema, target, name, source)
    }

    /// Merge every attribute that both `target` and `source` model.
    pub fn merge_from(&self, target: &mut dyn Model, source: &dyn Model) -> ReconcileResult<()> {
        let target_schema = self.schema_of(target)?;
        let source_schema = self.schema_of(source)?;
        for name in target_schema.attribute_names() {
            if source_schema.contains(name) {
                self.merge_with(&target_schema, target, name, Some(source))?;
            }
        }
        Ok(())
    }

    fn merge_with(
        &self,
        schema: &TypeSchema,
        target: &mut dyn Model,
        name: &str,
        source: Option<&dyn Model>,
    ) -> ReconcileResult<()> {
        if let Some(merge) = schema.merger(name) {
            return Ok(merge(target, source)?);
        }
        match source {
            Some(source) => self.write(target, name, source.value(name)),
            None => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    /// Every transitory and permanent attribute value, nulls included.
    pub fn snapshot(&self, instance: &dyn Model) -> ReconcileResult<BTreeMap<String, Value>> {
        let schema = self.schema_of(instance)?;
        Ok(schema
            .attribute_names()
            .iter()
            .map(|name| (name.clone(), instance.value(name)))
            .collect())
    }

    /// Structural equality over permanent attributes.
    ///
    /// Instances of different types are never equal.
    pub fn equal(&self, a: &dyn Model, b: &dyn Model) -> ReconcileResult<bool> {
        if a.type_name() != b.type_name() {
            return Ok(false);
        }
        let schema = self.schema_of(a)?;
        Ok(schema
            .permanent_names()
            .iter()
            .all(|name| a.value(name) == b.value(name)))
    }

    /// Order-independent hash over permanent attributes, consistent with
    /// [`equal`](Self::equal).
    pub fn hash(&self, instance: &dyn Model) -> ReconcileResult<u64> {
        let schema = self.schema_of(instance)?;
        Ok(schema
            .permanent_names()
            .iter()
            .fold(0, |acc, name| acc ^ instance.value(name).digest()))
    }

    /// A new instance of the same type holding the same snapshot.
    ///
    /// Values are written without validation.
    pub fn copy(&self, instance: &dyn Model) -> ReconcileResult<Box<dyn Model>> {
        let snapshot = self.snapshot(instance)?;
        let mut copy = self.cache.catalog().instantiate(instance.type_name())?;
        for (name, value) in snapshot {
            self.write(copy.as_mut(), &name, value)?;
        }
        Ok(copy)
    }

    /// `<TypeName> {json snapshot}`.
    pub fn describe(&self, instance: &dyn Model) -> ReconcileResult<String> {
        let snapshot = self.snapshot(instance)?;
        let json: serde_json::Map<String, serde_json::Value> = snapshot
            .into_iter()
            .map(|(name, value)| (name, value.to_json()))
            .collect();
        Ok(format!(
            "<{}> {}",
            instance.type_name(),
            serde_json::Value::Object(json)
        ))
    }
}

impl std::fmt::Debug for ModelReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelReconciler")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}

fn validation_error(name: &str, reason: String) -> ReconcileError {
    ReconcileError::Validation {
        name: name.to_string(),
        reason,
    }
}
