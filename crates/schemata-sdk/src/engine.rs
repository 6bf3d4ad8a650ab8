use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use schemata_reconcile::{ModelReconciler, ReconcilerConfig};
use schemata_runtime::{InMemoryCatalog, Model, TypeDefinition};
use schemata_schema::{SchemaCache, TypeSchema};
use schemata_types::{StorageClass, TypeName, Value};

use crate::error::{SdkError, SdkResult};

/// High-level Schemata API over an in-memory catalog.
pub struct Schemata {
    catalog: Arc<InMemoryCatalog>,
    reconciler: ModelReconciler,
}

impl Schemata {
    /// A lenient engine with an empty catalog.
    pub fn new() -> Self {
        Self::with_config(ReconcilerConfig::default())
    }

    pub fn with_config(config: ReconcilerConfig) -> Self {
        Self::with_catalog(Arc::new(InMemoryCatalog::default()), config)
    }

    /// Wrap an existing catalog.
    pub fn with_catalog(catalog: Arc<InMemoryCatalog>, config: ReconcilerConfig) -> Self {
        let reconciler = ModelReconciler::from_catalog(catalog.clone(), config);
        Self {
            catalog,
            reconciler,
        }
    }

    /// Build an engine from a TOML reconciler configuration.
    pub fn from_toml_config(input: &str) -> SdkResult<Self> {
        Ok(Self::with_config(ReconcilerConfig::from_toml_str(input)?))
    }

    pub fn catalog(&self) -> &Arc<InMemoryCatalog> {
        &self.catalog
    }

    pub fn reconciler(&self) -> &ModelReconciler {
        &self.reconciler
    }

    pub fn cache(&self) -> &Arc<SchemaCache> {
        self.reconciler.cache()
    }

    // ---- Types ----

    /// Register a type definition.
    ///
    /// Cached schemas are dropped, since the new type may resolve class
    /// names in descriptors parsed before it existed.
    pub fn register(&self, definition: TypeDefinition) -> SdkResult<()> {
        self.catalog.register(definition)?;
        self.cache().clear();
        Ok(())
    }

    pub fn schema(&self, ty: &str) -> SdkResult<Arc<TypeSchema>> {
        let ty = TypeName::parse(ty)?;
        Ok(self.cache().schema(&ty)?)
    }

    pub fn classify(&self, ty: &str, attribute: &str) -> SdkResult<StorageClass> {
        let ty = TypeName::parse(ty)?;
        Ok(self.cache().classify(&ty, attribute))
    }

    // ---- Instances ----

    pub fn construct(&self, ty: &str, values: &BTreeMap<String, Value>) -> SdkResult<Box<dyn Model>> {
        let ty = TypeName::parse(ty)?;
        Ok(self.reconciler.construct_from_map(&ty, values)?)
    }

    /// Construct an instance from a JSON object.
    pub fn construct_from_json(&self, ty: &str, json: &str) -> SdkResult<Box<dyn Model>> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        let values = match Value::from(parsed) {
            Value::Map(values) => values,
            other => return Err(SdkError::NotAnObject(other.kind_name().to_string())),
        };
        debug!(ty, keys = values.len(), "constructing from json");
        self.construct(ty, &values)
    }

    pub fn validate(&self, instance: &mut dyn Model) -> SdkResult<()> {
        Ok(self.reconciler.validate(instance)?)
    }

    pub fn merge_from(&self, target: &mut dyn Model, source: &dyn Model) -> SdkResult<()> {
        Ok(self.reconciler.merge_from(target, source)?)
    }

    pub fn snapshot(&self, instance: &dyn Model) -> SdkResult<BTreeMap<String, Value>> {
        Ok(self.reconciler.snapshot(instance)?)
    }

    /// The snapshot of `instance` as a JSON object.
    pub fn snapshot_json(&self, instance: &dyn Model) -> SdkResult<serde_json::Value> {
        let snapshot = self.snapshot(instance)?;
        Ok(serde_json::Value::Object(
            snapshot
                .into_iter()
                .map(|(name, value)| (name, value.to_json()))
                .collect(),
        ))
    }

    pub fn equal(&self, a: &dyn Model, b: &dyn Model) -> SdkResult<bool> {
        Ok(self.reconciler.equal(a, b)?)
    }

    pub fn hash(&self, instance: &dyn Model) -> SdkResult<u64> {
        Ok(self.reconciler.hash(instance)?)
    }

    pub fn copy(&self, instance: &dyn Model) -> SdkResult<Box<dyn Model>> {
        Ok(self.reconciler.copy(instance)?)
    }

    pub fn describe(&self, instance: &dyn Model) -> SdkResult<String> {
        Ok(self.reconciler.describe(instance)?)
    }
}

impl Default for Schemata {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Schemata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schemata")
            .field("catalog", &self.catalog)
            .field("reconciler", &self.reconciler)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_reconcile::ReconcileError;
    use schemata_runtime::HookRejection;

    fn engine() -> Schemata {
        let engine = Schemata::new();
        engine
            .register(
                TypeDefinition::builder("Account")
                    .attribute("owner", r#"T@"NSString",C,N,V_owner"#)
                    .attribute("balance", "Tq,N,V_balance")
                    .attribute("active", "TB,N,V_active")
                    .attribute("lastViewed", r#"T@"NSString",C,N,V_lastViewed"#)
                    .attribute("summary", r#"T@"NSString",R,N"#)
                    .transitory("lastViewed")
                    .validator("balance", |_, value| match value.as_int() {
                        Some(b) if b < 0 => Err(HookRejection::new("overdrawn")),
                        _ => Ok(value),
                    })
                    .build(),
            )
            .unwrap();
        engine
    }

    #[test]
    fn end_to_end_json() {
        let engine = engine();
        let account = engine
            .construct_from_json(
                "Account",
                r#"{"owner": "Ada", "balance": 120, "active": true, "lastViewed": null}"#,
            )
            .unwrap();
        let json = engine.snapshot_json(account.as_ref()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "owner": "Ada",
                "balance": 120,
                "active": true,
                "lastViewed": null,
            })
        );
    }

    #[test]
    fn schema_and_classification() {
        let engine = engine();
        let schema = engine.schema("Account").unwrap();
        assert_eq!(schema.storage_class("lastViewed"), StorageClass::Transitory);
        assert_eq!(schema.storage_class("summary"), StorageClass::None);
        assert_eq!(engine.classify("Account", "owner").unwrap(), StorageClass::Permanent);
        assert!(matches!(engine.schema("Bad,Name"), Err(SdkError::Type(_))));
        assert!(matches!(engine.schema("Ghost"), Err(SdkError::Schema(_))));
    }

    #[test]
    fn rejects_non_object_json() {
        let engine = engine();
        assert!(matches!(
            engine.construct_from_json("Account", "[1, 2]"),
            Err(SdkError::NotAnObject(_))
        ));
        assert!(matches!(
            engine.construct_from_json("Account", "{"),
            Err(SdkError::Json(_))
        ));
    }

    #[test]
    fn validation_errors_surface() {
        let engine = engine();
        let err = engine
            .construct_from_json("Account", r#"{"balance": -10}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SdkError::Reconcile(ReconcileError::Validation { ref name, .. }) if name == "balance"
        ));
    }

    #[test]
    fn identity_operations() {
        let engine = engine();
        let a = engine
            .construct_from_json("Account", r#"{"owner": "Ada", "balance": 5, "lastViewed": "mon"}"#)
            .unwrap();
        let mut b = engine
            .construct_from_json("Account", r#"{"owner": "Ada", "balance": 5, "lastViewed": "tue"}"#)
            .unwrap();
        assert!(engine.equal(a.as_ref(), b.as_ref()).unwrap());
        assert_eq!(engine.hash(a.as_ref()).unwrap(), engine.hash(b.as_ref()).unwrap());

        let c = engine.copy(a.as_ref()).unwrap();
        assert_eq!(
            engine.snapshot(c.as_ref()).unwrap(),
            engine.snapshot(a.as_ref()).unwrap()
        );

        let source = engine
            .construct_from_json("Account", r#"{"owner": "Grace", "balance": 9}"#)
            .unwrap();
        engine.merge_from(b.as_mut(), source.as_ref()).unwrap();
        assert_eq!(b.value("owner"), Value::from("Grace"));
        assert_eq!(b.value("balance"), Value::Int(9));
        engine.validate(b.as_mut()).unwrap();

        assert!(engine.describe(a.as_ref()).unwrap().starts_with("<Account> "));
    }

    #[test]
    fn registering_resolves_earlier_class_names() {
        let engine = engine();
        engine
            .register(
                TypeDefinition::builder("Transfer")
                    .attribute("payee", r#"T@"Payee",&,N,V_payee"#)
                    .build(),
            )
            .unwrap();
        let before = engine.schema("Transfer").unwrap();
        assert_eq!(before.descriptor("payee").unwrap().declared_type, None);

        engine
            .register(TypeDefinition::builder("Payee").build())
            .unwrap();
        let after = engine.schema("Transfer").unwrap();
        assert_eq!(
            after.descriptor("payee").unwrap().declared_type,
            Some(TypeName::new("Payee"))
        );
    }

    #[test]
    fn strict_config_from_toml() {
        let engine = Schemata::from_toml_config("strict_write_faults = true").unwrap();
        assert!(engine.reconciler().config().strict_write_faults);
        assert!(Schemata::from_toml_config("max_inheritance_depth = -1").is_err());
    }
}
