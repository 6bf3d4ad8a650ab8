//! Per-attribute hooks a type may supply.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use schemata_types::{StorageClass, Value};

use crate::error::RuntimeResult;
use crate::model::Model;

/// A validation hook vetoed a proposed value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct HookRejection {
    pub reason: String,
}

impl HookRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Validates a proposed value for one attribute.
///
/// Returns the accepted value, which may be a substitute for the proposal,
/// or a [`HookRejection`].
pub type ValidateHook =
    Arc<dyn Fn(&dyn Model, Value) -> Result<Value, HookRejection> + Send + Sync>;

/// Merges one attribute from a source instance into the target.
///
/// The source is `None` when there is nothing to merge from. The hook writes
/// the resulting value itself through [`Model::set_value`].
pub type MergeHook =
    Arc<dyn Fn(&mut dyn Model, Option<&dyn Model>) -> RuntimeResult<()> + Send + Sync>;

/// Hooks declared directly on one type, keyed by attribute name.
///
/// Subtypes inherit hooks they do not redeclare; resolution along the
/// inheritance chain happens when a schema is built.
#[derive(Clone, Default)]
pub struct TypeHooks {
    pub validators: HashMap<String, ValidateHook>,
    pub mergers: HashMap<String, MergeHook>,
    /// Storage class overrides, typically forcing `Transitory`.
    pub storage_overrides: HashMap<String, StorageClass>,
}

impl TypeHooks {
    /// Returns `true` if no hooks or overrides are declared.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty() && self.mergers.is_empty() && self.storage_overrides.is_empty()
    }
}

impl fmt::Debug for TypeHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut validators: Vec<&String> = self.validators.keys().collect();
        validators.sort();
        let mut mergers: Vec<&String> = self.mergers.keys().collect();
        mergers.sort();
        f.debug_struct("TypeHooks")
            .field("validators", &validators)
            .field("mergers", &mergers)
            .field("storage_overrides", &self.storage_overrides)
            .finish()
    }
}
