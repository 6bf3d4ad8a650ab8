//! Map-backed model instances.

use std::collections::BTreeMap;
use std::sync::Arc;

use schemata_descriptor::EncodedKind;
use schemata_types::{TypeName, Value};

use crate::error::{RuntimeError, RuntimeResult};
use crate::model::Model;

/// Storage rules for one attribute of a [`ModelLayout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub kind: EncodedKind,
    /// A setter is implemented or backing storage exists.
    pub writable: bool,
}

/// Flattened attribute table of one concrete type, including everything it
/// inherits. The most derived declaration of a name wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelLayout {
    pub type_name: TypeName,
    pub slots: BTreeMap<String, Slot>,
}

/// A model instance whose values live in an ordered map.
///
/// Scalar attributes start at zero (or `false`), object attributes at
/// [`Value::Null`].
#[derive(Clone, Debug)]
pub struct DynamicModel {
    layout: Arc<ModelLayout>,
    values: BTreeMap<String, Value>,
}

impl DynamicModel {
    /// Allocate a default instance for `layout`.
    pub fn new(layout: Arc<ModelLayout>) -> Self {
        let values = layout
            .slots
            .iter()
            .filter(|(_, slot)| slot.kind.is_scalar())
            .map(|(name, slot)| (name.clone(), slot.kind.default_value()))
            .collect();
        Self { layout, values }
    }

    pub fn layout(&self) -> &Arc<ModelLayout> {
        &self.layout
    }

    /// Attributes that currently hold a non-null value.
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    fn slot(&self, name: &str) -> RuntimeResult<Slot> {
        self.layout
            .slots
            .get(name)
            .copied()
            .ok_or_else(|| RuntimeError::UndefinedAttribute {
                ty: self.layout.type_name.clone(),
                name: name.to_string(),
            })
    }
}

/// Bring an accepted value into the slot's canonical representation.
fn coerce(kind: EncodedKind, value: Value) -> Value {
    match (kind, value) {
        (EncodedKind::Integer, Value::Bool(b)) => Value::Int(i64::from(b)),
        (EncodedKind::Bool, Value::Int(i)) => Value::Bool(i != 0),
        (EncodedKind::Float, Value::Int(i)) => Value::Float(i as f64),
        (_, value) => value,
    }
}

impl Model for DynamicModel {
    fn type_name(&self) -> &TypeName {
        &self.layout.type_name
    }

    fn value(&self, name: &str) -> Value {
        self.values.get(name).cloned().unwrap_or(Value::Null)
    }

    fn set_value(&mut self, name: &str, value: Value) -> RuntimeResult<()> {
        let slot = self.slot(name)?;
        if !slot.writable {
            return Err(RuntimeError::ReadOnlyAttribute {
                ty: self.layout.type_name.clone(),
                name: name.to_string(),
            });
        }
        if !slot.kind.accepts(&value) {
            return Err(RuntimeError::TypeMismatch {
                name: name.to_string(),
                expected: slot.kind.to_string(),
                got: value.kind_name().to_string(),
            });
        }
        match coerce(slot.kind, value) {
            Value::Null => {
                self.values.remove(name);
            }
            value => {
                self.values.insert(name.to_string(), value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Arc<ModelLayout> {
        let mut slots = BTreeMap::new();
        slots.insert(
            "name".to_string(),
            Slot {
                kind: EncodedKind::Object,
                writable: true,
            },
        );
        slots.insert(
            "count".to_string(),
            Slot {
                kind: EncodedKind::Integer,
                writable: true,
            },
        );
        slots.insert(
            "ratio".to_string(),
            Slot {
                kind: EncodedKind::Float,
                writable: true,
            },
        );
        slots.insert(
            "identifier".to_string(),
            Slot {
                kind: EncodedKind::Object,
                writable: false,
            },
        );
        Arc::new(ModelLayout {
            type_name: TypeName::new("Thing"),
            slots,
        })
    }

    #[test]
    fn defaults() {
        let model = DynamicModel::new(layout());
        assert_eq!(model.type_name(), &TypeName::new("Thing"));
        assert_eq!(model.value("name"), Value::Null);
        assert_eq!(model.value("count"), Value::Int(0));
        assert_eq!(model.value("ratio"), Value::Float(0.0));
        assert_eq!(model.value("nope"), Value::Null);
    }

    #[test]
    fn write_and_read() {
        let mut model = DynamicModel::new(layout());
        model.set_value("name", Value::from("Ada")).unwrap();
        model.set_value("count", Value::Int(3)).unwrap();
        assert_eq!(model.value("name"), Value::from("Ada"));
        assert_eq!(model.value("count"), Value::Int(3));
    }

    #[test]
    fn null_clears_object_slot() {
        let mut model = DynamicModel::new(layout());
        model.set_value("name", Value::from("Ada")).unwrap();
        model.set_value("name", Value::Null).unwrap();
        assert_eq!(model.value("name"), Value::Null);
        assert!(!model.values().contains_key("name"));
    }

    #[test]
    fn undefined_attribute() {
        let mut model = DynamicModel::new(layout());
        let err = model.set_value("nope", Value::Int(1)).unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedAttribute { .. }));
    }

    #[test]
    fn read_only_attribute() {
        let mut model = DynamicModel::new(layout());
        let err = model.set_value("identifier", Value::from("x")).unwrap_err();
        assert!(matches!(err, RuntimeError::ReadOnlyAttribute { .. }));
    }

    #[test]
    fn type_mismatch() {
        let mut model = DynamicModel::new(layout());
        let err = model.set_value("count", Value::from("three")).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::TypeMismatch {
                name: "count".into(),
                expected: "integer".into(),
                got: "string".into(),
            }
        );
        assert!(model.set_value("count", Value::Null).is_err());
        assert_eq!(model.value("count"), Value::Int(0));
    }

    #[test]
    fn numeric_coercion() {
        let mut model = DynamicModel::new(layout());
        model.set_value("ratio", Value::Int(2)).unwrap();
        assert_eq!(model.value("ratio"), Value::Float(2.0));
        model.set_value("count", Value::Bool(true)).unwrap();
        assert_eq!(model.value("count"), Value::Int(1));
    }
}
