use std::fmt;

use schemata_types::{TypeName, Value};

use crate::error::RuntimeResult;

/// One instance of a model type, accessed by attribute name.
///
/// This is the read/write half of the host object model. Implementations
/// decide how values are stored; callers only see names and [`Value`]s.
pub trait Model: Send + Sync + fmt::Debug {
    /// The concrete type of this instance.
    fn type_name(&self) -> &TypeName;

    /// Read an attribute. Unset object attributes and unknown names read as
    /// [`Value::Null`].
    fn value(&self, name: &str) -> Value;

    /// Write an attribute.
    ///
    /// Fails if the attribute is undeclared, not writable, or the value does
    /// not fit its declared type.
    fn set_value(&mut self, name: &str, value: Value) -> RuntimeResult<()>;
}
