use schemata_runtime::RuntimeError;
use schemata_schema::SchemaError;

/// Errors from reconciler operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// A validation hook rejected the proposed value.
    #[error("validation of {name:?} failed: {reason}")]
    Validation { name: String, reason: String },

    /// The runtime refused to store an accepted value.
    #[error("writing {name:?} failed: {source}")]
    WriteFault { name: String, source: RuntimeError },

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;
