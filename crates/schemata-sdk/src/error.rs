use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input is not a JSON object: {0}")]
    NotAnObject(String),

    #[error("type error: {0}")]
    Type(#[from] schemata_types::TypeError),

    #[error("runtime error: {0}")]
    Runtime(#[from] schemata_runtime::RuntimeError),

    #[error("schema error: {0}")]
    Schema(#[from] schemata_schema::SchemaError),

    #[error("reconcile error: {0}")]
    Reconcile(#[from] schemata_reconcile::ReconcileError),
}

pub type SdkResult<T> = Result<T, SdkError>;
