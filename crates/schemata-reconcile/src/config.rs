use serde::{Deserialize, Serialize};

use schemata_schema::DEFAULT_MAX_DEPTH;

use crate::error::{ReconcileError, ReconcileResult};

/// Configuration for a [`ModelReconciler`](crate::ModelReconciler).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// When `true`, a value that passed validation but could not be written
    /// is treated as a programming error and panics. When `false` it is
    /// returned as [`ReconcileError::WriteFault`].
    pub strict_write_faults: bool,
    /// Maximum number of supertypes walked while building schemas.
    pub max_inheritance_depth: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            strict_write_faults: false,
            max_inheritance_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ReconcilerConfig {
    /// Fail fast on write faults. Intended for development and tests.
    pub fn strict() -> Self {
        Self {
            strict_write_faults: true,
            ..Default::default()
        }
    }

    /// Report write faults as errors. This is the default.
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> ReconcileResult<Self> {
        let config: Self = toml::from_str(input).map_err(|e| ReconcileError::Config(e.to_string()))?;
        if config.max_inheritance_depth == 0 {
            return Err(ReconcileError::Config(
                "max_inheritance_depth must be at least 1".into(),
            ));
        }
        Ok(config)
    }
}
