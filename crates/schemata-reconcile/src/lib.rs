//! Schema-driven model operations for Schemata.
//!
//! [`ModelReconciler`] implements the generic operations every model type
//! gets for free once its schema is known:
//!
//! - `construct_from_map` / `validate_and_set` / `validate` -- writes that
//!   pass through per-attribute validation hooks
//! - `merge_value` / `merge_from` -- hook-aware merging between instances
//! - `snapshot`, `equal`, `hash`, `copy`, `describe` -- identity operations
//!   over the schema's transitory and permanent attributes
//!
//! # Write faults
//!
//! A value accepted by validation can still be refused by the runtime, for
//! example because it does not match the declared type. With
//! [`ReconcilerConfig::strict_write_faults`] unset such a refusal is
//! returned as [`ReconcileError::WriteFault`]. With it set, the reconciler
//! panics so the fault surfaces at its origin.

pub mod config;
pub mod error;
pub mod reconciler;

pub use config::ReconcilerConfig;
pub use error::{ReconcileError, ReconcileResult};
pub use reconciler::ModelReconciler;
