//! High-level SDK for Schemata.
//!
//! [`Schemata`] bundles an in-memory type catalog, its schema cache, and a
//! reconciler behind one handle. This is the main entry point for
//! applications embedding Schemata.

pub mod error;
pub mod engine;

pub use error::{SdkError, SdkResult};
pub use engine::Schemata;

// Re-export key types
pub use schemata_descriptor::{AttributeDescriptor, MemoryPolicy};
pub use schemata_reconcile::{ReconcileError, ReconcilerConfig};
pub use schemata_runtime::{HookRejection, InMemoryCatalog, Model, TypeDefinition};
pub use schemata_schema::TypeSchema;
pub use schemata_types::{StorageClass, TypeName, Value};
