//! Host object-model capabilities for Schemata.
//!
//! The schema and reconciliation crates never touch instance storage
//! directly. They consume the host object model through two traits:
//!
//! - [`TypeCatalog`] -- lists declared attributes, walks supertypes, answers
//!   accessor queries, supplies per-type hooks, and allocates instances
//! - [`Model`] -- reads and writes a named attribute on one instance
//!
//! # Implementations
//!
//! - [`InMemoryCatalog`] -- `RwLock`-guarded type table built from
//!   [`TypeDefinition`]s, for tests and embedding
//! - [`DynamicModel`] -- map-backed instance produced by `InMemoryCatalog`
//!
//! # Design Rules
//!
//! 1. Hooks are plain closures registered per attribute name; nothing is
//!    looked up by assembling method names at call time.
//! 2. Writes are checked against the declared type signature and fail with
//!    a [`RuntimeError`], never a panic.
//! 3. A type without an explicit supertype descends directly from the root.

pub mod catalog;
pub mod definition;
pub mod dynamic;
pub mod error;
pub mod hooks;
pub mod memory;
pub mod model;

pub use catalog::{AttributeHandle, CatalogResolver, TypeCatalog};
pub use definition::{TypeDefinition, TypeDefinitionBuilder};
pub use dynamic::{DynamicModel, ModelLayout, Slot};
pub use error::{RuntimeError, RuntimeResult};
pub use hooks::{HookRejection, MergeHook, TypeHooks, ValidateHook};
pub use memory::{InMemoryCatalog, DEFAULT_ROOT_TYPE};
pub use model::Model;
