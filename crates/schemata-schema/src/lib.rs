//! Per-type schema cache for Schemata.
//!
//! A [`TypeSchema`] records which attributes of a type are part of its
//! model and how each is stored. Schemas are derived from the host
//! [`TypeCatalog`](schemata_runtime::TypeCatalog) on first use and memoized
//! in a [`SchemaCache`] for the lifetime of the cache.
//!
//! # Classification
//!
//! For a type `T` and attribute `n`:
//!
//! 1. A storage override declared on `T` or an ancestor wins outright.
//! 2. An attribute with no dynamic flag, no backing storage, and no
//!    implemented accessor is [`StorageClass::None`](schemata_types::StorageClass).
//! 3. A read-only attribute without backing storage is classified against
//!    `T`'s supertype, since storage may live in an ancestor. On the root
//!    type it is `None`.
//! 4. Everything else is `Permanent`.
//!
//! # Concurrency
//!
//! Schemas are built outside any lock and published with a single map
//! insert. Two threads racing on the same type both build an equivalent
//! schema and the last insert wins, so callers may rely on value
//! equivalence of cached schemas but not on `Arc` identity.

pub mod cache;
pub mod error;
pub mod schema;

pub use cache::{SchemaCache, DEFAULT_MAX_DEPTH};
pub use error::{SchemaError, SchemaResult};
pub use schema::TypeSchema;
