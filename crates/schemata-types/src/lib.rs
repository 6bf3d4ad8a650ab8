//! Foundation types for Schemata.
//!
//! This crate provides the identity and value types shared by every other
//! Schemata crate. It has no knowledge of attribute encodings or of any host
//! object model.
//!
//! # Key Types
//!
//! - [`TypeName`] -- Identity of a model type, used as the schema cache key
//! - [`Value`] -- Dynamically typed attribute value read from or written to a model
//! - [`StorageClass`] -- Classification of one attribute within a type's schema

pub mod error;
pub mod name;
pub mod storage;
pub mod value;

pub use error::TypeError;
pub use name::TypeName;
pub use storage::StorageClass;
pub use value::Value;
