//! Encoded attribute descriptor parser for Schemata.
//!
//! A type declares each of its attributes with a compact, positional
//! encoding such as `T@"Person",&,N,V_owner`. This crate turns one encoding
//! into a structured [`AttributeDescriptor`].
//!
//! # Encoding Grammar
//!
//! The encoding is a comma-separated token list. The first token is the type
//! signature, prefixed with `T`. Every following token starts with a flag
//! character:
//!
//! | Token     | Meaning                                   |
//! |-----------|-------------------------------------------|
//! | `R`       | read-only                                 |
//! | `C`       | copy memory policy                        |
//! | `&`       | retain (shared) memory policy             |
//! | `N`       | non-atomic                                |
//! | `W`       | weak reference                            |
//! | `P`       | eligible for garbage collection           |
//! | `D`       | dynamic (no synthesized storage)          |
//! | `G<name>` | custom getter                             |
//! | `S<name>` | custom setter                             |
//! | `V<name>` | backing storage slot                      |
//!
//! Unknown tokens are skipped so newer encodings still parse.
//!
//! # Quick Start
//!
//! ```rust
//! use schemata_descriptor::{AttributeDescriptor, MemoryPolicy, NoTypeResolver};
//!
//! let desc = AttributeDescriptor::parse("name", r#"T@"NSString",C,N,V_name"#, &NoTypeResolver)
//!     .unwrap();
//! assert_eq!(desc.memory_policy, MemoryPolicy::Copy);
//! assert_eq!(desc.setter, "setName:");
//! assert_eq!(desc.backing_storage.as_deref(), Some("_name"));
//! ```

pub mod accessor;
pub mod descriptor;
pub mod encoding;
pub mod error;
pub mod resolver;

pub use accessor::{default_getter, default_setter};
pub use descriptor::{AttributeDescriptor, MemoryPolicy};
pub use encoding::{EncodedKind, TypeEncoding};
pub use error::{ParseError, ParseResult};
pub use resolver::{NoTypeResolver, TypeResolver};
