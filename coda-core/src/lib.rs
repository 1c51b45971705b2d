#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![forbid(unsafe_code)]

//! Type descriptors and coding contexts for coda.
//!
//! This crate knows nothing about any wire format. It provides:
//!
//! - [`TypeIdentity`]: the erased base identity codecs are bound to
//!   ("List", "Map", "String", a user type).
//! - [`CodableType`]: an identity applied to its generic arguments, plus the
//!   vtable container codecs use to build and inspect concrete values.
//! - [`Codable`]: how a Rust type names its [`CodableType`].
//! - [`CodingContext`]: the read-only context threaded through a decode or
//!   encode call, with explicit "is-a" relationships.

mod codable;
pub use codable::*;

mod codable_type;
pub use codable_type::*;

mod context;
pub use context::*;

mod identity;
pub use identity::*;
