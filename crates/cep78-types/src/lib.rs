//! Ledger value primitives for CEP-78 clients.
//!
//! This crate provides:
//! - [`ClType`] descriptors and [`ClValue`] tagged values
//! - The bit-exact binary value format ([`bytesrepr`]), tagged and untagged
//! - Ordered named call arguments ([`RuntimeArgs`])
//! - Contract identity normalization ([`identity`])
//!
//! Everything here is pure and synchronous; decoding borrows the input buffer
//! and always produces fresh values.
//!
#![deny(missing_docs)]

/// Named call arguments.
pub mod args;
/// Binary encoding and decoding of values.
pub mod bytesrepr;
/// Type descriptors.
pub mod cl_type;
/// Error types for decoding and validation.
pub mod errors;
/// Contract identity normalization.
pub mod identity;
/// Global state keys.
pub mod key;
/// Tagged values.
pub mod value;

pub use args::{NamedArg, RuntimeArgs};
pub use bytesrepr::{from_bytes, from_tagged_bytes, to_bytes, to_tagged_bytes};
pub use cl_type::ClType;
pub use errors::{DecodeError, ValidationError};
pub use identity::{ContractHash, ContractPackageHash};
pub use key::{Key, URef};
pub use primitive_types::U512;
pub use value::ClValue;
