//! Contract call construction and state decoding for CEP-78 NFT contracts.
//!
//! This crate provides:
//! - Domain arguments for every contract call ([`calls`])
//! - The argument builder producing ordered [`RuntimeArgs`](cep78_types::RuntimeArgs)
//!   and a transport payload ([`builder`])
//! - Install-time modalities with their ledger discriminants ([`modalities`])
//! - Decoding of values read back from contract storage ([`state`])
//!
//! Core invariants:
//! - Argument order is fixed per call; identical inputs give identical bytes
//! - Conflicting options are reported, never silently resolved
//! - Nothing here signs, submits or polls; the transport owns the network
//!
#![deny(missing_docs)]

/// Call argument builder.
pub mod builder;
/// Domain arguments per contract call.
pub mod calls;
/// Error types for call preparation and state decoding.
pub mod errors;
/// Install-time modalities.
pub mod modalities;
/// Contract storage decoding.
pub mod state;

pub use builder::{
    ArgsBuilder, CallConfig, CallPayload, CallShape, ContractIdentity, PreparedCall, SessionWasm,
};
pub use calls::{CallArgs, ShapeSupport, TokenRef};
pub use errors::{ConfigError, StateError};
pub use modalities::{
    BurnMode, EventsMode, MetadataMutability, MintingMode, Modality, NamedKeyConventionMode,
    NftHolderMode, NftIdentifierMode, NftKind, NftMetadataKind, OwnerReverseLookupMode,
    OwnershipMode, WhitelistMode,
};
