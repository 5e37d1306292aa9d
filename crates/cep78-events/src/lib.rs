//! Event extraction from CEP-78 contract execution effects.
//!
//! This crate provides:
//! - Transform and execution-effect types parsed from node JSON ([`effect`])
//! - A lazy effect scanner selecting payload maps by contract identity ([`scanner`])
//! - An extractor turning those payloads into recognized events ([`extractor`])
//! - Resolution of the identifier assigned by a mint ([`minted`])
//!
//! Scanning is best effort: writes that fail to decode or belong to other
//! contracts are skipped. Failed executions are reported as having no data,
//! never as having no events.

#![deny(missing_docs)]

/// Extraction configuration.
pub mod config;
/// Execution effects and transforms.
pub mod effect;
/// Error types for parsing and extraction.
pub mod error;
/// Domain events.
pub mod events;
/// Event extraction.
pub mod extractor;
/// Minted-identifier resolution.
pub mod minted;
/// Effect scanning.
pub mod scanner;

pub use config::{ExtractorConfig, ScanKeys, DEFAULT_EVENT_KIND_KEY, DEFAULT_IDENTITY_KEY};
pub use effect::{
    parse_deploy_processed, DeployProcessed, ExecutionEffect, NamedKey, Outcome, Transform,
    TransformKind,
};
pub use error::{EffectError, ParseError};
pub use events::{Cep47Event, DomainEvent};
pub use extractor::{extract, extract_named, ExtractedEvents};
pub use minted::{resolve_minted_id, resolve_minted_id_in};
pub use scanner::{scan, IdentityFilter, Matches, PayloadFilter};
