use cep78_types::{ClType, DecodeError, ValidationError};
use thiserror::Error;

/// Errors raised while preparing a contract call.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// The requested options cannot be combined.
    #[error("conflicting configuration: {0}")]
    ConflictingConfiguration(String),
    /// A field required by the selected call shape was not supplied.
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),
    /// Domain arguments could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// A contract identifier is not in an accepted form.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] ValidationError),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serialization(err.to_string())
    }
}

/// Errors raised while decoding values read from contract storage.
#[derive(Error, Debug, PartialEq)]
pub enum StateError {
    /// The stored bytes are malformed.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    /// The stored value has a different shape than the query expects.
    #[error("expected {expected}, found {found}")]
    UnexpectedType {
        /// Expected shape.
        expected: &'static str,
        /// Type actually stored.
        found: ClType,
    },
    /// A modality byte outside the known discriminants.
    #[error("unknown {modality} discriminant {value}")]
    UnknownDiscriminant {
        /// Modality being decoded.
        modality: &'static str,
        /// Offending byte.
        value: u8,
    },
}
