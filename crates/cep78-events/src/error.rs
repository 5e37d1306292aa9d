//! Error types for effect parsing and event extraction.

use cep78_types::DecodeError;
use thiserror::Error;

/// Errors returned by the extractor and the minted-identifier resolver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectError {
    /// The execution failed, so its effect carries no usable transforms.
    #[error("no effect data: execution failed ({error_message})")]
    NoEffectData {
        /// Failure reason reported by the node.
        error_message: String,
    },
    /// A named key points at a dictionary slot that was never written.
    #[error("no write found for dictionary key {key}")]
    MissingDictionaryWrite {
        /// Storage key referenced by the named key.
        key: String,
    },
    /// A value required by the caller could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Errors raised while reading node JSON.
#[derive(Error, Debug)]
pub enum ParseError {
    /// JSON deserialization error.
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    /// Value bytes are not valid hex.
    #[error("invalid hex in transform {key}: {source}")]
    InvalidHex {
        /// Transform key.
        key: String,
        /// Underlying hex error.
        source: hex::FromHexError,
    },
    /// A required field is absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),
}
