use thiserror::Error;

use crate::cl_type::ClType;

/// Validation errors for textual identifiers and keys.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Errors raised while decoding ledger bytes into typed values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes remain than the declared type requires.
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEndOfInput {
        /// Bytes required by the next read.
        needed: usize,
        /// Bytes actually left in the buffer.
        remaining: usize,
    },
    /// A self-describing tag byte does not name a supported type.
    #[error("unknown type tag {0}")]
    UnknownTypeTag(u8),
    /// The self-describing tag names a different type than the caller expected.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Type requested by the caller.
        expected: ClType,
        /// Type announced by the encoded descriptor.
        found: ClType,
    },
    /// The bytes are well-framed but carry an illegal payload for their type.
    #[error("invalid {kind} value: {reason}")]
    InvalidValue {
        /// Type being decoded.
        kind: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// Type descriptors nest deeper than the decoder allows.
    #[error("type nesting exceeds {limit} levels")]
    NestingTooDeep {
        /// Configured nesting limit.
        limit: usize,
    },
}

impl DecodeError {
    pub(crate) fn invalid(kind: &'static str, reason: impl Into<String>) -> Self {
        DecodeError::InvalidValue {
            kind,
            reason: reason.into(),
        }
    }
}
