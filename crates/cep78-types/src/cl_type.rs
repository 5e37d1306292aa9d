use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bytesrepr::{Reader, MAX_NESTING_DEPTH};
use crate::errors::DecodeError;

/// Type tag: `Bool`.
pub const TAG_BOOL: u8 = 0;
/// Type tag: `U8`.
pub const TAG_U8: u8 = 3;
/// Type tag: `U32`.
pub const TAG_U32: u8 = 4;
/// Type tag: `U64`.
pub const TAG_U64: u8 = 5;
/// Type tag: `U512`.
pub const TAG_U512: u8 = 8;
/// Type tag: `String`.
pub const TAG_STRING: u8 = 10;
/// Type tag: `Key`.
pub const TAG_KEY: u8 = 11;
/// Type tag: `Option`.
pub const TAG_OPTION: u8 = 13;
/// Type tag: `List`.
pub const TAG_LIST: u8 = 14;
/// Type tag: `ByteArray`.
pub const TAG_BYTE_ARRAY: u8 = 15;
/// Type tag: `Map`.
pub const TAG_MAP: u8 = 17;
/// Type tag: `Any` (dynamically typed payload).
pub const TAG_ANY: u8 = 21;

/// Declared type of a ledger value.
///
/// The serde representation matches the node's JSON `cl_type` field, e.g.
/// `"U64"`, `{"List":"Key"}` or `{"Map":{"key":"String","value":"String"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClType {
    /// Boolean.
    Bool,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// Unsigned 512-bit integer with a length-prefixed magnitude.
    U512,
    /// UTF-8 string.
    String,
    /// Global state key.
    Key,
    /// Fixed-length byte array; the length is part of the type.
    ByteArray(u32),
    /// Optional value.
    Option(Box<ClType>),
    /// Homogeneous list.
    List(Box<ClType>),
    /// Ordered key/value pairs.
    Map {
        /// Key type.
        key: Box<ClType>,
        /// Value type.
        value: Box<ClType>,
    },
    /// No static type; values carry their own descriptor.
    Any,
}

impl ClType {
    /// Builds `Option<inner>`.
    pub fn option(inner: ClType) -> Self {
        ClType::Option(Box::new(inner))
    }

    /// Builds `List<item>`.
    pub fn list(item: ClType) -> Self {
        ClType::List(Box::new(item))
    }

    /// Builds `Map<key, value>`.
    pub fn map(key: ClType, value: ClType) -> Self {
        ClType::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Leading tag byte of this type's descriptor.
    pub fn tag(&self) -> u8 {
        match self {
            ClType::Bool => TAG_BOOL,
            ClType::U8 => TAG_U8,
            ClType::U32 => TAG_U32,
            ClType::U64 => TAG_U64,
            ClType::U512 => TAG_U512,
            ClType::String => TAG_STRING,
            ClType::Key => TAG_KEY,
            ClType::ByteArray(_) => TAG_BYTE_ARRAY,
            ClType::Option(_) => TAG_OPTION,
            ClType::List(_) => TAG_LIST,
            ClType::Map { .. } => TAG_MAP,
            ClType::Any => TAG_ANY,
        }
    }

    /// Smallest number of bytes a value of this type can occupy untagged.
    pub(crate) fn min_encoded_len(&self) -> usize {
        match self {
            ClType::Bool | ClType::U8 | ClType::U512 | ClType::Option(_) => 1,
            ClType::Any => 5,
            ClType::U32 | ClType::String | ClType::List(_) | ClType::Map { .. } => 4,
            ClType::U64 => 8,
            ClType::Key => 33,
            ClType::ByteArray(len) => *len as usize,
        }
    }

    /// Appends the descriptor bytes to `out`.
    pub fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(self.tag());
        match self {
            ClType::ByteArray(len) => out.extend_from_slice(&len.to_le_bytes()),
            ClType::Option(inner) | ClType::List(inner) => inner.write_bytes(out),
            ClType::Map { key, value } => {
                key.write_bytes(out);
                value.write_bytes(out);
            }
            _ => {}
        }
    }

    /// Serializes the descriptor.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_bytes(&mut out);
        out
    }

    /// Parses a descriptor and returns it with the unconsumed remainder.
    pub fn from_bytes(bytes: &[u8]) -> Result<(ClType, &[u8]), DecodeError> {
        let mut reader = Reader::new(bytes);
        let ty = ClType::read(&mut reader, 0)?;
        Ok((ty, reader.into_remainder()))
    }

    pub(crate) fn read(reader: &mut Reader<'_>, depth: usize) -> Result<ClType, DecodeError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(DecodeError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        let tag = reader.u8()?;
        let ty = match tag {
            TAG_BOOL => ClType::Bool,
            TAG_U8 => ClType::U8,
            TAG_U32 => ClType::U32,
            TAG_U64 => ClType::U64,
            TAG_U512 => ClType::U512,
            TAG_STRING => ClType::String,
            TAG_KEY => ClType::Key,
            TAG_BYTE_ARRAY => ClType::ByteArray(reader.u32()?),
            TAG_OPTION => ClType::option(ClType::read(reader, depth + 1)?),
            TAG_LIST => ClType::list(ClType::read(reader, depth + 1)?),
            TAG_MAP => {
                let key = ClType::read(reader, depth + 1)?;
                let value = ClType::read(reader, depth + 1)?;
                ClType::map(key, value)
            }
            TAG_ANY => ClType::Any,
            other => return Err(DecodeError::UnknownTypeTag(other)),
        };
        Ok(ty)
    }
}

impl fmt::Display for ClType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClType::Bool => write!(f, "Bool"),
            ClType::U8 => write!(f, "U8"),
            ClType::U32 => write!(f, "U32"),
            ClType::U64 => write!(f, "U64"),
            ClType::U512 => write!(f, "U512"),
            ClType::String => write!(f, "String"),
            ClType::Key => write!(f, "Key"),
            ClType::ByteArray(len) => write!(f, "ByteArray[{}]", len),
            ClType::Option(inner) => write!(f, "Option<{}>", inner),
            ClType::List(inner) => write!(f, "List<{}>", inner),
            ClType::Map { key, value } => write!(f, "Map<{}, {}>", key, value),
            ClType::Any => write!(f, "Any"),
        }
    }
}
