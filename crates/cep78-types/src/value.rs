//! Typed ledger values.

use primitive_types::U512;
use serde_json::{json, Value};

use crate::bytesrepr;
use crate::cl_type::ClType;
use crate::errors::DecodeError;
use crate::key::Key;

/// A ledger-native value tagged with its variant.
///
/// Compound variants carry their element types so that empty collections
/// and absent options still know what they would contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClValue {
    /// Boolean.
    Bool(bool),
    /// Unsigned 8-bit integer.
    U8(u8),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// Unsigned 512-bit integer.
    U512(U512),
    /// UTF-8 string.
    String(String),
    /// Global state key.
    Key(Key),
    /// Fixed-length bytes; the length is implied by the type.
    ByteArray(Vec<u8>),
    /// Optional value.
    Option {
        /// Declared inner type.
        inner: ClType,
        /// Present value, if any.
        value: Option<Box<ClValue>>,
    },
    /// Homogeneous list.
    List {
        /// Declared element type.
        item: ClType,
        /// Elements in encoded order.
        items: Vec<ClValue>,
    },
    /// Key/value pairs in insertion order; duplicate keys are not checked.
    Map {
        /// Declared key type.
        key: ClType,
        /// Declared value type.
        value: ClType,
        /// Pairs in encoded order.
        entries: Vec<(ClValue, ClValue)>,
    },
}

impl ClValue {
    /// Builds a present `Option<inner>`.
    pub fn some(inner: ClType, value: ClValue) -> Self {
        ClValue::Option {
            inner,
            value: Some(Box::new(value)),
        }
    }

    /// Builds an absent `Option<inner>`.
    pub fn none(inner: ClType) -> Self {
        ClValue::Option { inner, value: None }
    }

    /// Builds a `List<item>`.
    pub fn list(item: ClType, items: Vec<ClValue>) -> Self {
        ClValue::List { item, items }
    }

    /// Builds a `Map<key, value>` keeping the given pair order.
    pub fn map(key: ClType, value: ClType, entries: Vec<(ClValue, ClValue)>) -> Self {
        ClValue::Map {
            key,
            value,
            entries,
        }
    }

    /// Builds a `Map<String, String>` from string pairs.
    pub fn string_map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (ClValue::String(k.into()), ClValue::String(v.into())))
            .collect();
        ClValue::map(ClType::String, ClType::String, entries)
    }

    /// Builds a `U512` from any smaller unsigned integer.
    pub fn u512(value: impl Into<U512>) -> Self {
        ClValue::U512(value.into())
    }

    /// Declared type of this value.
    pub fn cl_type(&self) -> ClType {
        match self {
            ClValue::Bool(_) => ClType::Bool,
            ClValue::U8(_) => ClType::U8,
            ClValue::U32(_) => ClType::U32,
            ClValue::U64(_) => ClType::U64,
            ClValue::U512(_) => ClType::U512,
            ClValue::String(_) => ClType::String,
            ClValue::Key(_) => ClType::Key,
            ClValue::ByteArray(bytes) => ClType::ByteArray(bytes.len() as u32),
            ClValue::Option { inner, .. } => ClType::option(inner.clone()),
            ClValue::List { item, .. } => ClType::list(item.clone()),
            ClValue::Map { key, value, .. } => ClType::map(key.clone(), value.clone()),
        }
    }

    /// Untagged encoding under the value's own type.
    pub fn to_bytes(&self) -> Vec<u8> {
        bytesrepr::to_bytes(self)
    }

    /// Self-describing encoding: the ledger envelope of `u32` length, value
    /// bytes and type descriptor.
    pub fn to_tagged_bytes(&self) -> Vec<u8> {
        bytesrepr::to_tagged_bytes(self)
    }

    /// Decodes a value of type `ty`, returning the unconsumed remainder.
    pub fn from_bytes<'a>(bytes: &'a [u8], ty: &ClType) -> Result<(ClValue, &'a [u8]), DecodeError> {
        bytesrepr::from_bytes(bytes, ty)
    }

    /// String contents, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Widens any fixed-width unsigned variant to `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ClValue::U8(v) => Some(u64::from(*v)),
            ClValue::U32(v) => Some(u64::from(*v)),
            ClValue::U64(v) => Some(*v),
            ClValue::U512(v) if v.bits() <= 64 => Some(v.low_u64()),
            _ => None,
        }
    }

    /// Key contents, if this is a `Key`.
    pub fn as_key(&self) -> Option<&Key> {
        match self {
            ClValue::Key(key) => Some(key),
            _ => None,
        }
    }

    /// List elements, if this is a `List`.
    pub fn as_list(&self) -> Option<&[ClValue]> {
        match self {
            ClValue::List { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Map pairs, if this is a `Map`.
    pub fn as_map(&self) -> Option<&[(ClValue, ClValue)]> {
        match self {
            ClValue::Map { entries, .. } => Some(entries),
            _ => None,
        }
    }

    /// True for `Map` values.
    pub fn is_map(&self) -> bool {
        matches!(self, ClValue::Map { .. })
    }

    /// Linear lookup of the first pair whose key equals `key`.
    pub fn map_get(&self, key: &ClValue) -> Option<&ClValue> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Linear lookup of the first pair whose key is the string `key`.
    pub fn map_get_str(&self, key: &str) -> Option<&ClValue> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Renders the value as JSON.
    ///
    /// Maps become arrays of `{"key", "value"}` objects so pair order survives;
    /// `U512` becomes a decimal string and keys their formatted string.
    pub fn to_json(&self) -> Value {
        match self {
            ClValue::Bool(v) => json!(v),
            ClValue::U8(v) => json!(v),
            ClValue::U32(v) => json!(v),
            ClValue::U64(v) => json!(v),
            ClValue::U512(v) => json!(v.to_string()),
            ClValue::String(v) => json!(v),
            ClValue::Key(key) => json!(key.to_formatted_string()),
            ClValue::ByteArray(bytes) => json!(hex::encode(bytes)),
            ClValue::Option { value, .. } => match value {
                Some(inner) => inner.to_json(),
                None => Value::Null,
            },
            ClValue::List { items, .. } => Value::Array(items.iter().map(ClValue::to_json).collect()),
            ClValue::Map { entries, .. } => Value::Array(
                entries
                    .iter()
                    .map(|(k, v)| json!({ "key": k.to_json(), "value": v.to_json() }))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for ClValue {
    fn from(value: bool) -> Self {
        ClValue::Bool(value)
    }
}

impl From<u8> for ClValue {
    fn from(value: u8) -> Self {
        ClValue::U8(value)
    }
}

impl From<u32> for ClValue {
    fn from(value: u32) -> Self {
        ClValue::U32(value)
    }
}

impl From<u64> for ClValue {
    fn from(value: u64) -> Self {
        ClValue::U64(value)
    }
}

impl From<U512> for ClValue {
    fn from(value: U512) -> Self {
        ClValue::U512(value)
    }
}

impl From<String> for ClValue {
    fn from(value: String) -> Self {
        ClValue::String(value)
    }
}

impl From<&str> for ClValue {
    fn from(value: &str) -> Self {
        ClValue::String(value.to_string())
    }
}

impl From<Key> for ClValue {
    fn from(value: Key) -> Self {
        ClValue::Key(value)
    }
}
