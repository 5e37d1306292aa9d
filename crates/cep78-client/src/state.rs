//! Decoding of values read from contract storage.
//!
//! The transport fetches named keys and dictionary items; these helpers turn
//! the stored values into client-level answers without runtime casts.

use cep78_types::{from_bytes, ClType, ClValue, Key};

use crate::errors::StateError;
use crate::modalities::Modality;

/// Dictionary mapping token ids to owners.
pub const TOKEN_OWNERS_DICTIONARY: &str = "token_owners";
/// Dictionary mapping owners to balances.
pub const BALANCES_DICTIONARY: &str = "balances";

/// Token metadata as stored by the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenMetadata {
    /// String-to-string map, in stored order.
    Map(Vec<(String, String)>),
    /// Unstructured string.
    Raw(String),
}

/// Decodes a stored value of declared type `ty`, rejecting trailing bytes.
pub fn decode_stored(bytes: &[u8], ty: &ClType) -> Result<ClValue, StateError> {
    let (value, rest) = from_bytes(bytes, ty)?;
    if !rest.is_empty() {
        return Err(cep78_types::DecodeError::InvalidValue {
            kind: "stored value",
            reason: format!("{} trailing bytes", rest.len()),
        }
        .into());
    }
    Ok(value)
}

/// Decodes the modality stored under `M::NAMED_KEY`.
pub fn decode_modality<M: Modality>(value: &ClValue) -> Result<M, StateError> {
    M::from_value(value)
}

/// Formatted owner key (`account-hash-…` or `hash-…`).
pub fn owner_of(value: &ClValue) -> Result<String, StateError> {
    value
        .as_key()
        .map(Key::to_formatted_string)
        .ok_or_else(|| unexpected("Key", value))
}

/// Token metadata from its metadata dictionary entry.
pub fn metadata_of(value: &ClValue) -> Result<TokenMetadata, StateError> {
    if let Some(raw) = value.as_str() {
        return Ok(TokenMetadata::Raw(raw.to_string()));
    }
    let entries = value
        .as_map()
        .ok_or_else(|| unexpected("Map<String, String>", value))?;
    entries
        .iter()
        .map(|(k, v)| match (k.as_str(), v.as_str()) {
            (Some(k), Some(v)) => Ok((k.to_string(), v.to_string())),
            _ => Err(unexpected("Map<String, String>", value)),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(TokenMetadata::Map)
}

/// Token count held by an owner.
pub fn balance_of(value: &ClValue) -> Result<u64, StateError> {
    value.as_u64().ok_or_else(|| unexpected("U64", value))
}

/// Dictionary item key for an owner's balance: the bare account hash hex.
pub fn balance_item_key(owner: &Key) -> String {
    hex::encode(owner.addr())
}

fn unexpected(expected: &'static str, value: &ClValue) -> StateError {
    StateError::UnexpectedType {
        expected,
        found: value.cl_type(),
    }
}
