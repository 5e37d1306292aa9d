//! Minted-identifier resolution.
//!
//! A mint adds a named key pointing at a freshly allocated dictionary slot and
//! writes the token identifier into that slot. Resolution follows the same two
//! hops: named-key entry, then the write under the referenced key.
//!
//! Slot writes are dictionary values: the value envelope followed by the seed
//! address and item key. They are always read self-describing, whatever type
//! the write declares.

use cep78_types::{from_tagged_bytes, ClType, ClValue};
use tracing::debug;

use crate::effect::{ExecutionEffect, Transform, TransformKind};
use crate::error::EffectError;

/// Resolves the identifier assigned by a mint.
///
/// Returns `Ok(None)` when no transform adds a named key (identifier modes
/// that allocate nothing) or when the slot holds an empty list. The last
/// element is returned for list values, the whole value otherwise.
pub fn resolve_minted_id(transforms: &[Transform]) -> Result<Option<ClValue>, EffectError> {
    let slot = transforms.iter().find_map(|transform| match &transform.kind {
        TransformKind::AddKeys(named_keys) => named_keys.first(),
        _ => None,
    });
    let slot = match slot {
        Some(named_key) => &named_key.key,
        None => return Ok(None),
    };
    debug!(key = %slot, "resolving minted identifier");

    let bytes = transforms
        .iter()
        .find_map(|transform| match &transform.kind {
            TransformKind::Write { bytes, .. } if transform.key == *slot => Some(bytes),
            _ => None,
        })
        .ok_or_else(|| EffectError::MissingDictionaryWrite { key: slot.clone() })?;

    let (value, _) = from_tagged_bytes(bytes, &ClType::Any)?;
    match value {
        ClValue::List { mut items, .. } => Ok(items.pop()),
        scalar => Ok(Some(scalar)),
    }
}

/// [`resolve_minted_id`] over a whole effect; failed effects have no data.
pub fn resolve_minted_id_in(effect: &ExecutionEffect) -> Result<Option<ClValue>, EffectError> {
    resolve_minted_id(effect.usable_transforms()?)
}
