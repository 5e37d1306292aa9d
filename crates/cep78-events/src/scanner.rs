//! Effect scanner: selects the event payloads a contract wrote during one
//! execution.

use cep78_types::identity::{equals, normalize};
use cep78_types::{from_tagged_bytes, ClType, ClValue};
use tracing::{debug, trace};

use crate::config::ScanKeys;
use crate::effect::{ExecutionEffect, Transform, TransformKind};
use crate::error::EffectError;

/// Predicate over decoded payload maps.
pub trait PayloadFilter {
    /// Returns true if the payload should be kept.
    fn matches(&self, payload: &ClValue) -> bool;
}

/// Keeps payloads whose identity entry names the target contract.
#[derive(Debug, Clone)]
pub struct IdentityFilter {
    /// Map key holding the identity.
    pub identity_key: String,
    /// Normalized target identity.
    pub target: String,
}

impl IdentityFilter {
    /// Filter for `target` in any accepted spelling.
    pub fn new(identity_key: impl Into<String>, target: &str) -> Self {
        Self {
            identity_key: identity_key.into(),
            target: normalize(target),
        }
    }
}

impl PayloadFilter for IdentityFilter {
    fn matches(&self, payload: &ClValue) -> bool {
        match payload.map_get_str(&self.identity_key) {
            Some(ClValue::String(identity)) => equals(identity, &self.target),
            Some(ClValue::Key(key)) => equals(&key.to_formatted_string(), &self.target),
            _ => false,
        }
    }
}

/// Lazy sequence of `(transform, payload map)` pairs accepted by a filter,
/// in transform order.
pub struct Matches<'a, F: PayloadFilter> {
    transforms: std::slice::Iter<'a, Transform>,
    filter: F,
    matched: usize,
    finished: bool,
}

impl<'a, F: PayloadFilter> Matches<'a, F> {
    /// Scans `transforms` with `filter`.
    pub fn new(transforms: &'a [Transform], filter: F) -> Self {
        Self {
            transforms: transforms.iter(),
            filter,
            matched: 0,
            finished: false,
        }
    }
}

impl<'a, F: PayloadFilter> Iterator for Matches<'a, F> {
    type Item = (&'a Transform, ClValue);

    fn next(&mut self) -> Option<Self::Item> {
        for transform in self.transforms.by_ref() {
            let bytes = match &transform.kind {
                TransformKind::Write {
                    cl_type: ClType::Any,
                    bytes,
                } => bytes,
                _ => continue,
            };
            // Dictionary writes trail the envelope with the seed and item key.
            let payload = match from_tagged_bytes(bytes, &ClType::Any) {
                Ok((value, _)) => value,
                Err(err) => {
                    trace!(key = %transform.key, error = %err, "skipping undecodable write");
                    continue;
                }
            };
            if !payload.is_map() {
                trace!(key = %transform.key, cl_type = %payload.cl_type(), "skipping non-map write");
                continue;
            }
            if !self.filter.matches(&payload) {
                trace!(key = %transform.key, "skipping write from another contract");
                continue;
            }
            self.matched += 1;
            return Some((transform, payload));
        }
        if !self.finished {
            self.finished = true;
            debug!(matched = self.matched, "effect scan finished");
        }
        None
    }
}

/// Scans a successful effect for payload maps written by `target_identity`.
///
/// A failed effect yields [`EffectError::NoEffectData`] rather than an empty
/// scan. Writes that fail to decode, are not maps, or name another contract
/// are skipped.
pub fn scan<'a>(
    effect: &'a ExecutionEffect,
    target_identity: &str,
    keys: &ScanKeys,
) -> Result<Matches<'a, IdentityFilter>, EffectError> {
    let transforms = effect.usable_transforms()?;
    Ok(Matches::new(
        transforms,
        IdentityFilter::new(keys.identity_key.as_str(), target_identity),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cep78_types::{to_bytes, to_tagged_bytes};

    const PACKAGE: &str = "1f2e3d4c5b6a79881f2e3d4c5b6a79881f2e3d4c5b6a79881f2e3d4c5b6a7988";

    fn dictionary_bytes(value: &ClValue, item_key: &str) -> Vec<u8> {
        let mut bytes = to_tagged_bytes(value);
        bytes.extend_from_slice(&[0x42; 32]);
        bytes.extend(to_bytes(&ClValue::from(item_key)));
        bytes
    }

    fn event_write(key: &str, package: &str, kind: &str) -> Transform {
        let payload = ClValue::string_map([
            ("cep78_contract_package", format!("contract-package-wasm{}", package)),
            ("event_type", kind.to_string()),
        ]);
        Transform::write(key, ClType::Any, dictionary_bytes(&payload, "0"))
    }

    #[test]
    fn keeps_matching_maps_in_order() {
        let effect = ExecutionEffect::success(vec![
            event_write("a", PACKAGE, "Mint"),
            Transform::write("b", ClType::U64, vec![1, 0, 0, 0, 0, 0, 0, 0]),
            event_write("c", PACKAGE, "Transfer"),
        ]);
        let keys: Vec<&str> = scan(&effect, &format!("hash-{}", PACKAGE.to_uppercase()), &ScanKeys::default())
            .unwrap()
            .map(|(transform, _)| transform.key.as_str())
            .collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn skips_malformed_and_scalar_any_writes() {
        let effect = ExecutionEffect::success(vec![
            Transform::write("bad", ClType::Any, vec![17, 10]),
            Transform::write("scalar", ClType::Any, dictionary_bytes(&ClValue::U64(5), "1")),
            event_write("good", PACKAGE, "Burn"),
        ]);
        let matches: Vec<_> = scan(&effect, PACKAGE, &ScanKeys::default()).unwrap().collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].0.key, "good");
    }

    #[test]
    fn failed_effect_has_no_data() {
        let effect = ExecutionEffect::failure("Out of gas", vec![event_write("a", PACKAGE, "Mint")]);
        assert!(matches!(
            scan(&effect, PACKAGE, &ScanKeys::default()),
            Err(EffectError::NoEffectData { .. })
        ));
    }

    #[test]
    fn success_without_events_is_an_empty_scan() {
        let effect = ExecutionEffect::success(vec![Transform::write(
            "b",
            ClType::U64,
            to_bytes(&ClValue::U64(1)),
        )]);
        assert_eq!(scan(&effect, PACKAGE, &ScanKeys::default()).unwrap().count(), 0);
    }

    #[test]
    fn reads_dictionary_shaped_writes() {
        let effect = ExecutionEffect::success(vec![event_write("dictionary-7", PACKAGE, "Mint")]);
        let (transform, payload) = scan(&effect, &format!("hash-{}", PACKAGE), &ScanKeys::default())
            .unwrap()
            .next()
            .unwrap();
        assert_eq!(transform.key, "dictionary-7");
        assert_eq!(payload.map_get_str("event_type"), Some(&ClValue::from("Mint")));
    }

    #[test]
    fn identity_may_be_a_key() {
        let payload = ClValue::map(
            ClType::String,
            ClType::Any,
            vec![(
                ClValue::from("cep78_contract_package"),
                ClValue::Key(cep78_types::Key::Hash([0x1f; 32])),
            )],
        );
        let filter = IdentityFilter::new("cep78_contract_package", &"1f".repeat(32));
        assert!(filter.matches(&payload));
    }
}
