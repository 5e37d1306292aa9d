//! Event extractor.

use cep78_types::ClValue;
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::effect::ExecutionEffect;
use crate::error::EffectError;
use crate::events::DomainEvent;
use crate::scanner::scan;

/// Events recovered from one effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEvents {
    /// True when at least one event was recognized.
    pub matched: bool,
    /// Events in execution order.
    pub events: Vec<DomainEvent>,
}

/// Extracts recognized events written by `target_identity`.
///
/// A failed effect yields [`EffectError::NoEffectData`]: its transforms are
/// not available, which is different from an execution that emitted nothing.
pub fn extract(
    effect: &ExecutionEffect,
    target_identity: &str,
    config: &ExtractorConfig,
) -> Result<ExtractedEvents, EffectError> {
    let matches = scan(effect, target_identity, &config.keys).map_err(|err| {
        debug!(error = %err, "execution failed, no events to extract");
        err
    })?;

    let events: Vec<DomainEvent> = matches
        .filter_map(|(transform, payload)| {
            let name = payload
                .map_get_str(&config.keys.event_kind_key)
                .and_then(ClValue::as_str)?;
            if !config.recognizes(name) {
                return None;
            }
            debug!(key = %transform.key, event = name, "extracted event");
            let name = name.to_string();
            Some(DomainEvent { name, payload })
        })
        .collect();

    Ok(ExtractedEvents {
        matched: !events.is_empty(),
        events,
    })
}

/// Extracts with default payload keys and the given recognized names.
pub fn extract_named<S: AsRef<str>>(
    effect: &ExecutionEffect,
    target_identity: &str,
    recognized_names: &[S],
) -> Result<ExtractedEvents, EffectError> {
    extract(effect, target_identity, &ExtractorConfig::new(recognized_names))
}
