//! Extraction configuration.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::events::Cep47Event;

/// Map key carrying the emitting contract's package identity.
pub const DEFAULT_IDENTITY_KEY: &str = "cep78_contract_package";
/// Map key carrying the event kind.
pub const DEFAULT_EVENT_KIND_KEY: &str = "event_type";

/// Lookup keys used inside event payload maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanKeys {
    /// Key whose value is the emitting contract identity.
    #[serde(default = "default_identity_key")]
    pub identity_key: String,
    /// Key whose value names the event.
    #[serde(default = "default_event_kind_key")]
    pub event_kind_key: String,
}

fn default_identity_key() -> String {
    DEFAULT_IDENTITY_KEY.to_string()
}

fn default_event_kind_key() -> String {
    DEFAULT_EVENT_KIND_KEY.to_string()
}

impl Default for ScanKeys {
    fn default() -> Self {
        Self {
            identity_key: default_identity_key(),
            event_kind_key: default_event_kind_key(),
        }
    }
}

/// Event extractor configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Payload lookup keys.
    #[serde(default)]
    pub keys: ScanKeys,
    /// Event names to emit; anything else is ignored.
    #[serde(default)]
    pub recognized_names: Vec<String>,
}

impl ExtractorConfig {
    /// Configuration recognizing the given names with default keys.
    pub fn new<S: AsRef<str>>(recognized_names: &[S]) -> Self {
        Self {
            keys: ScanKeys::default(),
            recognized_names: recognized_names
                .iter()
                .map(|name| name.as_ref().to_string())
                .collect(),
        }
    }

    /// Recognizes every event the contract emits in CEP-47 mode.
    pub fn cep47() -> Self {
        Self::new(&Cep47Event::ALL.map(Cep47Event::as_str)[..])
    }

    /// Parses a JSON configuration document.
    pub fn from_json(input: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(input)?)
    }

    /// True when `name` is in the recognized set.
    pub fn recognizes(&self, name: &str) -> bool {
        self.recognized_names.iter().any(|known| known == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_default_when_omitted() {
        let config = ExtractorConfig::from_json(r#"{ "recognized_names": ["Mint"] }"#).unwrap();
        assert_eq!(config.keys, ScanKeys::default());
        assert!(config.recognizes("Mint"));
        assert!(!config.recognizes("Burn"));
    }

    #[test]
    fn partial_keys_override() {
        let config =
            ExtractorConfig::from_json(r#"{ "keys": { "event_kind_key": "kind" } }"#).unwrap();
        assert_eq!(config.keys.identity_key, DEFAULT_IDENTITY_KEY);
        assert_eq!(config.keys.event_kind_key, "kind");
        assert!(config.recognized_names.is_empty());
    }

    #[test]
    fn cep47_set_is_complete() {
        let config = ExtractorConfig::cep47();
        assert_eq!(config.recognized_names.len(), Cep47Event::ALL.len());
        assert!(config.recognizes("ApprovalForAll"));
    }
}
