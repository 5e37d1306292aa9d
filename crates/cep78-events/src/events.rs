//! Domain events recovered from execution effects.

use std::fmt;
use std::str::FromStr;

use cep78_types::ClValue;
use serde_json::{json, Value};

/// A recognized event and its decoded payload map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEvent {
    /// Event name, taken from the payload's event-kind entry.
    pub name: String,
    /// Decoded payload; always a `Map`.
    pub payload: ClValue,
}

impl DomainEvent {
    /// String value of payload entry `key`.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.payload.map_get_str(key).and_then(ClValue::as_str)
    }

    /// The CEP-47 event this names, if any.
    pub fn cep47(&self) -> Option<Cep47Event> {
        self.name.parse().ok()
    }

    /// JSON rendering with the payload in stored order.
    pub fn to_json(&self) -> Value {
        json!({ "name": self.name, "payload": self.payload.to_json() })
    }
}

/// Events the contract records in CEP-47 mode.
///
/// [`as_str`](Cep47Event::as_str) gives the name written into the payload,
/// which differs from the variant name for approvals and migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cep47Event {
    /// Token minted; carries `recipient`, `token_id`.
    Mint,
    /// Token burnt; carries `owner`, `token_id`, `burner`.
    Burn,
    /// Operator approved for a token; carries `owner`, `spender`, `token_id`.
    ApprovalGranted,
    /// Token approval revoked; carries `owner`, `token_id`.
    ApprovalRevoked,
    /// Operator approved for all tokens; carries `owner`, `operator`.
    ApprovalForAll,
    /// Operator revoked for all tokens; carries `owner`, `operator`.
    RevokedForAll,
    /// Token transferred; carries `sender`, `recipient`, `token_id`.
    Transfer,
    /// Metadata replaced; carries `token_id`.
    MetadataUpdate,
    /// Installer variables changed.
    VariablesSet,
    /// Contract migrated from 1.0.
    Migrate,
}

impl Cep47Event {
    /// Every event, in declaration order.
    pub const ALL: [Cep47Event; 10] = [
        Cep47Event::Mint,
        Cep47Event::Burn,
        Cep47Event::ApprovalGranted,
        Cep47Event::ApprovalRevoked,
        Cep47Event::ApprovalForAll,
        Cep47Event::RevokedForAll,
        Cep47Event::Transfer,
        Cep47Event::MetadataUpdate,
        Cep47Event::VariablesSet,
        Cep47Event::Migrate,
    ];

    /// Name as written to the `event_type` entry.
    pub fn as_str(self) -> &'static str {
        match self {
            Cep47Event::Mint => "Mint",
            Cep47Event::Burn => "Burn",
            Cep47Event::ApprovalGranted => "Approve",
            Cep47Event::ApprovalRevoked => "ApprovalRevoked",
            Cep47Event::ApprovalForAll => "ApprovalForAll",
            Cep47Event::RevokedForAll => "RevokedForAll",
            Cep47Event::Transfer => "Transfer",
            Cep47Event::MetadataUpdate => "MetadataUpdate",
            Cep47Event::VariablesSet => "VariablesSet",
            Cep47Event::Migrate => "Migration",
        }
    }
}

impl fmt::Display for Cep47Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cep47Event {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cep47Event::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| format!("unknown CEP-47 event '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for event in Cep47Event::ALL {
            assert_eq!(event.as_str().parse::<Cep47Event>().unwrap(), event);
        }
        assert_eq!(Cep47Event::ApprovalGranted.to_string(), "Approve");
        assert_eq!("Migration".parse::<Cep47Event>().unwrap(), Cep47Event::Migrate);
        assert!("Migrate".parse::<Cep47Event>().is_err());
    }

    #[test]
    fn field_lookup() {
        let event = DomainEvent {
            name: "Transfer".to_string(),
            payload: ClValue::string_map([("event_type", "Transfer"), ("token_id", "3")]),
        };
        assert_eq!(event.field("token_id"), Some("3"));
        assert_eq!(event.field("owner"), None);
        assert_eq!(event.cep47(), Some(Cep47Event::Transfer));
    }
}
