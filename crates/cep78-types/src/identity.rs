//! Contract identity normalization.
//!
//! The ledger spells the same 32-byte identity several ways: `hash-<hex>` in
//! named keys, `contract-package-wasm<hex>` inside event payloads, bare hex in
//! client configuration, with mixed letter case. Every comparison goes through
//! [`normalize`] on both sides.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ValidationError;
use crate::key::{Key, KEY_HASH_LENGTH};

/// Textual kind markers stripped by [`normalize`], longest first.
pub const KIND_PREFIXES: &[&str] = &[
    "contract-package-wasm",
    "contract-package-",
    "contract-wasm-",
    "contract-",
    "account-hash-",
    "hash-",
];

/// Returns the bare lowercase identifier with any kind prefix removed.
///
/// Prefixes are stripped repeatedly, so the result never starts with one and
/// `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(identifier: &str) -> String {
    let mut current = identifier.trim().to_ascii_lowercase();
    while let Some(prefix) = KIND_PREFIXES.iter().find(|p| current.starts_with(**p)) {
        current = current[prefix.len()..].trim().to_string();
    }
    current
}

/// Compares two identifiers after normalizing each.
pub fn equals(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

macro_rules! identity_newtype {
    ($name:ident, $doc:expr, $prefix:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parses any accepted spelling into the normalized identity.
            pub fn parse(value: impl AsRef<str>) -> Result<Self, ValidationError> {
                let normalized = normalize(value.as_ref());
                if !Regex::new(r"^[0-9a-f]{64}$")
                    .expect("invalid regex")
                    .is_match(&normalized)
                {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: value.as_ref().to_string(),
                    });
                }
                Ok(Self(normalized))
            }

            /// Bare lowercase hex.
            pub fn as_hex(&self) -> &str {
                &self.0
            }

            /// Decoded identity bytes.
            pub fn to_bytes(&self) -> [u8; KEY_HASH_LENGTH] {
                let mut out = [0u8; KEY_HASH_LENGTH];
                // Validated as 64 hex digits in `parse`.
                if let Ok(bytes) = hex::decode(&self.0) {
                    out.copy_from_slice(&bytes);
                }
                out
            }

            /// `Key::Hash` carrying this identity.
            pub fn to_key(&self) -> Key {
                Key::Hash(self.to_bytes())
            }

            /// True when `other` names the same identity in any spelling.
            pub fn matches(&self, other: &str) -> bool {
                normalize(other) == self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                format!("{}{}", $prefix, value.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

identity_newtype!(
    ContractHash,
    "Identity of a stored contract (`hash-<64 hex>` or bare hex).",
    "hash-"
);
identity_newtype!(
    ContractPackageHash,
    "Identity of a contract package (`hash-<64 hex>`, `contract-package-<hex>` or bare hex).",
    "hash-"
);
