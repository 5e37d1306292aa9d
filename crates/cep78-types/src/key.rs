//! Global state keys and their formatted-string representation.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::bytesrepr::Reader;
use crate::errors::{DecodeError, ValidationError};

/// Width of every key identifier in bytes.
pub const KEY_HASH_LENGTH: usize = 32;

/// Key sub-tag: account.
pub const KEY_TAG_ACCOUNT: u8 = 0;
/// Key sub-tag: hash (contract, package, wasm).
pub const KEY_TAG_HASH: u8 = 1;
/// Key sub-tag: unforgeable reference.
pub const KEY_TAG_UREF: u8 = 2;

const ACCOUNT_PREFIX: &str = "account-hash-";
const HASH_PREFIX: &str = "hash-";
const UREF_PREFIX: &str = "uref-";

/// Unforgeable reference: address plus access rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct URef {
    /// Storage address.
    pub addr: [u8; KEY_HASH_LENGTH],
    /// Access-rights bit set (read = 1, write = 2, add = 4).
    pub access_rights: u8,
}

/// A key into global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Account hash.
    Account([u8; KEY_HASH_LENGTH]),
    /// Contract, package or wasm hash.
    Hash([u8; KEY_HASH_LENGTH]),
    /// Unforgeable reference.
    URef(URef),
}

impl Key {
    /// Sub-tag byte written before the identifier.
    pub fn tag(&self) -> u8 {
        match self {
            Key::Account(_) => KEY_TAG_ACCOUNT,
            Key::Hash(_) => KEY_TAG_HASH,
            Key::URef(_) => KEY_TAG_UREF,
        }
    }

    /// Identifier bytes without the sub-tag.
    pub fn addr(&self) -> &[u8; KEY_HASH_LENGTH] {
        match self {
            Key::Account(addr) | Key::Hash(addr) => addr,
            Key::URef(uref) => &uref.addr,
        }
    }

    pub(crate) fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(self.tag());
        out.extend_from_slice(self.addr());
        if let Key::URef(uref) = self {
            out.push(uref.access_rights);
        }
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Key, DecodeError> {
        let tag = reader.u8()?;
        let key = match tag {
            KEY_TAG_ACCOUNT => Key::Account(reader.array()?),
            KEY_TAG_HASH => Key::Hash(reader.array()?),
            KEY_TAG_UREF => {
                let addr = reader.array()?;
                let access_rights = reader.u8()?;
                Key::URef(URef {
                    addr,
                    access_rights,
                })
            }
            other => {
                return Err(DecodeError::invalid(
                    "Key",
                    format!("unknown key tag {}", other),
                ))
            }
        };
        Ok(key)
    }

    /// Formatted string, e.g. `account-hash-<hex>` or `uref-<hex>-007`.
    pub fn to_formatted_string(&self) -> String {
        match self {
            Key::Account(addr) => format!("{}{}", ACCOUNT_PREFIX, hex::encode(addr)),
            Key::Hash(addr) => format!("{}{}", HASH_PREFIX, hex::encode(addr)),
            Key::URef(uref) => format!(
                "{}{}-{:03o}",
                UREF_PREFIX,
                hex::encode(uref.addr),
                uref.access_rights
            ),
        }
    }

    /// Parses a formatted key string.
    pub fn from_formatted_str(input: &str) -> Result<Key, ValidationError> {
        let mismatch = || ValidationError::PatternMismatch {
            field: "Key",
            value: input.to_string(),
        };
        if let Some(rest) = input.strip_prefix(ACCOUNT_PREFIX) {
            return parse_addr(rest).map(Key::Account).ok_or_else(mismatch);
        }
        if let Some(rest) = input.strip_prefix(HASH_PREFIX) {
            return parse_addr(rest).map(Key::Hash).ok_or_else(mismatch);
        }
        if let Some(rest) = input.strip_prefix(UREF_PREFIX) {
            let (addr, rights) = rest.rsplit_once('-').ok_or_else(mismatch)?;
            if rights.len() != 3 {
                return Err(mismatch());
            }
            let addr = parse_addr(addr).ok_or_else(mismatch)?;
            let access_rights = u8::from_str_radix(rights, 8).map_err(|_| mismatch())?;
            return Ok(Key::URef(URef {
                addr,
                access_rights,
            }));
        }
        Err(mismatch())
    }
}

fn parse_addr(hex_str: &str) -> Option<[u8; KEY_HASH_LENGTH]> {
    let bytes = hex::decode(hex_str).ok()?;
    bytes.try_into().ok()
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_formatted_string())
    }
}

impl FromStr for Key {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::from_formatted_str(s)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_formatted_string())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Key::from_formatted_str(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "2f3b8bf4e4f3a2d6c5d0b1a3f4e5d6c7b8a9f0e1d2c3b4a5968778695a4b3c2d";

    #[test]
    fn formatted_strings_round_trip() {
        for text in [
            format!("account-hash-{}", ADDR),
            format!("hash-{}", ADDR),
            format!("uref-{}-007", ADDR),
        ] {
            let key: Key = text.parse().unwrap();
            assert_eq!(key.to_formatted_string(), text);
        }
    }

    #[test]
    fn uref_access_rights_are_octal() {
        let key = Key::from_formatted_str(&format!("uref-{}-007", ADDR)).unwrap();
        match key {
            Key::URef(uref) => assert_eq!(uref.access_rights, 7),
            other => panic!("expected uref, got {:?}", other),
        }
    }

    #[test]
    fn rejects_short_or_unprefixed_keys() {
        assert!(Key::from_formatted_str("hash-abcd").is_err());
        assert!(Key::from_formatted_str(ADDR).is_err());
        assert!(Key::from_formatted_str(&format!("uref-{}-7", ADDR)).is_err());
    }

    #[test]
    fn serde_uses_formatted_string() {
        let key = Key::Hash([0xab; 32]);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"hash-{}\"", "ab".repeat(32)));
        let back: Key = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
