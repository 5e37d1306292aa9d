//! Domain-level arguments for each contract call.
//!
//! These are the caller-facing shapes (camelCase JSON); the builder turns
//! them into ordered [`RuntimeArgs`](cep78_types::RuntimeArgs).

use std::fmt;

use cep78_types::{ContractHash, Key};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::errors::ConfigError;
use crate::modalities::{
    BurnMode, EventsMode, MetadataMutability, MintingMode, NamedKeyConventionMode,
    NftHolderMode, NftIdentifierMode, NftKind, NftMetadataKind, OwnerReverseLookupMode,
    OwnershipMode, WhitelistMode,
};

/// One property of a custom metadata schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSchemaEntry {
    /// Property name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Whether minted metadata must carry the property.
    pub required: bool,
}

/// Metadata schema passed to the installer as a JSON string.
///
/// Properties keep the order the caller gave them, so the installed schema
/// string reads the same as the caller's JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Properties by name, in declaration order.
    #[serde(with = "ordered_properties")]
    pub properties: Vec<(String, JsonSchemaEntry)>,
}

impl JsonSchema {
    /// Adds or replaces a property, keeping the position of a replaced one.
    pub fn insert(&mut self, name: impl Into<String>, entry: JsonSchemaEntry) {
        let name = name.into();
        match self.properties.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = entry,
            None => self.properties.push((name, entry)),
        }
    }

    /// Looks up a property by name.
    pub fn get(&self, name: &str) -> Option<&JsonSchemaEntry> {
        self.properties
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, entry)| entry)
    }
}

mod ordered_properties {
    use super::*;

    pub fn serialize<S: Serializer>(
        properties: &[(String, JsonSchemaEntry)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(properties.len()))?;
        for (name, entry) in properties {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, JsonSchemaEntry)>, D::Error> {
        deserializer.deserialize_map(PropertiesVisitor)
    }

    struct PropertiesVisitor;

    impl<'de> Visitor<'de> for PropertiesVisitor {
        type Value = Vec<(String, JsonSchemaEntry)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of schema properties")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut schema = JsonSchema::default();
            while let Some((name, entry)) = access.next_entry::<String, JsonSchemaEntry>()? {
                schema.insert(name, entry);
            }
            Ok(schema.properties)
        }
    }
}

/// Identifies one token, by ordinal id or by hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenRef {
    /// Ordinal identifier.
    TokenId(u64),
    /// Hash identifier.
    TokenHash(String),
}

impl TokenRef {
    /// True for hash identifiers.
    pub fn is_hash(&self) -> bool {
        matches!(self, TokenRef::TokenHash(_))
    }

    /// Dictionary item key under which the contract stores per-token data.
    pub fn item_key(&self) -> String {
        match self {
            TokenRef::TokenId(id) => id.to_string(),
            TokenRef::TokenHash(hash) => hash.clone(),
        }
    }
}

/// Installer arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallArgs {
    /// Collection name.
    pub collection_name: String,
    /// Collection symbol.
    pub collection_symbol: String,
    /// Maximum number of tokens.
    pub total_token_supply: u64,
    /// Ownership mode.
    pub ownership_mode: OwnershipMode,
    /// Token kind.
    pub nft_kind: NftKind,
    /// Custom metadata schema.
    pub json_schema: JsonSchema,
    /// Metadata kind.
    pub nft_metadata_kind: NftMetadataKind,
    /// Identifier mode.
    pub identifier_mode: NftIdentifierMode,
    /// Metadata mutability.
    pub metadata_mutability: MetadataMutability,
    /// Minting mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minting_mode: Option<MintingMode>,
    /// Whether minting is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_minting: Option<bool>,
    /// Whitelist mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist_mode: Option<WhitelistMode>,
    /// Holder mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_mode: Option<NftHolderMode>,
    /// Contracts allowed to mint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_whitelist: Option<Vec<ContractHash>>,
    /// Burn mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn_mode: Option<BurnMode>,
    /// Reverse lookup mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_reverse_lookup_mode: Option<OwnerReverseLookupMode>,
    /// Event emission scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_mode: Option<EventsMode>,
    /// Named key convention.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_key_convention: Option<NamedKeyConventionMode>,
    /// Access key name for the custom convention.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_name: Option<String>,
    /// Hash key name for the custom convention.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_key_name: Option<String>,
}

/// Variables adjustable after install.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurableVariables {
    /// Whether minting is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_minting: Option<bool>,
    /// Contracts allowed to mint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_whitelist: Option<Vec<ContractHash>>,
}

/// Owner registration arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterArgs {
    /// Token owner.
    pub token_owner: Key,
}

/// Mint arguments; `meta` is stringified into `token_meta_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintArgs {
    /// Receiving owner.
    pub owner: Key,
    /// Token metadata.
    pub meta: Value,
    /// Required by the session payload, which records the mint under the
    /// collection's named keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
}

/// Burn arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnArgs {
    /// Target token.
    #[serde(flatten)]
    pub token: TokenRef,
}

/// Transfer arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferArgs {
    /// Receiving key.
    pub target: Key,
    /// Current owner.
    pub source: Key,
    /// Target token.
    #[serde(flatten)]
    pub token: TokenRef,
}

/// Single-token approval arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveArgs {
    /// Operator being approved.
    pub operator: Key,
    /// Target token.
    #[serde(flatten)]
    pub token: TokenRef,
}

/// Operator approval for every token of an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveAllArgs {
    /// Token owner.
    pub token_owner: Key,
    /// Approve (`true`) or revoke (`false`).
    pub approve_all: bool,
    /// Operator being approved.
    pub operator: Key,
}

/// Metadata update arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadataArgs {
    /// Replacement metadata.
    pub token_meta_data: Value,
}

/// Migration arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateArgs {
    /// Collection name.
    pub collection_name: String,
}

/// Session query storing an owner's balance under `key_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreBalanceOfArgs {
    /// Token owner.
    pub token_owner: Key,
    /// Named key receiving the answer.
    pub key_name: String,
}

/// Session query storing a per-token answer (owner or approved operator)
/// under `key_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreTokenQueryArgs {
    /// Named key receiving the answer.
    pub key_name: String,
    /// Target token.
    #[serde(flatten)]
    pub token: TokenRef,
}

/// Session query refreshing the caller's receipts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedReceiptsArgs {}

/// A contract call with its domain arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", content = "args", rename_all = "snake_case")]
pub enum CallArgs {
    /// Install a new contract instance.
    Install(InstallArgs),
    /// Adjust installer variables.
    SetVariables(ConfigurableVariables),
    /// Register an owner for reverse lookup.
    RegisterOwner(RegisterArgs),
    /// Mint a token.
    Mint(MintArgs),
    /// Burn a token.
    Burn(BurnArgs),
    /// Transfer a token.
    Transfer(TransferArgs),
    /// Approve an operator for one token.
    Approve(ApproveArgs),
    /// Approve or revoke an operator for all of an owner's tokens.
    SetApprovalForAll(ApproveAllArgs),
    /// Replace a token's metadata.
    SetTokenMetadata(TokenMetadataArgs),
    /// Migrate a 1.0 install.
    Migrate(MigrateArgs),
    /// Store an owner's balance (session only).
    BalanceOf(StoreBalanceOfArgs),
    /// Store a token's owner (session only).
    OwnerOf(StoreTokenQueryArgs),
    /// Store a token's approved operator (session only).
    GetApproved(StoreTokenQueryArgs),
    /// Refresh receipts (session only).
    UpdatedReceipts(UpdatedReceiptsArgs),
}

/// Which call shapes a call supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeSupport {
    /// Always carried by the installer payload.
    Installer,
    /// Stored entry point only.
    EntryPointOnly,
    /// Entry point or session payload.
    Either,
    /// Session payload only.
    SessionOnly,
}

impl CallArgs {
    /// Parses domain arguments given as JSON for the call named `call`.
    pub fn from_json(call: &str, args: Value) -> Result<Self, ConfigError> {
        let tagged = serde_json::json!({ "call": call, "args": args });
        Ok(serde_json::from_value(tagged)?)
    }

    /// Contract entry point the call targets.
    pub fn entry_point(&self) -> &'static str {
        match self {
            CallArgs::Install(_) => "install",
            CallArgs::SetVariables(_) => "set_variables",
            CallArgs::RegisterOwner(_) => "register_owner",
            CallArgs::Mint(_) => "mint",
            CallArgs::Burn(_) => "burn",
            CallArgs::Transfer(_) => "transfer",
            CallArgs::Approve(_) => "approve",
            CallArgs::SetApprovalForAll(_) => "set_approval_for_all",
            CallArgs::SetTokenMetadata(_) => "set_token_metadata",
            CallArgs::Migrate(_) => "migrate",
            CallArgs::BalanceOf(_) => "balance_of",
            CallArgs::OwnerOf(_) => "owner_of",
            CallArgs::GetApproved(_) => "get_approved",
            CallArgs::UpdatedReceipts(_) => "updated_receipts",
        }
    }

    /// Bundled session binary used when the caller supplies none.
    pub fn default_session_wasm(&self) -> Option<&'static str> {
        match self {
            CallArgs::Install(_) => Some("contract.wasm"),
            CallArgs::Mint(_) => Some("mint_call.wasm"),
            CallArgs::Transfer(_) => Some("transfer_call.wasm"),
            CallArgs::BalanceOf(_) => Some("balance_of_call.wasm"),
            CallArgs::OwnerOf(_) | CallArgs::GetApproved(_) => Some("owner_of_call.wasm"),
            CallArgs::UpdatedReceipts(_) => Some("updated_receipts.wasm"),
            _ => None,
        }
    }

    /// Call shapes this call supports.
    pub fn shape_support(&self) -> ShapeSupport {
        match self {
            CallArgs::Install(_) => ShapeSupport::Installer,
            CallArgs::Mint(_) | CallArgs::Transfer(_) => ShapeSupport::Either,
            CallArgs::BalanceOf(_)
            | CallArgs::OwnerOf(_)
            | CallArgs::GetApproved(_)
            | CallArgs::UpdatedReceipts(_) => ShapeSupport::SessionOnly,
            _ => ShapeSupport::EntryPointOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const OWNER: &str = "account-hash-2c4a11c062a8a337bfc97e27fd66291caeb2c65865dcb5d3ef3759c4c97efecb";

    #[test]
    fn token_ref_json_forms() {
        let by_id: BurnArgs = serde_json::from_value(json!({ "tokenId": 7 })).unwrap();
        assert_eq!(by_id.token, TokenRef::TokenId(7));
        let by_hash: BurnArgs = serde_json::from_value(json!({ "tokenHash": "abc" })).unwrap();
        assert!(by_hash.token.is_hash());
        assert_eq!(by_hash.token.item_key(), "abc");
    }

    #[test]
    fn from_json_selects_call() {
        let call = CallArgs::from_json(
            "mint",
            json!({ "owner": OWNER, "meta": { "name": "x" } }),
        )
        .unwrap();
        assert_eq!(call.entry_point(), "mint");
        assert_eq!(call.shape_support(), ShapeSupport::Either);
        assert_eq!(call.default_session_wasm(), Some("mint_call.wasm"));
    }

    #[test]
    fn schema_properties_keep_caller_order() {
        let raw = r#"{ "properties": {
            "size": { "name": "size", "description": "Size", "required": false },
            "color": { "name": "color", "description": "Color", "required": true },
            "age": { "name": "age", "description": "Age", "required": false }
        } }"#;
        let schema: JsonSchema = serde_json::from_str(raw).unwrap();
        let names: Vec<&str> = schema.properties.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["size", "color", "age"]);

        let text = serde_json::to_string(&schema).unwrap();
        let size = text.find("\"size\"").unwrap();
        let color = text.find("\"color\"").unwrap();
        let age = text.find("\"age\"").unwrap();
        assert!(size < color && color < age);
    }

    #[test]
    fn schema_insert_replaces_in_place() {
        let entry = |description: &str| JsonSchemaEntry {
            name: "color".to_string(),
            description: description.to_string(),
            required: true,
        };
        let mut schema = JsonSchema::default();
        schema.insert("color", entry("old"));
        schema.insert("size", entry("size"));
        schema.insert("color", entry("new"));
        assert_eq!(schema.properties.len(), 2);
        assert_eq!(schema.properties[0].0, "color");
        assert_eq!(schema.get("color").unwrap().description, "new");
    }

    #[test]
    fn from_json_unknown_call() {
        let err = CallArgs::from_json("mint_everything", json!({})).unwrap_err();
        assert!(matches!(err, ConfigError::Serialization(_)));
    }

    #[test]
    fn install_optional_fields_default_to_none() {
        let args: InstallArgs = serde_json::from_value(json!({
            "collectionName": "enhanced-nft-1",
            "collectionSymbol": "ENFT-1",
            "totalTokenSupply": 10,
            "ownershipMode": 2,
            "nftKind": 1,
            "jsonSchema": { "properties": {} },
            "nftMetadataKind": 0,
            "identifierMode": 0,
            "metadataMutability": 0
        }))
        .unwrap();
        assert_eq!(args.ownership_mode, OwnershipMode::Transferable);
        assert!(args.minting_mode.is_none());
        assert!(args.contract_whitelist.is_none());
    }
}
