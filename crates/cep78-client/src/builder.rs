//! Call argument builder.
//!
//! Turns [`CallArgs`] into an ordered [`RuntimeArgs`] plus the payload the
//! transport should carry. Field order is fixed per call so repeated builds
//! produce byte-identical argument bytes.

use cep78_types::{ClType, ClValue, ContractHash, ContractPackageHash, Key, RuntimeArgs};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calls::{CallArgs, InstallArgs, MintArgs, ShapeSupport, TokenRef};
use crate::errors::ConfigError;
use crate::modalities::{MetadataMutability, NamedKeyConventionMode, NftIdentifierMode};

/// Target contract, as configured by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractIdentity {
    /// Stored contract hash.
    pub contract_hash: ContractHash,
    /// Package hash, required by package-level session calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_package_hash: Option<ContractPackageHash>,
}

impl ContractIdentity {
    /// Parses the identity from any accepted textual spelling.
    pub fn parse(contract_hash: &str, contract_package_hash: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self {
            contract_hash: ContractHash::parse(contract_hash)?,
            contract_package_hash: contract_package_hash
                .map(ContractPackageHash::parse)
                .transpose()?,
        })
    }
}

/// Per-call packaging choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallConfig {
    /// Carry the call in a session payload instead of invoking the stored
    /// entry point.
    #[serde(default)]
    pub use_session_code: bool,
    /// Caller-supplied session binary; the bundled one is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_payload: Option<Vec<u8>>,
}

impl CallConfig {
    /// Entry-point shape.
    pub fn entry_point() -> Self {
        Self::default()
    }

    /// Session shape with the bundled binary.
    pub fn session() -> Self {
        Self {
            use_session_code: true,
            session_payload: None,
        }
    }

    /// Session shape with caller-supplied bytes.
    pub fn session_with(wasm: Vec<u8>) -> Self {
        Self {
            use_session_code: true,
            session_payload: Some(wasm),
        }
    }
}

/// How the transport packages a prepared call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    /// Invoke a stored entry point by contract identity.
    EntryPoint,
    /// Execute a bundled session payload.
    Session,
}

/// Session binary carried by a [`CallPayload::Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionWasm {
    /// Name of a binary shipped alongside the client.
    Bundled(&'static str),
    /// Bytes supplied by the caller.
    Provided(Vec<u8>),
}

/// What the transport submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallPayload {
    /// Stored contract invocation.
    StoredContract {
        /// Entry point name.
        entry_point: &'static str,
    },
    /// Session execution.
    Session {
        /// Session binary.
        wasm: SessionWasm,
    },
}

/// A fully prepared call, ready for signing by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCall {
    /// Selected shape.
    pub shape: CallShape,
    /// Payload to submit.
    pub payload: CallPayload,
    /// Ordered arguments.
    pub args: RuntimeArgs,
}

impl PreparedCall {
    /// Serialized arguments.
    pub fn args_bytes(&self) -> Vec<u8> {
        self.args.to_bytes()
    }
}

/// Builds call arguments for one contract instance.
#[derive(Debug, Clone, Default)]
pub struct ArgsBuilder {
    identity: Option<ContractIdentity>,
}

impl ArgsBuilder {
    /// Builder with no target contract; only install and entry-point calls
    /// can be prepared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder targeting `identity`.
    pub fn with_identity(identity: ContractIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Configured target contract.
    pub fn identity(&self) -> Option<&ContractIdentity> {
        self.identity.as_ref()
    }

    /// Parses `args` as JSON domain arguments for `call` and builds them.
    pub fn build_json(
        &self,
        call: &str,
        args: serde_json::Value,
        config: &CallConfig,
    ) -> Result<PreparedCall, ConfigError> {
        self.build(&CallArgs::from_json(call, args)?, config)
    }

    /// Builds the ordered arguments and payload for `call`.
    pub fn build(&self, call: &CallArgs, config: &CallConfig) -> Result<PreparedCall, ConfigError> {
        let entry_point = call.entry_point();
        let support = call.shape_support();
        let shape = select_shape(entry_point, support, config)?;

        let mut args = RuntimeArgs::new();
        match call {
            CallArgs::Install(install) => install_args(install, &mut args)?,
            CallArgs::SetVariables(vars) => {
                args.insert_opt("allow_minting", vars.allow_minting);
                if let Some(whitelist) = &vars.contract_whitelist {
                    args.insert("contract_whitelist", key_list(whitelist));
                }
            }
            CallArgs::RegisterOwner(register) => {
                args.insert("token_owner", register.token_owner.clone());
            }
            CallArgs::Mint(mint) => self.mint_args(mint, shape, &mut args)?,
            CallArgs::Burn(burn) => insert_token(&burn.token, &mut args),
            CallArgs::Transfer(transfer) => {
                args.insert("target_key", transfer.target.clone());
                args.insert("source_key", transfer.source.clone());
                args.insert("is_hash_identifier_mode", transfer.token.is_hash());
                insert_token(&transfer.token, &mut args);
                if shape == CallShape::Session {
                    args.insert("nft_contract_hash", self.contract_key()?);
                }
            }
            CallArgs::Approve(approve) => {
                args.insert("operator", approve.operator.clone());
                insert_token(&approve.token, &mut args);
            }
            CallArgs::SetApprovalForAll(approve) => {
                args.insert("token_owner", approve.token_owner.clone());
                args.insert("approve_all", approve.approve_all);
                args.insert("operator", approve.operator.clone());
            }
            CallArgs::SetTokenMetadata(update) => {
                args.insert(
                    "token_meta_data",
                    serde_json::to_string(&update.token_meta_data)?,
                );
            }
            CallArgs::Migrate(migrate) => {
                args.insert("collection_name", migrate.collection_name.as_str());
            }
            CallArgs::BalanceOf(query) => {
                args.insert("nft_contract_hash", self.contract_key()?);
                args.insert("token_owner", query.token_owner.clone());
                args.insert("key_name", query.key_name.as_str());
            }
            CallArgs::OwnerOf(query) | CallArgs::GetApproved(query) => {
                args.insert("nft_contract_hash", self.contract_key()?);
                args.insert("key_name", query.key_name.as_str());
                args.insert("is_hash_identifier_mode", query.token.is_hash());
                insert_token(&query.token, &mut args);
            }
            CallArgs::UpdatedReceipts(_) => {
                args.insert("nft_contract_package_hash", self.package_key()?);
            }
        }

        let payload = match shape {
            CallShape::EntryPoint => CallPayload::StoredContract { entry_point },
            CallShape::Session => CallPayload::Session {
                wasm: match (&config.session_payload, call.default_session_wasm()) {
                    (Some(bytes), _) => SessionWasm::Provided(bytes.clone()),
                    (None, Some(name)) => SessionWasm::Bundled(name),
                    (None, None) => return Err(ConfigError::MissingRequiredField("session_payload")),
                },
            },
        };

        debug!(
            entry_point,
            shape = ?shape,
            args = args.len(),
            "prepared contract call"
        );
        Ok(PreparedCall {
            shape,
            payload,
            args,
        })
    }

    fn mint_args(&self, mint: &MintArgs, shape: CallShape, args: &mut RuntimeArgs) -> Result<(), ConfigError> {
        args.insert("token_owner", mint.owner.clone());
        args.insert("token_meta_data", serde_json::to_string(&mint.meta)?);
        if shape == CallShape::Session {
            args.insert("nft_contract_hash", self.contract_key()?);
            let collection_name = mint
                .collection_name
                .as_deref()
                .ok_or(ConfigError::MissingRequiredField("collection_name"))?;
            args.insert("collection_name", collection_name);
        }
        Ok(())
    }

    fn contract_key(&self) -> Result<Key, ConfigError> {
        self.identity
            .as_ref()
            .map(|identity| identity.contract_hash.to_key())
            .ok_or(ConfigError::MissingRequiredField("contract_hash"))
    }

    fn package_key(&self) -> Result<Key, ConfigError> {
        self.identity
            .as_ref()
            .and_then(|identity| identity.contract_package_hash.as_ref())
            .map(ContractPackageHash::to_key)
            .ok_or(ConfigError::MissingRequiredField("contract_package_hash"))
    }
}

fn select_shape(
    entry_point: &str,
    support: ShapeSupport,
    config: &CallConfig,
) -> Result<CallShape, ConfigError> {
    if support == ShapeSupport::Installer {
        return Ok(CallShape::Session);
    }
    if !config.use_session_code && config.session_payload.is_some() {
        return Err(ConfigError::ConflictingConfiguration(format!(
            "{} requested as an entry-point call but a session payload was supplied",
            entry_point
        )));
    }
    match (support, config.use_session_code) {
        (ShapeSupport::EntryPointOnly, true) => Err(ConfigError::ConflictingConfiguration(
            format!("{} has no session form", entry_point),
        )),
        (ShapeSupport::SessionOnly, false) => Err(ConfigError::ConflictingConfiguration(
            format!("{} is only available as a session call", entry_point),
        )),
        (_, true) => Ok(CallShape::Session),
        (_, false) => Ok(CallShape::EntryPoint),
    }
}

fn install_args(install: &InstallArgs, args: &mut RuntimeArgs) -> Result<(), ConfigError> {
    if install.identifier_mode == NftIdentifierMode::Hash
        && install.metadata_mutability == MetadataMutability::Mutable
    {
        return Err(ConfigError::ConflictingConfiguration(
            "hash identifier mode cannot be combined with mutable metadata".to_string(),
        ));
    }
    if install.named_key_convention == Some(NamedKeyConventionMode::V1_0Custom)
        && (install.access_key_name.is_none() || install.hash_key_name.is_none())
    {
        return Err(ConfigError::ConflictingConfiguration(
            "custom named key convention requires both access_key_name and hash_key_name"
                .to_string(),
        ));
    }

    args.insert("collection_name", install.collection_name.as_str());
    args.insert("collection_symbol", install.collection_symbol.as_str());
    args.insert("total_token_supply", install.total_token_supply);
    args.insert("ownership_mode", install.ownership_mode);
    args.insert("nft_kind", install.nft_kind);
    args.insert("json_schema", serde_json::to_string(&install.json_schema)?);
    args.insert("nft_metadata_kind", install.nft_metadata_kind);
    args.insert("identifier_mode", install.identifier_mode);
    args.insert("metadata_mutability", install.metadata_mutability);

    args.insert_opt("minting_mode", install.minting_mode);
    args.insert_opt("allow_minting", install.allow_minting);
    args.insert_opt("whitelist_mode", install.whitelist_mode);
    args.insert_opt("holder_mode", install.holder_mode);
    if let Some(whitelist) = &install.contract_whitelist {
        args.insert("contract_whitelist", key_list(whitelist));
    }
    args.insert_opt("burn_mode", install.burn_mode);
    args.insert_opt("owner_reverse_lookup_mode", install.owner_reverse_lookup_mode);
    args.insert_opt("events_mode", install.events_mode);
    args.insert_opt("named_key_convention", install.named_key_convention);
    args.insert_opt("access_key_name", install.access_key_name.clone());
    args.insert_opt("hash_key_name", install.hash_key_name.clone());
    Ok(())
}

fn key_list(hashes: &[ContractHash]) -> ClValue {
    ClValue::list(
        ClType::Key,
        hashes.iter().map(|hash| ClValue::Key(hash.to_key())).collect(),
    )
}

// Hash identifiers travel as strings; ordinals as U64.
fn insert_token(token: &TokenRef, args: &mut RuntimeArgs) {
    match token {
        TokenRef::TokenId(id) => args.insert("token_id", *id),
        TokenRef::TokenHash(hash) => args.insert("token_hash", hash.as_str()),
    }
}
