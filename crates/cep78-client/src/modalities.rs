//! Contract modalities fixed at install time.
//!
//! Each modality travels as a `U8` discriminant both in installer arguments
//! and in the contract's named keys. JSON uses the same numbers.

use cep78_types::ClValue;
use serde::{Deserialize, Serialize};

use crate::errors::StateError;

/// A `U8`-encoded contract modality.
pub trait Modality: Copy + Into<u8> + TryFrom<u8, Error = StateError> {
    /// Named key under which the installed contract stores this modality.
    const NAMED_KEY: &'static str;

    /// Decodes the modality from a stored `U8` value.
    fn from_value(value: &ClValue) -> Result<Self, StateError> {
        match value {
            ClValue::U8(raw) => Self::try_from(*raw),
            other => Err(StateError::UnexpectedType {
                expected: "U8",
                found: other.cl_type(),
            }),
        }
    }
}

macro_rules! modality {
    (
        $(#[$meta:meta])*
        $name:ident, $named_key:expr, {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl Modality for $name {
            const NAMED_KEY: &'static str = $named_key;
        }

        impl TryFrom<u8> for $name {
            type Error = StateError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok($name::$variant),)+
                    other => Err(StateError::UnknownDiscriminant {
                        modality: stringify!($name),
                        value: other,
                    }),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl From<$name> for ClValue {
            fn from(value: $name) -> ClValue {
                ClValue::U8(value as u8)
            }
        }
    };
}

modality!(
    /// Who may hold and move tokens.
    OwnershipMode, "ownership_mode", {
        /// Tokens stay with the minter.
        Minter = 0,
        /// Minted to an assignee, not transferable afterwards.
        Assigned = 1,
        /// Freely transferable.
        Transferable = 2,
    }
);

modality!(
    /// What a token represents.
    NftKind, "nft_kind", {
        /// Physical good.
        Physical = 0,
        /// Digital asset.
        Digital = 1,
        /// Virtual item.
        Virtual = 2,
    }
);

modality!(
    /// Which kinds of key may own tokens.
    NftHolderMode, "holder_mode", {
        /// Accounts only.
        Accounts = 0,
        /// Contracts only.
        Contracts = 1,
        /// Accounts and contracts.
        Mixed = 2,
    }
);

modality!(
    /// Metadata schema enforced on mint.
    NftMetadataKind, "nft_metadata_kind", {
        /// CEP-78 standard metadata.
        CEP78 = 0,
        /// ERC-721 style metadata.
        NFT721 = 1,
        /// Unvalidated string.
        Raw = 2,
        /// Validated against the installer's JSON schema.
        CustomValidated = 3,
    }
);

impl NftMetadataKind {
    /// Dictionary holding token metadata of this kind.
    pub fn dictionary_name(self) -> &'static str {
        match self {
            NftMetadataKind::CEP78 => "metadata_cep78",
            NftMetadataKind::NFT721 => "metadata_nft721",
            NftMetadataKind::Raw => "metadata_raw",
            NftMetadataKind::CustomValidated => "metadata_custom_validated",
        }
    }
}

modality!(
    /// How tokens are identified.
    NftIdentifierMode, "identifier_mode", {
        /// Sequential `u64` ids.
        Ordinal = 0,
        /// Hash of the metadata.
        Hash = 1,
    }
);

modality!(
    /// Whether metadata may change after mint.
    MetadataMutability, "metadata_mutability", {
        /// Fixed at mint.
        Immutable = 0,
        /// Updatable through `set_token_metadata`.
        Mutable = 1,
    }
);

modality!(
    /// Who may mint.
    MintingMode, "minting_mode", {
        /// Installing account only.
        Installer = 0,
        /// Anyone.
        Public = 1,
    }
);

modality!(
    /// Whether tokens can be burnt.
    BurnMode, "burn_mode", {
        /// Burning allowed.
        Burnable = 0,
        /// Burning disabled.
        NonBurnable = 1,
    }
);

modality!(
    /// Whether the contract whitelist may change.
    WhitelistMode, "whitelist_mode", {
        /// Whitelist can be updated.
        Unlocked = 0,
        /// Whitelist is fixed at install.
        Locked = 1,
    }
);

modality!(
    /// Owner-to-token reverse lookup tracking.
    OwnerReverseLookupMode, "reporting_mode", {
        /// No reverse lookup.
        NoLookUp = 0,
        /// Tracks mints and transfers.
        Complete = 1,
        /// Tracks transfers only.
        TransfersOnly = 2,
    }
);

modality!(
    /// Event emission scheme.
    EventsMode, "events_mode", {
        /// No events.
        NoEvents = 0,
        /// CEP-47 style dictionary events.
        CEP47 = 1,
        /// Casper Event Standard.
        CES = 2,
    }
);

modality!(
    /// How the installer names the contract's named keys.
    #[allow(non_camel_case_types)]
    NamedKeyConventionMode, "named_key_convention", {
        /// Derived from the collection name.
        DerivedFromCollectionName = 0,
        /// Fixed names used by 1.0 installs.
        V1_0Standard = 1,
        /// Caller-supplied access and hash key names.
        V1_0Custom = 2,
    }
);
