//! Core type definitions for TRX transactions.
//!
//! Contract discriminators arrive from the node as names in one place and
//! numbers in another. They are normalized into [`ContractKind`] the moment
//! they are read, and nothing downstream ever matches on a raw string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::config::{
    type_url_for, ACCOUNT_PERMISSION_UPDATE_CONTRACT_CODE, ACCOUNT_PERMISSION_UPDATE_CONTRACT_NAME,
    TRANSFER_CONTRACT_CODE, TRANSFER_CONTRACT_NAME,
};

// ---------------------------------------------------------------------------
// ContractKind
// ---------------------------------------------------------------------------

/// The contract types this codec understands.
///
/// The node defines dozens; every other one is rejected with
/// `UnsupportedContract` rather than guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    /// `TransferContract`: move TRX from the owner to one receiver.
    Transfer,
    /// `AccountPermissionUpdateContract`: replace the owner, witness and
    /// active permission sets of an account (multi-signature setup).
    AccountPermissionUpdate,
}

impl ContractKind {
    /// Numeric discriminator in the node's `ContractType` enum.
    pub fn code(self) -> i32 {
        match self {
            Self::Transfer => TRANSFER_CONTRACT_CODE,
            Self::AccountPermissionUpdate => ACCOUNT_PERMISSION_UPDATE_CONTRACT_CODE,
        }
    }

    /// Name the node uses in JSON and in `type_url`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Transfer => TRANSFER_CONTRACT_NAME,
            Self::AccountPermissionUpdate => ACCOUNT_PERMISSION_UPDATE_CONTRACT_NAME,
        }
    }

    /// Full `google.protobuf.Any` type URL of the payload message.
    pub fn type_url(self) -> String {
        type_url_for(self.name())
    }

    /// Maps a numeric discriminator. Unknown codes yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            TRANSFER_CONTRACT_CODE => Some(Self::Transfer),
            ACCOUNT_PERMISSION_UPDATE_CONTRACT_CODE => Some(Self::AccountPermissionUpdate),
            _ => None,
        }
    }

    /// Maps a contract name. Matching is exact, as the node prints it.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            TRANSFER_CONTRACT_NAME => Some(Self::Transfer),
            ACCOUNT_PERMISSION_UPDATE_CONTRACT_NAME => Some(Self::AccountPermissionUpdate),
            _ => None,
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// TransactionKind
// ---------------------------------------------------------------------------

/// What a decoded transaction does, from the wallet's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// A value transfer.
    Send,
    /// A permission update that turns an account into a multi-sig wallet.
    WalletInitialization,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send => write!(f, "Send"),
            Self::WalletInitialization => write!(f, "WalletInitialization"),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionState
// ---------------------------------------------------------------------------

/// Lifecycle of a [`super::Transaction`].
///
/// `Empty` until decoded. `Decoded` carries whatever signatures the input
/// had. Each successful signing call moves to `Signed(n)`, where `n` is the
/// number of signatures now attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionState {
    Empty,
    Decoded,
    Signed(usize),
}

// ---------------------------------------------------------------------------
// Destination
// ---------------------------------------------------------------------------

/// A receiving address and the amount it receives, in sun.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Destination {
    /// Base58check address.
    pub address: String,
    /// Amount in sun (10^-6 TRX).
    pub amount: u64,
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// An opaque signature attached to a transaction.
///
/// The codec does not interpret the bytes; validity belongs to whoever
/// produced them. Serializes as a lowercase hex string, matching the
/// node's `signature` array.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    bytes: Vec<u8>,
}

impl Signature {
    /// Wraps raw signature bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Parses a hex-encoded signature. An optional `0x` prefix is accepted.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        Ok(Self {
            bytes: hex::decode(digits)?,
        })
    }

    /// Returns the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() > 16 {
            write!(f, "Signature({}...)", &hex_str[..16])
        } else {
            write!(f, "Signature({})", hex_str)
        }
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
