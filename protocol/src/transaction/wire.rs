//! Node JSON wire format.
//!
//! The node hands out transactions as JSON:
//!
//! ```json
//! {
//!   "txID": "77083f84...",
//!   "raw_data": {
//!     "contract": [{
//!       "parameter": { "value": { ... }, "type_url": "type.googleapis.com/protocol.TransferContract" },
//!       "type": "TransferContract"
//!     }],
//!     "ref_block_bytes": "e3fc",
//!     "ref_block_hash": "2f4d6e8a1b3c5d7e",
//!     "expiration": 1571811468000,
//!     "timestamp": 1571811410819
//!   },
//!   "raw_data_hex": "0a02e3fc...",
//!   "signature": ["ddd47d52..."]
//! }
//! ```
//!
//! `raw_data_hex` is the authoritative body; `raw_data` is a readable echo of
//! it. Callers may pass the JSON text or an already-parsed value, and both go
//! through the same serde types, so they decode identically.
//!
//! [`WireTransaction::normalize`] performs the text-to-binary step: every hex
//! field becomes bytes, every contract `type` (a name or a number) becomes a
//! [`ContractKind`]. Nothing past this module sees wire text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ParseError;
use super::types::{ContractKind, Signature};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A transaction as the node serializes it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WireTransaction {
    #[serde(rename = "txID", default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<WireRawData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data_hex: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Vec<String>>,

    /// Node flag: addresses in `raw_data` are base58 rather than hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// Readable echo of the binary body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WireRawData {
    #[serde(default)]
    pub contract: Vec<WireContract>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_block_bytes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_block_num: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_block_hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_limit: Option<i64>,

    /// Memo, hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireContract {
    pub parameter: WireParameter,

    #[serde(rename = "type")]
    pub kind: WireContractType,

    #[serde(rename = "Permission_id", default, skip_serializing_if = "Option::is_none")]
    pub permission_id: Option<i32>,
}

/// `google.protobuf.Any` in JSON form. `value` is a field object for
/// contracts the node knows how to print, base64 text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireParameter {
    #[serde(default)]
    pub value: Value,

    #[serde(default)]
    pub type_url: String,
}

/// A contract discriminator as it appears on the wire.
///
/// Codes are read as `i64` so that an out-of-range number is reported as an
/// unsupported contract rather than as broken JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireContractType {
    Name(String),
    Code(i64),
}

impl WireContractType {
    /// Resolves the discriminator of the contract at `index`.
    pub fn resolve(&self, index: usize) -> Result<ContractKind, ParseError> {
        let kind = match self {
            Self::Name(name) => ContractKind::from_name(name),
            Self::Code(code) => i32::try_from(*code).ok().and_then(ContractKind::from_code),
        };
        kind.ok_or_else(|| ParseError::UnsupportedContract {
            index,
            discriminator: match self {
                Self::Name(name) => name.clone(),
                Self::Code(code) => code.to_string(),
            },
        })
    }
}

impl From<ContractKind> for WireContractType {
    fn from(kind: ContractKind) -> Self {
        Self::Name(kind.name().to_string())
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Anything [`super::decode_transaction`] accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum WireInput {
    /// JSON text.
    Text(String),
    /// An already-parsed JSON value.
    Value(Value),
    /// An already-typed wire object.
    Object(WireTransaction),
}

impl WireInput {
    /// Brings every input form to a [`WireTransaction`].
    pub fn into_wire(self) -> Result<WireTransaction, ParseError> {
        let malformed = |e: serde_json::Error| ParseError::MalformedJson {
            reason: e.to_string(),
        };
        match self {
            Self::Text(text) => serde_json::from_str(&text).map_err(malformed),
            Self::Value(value) => serde_json::from_value(value).map_err(malformed),
            Self::Object(wire) => Ok(wire),
        }
    }
}

impl From<&str> for WireInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for WireInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for WireInput {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<WireTransaction> for WireInput {
    fn from(wire: WireTransaction) -> Self {
        Self::Object(wire)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// A wire transaction with every textual field converted to binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedWire {
    /// Caller-supplied identifier. An empty string counts as absent.
    pub tx_id: Option<String>,
    /// The authoritative binary body.
    pub raw_bytes: Vec<u8>,
    pub signatures: Vec<Signature>,
    /// `raw_data`, when the input carried it.
    pub declared: Option<DeclaredRawData>,
}

/// The binary view of `raw_data`. Every field is optional because the node
/// omits defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclaredRawData {
    pub ref_block_bytes: Option<Vec<u8>>,
    pub ref_block_hash: Option<Vec<u8>>,
    pub expiration: Option<i64>,
    pub timestamp: Option<i64>,
    pub contract_kinds: Vec<ContractKind>,
}

impl WireTransaction {
    /// Converts hex fields to bytes and contract types to [`ContractKind`].
    pub fn normalize(&self) -> Result<NormalizedWire, ParseError> {
        let raw_bytes = match self.raw_data_hex.as_deref() {
            None | Some("") => return Err(ParseError::MissingRawData),
            Some(text) => decode_hex("raw_data_hex", text)?,
        };

        let signatures = self
            .signature
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, text)| {
                decode_hex(&format!("signature[{}]", i), text).map(Signature::from_bytes)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let declared = self.raw_data.as_ref().map(normalize_raw_data).transpose()?;

        Ok(NormalizedWire {
            tx_id: self.tx_id.clone().filter(|id| !id.is_empty()),
            raw_bytes,
            signatures,
            declared,
        })
    }
}

fn normalize_raw_data(raw: &WireRawData) -> Result<DeclaredRawData, ParseError> {
    let hex_field = |field: &str, value: &Option<String>| {
        value
            .as_deref()
            .map(|text| decode_hex(field, text))
            .transpose()
    };

    let contract_kinds = raw
        .contract
        .iter()
        .enumerate()
        .map(|(index, contract)| contract.kind.resolve(index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DeclaredRawData {
        ref_block_bytes: hex_field("raw_data.ref_block_bytes", &raw.ref_block_bytes)?,
        ref_block_hash: hex_field("raw_data.ref_block_hash", &raw.ref_block_hash)?,
        expiration: raw.expiration,
        timestamp: raw.timestamp,
        contract_kinds,
    })
}

fn decode_hex(field: &str, text: &str) -> Result<Vec<u8>, ParseError> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).map_err(|e| ParseError::InvalidHex {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
