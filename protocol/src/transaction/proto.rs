//! Binary schema of the transaction body.
//!
//! These messages mirror the node's `Transaction.raw` protobuf field for
//! field, tag for tag. Every field the node can emit is modelled, including
//! the ones this codec never reads, because the transaction ID is the hash of
//! the re-encoded bytes: a dropped field is a different ID.
//!
//! prost encodes fields in tag order and omits proto3 defaults, which is the
//! same canonical form the node produces, so `decode` followed by
//! `encode_to_vec` is byte-stable for node output. prost drops unknown fields
//! silently, so the envelope codec compares the re-encoded bytes with its
//! input and refuses a body that differs.

use prost::Message;

use super::types::ContractKind;
use crate::crypto::hash::sha256_array;

/// The canonical binary transaction body, `Transaction.raw`.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct RawEnvelope {
    /// Two bytes of the referenced block height.
    #[prost(bytes = "vec", tag = "1")]
    pub ref_block_bytes: Vec<u8>,
    #[prost(int64, tag = "3")]
    pub ref_block_num: i64,
    /// Eight bytes of the referenced block hash.
    #[prost(bytes = "vec", tag = "4")]
    pub ref_block_hash: Vec<u8>,
    /// Epoch milliseconds after which the node rejects the transaction.
    #[prost(int64, tag = "8")]
    pub expiration: i64,
    #[prost(message, repeated, tag = "9")]
    pub auths: Vec<Authority>,
    /// Free-form memo.
    #[prost(bytes = "vec", tag = "10")]
    pub data: Vec<u8>,
    #[prost(message, repeated, tag = "11")]
    pub contract: Vec<ContractContainer>,
    #[prost(bytes = "vec", tag = "12")]
    pub scripts: Vec<u8>,
    /// Epoch milliseconds at creation.
    #[prost(int64, tag = "14")]
    pub timestamp: i64,
    #[prost(int64, tag = "18")]
    pub fee_limit: i64,
}

impl RawEnvelope {
    /// Canonical bytes of this envelope. Recomputed on every call.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    /// The transaction ID: SHA-256 of the canonical bytes, lowercase hex.
    pub fn derive_id(&self) -> String {
        hex::encode(sha256_array(&self.to_bytes()))
    }
}

/// A tagged contract: discriminator plus `Any`-wrapped payload.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct ContractContainer {
    /// `ContractType` discriminator, see [`ContractKind::code`].
    #[prost(int32, tag = "1")]
    pub kind: i32,
    #[prost(message, optional, tag = "2")]
    pub parameter: Option<AnyPayload>,
    #[prost(bytes = "vec", tag = "3")]
    pub provider: Vec<u8>,
    #[prost(bytes = "vec", tag = "4")]
    pub contract_name: Vec<u8>,
    /// Which account permission authorizes this contract (0 = owner).
    #[prost(int32, tag = "5")]
    pub permission_id: i32,
}

impl ContractContainer {
    /// Wraps an encoded payload for `kind`, filling in the matching type URL.
    pub fn new(kind: ContractKind, payload: Vec<u8>) -> Self {
        Self {
            kind: kind.code(),
            parameter: Some(AnyPayload {
                type_url: kind.type_url(),
                value: payload,
            }),
            ..Default::default()
        }
    }
}

/// `google.protobuf.Any`.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct AnyPayload {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

/// `authority` entry of the raw body. Unused by the network today.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct Authority {
    #[prost(message, optional, tag = "1")]
    pub account: Option<AccountId>,
    #[prost(bytes = "vec", tag = "2")]
    pub permission_name: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct AccountId {
    #[prost(bytes = "vec", tag = "1")]
    pub name: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub address: Vec<u8>,
}
