//! Contract payload codec.
//!
//! A contract travels as a discriminator plus an `Any`-wrapped payload. This
//! module turns that pair into a typed [`DecodedContract`], dispatching on
//! [`ContractKind`] only. Unknown discriminators, a `type_url` that names a
//! different message, and payloads that do not parse all fail closed.
//!
//! Addresses stay in their raw 21-byte form here. Rendering them as text is
//! the caller's job, through an [`AddressCodec`].

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use prost::Message;
use serde_json::{json, Value};

use super::error::{EncodeError, ParseError};
use super::proto::ContractContainer;
use super::types::{ContractKind, TransactionKind};
use crate::crypto::address::AddressCodec;

// ---------------------------------------------------------------------------
// Payload messages
// ---------------------------------------------------------------------------

/// `TransferContract`: move `amount` sun from `owner_address` to `to_address`.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct TransferContract {
    #[prost(bytes = "vec", tag = "1")]
    pub owner_address: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub to_address: Vec<u8>,
    #[prost(int64, tag = "3")]
    pub amount: i64,
}

/// `AccountPermissionUpdateContract`: replaces every permission of an
/// account at once.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct AccountPermissionUpdateContract {
    #[prost(bytes = "vec", tag = "1")]
    pub owner_address: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub owner: Option<Permission>,
    #[prost(message, optional, tag = "3")]
    pub witness: Option<Permission>,
    #[prost(message, repeated, tag = "4")]
    pub actives: Vec<Permission>,
}

/// A weighted key set with a threshold.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct Permission {
    /// 0 = owner, 1 = witness, 2 = active.
    #[prost(int32, tag = "1")]
    pub kind: i32,
    #[prost(int32, tag = "2")]
    pub id: i32,
    #[prost(string, tag = "3")]
    pub permission_name: String,
    /// Sum of key weights needed to authorize.
    #[prost(int64, tag = "4")]
    pub threshold: i64,
    #[prost(int32, tag = "5")]
    pub parent_id: i32,
    /// 32-byte bitmap of contract types an active permission may sign.
    #[prost(bytes = "vec", tag = "6")]
    pub operations: Vec<u8>,
    #[prost(message, repeated, tag = "7")]
    pub keys: Vec<PermissionKey>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct PermissionKey {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
    #[prost(int64, tag = "2")]
    pub weight: i64,
}

// ---------------------------------------------------------------------------
// DecodedContract
// ---------------------------------------------------------------------------

/// A contract payload decoded according to its discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedContract {
    Transfer(TransferContract),
    AccountPermissionUpdate(AccountPermissionUpdateContract),
}

impl DecodedContract {
    /// Decodes `payload` as the message `kind` names.
    pub fn decode(kind: ContractKind, payload: &[u8]) -> Result<Self, ParseError> {
        let context = format!("{} payload", kind);
        if payload.is_empty() {
            return Err(ParseError::MalformedPayload {
                context,
                reason: "payload is empty".to_string(),
            });
        }
        let malformed = |e: prost::DecodeError| ParseError::MalformedPayload {
            context: context.clone(),
            reason: e.to_string(),
        };

        match kind {
            ContractKind::Transfer => TransferContract::decode(payload)
                .map(Self::Transfer)
                .map_err(malformed),
            ContractKind::AccountPermissionUpdate => {
                AccountPermissionUpdateContract::decode(payload)
                    .map(Self::AccountPermissionUpdate)
                    .map_err(malformed)
            }
        }
    }

    /// Classifies and decodes the contract at position `index` of an
    /// envelope.
    pub fn from_container(index: usize, container: &ContractContainer) -> Result<Self, ParseError> {
        let kind = ContractKind::from_code(container.kind).ok_or_else(|| {
            ParseError::UnsupportedContract {
                index,
                discriminator: container.kind.to_string(),
            }
        })?;

        let parameter = container
            .parameter
            .as_ref()
            .ok_or_else(|| ParseError::MalformedPayload {
                context: format!("contract[{}].parameter", index),
                reason: "missing".to_string(),
            })?;

        // An empty type_url is tolerated; a different message name is not.
        if !parameter.type_url.is_empty() && parameter.type_url != kind.type_url() {
            return Err(ParseError::MalformedPayload {
                context: format!("contract[{}].parameter.type_url", index),
                reason: format!("{} does not match {}", parameter.type_url, kind),
            });
        }

        Self::decode(kind, &parameter.value).map_err(|e| match e {
            ParseError::MalformedPayload { reason, .. } => ParseError::MalformedPayload {
                context: format!("contract[{}].parameter.value", index),
                reason,
            },
            other => other,
        })
    }

    pub fn kind(&self) -> ContractKind {
        match self {
            Self::Transfer(_) => ContractKind::Transfer,
            Self::AccountPermissionUpdate(_) => ContractKind::AccountPermissionUpdate,
        }
    }

    pub fn transaction_kind(&self) -> TransactionKind {
        match self {
            Self::Transfer(_) => TransactionKind::Send,
            Self::AccountPermissionUpdate(_) => TransactionKind::WalletInitialization,
        }
    }

    /// Raw address of the account the contract acts for.
    pub fn owner_address(&self) -> &[u8] {
        match self {
            Self::Transfer(c) => &c.owner_address,
            Self::AccountPermissionUpdate(c) => &c.owner_address,
        }
    }

    /// Raw receiving address and amount, for value transfers.
    pub fn destination(&self) -> Option<(&[u8], i64)> {
        match self {
            Self::Transfer(c) => Some((c.to_address.as_slice(), c.amount)),
            Self::AccountPermissionUpdate(_) => None,
        }
    }

    /// The new permission sets, for permission updates.
    pub fn permissions(&self) -> Option<&AccountPermissionUpdateContract> {
        match self {
            Self::AccountPermissionUpdate(c) => Some(c),
            Self::Transfer(_) => None,
        }
    }

    /// Canonical payload bytes.
    pub fn encode_payload(&self) -> Vec<u8> {
        match self {
            Self::Transfer(c) => c.encode_to_vec(),
            Self::AccountPermissionUpdate(c) => c.encode_to_vec(),
        }
    }

    /// The node JSON form of `parameter.value`.
    ///
    /// Transfers expand into readable fields with checksummed addresses and
    /// the amount as a decimal string. Other kinds stay opaque: the base64 of
    /// their payload bytes.
    pub fn to_json_value(&self, codec: &dyn AddressCodec) -> Result<Value, EncodeError> {
        match self {
            Self::Transfer(c) => {
                let render = |field: &str, bytes: &[u8]| {
                    codec
                        .binary_to_address(bytes)
                        .map_err(|e| EncodeError::InvalidAddress {
                            field: field.to_string(),
                            reason: e.to_string(),
                        })
                };
                Ok(json!({
                    "owner_address": render("owner_address", &c.owner_address)?,
                    "to_address": render("to_address", &c.to_address)?,
                    "amount": c.amount.to_string(),
                }))
            }
            Self::AccountPermissionUpdate(_) => Ok(Value::String(BASE64.encode(self.encode_payload()))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    use crate::crypto::address::Base58CheckCodec;
    use crate::transaction::proto::AnyPayload;

    const OWNER_HEX: &str = "41c4530f6bfa902b7398ac773da56106a15af15f92";
    const TO_HEX: &str = "4189ffaf9da8c6fae32189b2e6dce228249b1129aa";
    const TRANSFER_PAYLOAD_B64: &str =
        "ChVBxFMPa/qQK3OYrHc9pWEGoVrxX5ISFUGJ/6+dqMb64yGJsubc4igkmxEpqhi2DQ==";
    const PERMISSION_PAYLOAD: &str = "0a1541c4530f6bfa902b7398ac773da56106a15af15f92123f1a056f776e657220023a190a1541c4530f6bfa902b7398ac773da56106a15af15f9210013a190a154189ffaf9da8c6fae32189b2e6dce228249b1129aa10012267080210021a0761637469766530200232207fff1fc0033e00000000000000000000000000000000000000000000000000003a190a1541c4530f6bfa902b7398ac773da56106a15af15f9210013a190a154189ffaf9da8c6fae32189b2e6dce228249b1129aa1001";

    fn transfer_payload() -> Vec<u8> {
        BASE64.decode(TRANSFER_PAYLOAD_B64).unwrap()
    }

    #[test]
    fn decodes_transfer() {
        let decoded = DecodedContract::decode(ContractKind::Transfer, &transfer_payload()).unwrap();
        assert_eq!(decoded.kind(), ContractKind::Transfer);
        assert_eq!(decoded.transaction_kind(), TransactionKind::Send);
        assert_eq!(hex::encode(decoded.owner_address()), OWNER_HEX);

        let (to, amount) = decoded.destination().unwrap();
        assert_eq!(hex::encode(to), TO_HEX);
        assert_eq!(amount, 1718);
        assert!(decoded.permissions().is_none());
        assert_eq!(decoded.encode_payload(), transfer_payload());
    }

    #[test]
    fn decodes_permission_update() {
        let payload = hex::decode(PERMISSION_PAYLOAD).unwrap();
        let decoded = DecodedContract::decode(ContractKind::AccountPermissionUpdate, &payload).unwrap();

        assert_eq!(decoded.transaction_kind(), TransactionKind::WalletInitialization);
        assert_eq!(hex::encode(decoded.owner_address()), OWNER_HEX);
        assert!(decoded.destination().is_none());

        let update = decoded.permissions().unwrap();
        let owner = update.owner.as_ref().unwrap();
        assert_eq!(owner.permission_name, "owner");
        assert_eq!(owner.threshold, 2);
        assert_eq!(owner.keys.len(), 2);
        assert!(update.witness.is_none());
        assert_eq!(update.actives.len(), 1);
        assert_eq!(update.actives[0].permission_name, "active0");
        assert_eq!(update.actives[0].operations.len(), 32);
        assert_eq!(decoded.encode_payload(), payload);
    }

    #[test]
    fn empty_payload_is_malformed() {
        let err = DecodedContract::decode(ContractKind::Transfer, &[]).unwrap_err();
        assert!(matches!(err, ParseError::MalformedPayload { .. }));
    }

    #[test]
    fn truncated_payload_is_malformed() {
        let payload = transfer_payload();
        let err = DecodedContract::decode(ContractKind::Transfer, &payload[..10]).unwrap_err();
        assert!(matches!(err, ParseError::MalformedPayload { .. }));
    }

    #[test]
    fn unknown_discriminator_is_unsupported() {
        for code in [0, 2, 4, 31, 45, 47, -1] {
            let container = ContractContainer {
                kind: code,
                parameter: Some(AnyPayload {
                    type_url: String::new(),
                    value: transfer_payload(),
                }),
                ..Default::default()
            };
            let err = DecodedContract::from_container(0, &container).unwrap_err();
            assert_eq!(
                err,
                ParseError::UnsupportedContract {
                    index: 0,
                    discriminator: code.to_string()
                }
            );
        }
    }

    #[test]
    fn mismatched_type_url_fails_closed() {
        let mut container = ContractContainer::new(ContractKind::Transfer, transfer_payload());
        container.parameter.as_mut().unwrap().type_url = ContractKind::AccountPermissionUpdate.type_url();

        let err = DecodedContract::from_container(0, &container).unwrap_err();
        match err {
            ParseError::MalformedPayload { context, .. } => {
                assert_eq!(context, "contract[0].parameter.type_url")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_parameter_is_malformed() {
        let container = ContractContainer {
            kind: ContractKind::Transfer.code(),
            ..Default::default()
        };
        let err = DecodedContract::from_container(3, &container).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedPayload {
                context: "contract[3].parameter".into(),
                reason: "missing".into()
            }
        );
    }

    #[test]
    fn transfer_json_value_uses_checksummed_addresses() {
        let decoded = DecodedContract::decode(ContractKind::Transfer, &transfer_payload()).unwrap();
        let value = decoded.to_json_value(&Base58CheckCodec::new()).unwrap();
        assert_eq!(value["owner_address"], "TTsGwnTLQ4eryFJpDvJSfuGQxPXRCjXvZz");
        assert_eq!(value["to_address"], "TNYssiPgaf9XYz3urBUqr861Tfqxvko47B");
        assert_eq!(value["amount"], "1718");
    }

    #[test]
    fn permission_json_value_is_base64() {
        let payload = hex::decode(PERMISSION_PAYLOAD).unwrap();
        let decoded = DecodedContract::decode(ContractKind::AccountPermissionUpdate, &payload).unwrap();
        let value = decoded.to_json_value(&Base58CheckCodec::new()).unwrap();
        assert_eq!(BASE64.decode(value.as_str().unwrap()).unwrap(), payload);
    }

    #[test]
    fn unrenderable_address_fails_encode() {
        let decoded = DecodedContract::Transfer(TransferContract {
            owner_address: vec![0x41; 5],
            to_address: hex::decode(TO_HEX).unwrap(),
            amount: 1,
        });
        let err = decoded.to_json_value(&Base58CheckCodec::new()).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidAddress { ref field, .. } if field == "owner_address"));
    }
}
