//! Envelope codec: node wire format in, [`Transaction`] out, and back.
//!
//! Decoding runs in a fixed order. Wire text is normalized to binary first,
//! then the authoritative `raw_data_hex` body is parsed, its single contract
//! classified, and the readable fields derived. Either the whole transaction
//! comes back or an error does; there is no partially decoded state.
//!
//! Encoding is a projection: the binary body is re-serialized from the
//! envelope every time, never cached.

use prost::Message;
use tracing::debug;

use super::builder::{Transaction, TransactionBody};
use super::contract::DecodedContract;
use super::error::{EncodeError, ParseError};
use super::proto::RawEnvelope;
use super::types::Destination;
use super::wire::{
    DeclaredRawData, WireContract, WireInput, WireParameter, WireRawData, WireTransaction,
};
use crate::config::CONTRACTS_PER_TRANSACTION;
use crate::crypto::address::AddressCodec;

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Decodes a node transaction.
///
/// The identifier is taken verbatim from `txID` when present and non-empty,
/// otherwise derived from the body. Signatures in the input replace any
/// signature state wholesale.
pub fn decode(input: WireInput, codec: &dyn AddressCodec) -> Result<Transaction, ParseError> {
    let wire = input.into_wire()?;
    let normalized = wire.normalize()?;

    let raw = RawEnvelope::decode(normalized.raw_bytes.as_slice()).map_err(|e| {
        ParseError::MalformedPayload {
            context: "raw_data_hex".to_string(),
            reason: e.to_string(),
        }
    })?;
    // Unknown fields and non-canonical encodings would not survive re-encoding,
    // leaving an ID and a body the node never saw.
    if raw.to_bytes() != normalized.raw_bytes {
        return Err(ParseError::MalformedPayload {
            context: "raw_data_hex".to_string(),
            reason: "body does not re-encode to the same bytes".to_string(),
        });
    }

    if raw.contract.len() != CONTRACTS_PER_TRANSACTION {
        return Err(ParseError::ContractCountInvalid {
            count: raw.contract.len(),
        });
    }
    if let Some(declared) = &normalized.declared {
        check_declared(declared, &raw)?;
    }
    require_time("raw_data.timestamp", raw.timestamp)?;
    require_time("raw_data.expiration", raw.expiration)?;

    let contract = DecodedContract::from_container(0, &raw.contract[0])?;
    let senders = vec![render_address(codec, "contract[0].owner_address", contract.owner_address())?];
    let destinations = match contract.destination() {
        Some((to, amount)) => vec![Destination {
            address: render_address(codec, "contract[0].to_address", to)?,
            amount: u64::try_from(amount).map_err(|_| ParseError::MalformedPayload {
                context: "contract[0].amount".to_string(),
                reason: format!("negative amount {}", amount),
            })?,
        }],
        None => Vec::new(),
    };

    let id = match normalized.tx_id {
        Some(id) => id,
        None => raw.derive_id(),
    };

    debug!(
        tx_id = %id,
        kind = %contract.transaction_kind(),
        signatures = normalized.signatures.len(),
        "transaction decoded"
    );

    let body = TransactionBody {
        id,
        kind: contract.transaction_kind(),
        raw,
        contract,
        senders,
        destinations,
    };
    Ok(Transaction::from_parts(body, normalized.signatures))
}

/// `raw_data` is only an echo of the binary body, but an echo that
/// contradicts the body is refused.
fn check_declared(declared: &DeclaredRawData, raw: &RawEnvelope) -> Result<(), ParseError> {
    let mismatch = |field: &str| ParseError::MalformedPayload {
        context: format!("raw_data.{}", field),
        reason: "does not match raw_data_hex".to_string(),
    };

    if declared.contract_kinds.len() != raw.contract.len() {
        return Err(mismatch("contract"));
    }
    for (index, (kind, container)) in declared.contract_kinds.iter().zip(&raw.contract).enumerate() {
        if kind.code() != container.kind {
            return Err(mismatch(&format!("contract[{}].type", index)));
        }
    }
    if declared.ref_block_bytes.as_ref().is_some_and(|b| *b != raw.ref_block_bytes) {
        return Err(mismatch("ref_block_bytes"));
    }
    if declared.ref_block_hash.as_ref().is_some_and(|h| *h != raw.ref_block_hash) {
        return Err(mismatch("ref_block_hash"));
    }
    if declared.timestamp.is_some_and(|t| t != raw.timestamp) {
        return Err(mismatch("timestamp"));
    }
    if declared.expiration.is_some_and(|t| t != raw.expiration) {
        return Err(mismatch("expiration"));
    }
    Ok(())
}

fn require_time(field: &str, millis: i64) -> Result<(), ParseError> {
    if millis <= 0 {
        return Err(ParseError::MalformedPayload {
            context: field.to_string(),
            reason: "missing".to_string(),
        });
    }
    Ok(())
}

fn render_address(codec: &dyn AddressCodec, field: &str, bytes: &[u8]) -> Result<String, ParseError> {
    codec
        .binary_to_address(bytes)
        .map_err(|e| ParseError::InvalidAddress {
            field: field.to_string(),
            reason: e.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Projects a transaction back into the node's wire format.
pub fn encode(tx: &Transaction, codec: &dyn AddressCodec) -> Result<WireTransaction, EncodeError> {
    let (raw, contract) = match (tx.raw_envelope(), tx.contract()) {
        (Some(raw), Some(contract)) => (raw, contract),
        _ => return Err(EncodeError::NoRawData),
    };

    let contracts = raw
        .contract
        .iter()
        .map(|container| {
            let type_url = container
                .parameter
                .as_ref()
                .map(|p| p.type_url.clone())
                .unwrap_or_default();
            Ok(WireContract {
                parameter: WireParameter {
                    value: contract.to_json_value(codec)?,
                    type_url,
                },
                kind: contract.kind().into(),
                permission_id: (container.permission_id != 0).then_some(container.permission_id),
            })
        })
        .collect::<Result<Vec<_>, EncodeError>>()?;

    let raw_data = WireRawData {
        contract: contracts,
        ref_block_bytes: Some(hex::encode(&raw.ref_block_bytes)),
        ref_block_num: (raw.ref_block_num != 0).then_some(raw.ref_block_num),
        ref_block_hash: Some(hex::encode(&raw.ref_block_hash)),
        expiration: Some(raw.expiration),
        timestamp: Some(raw.timestamp),
        fee_limit: (raw.fee_limit != 0).then_some(raw.fee_limit),
        data: (!raw.data.is_empty()).then(|| hex::encode(&raw.data)),
    };

    debug!(tx_id = %tx.id(), signatures = tx.signatures().len(), "transaction encoded");

    Ok(WireTransaction {
        tx_id: Some(tx.id().to_string()),
        raw_data: Some(raw_data),
        raw_data_hex: Some(hex::encode(raw.to_bytes())),
        signature: Some(tx.signatures().iter().map(|s| s.to_hex()).collect()),
        visible: None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
