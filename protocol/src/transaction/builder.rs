//! The transaction aggregate.
//!
//! A [`Transaction`] owns exactly one decoded envelope plus the readable
//! view derived from it (ID, kind, senders, destinations, validity window)
//! and an append-only signature list. Everything except the signatures is
//! fixed at decode time. In particular the ID is never recomputed, even when
//! the envelope is re-serialized for output.
//!
//! Construction flow: decode from the node (`Transaction::from_wire`), add
//! signatures (`super::signing::sign_transaction`), finalize with
//! [`build_transaction`], hand off with [`Transaction::to_wire`].

use chrono::{DateTime, TimeZone, Utc};

use super::contract::DecodedContract;
use super::envelope;
use super::error::{BuildError, EncodeError, ParseError, SigningError};
use super::proto::RawEnvelope;
use super::signatures::SignatureSet;
use super::types::{Destination, Signature, TransactionKind, TransactionState};
use super::wire::{WireInput, WireTransaction};
use crate::config::TX_ID_LENGTH;
use crate::crypto::address::AddressCodec;

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A TRX transaction on its way from the node to a broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    /// `None` until decoded.
    body: Option<TransactionBody>,
    signatures: SignatureSet,
}

/// Everything fixed at decode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransactionBody {
    pub(crate) id: String,
    pub(crate) raw: RawEnvelope,
    pub(crate) contract: DecodedContract,
    pub(crate) kind: TransactionKind,
    pub(crate) senders: Vec<String>,
    pub(crate) destinations: Vec<Destination>,
}

impl Transaction {
    /// A transaction with no envelope, in the `Empty` state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decodes node JSON (text, value, or typed object).
    pub fn from_wire(
        input: impl Into<WireInput>,
        codec: &dyn AddressCodec,
    ) -> Result<Self, ParseError> {
        envelope::decode(input.into(), codec)
    }

    pub(crate) fn from_parts(body: TransactionBody, signatures: Vec<Signature>) -> Self {
        let mut set = SignatureSet::new();
        set.replace_all(signatures);
        Self {
            body: Some(body),
            signatures: set,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Hex transaction ID. Empty for an `Empty` transaction.
    pub fn id(&self) -> &str {
        self.body.as_ref().map_or("", |b| b.id.as_str())
    }

    pub fn kind(&self) -> Option<TransactionKind> {
        self.body.as_ref().map(|b| b.kind)
    }

    /// Base58check addresses of the signing accounts.
    pub fn senders(&self) -> &[String] {
        self.body
            .as_ref()
            .map(|b| b.senders.as_slice())
            .unwrap_or_default()
    }

    /// Receivers and amounts. Empty for anything but a value transfer.
    pub fn destinations(&self) -> &[Destination] {
        self.body
            .as_ref()
            .map(|b| b.destinations.as_slice())
            .unwrap_or_default()
    }

    /// Creation time, epoch milliseconds.
    pub fn valid_from(&self) -> Option<i64> {
        self.body.as_ref().map(|b| b.raw.timestamp)
    }

    /// Expiration time, epoch milliseconds.
    pub fn valid_to(&self) -> Option<i64> {
        self.body.as_ref().map(|b| b.raw.expiration)
    }

    pub fn valid_from_time(&self) -> Option<DateTime<Utc>> {
        self.valid_from()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    pub fn valid_to_time(&self) -> Option<DateTime<Utc>> {
        self.valid_to()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    /// Whether the node would reject this transaction at `now_ms`.
    /// An `Empty` transaction never expires.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.valid_to().is_some_and(|to| now_ms > to)
    }

    pub fn signatures(&self) -> &[Signature] {
        self.signatures.as_slice()
    }

    pub fn raw_envelope(&self) -> Option<&RawEnvelope> {
        self.body.as_ref().map(|b| &b.raw)
    }

    pub fn contract(&self) -> Option<&DecodedContract> {
        self.body.as_ref().map(|b| &b.contract)
    }

    pub fn state(&self) -> TransactionState {
        match &self.body {
            None => TransactionState::Empty,
            Some(_) if self.signatures.appended_count() == 0 => TransactionState::Decoded,
            Some(_) => TransactionState::Signed(self.signatures.len()),
        }
    }

    // -- Mutation -----------------------------------------------------------

    /// Attaches the new signature from a signer's answer.
    ///
    /// `prior_count` is the number of signatures the signer was shown and
    /// `signatures` the full list it returned. See
    /// [`SignatureSet::append_from_signing_result`] for the checks.
    pub fn apply_signing_result(
        &mut self,
        prior_count: usize,
        signatures: Vec<Signature>,
    ) -> Result<Signature, SigningError> {
        if self.body.is_none() {
            return Err(SigningError::MissingSender);
        }
        self.signatures.append_from_signing_result(prior_count, signatures)
    }

    // -- Projection ---------------------------------------------------------

    /// The node wire form, with a freshly re-encoded `raw_data_hex`.
    pub fn to_wire(&self, codec: &dyn AddressCodec) -> Result<WireTransaction, EncodeError> {
        envelope::encode(self, codec)
    }

    /// [`Transaction::to_wire`] as JSON text.
    pub fn to_json(&self, codec: &dyn AddressCodec) -> Result<String, EncodeError> {
        let wire = self.to_wire(codec)?;
        serde_json::to_string(&wire).map_err(|e| EncodeError::Serialization(e.to_string()))
    }
}

/// Finalizes a transaction for hand-off.
///
/// Only a decoded transaction whose ID is 32 bytes of hex can be built. A
/// node-supplied ID is still trusted as to its value, but not its shape.
pub fn build_transaction(tx: Transaction) -> Result<Transaction, BuildError> {
    if tx.state() == TransactionState::Empty || !is_well_formed_id(tx.id()) {
        return Err(BuildError::MissingId);
    }
    Ok(tx)
}

fn is_well_formed_id(id: &str) -> bool {
    id.len() == TX_ID_LENGTH * 2 && id.bytes().all(|b| b.is_ascii_hexdigit())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
