//! # Transaction Module
//!
//! Decoding, signing, and re-encoding of TRX native transactions. A
//! transaction arrives from the full node as JSON, is turned into a
//! [`Transaction`], collects one signature per co-signer, and goes back out
//! in the node's own format for broadcast.
//!
//! ## Architecture
//!
//! ```text
//! types.rs          ContractKind, TransactionKind, Destination, Signature
//! error.rs          Parse/Signing/Build/Encode/Validation error enums
//! proto.rs          Binary envelope schema (prost)
//! contract.rs       Contract payload schemas and kind dispatch
//! wire.rs           Node JSON types and hex/name normalization
//! envelope.rs       Wire <-> Transaction codec
//! signatures.rs     Append-only signature accumulator
//! builder.rs        The Transaction aggregate and build_transaction
//! signing.rs        TransactionSigner seam and sign_transaction
//! verification.rs   Amount and address validators
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Decode**: [`decode_transaction`] parses node JSON (`Empty -> Decoded`).
//! 2. **Sign**: [`sign_transaction`] asks a [`TransactionSigner`] for one
//!    more signature (`-> Signed(n + 1)`).
//! 3. **Build**: [`build_transaction`] checks the transaction is complete.
//! 4. **Hand off**: [`Transaction::to_wire`] / [`Transaction::to_json`].
//!
//! ## Design Decisions
//!
//! - The ID is `sha256(raw_data bytes)`, computed once. A `txID` supplied by
//!   the node is taken as-is; the node is the source of truth for it.
//! - `raw_data_hex` is authoritative. `raw_data`, when present, must agree
//!   with it but is never used to rebuild it.
//! - Exactly one contract per transaction. Transfers and account permission
//!   updates are understood; every other contract type is refused.

pub mod builder;
pub mod contract;
pub mod envelope;
pub mod error;
pub mod proto;
pub mod signatures;
pub mod signing;
pub mod types;
pub mod verification;
pub mod wire;

pub use builder::{build_transaction, Transaction};
pub use contract::DecodedContract;
pub use error::{
    BuildError, EncodeError, ParseError, SigningError, TransactionError, ValidationError,
};
pub use signatures::SignatureSet;
pub use signing::{sign_transaction, SignerError, SigningRequest, SigningResult, TransactionSigner};
pub use types::{ContractKind, Destination, Signature, TransactionKind, TransactionState};
pub use verification::{validate_address, validate_value};
pub use wire::{WireInput, WireTransaction};

use crate::crypto::address::Base58CheckCodec;

/// Decodes node JSON using the network's base58check address format.
///
/// Accepts JSON text, a [`serde_json::Value`], or a [`WireTransaction`].
/// Use [`Transaction::from_wire`] to supply a different [`crate::crypto::AddressCodec`].
pub fn decode_transaction(input: impl Into<WireInput>) -> Result<Transaction, TransactionError> {
    Ok(Transaction::from_wire(input, &Base58CheckCodec::new())?)
}
