// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # TRX Protocol: Transaction Codec
//!
//! Converts TRX native transactions between the JSON a full node hands out
//! and a typed, owned [`transaction::Transaction`], and accumulates the
//! signatures a multi-signature account needs before broadcast.
//!
//! The node speaks two dialects at once: a JSON tree with hex strings, and
//! `raw_data_hex`, the protobuf body whose SHA-256 is the transaction ID.
//! We trust the binary body, treat the JSON tree as a view of it, and never
//! let the two drift apart on the way back out.
//!
//! ## Architecture
//!
//! - **config**: Protocol constants: prefixes, lengths, discriminators, bounds.
//! - **crypto**: Hashing, base58check addresses, and secp256k1 keys with
//!   signing and verification.
//! - **transaction**: Envelope codec, contract payloads, signature
//!   accumulation, and the [`transaction::Transaction`] aggregate.
//!
//! ## Collaborators
//!
//! Address rendering and signing are injected through the
//! [`crypto::AddressCodec`] and [`transaction::TransactionSigner`] traits.
//! [`crypto::Base58CheckCodec`] and [`crypto::Secp256k1Signer`] are the
//! production implementations; tests substitute deterministic doubles.
//!
//! ## Ground rules
//!
//! 1. The binary envelope is authoritative. JSON is a projection.
//! 2. The transaction ID is fixed at decode time and never recomputed.
//! 3. Signatures only grow, one per signing call, never duplicated.
//! 4. Decode and sign either fully succeed or leave nothing half-done.

pub mod config;
pub mod crypto;
pub mod transaction;

pub use transaction::{
    build_transaction, decode_transaction, sign_transaction, validate_address, validate_value,
    Transaction, TransactionError,
};
