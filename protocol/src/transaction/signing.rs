//! Delegated transaction signing.
//!
//! The codec never holds key material. Signing is handed to an external
//! [`TransactionSigner`] (a hardware wallet, a remote co-signer, or the
//! in-process [`crate::crypto::keys::Secp256k1Signer`]), which receives the
//! transaction ID plus the signatures already attached and returns the full
//! new signature list. The result is then checked by the transaction's
//! signature accumulator before anything is mutated.
//!
//! Each call adds exactly one signature. A co-signer that returns nothing new,
//! or returns a signature that is already attached, is rejected.

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use super::builder::Transaction;
use super::error::SigningError;
use super::types::{Signature, TransactionKind};

// ---------------------------------------------------------------------------
// Signer seam
// ---------------------------------------------------------------------------

/// What a signer is asked to sign.
#[derive(Debug, Clone, Copy)]
pub struct SigningRequest<'a> {
    /// Hex transaction ID; this is the digest that gets signed.
    pub tx_id: &'a str,
    /// Signatures attached so far, in order.
    pub signatures: &'a [Signature],
}

/// A signer's answer: the prior signatures followed by the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningResult {
    pub signatures: Vec<Signature>,
}

/// Failure reported by a signer implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SignerError {
    message: String,
}

impl SignerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Produces one additional signature for a transaction.
///
/// `Key` is whatever identifies the signing party to the implementation: a
/// keypair for the in-process signer, a device path or account label for
/// others.
pub trait TransactionSigner {
    type Key: ?Sized;

    fn sign(&self, key: &Self::Key, request: SigningRequest<'_>)
        -> Result<SigningResult, SignerError>;
}

impl<S: TransactionSigner + ?Sized> TransactionSigner for &S {
    type Key = S::Key;

    fn sign(
        &self,
        key: &Self::Key,
        request: SigningRequest<'_>,
    ) -> Result<SigningResult, SignerError> {
        (**self).sign(key, request)
    }
}

impl fmt::Display for SigningRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} prior signatures)", self.tx_id, self.signatures.len())
    }
}

// ---------------------------------------------------------------------------
// sign_transaction
// ---------------------------------------------------------------------------

/// Adds one signature to `tx` using `signer` and `key`.
///
/// The procedure:
/// 1. The transaction must have a sender and, for a value transfer, a
///    destination.
/// 2. The signer is called with the ID and the current signature list.
/// 3. The result must be longer than the current list and its new entry
///    must not already be attached.
/// 4. The new signature is appended; the ID is left untouched.
///
/// On any failure `tx` is unchanged.
///
/// # Example
///
/// ```rust,no_run
/// use trx_protocol::crypto::keys::{Secp256k1Signer, TronKeypair};
/// use trx_protocol::{decode_transaction, sign_transaction};
///
/// # fn node_json() -> String { String::new() }
/// let mut tx = decode_transaction(node_json().as_str()).unwrap();
/// let key = TronKeypair::from_hex("787a15...").unwrap();
/// sign_transaction(&mut tx, &Secp256k1Signer::new(), &key).unwrap();
/// ```
pub fn sign_transaction<'a, S>(
    tx: &'a mut Transaction,
    signer: &S,
    key: &S::Key,
) -> Result<&'a Transaction, SigningError>
where
    S: TransactionSigner + ?Sized,
{
    if tx.senders().is_empty() {
        return Err(SigningError::MissingSender);
    }
    if tx.kind() == Some(TransactionKind::Send) && tx.destinations().is_empty() {
        return Err(SigningError::MissingDestination);
    }

    let prior_count = tx.signatures().len();
    let result = signer
        .sign(
            key,
            SigningRequest {
                tx_id: tx.id(),
                signatures: tx.signatures(),
            },
        )
        .map_err(|e| {
            warn!(tx_id = %tx.id(), error = %e, "signer failed");
            SigningError::SignerFailed(e.to_string())
        })?;

    let appended = tx.apply_signing_result(prior_count, result.signatures)?;
    debug!(
        tx_id = %tx.id(),
        signature = ?appended,
        count = prior_count + 1,
        "signature appended"
    );
    Ok(tx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
