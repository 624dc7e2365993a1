//! # Hashing Utilities
//!
//! Two digests carry the whole protocol:
//!
//! - **SHA-256**: Transaction IDs. `txID = SHA-256(raw_data bytes)`, one
//!   round, no domain tag. This is also what the signer signs.
//! - **Keccak-256**: Address derivation from a secp256k1 public key. Note
//!   that this is the original Keccak padding, *not* NIST SHA3-256. They
//!   produce different outputs for the same input.
//!
//! The base58check checksum is computed inside `bs58` and never goes
//! through this module.

use sha2::{Digest, Sha256};
use sha3::Keccak256;

/// SHA-256 of `data` as a fixed-size array.
///
/// # Example
///
/// ```
/// use trx_protocol::crypto::sha256_array;
///
/// let hash = sha256_array(b"raw transaction bytes");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute the Keccak-256 hash of the input data.
///
/// # Example
///
/// ```
/// use trx_protocol::crypto::keccak256;
///
/// let hash = keccak256(b"");
/// assert_eq!(
///     hex::encode(hash),
///     "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
/// );
/// ```
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}
