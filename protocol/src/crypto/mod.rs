//! # Cryptographic Primitives
//!
//! Everything the codec needs from cryptography, and nothing more:
//!
//! - **hash**: SHA-256 for transaction IDs and Keccak-256 for address
//!   derivation.
//! - **address**: The [`AddressCodec`] seam and its base58check
//!   implementation.
//! - **keys**: secp256k1 keypairs, signature verification, and the production
//!   signer.
//!
//! Everything here wraps audited crates (`sha2`, `sha3`, `bs58`, `k256`).

pub mod address;
pub mod hash;
pub mod keys;

pub use address::{AddressCodec, AddressError, Base58CheckCodec};
pub use hash::{keccak256, sha256_array};
pub use keys::{verify_signature, verify_signature_hex, KeyError, Secp256k1Signer, TronKeypair};
