//! # Key Management
//!
//! secp256k1 keypairs, address derivation, and the production
//! [`TransactionSigner`].
//!
//! The transaction codec never touches key material directly: it asks a
//! [`TransactionSigner`] for a new signature list and validates the result.
//! [`Secp256k1Signer`] is the signer wallets actually use; tests plug in a
//! fixture double instead. [`verify_signature`] goes the other way and
//! checks that a returned signature came from the expected account.
//!
//! ## Signature format
//!
//! A signature is recoverable ECDSA over the 32-byte transaction ID (which is
//! already a SHA-256 digest, so it is signed as a prehash), serialized as
//! `r || s || v` with `v = recovery_id + 27`. RFC 6979 nonces make signing
//! deterministic: the same key over the same transaction always yields the
//! same 65 bytes, which is what lets the accumulator catch a co-signer
//! signing twice.
//!
//! ## Security considerations
//!
//! - Key bytes are never logged and never appear in `Debug` output.
//! - Key generation uses `OsRng`.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

use super::address::{AddressCodec, Base58CheckCodec};
use super::hash::keccak256;
use crate::config::{
    ADDRESS_HASH_LENGTH, ADDRESS_LENGTH, ADDRESS_PREFIX, SECRET_KEY_LENGTH, SIGNATURE_LENGTH,
    SIGNATURE_RECOVERY_OFFSET, TX_ID_LENGTH,
};
use crate::transaction::signing::{SignerError, SigningRequest, SigningResult, TransactionSigner};
use crate::transaction::types::Signature;

/// Errors that can occur during key operations.
///
/// Deliberately silent about *why* a secret key was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: expected a 65-byte uncompressed point")]
    InvalidPublicKey,

    #[error("invalid digest: expected {expected} bytes, got {got}")]
    InvalidDigest { expected: usize, got: usize },

    #[error("ecdsa signing failed")]
    SigningFailed,

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("{field} is not valid hex")]
    InvalidHex { field: &'static str },
}

/// A secp256k1 keypair controlling one account.
///
/// `TronKeypair` does not implement `Serialize`. Exporting the secret is an
/// explicit call to [`secret_key_bytes`](Self::secret_key_bytes).
///
/// # Examples
///
/// ```
/// use trx_protocol::crypto::keys::TronKeypair;
///
/// let kp = TronKeypair::generate();
/// assert!(kp.address().starts_with('T'));
/// ```
#[derive(Clone)]
pub struct TronKeypair {
    signing_key: SigningKey,
}

impl TronKeypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Reconstruct a keypair from a raw 32-byte secret scalar.
    ///
    /// Zero and values at or above the curve order are rejected.
    pub fn from_bytes(secret_key_bytes: &[u8]) -> Result<Self, KeyError> {
        if secret_key_bytes.len() != SECRET_KEY_LENGTH {
            return Err(KeyError::InvalidSecretKey);
        }
        let signing_key =
            SigningKey::from_slice(secret_key_bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self { signing_key })
    }

    /// Reconstruct a keypair from a hex-encoded secret key, the format
    /// wallets export.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        Self::from_bytes(&bytes)
    }

    /// Exports the raw 32-byte secret key. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes().into()
    }

    /// The uncompressed SEC1 public key (65 bytes, leading `0x04`).
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.signing_key
            .verifying_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    }

    /// The raw 21-byte account address controlled by this key.
    pub fn address_bytes(&self) -> [u8; ADDRESS_LENGTH] {
        // Uncompressed points are always 65 bytes; skip the 0x04 tag.
        hash_to_address(&self.public_key_bytes()[1..])
    }

    /// The base58check account address controlled by this key.
    pub fn address(&self) -> String {
        bs58::encode(self.address_bytes()).with_check().into_string()
    }

    /// Signs a 32-byte digest, returning the 65-byte `r || s || v` form.
    pub fn sign_digest(&self, digest: &[u8]) -> Result<Signature, KeyError> {
        if digest.len() != TX_ID_LENGTH {
            return Err(KeyError::InvalidDigest {
                expected: TX_ID_LENGTH,
                got: digest.len(),
            });
        }
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|_| KeyError::SigningFailed)?;

        let mut bytes = Vec::with_capacity(SIGNATURE_LENGTH);
        bytes.extend_from_slice(&signature.to_bytes());
        bytes.push(recovery_id.to_byte() + SIGNATURE_RECOVERY_OFFSET);
        Ok(Signature::from_bytes(bytes))
    }
}

impl fmt::Debug for TronKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TronKeypair(address={})", self.address())
    }
}

impl PartialEq for TronKeypair {
    /// Keypairs compare by public key.
    fn eq(&self, other: &Self) -> bool {
        self.public_key_bytes() == other.public_key_bytes()
    }
}

impl Eq for TronKeypair {}

/// Derives the raw account address from an uncompressed public key.
pub fn address_from_public_key(public_key: &[u8]) -> Result<[u8; ADDRESS_LENGTH], KeyError> {
    if public_key.len() != 65 || public_key[0] != 0x04 {
        return Err(KeyError::InvalidPublicKey);
    }
    Ok(hash_to_address(&public_key[1..]))
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Checks that `signature` over the 32-byte `digest` was made by the key
/// controlling the base58check `address`.
///
/// The public key is recovered from the signature and its derived address
/// compared with `address`. Malformed input is an error; a well-formed
/// signature from some other key is `Ok(false)`.
///
/// # Examples
///
/// ```
/// use trx_protocol::crypto::keys::{verify_signature, TronKeypair};
///
/// let kp = TronKeypair::generate();
/// let digest = [7u8; 32];
/// let sig = kp.sign_digest(&digest).unwrap();
/// assert!(verify_signature(&digest, &kp.address(), &sig).unwrap());
/// ```
pub fn verify_signature(
    digest: &[u8],
    address: &str,
    signature: &Signature,
) -> Result<bool, KeyError> {
    if digest.len() != TX_ID_LENGTH {
        return Err(KeyError::InvalidDigest {
            expected: TX_ID_LENGTH,
            got: digest.len(),
        });
    }
    let expected = Base58CheckCodec::new()
        .address_to_binary(address)
        .map_err(|e| KeyError::InvalidAddress(e.to_string()))?;

    let bytes = signature.as_bytes();
    if bytes.len() != SIGNATURE_LENGTH {
        return Err(KeyError::InvalidSignature(format!(
            "expected {} bytes, got {}",
            SIGNATURE_LENGTH,
            bytes.len()
        )));
    }
    let ecdsa = EcdsaSignature::from_slice(&bytes[..SIGNATURE_LENGTH - 1])
        .map_err(|_| KeyError::InvalidSignature("r or s out of range".to_string()))?;
    let recovery_id = bytes[SIGNATURE_LENGTH - 1]
        .checked_sub(SIGNATURE_RECOVERY_OFFSET)
        .and_then(RecoveryId::from_byte)
        .ok_or_else(|| {
            KeyError::InvalidSignature(format!(
                "recovery byte 0x{:02x}",
                bytes[SIGNATURE_LENGTH - 1]
            ))
        })?;

    // A point that does not recover is simply not this account's signature.
    let recovered = match VerifyingKey::recover_from_prehash(digest, &ecdsa, recovery_id) {
        Ok(key) => key,
        Err(_) => return Ok(false),
    };
    let public_key = recovered.to_encoded_point(false);
    let derived = address_from_public_key(public_key.as_bytes())?;
    Ok(derived.as_slice() == expected.as_slice())
}

/// Hex-string form of [`verify_signature`], as wallets pass these values
/// around: a hex transaction ID and a hex signature.
pub fn verify_signature_hex(
    digest_hex: &str,
    address: &str,
    signature_hex: &str,
) -> Result<bool, KeyError> {
    let digest = hex::decode(digest_hex).map_err(|_| KeyError::InvalidHex { field: "digest" })?;
    let signature =
        Signature::from_hex(signature_hex).map_err(|_| KeyError::InvalidHex { field: "signature" })?;
    verify_signature(&digest, address, &signature)
}

fn hash_to_address(point_coordinates: &[u8]) -> [u8; ADDRESS_LENGTH] {
    let hash = keccak256(point_coordinates);
    let mut address = [0u8; ADDRESS_LENGTH];
    address[0] = ADDRESS_PREFIX;
    address[1..].copy_from_slice(&hash[hash.len() - ADDRESS_HASH_LENGTH..]);
    address
}

// ---------------------------------------------------------------------------
// Secp256k1Signer
// ---------------------------------------------------------------------------

/// Signs transaction IDs with a [`TronKeypair`] and appends the result to the
/// signatures already on the transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Secp256k1Signer;

impl Secp256k1Signer {
    pub fn new() -> Self {
        Self
    }
}

impl TransactionSigner for Secp256k1Signer {
    type Key = TronKeypair;

    fn sign(
        &self,
        key: &TronKeypair,
        request: SigningRequest<'_>,
    ) -> Result<SigningResult, SignerError> {
        let digest = hex::decode(request.tx_id)
            .map_err(|e| SignerError::new(format!("transaction id is not hex: {}", e)))?;
        let signature = key
            .sign_digest(&digest)
            .map_err(|e| SignerError::new(e.to_string()))?;

        let mut signatures = request.signatures.to_vec();
        signatures.push(signature);
        Ok(SigningResult { signatures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST_KEY: &str = "787a155554372eb1c3de952436f2e8a370fb3c3a6aa362f9794175e57d7720b3";
    const FIRST_ADDRESS: &str = "TRCoWndNVBfHDBGaDLk1EWwkkRySJDCCUy";
    const SECOND_KEY: &str = "5a1c182f0a363ae133d3f82f9b2001a8128f771a48ae4aee9d06e542a976f087";
    const SECOND_ADDRESS: &str = "TUR81kCbd5AkyRSr6WJSfdC1av85gYfPhe";
    const TX_ID: &str = "77083f847c0cf9e3c0f708fa138c19abc5c5df546e3a07586b99dd00786116c2";
    const FIRST_SIGNATURE: &str = "25d6e4e8472c3462c5fb5bb8a48b9759caf98694f90ec17eb2ea1aefa1d8ad0349981a080808bd50c6c416deb620f5e64ca39c1de5f57ba4665077b510fc9e4c1b";

    #[test]
    fn derives_known_addresses() {
        assert_eq!(TronKeypair::from_hex(FIRST_KEY).unwrap().address(), FIRST_ADDRESS);
        assert_eq!(TronKeypair::from_hex(SECOND_KEY).unwrap().address(), SECOND_ADDRESS);
    }

    #[test]
    fn address_bytes_match_public_key_derivation() {
        let kp = TronKeypair::from_hex(FIRST_KEY).unwrap();
        let derived = address_from_public_key(&kp.public_key_bytes()).unwrap();
        assert_eq!(derived, kp.address_bytes());
        assert_eq!(derived[0], ADDRESS_PREFIX);
    }

    #[test]
    fn secret_key_round_trips() {
        let kp = TronKeypair::from_hex(FIRST_KEY).unwrap();
        assert_eq!(hex::encode(kp.secret_key_bytes()), FIRST_KEY);
    }

    #[test]
    fn generated_keys_are_distinct() {
        let a = TronKeypair::generate();
        let b = TronKeypair::generate();
        assert_ne!(a, b);
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn rejects_invalid_secret_keys() {
        assert_eq!(
            TronKeypair::from_bytes(&[0u8; 32]).unwrap_err(),
            KeyError::InvalidSecretKey
        );
        assert!(TronKeypair::from_bytes(&[1u8; 31]).is_err());
        assert!(TronKeypair::from_hex("not hex").is_err());
        // The curve order itself is not a valid scalar.
        assert!(TronKeypair::from_hex(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
        )
        .is_err());
    }

    #[test]
    fn rejects_malformed_public_keys() {
        assert_eq!(
            address_from_public_key(&[0x04; 33]),
            Err(KeyError::InvalidPublicKey)
        );
        let mut compressed_tag = [0u8; 65];
        compressed_tag[0] = 0x02;
        assert!(address_from_public_key(&compressed_tag).is_err());
    }

    #[test]
    fn debug_output_hides_secret() {
        let kp = TronKeypair::from_hex(FIRST_KEY).unwrap();
        let debug = format!("{:?}", kp);
        assert!(!debug.contains(FIRST_KEY));
        assert!(debug.contains(FIRST_ADDRESS));
    }

    #[test]
    fn signature_is_65_bytes_with_offset_recovery_byte() {
        let kp = TronKeypair::from_hex(FIRST_KEY).unwrap();
        let sig = kp.sign_digest(&hex::decode(TX_ID).unwrap()).unwrap();
        assert_eq!(sig.as_bytes().len(), 65);
        let v = sig.as_bytes()[64];
        assert!(v == 27 || v == 28);
    }

    #[test]
    fn signing_is_deterministic() {
        let kp = TronKeypair::from_hex(FIRST_KEY).unwrap();
        let digest = hex::decode(TX_ID).unwrap();
        assert_eq!(kp.sign_digest(&digest).unwrap(), kp.sign_digest(&digest).unwrap());
    }

    #[test]
    fn different_keys_produce_different_signatures() {
        let digest = hex::decode(TX_ID).unwrap();
        let a = TronKeypair::from_hex(FIRST_KEY).unwrap().sign_digest(&digest).unwrap();
        let b = TronKeypair::from_hex(SECOND_KEY).unwrap().sign_digest(&digest).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn signature_recovers_signer_public_key() {
        let kp = TronKeypair::from_hex(SECOND_KEY).unwrap();
        let digest = hex::decode(TX_ID).unwrap();
        let sig = kp.sign_digest(&digest).unwrap();
        let bytes = sig.as_bytes();

        let ecdsa = EcdsaSignature::from_slice(&bytes[..64]).unwrap();
        let recovery_id = RecoveryId::from_byte(bytes[64] - SIGNATURE_RECOVERY_OFFSET).unwrap();
        let recovered = VerifyingKey::recover_from_prehash(&digest, &ecdsa, recovery_id).unwrap();

        assert_eq!(
            recovered.to_encoded_point(false).as_bytes(),
            kp.public_key_bytes().as_slice()
        );
    }

    #[test]
    fn sign_digest_rejects_wrong_length() {
        let kp = TronKeypair::from_hex(FIRST_KEY).unwrap();
        assert_eq!(
            kp.sign_digest(b"short"),
            Err(KeyError::InvalidDigest {
                expected: TX_ID_LENGTH,
                got: 5
            })
        );
    }

    #[test]
    fn signer_appends_to_prior_signatures() {
        let first = TronKeypair::from_hex(FIRST_KEY).unwrap();
        let second = TronKeypair::from_hex(SECOND_KEY).unwrap();
        let signer = Secp256k1Signer::new();

        let once = signer
            .sign(&first, SigningRequest { tx_id: TX_ID, signatures: &[] })
            .unwrap();
        assert_eq!(once.signatures.len(), 1);

        let twice = signer
            .sign(
                &second,
                SigningRequest {
                    tx_id: TX_ID,
                    signatures: &once.signatures,
                },
            )
            .unwrap();
        assert_eq!(twice.signatures.len(), 2);
        assert_eq!(twice.signatures[0], once.signatures[0]);
    }

    #[test]
    fn signer_rejects_non_hex_transaction_id() {
        let kp = TronKeypair::from_hex(FIRST_KEY).unwrap();
        let result = Secp256k1Signer::new().sign(
            &kp,
            SigningRequest {
                tx_id: "not-a-digest",
                signatures: &[],
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn known_signature_verifies_against_its_address() {
        let digest = hex::decode(TX_ID).unwrap();
        let sig = Signature::from_hex(FIRST_SIGNATURE).unwrap();
        assert_eq!(TronKeypair::from_hex(FIRST_KEY).unwrap().sign_digest(&digest).unwrap(), sig);
        assert_eq!(verify_signature(&digest, FIRST_ADDRESS, &sig), Ok(true));
        assert_eq!(verify_signature_hex(TX_ID, FIRST_ADDRESS, FIRST_SIGNATURE), Ok(true));
    }

    #[test]
    fn signature_does_not_verify_for_another_address_or_digest() {
        let digest = hex::decode(TX_ID).unwrap();
        let sig = Signature::from_hex(FIRST_SIGNATURE).unwrap();
        assert_eq!(verify_signature(&digest, SECOND_ADDRESS, &sig), Ok(false));

        let mut other = digest.clone();
        other[0] ^= 0xff;
        assert_eq!(verify_signature(&other, FIRST_ADDRESS, &sig), Ok(false));
    }

    #[test]
    fn verify_rejects_malformed_input() {
        let digest = hex::decode(TX_ID).unwrap();
        let sig = Signature::from_hex(FIRST_SIGNATURE).unwrap();

        assert_eq!(
            verify_signature(&digest[..31], FIRST_ADDRESS, &sig),
            Err(KeyError::InvalidDigest {
                expected: TX_ID_LENGTH,
                got: 31
            })
        );
        assert!(matches!(
            verify_signature(&digest, "TRCoWndNVBfHDBGaDLk1EWwkkRySJDCCUz", &sig),
            Err(KeyError::InvalidAddress(_))
        ));
        assert!(matches!(
            verify_signature(&digest, FIRST_ADDRESS, &Signature::from_bytes(sig.as_bytes()[..64].to_vec())),
            Err(KeyError::InvalidSignature(_))
        ));

        let mut bad_recovery = sig.as_bytes().to_vec();
        bad_recovery[64] = 0x05;
        assert!(matches!(
            verify_signature(&digest, FIRST_ADDRESS, &Signature::from_bytes(bad_recovery)),
            Err(KeyError::InvalidSignature(_))
        ));

        assert_eq!(
            verify_signature_hex("zz", FIRST_ADDRESS, FIRST_SIGNATURE),
            Err(KeyError::InvalidHex { field: "digest" })
        );
        assert_eq!(
            verify_signature_hex(TX_ID, FIRST_ADDRESS, "not-hex"),
            Err(KeyError::InvalidHex { field: "signature" })
        );
    }

    #[test]
    fn verifies_generated_key_signatures() {
        let kp = TronKeypair::generate();
        let digest = [0x42u8; 32];
        let sig = kp.sign_digest(&digest).unwrap();
        assert_eq!(verify_signature(&digest, &kp.address(), &sig), Ok(true));
    }
}
