//! # Account Addresses
//!
//! An account address is 21 bytes: the `0x41` network prefix followed by the
//! last 20 bytes of `Keccak-256(uncompressed public key)`. Humans see it as
//! base58check (`T...`, 34 characters); the node's JSON shows it as hex
//! (`41...`, 42 characters); contract payloads carry the raw bytes.
//!
//! ```text
//! raw:         41 c4530f6bfa902b7398ac773da56106a15af15f92
//! base58check: base58(raw || sha256(sha256(raw))[..4]) -> TTsGwnTLQ4eryF...
//! ```
//!
//! The transaction codec never calls base58 directly. It talks to an
//! [`AddressCodec`], so callers can swap in their own address service (or a
//! fixture-backed double in tests). [`Base58CheckCodec`] is the real one.

use thiserror::Error;

use crate::config::{ADDRESS_LENGTH, ADDRESS_PREFIX};

/// Errors that can occur while converting addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The text is not valid base58, or its checksum does not match.
    #[error("invalid base58check address: {0}")]
    Base58(String),

    /// The text is not valid hex.
    #[error("invalid hex address: {0}")]
    Hex(String),

    /// The raw address has the wrong number of bytes.
    #[error("invalid address length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },

    /// The raw address does not start with the network prefix byte.
    #[error("invalid address prefix: expected 0x{expected:02x}, got 0x{got:02x}")]
    InvalidPrefix {
        /// The prefix every address must carry.
        expected: u8,
        /// The prefix that was found.
        got: u8,
    },
}

/// Conversion between checksummed text addresses and raw address bytes.
///
/// Implementations must round-trip: for every `text` that
/// `address_to_binary` accepts, `binary_to_address` of the result returns
/// `text` again.
pub trait AddressCodec {
    /// Returns `true` if `address` is a well-formed checksummed address.
    fn is_valid_address(&self, address: &str) -> bool {
        self.address_to_binary(address).is_ok()
    }

    /// Decodes a checksummed text address into raw bytes.
    fn address_to_binary(&self, address: &str) -> Result<Vec<u8>, AddressError>;

    /// Encodes raw address bytes as a checksummed text address.
    fn binary_to_address(&self, bytes: &[u8]) -> Result<String, AddressError>;
}

/// The network's own address format: base58check over prefixed raw bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Base58CheckCodec;

impl Base58CheckCodec {
    /// Creates the codec. It carries no state.
    pub fn new() -> Self {
        Self
    }

    /// Converts a hex address (`41...`, as the node prints it) to base58check.
    pub fn hex_to_address(&self, hex_address: &str) -> Result<String, AddressError> {
        let bytes = hex::decode(hex_address).map_err(|e| AddressError::Hex(e.to_string()))?;
        self.binary_to_address(&bytes)
    }

    /// Converts a base58check address to its lowercase hex form.
    pub fn address_to_hex(&self, address: &str) -> Result<String, AddressError> {
        self.address_to_binary(address).map(hex::encode)
    }
}

impl AddressCodec for Base58CheckCodec {
    fn address_to_binary(&self, address: &str) -> Result<Vec<u8>, AddressError> {
        // `with_check` strips and verifies the trailing four checksum bytes.
        let bytes = bs58::decode(address)
            .with_check(None)
            .into_vec()
            .map_err(|e| AddressError::Base58(e.to_string()))?;
        check_raw_address(&bytes)?;
        Ok(bytes)
    }

    fn binary_to_address(&self, bytes: &[u8]) -> Result<String, AddressError> {
        check_raw_address(bytes)?;
        Ok(bs58::encode(bytes).with_check().into_string())
    }
}

/// Validates the shape of a raw address: length first, then prefix.
fn check_raw_address(bytes: &[u8]) -> Result<(), AddressError> {
    if bytes.len() != ADDRESS_LENGTH {
        return Err(AddressError::InvalidLength {
            expected: ADDRESS_LENGTH,
            got: bytes.len(),
        });
    }
    if bytes[0] != ADDRESS_PREFIX {
        return Err(AddressError::InvalidPrefix {
            expected: ADDRESS_PREFIX,
            got: bytes[0],
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "TTsGwnTLQ4eryFJpDvJSfuGQxPXRCjXvZz";
    const OWNER_HEX: &str = "41c4530f6bfa902b7398ac773da56106a15af15f92";
    const RECEIVER: &str = "TNYssiPgaf9XYz3urBUqr861Tfqxvko47B";
    const RECEIVER_HEX: &str = "4189ffaf9da8c6fae32189b2e6dce228249b1129aa";

    #[test]
    fn decodes_known_addresses() {
        let codec = Base58CheckCodec::new();
        assert_eq!(codec.address_to_hex(OWNER).unwrap(), OWNER_HEX);
        assert_eq!(codec.address_to_hex(RECEIVER).unwrap(), RECEIVER_HEX);
    }

    #[test]
    fn encodes_known_addresses() {
        let codec = Base58CheckCodec::new();
        assert_eq!(codec.hex_to_address(OWNER_HEX).unwrap(), OWNER);
        assert_eq!(codec.hex_to_address(RECEIVER_HEX).unwrap(), RECEIVER);
    }

    #[test]
    fn round_trips_through_binary() {
        let codec = Base58CheckCodec::new();
        let raw = codec.address_to_binary(OWNER).unwrap();
        assert_eq!(raw.len(), ADDRESS_LENGTH);
        assert_eq!(raw[0], ADDRESS_PREFIX);
        assert_eq!(codec.binary_to_address(&raw).unwrap(), OWNER);
    }

    #[test]
    fn valid_addresses_are_accepted() {
        let codec = Base58CheckCodec::new();
        assert!(codec.is_valid_address(OWNER));
        assert!(codec.is_valid_address(RECEIVER));
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let codec = Base58CheckCodec::new();
        let corrupted = format!("{}a", &OWNER[..OWNER.len() - 1]);
        assert!(!codec.is_valid_address(&corrupted));
        assert!(matches!(
            codec.address_to_binary(&corrupted),
            Err(AddressError::Base58(_))
        ));
    }

    #[test]
    fn non_base58_text_is_rejected() {
        let codec = Base58CheckCodec::new();
        // '0', 'O', 'I' and 'l' are not in the base58 alphabet.
        assert!(!codec.is_valid_address("T0OIl"));
        assert!(!codec.is_valid_address(""));
        assert!(!codec.is_valid_address(OWNER_HEX));
    }

    #[test]
    fn wrong_prefix_is_rejected() {
        let codec = Base58CheckCodec::new();
        let mut raw = hex::decode(OWNER_HEX).unwrap();
        raw[0] = 0x00;
        let text = bs58::encode(&raw).with_check().into_string();
        assert_eq!(
            codec.address_to_binary(&text),
            Err(AddressError::InvalidPrefix {
                expected: ADDRESS_PREFIX,
                got: 0x00
            })
        );
        assert!(codec.binary_to_address(&raw).is_err());
    }

    #[test]
    fn wrong_length_is_rejected() {
        let codec = Base58CheckCodec::new();
        let raw = hex::decode(&OWNER_HEX[..40]).unwrap();
        assert_eq!(
            codec.binary_to_address(&raw),
            Err(AddressError::InvalidLength {
                expected: ADDRESS_LENGTH,
                got: 20
            })
        );
    }

    #[test]
    fn malformed_hex_is_rejected() {
        let codec = Base58CheckCodec::new();
        assert!(matches!(
            codec.hex_to_address("41zz"),
            Err(AddressError::Hex(_))
        ));
    }
}
