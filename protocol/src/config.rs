//! # Protocol Configuration & Constants
//!
//! Every magic number the codec relies on lives here. These values are fixed
//! by the TRX node software; changing one of them does not change the
//! network, it just makes this crate disagree with it.

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Leading byte of every mainnet account address. This is why every
/// base58check address on the network starts with a `T`.
pub const ADDRESS_PREFIX: u8 = 0x41;

/// Raw address length: one prefix byte plus the 20-byte Keccak-256 tail of
/// the uncompressed public key.
pub const ADDRESS_LENGTH: usize = 21;

/// Length of the public key hash embedded in an address.
pub const ADDRESS_HASH_LENGTH: usize = ADDRESS_LENGTH - 1;

// ---------------------------------------------------------------------------
// Hashes & Signatures
// ---------------------------------------------------------------------------

/// Transaction ID length in bytes. SHA-256 output, hex-encoded on the wire
/// as 64 characters.
pub const TX_ID_LENGTH: usize = 32;

/// Recoverable secp256k1 signature length: `r (32) || s (32) || v (1)`.
pub const SIGNATURE_LENGTH: usize = 65;

/// Offset added to the recovery id when it is serialized as `v`. Inherited
/// from Ethereum; the node accepts both forms, wallets emit this one.
pub const SIGNATURE_RECOVERY_OFFSET: u8 = 27;

/// Secret key length for secp256k1.
pub const SECRET_KEY_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// Discriminator of `TransferContract` in the node's `ContractType` enum.
pub const TRANSFER_CONTRACT_CODE: i32 = 1;

/// Discriminator of `AccountPermissionUpdateContract`.
pub const ACCOUNT_PERMISSION_UPDATE_CONTRACT_CODE: i32 = 46;

/// Wire name of the transfer contract, as the node prints it in JSON.
pub const TRANSFER_CONTRACT_NAME: &str = "TransferContract";

/// Wire name of the account permission update contract.
pub const ACCOUNT_PERMISSION_UPDATE_CONTRACT_NAME: &str = "AccountPermissionUpdateContract";

/// Prefix the node puts in front of every `google.protobuf.Any` type URL.
pub const TYPE_URL_PREFIX: &str = "type.googleapis.com/protocol.";

// ---------------------------------------------------------------------------
// Transaction Limits
// ---------------------------------------------------------------------------

/// A transaction carries exactly this many contracts. The node schema allows
/// a list; nothing on the network has ever used more than one.
pub const CONTRACTS_PER_TRANSACTION: usize = 1;

/// Smallest transferable amount, in sun (10^-6 TRX).
pub const MIN_TRANSFER_AMOUNT: i128 = 1;

/// Largest transferable amount: `Long.MAX_VALUE` in the node's Java runtime.
pub const MAX_TRANSFER_AMOUNT: i128 = i64::MAX as i128;

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Returns the full `type_url` for a contract message name.
pub fn type_url_for(contract_name: &str) -> String {
    format!("{}{}", TYPE_URL_PREFIX, contract_name)
}
