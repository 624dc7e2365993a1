//! Error types for the transaction codec.
//!
//! One enum per operation family, each exhaustive over its failure modes.
//! Every variant names the field or contract it is about, so a caller can
//! tell the user exactly what was wrong with the input. [`TransactionError`]
//! unifies them for callers that chain operations with `?`.

use thiserror::Error;

/// Failures while decoding a node-supplied transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input text is not JSON, or not shaped like a node transaction.
    #[error("malformed transaction json: {reason}")]
    MalformedJson { reason: String },

    /// A hex-encoded field could not be normalized to bytes.
    #[error("invalid hex in {field}: {reason}")]
    InvalidHex { field: String, reason: String },

    /// There is no `raw_data_hex` body to decode.
    #[error("transaction has no raw data body")]
    MissingRawData,

    /// The envelope does not carry exactly one contract.
    #[error("expected exactly one contract, found {count}")]
    ContractCountInvalid { count: usize },

    /// The contract discriminator is not one this codec understands.
    #[error("unsupported contract type {discriminator} at contract[{index}]")]
    UnsupportedContract { index: usize, discriminator: String },

    /// Binary decoding failed, or a payload disagrees with its declared type.
    #[error("malformed payload in {context}: {reason}")]
    MalformedPayload { context: String, reason: String },

    /// An address inside a contract payload is not a valid account address.
    #[error("invalid address in {field}: {reason}")]
    InvalidAddress { field: String, reason: String },
}

/// Failures while attaching a new signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    /// The signer did not return more signatures than the transaction had.
    #[error("signing did not return an additional signature (had {prior}, got {returned})")]
    NoAdditionalSignature { prior: usize, returned: usize },

    /// The signer returned a signature that is already on the transaction.
    #[error("signing yielded a signature already present at index {index}")]
    DuplicateSignature { index: usize },

    /// The transaction has no sender to sign for.
    #[error("transaction has no sender")]
    MissingSender,

    /// A value transfer has no receiver.
    #[error("transaction has no destination")]
    MissingDestination,

    /// The external signer reported a failure of its own.
    #[error("signer failed: {0}")]
    SignerFailed(String),
}

/// Failures while finalizing a transaction for hand-off.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A buildable transaction must have been decoded and carry an ID.
    #[error("a valid transaction must have an id")]
    MissingId,
}

/// Failures while projecting a transaction back to the node's format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The transaction was never decoded.
    #[error("transaction has no raw data")]
    NoRawData,

    /// A payload address could not be rendered as text.
    #[error("invalid address in {field}: {reason}")]
    InvalidAddress { field: String, reason: String },

    /// A stored payload no longer decodes.
    #[error("malformed payload in {context}: {reason}")]
    MalformedPayload { context: String, reason: String },

    /// JSON serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Failures of the caller-facing input validators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A transfer amount outside `1 ..= 2^63 - 1` sun.
    #[error("value {value} is out of range [{min}, {max}]")]
    ValueOutOfRange { value: i128, min: i128, max: i128 },

    /// Text that is not a well-formed account address.
    #[error("{address} is not a valid base58 address")]
    InvalidAddress { address: String },
}

/// Any failure raised by the public transaction operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
