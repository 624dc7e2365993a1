//! Caller-facing input validation.
//!
//! Wallets check user input before asking the node to create a transaction:
//! the amount must be a positive signed-64-bit number of sun, and the
//! receiving address must be well formed. Both checks are cheap and touch no
//! state.

use super::error::ValidationError;
use crate::config::{MAX_TRANSFER_AMOUNT, MIN_TRANSFER_AMOUNT};
use crate::crypto::address::AddressCodec;

/// Checks that `amount` (in sun) lies in `1 ..= 2^63 - 1`.
///
/// Takes `i128` so that negative amounts and amounts just past the signed
/// 64-bit maximum can be expressed and rejected.
pub fn validate_value(amount: i128) -> Result<(), ValidationError> {
    if !(MIN_TRANSFER_AMOUNT..=MAX_TRANSFER_AMOUNT).contains(&amount) {
        return Err(ValidationError::ValueOutOfRange {
            value: amount,
            min: MIN_TRANSFER_AMOUNT,
            max: MAX_TRANSFER_AMOUNT,
        });
    }
    Ok(())
}

/// Checks that `address` is well formed according to `codec`.
pub fn validate_address(codec: &dyn AddressCodec, address: &str) -> Result<(), ValidationError> {
    if !codec.is_valid_address(address) {
        return Err(ValidationError::InvalidAddress {
            address: address.to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
