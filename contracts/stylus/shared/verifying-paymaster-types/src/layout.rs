//! Byte layout of `paymasterAndData` and numeric constants shared by both sides.
//!
//! ```text
//! paymaster:20 | validUntil:6 | validAfter:6 | token:20 | exchangeRate:32 | signature:65
//! ```
//!
//! Integer fields are big-endian and fixed width. The leading paymaster address routes the
//! operation to this contract and is stripped before the sponsor data is decoded.

use alloy_primitives::U256;

pub const PAYMASTER_ADDRESS_LEN: usize = 20;

pub const VALID_UNTIL_LEN: usize = 6;
pub const VALID_AFTER_LEN: usize = 6;
pub const TOKEN_LEN: usize = 20;
pub const EXCHANGE_RATE_LEN: usize = 32;

/// Length of the fixed fields in front of the signature.
pub const FIXED_FIELDS_LEN: usize = VALID_UNTIL_LEN + VALID_AFTER_LEN + TOKEN_LEN + EXCHANGE_RATE_LEN;

/// ECDSA signature as `r || s || v`.
pub const SIGNATURE_LEN: usize = 65;

/// Offset of `validUntil` inside `paymasterAndData`.
pub const VALID_TIMESTAMP_OFFSET: usize = PAYMASTER_ADDRESS_LEN;

/// Offset of the signature inside `paymasterAndData`.
pub const SIGNATURE_OFFSET: usize = VALID_TIMESTAMP_OFFSET + FIXED_FIELDS_LEN;

/// Well-formed sponsor data (after the paymaster address).
pub const SPONSOR_DATA_LEN: usize = FIXED_FIELDS_LEN + SIGNATURE_LEN;

/// Well-formed `paymasterAndData`.
pub const PAYMASTER_AND_DATA_LEN: usize = SIGNATURE_OFFSET + SIGNATURE_LEN;

/// Largest value representable by a `uint48` timestamp.
pub const MAX_U48: u64 = (1 << 48) - 1;

/// Fixed-point scale of `exchangeRate` (10^18).
pub const EXCHANGE_RATE_SCALE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);
