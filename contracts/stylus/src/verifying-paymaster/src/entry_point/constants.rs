//! Constants mirrored from the EntryPoint and the EVM.

use stylus_sdk::alloy_primitives::{Address, U256};

/// `ecrecover` precompile.
pub const ECRECOVER_PRECOMPILE: Address = Address::new([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
]);

/// Gas forwarded to the precompile (3000 is its fixed cost).
pub const ECRECOVER_GAS: u64 = 10_000;

/// secp256k1n / 2. Signatures with a larger `s` are rejected.
pub const SECP256K1_HALF_ORDER: U256 = U256::from_limbs([
    0xDFE9_2F46_681B_20A0,
    0x5D57_6E73_57A4_501D,
    0xFFFF_FFFF_FFFF_FFFF,
    0x7FFF_FFFF_FFFF_FFFF,
]);
