use alloc::vec::Vec;

use alloy_primitives::{Address, U256};

/// ERC-4337 (EntryPoint v0.6) user operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserOperation {
    pub sender: Address,
    /// Anti-replay counter, enforced by the EntryPoint.
    pub nonce: U256,
    /// Account factory call, only present on first use.
    pub init_code: Vec<u8>,
    pub call_data: Vec<u8>,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    /// `paymaster || sponsor data`.
    pub paymaster_and_data: Vec<u8>,
    /// Account signature. Not covered by the paymaster commitment.
    pub signature: Vec<u8>,
}
