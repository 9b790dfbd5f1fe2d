//! EntryPoint ABI helpers.

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, U256},
};

use crate::types::UserOperation;

/// ABI shape of the EntryPoint v0.6 `UserOperation` struct.
///
/// (sender, nonce, initCode, callData, callGasLimit, verificationGasLimit, preVerificationGas,
/// maxFeePerGas, maxPriorityFeePerGas, paymasterAndData, signature)
pub type UserOperationTuple = (
    Address,
    U256,
    Bytes,
    Bytes,
    U256,
    U256,
    U256,
    U256,
    U256,
    Bytes,
    Bytes,
);

pub fn user_op_from_abi(user_op: UserOperationTuple) -> UserOperation {
    let (
        sender,
        nonce,
        init_code,
        call_data,
        call_gas_limit,
        verification_gas_limit,
        pre_verification_gas,
        max_fee_per_gas,
        max_priority_fee_per_gas,
        paymaster_and_data,
        signature,
    ) = user_op;

    UserOperation {
        sender,
        nonce,
        init_code: init_code.0,
        call_data: call_data.0,
        call_gas_limit,
        verification_gas_limit,
        pre_verification_gas,
        max_fee_per_gas,
        max_priority_fee_per_gas,
        paymaster_and_data: paymaster_and_data.0,
        signature: signature.0,
    }
}
