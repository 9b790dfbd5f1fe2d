use stylus_sdk::{
    alloy_primitives::{Address, U256},
    alloy_sol_types::SolCall,
    stylus_core::{
        calls::{context::Call, CallAccess},
        Host,
    },
};

use crate::{
    entry_point::interfaces::IERC20,
    types::{TokenLedger, TransferError},
};

/// ERC-20 ledger that calls `transferFrom` on the token contract, as the paymaster.
pub struct OnchainTokenLedger<'a> {
    vm: &'a dyn Host,
    /// Gas forwarded to each token call.
    gas_cap: u64,
}

impl<'a> OnchainTokenLedger<'a> {
    pub fn new(vm: &'a dyn Host, gas_cap: u64) -> Self {
        Self { vm, gas_cap }
    }
}

impl TokenLedger for OnchainTokenLedger<'_> {
    fn transfer_from(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        let data = IERC20::transferFromCall { from, to, amount }.abi_encode();

        let out = self
            .vm
            .call(&Call::new().gas(self.gas_cap), token, &data)
            .map_err(|_| TransferError::CallFailed)?;
        transfer_succeeded(&out)
    }
}

/// Tokens that return nothing (USDT style) are treated as successful; anything else must be a
/// single ABI `true`.
fn transfer_succeeded(out: &[u8]) -> Result<(), TransferError> {
    if out.is_empty() {
        return Ok(());
    }
    if out.len() < 32 {
        return Err(TransferError::Rejected);
    }
    if U256::from_be_slice(&out[0..32]) != U256::from(1u64) {
        return Err(TransferError::Rejected);
    }
    Ok(())
}
