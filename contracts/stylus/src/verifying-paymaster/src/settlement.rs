//! Post-execution settlement.
//!
//! Native-token sponsorship costs the paymaster its EntryPoint deposit and nothing else. Token
//! sponsorship charges the sender `actualGasCost * exchangeRate / 1e18` of the token, pulled
//! into the vault with `transferFrom`. A failed pull is returned as an error so the caller can
//! revert; the EntryPoint then calls back with `PostOpReverted`, which is never charged.

use stylus_sdk::alloy_primitives::{Address, U256};

use crate::{
    errors::{SettlementFailure, SettlementFailureCause},
    types::{layout::EXCHANGE_RATE_SCALE, PostOpMode, SettlementContext, TokenLedger},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settlement {
    /// Native gas, covered by the deposit.
    Sponsored,
    /// Second-chance call after a reverted `postOp`.
    Waived,
    Charged { token: Address, amount: U256 },
}

/// Token amount owed for `actual_gas_cost` wei at `exchange_rate` (18-decimal fixed point).
///
/// Rounds down. `None` when the intermediate product overflows.
pub fn token_charge(actual_gas_cost: U256, exchange_rate: U256) -> Option<U256> {
    actual_gas_cost
        .checked_mul(exchange_rate)
        .map(|scaled| scaled / EXCHANGE_RATE_SCALE)
}

pub fn settle<L: TokenLedger>(
    ctx: &SettlementContext,
    mode: PostOpMode,
    actual_gas_cost: U256,
    vault: Address,
    ledger: &mut L,
) -> Result<Settlement, SettlementFailure> {
    if ctx.is_native() {
        return Ok(Settlement::Sponsored);
    }
    if mode == PostOpMode::PostOpReverted {
        return Ok(Settlement::Waived);
    }

    let amount =
        token_charge(actual_gas_cost, ctx.exchange_rate).ok_or(SettlementFailure {
            token: ctx.token,
            sender: ctx.sender,
            amount: U256::ZERO,
            cause: SettlementFailureCause::ChargeOverflow,
        })?;

    // A zero charge still goes through the token so that its own rules apply.
    ledger
        .transfer_from(ctx.token, ctx.sender, vault, amount)
        .map_err(|e| SettlementFailure {
            token: ctx.token,
            sender: ctx.sender,
            amount,
            cause: SettlementFailureCause::Transfer(e),
        })?;

    Ok(Settlement::Charged {
        token: ctx.token,
        amount,
    })
}
