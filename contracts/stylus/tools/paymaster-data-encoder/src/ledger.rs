//! In-memory ERC-20 ledger for tests.

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};

pub use verifying_paymaster_types::{TokenLedger, TransferError};

/// Balances and allowances for any number of tokens. `transfer_from` is executed as `spender`
/// (the paymaster), so only allowances granted to it count.
///
/// Transfers are all-or-nothing, like a reverting ERC-20.
#[derive(Clone, Debug, Default)]
pub struct MockTokenLedger {
    spender: Address,
    balances: BTreeMap<(Address, Address), U256>,
    allowances: BTreeMap<(Address, Address, Address), U256>,
    broken: Vec<Address>,
    transfers: usize,
}

impl MockTokenLedger {
    pub fn new(spender: Address) -> Self {
        Self {
            spender,
            ..Default::default()
        }
    }

    pub fn mint(&mut self, token: Address, owner: Address, amount: U256) {
        let balance = self.balances.entry((token, owner)).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub fn spender(&self) -> Address {
        self.spender
    }

    /// `owner` approves `spender` for `amount` of `token`.
    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((token, owner, spender), amount);
    }

    /// Every later transfer of `token` reverts.
    pub fn break_token(&mut self, token: Address) {
        self.broken.push(token);
    }

    pub fn balance_of(&self, token: Address, owner: Address) -> U256 {
        self.balances
            .get(&(token, owner))
            .copied()
            .unwrap_or_default()
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Number of `transfer_from` calls, successful or not.
    pub fn transfer_count(&self) -> usize {
        self.transfers
    }
}

impl TokenLedger for MockTokenLedger {
    fn transfer_from(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        self.transfers += 1;
        if self.broken.contains(&token) {
            return Err(TransferError::CallFailed);
        }

        let allowance = self.allowance(token, from, self.spender);
        if allowance < amount {
            return Err(TransferError::InsufficientAllowance);
        }
        let balance = self.balance_of(token, from);
        if balance < amount {
            return Err(TransferError::InsufficientBalance);
        }

        self.allowances
            .insert((token, from, self.spender), allowance - amount);
        self.balances.insert((token, from), balance - amount);
        self.mint(token, to, amount);
        Ok(())
    }
}
