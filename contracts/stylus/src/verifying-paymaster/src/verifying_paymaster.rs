//! Stylus-based ERC-4337 (EntryPoint v0.6) **verifying paymaster**.
//!
//! A trusted off-chain verifier signs each sponsorship. The signature covers the user operation
//! and the sponsorship terms (validity window, fee token, exchange rate), bound to this paymaster,
//! the chain and the EntryPoint.
//!
//! Design notes:
//! - Validation is pure: decode, hash, recover, compare. The EntryPoint enforces the window.
//! - A wrong signer is reported through `validationData` (sig failed), never through a revert,
//!   so bundler simulation still sees the window.
//! - Token settlement happens in `postOp`. A failed token pull reverts with
//!   `TokenPaymentFailed`, and the EntryPoint's `PostOpReverted` retry is waived.

use alloc::{string::ToString, vec::Vec};

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{aliases::U48, Address, FixedBytes, U256},
    alloy_sol_types::SolCall,
    prelude::*,
    stylus_core::calls::{context::Call, CallAccess},
};

use alloy_sol_types::sol;
use stylus_sdk::stylus_proc::SolidityError;

use crate::{
    authorization::validate_user_op,
    config::PaymasterConfig,
    decoder::parse_paymaster_and_data,
    entry_point::interfaces::IEntryPoint,
    errors::{ConfigError, SettlementFailure, ValidationError},
    ledger::onchain::OnchainTokenLedger,
    settlement::settle,
    types::{paymaster_hash, CommitmentDomain, PostOpMode, SettlementContext},
    utils::{
        crypto::PrecompileRecovery,
        entry_point::{user_op_from_abi, UserOperationTuple},
    },
};

/// Gas forwarded to the fee token's `transferFrom`.
const TOKEN_CALL_GAS: u64 = 100_000;

sol! {
    error AlreadyInitialized();
    error ZeroAddress();
    error Unauthorized(address caller);
    error NotFromEntryPoint(address caller);
    error InvalidPaymasterData(string reason);
    error InvalidSignature(string reason);
    error InvalidContext();
    error InvalidPostOpMode(uint8 mode);
    error TokenPaymentFailed(address token, address sender, uint256 amount);
    error EntryPointCallFailed();
}

#[derive(SolidityError)]
pub enum PaymasterError {
    AlreadyInitialized(AlreadyInitialized),
    ZeroAddress(ZeroAddress),
    Unauthorized(Unauthorized),
    NotFromEntryPoint(NotFromEntryPoint),
    InvalidPaymasterData(InvalidPaymasterData),
    InvalidSignature(InvalidSignature),
    InvalidContext(InvalidContext),
    InvalidPostOpMode(InvalidPostOpMode),
    TokenPaymentFailed(TokenPaymentFailed),
    EntryPointCallFailed(EntryPointCallFailed),
}

impl From<ConfigError> for PaymasterError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Unauthorized { caller } => {
                PaymasterError::Unauthorized(Unauthorized { caller })
            }
        }
    }
}

impl From<ValidationError> for PaymasterError {
    fn from(e: ValidationError) -> Self {
        let reason = e.reason().to_string();
        match e {
            ValidationError::Format(_) => {
                PaymasterError::InvalidPaymasterData(InvalidPaymasterData { reason })
            }
            ValidationError::Signature(_) => {
                PaymasterError::InvalidSignature(InvalidSignature { reason })
            }
        }
    }
}

impl From<SettlementFailure> for PaymasterError {
    fn from(e: SettlementFailure) -> Self {
        PaymasterError::TokenPaymentFailed(TokenPaymentFailed {
            token: e.token,
            sender: e.sender,
            amount: e.amount,
        })
    }
}

sol_storage! {
    #[entrypoint]
    pub struct VerifyingPaymaster {
        /// The only caller allowed into the paymaster callbacks.
        address entry_point;
        address owner;
        /// Key whose signatures authorize sponsorship.
        address verifier;
        /// Receives token payments.
        address vault;
        bool initialized;
    }
}

#[public]
impl VerifyingPaymaster {
    /// Runs once, at deployment. Verifier and vault start as the owner.
    #[constructor]
    pub fn constructor(&mut self, entry_point: Address, owner: Address) -> Result<(), PaymasterError> {
        if self.initialized.get() {
            return Err(PaymasterError::AlreadyInitialized(AlreadyInitialized {}));
        }
        if entry_point.is_zero() || owner.is_zero() {
            return Err(PaymasterError::ZeroAddress(ZeroAddress {}));
        }
        let config = PaymasterConfig::new(owner);
        self.entry_point.set(entry_point);
        self.store_config(config);
        self.initialized.set(true);
        Ok(())
    }

    pub fn entry_point(&self) -> Address {
        self.entry_point.get()
    }

    pub fn owner(&self) -> Address {
        self.owner.get()
    }

    pub fn verifier(&self) -> Address {
        self.verifier.get()
    }

    pub fn vault(&self) -> Address {
        self.vault.get()
    }

    /// Rotating the verifier invalidates every outstanding authorization.
    pub fn set_verifier(&mut self, verifier: Address) -> Result<(), PaymasterError> {
        let caller = self.vm().msg_sender();
        let mut config = self.load_config();
        config.set_verifier(caller, verifier)?;
        self.store_config(config);
        Ok(())
    }

    pub fn set_vault(&mut self, vault: Address) -> Result<(), PaymasterError> {
        let caller = self.vm().msg_sender();
        let mut config = self.load_config();
        config.set_vault(caller, vault)?;
        self.store_config(config);
        Ok(())
    }

    /// Decode `paymasterAndData` into
    /// `(validUntil, validAfter, token, exchangeRate, signature)`.
    pub fn parse_paymaster_and_data(
        &self,
        paymaster_and_data: Bytes,
    ) -> Result<(U48, U48, Address, U256, Bytes), PaymasterError> {
        let (_paymaster, data) = parse_paymaster_and_data(&paymaster_and_data)
            .map_err(ValidationError::from)?;
        Ok((
            U48::from(data.valid_until),
            U48::from(data.valid_after),
            data.token,
            data.exchange_rate,
            Bytes(data.signature),
        ))
    }

    /// The commitment the verifier signs (before EIP-191 wrapping).
    pub fn get_hash(
        &self,
        user_op: UserOperationTuple,
        valid_until: U48,
        valid_after: U48,
        token: Address,
        exchange_rate: U256,
    ) -> FixedBytes<32> {
        let op = user_op_from_abi(user_op);
        paymaster_hash(
            &op,
            &self.domain(),
            valid_until.to::<u64>(),
            valid_after.to::<u64>(),
            token,
            exchange_rate,
        )
    }

    /// `IPaymaster.validatePaymasterUserOp`.
    ///
    /// Returns the settlement context (empty unless accepted) and the packed validation data.
    pub fn validate_paymaster_user_op(
        &mut self,
        user_op: UserOperationTuple,
        _user_op_hash: FixedBytes<32>,
        _max_cost: U256,
    ) -> Result<(Bytes, U256), PaymasterError> {
        self.ensure_entry_point()?;

        let op = user_op_from_abi(user_op);
        let outcome = validate_user_op(
            &op,
            &self.domain(),
            &self.load_config(),
            &PrecompileRecovery::new(self.vm()),
        )?;

        let context = outcome
            .context
            .as_ref()
            .map(SettlementContext::encode)
            .unwrap_or_default();
        Ok((Bytes(context), outcome.validation_data()))
    }

    /// `IPaymaster.postOp`.
    pub fn post_op(
        &mut self,
        mode: u8,
        context: Bytes,
        actual_gas_cost: U256,
    ) -> Result<(), PaymasterError> {
        self.ensure_entry_point()?;

        let mode = PostOpMode::try_from(mode)
            .map_err(|_| PaymasterError::InvalidPostOpMode(InvalidPostOpMode { mode }))?;
        let ctx = SettlementContext::decode(&context)
            .ok_or(PaymasterError::InvalidContext(InvalidContext {}))?;

        let vault = self.vault.get();
        let mut ledger = OnchainTokenLedger::new(self.vm(), TOKEN_CALL_GAS);
        settle(&ctx, mode, actual_gas_cost, vault, &mut ledger)?;
        Ok(())
    }

    /// Add `msg.value` to this paymaster's EntryPoint deposit.
    #[payable]
    pub fn deposit(&mut self) -> Result<(), PaymasterError> {
        let value = self.vm().msg_value();
        let this = self.vm().contract_address();
        let data = IEntryPoint::depositToCall { account: this }.abi_encode();
        self.call_entry_point(value, &data)?;
        Ok(())
    }

    pub fn get_deposit(&self) -> Result<U256, PaymasterError> {
        let this = self.vm().contract_address();
        let data = IEntryPoint::balanceOfCall { account: this }.abi_encode();
        let out = self
            .vm()
            .static_call(&Call::new(), self.entry_point.get(), &data)
            .map_err(|_| PaymasterError::EntryPointCallFailed(EntryPointCallFailed {}))?;
        if out.len() < 32 {
            return Err(PaymasterError::EntryPointCallFailed(EntryPointCallFailed {}));
        }
        Ok(U256::from_be_slice(&out[0..32]))
    }

    pub fn withdraw_to(
        &mut self,
        withdraw_address: Address,
        amount: U256,
    ) -> Result<(), PaymasterError> {
        self.ensure_owner()?;
        let data = IEntryPoint::withdrawToCall {
            withdrawAddress: withdraw_address,
            withdrawAmount: amount,
        }
        .abi_encode();
        self.call_entry_point(U256::ZERO, &data)?;
        Ok(())
    }

    #[payable]
    pub fn add_stake(&mut self, unstake_delay_sec: u32) -> Result<(), PaymasterError> {
        self.ensure_owner()?;
        let value = self.vm().msg_value();
        let data = IEntryPoint::addStakeCall {
            unstakeDelaySec: unstake_delay_sec,
        }
        .abi_encode();
        self.call_entry_point(value, &data)?;
        Ok(())
    }

    pub fn unlock_stake(&mut self) -> Result<(), PaymasterError> {
        self.ensure_owner()?;
        let data = IEntryPoint::unlockStakeCall {}.abi_encode();
        self.call_entry_point(U256::ZERO, &data)?;
        Ok(())
    }

    pub fn withdraw_stake(&mut self, withdraw_address: Address) -> Result<(), PaymasterError> {
        self.ensure_owner()?;
        let data = IEntryPoint::withdrawStakeCall {
            withdrawAddress: withdraw_address,
        }
        .abi_encode();
        self.call_entry_point(U256::ZERO, &data)?;
        Ok(())
    }
}

impl VerifyingPaymaster {
    fn load_config(&self) -> PaymasterConfig {
        PaymasterConfig {
            owner: self.owner.get(),
            verifier: self.verifier.get(),
            vault: self.vault.get(),
        }
    }

    fn store_config(&mut self, config: PaymasterConfig) {
        self.owner.set(config.owner);
        self.verifier.set(config.verifier);
        self.vault.set(config.vault);
    }

    fn domain(&self) -> CommitmentDomain {
        CommitmentDomain {
            paymaster: self.vm().contract_address(),
            chain_id: self.vm().chain_id(),
            entry_point: self.entry_point.get(),
        }
    }

    fn ensure_owner(&self) -> Result<(), PaymasterError> {
        let caller = self.vm().msg_sender();
        self.load_config().ensure_owner(caller)?;
        Ok(())
    }

    fn ensure_entry_point(&self) -> Result<(), PaymasterError> {
        let caller = self.vm().msg_sender();
        if caller != self.entry_point.get() {
            return Err(PaymasterError::NotFromEntryPoint(NotFromEntryPoint {
                caller,
            }));
        }
        Ok(())
    }

    fn call_entry_point(&mut self, value: U256, data: &[u8]) -> Result<Vec<u8>, PaymasterError> {
        let entry_point = self.entry_point.get();
        self.vm()
            .call(&Call::new().value(value), entry_point, data)
            .map_err(|_| PaymasterError::EntryPointCallFailed(EntryPointCallFailed {}))
    }
}
