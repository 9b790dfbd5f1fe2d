//! RPC plumbing: contract bindings and a signing client.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use ethers::{
    contract::abigen,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, TransactionReceipt, U256},
    utils::format_ether,
};
use serde::Serialize;

abigen!(
    VerifyingPaymasterContract,
    r#"[
        function deposit() external payable
        function addStake(uint32 unstakeDelaySec) external payable
    ]"#
);

abigen!(
    EntryPointContract,
    r#"[
        function getDepositInfo(address account) external view returns (uint112 deposit, bool staked, uint112 stake, uint32 unstakeDelaySec, uint48 withdrawTime)
    ]"#
);

pub type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

pub fn provider(rpc_url: &str) -> Result<Provider<Http>> {
    Provider::<Http>::try_from(rpc_url).with_context(|| format!("invalid RPC URL {rpc_url}"))
}

/// Wallet bound to the chain id reported by the node.
pub async fn client(rpc_url: &str, private_key: &str) -> Result<Arc<Client>> {
    let provider = provider(rpc_url)?;
    let chain_id = provider
        .get_chainid()
        .await
        .context("failed fetching chain id")?
        .as_u64();
    let wallet: LocalWallet = private_key
        .parse()
        .map_err(|e| anyhow!("invalid private key: {e}"))?;
    tracing::debug!(signer = ?wallet.address(), chain_id, "loaded signer");
    Ok(Arc::new(SignerMiddleware::new(
        provider,
        wallet.with_chain_id(chain_id),
    )))
}

/// EntryPoint deposit/stake record for one account.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DepositInfo {
    pub deposit: String,
    pub staked: bool,
    pub stake: String,
    pub unstake_delay_sec: u32,
    pub withdraw_time: u64,
}

impl DepositInfo {
    pub fn from_raw(raw: (u128, bool, u128, u32, u64)) -> Self {
        let (deposit, staked, stake, unstake_delay_sec, withdraw_time) = raw;
        Self {
            deposit: format_ether(U256::from(deposit)),
            staked,
            stake: format_ether(U256::from(stake)),
            unstake_delay_sec,
            withdraw_time,
        }
    }

    pub fn print(&self) {
        println!("Deposit: {}", self.deposit);
        println!("Is staked: {}", self.staked);
        println!("Stake: {}", self.stake);
        println!("Unstake delay (sec): {}", self.unstake_delay_sec);
        println!("Withdraw time: {}", self.withdraw_time);
    }
}

pub async fn deposit(client: Arc<Client>, paymaster: Address, value: U256) -> Result<TransactionReceipt> {
    let contract = VerifyingPaymasterContract::new(paymaster, client);
    let call = contract.deposit().value(value);
    let pending = call.send().await.context("deposit transaction failed")?;
    tracing::info!(tx = ?pending.tx_hash(), "deposit submitted");
    pending
        .await
        .context("failed waiting for deposit receipt")?
        .ok_or_else(|| anyhow!("deposit transaction dropped from mempool"))
}

pub async fn add_stake(
    client: Arc<Client>,
    paymaster: Address,
    value: U256,
    unstake_delay_sec: u32,
) -> Result<TransactionReceipt> {
    let contract = VerifyingPaymasterContract::new(paymaster, client);
    let call = contract.add_stake(unstake_delay_sec).value(value);
    let pending = call.send().await.context("addStake transaction failed")?;
    tracing::info!(tx = ?pending.tx_hash(), "stake submitted");
    pending
        .await
        .context("failed waiting for addStake receipt")?
        .ok_or_else(|| anyhow!("addStake transaction dropped from mempool"))
}

pub async fn deposit_info(rpc_url: &str, entry_point: Address, paymaster: Address) -> Result<DepositInfo> {
    let provider = Arc::new(provider(rpc_url)?);
    let contract = EntryPointContract::new(entry_point, provider);
    let raw = contract
        .get_deposit_info(paymaster)
        .call()
        .await
        .context("getDepositInfo call failed")?;
    Ok(DepositInfo::from_raw(raw))
}
