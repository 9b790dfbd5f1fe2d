use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use ethers::types::Address;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use paymaster_data_encoder::SponsorTerms;
use verifying_paymaster_types::{layout::MAX_U48, CommitmentDomain};

mod chain;
mod input;
mod sign;

use input::{load_private_key, parse_address, parse_eth_value, parse_paymaster, InputError};
use sign::{sign_user_op, signing_key_from_hex, valid_until_from_now, SignRequest, UserOperationJson};

/// Unstake delay used by `stake add` unless overridden.
const UNSTAKE_DELAY: u32 = 86_400;

/// Operate a deployed verifying paymaster: fund its EntryPoint deposit, stake it, and sign
/// sponsorships as its verifier.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    keys: KeyArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct KeyArgs {
    /// Path to a file containing the private key.
    #[arg(long, env = "PRIV_KEY_PATH", global = true, conflicts_with = "private_key")]
    private_key_path: Option<PathBuf>,

    /// Private key (hex string, 0x...).
    #[arg(long, env = "PKEY", global = true, conflicts_with = "private_key_path")]
    private_key: Option<String>,
}

impl KeyArgs {
    fn load(&self) -> Result<String> {
        load_private_key(self.private_key_path.as_deref(), self.private_key.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// EntryPoint deposit of the paymaster.
    Deposit {
        #[command(subcommand)]
        action: DepositAction,
    },
    /// EntryPoint stake of the paymaster.
    Stake {
        #[command(subcommand)]
        action: StakeAction,
    },
    /// Sign a sponsorship and print the user operation with `paymasterAndData` filled in.
    Sign(SignArgs),
}

#[derive(Subcommand, Debug)]
enum DepositAction {
    /// Add `eth` to the paymaster's deposit.
    Add {
        paymaster: String,
        eth: String,
        #[arg(long, env = "RPC_URL")]
        rpc_url: String,
    },
    /// Print the paymaster's deposit info.
    Get {
        paymaster: String,
        #[arg(long, env = "RPC_URL")]
        rpc_url: String,
        #[arg(long, env = "ENTRY_POINT_ADDRESS")]
        entry_point: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum StakeAction {
    /// Stake `eth` for the paymaster.
    Add {
        paymaster: String,
        eth: String,
        #[arg(long, env = "RPC_URL")]
        rpc_url: String,
        #[arg(long, default_value_t = UNSTAKE_DELAY)]
        unstake_delay: u32,
    },
}

#[derive(Args, Debug)]
struct SignArgs {
    /// JSON file with the user operation (bundler RPC format).
    #[arg(long)]
    user_op: PathBuf,

    #[arg(long)]
    paymaster: String,

    #[arg(long, env = "ENTRY_POINT_ADDRESS")]
    entry_point: String,

    #[arg(long, env = "CHAIN_ID")]
    chain_id: u64,

    /// Seconds from now until the authorization expires; 0 for no expiry.
    #[arg(
        long,
        default_value_t = 0,
        conflicts_with = "valid_until",
        value_parser = clap::value_parser!(u64).range(..=MAX_U48)
    )]
    valid_for: u64,

    /// Absolute expiry (unix seconds).
    #[arg(long, value_parser = clap::value_parser!(u64).range(..=MAX_U48))]
    valid_until: Option<u64>,

    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u64).range(..=MAX_U48))]
    valid_after: u64,

    /// ERC-20 fee token; omit for native sponsorship.
    #[arg(long, requires = "exchange_rate")]
    token: Option<String>,

    /// Token units per native unit, scaled by 1e18. Required with `--token`.
    #[arg(long)]
    exchange_rate: Option<String>,

    /// Print only the `paymasterAndData` hex.
    #[arg(long)]
    raw: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Deposit { action } => match action {
            DepositAction::Add {
                paymaster,
                eth,
                rpc_url,
            } => {
                let paymaster = parse_paymaster(&paymaster)?;
                let value = parse_eth_value(&eth)?;
                let client = chain::client(&rpc_url, &cli.keys.load()?).await?;
                let receipt = chain::deposit(client, paymaster, value).await?;
                println!("Paymaster deposit added at: {:?}", receipt.transaction_hash);
            }
            DepositAction::Get {
                paymaster,
                rpc_url,
                entry_point,
                json,
            } => {
                let paymaster = parse_paymaster(&paymaster)?;
                let entry_point = parse_entry_point(&entry_point)?;
                let info = chain::deposit_info(&rpc_url, entry_point, paymaster).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    info.print();
                }
            }
        },
        Command::Stake { action } => match action {
            StakeAction::Add {
                paymaster,
                eth,
                rpc_url,
                unstake_delay,
            } => {
                let paymaster = parse_paymaster(&paymaster)?;
                let value = parse_eth_value(&eth)?;
                let client = chain::client(&rpc_url, &cli.keys.load()?).await?;
                let receipt = chain::add_stake(client, paymaster, value, unstake_delay).await?;
                println!("Paymaster stake added at: {:?}", receipt.transaction_hash);
            }
        },
        Command::Sign(args) => run_sign(&args, &cli.keys)?,
    }
    Ok(())
}

fn parse_entry_point(value: &str) -> Result<Address> {
    parse_address(value).ok_or_else(|| anyhow!("invalid entry point address"))
}

fn to_alloy(address: Address) -> alloy_primitives::Address {
    alloy_primitives::Address::from(address.0)
}

fn run_sign(args: &SignArgs, keys: &KeyArgs) -> Result<()> {
    let paymaster = parse_paymaster(&args.paymaster)?;
    let entry_point = parse_entry_point(&args.entry_point)?;
    let token = match &args.token {
        Some(t) => parse_address(t).ok_or_else(|| InputError::InvalidField {
            field: "token",
            value: t.clone(),
        })?,
        None => Address::zero(),
    };
    let exchange_rate: alloy_primitives::U256 = match &args.exchange_rate {
        Some(rate) => rate.parse().map_err(|_| InputError::InvalidField {
            field: "exchange rate",
            value: rate.clone(),
        })?,
        None => alloy_primitives::U256::ZERO,
    };
    let valid_until = match args.valid_until {
        Some(until) => until,
        None => valid_until_from_now(args.valid_for)?,
    };

    let raw = fs::read_to_string(&args.user_op)
        .with_context(|| format!("failed reading {}", args.user_op.display()))?;
    let op: UserOperationJson = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing JSON in {}", args.user_op.display()))?;

    let request = SignRequest {
        domain: CommitmentDomain {
            paymaster: to_alloy(paymaster),
            chain_id: args.chain_id,
            entry_point: to_alloy(entry_point),
        },
        terms: SponsorTerms {
            valid_until,
            valid_after: args.valid_after,
            token: to_alloy(token),
            exchange_rate,
        },
    };

    let key = signing_key_from_hex(&keys.load()?)?;
    let signed = sign_user_op(&op, &request, &key)?;

    if args.raw {
        println!("{}", signed.paymaster_and_data);
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "userOperation": signed,
                "validUntil": request.terms.valid_until,
                "validAfter": request.terms.valid_after,
            }))?
        );
    }
    Ok(())
}
