//! Command-line input validation. Everything is checked before a transaction is built.

use std::path::Path;

use ethers::{
    types::{Address, U256},
    utils::{parse_ether, to_checksum},
};
use regex::Regex;
use verifying_paymaster_types::layout::MAX_U48;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("invalid paymaster address")]
    InvalidPaymasterAddress,
    #[error("invalid eth value")]
    InvalidEthValue,
    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },
    #[error("{field} {value} does not fit in uint48")]
    TimestampOutOfRange { field: &'static str, value: u64 },
    #[error("missing signer key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)")]
    MissingKey,
}

/// Accepts a 0x-prefixed 20-byte hex address. Mixed-case input must carry a valid EIP-55
/// checksum; all-lower and all-upper input is taken as is.
pub fn parse_address(value: &str) -> Option<Address> {
    let re = Regex::new(r"^0x[0-9a-fA-F]{40}$").ok()?;
    if !re.is_match(value) {
        return None;
    }
    let address: Address = value.parse().ok()?;

    let body = &value[2..];
    let mixed = body.chars().any(|c| c.is_ascii_lowercase())
        && body.chars().any(|c| c.is_ascii_uppercase());
    if mixed && to_checksum(&address, None) != value {
        return None;
    }
    Some(address)
}

pub fn parse_paymaster(value: &str) -> Result<Address, InputError> {
    parse_address(value).ok_or(InputError::InvalidPaymasterAddress)
}

/// Decimal ether amount, at most 18 fractional digits. Negative amounts are rejected.
pub fn parse_eth_value(value: &str) -> Result<U256, InputError> {
    let trimmed = value.trim();
    let re = Regex::new(r"^[0-9]+(\.[0-9]{1,18})?$").map_err(|_| InputError::InvalidEthValue)?;
    if !re.is_match(trimmed) {
        return Err(InputError::InvalidEthValue);
    }
    parse_ether(trimmed).map_err(|_| InputError::InvalidEthValue)
}

/// Window bounds travel as uint48 in `paymasterAndData`.
pub fn check_timestamp(field: &'static str, value: u64) -> Result<u64, InputError> {
    if value > MAX_U48 {
        return Err(InputError::TimestampOutOfRange { field, value });
    }
    Ok(value)
}

pub fn parse_hex_bytes(field: &'static str, value: &str) -> Result<Vec<u8>, InputError> {
    let body = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(body).map_err(|_| InputError::InvalidField {
        field,
        value: value.to_string(),
    })
}

/// Private key as hex, either inline or from a file. The file wins when both are given.
pub fn load_private_key(
    private_key_path: Option<&Path>,
    private_key: Option<&str>,
) -> anyhow::Result<String> {
    use anyhow::Context;

    let raw = match (private_key_path, private_key) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("failed reading {}", path.display()))?,
        (None, Some(key)) => key.to_string(),
        (None, None) => return Err(InputError::MissingKey.into()),
    };
    Ok(raw.trim().trim_start_matches("0x").to_string())
}
