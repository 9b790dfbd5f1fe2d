//! The off-chain authority: sign sponsorships for user operations read from JSON.

use std::str::FromStr;

use alloy_primitives::{Address, U256};
use anyhow::{Context, Result};
use k256::ecdsa::SigningKey;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use paymaster_data_encoder::{encode_paymaster_and_data, sign_paymaster_data, signer_address, SponsorTerms};
use verifying_paymaster_types::{CommitmentDomain, UserOperation};

use crate::input::{check_timestamp, parse_hex_bytes, InputError};

/// User operation in the JSON shape used by bundler RPCs (`eth_sendUserOperation`).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationJson {
    pub sender: String,
    pub nonce: String,
    #[serde(default)]
    pub init_code: String,
    #[serde(default)]
    pub call_data: String,
    pub call_gas_limit: String,
    pub verification_gas_limit: String,
    pub pre_verification_gas: String,
    pub max_fee_per_gas: String,
    pub max_priority_fee_per_gas: String,
    #[serde(default)]
    pub paymaster_and_data: String,
    #[serde(default)]
    pub signature: String,
}

fn parse_u256(field: &'static str, value: &str) -> Result<U256, InputError> {
    U256::from_str(value).map_err(|_| InputError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn parse_bytes_field(field: &'static str, value: &str) -> Result<Vec<u8>, InputError> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    parse_hex_bytes(field, value)
}

impl UserOperationJson {
    pub fn to_user_op(&self) -> Result<UserOperation, InputError> {
        let sender = Address::from_str(&self.sender).map_err(|_| InputError::InvalidField {
            field: "sender",
            value: self.sender.clone(),
        })?;
        Ok(UserOperation {
            sender,
            nonce: parse_u256("nonce", &self.nonce)?,
            init_code: parse_bytes_field("initCode", &self.init_code)?,
            call_data: parse_bytes_field("callData", &self.call_data)?,
            call_gas_limit: parse_u256("callGasLimit", &self.call_gas_limit)?,
            verification_gas_limit: parse_u256("verificationGasLimit", &self.verification_gas_limit)?,
            pre_verification_gas: parse_u256("preVerificationGas", &self.pre_verification_gas)?,
            max_fee_per_gas: parse_u256("maxFeePerGas", &self.max_fee_per_gas)?,
            max_priority_fee_per_gas: parse_u256(
                "maxPriorityFeePerGas",
                &self.max_priority_fee_per_gas,
            )?,
            paymaster_and_data: parse_bytes_field("paymasterAndData", &self.paymaster_and_data)?,
            signature: parse_bytes_field("signature", &self.signature)?,
        })
    }
}

/// Sponsorship request as given on the command line.
#[derive(Clone, Debug)]
pub struct SignRequest {
    pub domain: CommitmentDomain,
    pub terms: SponsorTerms,
}

/// Window end `valid_for` seconds from now; zero keeps the authorization open-ended.
pub fn valid_until_from_now(valid_for: u64) -> Result<u64, InputError> {
    if valid_for == 0 {
        return Ok(0);
    }
    let now = OffsetDateTime::now_utc().unix_timestamp().max(0) as u64;
    let until = now
        .checked_add(valid_for)
        .ok_or(InputError::TimestampOutOfRange {
            field: "valid for",
            value: valid_for,
        })?;
    check_timestamp("valid until", until)
}

/// Sign `op` and return it with `paymasterAndData` filled in.
pub fn sign_user_op(
    op_json: &UserOperationJson,
    request: &SignRequest,
    signing_key: &SigningKey,
) -> Result<UserOperationJson> {
    let op = op_json.to_user_op()?;
    let data = sign_paymaster_data(&op, &request.domain, &request.terms, signing_key)
        .context("signing failed")?;
    tracing::info!(
        verifier = %signer_address(signing_key),
        sender = %op.sender,
        valid_until = data.valid_until,
        valid_after = data.valid_after,
        token = %data.token,
        "sponsorship signed"
    );

    let paymaster_and_data = encode_paymaster_and_data(request.domain.paymaster, &data);
    Ok(UserOperationJson {
        paymaster_and_data: format!("0x{}", hex::encode(paymaster_and_data)),
        ..op_json.clone()
    })
}

pub fn signing_key_from_hex(private_key: &str) -> Result<SigningKey> {
    let bytes = hex::decode(private_key).context("private key is not hex")?;
    SigningKey::from_slice(&bytes).context("invalid private key")
}
