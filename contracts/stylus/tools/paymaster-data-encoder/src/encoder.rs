use alloy_primitives::{Address, FixedBytes};
use k256::ecdsa::{RecoveryId, SigningKey};
use sha3::{Digest, Keccak256};

use verifying_paymaster_types::{
    eth_signed_message_hash,
    layout::{MAX_U48, SPONSOR_DATA_LEN},
    paymaster_hash, CommitmentDomain, PaymasterData, UserOperation,
};

use crate::types::SponsorTerms;

#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// Window bounds are encoded as uint48.
    #[error("{field} {value} does not fit in uint48")]
    TimestampOutOfRange { field: &'static str, value: u64 },
    #[error("signing failed: {0}")]
    Ecdsa(#[from] k256::ecdsa::Error),
}

fn check_u48(field: &'static str, value: u64) -> Result<(), SignError> {
    if value > MAX_U48 {
        return Err(SignError::TimestampOutOfRange { field, value });
    }
    Ok(())
}

/// Encode sponsor data (without the leading paymaster address).
///
/// The signature is appended as-is, whatever its length, so malformed records can be built too.
pub fn encode_paymaster_data(data: &PaymasterData) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SPONSOR_DATA_LEN);

    // uint48 validUntil / validAfter
    buf.extend_from_slice(&data.valid_until.to_be_bytes()[2..8]);
    buf.extend_from_slice(&data.valid_after.to_be_bytes()[2..8]);

    buf.extend_from_slice(data.token.as_slice());
    buf.extend_from_slice(&data.exchange_rate.to_be_bytes::<32>());

    // bytes signature (r||s||v)
    buf.extend_from_slice(&data.signature);
    buf
}

/// Encode the full `paymasterAndData` field.
pub fn encode_paymaster_and_data(paymaster: Address, data: &PaymasterData) -> Vec<u8> {
    let mut buf = Vec::with_capacity(20 + SPONSOR_DATA_LEN);
    buf.extend_from_slice(paymaster.as_slice());
    buf.extend_from_slice(&encode_paymaster_data(data));
    buf
}

/// `personal_sign` over a 32-byte hash: returns `r || s || v` with low `s` and `v` in {27, 28}.
pub fn personal_sign(
    signing_key: &SigningKey,
    hash: FixedBytes<32>,
) -> Result<Vec<u8>, k256::ecdsa::Error> {
    let digest = eth_signed_message_hash(hash);
    let (mut signature, mut recid) = signing_key.sign_prehash_recoverable(digest.as_slice())?;
    if let Some(low_s) = signature.normalize_s() {
        signature = low_s;
        recid = RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced());
    }

    let (r, s) = signature.split_bytes();
    let mut sig_bytes = Vec::with_capacity(65);
    sig_bytes.extend_from_slice(r.as_slice());
    sig_bytes.extend_from_slice(s.as_slice());
    sig_bytes.push(27 + recid.to_byte());
    Ok(sig_bytes)
}

/// Build and sign the sponsor data for `op`.
///
/// `op.paymaster_and_data` is not part of the commitment, so it may hold anything when called.
/// Timestamps above `MAX_U48` are rejected.
pub fn sign_paymaster_data(
    op: &UserOperation,
    domain: &CommitmentDomain,
    terms: &SponsorTerms,
    signing_key: &SigningKey,
) -> Result<PaymasterData, SignError> {
    check_u48("validUntil", terms.valid_until)?;
    check_u48("validAfter", terms.valid_after)?;
    let hash = paymaster_hash(
        op,
        domain,
        terms.valid_until,
        terms.valid_after,
        terms.token,
        terms.exchange_rate,
    );
    Ok(PaymasterData {
        valid_until: terms.valid_until,
        valid_after: terms.valid_after,
        token: terms.token,
        exchange_rate: terms.exchange_rate,
        signature: personal_sign(signing_key, hash)?,
    })
}

/// Sign and write `paymasterAndData` into `op`.
pub fn sponsor(
    op: &mut UserOperation,
    domain: &CommitmentDomain,
    terms: &SponsorTerms,
    signing_key: &SigningKey,
) -> Result<(), SignError> {
    let data = sign_paymaster_data(op, domain, terms, signing_key)?;
    op.paymaster_and_data = encode_paymaster_and_data(domain.paymaster, &data);
    Ok(())
}

/// Ethereum address of `signing_key`.
pub fn signer_address(signing_key: &SigningKey) -> Address {
    let point = signing_key.verifying_key().to_encoded_point(false);
    let hash = Keccak256::digest(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..32])
}
