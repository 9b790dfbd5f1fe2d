//! Sponsorship authorization: decode → commit → recover → compare.
//!
//! Outcomes:
//! - hard rejection (`Err`): the sponsor data or the signature is malformed. No key could ever
//!   have authorized it, so the EntryPoint call reverts.
//! - soft rejection (`sig_failed = true`): well-formed, but not signed by the current verifier.
//!   The EntryPoint turns this into `AA34 signature error`, simulation can still inspect it.
//! - accepted: the validity window is passed through untouched (the EntryPoint enforces time)
//!   together with the context that settlement needs.
//!
//! Nothing is persisted; a resubmission with another signature is a fresh attempt.

use stylus_sdk::alloy_primitives::{FixedBytes, U256};

use crate::{
    config::PaymasterConfig,
    decoder::parse_paymaster_and_data,
    errors::ValidationError,
    types::{
        paymaster_hash, pack_validation_data, CommitmentDomain, EcRecover, PaymasterData,
        SettlementContext, UserOperation,
    },
    utils::crypto::recover_signer,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub sig_failed: bool,
    pub valid_until: u64,
    pub valid_after: u64,
    /// Present only when the authorization was accepted.
    pub context: Option<SettlementContext>,
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        !self.sig_failed
    }

    /// Packed `validationData` word for the EntryPoint.
    pub fn validation_data(&self) -> U256 {
        pack_validation_data(self.sig_failed, self.valid_until, self.valid_after)
    }
}

/// Commitment for an already decoded authorization.
pub fn commitment_for(
    op: &UserOperation,
    domain: &CommitmentDomain,
    data: &PaymasterData,
) -> FixedBytes<32> {
    paymaster_hash(
        op,
        domain,
        data.valid_until,
        data.valid_after,
        data.token,
        data.exchange_rate,
    )
}

/// Validate the sponsor authorization carried in `op.paymaster_and_data`.
///
/// The leading paymaster address is only used by the EntryPoint for routing; the commitment
/// binds `domain.paymaster` instead, so a record signed for another deployment never verifies.
pub fn validate_user_op<R: EcRecover>(
    op: &UserOperation,
    domain: &CommitmentDomain,
    config: &PaymasterConfig,
    backend: &R,
) -> Result<ValidationOutcome, ValidationError> {
    let (_paymaster, data) = parse_paymaster_and_data(&op.paymaster_and_data)?;

    let hash = commitment_for(op, domain, &data);
    let signer = recover_signer(backend, hash, &data.signature)?;

    if signer != config.verifier {
        return Ok(ValidationOutcome {
            sig_failed: true,
            valid_until: data.valid_until,
            valid_after: data.valid_after,
            context: None,
        });
    }

    Ok(ValidationOutcome {
        sig_failed: false,
        valid_until: data.valid_until,
        valid_after: data.valid_after,
        context: Some(SettlementContext {
            sender: op.sender,
            token: data.token,
            exchange_rate: data.exchange_rate,
        }),
    })
}
