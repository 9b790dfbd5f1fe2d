//! Signature verification for sponsor authorizations.
//!
//! The verifier signs the paymaster commitment with `personal_sign`, so the digest that is
//! actually recovered is `keccak256("\x19Ethereum Signed Message:\n32" || commitment)`.

use stylus_sdk::{
    alloy_primitives::{Address, FixedBytes, U256},
    stylus_core::{
        calls::{context::Call, CallAccess},
        Host,
    },
};

use crate::{
    entry_point::constants::{ECRECOVER_GAS, ECRECOVER_PRECOMPILE, SECP256K1_HALF_ORDER},
    errors::SignatureError,
    types::{eth_signed_message_hash, layout::SIGNATURE_LEN, EcRecover},
};

/// Recover the address that signed `hash` under the personal-message convention.
///
/// Notes:
/// - `v` may be 27/28 or the raw recovery id 0/1; anything else is malformed.
/// - High-`s` signatures are malformed (EIP-2), so every authorization has one encoding.
pub fn recover_signer<R: EcRecover>(
    backend: &R,
    hash: FixedBytes<32>,
    signature: &[u8],
) -> Result<Address, SignatureError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(SignatureError::InvalidLength {
            len: signature.len(),
        });
    }

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&signature[0..32]);
    s.copy_from_slice(&signature[32..64]);

    let v = match signature[64] {
        v @ (27 | 28) => v,
        v @ (0 | 1) => v + 27,
        other => return Err(SignatureError::InvalidRecoveryId(other)),
    };
    if U256::from_be_bytes(s) > SECP256K1_HALF_ORDER {
        return Err(SignatureError::MalleableS);
    }

    let digest = eth_signed_message_hash(hash);
    backend
        .ecrecover(digest, v, &r, &s)
        .ok_or(SignatureError::Unrecoverable)
}

/// The EVM `ecrecover` precompile at address `0x01`, reached through the contract's host.
pub struct PrecompileRecovery<'a> {
    vm: &'a dyn Host,
}

impl<'a> PrecompileRecovery<'a> {
    pub fn new(vm: &'a dyn Host) -> Self {
        Self { vm }
    }
}

/// Precompile input: `digest || v || r || s`, one 32-byte word each.
pub(crate) fn ecrecover_input(digest: FixedBytes<32>, v: u8, r: &[u8; 32], s: &[u8; 32]) -> [u8; 128] {
    let mut input = [0u8; 128];
    input[0..32].copy_from_slice(digest.as_slice());
    input[63] = v;
    input[64..96].copy_from_slice(r);
    input[96..128].copy_from_slice(s);
    input
}

impl EcRecover for PrecompileRecovery<'_> {
    fn ecrecover(&self, digest: FixedBytes<32>, v: u8, r: &[u8; 32], s: &[u8; 32]) -> Option<Address> {
        let input = ecrecover_input(digest, v, r, s);
        let out = self
            .vm
            .static_call(&Call::new().gas(ECRECOVER_GAS), ECRECOVER_PRECOMPILE, &input)
            .ok()?;
        // Empty return data means no key could be recovered.
        if out.len() < 32 {
            return None;
        }
        let recovered = Address::from_slice(&out[12..32]);
        if recovered == Address::ZERO {
            return None;
        }
        Some(recovered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;
    use paymaster_data_encoder::{personal_sign, signer_address, LocalRecovery};
    use stylus_sdk::alloy_primitives::keccak256;

    fn key() -> SigningKey {
        SigningKey::from_slice(&[0x5a; 32]).unwrap()
    }

    #[test]
    fn recovers_personal_sign_signature() {
        let hash = keccak256(b"commitment");
        let sig = personal_sign(&key(), hash).unwrap();
        assert!(sig[64] == 27 || sig[64] == 28);
        assert_eq!(
            recover_signer(&LocalRecovery, hash, &sig),
            Ok(signer_address(&key()))
        );
    }

    #[test]
    fn raw_recovery_id_is_normalised() {
        let hash = keccak256(b"commitment");
        let mut sig = personal_sign(&key(), hash).unwrap();
        sig[64] -= 27;
        assert_eq!(
            recover_signer(&LocalRecovery, hash, &sig),
            Ok(signer_address(&key()))
        );
    }

    #[test]
    fn other_hash_recovers_someone_else() {
        let sig = personal_sign(&key(), keccak256(b"commitment")).unwrap();
        let recovered = recover_signer(&LocalRecovery, keccak256(b"other"), &sig);
        assert_ne!(recovered, Ok(signer_address(&key())));
    }

    #[test]
    fn malformed_v_is_structural() {
        let hash = keccak256(b"commitment");
        let mut sig = personal_sign(&key(), hash).unwrap();
        sig[64] = 29;
        assert_eq!(
            recover_signer(&LocalRecovery, hash, &sig),
            Err(SignatureError::InvalidRecoveryId(29))
        );
    }

    #[test]
    fn high_s_is_structural() {
        let hash = keccak256(b"commitment");
        let mut sig = personal_sign(&key(), hash).unwrap();
        sig[32..64].copy_from_slice(&[0xff; 32]);
        assert_eq!(
            recover_signer(&LocalRecovery, hash, &sig),
            Err(SignatureError::MalleableS)
        );
    }

    #[test]
    fn wrong_length_is_structural() {
        let hash = keccak256(b"commitment");
        assert_eq!(
            recover_signer(&LocalRecovery, hash, &[0u8; 64]),
            Err(SignatureError::InvalidLength { len: 64 })
        );
    }

    #[test]
    fn zero_signature_recovers_nothing() {
        let mut sig = [0u8; 65];
        sig[64] = 27;
        assert_eq!(
            recover_signer(&LocalRecovery, keccak256(b"commitment"), &sig),
            Err(SignatureError::Unrecoverable)
        );
    }
}
