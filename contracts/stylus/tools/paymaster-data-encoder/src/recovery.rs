use alloy_primitives::{Address, FixedBytes};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};

pub use verifying_paymaster_types::EcRecover;

/// `ecrecover` backed by `k256`; behaves like the EVM precompile for the inputs the contract
/// passes on (v already normalised to 27/28).
pub struct LocalRecovery;

impl EcRecover for LocalRecovery {
    fn ecrecover(&self, digest: FixedBytes<32>, v: u8, r: &[u8; 32], s: &[u8; 32]) -> Option<Address> {
        let recid = RecoveryId::from_byte(v.checked_sub(27)?)?;

        let mut rs = [0u8; 64];
        rs[..32].copy_from_slice(r);
        rs[32..].copy_from_slice(s);
        let signature = Signature::from_slice(&rs).ok()?;

        let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recid).ok()?;
        let point = key.to_encoded_point(false);
        let hash = Keccak256::digest(&point.as_bytes()[1..]);
        Some(Address::from_slice(&hash[12..32]))
    }
}
