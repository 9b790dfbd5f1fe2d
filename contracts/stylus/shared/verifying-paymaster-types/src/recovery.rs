//! Signature recovery seam.
//!
//! The structural checks and the EIP-191 wrapping live in the contract; the raw curve operation is
//! pluggable so that the EVM precompile can be used on-chain and `k256` off-chain.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, FixedBytes};

/// `"\x19Ethereum Signed Message:\n32"`, the personal-message prefix for a 32-byte payload.
pub const ETH_SIGNED_MESSAGE_PREFIX: &[u8; 28] = b"\x19Ethereum Signed Message:\n32";

/// Personal-message digest of a 32-byte hash, as produced by `eth_sign` / `signMessage`.
pub fn eth_signed_message_hash(hash: FixedBytes<32>) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(ETH_SIGNED_MESSAGE_PREFIX.len() + 32);
    buf.extend_from_slice(ETH_SIGNED_MESSAGE_PREFIX);
    buf.extend_from_slice(hash.as_slice());
    keccak256(buf)
}

/// Raw secp256k1 public-key recovery.
///
/// `v` is always 27 or 28 by the time an implementation sees it. `None` means the curve
/// operation produced no key (the precompile's empty return).
pub trait EcRecover {
    fn ecrecover(&self, digest: FixedBytes<32>, v: u8, r: &[u8; 32], s: &[u8; 32]) -> Option<Address>;
}
