//! Paymaster commitment: the hash the verifier signs off-chain and the contract recomputes.
//!
//! Equivalent to Solidity's
//! `keccak256(abi.encode(sender, nonce, keccak256(initCode), keccak256(callData),
//! callGasLimit, verificationGasLimit, preVerificationGas, maxFeePerGas,
//! maxPriorityFeePerGas, paymaster, validUntil, validAfter, token, exchangeRate,
//! chainId, entryPoint))`.
//!
//! The sponsor signature and the account signature are not part of the preimage.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, FixedBytes, U256};

use crate::user_op::UserOperation;

const WORDS: usize = 16;

/// Binds a commitment to one paymaster deployment on one chain behind one EntryPoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitmentDomain {
    pub paymaster: Address,
    pub chain_id: u64,
    pub entry_point: Address,
}

pub fn paymaster_hash(
    op: &UserOperation,
    domain: &CommitmentDomain,
    valid_until: u64,
    valid_after: u64,
    token: Address,
    exchange_rate: U256,
) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(32 * WORDS);
    push_address(&mut buf, op.sender);
    push_u256(&mut buf, op.nonce);
    buf.extend_from_slice(keccak256(&op.init_code).as_slice());
    buf.extend_from_slice(keccak256(&op.call_data).as_slice());
    push_u256(&mut buf, op.call_gas_limit);
    push_u256(&mut buf, op.verification_gas_limit);
    push_u256(&mut buf, op.pre_verification_gas);
    push_u256(&mut buf, op.max_fee_per_gas);
    push_u256(&mut buf, op.max_priority_fee_per_gas);
    push_address(&mut buf, domain.paymaster);
    push_u64(&mut buf, valid_until);
    push_u64(&mut buf, valid_after);
    push_address(&mut buf, token);
    push_u256(&mut buf, exchange_rate);
    push_u64(&mut buf, domain.chain_id);
    push_address(&mut buf, domain.entry_point);
    debug_assert_eq!(buf.len(), 32 * WORDS);
    keccak256(buf)
}

fn push_address(buf: &mut Vec<u8>, addr: Address) {
    let mut word = [0u8; 32];
    word[12..32].copy_from_slice(addr.as_slice());
    buf.extend_from_slice(&word);
}

fn push_u256(buf: &mut Vec<u8>, value: U256) {
    buf.extend_from_slice(&value.to_be_bytes::<32>());
}

fn push_u64(buf: &mut Vec<u8>, value: u64) {
    let mut word = [0u8; 32];
    word[24..32].copy_from_slice(&value.to_be_bytes());
    buf.extend_from_slice(&word);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{boxed::Box, vec, vec::Vec};

    struct Inputs {
        op: UserOperation,
        domain: CommitmentDomain,
        valid_until: u64,
        valid_after: u64,
        token: Address,
        exchange_rate: U256,
    }

    impl Inputs {
        fn hash(&self) -> FixedBytes<32> {
            paymaster_hash(
                &self.op,
                &self.domain,
                self.valid_until,
                self.valid_after,
                self.token,
                self.exchange_rate,
            )
        }
    }

    fn base() -> Inputs {
        Inputs {
            op: UserOperation {
                sender: Address::repeat_byte(0x11),
                nonce: U256::from(7u64),
                init_code: vec![0xaa, 0xbb],
                call_data: vec![0xb6, 0x1d, 0x27, 0xf6],
                call_gas_limit: U256::from(100_000u64),
                verification_gas_limit: U256::from(150_000u64),
                pre_verification_gas: U256::from(21_000u64),
                max_fee_per_gas: U256::from(2_000_000_000u64),
                max_priority_fee_per_gas: U256::from(1_000_000_000u64),
                paymaster_and_data: vec![0x01; 20],
                signature: vec![0x02; 65],
            },
            domain: CommitmentDomain {
                paymaster: Address::repeat_byte(0x22),
                chain_id: 42161,
                entry_point: Address::repeat_byte(0x33),
            },
            valid_until: 0xdeadbeef,
            valid_after: 0x1234,
            token: Address::repeat_byte(0x44),
            exchange_rate: U256::from(1_500_000_000_000_000_000u64),
        }
    }

    fn mutation(f: impl Fn(&mut Inputs) + 'static) -> Box<dyn Fn(&mut Inputs)> {
        Box::new(f)
    }

    #[test]
    fn same_inputs_same_hash() {
        assert_eq!(base().hash(), base().hash());
    }

    #[test]
    fn every_committed_field_changes_the_hash() {
        let mutations: Vec<(&str, Box<dyn Fn(&mut Inputs)>)> = vec![
            ("sender", mutation(|i| i.op.sender = Address::repeat_byte(0x12))),
            ("nonce", mutation(|i| i.op.nonce += U256::from(1u64))),
            ("init_code", mutation(|i| i.op.init_code.push(0))),
            ("call_data", mutation(|i| i.op.call_data[0] ^= 1)),
            ("call_gas_limit", mutation(|i| i.op.call_gas_limit += U256::from(1u64))),
            ("verification_gas_limit", mutation(|i| i.op.verification_gas_limit += U256::from(1u64))),
            ("pre_verification_gas", mutation(|i| i.op.pre_verification_gas += U256::from(1u64))),
            ("max_fee_per_gas", mutation(|i| i.op.max_fee_per_gas += U256::from(1u64))),
            ("max_priority_fee_per_gas", mutation(|i| i.op.max_priority_fee_per_gas += U256::from(1u64))),
            ("paymaster", mutation(|i| i.domain.paymaster = Address::repeat_byte(0x23))),
            ("chain_id", mutation(|i| i.domain.chain_id = 1)),
            ("entry_point", mutation(|i| i.domain.entry_point = Address::repeat_byte(0x34))),
            ("valid_until", mutation(|i| i.valid_until += 1)),
            ("valid_after", mutation(|i| i.valid_after += 1)),
            ("token", mutation(|i| i.token = Address::ZERO)),
            ("exchange_rate", mutation(|i| i.exchange_rate += U256::from(1u64))),
        ];

        let reference = base().hash();
        for (field, mutate) in mutations {
            let mut inputs = base();
            mutate(&mut inputs);
            assert_ne!(inputs.hash(), reference, "{field} is not committed");
        }
    }

    #[test]
    fn signatures_are_not_committed() {
        let reference = base().hash();
        let mut inputs = base();
        inputs.op.signature = vec![0xff; 65];
        inputs.op.paymaster_and_data = vec![0xee; 149];
        assert_eq!(inputs.hash(), reference);
    }

    #[test]
    fn valid_until_and_valid_after_are_not_interchangeable() {
        let mut swapped = base();
        swapped.valid_until = 0x1234;
        swapped.valid_after = 0xdeadbeef;
        assert_ne!(swapped.hash(), base().hash());
    }
}
