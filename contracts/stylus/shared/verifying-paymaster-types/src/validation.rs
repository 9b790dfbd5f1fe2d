//! EntryPoint `validationData` packing.

use alloy_primitives::U256;

use crate::layout::MAX_U48;

/// Unpacked form of the word returned from `validatePaymasterUserOp`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationData {
    pub sig_failed: bool,
    pub valid_until: u64,
    pub valid_after: u64,
}

/// `sigFailed | validUntil << 160 | validAfter << 208`.
///
/// Timestamps wider than 48 bits are truncated the way a Solidity `uint48` cast would.
pub fn pack_validation_data(sig_failed: bool, valid_until: u64, valid_after: u64) -> U256 {
    let mut out = U256::from(sig_failed as u8);
    out |= U256::from(valid_until & MAX_U48) << 160;
    out |= U256::from(valid_after & MAX_U48) << 208;
    out
}

impl ValidationData {
    pub fn pack(&self) -> U256 {
        pack_validation_data(self.sig_failed, self.valid_until, self.valid_after)
    }

    pub fn unpack(word: U256) -> Self {
        let mask = U256::from(MAX_U48);
        Self {
            sig_failed: word.bit(0),
            valid_until: ((word >> 160usize) & mask).to::<u64>(),
            valid_after: ((word >> 208usize) & mask).to::<u64>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_like_the_entry_point() {
        let word = pack_validation_data(false, 0xdeadbeef, 0x1234);
        let expected = (U256::from(0xdeadbeefu64) << 160) | (U256::from(0x1234u64) << 208);
        assert_eq!(word, expected);
        assert!(!word.bit(0));
    }

    #[test]
    fn sig_failed_is_bit_zero() {
        assert_eq!(pack_validation_data(true, 0, 0), U256::from(1u64));
    }

    #[test]
    fn unpack_inverts_pack() {
        let data = ValidationData {
            sig_failed: true,
            valid_until: MAX_U48,
            valid_after: 17,
        };
        assert_eq!(ValidationData::unpack(data.pack()), data);
    }
}
