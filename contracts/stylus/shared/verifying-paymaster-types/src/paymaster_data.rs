use alloc::vec::Vec;
use core::fmt;

use alloy_primitives::{Address, U256};

/// Sponsor authorization carried in `paymasterAndData` after the paymaster address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymasterData {
    /// Expiry (uint48). Zero means no upper bound.
    pub valid_until: u64,
    /// Start of validity (uint48).
    pub valid_after: u64,
    /// ERC-20 charged on settlement. `Address::ZERO` means the native deposit pays.
    pub token: Address,
    /// Token units per native unit, scaled by 10^18.
    pub exchange_rate: U256,
    /// `r || s || v` over the paymaster commitment.
    pub signature: Vec<u8>,
}

impl PaymasterData {
    pub fn is_native(&self) -> bool {
        self.token == Address::ZERO
    }
}

/// Structural problems with the sponsor data. Always a hard rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// Shorter than the fixed fields; there is no room for a signature.
    MissingSignature,
    /// Signature section is not exactly 65 bytes.
    BadSignatureLength { len: usize },
}

impl FormatError {
    /// Stable revert reason. Callers match on these strings.
    pub fn reason(&self) -> &'static str {
        match self {
            FormatError::MissingSignature => {
                "VerifyingPaymaster: missing signature in paymasterAndData"
            }
            FormatError::BadSignatureLength { .. } => {
                "VerifyingPaymaster: invalid signature length in paymasterAndData"
            }
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_are_distinct() {
        let missing = FormatError::MissingSignature;
        let bad = FormatError::BadSignatureLength { len: 64 };
        assert_ne!(missing.reason(), bad.reason());
        assert_eq!(
            alloc::format!("{bad}"),
            "VerifyingPaymaster: invalid signature length in paymasterAndData"
        );
    }
}
