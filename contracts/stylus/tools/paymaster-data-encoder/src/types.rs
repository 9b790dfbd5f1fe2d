use alloy_primitives::{Address, U256};

/// What the verifier agrees to when it signs a sponsorship.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SponsorTerms {
    /// Expiry (uint48). Zero means no upper bound.
    pub valid_until: u64,
    pub valid_after: u64,
    /// Fee token; `Address::ZERO` for native sponsorship.
    pub token: Address,
    /// Token units per native unit, scaled by 10^18.
    pub exchange_rate: U256,
}

impl SponsorTerms {
    /// Native sponsorship with no validity bounds.
    pub fn native() -> Self {
        Self::default()
    }
}
