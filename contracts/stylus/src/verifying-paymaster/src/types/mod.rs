//! Shared types for sponsor data, commitments and settlement.

pub use verifying_paymaster_types::*;
