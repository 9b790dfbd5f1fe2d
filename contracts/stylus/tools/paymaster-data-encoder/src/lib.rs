//! Off-chain side of the verifying paymaster: encodes sponsor data, signs it the way the
//! contract expects, and provides in-memory backends for tests.

pub mod encoder;
pub mod ledger;
pub mod recovery;
pub mod types;

pub use encoder::{
    encode_paymaster_and_data, encode_paymaster_data, personal_sign, sign_paymaster_data,
    signer_address, sponsor, SignError,
};
pub use ledger::MockTokenLedger;
pub use recovery::LocalRecovery;
pub use types::SponsorTerms;

#[cfg(test)]
mod tests;
