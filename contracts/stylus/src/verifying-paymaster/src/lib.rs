//! ERC-4337 verifying paymaster for Arbitrum Stylus.
//!
//! The contract lives in [`verifying_paymaster`]; everything else is plain Rust that is unit
//! tested off-chain with injected recovery and token backends.

#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

pub mod authorization;
pub mod config;
pub mod decoder;
pub mod entry_point;
pub mod errors;
pub mod ledger;
pub mod settlement;
pub mod types;
pub mod utils;
pub mod verifying_paymaster;

pub use verifying_paymaster::VerifyingPaymaster;
