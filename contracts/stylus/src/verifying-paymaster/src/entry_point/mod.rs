//! EntryPoint (ERC-4337 v0.6) compatibility shims.
//!
//! Keeps the paymaster ABI-aligned with `IPaymaster` and the stake manager while the
//! authorization and settlement logic stays in plain Rust elsewhere.

pub mod constants;
pub mod interfaces;
