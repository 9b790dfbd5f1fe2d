//! Shared types for the verifying paymaster.
//!
//! Everything in here must produce identical results on-chain (Stylus / WASM) and off-chain
//! (the signing authority and tooling), so it stays `no_std` and allocation-light.

#![no_std]

extern crate alloc;

pub mod commitment;
pub mod layout;
pub mod paymaster_data;
pub mod recovery;
pub mod settlement;
pub mod user_op;
pub mod validation;

pub use commitment::{paymaster_hash, CommitmentDomain};
pub use paymaster_data::{FormatError, PaymasterData};
pub use recovery::{eth_signed_message_hash, EcRecover};
pub use settlement::{PostOpMode, SettlementContext, TokenLedger, TransferError};
pub use user_op::UserOperation;
pub use validation::{pack_validation_data, ValidationData};
