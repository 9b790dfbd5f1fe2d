//! Shared utilities for the verifying paymaster.
//!
//! These helpers are intentionally small and deterministic, as they run inside Stylus / WASM.

pub mod bytes;
pub mod crypto;
pub mod entry_point;
