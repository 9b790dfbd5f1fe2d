//! Token ledger backends used by settlement.

pub mod onchain;
