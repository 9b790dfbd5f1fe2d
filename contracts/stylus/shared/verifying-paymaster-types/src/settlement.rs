use alloc::vec::Vec;

use alloy_primitives::{Address, U256};

/// Produced by validation, consumed by exactly one settlement of the same operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlementContext {
    pub sender: Address,
    pub token: Address,
    pub exchange_rate: U256,
}

impl SettlementContext {
    pub const ENCODED_LEN: usize = 32 * 3;

    /// `abi.encode(sender, token, exchangeRate)`.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::ENCODED_LEN);
        let mut word = [0u8; 32];
        word[12..32].copy_from_slice(self.sender.as_slice());
        buf.extend_from_slice(&word);
        word[12..32].copy_from_slice(self.token.as_slice());
        buf.extend_from_slice(&word);
        buf.extend_from_slice(&self.exchange_rate.to_be_bytes::<32>());
        buf
    }

    /// Inverse of [`SettlementContext::encode`]. Rejects anything that is not three words with
    /// clean address padding.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::ENCODED_LEN {
            return None;
        }
        let sender = word_to_address(&bytes[0..32])?;
        let token = word_to_address(&bytes[32..64])?;
        let exchange_rate = U256::from_be_slice(&bytes[64..96]);
        Some(Self {
            sender,
            token,
            exchange_rate,
        })
    }

    pub fn is_native(&self) -> bool {
        self.token == Address::ZERO
    }
}

fn word_to_address(word: &[u8]) -> Option<Address> {
    if word[..12].iter().any(|b| *b != 0) {
        return None;
    }
    Some(Address::from_slice(&word[12..32]))
}

/// EntryPoint v0.6 `IPaymaster.PostOpMode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PostOpMode {
    /// User operation succeeded.
    OpSucceeded = 0,
    /// User operation reverted; gas still has to be paid.
    OpReverted = 1,
    /// The first `postOp` call reverted and this is the EntryPoint's second attempt.
    PostOpReverted = 2,
}

impl TryFrom<u8> for PostOpMode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PostOpMode::OpSucceeded),
            1 => Ok(PostOpMode::OpReverted),
            2 => Ok(PostOpMode::PostOpReverted),
            _ => Err(()),
        }
    }
}

/// Why a token payment did not happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferError {
    /// Allowance granted to the paymaster is below the charge.
    InsufficientAllowance,
    /// Sender's balance is below the charge.
    InsufficientBalance,
    /// The token call reverted for another reason.
    CallFailed,
    /// The token returned `false` or something that is not a boolean.
    Rejected,
}

/// ERC-20 `transferFrom` seam. A failed transfer must leave every balance untouched.
pub trait TokenLedger {
    fn transfer_from(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError>;
}
