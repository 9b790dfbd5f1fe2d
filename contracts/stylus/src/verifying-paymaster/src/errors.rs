use stylus_sdk::alloy_primitives::{Address, U256};

/// Errors during sponsor data decoding.
pub use verifying_paymaster_types::FormatError;

/// Errors reported by a token ledger backend.
pub use verifying_paymaster_types::TransferError;

/// Structurally invalid signatures. A hard rejection, unlike a signature from the wrong key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureError {
    InvalidLength { len: usize },
    InvalidRecoveryId(u8),
    /// `s` in the upper half of the curve order (EIP-2).
    MalleableS,
    Unrecoverable,
}

impl SignatureError {
    pub fn reason(&self) -> &'static str {
        match self {
            SignatureError::InvalidLength { .. } => "ECDSA: invalid signature length",
            SignatureError::InvalidRecoveryId(_) => "ECDSA: invalid signature 'v' value",
            SignatureError::MalleableS => "ECDSA: invalid signature 's' value",
            SignatureError::Unrecoverable => "ECDSA: invalid signature",
        }
    }
}

/// Hard rejections from `validatePaymasterUserOp`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    Format(FormatError),
    Signature(SignatureError),
}

impl ValidationError {
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::Format(e) => e.reason(),
            ValidationError::Signature(e) => e.reason(),
        }
    }
}

impl From<FormatError> for ValidationError {
    fn from(e: FormatError) -> Self {
        ValidationError::Format(e)
    }
}

impl From<SignatureError> for ValidationError {
    fn from(e: SignatureError) -> Self {
        ValidationError::Signature(e)
    }
}

/// Errors during configuration updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    Unauthorized { caller: Address },
}

/// A token settlement that did not move any funds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlementFailure {
    pub token: Address,
    pub sender: Address,
    /// Zero when the charge itself could not be computed.
    pub amount: U256,
    pub cause: SettlementFailureCause,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettlementFailureCause {
    /// `actualGasCost * exchangeRate` does not fit in 256 bits.
    ChargeOverflow,
    Transfer(TransferError),
}
