//! Error types for ledger operations

use swapline_amm::AmmError;
use thiserror::Error;
use types::PairKey;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Ledger and swap execution failures
///
/// Every variant is raised before any reserve is written: a failed call
/// leaves the ledger exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Zero input amount or zero initial reserve
    #[error("Invalid amount: amounts and initial reserves must be positive")]
    InvalidAmount,

    /// Fee outside `[0, 10000)` basis points
    #[error("Invalid fee: {fee_bps} bps (must be below 10000)")]
    InvalidFee { fee_bps: u32 },

    #[error("Pool not found for pair {pair}")]
    PoolNotFound { pair: PairKey },

    #[error("Pool already exists for pair {pair}")]
    DuplicatePool { pair: PairKey },

    /// Output would meet or exceed the available reserve, or a reserve is zero
    #[error("Insufficient liquidity: reserve_in={reserve_in}, reserve_out={reserve_out}")]
    InsufficientLiquidity { reserve_in: u64, reserve_out: u64 },

    /// Computed output is below the caller's minimum
    #[error("Slippage exceeded: minimum {minimum_amount_out}, computed {amount_out}")]
    SlippageExceeded {
        minimum_amount_out: u64,
        amount_out: u64,
    },

    #[error("Math overflow in {context}")]
    MathOverflow { context: &'static str },

    /// A commit would have decreased the constant-product invariant
    #[error("Invariant violation: k would fall from {k_before} to {k_after}")]
    InvariantViolation { k_before: u128, k_after: u128 },

    /// The pool's critical section stayed busy past the configured bound
    #[error("Commit contention on pair {pair}: lock not acquired within {waited_ms}ms")]
    CommitContention { pair: PairKey, waited_ms: u64 },

    /// The ledger-access collaborator failed
    #[error("Pool store error: {reason}")]
    Store { reason: String },
}

impl LedgerError {
    /// Contention is the only failure worth retrying unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::CommitContention { .. })
    }
}

impl From<AmmError> for LedgerError {
    fn from(err: AmmError) -> Self {
        match err {
            // Slippage tolerance is an input-shape error at this layer
            AmmError::InvalidAmount | AmmError::InvalidSlippage { .. } => LedgerError::InvalidAmount,
            AmmError::InsufficientLiquidity {
                reserve_in,
                reserve_out,
            } => LedgerError::InsufficientLiquidity {
                reserve_in,
                reserve_out,
            },
            AmmError::InvalidFee { fee_bps } => LedgerError::InvalidFee { fee_bps },
            AmmError::MathOverflow { context } => LedgerError::MathOverflow { context },
        }
    }
}
