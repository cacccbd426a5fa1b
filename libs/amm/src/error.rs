//! Error types for swap math

use thiserror::Error;

/// Failures of a swap calculation
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    #[error("Invalid amount: swap amounts must be positive")]
    InvalidAmount,

    #[error("Insufficient liquidity: reserve_in={reserve_in}, reserve_out={reserve_out}")]
    InsufficientLiquidity { reserve_in: u64, reserve_out: u64 },

    #[error("Invalid fee: {fee_bps} bps (must be below 10000)")]
    InvalidFee { fee_bps: u32 },

    #[error("Invalid slippage tolerance: {slippage_bps} bps (must not exceed 10000)")]
    InvalidSlippage { slippage_bps: u32 },

    #[error("Math overflow in {context}")]
    MathOverflow { context: &'static str },
}
