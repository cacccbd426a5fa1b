//! Constant-product (x*y=k) swap math with exact integer rounding
//!
//! All intermediates are `u128`: the formula multiplies two 64-bit quantities,
//! so a `u64` product could silently wrap. Every operation is still checked so
//! a future widening of the amount type cannot reintroduce overflow.

use crate::error::AmmError;
use tracing::debug;
use types::BPS_DENOMINATOR;

const BPS: u128 = BPS_DENOMINATOR as u128;

/// Constant-product swap math
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantProduct;

impl ConstantProduct {
    /// Output amount for selling `amount_in` into a pool
    ///
    /// # Arguments
    /// * `amount_in` - Input amount in base units of the input token
    /// * `reserve_in` - Pool reserve of the input token
    /// * `reserve_out` - Pool reserve of the output token
    /// * `fee_bps` - Fee in basis points (30 = 0.3%)
    ///
    /// # Returns
    /// `floor(after_fee * reserve_out / (reserve_in + after_fee))` where
    /// `after_fee = floor(amount_in * (10000 - fee_bps) / 10000)`. The result is
    /// always strictly below `reserve_out`.
    pub fn compute_output(
        amount_in: u64,
        reserve_in: u64,
        reserve_out: u64,
        fee_bps: u32,
    ) -> Result<u64, AmmError> {
        if amount_in == 0 {
            return Err(AmmError::InvalidAmount);
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(AmmError::InsufficientLiquidity {
                reserve_in,
                reserve_out,
            });
        }

        let amount_in_after_fee = Self::amount_after_fee(amount_in, fee_bps)?;

        let numerator = amount_in_after_fee
            .checked_mul(reserve_out as u128)
            .ok_or(AmmError::MathOverflow {
                context: "output numerator",
            })?;
        let denominator = (reserve_in as u128)
            .checked_add(amount_in_after_fee)
            .ok_or(AmmError::MathOverflow {
                context: "output denominator",
            })?;

        // denominator >= reserve_in > 0
        let amount_out = numerator / denominator;

        if amount_out >= reserve_out as u128 {
            debug!(
                amount_in,
                reserve_in, reserve_out, "swap would drain the output reserve"
            );
            return Err(AmmError::InsufficientLiquidity {
                reserve_in,
                reserve_out,
            });
        }

        // Strictly below a u64 reserve, so the narrowing is lossless
        Ok(amount_out as u64)
    }

    /// Smallest input whose [`compute_output`](Self::compute_output) is at
    /// least `amount_out` (reverse quote, rounded up in the pool's favour)
    pub fn compute_input(
        amount_out: u64,
        reserve_in: u64,
        reserve_out: u64,
        fee_bps: u32,
    ) -> Result<u64, AmmError> {
        if amount_out == 0 {
            return Err(AmmError::InvalidAmount);
        }
        if reserve_in == 0 || reserve_out == 0 || amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity {
                reserve_in,
                reserve_out,
            });
        }
        let fee_multiplier = Self::fee_multiplier(fee_bps)?;

        // Post-fee input x must satisfy x * (reserve_out - out) >= out * reserve_in
        let needed_after_fee = div_ceil(
            (amount_out as u128)
                .checked_mul(reserve_in as u128)
                .ok_or(AmmError::MathOverflow {
                    context: "input numerator",
                })?,
            (reserve_out - amount_out) as u128,
        );

        // Gross input a must satisfy floor(a * multiplier / 10000) >= x
        let amount_in = div_ceil(
            needed_after_fee
                .checked_mul(BPS)
                .ok_or(AmmError::MathOverflow {
                    context: "gross input",
                })?,
            fee_multiplier,
        );

        u64::try_from(amount_in).map_err(|_| AmmError::MathOverflow {
            context: "input exceeds u64",
        })
    }

    /// Minimum acceptable output for an expected output and a slippage
    /// tolerance in basis points (50 = 0.5%), rounded down
    pub fn minimum_out_for_slippage(expected_out: u64, slippage_bps: u32) -> Result<u64, AmmError> {
        if slippage_bps > BPS_DENOMINATOR {
            return Err(AmmError::InvalidSlippage { slippage_bps });
        }
        let scaled = expected_out as u128 * (BPS - slippage_bps as u128);
        Ok((scaled / BPS) as u64)
    }

    /// Constant-product invariant `k`
    pub fn invariant(reserve_a: u64, reserve_b: u64) -> u128 {
        reserve_a as u128 * reserve_b as u128
    }

    /// Validate a fee and return `10000 - fee_bps`
    pub fn fee_multiplier(fee_bps: u32) -> Result<u128, AmmError> {
        if fee_bps >= BPS_DENOMINATOR {
            return Err(AmmError::InvalidFee { fee_bps });
        }
        Ok(BPS - fee_bps as u128)
    }

    /// `floor(amount_in * (10000 - fee_bps) / 10000)`
    fn amount_after_fee(amount_in: u64, fee_bps: u32) -> Result<u128, AmmError> {
        let fee_multiplier = Self::fee_multiplier(fee_bps)?;
        let scaled = (amount_in as u128)
            .checked_mul(fee_multiplier)
            .ok_or(AmmError::MathOverflow {
                context: "fee deduction",
            })?;
        Ok(scaled / BPS)
    }
}

fn div_ceil(numerator: u128, denominator: u128) -> u128 {
    numerator / denominator + u128::from(numerator % denominator != 0)
}
