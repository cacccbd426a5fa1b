//! Display-only price helpers
//!
//! Decimal values here are for human-facing quoting. Nothing in this module
//! may feed a commit decision; use [`ConstantProduct`] for that.

use crate::{AmmError, ConstantProduct};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Spot price `reserve_out / reserve_in`, or `None` for an empty input reserve
pub fn spot_price(reserve_in: u64, reserve_out: u64) -> Option<Decimal> {
    if reserve_in == 0 {
        return None;
    }
    Decimal::from(reserve_out).checked_div(Decimal::from(reserve_in))
}

/// Price impact of a trade as a percentage of the pre-trade spot price
///
/// Measured fee-free on the post-trade reserves so the fee does not show up
/// as impact.
pub fn price_impact(amount_in: u64, reserve_in: u64, reserve_out: u64) -> Result<Decimal, AmmError> {
    let amount_out = ConstantProduct::compute_output(amount_in, reserve_in, reserve_out, 0)?;

    let price_before = spot_price(reserve_in, reserve_out).ok_or(AmmError::InsufficientLiquidity {
        reserve_in,
        reserve_out,
    })?;

    let new_reserve_in = Decimal::from(reserve_in) + Decimal::from(amount_in);
    let new_reserve_out = Decimal::from(reserve_out - amount_out);
    let price_after = new_reserve_out
        .checked_div(new_reserve_in)
        .ok_or(AmmError::MathOverflow {
            context: "post-trade price",
        })?;

    let impact = (price_before - price_after)
        .abs()
        .checked_div(price_before)
        .ok_or(AmmError::MathOverflow {
            context: "price impact",
        })?;

    Ok(impact * dec!(100))
}
