//! Pluggable quote formulas for liquidity venues
//!
//! The local ledger always prices with [`ConstantProduct`]. Remote venues may
//! run a different curve; callers must not assume constant-product uniformity
//! for external liquidity.

use crate::{AmmError, ConstantProduct};

/// Output calculation used by a venue
pub trait QuoteFormula: Send + Sync {
    /// Short formula name for logs
    fn name(&self) -> &'static str;

    /// Output amount for `amount_in` against the given reserves and fee
    fn output_for(
        &self,
        amount_in: u64,
        reserve_in: u64,
        reserve_out: u64,
        fee_bps: u32,
    ) -> Result<u64, AmmError>;
}

impl QuoteFormula for ConstantProduct {
    fn name(&self) -> &'static str {
        "constant_product"
    }

    fn output_for(
        &self,
        amount_in: u64,
        reserve_in: u64,
        reserve_out: u64,
        fee_bps: u32,
    ) -> Result<u64, AmmError> {
        ConstantProduct::compute_output(amount_in, reserve_in, reserve_out, fee_bps)
    }
}
