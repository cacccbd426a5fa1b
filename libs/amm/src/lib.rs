//! # Swapline AMM Library - Constant-Product Swap Mathematics
//!
//! ## Purpose
//!
//! Pure, side-effect-free math for constant-product (`x * y = k`) pools. Every
//! value that can influence a committed reserve change is computed with
//! overflow-checked `u128` integer arithmetic and rounded in the pool's favour,
//! so repeated swaps can never extract value through rounding and the
//! invariant `k` never decreases.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Pool reserves from the pool ledger, remote venue reserves
//! - **Output Destinations**: Slippage guard (commit decisions), venue adapters (quotes)
//! - **Display Helpers**: Decimal spot price and price impact, never used for commits
//! - **Extension Point**: [`QuoteFormula`] lets remote venues plug in their own curve
//!
//! ## Architecture Role
//!
//! ```text
//! Reserves + Fee + Amount → [ConstantProduct] → amount_out (u64, floored)
//!          ↓                       ↓                    ↓
//!   Pool Ledger snapshot     u128 intermediates   Slippage Guard / Quotes
//!   Remote venue reserves    Drain guard          Route Aggregator
//! ```
//!
//! ## Rounding Rules
//!
//! - Fee deduction floors the post-fee input
//! - Output floors the exact formula result
//! - Reverse quotes ([`ConstantProduct::compute_input`]) round the input up

pub mod constant_product;
pub mod error;
pub mod pool_traits;
pub mod pricing;

pub use constant_product::ConstantProduct;
pub use error::AmmError;
pub use pool_traits::QuoteFormula;
pub use pricing::{price_impact, spot_price};

/// Common types for display-side price calculations
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
