//! # Swapline Boundary Types
//!
//! ## Purpose
//!
//! Strongly-typed records exchanged between the swap engine, the pool ledger,
//! the route aggregator and the external collaborators that feed them. Every
//! value that crosses a component boundary is one of these types; there are no
//! untyped containers anywhere in the pipeline.
//!
//! ## Integration Points
//!
//! - **Pool Ledger**: keys pools by [`PairKey`], reports [`PoolReserves`]
//! - **Slippage Guard**: consumes [`SwapRequest`], produces [`SwapReceipt`]
//! - **Route Aggregator**: produces [`Quote`]s tagged with a [`VenueId`]
//! - **Subscribers**: receive a [`SwapEvent`] after every committed swap
//!
//! ## Architecture Role
//!
//! ```text
//! Caller → SwapRequest → [Slippage Guard] → SwapReceipt
//!                              ↓
//!                  PairKey → [Pool Ledger] → PoolReserves / SwapEvent
//!                              ↓
//!          VenueId → [Route Aggregator] → Quote (best + all collected)
//! ```
//!
//! ## Units
//!
//! Amounts are always `u64` integers in the smallest indivisible unit of each
//! token (lamports, micro-USDT, ...). Human-readable decimal conversion happens
//! strictly in presentation code, never here.

pub mod errors;
pub mod identifiers;
pub mod swap;

pub use errors::TypesError;
pub use identifiers::{Direction, PairKey, TokenId, VenueId};
pub use swap::{PoolReserves, Quote, SwapEvent, SwapReceipt, SwapRequest};

/// Fee denominator: fees are expressed in basis points out of 10,000
pub const BPS_DENOMINATOR: u32 = 10_000;
