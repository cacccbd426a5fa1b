//! Swap requests, quotes, receipts and events

use crate::identifiers::{Direction, PairKey, VenueId};
use serde::{Deserialize, Serialize};

/// Current reserves and fee of a pool, in canonical token order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReserves {
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub fee_bps: u32,
}

impl PoolReserves {
    /// `(reserve_in, reserve_out)` for a swap direction
    pub fn oriented(&self, direction: Direction) -> (u64, u64) {
        direction.orient(self.reserve_a, self.reserve_b)
    }

    /// Constant-product invariant `k = reserve_a * reserve_b`
    pub fn invariant(&self) -> u128 {
        self.reserve_a as u128 * self.reserve_b as u128
    }
}

/// Caller-constructed swap request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub pair: PairKey,
    pub direction: Direction,
    pub amount_in: u64,
    /// Smallest output the caller will accept; zero disables the check
    pub minimum_amount_out: u64,
}

impl SwapRequest {
    pub fn new(pair: PairKey, direction: Direction, amount_in: u64, minimum_amount_out: u64) -> Self {
        Self {
            pair,
            direction,
            amount_in,
            minimum_amount_out,
        }
    }
}

/// Quote produced by a single venue for a single request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub venue_id: VenueId,
    pub output_amount: u64,
    pub effective_reserve_in: u64,
    pub effective_reserve_out: u64,
    /// Fee charged by the originating venue, used for tie-breaking
    pub fee_bps: u32,
}

/// Outcome of a committed swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub amount_in: u64,
    pub amount_out: u64,
    pub new_reserve_in: u64,
    pub new_reserve_out: u64,
}

/// Emitted after every committed swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapEvent {
    pub pair: PairKey,
    pub direction: Direction,
    pub amount_in: u64,
    pub amount_out: u64,
    pub timestamp_ns: u64,
}
