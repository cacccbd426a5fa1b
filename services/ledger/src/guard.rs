//! Slippage-protected swap execution
//!
//! Computes the output from a snapshot taken inside the pool's critical
//! section and commits only if it clears the caller's minimum, so the
//! minimum is checked against exactly the reserves the swap is applied to.

use crate::error::{LedgerError, Result};
use crate::ledger::PoolLedger;
use std::sync::Arc;
use swapline_amm::ConstantProduct;
use tracing::{debug, warn};
use types::{Direction, PairKey, SwapReceipt, SwapRequest};

/// Executes swaps against a [`PoolLedger`]
#[derive(Clone)]
pub struct SlippageGuard {
    ledger: Arc<PoolLedger>,
}

impl SlippageGuard {
    pub fn new(ledger: Arc<PoolLedger>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Arc<PoolLedger> {
        &self.ledger
    }

    /// Compute, check and commit a swap as one atomic step
    ///
    /// On any error the pool is left untouched and no event is emitted.
    pub fn execute_swap(&self, request: &SwapRequest) -> Result<SwapReceipt> {
        let result = self.ledger.transact(&request.pair, |txn| {
            let reserves = txn.reserves();
            let (reserve_in, reserve_out) = reserves.oriented(request.direction);

            let amount_out = ConstantProduct::compute_output(
                request.amount_in,
                reserve_in,
                reserve_out,
                reserves.fee_bps,
            )?;

            if amount_out < request.minimum_amount_out {
                return Err(LedgerError::SlippageExceeded {
                    minimum_amount_out: request.minimum_amount_out,
                    amount_out,
                });
            }

            txn.commit(request.direction, request.amount_in, amount_out)
        });

        if let Err(e) = &result {
            self.ledger.record_rejection();
            warn!(
                pair = %request.pair,
                direction = %request.direction,
                amount_in = request.amount_in,
                minimum_amount_out = request.minimum_amount_out,
                "Swap rejected: {}",
                e
            );
        }
        result
    }

    /// What `execute_swap` would return right now, without committing
    ///
    /// Reads reserves outside the commit lock; a concurrent swap may land
    /// between the preview and a later execution.
    pub fn preview_swap(
        &self,
        pair: &PairKey,
        direction: Direction,
        amount_in: u64,
    ) -> Result<SwapReceipt> {
        let reserves = self.ledger.get_reserves(pair)?;
        let (reserve_in, reserve_out) = reserves.oriented(direction);

        let amount_out =
            ConstantProduct::compute_output(amount_in, reserve_in, reserve_out, reserves.fee_bps)?;
        let new_reserve_in = reserve_in
            .checked_add(amount_in)
            .ok_or(LedgerError::MathOverflow {
                context: "reserve_in + amount_in",
            })?;

        debug!(pair = %pair, direction = %direction, amount_in, amount_out, "Swap preview");

        Ok(SwapReceipt {
            amount_in,
            amount_out,
            new_reserve_in,
            new_reserve_out: reserve_out - amount_out,
        })
    }
}
