//! Venue adapters: anything that can quote a swap
//!
//! The aggregator treats every liquidity source the same way. Each adapter
//! owns its own I/O and pricing; none of them mutate state.

use crate::error::VenueError;
use async_trait::async_trait;
use pool_ledger::PoolLedger;
use std::sync::Arc;
use swapline_amm::{price_impact, ConstantProduct, QuoteFormula};
use tracing::debug;
use types::{Direction, PairKey, PoolReserves, Quote, VenueId};

/// A liquidity source the route aggregator can ask for quotes
#[async_trait]
pub trait VenueAdapter: Send + Sync {
    fn venue_id(&self) -> &VenueId;

    /// Quote `amount_in` of the direction's input token
    ///
    /// Read-only. The aggregator bounds every call with a timeout, so
    /// implementations need not enforce one themselves.
    async fn fetch_quote(
        &self,
        pair: &PairKey,
        direction: Direction,
        amount_in: u64,
    ) -> Result<Quote, VenueError>;
}

/// Quotes from pools held in the local [`PoolLedger`]
pub struct LocalPoolVenue {
    id: VenueId,
    ledger: Arc<PoolLedger>,
}

impl LocalPoolVenue {
    pub fn new(id: VenueId, ledger: Arc<PoolLedger>) -> Self {
        Self { id, ledger }
    }
}

#[async_trait]
impl VenueAdapter for LocalPoolVenue {
    fn venue_id(&self) -> &VenueId {
        &self.id
    }

    async fn fetch_quote(
        &self,
        pair: &PairKey,
        direction: Direction,
        amount_in: u64,
    ) -> Result<Quote, VenueError> {
        let reserves = self.ledger.get_reserves(pair)?;
        let quote = quote_from_reserves(&self.id, &ConstantProduct, reserves, direction, amount_in)?;

        if let Ok(impact) = price_impact(
            amount_in,
            quote.effective_reserve_in,
            quote.effective_reserve_out,
        ) {
            debug!(
                venue = %self.id,
                pair = %pair,
                price_impact_pct = %impact.round_dp(4),
                "Local price impact"
            );
        }
        Ok(quote)
    }
}

/// Reserves and fee reported by a remote pool
pub type RemoteReserves = PoolReserves;

/// Fetches the current reserves of an external pool
#[async_trait]
pub trait ReserveSource: Send + Sync {
    async fn fetch_reserves(&self, pair: &PairKey) -> Result<RemoteReserves, VenueError>;
}

/// Remote pool priced locally from its published reserves
///
/// External venues are not assumed to be constant-product; pass a different
/// [`QuoteFormula`] when the venue runs another curve.
pub struct ReserveVenue<S, F = ConstantProduct> {
    id: VenueId,
    source: S,
    formula: F,
}

impl<S: ReserveSource> ReserveVenue<S, ConstantProduct> {
    pub fn new(id: VenueId, source: S) -> Self {
        Self::with_formula(id, source, ConstantProduct)
    }
}

impl<S: ReserveSource, F: QuoteFormula> ReserveVenue<S, F> {
    pub fn with_formula(id: VenueId, source: S, formula: F) -> Self {
        Self {
            id,
            source,
            formula,
        }
    }
}

#[async_trait]
impl<S: ReserveSource, F: QuoteFormula> VenueAdapter for ReserveVenue<S, F> {
    fn venue_id(&self) -> &VenueId {
        &self.id
    }

    async fn fetch_quote(
        &self,
        pair: &PairKey,
        direction: Direction,
        amount_in: u64,
    ) -> Result<Quote, VenueError> {
        let reserves = self.source.fetch_reserves(pair).await?;
        quote_from_reserves(&self.id, &self.formula, reserves, direction, amount_in)
    }
}

fn quote_from_reserves<F: QuoteFormula>(
    venue_id: &VenueId,
    formula: &F,
    reserves: PoolReserves,
    direction: Direction,
    amount_in: u64,
) -> Result<Quote, VenueError> {
    let (reserve_in, reserve_out) = reserves.oriented(direction);
    let output_amount = formula.output_for(amount_in, reserve_in, reserve_out, reserves.fee_bps)?;

    debug!(
        venue = %venue_id,
        formula = formula.name(),
        amount_in,
        output_amount,
        "Venue quote"
    );

    Ok(Quote {
        venue_id: venue_id.clone(),
        output_amount,
        effective_reserve_in: reserve_in,
        effective_reserve_out: reserve_out,
        fee_bps: reserves.fee_bps,
    })
}
