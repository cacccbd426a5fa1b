//! Best-quote selection across venues
//!
//! Every venue is asked concurrently. Each attempt is bounded by the venue
//! timeout and the whole call by the overall deadline; stragglers are dropped
//! when their timeout fires. The aggregator never executes a swap.

use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use crate::error::{RouteError, VenueError, VenueFailure};
use crate::http_venue::HttpQuoteVenue;
use crate::venue::{LocalPoolVenue, VenueAdapter};
use futures::future;
use pool_ledger::PoolLedger;
use std::sync::Arc;
use std::time::Duration;
use swapline_config::RouterSettings;
use tokio::time::{sleep, timeout, timeout_at, Instant};
use tracing::{debug, error, info, warn};
use types::{Direction, PairKey, Quote, VenueId};

/// Venue id used for the local ledger when built from settings
pub const LOCAL_VENUE_ID: &str = "local";

/// Result of a routing call
#[derive(Debug)]
pub struct RouteOutcome {
    /// Highest output; ties go to the lower fee, then the earlier venue
    pub best: Quote,
    /// Every successful quote, in venue registration order
    pub quotes: Vec<Quote>,
    /// Venues that produced no quote
    pub failures: Vec<VenueFailure>,
}

struct VenueSlot {
    adapter: Arc<dyn VenueAdapter>,
    breaker: CircuitBreaker,
}

/// Concurrent multi-venue quoting
pub struct RouteAggregator {
    venues: Vec<VenueSlot>,
    venue_timeout: Duration,
    overall_deadline: Duration,
    max_retries: u32,
    base_backoff_ms: u64,
    max_backoff_ms: u64,
    breaker_config: CircuitBreakerConfig,
}

impl RouteAggregator {
    /// Aggregator with no venues
    pub fn new(settings: &RouterSettings) -> Self {
        Self {
            venues: Vec::new(),
            venue_timeout: settings.venue_timeout(),
            overall_deadline: settings.overall_deadline(),
            max_retries: settings.max_retries,
            base_backoff_ms: settings.base_backoff_ms,
            max_backoff_ms: settings.max_backoff_ms,
            breaker_config: CircuitBreakerConfig::from(settings),
        }
    }

    /// Local ledger first, then every configured HTTP venue
    pub fn from_settings(
        settings: &RouterSettings,
        ledger: Option<Arc<PoolLedger>>,
    ) -> Result<Self, VenueError> {
        let mut aggregator = Self::new(settings);

        if let Some(ledger) = ledger {
            aggregator.add_venue(Arc::new(LocalPoolVenue::new(
                VenueId::new(LOCAL_VENUE_ID),
                ledger,
            )));
        }
        for venue in &settings.http_venues {
            aggregator.add_venue(Arc::new(HttpQuoteVenue::from_settings(
                venue,
                settings.venue_timeout(),
            )?));
        }

        info!(
            "RouteAggregator configured with {} venues",
            aggregator.venues.len()
        );
        Ok(aggregator)
    }

    /// Register a venue; registration order is the final tie-breaker
    pub fn add_venue(&mut self, adapter: Arc<dyn VenueAdapter>) {
        let breaker = CircuitBreaker::new(
            adapter.venue_id().as_str(),
            self.breaker_config.clone(),
        );
        self.venues.push(VenueSlot { adapter, breaker });
    }

    pub fn with_venue(mut self, adapter: Arc<dyn VenueAdapter>) -> Self {
        self.add_venue(adapter);
        self
    }

    pub fn venue_ids(&self) -> Vec<VenueId> {
        self.venues
            .iter()
            .map(|slot| slot.adapter.venue_id().clone())
            .collect()
    }

    pub fn circuit_state(&self, venue: &VenueId) -> Option<CircuitState> {
        self.venues
            .iter()
            .find(|slot| slot.adapter.venue_id() == venue)
            .map(|slot| slot.breaker.state())
    }

    /// Close a venue's circuit ahead of its cool-down; false if unknown
    pub fn reset_circuit(&self, venue: &VenueId) -> bool {
        match self
            .venues
            .iter()
            .find(|slot| slot.adapter.venue_id() == venue)
        {
            Some(slot) => {
                slot.breaker.reset();
                true
            }
            None => false,
        }
    }

    /// Best quote across all venues; read-only
    pub async fn best_quote(
        &self,
        pair: &PairKey,
        direction: Direction,
        amount_in: u64,
    ) -> Result<RouteOutcome, RouteError> {
        if amount_in == 0 {
            return Err(RouteError::InvalidAmount);
        }

        let deadline = Instant::now() + self.overall_deadline;
        let fetches = self
            .venues
            .iter()
            .map(|slot| self.quote_venue(slot, pair, direction, amount_in, deadline));
        let results = future::join_all(fetches).await;

        let mut quotes = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(quote) => quotes.push(quote),
                Err(failure) => {
                    warn!(
                        venue = %failure.venue_id,
                        attempts = failure.attempts,
                        "Venue dropped from route: {}",
                        failure.error
                    );
                    failures.push(failure);
                }
            }
        }

        match select_best(&quotes).cloned() {
            Some(best) => {
                debug!(
                    pair = %pair,
                    venue = %best.venue_id,
                    output_amount = best.output_amount,
                    quotes = quotes.len(),
                    failures = failures.len(),
                    "Best route selected"
                );
                Ok(RouteOutcome {
                    best,
                    quotes,
                    failures,
                })
            }
            None => {
                error!(
                    pair = %pair,
                    venues = self.venues.len(),
                    "No venue produced a quote"
                );
                Err(RouteError::NoRouteAvailable { failures })
            }
        }
    }

    /// One venue's quote with retries, bounded by `deadline`
    async fn quote_venue(
        &self,
        slot: &VenueSlot,
        pair: &PairKey,
        direction: Direction,
        amount_in: u64,
        deadline: Instant,
    ) -> Result<Quote, VenueFailure> {
        let venue_id = slot.adapter.venue_id();
        let fail = |attempts, error| VenueFailure {
            venue_id: venue_id.clone(),
            attempts,
            error,
        };

        if !slot.breaker.try_acquire() {
            return Err(fail(
                0,
                VenueError::CircuitOpen {
                    venue: venue_id.clone(),
                },
            ));
        }

        let mut attempts = 0;
        loop {
            attempts += 1;

            let attempt = timeout(
                self.venue_timeout,
                slot.adapter.fetch_quote(pair, direction, amount_in),
            );
            let error = match timeout_at(deadline, attempt).await {
                Ok(Ok(Ok(quote))) => {
                    slot.breaker.on_success();
                    return Ok(quote);
                }
                Ok(Ok(Err(error))) => error,
                Ok(Err(_)) => VenueError::Timeout {
                    venue: venue_id.clone(),
                    timeout_ms: self.venue_timeout.as_millis() as u64,
                },
                Err(_) => {
                    slot.breaker.on_failure();
                    return Err(fail(
                        attempts,
                        VenueError::Timeout {
                            venue: venue_id.clone(),
                            timeout_ms: self.overall_deadline.as_millis() as u64,
                        },
                    ));
                }
            };

            if error.is_recoverable() && attempts <= self.max_retries {
                let backoff = self.backoff(attempts);
                if Instant::now() + backoff < deadline {
                    debug!(
                        venue = %venue_id,
                        attempt = attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        "Retrying venue: {}",
                        error
                    );
                    sleep(backoff).await;
                    continue;
                }
            }

            if error.is_venue_fault() {
                slot.breaker.on_failure();
            } else {
                slot.breaker.on_neutral();
            }
            return Err(fail(attempts, error));
        }
    }

    /// Exponential backoff after the given attempt, capped
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
        let backoff_ms = self.base_backoff_ms.saturating_mul(factor);
        Duration::from_millis(backoff_ms.min(self.max_backoff_ms))
    }
}

/// Highest output, then lowest fee, then earliest position
pub fn select_best(quotes: &[Quote]) -> Option<&Quote> {
    let mut best: Option<&Quote> = None;
    for quote in quotes {
        best = match best {
            Some(current)
                if quote.output_amount < current.output_amount
                    || (quote.output_amount == current.output_amount
                        && quote.fee_bps >= current.fee_bps) =>
            {
                Some(current)
            }
            _ => Some(quote),
        };
    }
    best
}
