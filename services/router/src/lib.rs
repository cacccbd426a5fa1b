//! # Route Aggregator - Multi-Venue Quote Selection
//!
//! ## Purpose
//!
//! Asks every configured liquidity venue for a quote on the same swap and
//! picks the best one. Venues are slow, flaky or plain wrong at times; the
//! aggregator tolerates all of that as long as one venue answers, and reports
//! exactly which venues failed and why.
//!
//! ## Integration Points
//!
//! - **Local liquidity**: [`LocalPoolVenue`] reads the pool ledger (never writes)
//! - **Remote reserves**: [`ReserveVenue`] prices a [`ReserveSource`] with any
//!   [`QuoteFormula`](swapline_amm::QuoteFormula)
//! - **Remote quotes**: [`HttpQuoteVenue`] calls an external quote API
//! - **Configuration**: [`RouterSettings`](swapline_config::RouterSettings)
//!   timeouts, retry policy, circuit breaker thresholds, HTTP venue list
//!
//! ## Architecture Role
//!
//! ```text
//!                          ┌→ [LocalPoolVenue] ─→ PoolLedger (read)
//! best_quote(pair, dir, x) ┼→ [ReserveVenue]   ─→ ReserveSource + formula
//!   join_all + deadline    └→ [HttpQuoteVenue] ─→ GET /quote
//!          ↓
//!   RouteOutcome { best, quotes, failures }
//! ```
//!
//! ## Failure Handling
//!
//! - Per-attempt timeout plus one overall deadline for the whole call
//! - Recoverable failures retried with capped exponential backoff
//! - Per-venue circuit breaker skips venues that keep failing
//! - A failing venue never fails the call unless every venue fails

pub mod aggregator;
pub mod circuit_breaker;
pub mod error;
pub mod http_venue;
pub mod venue;

pub use aggregator::{select_best, RouteAggregator, RouteOutcome, LOCAL_VENUE_ID};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerMetrics, CircuitState};
pub use error::{RouteError, VenueError, VenueFailure};
pub use http_venue::HttpQuoteVenue;
pub use venue::{LocalPoolVenue, RemoteReserves, ReserveSource, ReserveVenue, VenueAdapter};
