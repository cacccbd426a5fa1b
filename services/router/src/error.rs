//! Error types for venue quoting and route selection

use pool_ledger::LedgerError;
use swapline_amm::AmmError;
use thiserror::Error;
use types::VenueId;

/// Failure of a single venue to produce a quote
#[derive(Debug, Error)]
pub enum VenueError {
    /// Venue reachable in principle but not serving right now
    #[error("Venue {venue} unavailable: {reason}")]
    Unavailable { venue: VenueId, reason: String },

    #[error("Venue {venue} timed out after {timeout_ms}ms")]
    Timeout { venue: VenueId, timeout_ms: u64 },

    /// Skipped because the venue's circuit breaker is open
    #[error("Circuit breaker open for venue {venue}")]
    CircuitOpen { venue: VenueId },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Venue reserves could not be priced
    #[error("Pricing error: {0}")]
    Pricing(#[from] AmmError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response from venue {venue}: {reason}")]
    InvalidResponse { venue: VenueId, reason: String },
}

impl VenueError {
    /// Worth retrying within the same routing call
    pub fn is_recoverable(&self) -> bool {
        match self {
            VenueError::Unavailable { .. } | VenueError::Timeout { .. } => true,
            VenueError::Ledger(e) => e.is_retryable(),
            VenueError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().map_or(false, |status| status.is_server_error())
            }
            _ => false,
        }
    }

    /// The venue itself is unhealthy, as opposed to this request being
    /// unanswerable; only these count against the circuit breaker
    pub fn is_venue_fault(&self) -> bool {
        match self {
            VenueError::Unavailable { .. } | VenueError::Timeout { .. } => true,
            VenueError::Http(e) => e.status().map_or(true, |status| status.is_server_error()),
            _ => false,
        }
    }

    /// Retrying cannot help until the request or the venue changes
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            VenueError::InvalidResponse { .. } | VenueError::Pricing(_)
        ) || matches!(self, VenueError::Ledger(e) if !e.is_retryable())
    }
}

/// A venue that contributed no quote, and why
#[derive(Debug)]
pub struct VenueFailure {
    pub venue_id: VenueId,
    /// Fetch attempts made; zero when the circuit breaker skipped the venue
    pub attempts: u32,
    pub error: VenueError,
}

/// Route selection failures
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Invalid amount: amount_in must be positive")]
    InvalidAmount,

    #[error("No route available: {} venue(s) failed", .failures.len())]
    NoRouteAvailable { failures: Vec<VenueFailure> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::PairKey;

    #[test]
    fn test_error_classification() {
        let venue = VenueId::new("remote");

        let unavailable = VenueError::Unavailable {
            venue: venue.clone(),
            reason: "503".to_string(),
        };
        assert!(unavailable.is_recoverable());
        assert!(!unavailable.is_permanent());
        assert!(unavailable.is_venue_fault());

        let timeout = VenueError::Timeout {
            venue: venue.clone(),
            timeout_ms: 500,
        };
        assert!(timeout.is_venue_fault());

        let invalid = VenueError::InvalidResponse {
            venue: venue.clone(),
            reason: "missing outAmount".to_string(),
        };
        assert!(!invalid.is_recoverable());
        assert!(invalid.is_permanent());
        assert!(!invalid.is_venue_fault());

        let missing = VenueError::from(LedgerError::PoolNotFound {
            pair: PairKey::from_strs("SOL", "USDT").unwrap(),
        });
        assert!(missing.is_permanent());
        assert!(!missing.is_venue_fault());

        let drained = VenueError::from(AmmError::InsufficientLiquidity {
            reserve_in: 1_000,
            reserve_out: 0,
        });
        assert!(!drained.is_venue_fault());

        let busy = VenueError::from(LedgerError::CommitContention {
            pair: PairKey::from_strs("SOL", "USDT").unwrap(),
            waited_ms: 250,
        });
        assert!(busy.is_recoverable());
        assert!(!busy.is_venue_fault());

        let open = VenueError::CircuitOpen { venue };
        assert!(!open.is_recoverable());
        assert!(!open.is_permanent());
    }

    #[test]
    fn test_no_route_message_counts_failures() {
        let err = RouteError::NoRouteAvailable {
            failures: vec![VenueFailure {
                venue_id: VenueId::new("a"),
                attempts: 1,
                error: VenueError::Timeout {
                    venue: VenueId::new("a"),
                    timeout_ms: 500,
                },
            }],
        };
        assert_eq!(err.to_string(), "No route available: 1 venue(s) failed");
    }
}
