//! Remote quote API venue
//!
//! Asks an external aggregator for a quote over HTTP:
//!
//! ```text
//! GET {base_url}/quote?inputMint=<in>&outputMint=<out>&amount=<amount_in>&slippageBps=<bps>
//! → { "outAmount": "97750848", "priceImpactPct": "0.0196", ... }
//! ```
//!
//! Amounts travel as decimal strings so no precision is lost in JSON numbers.

use crate::error::VenueError;
use crate::venue::VenueAdapter;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use swapline_config::HttpVenueSettings;
use tracing::{debug, warn};
use types::{Direction, PairKey, Quote, VenueId};

/// Quote response body; fields not listed are ignored
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    out_amount: String,
    #[serde(default)]
    price_impact_pct: Option<String>,
}

/// Venue backed by an HTTP quote API
pub struct HttpQuoteVenue {
    id: VenueId,
    base_url: String,
    fee_bps: u32,
    slippage_bps: u32,
    client: reqwest::Client,
}

impl HttpQuoteVenue {
    /// Build from configuration; `request_timeout` caps each HTTP request
    pub fn from_settings(
        settings: &HttpVenueSettings,
        request_timeout: Duration,
    ) -> Result<Self, VenueError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            id: VenueId::new(settings.id.clone()),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            fee_bps: settings.fee_bps,
            slippage_bps: settings.slippage_bps,
            client,
        })
    }

    fn invalid(&self, reason: impl Into<String>) -> VenueError {
        VenueError::InvalidResponse {
            venue: self.id.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl VenueAdapter for HttpQuoteVenue {
    fn venue_id(&self) -> &VenueId {
        &self.id
    }

    async fn fetch_quote(
        &self,
        pair: &PairKey,
        direction: Direction,
        amount_in: u64,
    ) -> Result<Quote, VenueError> {
        let (token_in, token_out) = pair.tokens_for(direction);
        let url = format!("{}/quote", self.base_url);
        let amount = amount_in.to_string();
        let slippage = self.slippage_bps.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("inputMint", token_in.as_str()),
                ("outputMint", token_out.as_str()),
                ("amount", amount.as_str()),
                ("slippageBps", slippage.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!(venue = %self.id, %status, "Quote API unavailable");
            return Err(VenueError::Unavailable {
                venue: self.id.clone(),
                reason: format!("HTTP {}", status),
            });
        }
        if !status.is_success() {
            return Err(self.invalid(format!("HTTP {}", status)));
        }

        let body = response.text().await?;
        let parsed: QuoteResponse = serde_json::from_str(&body)
            .map_err(|e| self.invalid(format!("malformed quote body: {}", e)))?;

        let output_amount = parsed
            .out_amount
            .parse::<u64>()
            .map_err(|_| self.invalid(format!("outAmount {:?} is not an integer", parsed.out_amount)))?;

        debug!(
            venue = %self.id,
            amount_in,
            output_amount,
            price_impact_pct = parsed.price_impact_pct.as_deref().unwrap_or("n/a"),
            "HTTP venue quote"
        );

        // The API does not expose pool depth
        Ok(Quote {
            venue_id: self.id.clone(),
            output_amount,
            effective_reserve_in: 0,
            effective_reserve_out: 0,
            fee_bps: self.fee_bps,
        })
    }
}
