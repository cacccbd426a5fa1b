//! # Swapline Configuration
//!
//! Centralised configuration for the pool ledger and the route aggregator.
//!
//! ## Features
//!
//! - **Layered Loading**: base TOML file, optional environment file, then
//!   `SWAPLINE__SECTION__KEY` environment variables
//! - **Validated Defaults**: every field has a default and the whole config is
//!   checked before use
//! - **Logging Setup**: one call installs the tracing subscriber
//!
//! ## Usage
//!
//! ```rust,no_run
//! use swapline_config::{init_tracing, SwaplineConfig};
//!
//! let config = SwaplineConfig::load(None, Some("production"))?;
//! init_tracing(&config.logging)?;
//! println!("venue timeout: {:?}", config.router.venue_timeout());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod logging;
pub mod settings;

pub use logging::init_tracing;
pub use settings::{
    HttpVenueSettings, LedgerSettings, LoggingSettings, RouterSettings, SwaplineConfig,
};
