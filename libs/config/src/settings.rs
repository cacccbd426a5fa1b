//! Settings structures and layered loading
//!
//! Supports loading from TOML files with environment-specific overrides.

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default base configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/swapline.toml";

/// Directory holding `<environment>.toml` overlays
pub const ENVIRONMENTS_DIR: &str = "config/environments";

/// Prefix for environment variable overrides (`SWAPLINE__ROUTER__MAX_RETRIES=3`)
pub const ENV_PREFIX: &str = "SWAPLINE";

/// Complete Swapline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwaplineConfig {
    pub ledger: LedgerSettings,
    pub router: RouterSettings,
    pub logging: LoggingSettings,
}

/// Pool ledger settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// Longest wait for a pool's critical section before giving up
    pub commit_lock_timeout_ms: u64,
    /// Swap events buffered per subscriber; further events are dropped for
    /// that subscriber until it catches up
    pub event_buffer: usize,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            commit_lock_timeout_ms: 250,
            event_buffer: 1024,
        }
    }
}

impl LedgerSettings {
    pub fn commit_lock_timeout(&self) -> Duration {
        Duration::from_millis(self.commit_lock_timeout_ms)
    }
}

/// Route aggregator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
    /// Timeout for a single venue fetch attempt
    pub venue_timeout_ms: u64,
    /// Hard deadline for a whole `best_quote` call
    pub overall_deadline_ms: u64,
    /// Retries after the first attempt for recoverable venue failures
    pub max_retries: u32,
    /// Initial retry backoff, doubled per attempt
    pub base_backoff_ms: u64,
    /// Backoff cap
    pub max_backoff_ms: u64,
    /// Consecutive failures before a venue's circuit opens
    pub circuit_failure_threshold: u32,
    /// Time an open circuit waits before letting a probe through
    pub circuit_recovery_ms: u64,
    /// Remote quote APIs to register as venues
    pub http_venues: Vec<HttpVenueSettings>,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            venue_timeout_ms: 500,
            overall_deadline_ms: 1500,
            max_retries: 2,
            base_backoff_ms: 25,
            max_backoff_ms: 200,
            circuit_failure_threshold: 5,
            circuit_recovery_ms: 30_000,
            http_venues: Vec::new(),
        }
    }
}

impl RouterSettings {
    pub fn venue_timeout(&self) -> Duration {
        Duration::from_millis(self.venue_timeout_ms)
    }

    pub fn overall_deadline(&self) -> Duration {
        Duration::from_millis(self.overall_deadline_ms)
    }

    pub fn circuit_recovery(&self) -> Duration {
        Duration::from_millis(self.circuit_recovery_ms)
    }
}

/// A remote quote API exposed as a venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpVenueSettings {
    pub id: String,
    /// Base URL; `${VAR}` references are expanded from the environment
    pub base_url: String,
    /// Fee the venue advertises, used only for tie-breaking
    #[serde(default)]
    pub fee_bps: u32,
    /// Slippage tolerance passed through to the quote API
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u32,
}

fn default_slippage_bps() -> u32 {
    50
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl SwaplineConfig {
    /// Load configuration from files with environment overrides
    ///
    /// An explicit `base_path` must exist; the default path is optional so a
    /// bare deployment runs on defaults plus environment variables.
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let base_source = match base_path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false),
        };

        let mut builder = Config::builder().add_source(base_source);

        if let Some(env) = environment {
            let env_file = PathBuf::from(ENVIRONMENTS_DIR).join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let mut config: SwaplineConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.expand_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from an inline TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: SwaplineConfig = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.expand_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Expand environment variables in venue URLs
    pub fn expand_env_vars(&mut self) -> Result<()> {
        for venue in &mut self.router.http_venues {
            let expanded = shellexpand::env(&venue.base_url)
                .with_context(|| format!("Failed to expand base_url for venue {}", venue.id))?;
            venue.base_url = expanded.to_string();
        }
        Ok(())
    }

    /// Reject settings that would make an operation unbounded or impossible
    pub fn validate(&self) -> Result<()> {
        if self.ledger.commit_lock_timeout_ms == 0 {
            bail!("ledger.commit_lock_timeout_ms must be positive");
        }
        if self.ledger.event_buffer == 0 {
            bail!("ledger.event_buffer must be positive");
        }

        let router = &self.router;
        if router.venue_timeout_ms == 0 {
            bail!("router.venue_timeout_ms must be positive");
        }
        if router.overall_deadline_ms < router.venue_timeout_ms {
            bail!(
                "router.overall_deadline_ms ({}) must be at least router.venue_timeout_ms ({})",
                router.overall_deadline_ms,
                router.venue_timeout_ms
            );
        }
        if router.max_backoff_ms < router.base_backoff_ms {
            bail!("router.max_backoff_ms must be at least router.base_backoff_ms");
        }
        if router.circuit_failure_threshold == 0 {
            bail!("router.circuit_failure_threshold must be positive");
        }

        for venue in &router.http_venues {
            if venue.id.trim().is_empty() {
                bail!("http venue id cannot be empty");
            }
            if !venue.base_url.starts_with("http://") && !venue.base_url.starts_with("https://") {
                bail!(
                    "http venue {} base_url must start with http:// or https://",
                    venue.id
                );
            }
            if venue.fee_bps >= 10_000 || venue.slippage_bps > 10_000 {
                bail!("http venue {} has out-of-range basis points", venue.id);
            }
        }

        Ok(())
    }
}
