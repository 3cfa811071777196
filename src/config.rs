//! Configuration types for poly-updown
//!
//! Tunables come from a TOML file; every field has a default so a partial
//! (or absent) file still yields a runnable configuration. Credentials are
//! read from the environment only and never appear in the file.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::exchange::Asset;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub exchange: ExchangeConfig,
    pub market: MarketConfig,
    pub trading: TradingConfig,
    pub sampling: SamplingConfig,
    pub supervisor: SupervisorConfig,
    pub telemetry: TelemetryConfig,
}

/// Exchange client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Base URL of the venue's order-book API
    pub base_url: String,
    /// Version prefix used by the versioned endpoints
    pub api_version: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum attempts per network call
    pub max_retries: u32,
    /// Base delay for the session-recreate backoff, in seconds
    pub retry_base_delay_secs: u64,
    /// Market cache TTL in seconds
    pub cache_ttl_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://clob.polymarket.com".to_string(),
            api_version: "v1".to_string(),
            timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_secs: 5,
            cache_ttl_secs: 300,
        }
    }
}

/// Target market selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Asset to trade
    pub asset: Asset,
    /// Duration marker the market question must carry, e.g. "15"
    pub duration: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            asset: Asset::Btc,
            duration: "15".to_string(),
        }
    }
}

/// Risk and sizing tunables
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TradingConfig {
    /// Cumulative spend ceiling per session
    pub max_total_spend: Decimal,
    /// Preferred per-trade amount
    pub default_amount: Decimal,
    /// Minimum signal probability required to trade
    pub probability_threshold: Decimal,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            max_total_spend: Decimal::new(5, 0),
            default_amount: Decimal::new(8, 1),
            probability_threshold: Decimal::new(7, 1),
        }
    }
}

/// Price sampling tunables
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Observation window in seconds (0 = instantaneous)
    pub window_secs: u64,
    /// Poll interval within the window, in seconds
    pub interval_secs: u64,
    /// Pause after a failed poll before continuing the window, in seconds
    pub error_pause_secs: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            window_secs: 300,
            interval_secs: 10,
            error_pause_secs: 5,
        }
    }
}

/// Supervisory loop tunables
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Wait between trading cycles in continuous mode, in seconds
    pub cycle_interval_secs: u64,
    /// Minimum spacing between health checks, in seconds
    pub health_check_interval_secs: u64,
    /// Consecutive errors tolerated before a full restart
    pub max_errors: u32,
    /// Pause before reinitializing during a restart, in seconds
    pub restart_delay_secs: u64,
    /// Wait after a failed cycle before the next one, in seconds
    pub error_wait_secs: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            cycle_interval_secs: 15 * 60,
            health_check_interval_secs: 60,
            max_errors: 5,
            restart_delay_secs: 30,
            error_wait_secs: 60,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Signing credentials, sourced from the environment
#[derive(Clone)]
pub struct Credentials {
    /// Key used to sign order payloads
    pub signing_key: String,
    /// Wallet identifier sent with each order
    pub wallet_address: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("wallet_address", &self.wallet_address)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Load from `PRIVATE_KEY` and `WALLET_ADDRESS`.
    ///
    /// Returns `None` when either is unset: the bot then runs in dry-run
    /// mode, which is a supported configuration rather than an error.
    pub fn from_env() -> Option<Self> {
        let signing_key = std::env::var("PRIVATE_KEY").ok()?;
        let wallet_address = std::env::var("WALLET_ADDRESS").ok()?;
        Some(Self {
            signing_key,
            wallet_address,
        })
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
