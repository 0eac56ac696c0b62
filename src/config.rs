//! Configuration types for momentum-exit

use crate::feed::{BinanceConfig, BINANCE_API_URL};
use crate::telemetry::LogFormat;
use anyhow::Context;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub market: MarketConfig,
    pub decision: DecisionConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub paper: PaperConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Candle source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Binance REST base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Trading pair (e.g., "BTCUSDT")
    pub symbol: String,

    /// Kline interval (e.g., "1h")
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Hours of history fed to each decision
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u64,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Sell decision configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionConfig {
    /// 0 sells at the first decline after a rally, 1 holds out for the best rally
    pub risk_tolerance: Decimal,

    /// Length of the selling window opened when a balance appears (hours)
    #[serde(default = "default_selling_timeframe_hours")]
    pub selling_timeframe_hours: u64,
}

/// Balance polling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    /// Asset to liquidate (e.g., "BTC")
    #[serde(default = "default_asset")]
    pub asset: String,

    /// Seconds between balance checks
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Sell unconditionally once the deadline has passed
    #[serde(default = "default_true")]
    pub force_sell_on_expiry: bool,
}

/// Selling session persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// JSON file holding active selling sessions
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

/// Paper account configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaperConfig {
    /// Free balance of the polled asset when the ledger is first created
    #[serde(default)]
    pub starting_balance: Decimal,

    /// File holding paper balances and fills across restarts
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    /// Fee rate charged on sale proceeds
    #[serde(default = "default_fee_rate")]
    pub fee_rate: Decimal,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Port for the Prometheus exporter; disabled when absent
    pub metrics_port: Option<u16>,
}

fn default_base_url() -> String {
    BINANCE_API_URL.to_string()
}
fn default_interval() -> String {
    "1h".to_string()
}
fn default_lookback_hours() -> u64 {
    24 * 7
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_selling_timeframe_hours() -> u64 {
    24 * 7
}
fn default_asset() -> String {
    "BTC".to_string()
}
fn default_interval_secs() -> u64 {
    3600
}
fn default_true() -> bool {
    true
}
fn default_session_path() -> PathBuf {
    PathBuf::from("./session.json")
}
fn default_ledger_path() -> PathBuf {
    PathBuf::from("./paper_account.json")
}
fn default_fee_rate() -> Decimal {
    Decimal::new(1, 3) // 0.001 = 0.1%
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            asset: default_asset(),
            interval_secs: default_interval_secs(),
            force_sell_on_expiry: true,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            starting_balance: Decimal::ZERO,
            ledger_path: default_ledger_path(),
            fee_rate: default_fee_rate(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl MarketConfig {
    /// Candle feed configuration for this market
    pub fn feed_config(&self) -> BinanceConfig {
        BinanceConfig {
            base_url: self.base_url.clone(),
            symbol: self.symbol.clone(),
            interval: self.interval.clone(),
            lookback: chrono::Duration::hours(self.lookback_hours as i64),
            timeout: std::time::Duration::from_secs(self.request_timeout_secs),
        }
    }
}

impl DecisionConfig {
    pub fn selling_timeframe(&self) -> chrono::Duration {
        chrono::Duration::hours(self.selling_timeframe_hours as i64)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the poller cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.decision.selling_timeframe_hours == 0 {
            anyhow::bail!("decision.selling_timeframe_hours must be positive");
        }
        if self.market.lookback_hours == 0 {
            anyhow::bail!("market.lookback_hours must be positive");
        }
        self.market
            .feed_config()
            .candle_limit()
            .context("market.interval and market.lookback_hours")?;
        if self.poller.interval_secs == 0 {
            anyhow::bail!("poller.interval_secs must be positive");
        }
        if self.paper.starting_balance < Decimal::ZERO {
            anyhow::bail!("paper.starting_balance cannot be negative");
        }
        Ok(())
    }
}
