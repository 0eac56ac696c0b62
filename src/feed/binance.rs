//! Binance REST candle feed implementation

use super::{Candle, PriceQuote};
use crate::engine::CandleSource;
use crate::telemetry::{record_latency, LatencyMetric};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Binance REST base URL
pub const BINANCE_API_URL: &str = "https://api.binance.com";

/// Maximum rows Binance returns for a single klines request
const MAX_KLINES_LIMIT: u32 = 1000;

/// Configuration for the Binance candle feed
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// REST base URL
    pub base_url: String,
    /// Trading pair symbol (e.g., "BTCUSDT")
    pub symbol: String,
    /// Kline interval (e.g., "1h")
    pub interval: String,
    /// How far back to fetch candles
    pub lookback: Duration,
    /// Request timeout
    pub timeout: std::time::Duration,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: BINANCE_API_URL.to_string(),
            symbol: "BTCUSDT".to_string(),
            interval: "1h".to_string(),
            lookback: Duration::days(7),
            timeout: std::time::Duration::from_secs(10),
        }
    }
}

impl BinanceConfig {
    /// Length of one kline interval (`1s`, `15m`, `4h`, `1d`, `1w`, `1M`)
    pub fn interval_duration(&self) -> anyhow::Result<Duration> {
        let interval = self.interval.trim();
        let split = interval
            .find(|c: char| !c.is_ascii_digit())
            .with_context(|| format!("Kline interval has no unit: {interval:?}"))?;
        let (count, unit) = interval.split_at(split);
        let count: i64 = count
            .parse()
            .with_context(|| format!("Invalid kline interval: {interval:?}"))?;
        if count <= 0 {
            anyhow::bail!("Kline interval must be positive: {interval:?}");
        }

        let duration = match unit {
            "s" => Duration::seconds(count),
            "m" => Duration::minutes(count),
            "h" => Duration::hours(count),
            "d" => Duration::days(count),
            "w" => Duration::weeks(count),
            // Calendar months vary; 30 days only sizes the request
            "M" => Duration::days(30 * count),
            _ => anyhow::bail!("Unknown kline interval unit: {interval:?}"),
        };
        Ok(duration)
    }

    /// Number of klines covering the lookback window
    ///
    /// Fails when the window needs more rows than one request returns, since
    /// the newest candles would otherwise be cut off.
    pub fn candle_limit(&self) -> anyhow::Result<u32> {
        let interval_ms = self.interval_duration()?.num_milliseconds();
        let lookback_ms = self.lookback.num_milliseconds();
        if lookback_ms <= 0 {
            anyhow::bail!("Candle lookback must be positive");
        }

        let count = (lookback_ms + interval_ms - 1) / interval_ms;
        if count > i64::from(MAX_KLINES_LIMIT) {
            anyhow::bail!(
                "Lookback of {}h at interval {} needs {} klines, more than the {} one request returns",
                self.lookback.num_hours(),
                self.interval,
                count,
                MAX_KLINES_LIMIT
            );
        }
        Ok(count as u32)
    }
}

/// Leading columns of one kline row: `[open_time, open, high, low, close, volume, ...]`
///
/// Later columns (close time, quote volume, trade counts) are skipped, so rows
/// with extra columns still parse.
#[derive(Debug)]
struct KlineRow {
    open_time: i64,
    open: String,
    high: String,
    low: String,
    close: String,
    volume: String,
}

impl<'de> Deserialize<'de> for KlineRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = KlineRow;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a kline array with at least six columns")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<KlineRow, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let open_time = column(&mut seq, 0, &self)?;
                let open = column(&mut seq, 1, &self)?;
                let high = column(&mut seq, 2, &self)?;
                let low = column(&mut seq, 3, &self)?;
                let close = column(&mut seq, 4, &self)?;
                let volume = column(&mut seq, 5, &self)?;

                while seq.next_element::<IgnoredAny>()?.is_some() {}

                Ok(KlineRow {
                    open_time,
                    open,
                    high,
                    low,
                    close,
                    volume,
                })
            }
        }

        fn column<'de, A, T>(seq: &mut A, index: usize, row: &RowVisitor) -> Result<T, A::Error>
        where
            A: SeqAccess<'de>,
            T: Deserialize<'de>,
        {
            seq.next_element()?
                .ok_or_else(|| de::Error::invalid_length(index, row))
        }

        deserializer.deserialize_seq(RowVisitor)
    }
}

impl KlineRow {
    fn into_candle(self) -> anyhow::Result<Candle> {
        let open_time = Utc
            .timestamp_millis_opt(self.open_time)
            .single()
            .with_context(|| format!("Invalid kline open time: {}", self.open_time))?;

        Ok(Candle::new(
            open_time,
            parse_decimal(&self.open, "open")?,
            parse_decimal(&self.high, "high")?,
            parse_decimal(&self.low, "low")?,
            parse_decimal(&self.close, "close")?,
            parse_decimal(&self.volume, "volume")?,
        ))
    }
}

/// Binance ticker price response
#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

fn parse_decimal(value: &str, field: &str) -> anyhow::Result<Decimal> {
    Decimal::from_str(value).with_context(|| format!("Invalid kline {field}: {value:?}"))
}

/// Binance klines feed for a single symbol and interval
pub struct BinanceKlines {
    config: BinanceConfig,
    limit: u32,
    client: Client,
}

impl BinanceKlines {
    /// Create a feed with custom configuration
    pub fn with_config(config: BinanceConfig) -> anyhow::Result<Self> {
        let limit = config.candle_limit()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config: BinanceConfig {
                symbol: config.symbol.to_uppercase(),
                ..config
            },
            limit,
            client,
        })
    }

    /// Query parameters for the newest klines of the lookback window ending at `now`
    ///
    /// Binance counts `limit` back from `endTime`, so the last row is the
    /// candle open at `now`.
    fn klines_query(&self, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
        vec![
            ("symbol", self.config.symbol.clone()),
            ("interval", self.config.interval.clone()),
            ("endTime", now.timestamp_millis().to_string()),
            ("limit", self.limit.to_string()),
        ]
    }

    /// Parse a klines response body into chronologically ordered candles
    fn parse_klines(body: &str) -> anyhow::Result<Vec<Candle>> {
        let rows: Vec<KlineRow> =
            serde_json::from_str(body).context("Malformed klines response")?;
        rows.into_iter().map(KlineRow::into_candle).collect()
    }

    /// Fetch candles for the lookback window ending at `now`
    pub async fn fetch_until(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Candle>> {
        let url = format!("{}/api/v3/klines", self.config.base_url);
        let started = Instant::now();

        tracing::debug!(
            url = %url,
            symbol = %self.config.symbol,
            interval = %self.config.interval,
            "Fetching klines from Binance"
        );

        let response = self
            .client
            .get(&url)
            .query(&self.klines_query(now))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Binance API error: {} - {}", status, body);
        }

        let body = response.text().await?;
        let candles = Self::parse_klines(&body)?;
        record_latency(LatencyMetric::CandleFetch, started.elapsed());

        tracing::debug!(candle_count = candles.len(), "Fetched klines");
        Ok(candles)
    }
}

#[async_trait]
impl CandleSource for BinanceKlines {
    async fn fetch_candles(&self) -> anyhow::Result<Vec<Candle>> {
        self.fetch_until(Utc::now()).await
    }
}

#[async_trait]
impl PriceQuote for BinanceKlines {
    async fn last_price(&self) -> anyhow::Result<Decimal> {
        let url = format!("{}/api/v3/ticker/price", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", self.config.symbol.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Binance API error: {} - {}", status, body);
        }

        let ticker: TickerPrice = response.json().await?;
        Decimal::from_str(&ticker.price)
            .with_context(|| format!("Invalid ticker price: {:?}", ticker.price))
    }
}
