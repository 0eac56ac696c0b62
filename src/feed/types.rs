//! Candle feed types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One sampling interval of price activity
///
/// Only `open` and `close` drive the sell decision; the remaining fields
/// are carried so the record matches what exchanges return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Interval start time
    pub open_time: DateTime<Utc>,
    /// Price at interval start
    pub open: Decimal,
    /// Highest traded price
    pub high: Decimal,
    /// Lowest traded price
    pub low: Decimal,
    /// Price at interval end
    pub close: Decimal,
    /// Traded base volume
    pub volume: Decimal,
}

impl Candle {
    /// Create a candle from all OHLCV fields
    pub fn new(
        open_time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Create a candle from open and close only, with high/low spanning the body
    pub fn from_open_close(open_time: DateTime<Utc>, open: Decimal, close: Decimal) -> Self {
        Self {
            open_time,
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume: Decimal::ZERO,
        }
    }

    /// Signed price change over the interval (close - open)
    pub fn growth(&self) -> Decimal {
        self.close - self.open
    }
}
