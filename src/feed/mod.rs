//! Price feed module
//!
//! Historical candles and spot quotes from Binance REST

mod binance;
mod types;

pub use binance::{BinanceConfig, BinanceKlines, BINANCE_API_URL};
pub use types::Candle;

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for spot price quote implementations
#[async_trait]
pub trait PriceQuote: Send + Sync {
    /// Latest traded price of the configured symbol
    async fn last_price(&self) -> anyhow::Result<Decimal>;
}
