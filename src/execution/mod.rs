//! Execution module
//!
//! Account balances and market-sell execution (paper mode)

mod paper;
mod sale;
mod types;

pub use paper::PaperAccount;
pub use sale::MarketSell;
pub use types::{Fill, MarketSellOrder, OrderId};

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for trading account implementations
#[async_trait]
pub trait AccountClient: Send + Sync {
    /// Free (unlocked) balance of an asset
    async fn free_balance(&self, asset: &str) -> anyhow::Result<Decimal>;
    /// Submit a market sell order and wait for its fill
    async fn market_sell(&self, order: MarketSellOrder) -> anyhow::Result<Fill>;
}
