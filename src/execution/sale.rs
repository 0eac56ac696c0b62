//! Market sale of a fixed quantity, as seen by the decision engine

use super::{AccountClient, Fill, MarketSellOrder};
use crate::engine::SaleExecutor;
use crate::telemetry::{record_latency, record_sale, LatencyMetric};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// Sells a bound quantity of one asset at market when executed
pub struct MarketSell {
    account: Arc<dyn AccountClient>,
    order: MarketSellOrder,
    fill: Mutex<Option<Fill>>,
}

impl MarketSell {
    pub fn new(account: Arc<dyn AccountClient>, order: MarketSellOrder) -> Self {
        Self {
            account,
            order,
            fill: Mutex::new(None),
        }
    }

    /// The fill, once the sale has executed
    pub async fn fill(&self) -> Option<Fill> {
        self.fill.lock().await.clone()
    }
}

#[async_trait]
impl SaleExecutor for MarketSell {
    async fn execute_sale(&self) -> anyhow::Result<()> {
        let started = Instant::now();
        tracing::info!(
            asset = %self.order.asset,
            quantity = %self.order.quantity,
            "Submitting market sell"
        );

        let fill = self.account.market_sell(self.order.clone()).await?;
        record_latency(LatencyMetric::SaleExecution, started.elapsed());
        record_sale(&fill);

        tracing::info!(
            order_id = %fill.order_id,
            price = %fill.price,
            net_proceeds = %fill.net_proceeds(),
            "Market sell filled"
        );

        *self.fill.lock().await = Some(fill);
        Ok(())
    }
}
