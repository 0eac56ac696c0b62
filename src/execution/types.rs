//! Execution types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order identifier
pub type OrderId = Uuid;

/// A market order selling a quantity of an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSellOrder {
    /// Asset being sold (e.g., "BTC")
    pub asset: String,
    /// Quantity of the asset
    pub quantity: Decimal,
}

impl MarketSellOrder {
    pub fn new(asset: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            asset: asset.into(),
            quantity,
        }
    }
}

/// A fill (executed sale)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    /// Order ID
    pub order_id: OrderId,
    /// Asset sold
    pub asset: String,
    /// Fill price in quote currency
    pub price: Decimal,
    /// Quantity sold
    pub quantity: Decimal,
    /// Fees paid in quote currency
    pub fees: Decimal,
    /// Fill timestamp
    pub timestamp: DateTime<Utc>,
}

impl Fill {
    /// Quote currency received after fees
    pub fn net_proceeds(&self) -> Decimal {
        self.price * self.quantity - self.fees
    }
}
