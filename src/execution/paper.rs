//! Paper trading account with simulated fills

use super::{AccountClient, Fill, MarketSellOrder, OrderId};
use crate::feed::PriceQuote;
use crate::persist;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Balances and fill history of a paper account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PaperLedger {
    balances: BTreeMap<String, Decimal>,
    fills: Vec<Fill>,
}

/// Paper account holding simulated balances
///
/// Sales fill immediately at the latest quote from `quote`. An account opened
/// from a ledger file writes every fill back to it, so balances survive a
/// restart.
pub struct PaperAccount {
    fee_rate: Decimal,
    quote: Arc<dyn PriceQuote>,
    ledger: RwLock<PaperLedger>,
    path: Option<PathBuf>,
}

impl PaperAccount {
    /// Create an empty in-memory paper account
    pub fn new(fee_rate: Decimal, quote: Arc<dyn PriceQuote>) -> Self {
        Self {
            fee_rate,
            quote,
            ledger: RwLock::new(PaperLedger::default()),
            path: None,
        }
    }

    /// Seed a starting balance
    pub fn with_balance(mut self, asset: impl Into<String>, amount: Decimal) -> Self {
        self.ledger.get_mut().balances.insert(asset.into(), amount);
        self
    }

    /// Open the account stored at `path`
    ///
    /// A missing ledger is created with `asset` seeded to `starting_balance`;
    /// an existing one is used as is.
    pub async fn open(
        path: impl Into<PathBuf>,
        fee_rate: Decimal,
        quote: Arc<dyn PriceQuote>,
        asset: &str,
        starting_balance: Decimal,
    ) -> anyhow::Result<Self> {
        let path = path.into();
        let ledger = match persist::read_json::<PaperLedger>(&path).await? {
            Some(ledger) => {
                tracing::debug!(
                    path = %path.display(),
                    fills = ledger.fills.len(),
                    "Paper ledger loaded"
                );
                ledger
            }
            None => {
                let mut ledger = PaperLedger::default();
                ledger.balances.insert(asset.to_string(), starting_balance);
                persist::write_json(&path, &ledger).await?;
                tracing::info!(
                    path = %path.display(),
                    asset,
                    balance = %starting_balance,
                    "Paper ledger created"
                );
                ledger
            }
        };

        Ok(Self {
            fee_rate,
            quote,
            ledger: RwLock::new(ledger),
            path: Some(path),
        })
    }

    fn ledger_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[async_trait]
impl AccountClient for PaperAccount {
    async fn free_balance(&self, asset: &str) -> anyhow::Result<Decimal> {
        let ledger = self.ledger.read().await;
        Ok(ledger.balances.get(asset).copied().unwrap_or_default())
    }

    async fn market_sell(&self, order: MarketSellOrder) -> anyhow::Result<Fill> {
        if order.quantity <= Decimal::ZERO {
            anyhow::bail!("Sell quantity must be positive: {}", order.quantity);
        }

        let price = self.quote.last_price().await?;

        let mut ledger = self.ledger.write().await;
        let free = ledger.balances.get(&order.asset).copied().unwrap_or_default();
        if free < order.quantity {
            anyhow::bail!(
                "Insufficient {} balance: have {}, need {}",
                order.asset,
                free,
                order.quantity
            );
        }

        let order_id = OrderId::new_v4();
        let fill = Fill {
            order_id,
            asset: order.asset.clone(),
            price,
            quantity: order.quantity,
            fees: order.quantity * price * self.fee_rate,
            timestamp: Utc::now(),
        };

        // Commit in memory only once the ledger file accepted the sale
        let mut next = ledger.clone();
        next.balances.insert(order.asset, free - order.quantity);
        next.fills.push(fill.clone());
        if let Some(path) = self.ledger_path() {
            persist::write_json(path, &next).await?;
        }
        *ledger = next;

        tracing::info!(
            ?order_id,
            price = %fill.price,
            quantity = %fill.quantity,
            "Paper sell filled"
        );
        Ok(fill)
    }
}
