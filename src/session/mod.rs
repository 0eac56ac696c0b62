//! Selling session persistence
//!
//! A selling session records the deadline by which an asset must be sold.
//! It is created the first time a free balance is seen, reused on every
//! later tick, and cleared once the balance is gone.

mod file;
mod memory;

pub use file::JsonFileSessionStore;
pub use memory::MemorySessionStore;

use crate::engine::DecisionParams;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An active selling window for one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellingSession {
    /// Asset being liquidated (e.g., "BTC")
    pub asset_id: String,
    /// Time by which the asset must be sold
    pub deadline: DateTime<Utc>,
    /// Length of the selling window in seconds
    pub timeframe_secs: i64,
}

impl SellingSession {
    /// Open a session whose deadline is `timeframe` after `now`
    pub fn start(asset_id: impl Into<String>, now: DateTime<Utc>, timeframe: Duration) -> Self {
        Self {
            asset_id: asset_id.into(),
            deadline: now + timeframe,
            timeframe_secs: timeframe.num_seconds(),
        }
    }

    pub fn timeframe(&self) -> Duration {
        Duration::seconds(self.timeframe_secs)
    }

    /// Time left until the deadline, negative once it has passed
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.deadline - now
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    /// Decision parameters for this session
    pub fn decision_params(&self, risk_tolerance: Decimal) -> DecisionParams {
        DecisionParams::new(risk_tolerance, self.deadline, self.timeframe())
    }
}

/// Trait for selling session storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the active session for an asset
    async fn load(&self, asset_id: &str) -> anyhow::Result<Option<SellingSession>>;
    /// Create or replace the session for its asset
    async fn save(&self, session: &SellingSession) -> anyhow::Result<()>;
    /// Remove the session for an asset; returns whether one existed
    async fn clear(&self, asset_id: &str) -> anyhow::Result<bool>;
}
