//! Poller types

use crate::config::Config;
use crate::engine::HoldReason;
use crate::execution::Fill;
use chrono::Duration;
use rust_decimal::Decimal;

/// Settings for one polled asset
#[derive(Debug, Clone)]
pub struct PollerSettings {
    /// Asset to liquidate
    pub asset: String,
    pub risk_tolerance: Decimal,
    /// Selling window opened when a balance first appears
    pub selling_timeframe: Duration,
    /// Time between ticks
    pub interval: std::time::Duration,
    /// Sell unconditionally once the deadline has passed
    pub force_sell_on_expiry: bool,
}

impl PollerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            asset: config.poller.asset.clone(),
            risk_tolerance: config.decision.risk_tolerance,
            selling_timeframe: config.decision.selling_timeframe(),
            interval: std::time::Duration::from_secs(config.poller.interval_secs),
            force_sell_on_expiry: config.poller.force_sell_on_expiry,
        }
    }
}

/// Result of a single poller tick
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// No free balance to sell
    Idle,
    /// The engine decided to keep holding
    Held(HoldReason),
    /// The engine sold after a momentum peak
    Sold(Option<Fill>),
    /// The deadline passed and the balance was sold unconditionally
    ForcedSale(Option<Fill>),
    /// The deadline passed and the session was closed without selling
    Expired,
}

impl PartialEq for TickOutcome {
    /// Fills carry fresh ids and timestamps, so only the variant and hold reason compare
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TickOutcome::Idle, TickOutcome::Idle) => true,
            (TickOutcome::Held(a), TickOutcome::Held(b)) => a == b,
            (TickOutcome::Sold(_), TickOutcome::Sold(_)) => true,
            (TickOutcome::ForcedSale(_), TickOutcome::ForcedSale(_)) => true,
            (TickOutcome::Expired, TickOutcome::Expired) => true,
            _ => false,
        }
    }
}
