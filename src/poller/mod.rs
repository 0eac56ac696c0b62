//! Balance poller
//!
//! Periodically checks the free balance of one asset and, while a balance
//! is held, keeps asking the decision engine whether to sell before the
//! session deadline.

mod types;

pub use types::{PollerSettings, TickOutcome};

use crate::engine::{CandleSource, Decision, DecisionEngine, SaleExecutor, TracingObserver};
use crate::execution::{AccountClient, MarketSell, MarketSellOrder};
use crate::session::{SellingSession, SessionStore};
use crate::telemetry::{self, GaugeMetric, LatencyMetric};
use anyhow::Context;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::MissedTickBehavior;

/// Drives the decision engine for a single asset
pub struct Poller {
    settings: PollerSettings,
    account: Arc<dyn AccountClient>,
    candles: Arc<dyn CandleSource>,
    sessions: Arc<dyn SessionStore>,
    engine: DecisionEngine<TracingObserver>,
}

impl Poller {
    pub fn new(
        settings: PollerSettings,
        account: Arc<dyn AccountClient>,
        candles: Arc<dyn CandleSource>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            settings,
            account,
            candles,
            sessions,
            engine: DecisionEngine::with_observer(TracingObserver),
        }
    }

    /// Run one check against the current wall clock
    pub async fn tick(&self) -> anyhow::Result<TickOutcome> {
        self.tick_at(Utc::now()).await
    }

    /// Run one check at `now`
    pub async fn tick_at(&self, now: DateTime<Utc>) -> anyhow::Result<TickOutcome> {
        let started = Instant::now();
        let outcome = self.check(now).await;
        telemetry::record_latency(LatencyMetric::Tick, started.elapsed());
        outcome
    }

    async fn check(&self, now: DateTime<Utc>) -> anyhow::Result<TickOutcome> {
        let asset = self.settings.asset.as_str();
        let free = self
            .account
            .free_balance(asset)
            .await
            .context("Failed to fetch free balance")?;
        telemetry::set_decimal_gauge(GaugeMetric::FreeBalance, free);

        if free <= Decimal::ZERO {
            if self.sessions.clear(asset).await? {
                tracing::info!(asset, "Balance liquidated, selling session closed");
            }
            return Ok(TickOutcome::Idle);
        }

        let session = self.load_or_start_session(now).await?;
        let remaining = session.remaining(now);
        telemetry::set_gauge(GaugeMetric::SecondsToDeadline, remaining.num_seconds() as f64);

        let sale = MarketSell::new(self.account.clone(), MarketSellOrder::new(asset, free));

        if session.is_expired(now) {
            return self.handle_expired(&session, &sale).await;
        }

        let params = session.decision_params(self.settings.risk_tolerance);
        let decision = self
            .engine
            .decide_at(now, &params, self.candles.as_ref(), &sale)
            .await?;
        telemetry::record_decision(&decision);

        match decision {
            Decision::Sell(assessment) => {
                tracing::info!(
                    asset,
                    quantity = %free,
                    growth_strength = %assessment.growth_strength,
                    threshold = %assessment.threshold,
                    "Sold after momentum peak"
                );
                Ok(TickOutcome::Sold(sale.fill().await))
            }
            Decision::Hold(reason) => {
                tracing::info!(
                    asset,
                    quantity = %free,
                    reason = reason.label(),
                    remaining_hours = remaining.num_hours(),
                    "Holding"
                );
                Ok(TickOutcome::Held(reason))
            }
        }
    }

    async fn load_or_start_session(&self, now: DateTime<Utc>) -> anyhow::Result<SellingSession> {
        let asset = self.settings.asset.as_str();
        if let Some(session) = self.sessions.load(asset).await? {
            return Ok(session);
        }

        let session = SellingSession::start(asset, now, self.settings.selling_timeframe);
        self.sessions
            .save(&session)
            .await
            .context("Failed to persist selling session")?;
        tracing::info!(
            asset,
            deadline = %session.deadline,
            "Free balance found, selling session opened"
        );
        Ok(session)
    }

    async fn handle_expired(
        &self,
        session: &SellingSession,
        sale: &MarketSell,
    ) -> anyhow::Result<TickOutcome> {
        if self.settings.force_sell_on_expiry {
            tracing::warn!(
                asset = %session.asset_id,
                deadline = %session.deadline,
                "Selling deadline passed, forcing sale"
            );
            sale.execute_sale().await?;
            return Ok(TickOutcome::ForcedSale(sale.fill().await));
        }

        tracing::warn!(
            asset = %session.asset_id,
            deadline = %session.deadline,
            "Selling deadline passed without a sale, closing session"
        );
        self.sessions.clear(&session.asset_id).await?;
        Ok(TickOutcome::Expired)
    }

    /// Tick on the configured interval until `shutdown` resolves
    ///
    /// A failed tick is logged and the next tick proceeds normally.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
        let mut interval = tokio::time::interval(self.settings.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        tracing::info!(
            asset = %self.settings.asset,
            interval_secs = self.settings.interval.as_secs(),
            "Poller started"
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping poller");
                    return Ok(());
                }
                _ = interval.tick() => {
                    match self.tick().await {
                        Ok(outcome) => tracing::debug!(?outcome, "Tick complete"),
                        Err(e) => tracing::error!(error = %e, "Tick failed"),
                    }
                }
            }
        }
    }
}
