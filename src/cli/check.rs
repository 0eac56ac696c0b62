//! Check command implementation

use super::build_poller;
use crate::config::Config;
use crate::engine::{Decision, DecisionEngine, HoldReason, SaleExecutor, TracingObserver};
use crate::feed::BinanceKlines;
use crate::poller::TickOutcome;
use crate::session::{JsonFileSessionStore, SellingSession, SessionStore};
use async_trait::async_trait;
use chrono::Utc;
use clap::Args;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Evaluate without selling or touching the stored session
    #[arg(long)]
    pub dry_run: bool,
}

/// Sale executor that only logs
struct DryRunSale;

#[async_trait]
impl SaleExecutor for DryRunSale {
    async fn execute_sale(&self) -> anyhow::Result<()> {
        tracing::info!("Dry run: sale skipped");
        Ok(())
    }
}

impl CheckArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        if self.dry_run {
            return self.dry_run(config).await;
        }

        let outcome = build_poller(config).await?.tick().await?;
        match outcome {
            TickOutcome::Idle => println!("No free {} balance", config.poller.asset),
            TickOutcome::Held(reason) => print_hold(&reason),
            TickOutcome::Sold(fill) | TickOutcome::ForcedSale(fill) => match fill {
                Some(fill) => println!(
                    "SOLD {} {} @ {} (fees {})",
                    fill.quantity, fill.asset, fill.price, fill.fees
                ),
                None => println!("SOLD"),
            },
            TickOutcome::Expired => println!("Deadline passed, session closed without selling"),
        }
        Ok(())
    }

    async fn dry_run(&self, config: &Config) -> anyhow::Result<()> {
        let now = Utc::now();
        let asset = config.poller.asset.as_str();
        let feed = BinanceKlines::with_config(config.market.feed_config())?;
        let sessions = JsonFileSessionStore::new(config.session.path.clone());

        let session = match sessions.load(asset).await? {
            Some(session) => session,
            None => SellingSession::start(asset, now, config.decision.selling_timeframe()),
        };
        let params = session.decision_params(config.decision.risk_tolerance);

        let decision = DecisionEngine::with_observer(TracingObserver)
            .decide_at(now, &params, &feed, &DryRunSale)
            .await?;

        println!("Deadline: {}", session.deadline);
        match decision {
            Decision::Sell(assessment) => {
                println!(
                    "Would SELL: growth strength {} > threshold {}",
                    assessment.growth_strength.round_dp(4),
                    assessment.threshold.round_dp(4)
                );
            }
            Decision::Hold(reason) => print_hold(&reason),
        }
        Ok(())
    }
}

fn print_hold(reason: &HoldReason) {
    match reason {
        HoldReason::NoMomentum => println!("HOLD: no price movement in the window"),
        HoldReason::StillGrowing => println!("HOLD: price is still rising"),
        HoldReason::NoPriorRally => println!("HOLD: declining without a preceding rally"),
        HoldReason::BelowThreshold(assessment) => println!(
            "HOLD: growth strength {} <= threshold {}",
            assessment.growth_strength.round_dp(4),
            assessment.threshold.round_dp(4)
        ),
    }
}
