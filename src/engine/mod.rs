//! Momentum segmentation decision engine
//!
//! Decides whether to sell a held asset right after a momentum peak. The
//! engine is stateless: the deadline and timeframe arrive with every call
//! and the only effects are the two collaborator calls below.

mod evaluator;
mod observer;
mod types;

pub use evaluator::{evaluate, Evaluation};
pub use observer::{DecisionObserver, NoopObserver, TracingObserver};
pub use types::{Decision, DecisionParams, EngineError, HoldReason, RiskAssessment};

use crate::feed::Candle;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for historical candle sources
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Fetch candles in chronological order
    async fn fetch_candles(&self) -> anyhow::Result<Vec<Candle>>;
}

/// Trait for sale execution implementations
#[async_trait]
pub trait SaleExecutor: Send + Sync {
    /// Liquidate the held position
    async fn execute_sale(&self) -> anyhow::Result<()>;
}

/// Runs fetch, evaluation and the optional sale in order
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine<O = NoopObserver> {
    observer: O,
}

impl DecisionEngine {
    /// Create an engine that reports nothing
    pub fn new() -> Self {
        Self {
            observer: NoopObserver,
        }
    }
}

impl<O: DecisionObserver> DecisionEngine<O> {
    /// Create an engine reporting intermediate values to `observer`
    pub fn with_observer(observer: O) -> Self {
        Self { observer }
    }

    /// Decide against the current wall clock
    pub async fn decide(
        &self,
        params: &DecisionParams,
        candles: &dyn CandleSource,
        executor: &dyn SaleExecutor,
    ) -> Result<Decision, EngineError> {
        self.decide_at(Utc::now(), params, candles, executor).await
    }

    /// Fetch candles once, evaluate at `now`, and execute the sale at most once
    pub async fn decide_at(
        &self,
        now: DateTime<Utc>,
        params: &DecisionParams,
        candles: &dyn CandleSource,
        executor: &dyn SaleExecutor,
    ) -> Result<Decision, EngineError> {
        params.validate()?;

        let candles = candles.fetch_candles().await?;
        let evaluation = evaluate(&candles, params, now)?;
        self.report(&evaluation);

        if evaluation.decision.is_sell() {
            executor.execute_sale().await?;
        }

        Ok(evaluation.decision)
    }

    fn report(&self, evaluation: &Evaluation) {
        self.observer.on_growths(&evaluation.growths);
        self.observer.on_periods(evaluation.periods.as_slice());
        if let Some(assessment) = evaluation.decision.assessment() {
            self.observer.on_assessment(assessment);
        }
        self.observer.on_decision(&evaluation.decision);
    }
}

/// Decide once with a non-reporting engine
pub async fn decide(
    params: &DecisionParams,
    candles: &dyn CandleSource,
    executor: &dyn SaleExecutor,
) -> Result<Decision, EngineError> {
    DecisionEngine::new().decide(params, candles, executor).await
}
