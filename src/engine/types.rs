//! Decision engine types

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Decision engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// The candle source returned no candles
    #[error("No candle data available")]
    NoDataAvailable,
    /// Parameters that make the risk arithmetic undefined
    #[error("Degenerate decision parameters: {0}")]
    DegenerateParameters(String),
    /// Candle fetch or sale execution failed
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

/// Parameters supplied with every decision
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionParams {
    /// Nominally 0 to 1: 1 holds through declines, 0 sells at the first decline.
    /// Values outside the range are accepted.
    pub risk_tolerance: Decimal,
    /// Absolute time by which the asset must be sold
    pub selling_deadline: DateTime<Utc>,
    /// Total duration originally budgeted for the sale
    pub selling_timeframe: Duration,
}

impl DecisionParams {
    pub fn new(
        risk_tolerance: Decimal,
        selling_deadline: DateTime<Utc>,
        selling_timeframe: Duration,
    ) -> Self {
        Self {
            risk_tolerance,
            selling_deadline,
            selling_timeframe,
        }
    }

    /// Reject a selling timeframe that cannot normalize time pressure
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.selling_timeframe.num_milliseconds() <= 0 {
            return Err(EngineError::DegenerateParameters(format!(
                "selling timeframe must be positive, got {}ms",
                self.selling_timeframe.num_milliseconds()
            )));
        }
        Ok(())
    }

    /// Fraction of the selling window remaining at `now`
    ///
    /// 1 at the start of the window, 0 at the deadline, negative after it.
    pub fn time_pressure(&self, now: DateTime<Utc>) -> Result<Decimal, EngineError> {
        self.validate()?;
        let remaining = (self.selling_deadline - now).num_milliseconds();
        Ok(Decimal::from(remaining) / Decimal::from(self.selling_timeframe.num_milliseconds()))
    }
}

/// Measurements behind a sell-or-hold comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// The completed growth run just before the current decline
    pub last_period: Decimal,
    /// The current, still open, decline
    pub current_period: Decimal,
    /// Largest period in the window
    pub best_period: Decimal,
    /// last_period / best_period
    pub growth_strength: Decimal,
    /// Remaining fraction of the selling window
    pub time_pressure: Decimal,
    /// risk_tolerance * time_pressure
    pub threshold: Decimal,
}

impl RiskAssessment {
    pub fn should_sell(&self) -> bool {
        self.growth_strength > self.threshold
    }
}

/// Why the engine did not sell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HoldReason {
    /// Every candle had zero growth
    NoMomentum,
    /// The current period is still a growth period
    StillGrowing,
    /// Price is declining without a preceding growth run
    NoPriorRally,
    /// The preceding rally was too weak for the remaining time and tolerance
    BelowThreshold(RiskAssessment),
}

impl HoldReason {
    pub fn label(&self) -> &'static str {
        match self {
            HoldReason::NoMomentum => "hold_no_momentum",
            HoldReason::StillGrowing => "hold_still_growing",
            HoldReason::NoPriorRally => "hold_no_prior_rally",
            HoldReason::BelowThreshold(_) => "hold_below_threshold",
        }
    }
}

/// Outcome of one decision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Decision {
    /// Sell now; the sale has been executed
    Sell(RiskAssessment),
    /// Keep holding
    Hold(HoldReason),
}

impl Decision {
    pub fn is_sell(&self) -> bool {
        matches!(self, Decision::Sell(_))
    }

    /// The assessment, when the firing condition was reached
    pub fn assessment(&self) -> Option<&RiskAssessment> {
        match self {
            Decision::Sell(assessment) => Some(assessment),
            Decision::Hold(HoldReason::BelowThreshold(assessment)) => Some(assessment),
            Decision::Hold(_) => None,
        }
    }

    /// Short label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Sell(_) => "sell",
            Decision::Hold(reason) => reason.label(),
        }
    }
}
