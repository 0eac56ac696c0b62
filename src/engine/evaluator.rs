//! Effect-free sell-or-hold evaluation

use super::{Decision, DecisionParams, EngineError, HoldReason, RiskAssessment};
use crate::feed::Candle;
use crate::momentum::{segment, MomentumPeriods};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Everything computed for one decision
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Nonzero candle growths, in candle order
    pub growths: Vec<Decimal>,
    /// Momentum periods folded from the growths
    pub periods: MomentumPeriods,
    pub decision: Decision,
}

/// Decide whether to sell given chronologically ordered candles
///
/// Only a decline that directly follows a growth run can trigger a sale.
/// The sale fires when the strength of that run, relative to the best
/// period in the window, exceeds `risk_tolerance * time_pressure`.
pub fn evaluate(
    candles: &[Candle],
    params: &DecisionParams,
    now: DateTime<Utc>,
) -> Result<Evaluation, EngineError> {
    params.validate()?;
    if candles.is_empty() {
        return Err(EngineError::NoDataAvailable);
    }

    let (growths, periods) = segment(candles);
    let decision = decide_on_periods(&periods, params, now)?;

    Ok(Evaluation {
        growths,
        periods,
        decision,
    })
}

fn decide_on_periods(
    periods: &MomentumPeriods,
    params: &DecisionParams,
    now: DateTime<Utc>,
) -> Result<Decision, EngineError> {
    let (Some(current_period), Some(best_period)) = (periods.current(), periods.best()) else {
        return Ok(Decision::Hold(HoldReason::NoMomentum));
    };

    if current_period > Decimal::ZERO {
        return Ok(Decision::Hold(HoldReason::StillGrowing));
    }

    let last_period = match periods.last_completed() {
        Some(last) if last > Decimal::ZERO => last,
        _ => return Ok(Decision::Hold(HoldReason::NoPriorRally)),
    };

    if best_period.is_zero() {
        return Err(EngineError::DegenerateParameters(
            "best momentum period is zero".to_string(),
        ));
    }

    let growth_strength = last_period / best_period;
    let time_pressure = params.time_pressure(now)?;
    let assessment = RiskAssessment {
        last_period,
        current_period,
        best_period,
        growth_strength,
        time_pressure,
        threshold: saturating_mul(params.risk_tolerance, time_pressure),
    };

    if assessment.should_sell() {
        Ok(Decision::Sell(assessment))
    } else {
        Ok(Decision::Hold(HoldReason::BelowThreshold(assessment)))
    }
}

/// Product clamped to the representable range; an unbounded threshold compares like infinity
fn saturating_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(if a.is_sign_negative() == b.is_sign_negative() {
        Decimal::MAX
    } else {
        Decimal::MIN
    })
}
