//! Optional reporting of intermediate decision values

use super::{Decision, RiskAssessment};
use rust_decimal::Decimal;

/// Receives intermediate values of a decision
///
/// Observers are informed only; they cannot influence the outcome.
pub trait DecisionObserver: Send + Sync {
    fn on_growths(&self, _growths: &[Decimal]) {}
    fn on_periods(&self, _periods: &[Decimal]) {}
    fn on_assessment(&self, _assessment: &RiskAssessment) {}
    fn on_decision(&self, _decision: &Decision) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DecisionObserver for NoopObserver {}

/// Observer that emits debug-level tracing events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DecisionObserver for TracingObserver {
    fn on_growths(&self, growths: &[Decimal]) {
        tracing::debug!(count = growths.len(), growths = ?growths, "Candle growths");
    }

    fn on_periods(&self, periods: &[Decimal]) {
        tracing::debug!(count = periods.len(), periods = ?periods, "Momentum periods");
    }

    fn on_assessment(&self, assessment: &RiskAssessment) {
        tracing::debug!(
            last_period = %assessment.last_period,
            current_period = %assessment.current_period,
            best_period = %assessment.best_period,
            growth_strength = %assessment.growth_strength,
            time_pressure = %assessment.time_pressure,
            threshold = %assessment.threshold,
            "Risk assessment"
        );
    }

    fn on_decision(&self, decision: &Decision) {
        tracing::debug!(decision = decision.label(), "Decision reached");
    }
}
