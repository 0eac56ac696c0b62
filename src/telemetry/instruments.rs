//! Prometheus metric instruments

use crate::engine::Decision;
use crate::execution::Fill;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Candle fetch from the exchange
    CandleFetch,
    /// Market sale submission until fill
    SaleExecution,
    /// One full poller tick
    Tick,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Free balance of the watched asset
    FreeBalance,
    /// Seconds until the selling deadline
    SecondsToDeadline,
    /// Last computed growth strength
    GrowthStrength,
    /// Last computed time pressure
    TimePressure,
}

impl LatencyMetric {
    fn name(self) -> &'static str {
        match self {
            LatencyMetric::CandleFetch => "momentum_exit_candle_fetch_latency_ms",
            LatencyMetric::SaleExecution => "momentum_exit_sale_execution_latency_ms",
            LatencyMetric::Tick => "momentum_exit_tick_latency_ms",
        }
    }
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::FreeBalance => "momentum_exit_free_balance",
            GaugeMetric::SecondsToDeadline => "momentum_exit_seconds_to_deadline",
            GaugeMetric::GrowthStrength => "momentum_exit_growth_strength",
            GaugeMetric::TimePressure => "momentum_exit_time_pressure",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = metric.name();
    metrics::histogram!(metric_name).record(duration.as_secs_f64() * 1000.0);
    tracing::trace!(
        metric = metric_name,
        value_ms = duration.as_millis(),
        "Recording latency"
    );
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    metrics::gauge!(metric.name()).set(value);
}

/// Set a gauge from a decimal value
pub fn set_decimal_gauge(metric: GaugeMetric, value: Decimal) {
    if let Some(value) = value.to_f64() {
        set_gauge(metric, value);
    }
}

/// Count a decision by outcome and export its measurements
pub fn record_decision(decision: &Decision) {
    metrics::counter!("momentum_exit_decisions_total", "outcome" => decision.label())
        .increment(1);

    if let Some(assessment) = decision.assessment() {
        set_decimal_gauge(GaugeMetric::GrowthStrength, assessment.growth_strength);
        set_decimal_gauge(GaugeMetric::TimePressure, assessment.time_pressure);
    }
}

/// Count an executed sale
pub fn record_sale(fill: &Fill) {
    metrics::counter!("momentum_exit_sales_total", "asset" => fill.asset.clone()).increment(1);
}
