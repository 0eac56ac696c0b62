//! Decision engine scenarios and properties

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use momentum_exit::engine::{
    evaluate, CandleSource, Decision, DecisionEngine, DecisionParams, EngineError, HoldReason,
    SaleExecutor,
};
use momentum_exit::feed::Candle;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};

const ONE_DAY: i64 = 1;
const ONE_WEEK: i64 = 7;

const SIMPLE: &[(i64, i64)] = &[(60, 125), (125, 230), (230, 215)];

const EXTENDED: &[(i64, i64)] = &[
    (60, 125),
    (125, 230),
    (230, 215),
    (215, 250),
    (220, 219),
];

const COMPLEX: &[(i64, i64)] = &[
    (60, 125),
    (125, 230),
    (230, 215),
    (215, 250),
    (220, 219),
    (219, 270),
    (270, 280),
    (280, 233),
    (233, 330),
    (350, 320),
];

fn candles(bodies: &[(i64, i64)]) -> Vec<Candle> {
    let start = Utc::now() - Duration::hours(bodies.len() as i64);
    bodies
        .iter()
        .enumerate()
        .map(|(i, &(open, close))| {
            Candle::from_open_close(
                start + Duration::hours(i as i64),
                Decimal::from(open),
                Decimal::from(close),
            )
        })
        .collect()
}

struct Source(Vec<Candle>);

#[async_trait]
impl CandleSource for Source {
    async fn fetch_candles(&self) -> anyhow::Result<Vec<Candle>> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
struct Sale(AtomicUsize);

#[async_trait]
impl SaleExecutor for Sale {
    async fn execute_sale(&self) -> anyhow::Result<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Runs the engine and returns how many times the sale executed
async fn sales(
    bodies: &[(i64, i64)],
    risk: Decimal,
    days_left: i64,
    now: DateTime<Utc>,
) -> usize {
    let params = DecisionParams::new(
        risk,
        now + Duration::days(days_left),
        Duration::days(ONE_WEEK),
    );
    let sale = Sale::default();
    DecisionEngine::new()
        .decide_at(now, &params, &Source(candles(bodies)), &sale)
        .await
        .unwrap();
    sale.0.load(Ordering::SeqCst)
}

#[tokio::test]
async fn sells_when_price_starts_to_decline() {
    assert_eq!(sales(SIMPLE, dec!(0.5), ONE_WEEK, Utc::now()).await, 1);
}

#[tokio::test]
async fn holds_while_in_growth_period() {
    let mut bodies = SIMPLE.to_vec();
    bodies.push((215, 220));
    assert_eq!(sales(&bodies, dec!(0.5), ONE_WEEK, Utc::now()).await, 0);
}

#[tokio::test]
async fn holds_when_last_rally_was_weak() {
    assert_eq!(sales(EXTENDED, dec!(0.5), ONE_WEEK, Utc::now()).await, 0);
}

#[tokio::test]
async fn sells_weak_rally_with_low_risk_tolerance() {
    assert_eq!(sales(EXTENDED, dec!(0.2), ONE_WEEK, Utc::now()).await, 1);
}

#[tokio::test]
async fn sells_weak_rally_under_time_pressure() {
    assert_eq!(sales(EXTENDED, dec!(0.5), 2 * ONE_DAY, Utc::now()).await, 1);
}

#[tokio::test]
async fn sells_complex_history_near_deadline() {
    assert_eq!(sales(COMPLEX, dec!(0.5), 2 * ONE_DAY, Utc::now()).await, 1);
}

#[tokio::test]
async fn holds_complex_history_with_high_tolerance_and_time() {
    assert_eq!(sales(COMPLEX, dec!(0.9), 5 * ONE_DAY, Utc::now()).await, 0);
}

#[tokio::test]
async fn never_sells_without_momentum() {
    let now = Utc::now();
    let flat = &[(100, 100), (250, 250), (7, 7)];
    for risk in [dec!(-1), dec!(0), dec!(0.5), dec!(1)] {
        for days in [-3, 0, 2, 7] {
            assert_eq!(sales(flat, risk, days, now).await, 0);
        }
    }
}

#[tokio::test]
async fn empty_candles_fail_without_selling() {
    let now = Utc::now();
    let params = DecisionParams::new(dec!(0.5), now + Duration::weeks(1), Duration::weeks(1));
    let sale = Sale::default();

    let result = DecisionEngine::new()
        .decide_at(now, &params, &Source(vec![]), &sale)
        .await;

    assert!(matches!(result, Err(EngineError::NoDataAvailable)));
    assert_eq!(sale.0.load(Ordering::SeqCst), 0);
}

#[test]
fn scenario_periods_match_expected_segmentation() {
    let now = Utc::now();
    let params = DecisionParams::new(dec!(0.5), now + Duration::weeks(1), Duration::weeks(1));

    let eval = evaluate(&candles(COMPLEX), &params, now).unwrap();
    assert_eq!(
        eval.periods.as_slice(),
        &[
            dec!(170),
            dec!(-15),
            dec!(35),
            dec!(-1),
            dec!(61),
            dec!(-47),
            dec!(97),
            dec!(-30)
        ]
    );
}

#[test]
fn lowering_risk_tolerance_never_stops_a_sale() {
    let now = Utc::now();
    let input = candles(EXTENDED);
    let mut sold_before = false;

    // Descending tolerance: once selling starts it must continue
    for step in (0..=20).rev() {
        let risk = Decimal::from(step) / dec!(20);
        let params = DecisionParams::new(risk, now + Duration::days(4), Duration::weeks(1));
        let sold = evaluate(&input, &params, now).unwrap().decision.is_sell();
        assert!(sold || !sold_before, "sale stopped at risk {risk}");
        sold_before = sold;
    }
    assert!(sold_before);
}

#[test]
fn approaching_deadline_never_stops_a_sale() {
    let now = Utc::now();
    let input = candles(EXTENDED);
    let mut sold_before = false;

    for hours_left in (0..=168).rev().step_by(6) {
        let params = DecisionParams::new(
            dec!(0.5),
            now + Duration::hours(hours_left),
            Duration::weeks(1),
        );
        let sold = evaluate(&input, &params, now).unwrap().decision.is_sell();
        assert!(sold || !sold_before, "sale stopped at {hours_left}h left");
        sold_before = sold;
    }
    assert!(sold_before);
}

#[test]
fn firing_condition_matches_formula() {
    let now = Utc::now();
    let params = DecisionParams::new(dec!(0.5), now + Duration::days(2), Duration::weeks(1));

    let eval = evaluate(&candles(COMPLEX), &params, now).unwrap();
    let Decision::Sell(assessment) = eval.decision else {
        panic!("expected sale");
    };

    assert_eq!(assessment.last_period, dec!(97));
    assert_eq!(assessment.current_period, dec!(-30));
    assert_eq!(assessment.best_period, dec!(170));
    assert_eq!(assessment.growth_strength, dec!(97) / dec!(170));
    assert!((assessment.time_pressure - dec!(2) / dec!(7)).abs() < dec!(0.000001));
    assert!(assessment.growth_strength > dec!(0.5) * assessment.time_pressure);
}

#[tokio::test]
async fn repeated_calls_are_idempotent() {
    let now = Utc::now();
    let params = DecisionParams::new(dec!(0.5), now + Duration::days(3), Duration::weeks(1));
    let source = Source(candles(COMPLEX));
    let engine = DecisionEngine::new();

    let first = engine
        .decide_at(now, &params, &source, &Sale::default())
        .await
        .unwrap();
    let second = engine
        .decide_at(now, &params, &source, &Sale::default())
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn hold_reasons_are_distinguished() {
    let now = Utc::now();
    let params = DecisionParams::new(dec!(0.5), now + Duration::weeks(1), Duration::weeks(1));
    let engine = DecisionEngine::new();

    let decision = engine
        .decide_at(now, &params, &Source(candles(&[(10, 5)])), &Sale::default())
        .await
        .unwrap();
    assert_eq!(decision, Decision::Hold(HoldReason::NoPriorRally));

    let decision = engine
        .decide_at(now, &params, &Source(candles(&[(5, 10)])), &Sale::default())
        .await
        .unwrap();
    assert_eq!(decision, Decision::Hold(HoldReason::StillGrowing));
}
