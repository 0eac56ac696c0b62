//! Candle growth extraction and momentum segmentation

use super::MomentumPeriods;
use crate::feed::Candle;
use rust_decimal::Decimal;

/// Per-candle growth (close - open) with zero-growth candles dropped
pub fn candle_growths(candles: &[Candle]) -> Vec<Decimal> {
    candles
        .iter()
        .map(Candle::growth)
        .filter(|growth| !growth.is_zero())
        .collect()
}

/// Segment a chronological candle sequence into momentum periods
pub fn segment(candles: &[Candle]) -> (Vec<Decimal>, MomentumPeriods) {
    let growths = candle_growths(candles);
    let periods = MomentumPeriods::from_growths(&growths);
    (growths, periods)
}
