//! Momentum segmentation module
//!
//! Turns a candle sequence into alternating up/down momentum periods.
//! A period is the summed growth of consecutive same-direction candles.

mod segment;
mod types;

pub use segment::{candle_growths, segment};
pub use types::{MomentumDirection, MomentumPeriods};
