//! Momentum period types

use rust_decimal::Decimal;

/// Direction of a growth value or momentum period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumDirection {
    /// Price moved up
    Up,
    /// Price moved down
    Down,
}

impl MomentumDirection {
    /// Direction of a signed value, `None` for zero
    pub fn of(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self::Up)
        } else if value < Decimal::ZERO {
            Some(Self::Down)
        } else {
            None
        }
    }
}

/// Alternating sequence of summed same-direction growth runs
///
/// Adjacent periods always have opposite signs and no period is zero.
/// The last period may still be accumulating.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MomentumPeriods {
    periods: Vec<Decimal>,
}

impl MomentumPeriods {
    /// Fold growth values into momentum periods
    ///
    /// A value with the same direction as the running period is added to it;
    /// a value with the opposite direction opens a new period. Zero values
    /// carry no direction and are skipped without breaking the run.
    pub fn from_growths(growths: &[Decimal]) -> Self {
        let mut periods: Vec<Decimal> = Vec::new();

        for &growth in growths {
            let Some(direction) = MomentumDirection::of(growth) else {
                continue;
            };

            match periods.last_mut() {
                Some(current) if MomentumDirection::of(*current) == Some(direction) => {
                    *current += growth;
                }
                _ => periods.push(growth),
            }
        }

        Self { periods }
    }

    pub fn as_slice(&self) -> &[Decimal] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// The most recent, possibly still open, period
    pub fn current(&self) -> Option<Decimal> {
        self.periods.last().copied()
    }

    /// The period immediately before the current one
    pub fn last_completed(&self) -> Option<Decimal> {
        self.periods.iter().rev().nth(1).copied()
    }

    /// Largest period in the window, the open current period included
    pub fn best(&self) -> Option<Decimal> {
        self.periods.iter().copied().max()
    }
}
