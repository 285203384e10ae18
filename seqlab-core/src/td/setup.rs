//! Setup phase: price flips and the consecutive-bar count.
//!
//! A bearish flip (close[i-1] > close[i-L-1] and close[i] < close[i-L]) starts
//! a buy Setup; the mirror comparison starts a sell Setup. The Setup then
//! continues while each close stays below (buy) or above (sell) the close `L`
//! bars earlier. A flip always restarts the count at 1.
//!
//! The count keeps growing past `setup_max` while the condition holds; only
//! the display value stops at `setup_max`.

use crate::domain::Direction;

/// Setup progress carried from bar to bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupState {
    /// Consecutive qualifying bars, including any beyond `setup_max`.
    pub count: u32,
    pub direction: Option<Direction>,
    /// Direction of the most recent Setup that reached `setup_max`.
    pub last_completed: Option<Direction>,
}

/// Detect a price flip at bar `i`. Requires `i >= lookback + 1`.
pub fn detect_flip(closes: &[f64], i: usize, lookback: usize) -> Option<Direction> {
    let prev = closes[i - 1];
    let prev_ref = closes[i - lookback - 1];
    let cur = closes[i];
    let cur_ref = closes[i - lookback];

    if prev > prev_ref && cur < cur_ref {
        Some(Direction::Buy)
    } else if prev < prev_ref && cur > cur_ref {
        Some(Direction::Sell)
    } else {
        None
    }
}

impl SetupState {
    /// Apply the transition for bar `i`.
    pub fn advance(&mut self, closes: &[f64], i: usize, lookback: usize) {
        if i < lookback + 1 {
            return;
        }

        if let Some(direction) = detect_flip(closes, i, lookback) {
            self.direction = Some(direction);
            self.count = 1;
            return;
        }

        let continues = match self.direction {
            Some(Direction::Buy) => closes[i] < closes[i - lookback],
            Some(Direction::Sell) => closes[i] > closes[i - lookback],
            None => false,
        };
        if continues {
            self.count = self.count.saturating_add(1);
        } else {
            self.direction = None;
            self.count = 0;
        }
    }

    /// Direction of the Setup completing on this bar, if any.
    pub fn completing(&self, setup_max: u32) -> Option<Direction> {
        self.direction.filter(|_| self.count == setup_max)
    }

    /// Direction of a completed Setup still running past `setup_max`.
    pub fn extending(&self, setup_max: u32) -> Option<Direction> {
        self.direction.filter(|_| self.count > setup_max)
    }

    /// Count and direction to report for this bar.
    ///
    /// Only counts `1..=setup_max` are reported; an extended Setup reads as
    /// no Setup, so a reported direction always has a non-zero count.
    pub fn display(&self, setup_max: u32) -> (u32, Option<Direction>) {
        match self.direction {
            Some(direction) if (1..=setup_max).contains(&self.count) => {
                (self.count, Some(direction))
            }
            _ => (0, None),
        }
    }
}
