//! Setup completion: TDST levels and perfection.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Direction};
use crate::indicators::TrueRangeBounds;

/// TDST support/resistance carried across bars.
///
/// Resistance comes from buy Setups, support from sell Setups. Each level is
/// replaced when a new Setup of its type completes and only widens while that
/// Setup keeps extending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TdstLevels {
    pub resistance: Option<f64>,
    pub support: Option<f64>,
}

impl TdstLevels {
    /// Set the level for a Setup of `direction` that completed at bar `i`,
    /// spanning the last `setup_max` bars.
    pub fn on_setup_complete(
        &mut self,
        direction: Direction,
        tr: &TrueRangeBounds,
        i: usize,
        setup_max: u32,
    ) {
        let start = (i + 1).saturating_sub(setup_max as usize);
        match direction {
            Direction::Buy => {
                let highest = tr.high[start..=i].iter().copied().fold(f64::MIN, f64::max);
                self.resistance = Some(highest);
            }
            Direction::Sell => {
                let lowest = tr.low[start..=i].iter().copied().fold(f64::MAX, f64::min);
                self.support = Some(lowest);
            }
        }
    }

    /// Widen the level while a completed Setup keeps running.
    pub fn expand(&mut self, direction: Direction, tr: &TrueRangeBounds, i: usize) {
        match direction {
            Direction::Buy => {
                self.resistance = Some(self.resistance.map_or(tr.high[i], |r| r.max(tr.high[i])));
            }
            Direction::Sell => {
                self.support = Some(self.support.map_or(tr.low[i], |s| s.min(tr.low[i])));
            }
        }
    }
}

/// Whether the Setup completing at bar `i` is perfected.
///
/// Buy: close of bar `i` or `i-1` at or below both lows of bars `i-2` and `i-3`.
/// Sell: high of bar `i` or `i-1` at or above both highs of bars `i-2` and `i-3`.
pub fn is_perfected(bars: &[Bar], i: usize, direction: Direction) -> bool {
    if i < 3 {
        return false;
    }
    match direction {
        Direction::Buy => {
            let floor = bars[i - 2].low.min(bars[i - 3].low);
            bars[i].close <= floor || bars[i - 1].close <= floor
        }
        Direction::Sell => {
            let ceiling = bars[i - 2].high.max(bars[i - 3].high);
            bars[i].high >= ceiling || bars[i - 1].high >= ceiling
        }
    }
}
