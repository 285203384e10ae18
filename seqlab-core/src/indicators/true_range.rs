//! True-range bounds.
//!
//! trueHigh[i] = max(high[i], close[i-1]), trueLow[i] = min(low[i], close[i-1]).
//! The first bar has no previous close and uses its own high/low.

use crate::domain::Bar;

/// Per-bar true high / true low, aligned with the input bars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrueRangeBounds {
    pub high: Vec<f64>,
    pub low: Vec<f64>,
}

impl TrueRangeBounds {
    pub fn compute(bars: &[Bar]) -> Self {
        let mut high = Vec::with_capacity(bars.len());
        let mut low = Vec::with_capacity(bars.len());

        let mut prev_close: Option<f64> = None;
        for bar in bars {
            match prev_close {
                Some(pc) => {
                    high.push(bar.high.max(pc));
                    low.push(bar.low.min(pc));
                }
                None => {
                    high.push(bar.high);
                    low.push(bar.low);
                }
            }
            prev_close = Some(bar.close);
        }

        Self { high, low }
    }

    pub fn len(&self) -> usize {
        self.high.len()
    }

    pub fn is_empty(&self) -> bool {
        self.high.is_empty()
    }
}
