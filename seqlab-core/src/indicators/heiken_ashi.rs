//! Heiken-Ashi candles.
//!
//! - haClose[i] = (open + high + low + close) / 4
//! - haOpen[0] = (open[0] + close[0]) / 2, then (haOpen[i-1] + haClose[i-1]) / 2
//! - haHigh[i] = max(high, haOpen, haClose)
//! - haLow[i] = min(low, haOpen, haClose)
//!
//! The open is a one-step recurrence, so the series is produced by a single
//! sequential scan.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

/// One smoothed candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeikenAshiCandle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

pub fn heiken_ashi(bars: &[Bar]) -> Vec<HeikenAshiCandle> {
    let mut prev: Option<HeikenAshiCandle> = None;
    bars.iter()
        .map(|bar| {
            let close = (bar.open + bar.high + bar.low + bar.close) / 4.0;
            let open = match prev {
                Some(p) => (p.open + p.close) / 2.0,
                None => (bar.open + bar.close) / 2.0,
            };
            let candle = HeikenAshiCandle {
                open,
                high: bar.high.max(open).max(close),
                low: bar.low.min(open).min(close),
                close,
            };
            prev = Some(candle);
            candle
        })
        .collect()
}
