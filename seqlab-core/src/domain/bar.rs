//! Bars: raw input rows and cleaned OHLC bars.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// OHLC row as supplied by a data source, before cleaning.
///
/// A field is missing when it is `None` or NaN. Rows with any missing field
/// never reach the indicator calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub timestamp: NaiveDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
}

impl RawBar {
    pub fn new(timestamp: NaiveDateTime, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
        }
    }

    /// Returns true if any OHLC field is absent or NaN.
    pub fn is_void(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .into_iter()
            .any(|field| field.map_or(true, f64::is_nan))
    }
}

/// Cleaned OHLC bar.
///
/// `index` is the row position in the raw input series, so results can be
/// aligned back to the caller's data after incomplete rows were dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    /// Promote a raw row, or `None` if any field is missing.
    pub fn from_raw(index: usize, raw: &RawBar) -> Option<Self> {
        if raw.is_void() {
            return None;
        }
        Some(Self {
            index,
            timestamp: raw.timestamp,
            open: raw.open?,
            high: raw.high?,
            low: raw.low?,
            close: raw.close?,
        })
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}
