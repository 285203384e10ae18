//! Per-bar pipeline output.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::indicators::{BollingerReading, HeikenAshiCandle};
use crate::td::TdReading;

/// Everything the pipeline computed for one input bar.
///
/// `bollinger` and `td` are `None` when the stage was disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerBarResult {
    /// Row position in the raw input.
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub true_high: f64,
    pub true_low: f64,
    pub heiken_ashi: HeikenAshiCandle,
    pub bollinger: Option<BollingerReading>,
    pub td: Option<TdReading>,
}
