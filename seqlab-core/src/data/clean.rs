//! Input cleaning: drop incomplete rows, keep original positions.
//!
//! Every downstream calculator assumes finite OHLC values, so this is the
//! only place where missing data is handled. Rows are never reordered.

use crate::domain::{Bar, RawBar};

/// Outcome of a cleaning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanReport {
    pub kept: usize,
    pub dropped: usize,
}

/// Drop rows with any missing OHLC field.
pub fn clean_bars(raw: &[RawBar]) -> Vec<Bar> {
    clean_bars_with_report(raw).0
}

/// Like [`clean_bars`], also reporting how many rows were dropped.
pub fn clean_bars_with_report(raw: &[RawBar]) -> (Vec<Bar>, CleanReport) {
    let bars: Vec<Bar> = raw
        .iter()
        .enumerate()
        .filter_map(|(index, row)| Bar::from_raw(index, row))
        .collect();

    let report = CleanReport {
        kept: bars.len(),
        dropped: raw.len() - bars.len(),
    };
    if report.dropped > 0 {
        tracing::debug!(
            kept = report.kept,
            dropped = report.dropped,
            "dropped incomplete bars"
        );
    }

    let insane = bars.iter().filter(|bar| !bar.is_sane()).count();
    if insane > 0 {
        tracing::warn!(count = insane, "bars with inconsistent OHLC ordering");
    }

    (bars, report)
}
