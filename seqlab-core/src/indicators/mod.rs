//! Price-series calculators.
//!
//! Each calculator is a pure function of the cleaned bar series and returns
//! one value per bar. The TD Sequential state machine lives in [`crate::td`];
//! it consumes [`TrueRangeBounds`] from here.

pub mod bollinger;
pub mod ema;
pub mod heiken_ashi;
pub mod sma;
pub mod true_range;

pub use bollinger::{BandPair, BollingerBands, BollingerReading};
pub use ema::ema_of_series;
pub use heiken_ashi::{heiken_ashi, HeikenAshiCandle};
pub use sma::sma_of_series;
pub use true_range::TrueRangeBounds;

#[cfg(test)]
fn test_timestamp(i: usize) -> chrono::NaiveDateTime {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    base + chrono::Duration::days(i as i64)
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLC: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                index: i,
                timestamp: test_timestamp(i),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
            }
        })
        .collect()
}

/// Create bars from explicit (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc_bars(rows: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    rows.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            index: i,
            timestamp: test_timestamp(i),
            open,
            high,
            low,
            close,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
