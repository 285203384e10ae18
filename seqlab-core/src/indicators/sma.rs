//! Simple Moving Average (SMA).
//!
//! Rolling mean over a window of `period` values.
//! Lookback: period - 1 (first valid value at index period-1).

/// Rolling mean of `values`. `None` until the window is full.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    if period == 0 || n < period {
        return result;
    }

    let mut sum: f64 = values[..period].iter().sum();
    result[period - 1] = Some(sum / period as f64);

    // Roll the window forward
    for i in period..n {
        sum += values[i] - values[i - period];
        result[i] = Some(sum / period as f64);
    }

    result
}
