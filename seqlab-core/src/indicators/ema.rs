//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seed: EMA[0] = x[0], so the recurrence runs from the first bar.
//! Callers that need a warmup mask it themselves.

/// Recursive EMA over `values`, seeded with the first value.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    let alpha = 2.0 / (period as f64 + 1.0);

    let mut result = Vec::with_capacity(values.len());
    let mut prev = first;
    result.push(prev);
    for &v in &values[1..] {
        prev = alpha * v + (1.0 - alpha) * prev;
        result.push(prev);
    }
    result
}
