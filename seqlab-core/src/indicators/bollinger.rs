//! Bollinger Bands: moving average +/- a multiple of the standard deviation.
//!
//! - Middle: SMA(close, period) or EMA(close, period)
//! - Upper_k: middle + k * stddev(close, period)
//! - Lower_k: middle - k * stddev(close, period)
//!
//! Uses sample stddev (divide by N - 1), so a period of 1 has a middle band
//! but no upper/lower bands.
//! Lookback: period - 1. Nothing is reported during the warmup, EMA included.

use serde::{Deserialize, Serialize};

use crate::config::{BollingerConfig, MaType};
use crate::domain::Bar;
use crate::indicators::{ema_of_series, sma_of_series};

/// Upper/lower band pair for one multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPair {
    pub std_dev: f64,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
}

/// Bollinger output for one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerReading {
    pub middle: Option<f64>,
    /// One entry per configured multiplier, in configuration order.
    pub bands: Vec<BandPair>,
}

impl BollingerReading {
    /// Band pair for multiplier `k`, if it was configured.
    pub fn band(&self, k: f64) -> Option<&BandPair> {
        self.bands.iter().find(|b| b.std_dev == k)
    }
}

#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    ma_type: MaType,
    std_devs: Vec<f64>,
}

impl BollingerBands {
    pub fn new(period: usize, ma_type: MaType, std_devs: Vec<f64>) -> Self {
        Self {
            period,
            ma_type,
            std_devs,
        }
    }

    pub fn from_config(config: &BollingerConfig) -> Self {
        Self::new(config.period, config.ma_type, config.std_devs.clone())
    }

    pub fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    pub fn compute(&self, bars: &[Bar]) -> Vec<BollingerReading> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let middle = self.middle_band(&closes);
        let stddev = rolling_sample_std(&closes, self.period);

        middle
            .into_iter()
            .zip(stddev)
            .map(|(mid, sd)| {
                let bands = self
                    .std_devs
                    .iter()
                    .map(|&k| {
                        let offset = sd.map(|sd| k * sd);
                        BandPair {
                            std_dev: k,
                            upper: mid.zip(offset).map(|(m, o)| m + o),
                            lower: mid.zip(offset).map(|(m, o)| m - o),
                        }
                    })
                    .collect();
                BollingerReading { middle: mid, bands }
            })
            .collect()
    }

    fn middle_band(&self, closes: &[f64]) -> Vec<Option<f64>> {
        match self.ma_type {
            MaType::Sma => sma_of_series(closes, self.period),
            MaType::Ema => {
                let warmup = self.lookback();
                ema_of_series(closes, self.period)
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i >= warmup).then_some(v))
                    .collect()
            }
        }
    }
}

/// Rolling sample standard deviation. `None` until the window is full, and
/// everywhere when `period < 2`.
fn rolling_sample_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    if period < 2 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[(i + 1 - period)..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / (period - 1) as f64;
        result[i] = Some(variance.sqrt());
    }

    result
}
