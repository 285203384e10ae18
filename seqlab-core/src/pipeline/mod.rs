//! Indicator pipeline orchestration.
//!
//! Fixed order per invocation: true-range bounds, Heiken-Ashi, Bollinger
//! Bands (if enabled), TD Sequential (if enabled). The pipeline holds only its
//! validated configuration, so one instance can serve concurrent calls.

pub mod kind;
pub mod result;

pub use kind::IndicatorKind;
pub use result::PerBarResult;

use crate::config::{ConfigError, PipelineConfig};
use crate::data::clean_bars;
use crate::domain::{Bar, RawBar};
use crate::indicators::{heiken_ashi, BollingerBands, TrueRangeBounds};
use crate::td::{td_events, TdEvent, TdSequential};

/// Validated pipeline, ready to run over any number of series.
#[derive(Debug, Clone)]
pub struct IndicatorPipeline {
    config: PipelineConfig,
}

impl IndicatorPipeline {
    /// Validate `config`. Nothing is computed on failure.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Enabled stages in execution order.
    pub fn stages(&self) -> Vec<IndicatorKind> {
        IndicatorKind::ORDER
            .into_iter()
            .filter(|kind| kind.is_enabled(&self.config))
            .collect()
    }

    /// Largest lookback across enabled stages.
    pub fn warmup(&self) -> usize {
        self.stages()
            .into_iter()
            .map(|kind| kind.lookback(&self.config))
            .max()
            .unwrap_or(0)
    }

    /// Clean `raw` and run every enabled stage. One result per kept row.
    pub fn run(&self, raw: &[RawBar]) -> Vec<PerBarResult> {
        self.run_bars(&clean_bars(raw))
    }

    /// Run every enabled stage over already-cleaned bars.
    pub fn run_bars(&self, bars: &[Bar]) -> Vec<PerBarResult> {
        let span = tracing::debug_span!("pipeline", bars = bars.len());
        let _enter = span.enter();

        if bars.is_empty() {
            return Vec::new();
        }

        let tr = TrueRangeBounds::compute(bars);

        let mut candles = Vec::new();
        let mut bollinger = None;
        let mut td = None;
        for kind in self.stages() {
            match kind {
                IndicatorKind::HeikenAshi => candles = heiken_ashi(bars),
                IndicatorKind::Bollinger => {
                    let bands = BollingerBands::from_config(&self.config.bollinger);
                    bollinger = Some(bands.compute(bars));
                }
                IndicatorKind::TdSequential => {
                    let sequential = TdSequential::from_config(&self.config.td_sequential);
                    td = Some(sequential.compute(bars, &tr));
                }
            }
            tracing::debug!(stage = kind.name(), "stage computed");
        }

        let mut bollinger = bollinger.map(Vec::into_iter);
        let mut td = td.map(Vec::into_iter);

        bars.iter()
            .zip(candles)
            .enumerate()
            .map(|(i, (bar, candle))| PerBarResult {
                index: bar.index,
                timestamp: bar.timestamp,
                true_high: tr.high[i],
                true_low: tr.low[i],
                heiken_ashi: candle,
                bollinger: bollinger.as_mut().and_then(|it| it.next()),
                td: td.as_mut().and_then(|it| it.next()),
            })
            .collect()
    }

    /// TD Sequential events for a result series produced by this pipeline.
    /// Empty when TD Sequential is disabled.
    pub fn events(&self, results: &[PerBarResult]) -> Vec<TdEvent> {
        let readings = results
            .iter()
            .filter_map(|r| r.td.as_ref().map(|td| (r.index, td)));
        td_events(readings, self.config.td_sequential.setup_max)
    }
}
