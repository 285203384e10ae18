//! The closed set of pipeline stages.

use crate::config::PipelineConfig;
use crate::indicators::BollingerBands;
use crate::td::TdSequential;

/// Indicator stages, in their fixed execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    HeikenAshi,
    Bollinger,
    TdSequential,
}

impl IndicatorKind {
    /// Execution order. True-range bounds are not a stage; they are always
    /// computed first.
    pub const ORDER: [IndicatorKind; 3] = [
        IndicatorKind::HeikenAshi,
        IndicatorKind::Bollinger,
        IndicatorKind::TdSequential,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IndicatorKind::HeikenAshi => "heiken_ashi",
            IndicatorKind::Bollinger => "bollinger",
            IndicatorKind::TdSequential => "td_sequential",
        }
    }

    /// Heiken-Ashi is always computed; the others follow their `enabled` switch.
    pub fn is_enabled(self, config: &PipelineConfig) -> bool {
        match self {
            IndicatorKind::HeikenAshi => true,
            IndicatorKind::Bollinger => config.bollinger.enabled,
            IndicatorKind::TdSequential => config.td_sequential.enabled,
        }
    }

    /// Number of leading bars without meaningful output.
    pub fn lookback(self, config: &PipelineConfig) -> usize {
        match self {
            IndicatorKind::HeikenAshi => 0,
            IndicatorKind::Bollinger => BollingerBands::from_config(&config.bollinger).lookback(),
            IndicatorKind::TdSequential => {
                TdSequential::from_config(&config.td_sequential).lookback()
            }
        }
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
