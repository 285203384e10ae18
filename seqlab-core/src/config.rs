//! Serializable pipeline configuration.
//!
//! Every section is `#[serde(default)]`, so a TOML file only needs to name
//! the values it overrides:
//!
//! ```toml
//! [td_sequential]
//! setup_max = 9
//!
//! [bollinger]
//! ma_type = "ema"
//! std_devs = [1.0, 2.0]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from configuration loading and validation.
///
/// Validation errors are fatal for the call that supplied the configuration;
/// they are raised before any bar is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("td_sequential.lookback must be >= 1 (got {0})")]
    LookbackTooSmall(usize),

    #[error("td_sequential.setup_max must be >= 2 (got {0})")]
    SetupMaxTooSmall(u32),

    #[error("td_sequential.countdown_max must be >= 2 (got {0})")]
    CountdownMaxTooSmall(u32),

    #[error("bollinger.period must be >= 1 (got {0})")]
    PeriodTooSmall(usize),

    #[error("bollinger.std_devs entries must be finite and > 0 (got {0})")]
    InvalidStdDev(f64),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Moving average used for the Bollinger middle band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaType {
    #[default]
    Sma,
    Ema,
}

/// TD Sequential parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TdSequentialConfig {
    pub enabled: bool,
    /// Distance, in bars, of the close each bar is compared against.
    pub lookback: usize,
    /// Bars needed to complete a Setup.
    pub setup_max: u32,
    /// Qualifying bars needed to complete a Countdown.
    pub countdown_max: u32,
}

impl Default for TdSequentialConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lookback: 4,
            setup_max: 9,
            countdown_max: 13,
        }
    }
}

impl TdSequentialConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback < 1 {
            return Err(ConfigError::LookbackTooSmall(self.lookback));
        }
        if self.setup_max < 2 {
            return Err(ConfigError::SetupMaxTooSmall(self.setup_max));
        }
        if self.countdown_max < 2 {
            return Err(ConfigError::CountdownMaxTooSmall(self.countdown_max));
        }
        Ok(())
    }
}

/// Bollinger Bands parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerConfig {
    pub enabled: bool,
    pub period: usize,
    pub ma_type: MaType,
    /// One upper/lower band pair is produced per multiplier.
    pub std_devs: Vec<f64>,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period: 20,
            ma_type: MaType::Sma,
            std_devs: vec![2.0],
        }
    }
}

impl BollingerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period < 1 {
            return Err(ConfigError::PeriodTooSmall(self.period));
        }
        if let Some(&bad) = self
            .std_devs
            .iter()
            .find(|k| !(k.is_finite() && **k > 0.0))
        {
            return Err(ConfigError::InvalidStdDev(bad));
        }
        Ok(())
    }
}

/// Complete configuration for one pipeline invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub td_sequential: TdSequentialConfig,
    pub bollinger: BollingerConfig,
}

impl PipelineConfig {
    /// Check every constraint. Disabled sections are validated too, so a
    /// stored configuration stays valid when a section is switched back on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.td_sequential.validate()?;
        self.bollinger.validate()
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).expect("PipelineConfig must serialize to TOML")
    }

    /// Deterministic BLAKE3 digest of the configuration.
    ///
    /// Equal configurations, `enabled` switches included, share a fingerprint.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("PipelineConfig must serialize");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.td_sequential.lookback, 4);
        assert_eq!(config.td_sequential.setup_max, 9);
        assert_eq!(config.td_sequential.countdown_max, 13);
        assert_eq!(config.bollinger.period, 20);
        assert_eq!(config.bollinger.ma_type, MaType::Sma);
        assert_eq!(config.bollinger.std_devs, vec![2.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_lookback() {
        let mut config = PipelineConfig::default();
        config.td_sequential.lookback = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LookbackTooSmall(0))
        ));
    }

    #[test]
    fn rejects_small_setup_and_countdown_max() {
        let mut config = PipelineConfig::default();
        config.td_sequential.setup_max = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SetupMaxTooSmall(1))
        ));

        let mut config = PipelineConfig::default();
        config.td_sequential.countdown_max = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CountdownMaxTooSmall(1))
        ));
    }

    #[test]
    fn rejects_bad_bollinger_values() {
        let mut config = PipelineConfig::default();
        config.bollinger.period = 0;
        assert!(matches!(config.validate(), Err(ConfigError::PeriodTooSmall(0))));

        for bad in [0.0, -1.5, f64::NAN, f64::INFINITY] {
            let mut config = PipelineConfig::default();
            config.bollinger.std_devs = vec![2.0, bad];
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidStdDev(_))),
                "std dev {bad} should be rejected"
            );
        }
    }

    #[test]
    fn empty_std_dev_list_is_valid() {
        let mut config = PipelineConfig::default();
        config.bollinger.std_devs.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn disabled_sections_are_still_validated() {
        let mut config = PipelineConfig::default();
        config.bollinger.enabled = false;
        config.bollinger.period = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = PipelineConfig::from_toml(
            r#"
            [td_sequential]
            setup_max = 7

            [bollinger]
            ma_type = "ema"
            std_devs = [1.0, 2.5]
            "#,
        )
        .unwrap();
        assert_eq!(config.td_sequential.setup_max, 7);
        assert_eq!(config.td_sequential.lookback, 4);
        assert_eq!(config.bollinger.ma_type, MaType::Ema);
        assert_eq!(config.bollinger.std_devs, vec![1.0, 2.5]);
        assert_eq!(config.bollinger.period, 20);
    }

    #[test]
    fn invalid_toml_value_is_rejected_at_parse() {
        let err = PipelineConfig::from_toml("[td_sequential]\ncountdown_max = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::CountdownMaxTooSmall(1)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = PipelineConfig::from_toml("[td_sequential\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_output_parses_back() {
        let mut config = PipelineConfig::default();
        config.bollinger.std_devs = vec![1.0, 2.0, 3.0];
        let parsed = PipelineConfig::from_toml(&config.to_toml()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn fingerprint_tracks_parameters() {
        let a = PipelineConfig::default();
        let mut b = PipelineConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.td_sequential.lookback = 5;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_hashes_serialized_config() {
        let config = PipelineConfig::default();
        let empty = blake3::hash(b"").to_hex().to_string();
        assert_ne!(config.fingerprint(), empty);

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            config.fingerprint(),
            blake3::hash(json.as_bytes()).to_hex().to_string()
        );
        assert!(config.to_toml().contains("[bollinger]"));
    }
}
