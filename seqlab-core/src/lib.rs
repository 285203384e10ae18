//! seqlab core: TD Sequential, Bollinger Bands and Heiken-Ashi over OHLC series.
//!
//! This crate contains the computation engine:
//! - Domain types (raw and cleaned bars, directions)
//! - Input cleaning that keeps original row positions
//! - Validated, TOML-loadable configuration
//! - True-range bounds, Bollinger Bands and Heiken-Ashi calculators
//! - The TD Sequential forward pass (Setup, TDST, perfection, Countdown)
//! - A fixed-order pipeline merging every stage into one result per bar
//!
//! Every invocation owns its input and state; nothing is shared between calls.

pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod pipeline;
pub mod td;

pub use config::{BollingerConfig, ConfigError, MaType, PipelineConfig, TdSequentialConfig};
pub use domain::{Bar, Direction, RawBar};
pub use pipeline::{IndicatorKind, IndicatorPipeline, PerBarResult};
pub use td::{CountdownMark, TdEvent, TdReading};
