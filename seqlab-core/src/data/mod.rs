//! Input preparation ahead of the indicator pipeline.

pub mod clean;

pub use clean::{clean_bars, clean_bars_with_report, CleanReport};
