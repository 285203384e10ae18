//! CSV input and JSON/CSV output for the CLI.
//!
//! Input columns: `timestamp,open,high,low,close`, any extra columns (such as
//! `volume`) are ignored. An empty cell is a missing value and the row is
//! dropped by the pipeline's cleaning step.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use seqlab_core::{PerBarResult, PipelineConfig, RawBar, TdEvent};

// ─── CSV input ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// `YYYY-MM-DD`. Offsets are converted to UTC.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    if let Some(dt) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(dt);
    }
    bail!("unrecognized timestamp '{s}'")
}

/// Parse bar rows from CSV text with a header line.
pub fn parse_bars<R: Read>(reader: R) -> Result<Vec<RawBar>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (i, record) in rdr.deserialize::<CsvRow>().enumerate() {
        // header is line 1
        let line = i + 2;
        let row = record.with_context(|| format!("malformed CSV row at line {line}"))?;
        let timestamp =
            parse_timestamp(&row.timestamp).with_context(|| format!("line {line}"))?;
        bars.push(RawBar {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
        });
    }
    Ok(bars)
}

pub fn read_bars(path: &Path) -> Result<Vec<RawBar>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    parse_bars(std::io::BufReader::new(file))
        .with_context(|| format!("failed to read bars from {}", path.display()))
}

// ─── JSON output ────────────────────────────────────────────────────

/// Everything produced for one input file.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub source: String,
    pub config_fingerprint: String,
    pub warmup: usize,
    pub dropped_rows: usize,
    pub bars: &'a [PerBarResult],
    pub events: Vec<TdEvent>,
}

pub fn export_json(report: &Report<'_>) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report to JSON")
}

// ─── CSV output ─────────────────────────────────────────────────────

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn direction_cell(value: Option<seqlab_core::Direction>) -> String {
    value.map(|d| d.as_str().to_string()).unwrap_or_default()
}

/// Flat per-bar CSV.
///
/// Columns: index, timestamp, true_high, true_low, ha_open, ha_high, ha_low,
/// ha_close; then bb_middle and one bb_upper_k/bb_lower_k pair per multiplier
/// when Bollinger is enabled; then setup_count, setup_type, perfected,
/// countdown, countdown_type, tdst_resistance, tdst_support, cancelled when
/// TD Sequential is enabled. Countdown uses the numeric encoding
/// (`countdown_max - 0.5` marks a deferred bar).
pub fn export_csv(results: &[PerBarResult], config: &PipelineConfig) -> Result<String> {
    let bollinger = config.bollinger.enabled;
    let td = config.td_sequential.enabled;
    let countdown_max = config.td_sequential.countdown_max;

    let mut header: Vec<String> = [
        "index",
        "timestamp",
        "true_high",
        "true_low",
        "ha_open",
        "ha_high",
        "ha_low",
        "ha_close",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    if bollinger {
        header.push("bb_middle".into());
        for k in &config.bollinger.std_devs {
            header.push(format!("bb_upper_{k}"));
            header.push(format!("bb_lower_{k}"));
        }
    }
    if td {
        header.extend(
            [
                "setup_count",
                "setup_type",
                "perfected",
                "countdown",
                "countdown_type",
                "tdst_resistance",
                "tdst_support",
                "cancelled",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
    }

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&header)?;

    for r in results {
        let ha = &r.heiken_ashi;
        let mut row = vec![
            r.index.to_string(),
            r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            r.true_high.to_string(),
            r.true_low.to_string(),
            ha.open.to_string(),
            ha.high.to_string(),
            ha.low.to_string(),
            ha.close.to_string(),
        ];
        if let Some(bb) = &r.bollinger {
            row.push(cell(bb.middle));
            for band in &bb.bands {
                row.push(cell(band.upper));
                row.push(cell(band.lower));
            }
        }
        if let Some(t) = &r.td {
            row.push(t.setup_count.to_string());
            row.push(direction_cell(t.setup_type));
            row.push(t.perfected.to_string());
            row.push(t.countdown.legacy_value(countdown_max).to_string());
            row.push(direction_cell(t.countdown_type));
            row.push(cell(t.tdst_resistance));
            row.push(cell(t.tdst_support));
            row.push(direction_cell(t.cancelled.map(|c| c.direction)));
        }
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
