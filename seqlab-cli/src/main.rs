//! seqlab CLI: TD Sequential, Bollinger Bands and Heiken-Ashi over CSV bar files.
//!
//! Commands:
//! - `compute`: run the pipeline over one CSV file, write JSON or CSV
//! - `batch`: run many files in parallel into an output directory
//! - `config`: print the effective configuration and its fingerprint
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `info`).

mod io;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use seqlab_core::{IndicatorPipeline, PipelineConfig};

#[derive(Parser)]
#[command(
    name = "seqlab",
    about = "seqlab: TD Sequential, Bollinger Bands and Heiken-Ashi indicators"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute indicators for one CSV file.
    Compute {
        /// CSV with columns timestamp,open,high,low,close.
        input: PathBuf,

        /// Path to a TOML config file. Defaults to built-in parameters.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compute indicators for several CSV files in parallel.
    Batch {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for one output file per input.
        #[arg(long)]
        output_dir: PathBuf,

        /// Path to a TOML config file. Defaults to built-in parameters.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the effective configuration as TOML with its fingerprint.
    Config {
        /// Path to a TOML config file. Defaults to built-in parameters.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compute {
            input,
            config,
            format,
            output,
        } => {
            let pipeline = load_pipeline(config.as_deref())?;
            let rendered = render_file(&pipeline, &input, format)?;
            match output {
                Some(path) => std::fs::write(&path, rendered)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{rendered}"),
            }
            Ok(())
        }
        Commands::Batch {
            inputs,
            output_dir,
            config,
            format,
        } => {
            let pipeline = load_pipeline(config.as_deref())?;
            run_batch(&pipeline, &inputs, &output_dir, format)?;
            Ok(())
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            println!("# fingerprint: {}", config.fingerprint());
            print!("{}", config.to_toml());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn load_pipeline(path: Option<&Path>) -> Result<IndicatorPipeline> {
    let config = load_config(path)?;
    let pipeline = IndicatorPipeline::new(config)?;
    tracing::debug!(
        fingerprint = %pipeline.config().fingerprint(),
        warmup = pipeline.warmup(),
        "pipeline ready"
    );
    Ok(pipeline)
}

/// Read, compute and render one input file.
fn render_file(
    pipeline: &IndicatorPipeline,
    input: &Path,
    format: OutputFormat,
) -> Result<String> {
    let raw = io::read_bars(input)?;
    let results = pipeline.run(&raw);
    let dropped = raw.len() - results.len();

    if results.len() < pipeline.warmup() {
        tracing::warn!(
            file = %input.display(),
            bars = results.len(),
            warmup = pipeline.warmup(),
            "series shorter than warmup; some indicators stay empty"
        );
    }
    tracing::info!(
        file = %input.display(),
        bars = results.len(),
        dropped,
        "computed"
    );

    match format {
        OutputFormat::Json => io::export_json(&io::Report {
            source: input.display().to_string(),
            config_fingerprint: pipeline.config().fingerprint(),
            warmup: pipeline.warmup(),
            dropped_rows: dropped,
            bars: &results,
            events: pipeline.events(&results),
        }),
        OutputFormat::Csv => io::export_csv(&results, pipeline.config()),
    }
}

/// Output path for `input` under `output_dir`: same file stem, format extension.
fn output_path(input: &Path, output_dir: &Path, format: OutputFormat) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .with_context(|| format!("input has no file name: {}", input.display()))?;
    Ok(output_dir.join(format!(
        "{}.{}",
        stem.to_string_lossy(),
        format.extension()
    )))
}

/// Process every input independently. Failures are logged per file; the
/// command fails if any file failed.
///
/// Two inputs mapping to the same output file are rejected before anything
/// is written.
fn run_batch(
    pipeline: &IndicatorPipeline,
    inputs: &[PathBuf],
    output_dir: &Path,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    let planned: Vec<(&PathBuf, Result<PathBuf>)> = inputs
        .iter()
        .map(|input| (input, output_path(input, output_dir, format)))
        .collect();

    {
        let mut claimed: HashMap<&Path, &Path> = HashMap::new();
        for (input, path) in &planned {
            let Ok(path) = path else { continue };
            if let Some(first) = claimed.insert(path.as_path(), input.as_path()) {
                bail!(
                    "{} and {} would both write {}",
                    first.display(),
                    input.display(),
                    path.display()
                );
            }
        }
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let outcomes: Vec<(&PathBuf, Result<PathBuf>)> = planned
        .into_par_iter()
        .map(|(input, path)| {
            let outcome = path.and_then(|path| {
                let rendered = render_file(pipeline, input, format)?;
                std::fs::write(&path, rendered)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                Ok(path)
            });
            (input, outcome)
        })
        .collect();

    let mut written = Vec::new();
    let mut failed = 0;
    for (input, outcome) in outcomes {
        match outcome {
            Ok(path) => written.push(path),
            Err(err) => {
                failed += 1;
                tracing::error!(file = %input.display(), "{err:#}");
            }
        }
    }

    tracing::info!(written = written.len(), failed, "batch finished");
    if failed > 0 {
        bail!("{failed} of {} input file(s) failed", inputs.len());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_series(dir: &Path, name: &str, len: usize) -> PathBuf {
        let mut text = String::from("timestamp,open,high,low,close\n");
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for i in 0..len {
            let close = 100.0 + (i as f64 * 0.3).sin() * 5.0;
            let day = start + chrono::Duration::days(i as i64);
            text.push_str(&format!(
                "{day},{open},{high},{low},{close}\n",
                open = close - 0.2,
                high = close + 1.0,
                low = close - 1.0,
            ));
        }
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn output_path_swaps_extension() {
        let path = output_path(
            Path::new("data/spy.daily.csv"),
            Path::new("out"),
            OutputFormat::Json,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("out/spy.daily.json"));
    }

    #[test]
    fn render_json_for_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_series(dir.path(), "a.csv", 40);
        let pipeline = IndicatorPipeline::new(PipelineConfig::default()).unwrap();

        let rendered = render_file(&pipeline, &input, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["bars"].as_array().unwrap().len(), 40);
        assert_eq!(value["warmup"], 19);
        assert_eq!(
            value["config_fingerprint"],
            PipelineConfig::default().fingerprint()
        );
    }

    #[test]
    fn batch_writes_one_file_per_input() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            write_series(dir.path(), "a.csv", 30),
            write_series(dir.path(), "b.csv", 60),
        ];
        let out = dir.path().join("out");
        let pipeline = IndicatorPipeline::new(PipelineConfig::default()).unwrap();

        let mut written = run_batch(&pipeline, &inputs, &out, OutputFormat::Csv).unwrap();
        written.sort();
        assert_eq!(written, vec![out.join("a.csv"), out.join("b.csv")]);

        let b = std::fs::read_to_string(out.join("b.csv")).unwrap();
        // header + one line per bar
        assert_eq!(b.lines().count(), 61);
    }

    #[test]
    fn batch_fails_if_any_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            write_series(dir.path(), "good.csv", 30),
            dir.path().join("missing.csv"),
        ];
        let out = dir.path().join("out");
        let pipeline = IndicatorPipeline::new(PipelineConfig::default()).unwrap();

        let err = run_batch(&pipeline, &inputs, &out, OutputFormat::Json).unwrap_err();
        assert!(err.to_string().contains("1 of 2"));
        // the good file is still written
        assert!(out.join("good.json").exists());
    }

    #[test]
    fn batch_rejects_inputs_sharing_an_output_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a")).unwrap();
        std::fs::create_dir_all(dir.path().join("b")).unwrap();
        let inputs = vec![
            write_series(&dir.path().join("a"), "x.csv", 1),
            write_series(&dir.path().join("b"), "x.csv", 2),
        ];
        let out = dir.path().join("out");
        let pipeline = IndicatorPipeline::new(PipelineConfig::default()).unwrap();

        let err = run_batch(&pipeline, &inputs, &out, OutputFormat::Csv).unwrap_err();
        assert!(err.to_string().contains("would both write"));
        // nothing written
        assert!(!out.join("x.csv").exists());
    }

    #[test]
    fn config_file_is_loaded_and_validated() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[bollinger]\nperiod = 10\n").unwrap();
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[td_sequential]\nsetup_max = 1\n").unwrap();

        let pipeline = load_pipeline(Some(good.as_path())).unwrap();
        assert_eq!(pipeline.config().bollinger.period, 10);
        assert!(load_pipeline(Some(bad.as_path())).is_err());
        assert_eq!(load_config(None).unwrap(), PipelineConfig::default());
    }
}
