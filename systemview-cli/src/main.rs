//! SystemView CLI: run a moving-average turning-point analysis.
//!
//! Commands:
//! - `run`: load bars (CSV file or synthetic), analyze, print the summary,
//!   and save JSON/CSV artifacts for charting

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use systemview_runner::data_loader::DEFAULT_SYNTHETIC_SEED;
use systemview_runner::{
    analyze, generate_synthetic, load_configured, render_details, render_summary, save_artifacts,
    AnalysisConfig, LoadedData,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "systemview",
    about = "SystemView CLI: moving-average turning-point backtest analytics"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a daily price series and print summary statistics.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV file with Date,Open,High,Low,Close,Volume columns. Overrides data.file.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Moving-average length. Overrides indicator.length.
        #[arg(long)]
        length: Option<usize>,

        /// First date to keep (YYYY-MM-DD, inclusive).
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last date to keep (YYYY-MM-DD, inclusive).
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Use a seeded synthetic random walk instead of a file.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for --synthetic.
        #[arg(long, default_value_t = DEFAULT_SYNTHETIC_SEED)]
        seed: u64,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Print first/last record and trade, and log at debug level.
        #[arg(long, short, default_value_t = false)]
        verbose: bool,
    },
}

struct RunArgs {
    config: Option<PathBuf>,
    file: Option<PathBuf>,
    length: Option<usize>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    synthetic: bool,
    seed: u64,
    output_dir: PathBuf,
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            file,
            length,
            start,
            end,
            synthetic,
            seed,
            output_dir,
            verbose,
        } => {
            init_tracing(verbose);
            run_analysis_cmd(RunArgs {
                config,
                file,
                length,
                start,
                end,
                synthetic,
                seed,
                output_dir,
                verbose,
            })
        }
    }
}

/// `RUST_LOG` wins; otherwise `systemview=info`, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "systemview=debug" } else { "systemview=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_analysis_cmd(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    apply_overrides(&mut config, &args);
    config.validate()?;

    let data = if args.synthetic {
        let end = config
            .data
            .end
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let start = config
            .data
            .start
            .unwrap_or_else(|| end - chrono::Duration::days(365 * 10));
        generate_synthetic(args.seed, start, end)
    } else {
        load_configured(&config).context("failed to load bars")?
    };
    report_provenance(&data);

    let analysis = analyze(data.bars.clone(), config.indicator.length)?;
    let summary = analysis.summarize();

    if config.report.verbose {
        print!("{}", render_details(&analysis));
    }
    if let Ok(summary) = &summary {
        print!("{}", render_summary(summary));
    }

    let run_dir = save_artifacts(
        &analysis,
        summary.as_ref().ok(),
        &config.report,
        &data.source.label(),
        &args.output_dir,
    )?;
    println!("Artifacts saved to: {}", run_dir.display());

    summary
        .map(|_| ())
        .context("summary statistics are undefined for this run")
}

fn apply_overrides(config: &mut AnalysisConfig, args: &RunArgs) {
    if let Some(file) = &args.file {
        config.data.file = Some(file.clone());
    }
    if let Some(length) = args.length {
        config.indicator.length = length;
    }
    if args.start.is_some() {
        config.data.start = args.start;
    }
    if args.end.is_some() {
        config.data.end = args.end;
    }
    if args.verbose {
        config.report.verbose = true;
    }
}

fn report_provenance(data: &LoadedData) {
    if let (Some(first), Some(last)) = (data.bars.first(), data.bars.last()) {
        info!(
            source = %data.source.label(),
            bars = data.bars.len(),
            first = %first.date,
            last = %last.date,
            hash = %data.dataset_hash,
            reversed = data.reversed,
            "bars loaded"
        );
    }
}
