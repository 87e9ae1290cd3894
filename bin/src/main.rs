//! CLI for the minute-bar factor library.
//!
//! This binary lists and describes the registered factors, computes a factor
//! over a minute-bar file, incrementally updates stored daily panels and
//! resamples them into exposure panels.

use clap::{Parser, Subcommand};
use hf_exposure::{
    AssemblerConfig, AssemblyReport, MinuteBarSource, PanelAssembler, PanelStore,
    ParquetDaySource, ParquetPanelStore, ResampleConfig, frontier, resample,
};
use hf_factors::{Factor, FactorCategory, FactorRegistry};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;
use std::{
    collections::BTreeMap,
    error::Error,
    fs::File,
    path::{Path, PathBuf},
    process,
    sync::Arc,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hf-factors")]
#[command(about = "High-frequency factor panels from minute bars", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all available factors
    List,
    /// Show information about a specific factor
    Info {
        /// Factor name
        factor: String,
    },
    /// Compute a factor over one minute-bar Parquet file
    Compute {
        /// Factor to compute
        #[arg(long)]
        factor: String,
        /// Minute-bar Parquet file
        #[arg(long)]
        input: PathBuf,
    },
    /// Extend stored daily panels with new minute-bar days
    Update {
        /// Factor to update, or `all`
        #[arg(long)]
        factor: String,
        /// Directory of `YYYYMMDD*.parquet` minute-bar files
        #[arg(long)]
        source: PathBuf,
        /// Directory holding one Parquet panel per factor
        #[arg(long)]
        panels: PathBuf,
        /// Worker threads (defaults to the number of CPUs)
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Resample a stored daily panel into an exposure panel
    Resample {
        /// Factor whose panel to resample
        #[arg(long)]
        factor: String,
        /// Directory holding one Parquet panel per factor
        #[arg(long)]
        panels: PathBuf,
        /// `weekly`, `monthly` or a number of days
        #[arg(long)]
        frequency: String,
        /// `o`, `m`, `z` or `std`
        #[arg(long)]
        method: String,
        /// `calendar` or `days`
        #[arg(long, default_value = "calendar")]
        mode: String,
        /// Instrument universe
        #[arg(long, default_value = "full")]
        pool: String,
        /// Write the exposure panel to this Parquet file instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hf_factors=info,hf_exposure=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = FactorRegistry::with_defaults();

    match cli.command {
        Commands::List => list_factors(&registry),
        Commands::Info { factor } => show_factor_info(&registry, &factor)?,
        Commands::Compute { factor, input } => compute_factor(&registry, &factor, &input)?,
        Commands::Update {
            factor,
            source,
            panels,
            workers,
        } => update_panels(&registry, &factor, &source, &panels, workers)?,
        Commands::Resample {
            factor,
            panels,
            frequency,
            method,
            mode,
            pool,
            output,
        } => {
            let config = ResampleConfig::parse(&frequency, &method, &mode, &pool)?;
            resample_panel(&factor, &panels, &config, output.as_deref())?;
        }
    }
    Ok(())
}

/// List all available factors grouped by category.
fn list_factors(registry: &FactorRegistry) {
    let mut by_category: BTreeMap<FactorCategory, Vec<_>> = BTreeMap::new();
    for info in registry.all_info() {
        by_category.entry(info.category).or_default().push(info);
    }

    println!("Available Factors ({} total)\n", registry.len());

    for (category, mut factors) in by_category {
        println!("{category} ({}_):", category.prefix());
        factors.sort_by(|a, b| a.name.cmp(&b.name));
        for info in factors {
            println!("  {} - {}", info.name, info.description);
        }
        println!();
    }
}

/// Show detailed information about a specific factor.
fn show_factor_info(registry: &FactorRegistry, factor_name: &str) -> Result<(), Box<dyn Error>> {
    let factor = registry.get_arc(factor_name)?;

    println!("Factor: {}", factor.name());
    println!("Category: {}", factor.category());
    println!("Description: {}", factor.description());
    println!("Required columns:");
    for col in factor.required_columns() {
        println!("  - {col}");
    }
    Ok(())
}

/// Compute one factor over a minute-bar file and print the daily values.
fn compute_factor(
    registry: &FactorRegistry,
    factor_name: &str,
    input: &Path,
) -> Result<(), Box<dyn Error>> {
    let factor = registry.get_arc(factor_name)?;
    let bars = ParquetReader::new(File::open(input)?).finish()?;
    info!(factor = factor_name, rows = bars.height(), "Computing factor");

    let daily = factor.compute(&bars)?;
    println!("{daily}");
    Ok(())
}

fn progress_bar(len: usize, factor: &str) -> Result<ProgressBar, Box<dyn Error>> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.set_message(factor.to_string());
    Ok(pb)
}

fn print_report(report: &AssemblyReport) {
    println!(
        "{}: {} day(s) processed, {} row(s) appended, {} day(s) skipped, watermark {}",
        report.panel.factor(),
        report.processed.len(),
        report.appended,
        report.skipped.len(),
        report
            .panel
            .watermark()
            .map_or_else(|| "none".to_string(), |date| date.to_string()),
    );
    for skipped in &report.skipped {
        println!("  skipped {}: {}", skipped.date, skipped.reason);
    }
}

/// Extend the stored panel of one factor, or of every factor.
fn update_panels(
    registry: &FactorRegistry,
    factor_name: &str,
    source: &Path,
    panels: &Path,
    workers: Option<usize>,
) -> Result<(), Box<dyn Error>> {
    let factors: Vec<Arc<dyn Factor>> = if factor_name == "all" {
        registry
            .names()
            .into_iter()
            .map(|name| registry.get_arc(name))
            .collect::<Result<_, _>>()?
    } else {
        vec![registry.get_arc(factor_name)?]
    };

    let source = ParquetDaySource::open(source)?;
    let store = ParquetPanelStore::new(panels);
    let config = workers.map_or_else(AssemblerConfig::default, |workers| AssemblerConfig {
        workers,
    });

    let available = source.list_available_days()?;
    info!(days = available.len(), dir = ?source.dir(), "Found minute-bar days");

    for factor in factors {
        let existing = store.load_panel(factor.name())?;
        let pb = progress_bar(frontier(existing.as_ref(), &available).len(), factor.name())?;
        let tick = pb.clone();
        let assembler = PanelAssembler::new(config.clone()).with_progress(move |_| tick.inc(1));

        let report = assembler.update_panel(&store, &source, factor.as_ref())?;
        pb.finish_and_clear();
        print_report(&report);
    }
    Ok(())
}

/// Resample a stored panel and print or save the exposures.
fn resample_panel(
    factor_name: &str,
    panels: &Path,
    config: &ResampleConfig,
    output: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let store = ParquetPanelStore::new(panels);
    let panel = store
        .load_panel(factor_name)?
        .ok_or_else(|| format!("no stored panel for {factor_name} in {}", panels.display()))?;

    let exposure = resample(&panel, config);
    let mut df = exposure.to_frame()?;
    match output {
        Some(path) => {
            let mut file = File::create(path)?;
            ParquetWriter::new(&mut file).finish(&mut df)?;
            info!(column = exposure.column(), rows = exposure.len(), ?path, "Wrote exposures");
        }
        None => println!("{df}"),
    }
    Ok(())
}
