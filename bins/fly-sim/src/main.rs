//! FLY emission simulator binary.
//!
//! Resolves a configuration for the chosen variant, runs the monthly emission
//! loop and writes one CSV row per rewarded real-estate sale.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use fly_core::types::{RunSummary, Variant};
use fly_emission::{CsvReport, EmissionSimulator};
use tracing::{error, info};

mod settings;

use settings::Overrides;

/// FLY reward emission simulator.
#[derive(Parser, Debug)]
#[command(
    name = "fly-sim",
    version,
    about = "Simulate FLY reward emission over real-estate sales and write a CSV report"
)]
struct Args {
    /// Emission model (deterministic, stochastic, refined)
    #[arg(long, default_value = "refined")]
    variant: Variant,

    /// TOML file overriding preset parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report path; an existing file is overwritten
    #[arg(long, default_value = "fly_reward.csv")]
    output: PathBuf,

    /// Seed of the demand random walk
    #[arg(long)]
    seed: Option<u64>,

    /// Number of simulated months
    #[arg(long)]
    months: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Print the resolved configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            seed: self.seed,
            months: self.months,
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level, &args.log_format);

    if let Err(e) = run(&args) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = settings::load(args.variant, args.config.as_deref(), args.overrides())?;

    if args.print_config {
        print!("{}", settings::render(&config)?);
        return Ok(());
    }

    info!("FLY emission simulator v{}", env!("CARGO_PKG_VERSION"));
    info!("output: {}", args.output.display());

    let mut report = CsvReport::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    let summary = EmissionSimulator::new(config)?.run(&mut report)?;
    log_summary(&summary);
    Ok(())
}

fn log_summary(summary: &RunSummary) {
    info!(
        outcome = %summary.outcome,
        months = summary.months_simulated,
        sales = summary.total_sales,
        remaining_supply = summary.remaining_supply,
        rmc = summary.mint_coefficient,
        avidity = summary.avidity,
        halvings = summary.halvings,
        "run summary"
    );
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// `RUST_LOG` takes precedence over `level_str`. Pass `format = "json"` for
/// structured output; any other value gives human-readable text.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
