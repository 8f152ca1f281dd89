//! bntmx command line
//!
//! ```text
//! bntmx --build build maps
//! bntmx --build build --target rust --jobs 4 maps more_maps
//! ```

use anyhow::Result;
use bntmx::{run, BatchOptions, BuildConfig};
use bntmx_codegen::Target;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bntmx", version, about = "Compile Tiled maps for Butano games")]
struct Cli {
    /// Build directory receiving graphics/, include/ and src/
    #[arg(long)]
    build: PathBuf,

    /// Directories scanned for *.tmx maps
    #[arg(required = true)]
    mapsdirs: Vec<PathBuf>,

    /// Language of the generated sources (cpp or rust)
    #[arg(long)]
    target: Option<Target>,

    /// Maps converted concurrently
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Convert maps even when their outputs are up to date
    #[arg(long)]
    force: bool,

    /// Configuration file, defaults to ./bntmx.toml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase logging, repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = BuildConfig::discover(cli.config.as_deref())?.with_overrides(cli.target, cli.jobs);

    let options = BatchOptions::new(cli.build, cli.mapsdirs)
        .with_target(config.target)
        .with_jobs(config.jobs)
        .with_force(cli.force);

    let report = run(&options)?;
    info!(
        "{} converted, {} up to date, {} failed",
        report.converted(),
        report.up_to_date(),
        report.failed()
    );

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!("Some maps failed to convert");
        Ok(ExitCode::FAILURE)
    }
}
