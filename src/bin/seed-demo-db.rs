use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use tracing::{info, warn};

use find_demo_lib::services::history_service::DEFAULT_SCANS;
use find_demo_lib::services::seed_service::{self, SeedOptions, DEFAULT_COUNT};
use find_demo_lib::services::synth_service::DEFAULT_SEED;
use find_demo_lib::{init_logging, AppError};

/// Seed find-anything source databases with synthetic file records for demo
/// screenshots, and rebuild their scan history over the past year.
#[derive(Parser, Debug)]
#[command(name = "seed-demo-db", version)]
struct Cli {
    /// find-anything data directory [default: platform data dir for find-anything]
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Source name (default: seed all sources found in data-dir)
    #[arg(long)]
    source: Option<String>,

    /// Number of fake file records to insert per source
    #[arg(long, default_value_t = DEFAULT_COUNT)]
    count: usize,

    /// Delete existing file records before seeding
    #[arg(long)]
    clear: bool,

    /// Number of scan history points to spread over the past year
    #[arg(long, default_value_t = DEFAULT_SCANS)]
    scans: usize,

    /// Random seed; the same seed reproduces the same records
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Create the source database if it does not exist yet
    #[arg(long, requires = "source")]
    init: bool,

    /// Log level (error,warn,info,debug,trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "find-anything")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .context("could not resolve a home directory; pass --data-dir")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    let options = SeedOptions {
        count: cli.count,
        clear: cli.clear,
        n_scans: cli.scans,
        seed: cli.seed,
        now: chrono::Utc::now().timestamp(),
    };

    let results = match seed_service::seed_all(
        &data_dir,
        cli.source.as_deref(),
        cli.init,
        &options,
    ) {
        Ok(results) => results,
        Err(AppError::NotFound(msg)) => {
            warn!("{msg}");
            warn!("Run find-server at least once to initialise it, or pass --source NAME --init.");
            return Ok(());
        }
        Err(e) => return Err(e).context("seeding source databases"),
    };

    let seeded = results.iter().filter(|(_, report)| report.is_some()).count();
    if seeded < results.len() {
        warn!("{} of {} databases skipped", results.len() - seeded, results.len());
    }
    info!("Done. Reload the stats page to see the updated data.");
    Ok(())
}
