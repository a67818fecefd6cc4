use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use find_demo_lib::init_logging;
use find_demo_lib::services::demo_tree_service::{self, DEFAULT_ROOT};

/// Generate a synthetic file tree (source, notes, EXIF photos, archives) for
/// find-anything README and marketing screenshots.
#[derive(Parser, Debug)]
#[command(name = "generate-demo-data", version)]
struct Cli {
    /// Output directory; deleted and recreated on every run
    #[arg(long, default_value = DEFAULT_ROOT)]
    root: PathBuf,

    /// Log level (error,warn,info,debug,trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    info!("Generating demo data in {}/", cli.root.display());
    let report = demo_tree_service::generate(&cli.root)
        .with_context(|| format!("generating demo tree in {}", cli.root.display()))?;
    info!(
        "Done: {} files created ({} text, {} JSON, {} JPEG, {} archives).",
        report.total(),
        report.text,
        report.json,
        report.images,
        report.archives
    );

    println!("Add to find-client config:\n");
    print!("{}", demo_tree_service::client_config(&cli.root));
    Ok(())
}
