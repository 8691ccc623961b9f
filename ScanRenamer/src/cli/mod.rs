//! ScanRenamer CLI - Command-line interface for batch scan renaming

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;
use tracing::Level;

#[derive(Parser)]
#[command(name = "scanrenamer", version)]
#[command(about = "ScanRenamer: rename zipped 3D scans after their archive", long_about = None)]
struct Cli {
    /// Log pipeline details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Run the ScanRenamer CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for reports
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    cli.command.execute()?;

    Ok(())
}
