//! uiproof - end-to-end UI verification harness
//!
//! Runs scripted user flows against a web application in Chrome and writes
//! a screenshot per scenario, `<scenario>_result` or `<scenario>_error`.

use std::path::PathBuf;

use clap::Parser;
use commands::Commands;
use uiproof::common::{config::Config, logging};
use uiproof::{cli, commands};

#[derive(Parser)]
#[command(name = "uiproof", about = "End-to-end UI verification with screenshots")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: platform config dir/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging for uiproof
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Also write logs to a file (default: platform data dir/logs/uiproof.log)
    #[arg(long, global = true, value_name = "PATH", require_equals = true)]
    log_file: Option<Option<PathBuf>>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_file = match cli.log_file {
        Some(Some(path)) => Some(path),
        Some(None) => logging::default_log_path(),
        None => None,
    };
    let guard = logging::init_cli(cli.verbose, log_file.as_deref());

    let result = match cli.config {
        Some(path) => Config::load_from(&path),
        None => Config::load(),
    };
    let result = match result {
        Ok(config) => cli::dispatch(cli.command, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        // exit() skips destructors; flush the log file first
        drop(guard);
        std::process::exit(1);
    }
}
