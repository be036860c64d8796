//! CLI command definitions
//!
//! Defines the clap commands for the uiproof CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run scenarios against the application and capture screenshots
    Run {
        /// Built-in scenario names or YAML scenario files, run in order
        #[arg(required = true, value_name = "SCENARIO|FILE")]
        scenarios: Vec<String>,

        /// Override the application base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Directory screenshots are written to
        #[arg(long)]
        artifacts_dir: Option<PathBuf>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Write a JSON run report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List the built-in scenarios
    #[command(alias = "ls")]
    List,

    /// Validate YAML scenario files without launching a browser
    Check {
        /// Scenario files to validate
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show which browser executable would be launched
    Browser,
}
