//! CLI command handling
//!
//! Resolves scenarios, builds the runner and formats output.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;

use crate::browser::chrome::ChromeLauncher;
use crate::browser::detect;
use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::runner::{ArtifactCapturer, Outcome, RunReport, ScenarioRunner};
use crate::scenario::{self, catalog, Scenario};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Run {
            scenarios,
            base_url,
            artifacts_dir,
            headed,
            report,
        } => {
            if let Some(base_url) = base_url {
                config.target.base_url = base_url;
            }
            if let Some(dir) = artifacts_dir {
                config.artifacts.dir = dir;
            }
            if headed {
                config.browser.headless = false;
            }

            let scenarios = scenarios
                .iter()
                .map(|arg| resolve_scenario(arg, &config))
                .collect::<Result<Vec<_>>>()?;

            let (executable, source) = detect::find_browser(&config.browser)?;
            tracing::debug!("Using browser {} (from {})", executable.display(), source);

            // Individual CDP calls must outlive the slowest navigation; the
            // executor enforces the real limit
            let request_timeout = scenarios
                .iter()
                .map(Scenario::longest_navigation)
                .max()
                .unwrap_or_else(|| Duration::from_millis(config.timeouts.navigation_ms));
            let launcher = ChromeLauncher::new(executable, config.browser.clone(), request_timeout);
            let capturer = ArtifactCapturer::new(&config.artifacts.dir, config.artifacts.format);
            let runner = ScenarioRunner::new(Arc::new(launcher), capturer);

            let run_report = runner.run_all(&scenarios).await;
            print_report(&run_report);

            if let Some(path) = report {
                run_report.write(&path)?;
                println!("\nReport written to {}", path.display().to_string().dimmed());
            }

            if run_report.all_passed() {
                Ok(())
            } else {
                Err(Error::RunFailed {
                    failed: run_report.failed,
                    total: run_report.scenarios.len(),
                })
            }
        }

        Commands::List => {
            println!("{}", "Built-in scenarios:".cyan());
            for scenario in catalog::all(&config)? {
                println!(
                    "  {:<10} {} {}",
                    scenario.name().white().bold(),
                    scenario.description().unwrap_or_default(),
                    format!("({} steps)", scenario.steps().len()).dimmed()
                );
            }
            println!("\nBase URL: {}", config.target.base_url);
            Ok(())
        }

        Commands::Check { files } => {
            let mut invalid = 0;
            for path in &files {
                match scenario::load_scenario_file(path, &config) {
                    Ok(scenario) => println!(
                        "  {} {} {}",
                        "✓".green(),
                        scenario.name(),
                        format!("({} steps, {})", scenario.steps().len(), path.display()).dimmed()
                    ),
                    Err(e) => {
                        invalid += 1;
                        println!("  {} {}", "✗".red(), e);
                    }
                }
            }
            if invalid == 0 {
                Ok(())
            } else {
                Err(Error::Config(format!(
                    "{} of {} scenario file(s) are invalid",
                    invalid,
                    files.len()
                )))
            }
        }

        Commands::Browser => {
            let (executable, source) = detect::find_browser(&config.browser)?;
            println!("{} {}", executable.display(), format!("(from {})", source).dimmed());
            Ok(())
        }
    }
}

/// A catalog name, or a path to a YAML scenario file
fn resolve_scenario(arg: &str, config: &Config) -> Result<Scenario> {
    let path = Path::new(arg);
    let is_file = path.exists()
        || matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
    if is_file {
        scenario::load_scenario_file(path, config)
    } else {
        catalog::get(arg, config)
    }
}

fn print_report(report: &RunReport) {
    println!("\n{}", "Results:".cyan());
    for entry in &report.scenarios {
        match &entry.outcome {
            Outcome::Success { artifact } => println!(
                "  {} {} {}",
                "✓".green(),
                entry.scenario.white().bold(),
                artifact.path.display().to_string().dimmed()
            ),
            Outcome::Failure {
                kind,
                message,
                failed_step,
                artifact,
            } => {
                let at = failed_step
                    .map(|i| format!(" at step {}", i))
                    .unwrap_or_default();
                println!(
                    "  {} {} {}{}",
                    "✗".red(),
                    entry.scenario.white().bold(),
                    kind.to_string().red(),
                    at
                );
                println!("      {}", message);
                if let Some(artifact) = artifact {
                    println!("      {}", artifact.path.display().to_string().dimmed());
                }
            }
        }
    }

    let summary = format!("{} passed, {} failed", report.passed, report.failed);
    if report.all_passed() {
        println!("\n{}", summary.green().bold());
    } else {
        println!("\n{}", summary.red().bold());
    }
}
