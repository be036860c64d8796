//! YAML scenario files
//!
//! A scenario file mirrors the data model:
//!
//! ```yaml
//! name: search
//! description: Filter the list by title
//! ready:
//!   action: wait_for
//!   locator: { by: text, text: Catan }
//!   timeout_ms: 20000
//! steps:
//!   - action: fill
//!     locator: { by: label, label: 検索 }
//!     value: Catan
//!   - action: pause
//!     duration_ms: 1000
//! ```
//!
//! `base_url` and `timeouts` are optional and fall back to the configuration.

use std::path::Path;

use serde::Deserialize;

use crate::common::config::{Config, Timeouts};
use crate::common::{Error, Result};

use super::model::{Scenario, Step};

/// On-disk shape of a scenario
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    ready: Step,
    #[serde(default)]
    steps: Vec<Step>,
    #[serde(default)]
    timeouts: TimeoutOverrides,
}

/// Per-scenario timeout overrides; unset fields keep the configured value
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct TimeoutOverrides {
    navigation_ms: Option<u64>,
    ready_ms: Option<u64>,
    wait_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
}

impl TimeoutOverrides {
    fn apply(&self, base: Timeouts) -> Timeouts {
        Timeouts {
            navigation_ms: self.navigation_ms.unwrap_or(base.navigation_ms),
            ready_ms: self.ready_ms.unwrap_or(base.ready_ms),
            wait_ms: self.wait_ms.unwrap_or(base.wait_ms),
            poll_interval_ms: self.poll_interval_ms.unwrap_or(base.poll_interval_ms),
        }
    }
}

/// Load and validate a scenario from a YAML file
pub fn load_scenario_file(path: &Path, config: &Config) -> Result<Scenario> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    parse_scenario(&content, &path.display().to_string(), config)
}

/// Parse and validate a scenario from YAML text
///
/// `origin` names the source in error messages.
pub fn parse_scenario(content: &str, origin: &str, config: &Config) -> Result<Scenario> {
    let file: ScenarioFile = serde_yaml::from_str(content).map_err(|e| Error::ScenarioParse {
        path: origin.to_string(),
        error: e.to_string(),
    })?;

    let timeouts = file.timeouts.apply(config.timeouts);

    // A ready condition without its own timeout uses the ready default, not
    // the general wait default.
    let ready = match file.ready {
        Step::WaitFor {
            locator,
            timeout_ms: None,
        } => Step::wait_for(locator, timeouts.ready_ms),
        Step::WaitForHidden {
            locator,
            timeout_ms: None,
        } => Step::wait_for_hidden(locator, timeouts.ready_ms),
        other => other,
    };

    let base_url = file
        .base_url
        .unwrap_or_else(|| config.target.base_url.clone());

    let mut builder = Scenario::builder(file.name, base_url)
        .ready(ready)
        .steps(file.steps)
        .timeouts(timeouts);
    if let Some(description) = file.description {
        builder = builder.description(description);
    }
    builder.build()
}
