//! Machine-readable summary of a batch of runs

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::outcome::Outcome;
use crate::common::Result;

/// One scenario's entry in a [`RunReport`]
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub outcome: Outcome,
}

/// Outcomes of a `run_all` batch, in execution order
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub passed: usize,
    pub failed: usize,
    pub scenarios: Vec<ScenarioReport>,
}

impl RunReport {
    pub(crate) fn new(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        scenarios: Vec<ScenarioReport>,
    ) -> Self {
        let passed = scenarios.iter().filter(|s| s.outcome.is_success()).count();
        Self {
            started_at,
            finished_at,
            passed,
            failed: scenarios.len() - passed,
            scenarios,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty-printed JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
