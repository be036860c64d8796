//! Scenario execution engine
//!
//! [`ScenarioRunner::run`] drives one scenario through a fresh browser
//! session and always returns an [`Outcome`]: every error and panic below
//! this boundary is converted, and the session is released on every path.

mod artifact;
mod executor;
mod locator;
mod outcome;
mod report;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures_util::FutureExt;

pub use artifact::{Artifact, ArtifactCapturer, ArtifactKind};
pub use executor::{execute, StepContext};
pub use locator::{resolve, resolve_hidden};
pub use outcome::Outcome;
pub use report::{RunReport, ScenarioReport};

use crate::browser::BrowserLauncher;
use crate::common::{Error, ErrorKind};
use crate::scenario::Scenario;
use crate::session::{Session, SessionManager};

/// Where in the run a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Startup,
    /// 1-based declared step index
    Step(usize),
}

impl Phase {
    fn step_index(self) -> Option<usize> {
        match self {
            Phase::Startup => None,
            Phase::Step(i) => Some(i),
        }
    }
}

/// Runs scenarios, one session per run
pub struct ScenarioRunner {
    sessions: SessionManager,
    capturer: ArtifactCapturer,
}

impl ScenarioRunner {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, capturer: ArtifactCapturer) -> Self {
        Self {
            sessions: SessionManager::new(launcher),
            capturer,
        }
    }

    /// Run one scenario to its outcome
    pub async fn run(&self, scenario: &Scenario) -> Outcome {
        tracing::info!(scenario = scenario.name(), "Starting run");

        let mut session = match self.sessions.acquire().await {
            Ok(session) => session,
            Err(e) => {
                let err = Error::startup(e);
                tracing::error!(scenario = scenario.name(), "{}", err);
                return Outcome::Failure {
                    kind: err.kind(),
                    message: err.to_string(),
                    failed_step: None,
                    artifact: None,
                };
            }
        };

        let mut phase = Phase::Startup;
        let driven = AssertUnwindSafe(self.drive(scenario, &mut session, &mut phase))
            .catch_unwind()
            .await;
        let failure = match driven {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e),
            Err(panic) => Some(Error::Internal(format!(
                "panic during execution: {}",
                panic_message(panic.as_ref())
            ))),
        };

        let capture = self.capture_outcome(scenario, &mut session, failure.is_none());
        let captured = AssertUnwindSafe(capture)
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(Error::Internal(format!(
                    "panic during capture: {}",
                    panic_message(panic.as_ref())
                )))
            });

        if let Err(e) = session.release().await {
            tracing::warn!(scenario = scenario.name(), "Session release failed: {}", e);
        }

        let outcome = match (failure, captured) {
            (None, Ok(artifact)) => Outcome::Success { artifact },
            (None, Err(capture_err)) => Outcome::Failure {
                kind: ErrorKind::CaptureFailure,
                message: capture_err.to_string(),
                failed_step: None,
                artifact: None,
            },
            // The step error keeps its classification; a lost screenshot
            // only costs the artifact
            (Some(err), captured) => Outcome::Failure {
                kind: err.kind(),
                message: err.to_string(),
                failed_step: phase.step_index(),
                artifact: captured.ok(),
            },
        };

        match &outcome {
            Outcome::Success { artifact } => tracing::info!(
                scenario = scenario.name(),
                artifact = %artifact.path.display(),
                "Scenario passed"
            ),
            Outcome::Failure {
                kind,
                message,
                failed_step,
                ..
            } => tracing::error!(
                scenario = scenario.name(),
                step = ?failed_step,
                "{}: {}",
                kind,
                message
            ),
        }
        outcome
    }

    /// Run scenarios strictly one after another
    pub async fn run_all(&self, scenarios: &[Scenario]) -> RunReport {
        let started_at = Utc::now();
        let mut entries = Vec::with_capacity(scenarios.len());

        for scenario in scenarios {
            let scenario_start = Utc::now();
            let timer = std::time::Instant::now();
            let outcome = self.run(scenario).await;
            entries.push(ScenarioReport {
                scenario: scenario.name().to_string(),
                started_at: scenario_start,
                duration_ms: timer.elapsed().as_millis() as u64,
                outcome,
            });
        }

        RunReport::new(started_at, Utc::now(), entries)
    }

    /// Base navigation, ready condition, then declared steps in order
    async fn drive(
        &self,
        scenario: &Scenario,
        session: &mut Session,
        phase: &mut Phase,
    ) -> crate::common::Result<()> {
        let ctx = StepContext {
            scenario: scenario.name(),
            timeouts: scenario.timeouts(),
            capturer: &self.capturer,
        };
        let page = session.page()?;

        tracing::debug!(
            scenario = scenario.name(),
            url = scenario.base_url(),
            "Opening application"
        );
        execute(&scenario.base_navigation(), page, ctx)
            .await
            .map_err(Error::startup)?;
        execute(scenario.ready(), page, ctx)
            .await
            .map_err(Error::startup)?;

        let total = scenario.steps().len();
        for (i, step) in scenario.steps().iter().enumerate() {
            *phase = Phase::Step(i + 1);
            tracing::info!(scenario = scenario.name(), "[{}/{}] {}", i + 1, total, step);
            execute(step, page, ctx).await?;
        }
        Ok(())
    }

    async fn capture_outcome(
        &self,
        scenario: &Scenario,
        session: &mut Session,
        succeeded: bool,
    ) -> crate::common::Result<Artifact> {
        let kind = if succeeded {
            ArtifactKind::Result
        } else {
            ArtifactKind::Error
        };
        let page = session.page()?;
        let result = self.capturer.capture(page, scenario.name(), kind).await;
        if let Err(e) = &result {
            tracing::warn!(scenario = scenario.name(), "{}", e);
        }
        result
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
