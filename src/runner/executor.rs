//! Step execution against a live page

use std::time::Duration;

use super::artifact::{ArtifactCapturer, ArtifactKind};
use super::locator::{resolve, resolve_hidden};
use crate::browser::PageDriver;
use crate::common::config::Timeouts;
use crate::common::{Error, Result};
use crate::scenario::{Locator, Step};

/// Everything a step needs besides the page
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub scenario: &'a str,
    pub timeouts: &'a Timeouts,
    pub capturer: &'a ArtifactCapturer,
}

/// Execute one step. Returns at the first error; nothing is retried.
pub async fn execute(step: &Step, page: &mut dyn PageDriver, ctx: StepContext<'_>) -> Result<()> {
    let timeout = step.timeout(ctx.timeouts).unwrap_or(Duration::ZERO);
    let poll = ctx.timeouts.poll_interval();

    match step {
        Step::Navigate { url, .. } => {
            match tokio::time::timeout(timeout, page.goto(url, timeout)).await {
                Ok(result) => result,
                Err(_) => Err(Error::NavigationTimeout {
                    url: url.clone(),
                    timeout_ms: timeout.as_millis() as u64,
                }),
            }
        }

        Step::WaitFor { locator, .. } => resolve(page, locator, timeout, poll).await.map(|_| ()),

        Step::WaitForHidden { locator, .. } => resolve_hidden(page, locator, timeout, poll).await,

        Step::Click { locator } => {
            let element = resolve(page, locator, timeout, poll).await?;
            page.click(&element).await.map_err(|e| relabel(e, locator))
        }

        Step::Fill { locator, value } => {
            let element = resolve(page, locator, timeout, poll).await?;
            page.fill(&element, value).await.map_err(|e| relabel(e, locator))
        }

        Step::Pause { duration_ms } => {
            tokio::time::sleep(Duration::from_millis(*duration_ms)).await;
            Ok(())
        }

        Step::Capture { suffix } => {
            let kind = ArtifactKind::Checkpoint(suffix.clone());
            if let Err(e) = ctx.capturer.capture(page, ctx.scenario, kind).await {
                tracing::warn!("Checkpoint capture failed: {}", e);
            }
            Ok(())
        }
    }
}

/// Drivers only know element ids; report interaction errors by locator
fn relabel(err: Error, locator: &Locator) -> Error {
    match err {
        Error::Interaction { reason, .. } => Error::interaction(locator, reason),
        other => other,
    }
}
