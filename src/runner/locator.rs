//! Locator resolution by polling
//!
//! The page is probed until the locator matches (or stops matching, for
//! [`resolve_hidden`]) or the deadline passes. The last probe happens no
//! later than the deadline, so a miss is reported within `timeout` plus one
//! probe round trip.

use std::time::Duration;

use tokio::time::Instant;

use crate::browser::{ElementHandle, PageDriver};
use crate::common::{Error, Result};
use crate::scenario::Locator;

/// Outcome of a single probe
enum Probe {
    Found(ElementHandle),
    Missing,
    /// Protocol error, typically a script evaluated while the page navigates
    /// or re-renders. Counts as neither present nor absent.
    Failed(Error),
}

async fn probe_once(page: &mut dyn PageDriver, locator: &Locator) -> Result<Probe> {
    match page.probe(locator).await {
        Ok(Some(element)) => Ok(Probe::Found(element)),
        Ok(None) => Ok(Probe::Missing),
        Err(e @ Error::Browser(_)) => {
            tracing::debug!(%locator, "Probe failed, retrying: {}", e);
            Ok(Probe::Failed(e))
        }
        Err(e) => Err(e),
    }
}

/// Wait for the first visible element matching `locator`
pub async fn resolve(
    page: &mut dyn PageDriver,
    locator: &Locator,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<ElementHandle> {
    let deadline = Instant::now() + timeout;
    let mut probes = 0u32;
    let mut last_error = None;

    loop {
        probes += 1;
        match probe_once(page, locator).await? {
            Probe::Found(element) => {
                tracing::debug!(%locator, id = %element.id, probes, "Resolved");
                return Ok(element);
            }
            Probe::Missing => last_error = None,
            Probe::Failed(e) => last_error = Some(e),
        }
        if !sleep_until_next(deadline, poll_interval).await {
            tracing::debug!(%locator, probes, "Gave up");
            return Err(last_error.unwrap_or_else(|| Error::LocatorTimeout {
                locator: locator.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }));
        }
    }
}

/// Wait until no visible element matches `locator`
pub async fn resolve_hidden(
    page: &mut dyn PageDriver,
    locator: &Locator,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    let mut last_error = None;

    loop {
        match probe_once(page, locator).await? {
            Probe::Missing => return Ok(()),
            Probe::Found(_) => last_error = None,
            Probe::Failed(e) => last_error = Some(e),
        }
        if !sleep_until_next(deadline, poll_interval).await {
            return Err(last_error.unwrap_or_else(|| Error::StillVisible {
                locator: locator.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }));
        }
    }
}

/// Sleep one poll interval, clamped to the deadline. Returns false once the
/// deadline has already been reached.
async fn sleep_until_next(deadline: Instant, poll_interval: Duration) -> bool {
    let now = Instant::now();
    if now >= deadline {
        return false;
    }
    tokio::time::sleep_until((now + poll_interval).min(deadline)).await;
    true
}
