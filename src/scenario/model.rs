//! Scenario data model
//!
//! A [`Scenario`] is plain, immutable data: a name, a base URL, a ready
//! condition and an ordered list of [`Step`]s. The executor interprets steps;
//! nothing here touches a browser.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::config::Timeouts;
use crate::common::{Error, Result};

/// Artifact suffixes the runner writes itself
pub const RESERVED_SUFFIXES: &[&str] = &["result", "error"];

/// Declarative reference to an element in the rendered page
///
/// Carries no runtime handle. Every use resolves it again against the live
/// page, since the node may not exist yet or may have been re-rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Locator {
    /// Accessibility role and exact, case-sensitive accessible name
    Role { role: String, name: String },
    /// Rendered text equal to or containing the string
    Text { text: String },
    /// Form control associated with a label bearing the text
    Label { label: String },
}

impl Locator {
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self::Label {
            label: label.into(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Role { role, name } => write!(f, "role={}[name={:?}]", role, name),
            Locator::Text { text } => write!(f, "text={:?}", text),
            Locator::Label { label } => write!(f, "label={:?}", label),
        }
    }
}

/// One atomic interaction or wait instruction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Load a URL and wait for the navigation to commit
    Navigate {
        url: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },
    /// Wait until the element is present and visible
    WaitFor {
        locator: Locator,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },
    /// Wait until no visible element matches
    WaitForHidden {
        locator: Locator,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },
    /// Resolve the element, then click it
    Click { locator: Locator },
    /// Resolve a text-entry control and replace its value
    Fill { locator: Locator, value: String },
    /// Fixed settle delay with no condition check.
    ///
    /// Non-deterministic: prefer `wait_for` wherever the application exposes
    /// a completion signal.
    Pause { duration_ms: u64 },
    /// Write a checkpoint screenshot; never fails the run
    Capture { suffix: String },
}

impl Step {
    pub fn navigate(url: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Navigate {
            url: url.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    pub fn wait_for(locator: Locator, timeout_ms: u64) -> Self {
        Self::WaitFor {
            locator,
            timeout_ms: Some(timeout_ms),
        }
    }

    pub fn wait_for_hidden(locator: Locator, timeout_ms: u64) -> Self {
        Self::WaitForHidden {
            locator,
            timeout_ms: Some(timeout_ms),
        }
    }

    pub fn click(locator: Locator) -> Self {
        Self::Click { locator }
    }

    pub fn fill(locator: Locator, value: impl Into<String>) -> Self {
        Self::Fill {
            locator,
            value: value.into(),
        }
    }

    pub fn pause(duration_ms: u64) -> Self {
        Self::Pause { duration_ms }
    }

    pub fn capture(suffix: impl Into<String>) -> Self {
        Self::Capture {
            suffix: suffix.into(),
        }
    }

    /// Short action name, as used in scenario files
    pub fn action(&self) -> &'static str {
        match self {
            Step::Navigate { .. } => "navigate",
            Step::WaitFor { .. } => "wait_for",
            Step::WaitForHidden { .. } => "wait_for_hidden",
            Step::Click { .. } => "click",
            Step::Fill { .. } => "fill",
            Step::Pause { .. } => "pause",
            Step::Capture { .. } => "capture",
        }
    }

    /// True for steps that block on an observable page condition
    pub fn is_condition(&self) -> bool {
        matches!(self, Step::WaitFor { .. } | Step::WaitForHidden { .. })
    }

    /// Effective timeout for this step, falling back to the scenario defaults
    pub fn timeout(&self, defaults: &Timeouts) -> Option<Duration> {
        let ms = match self {
            Step::Navigate { timeout_ms, .. } => timeout_ms.unwrap_or(defaults.navigation_ms),
            Step::WaitFor { timeout_ms, .. } | Step::WaitForHidden { timeout_ms, .. } => {
                timeout_ms.unwrap_or(defaults.wait_ms)
            }
            Step::Click { .. } | Step::Fill { .. } => defaults.wait_ms,
            Step::Pause { .. } | Step::Capture { .. } => return None,
        };
        Some(Duration::from_millis(ms))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Navigate { url, .. } => write!(f, "navigate {}", url),
            Step::WaitFor { locator, .. } => write!(f, "wait for {}", locator),
            Step::WaitForHidden { locator, .. } => write!(f, "wait for {} to hide", locator),
            Step::Click { locator } => write!(f, "click {}", locator),
            // The value may be a credential; only its length is shown
            Step::Fill { locator, value } => {
                write!(f, "fill {} ({} chars)", locator, value.chars().count())
            }
            Step::Pause { duration_ms } => write!(f, "pause {}ms", duration_ms),
            Step::Capture { suffix } => write!(f, "capture '{}'", suffix),
        }
    }
}

/// An ordered, named sequence of steps representing one user flow
///
/// Construct with [`Scenario::builder`]; once built it cannot be changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    name: String,
    description: Option<String>,
    base_url: String,
    ready: Step,
    steps: Vec<Step>,
    timeouts: Timeouts,
}

impl Scenario {
    pub fn builder(name: impl Into<String>, base_url: impl Into<String>) -> ScenarioBuilder {
        ScenarioBuilder {
            name: name.into(),
            description: None,
            base_url: base_url.into(),
            ready: None,
            steps: Vec::new(),
            timeouts: Timeouts::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Condition establishing that the application finished loading
    pub fn ready(&self) -> &Step {
        &self.ready
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// The base navigation every run starts with
    pub fn base_navigation(&self) -> Step {
        Step::navigate(self.base_url.clone(), self.timeouts.navigation_ms)
    }

    /// Longest navigation this scenario may wait for, base or declared
    pub fn longest_navigation(&self) -> Duration {
        let longest = self
            .steps
            .iter()
            .filter_map(|step| match step {
                Step::Navigate { timeout_ms, .. } => *timeout_ms,
                _ => None,
            })
            .fold(self.timeouts.navigation_ms, u64::max);
        Duration::from_millis(longest)
    }
}

/// Builder for [`Scenario`]; `build` validates the result
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    name: String,
    description: Option<String>,
    base_url: String,
    ready: Option<Step>,
    steps: Vec<Step>,
    timeouts: Timeouts,
}

impl ScenarioBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn ready(mut self, step: Step) -> Self {
        self.ready = Some(step);
        self
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn build(self) -> Result<Scenario> {
        validate_name(&self.name)?;

        if self.base_url.trim().is_empty() {
            return Err(Error::invalid_scenario(&self.name, "base_url must not be empty"));
        }

        let ready = self
            .ready
            .ok_or_else(|| Error::invalid_scenario(&self.name, "missing ready condition"))?;
        if !ready.is_condition() {
            return Err(Error::invalid_scenario(
                &self.name,
                format!(
                    "ready condition must be wait_for or wait_for_hidden, got {}",
                    ready.action()
                ),
            ));
        }

        for (i, step) in self.steps.iter().enumerate() {
            if let Step::Capture { suffix } = step {
                validate_suffix(suffix).map_err(|reason| {
                    Error::invalid_scenario(&self.name, format!("step {}: {}", i + 1, reason))
                })?;
            }
        }

        Ok(Scenario {
            name: self.name,
            description: self.description,
            base_url: self.base_url,
            ready,
            steps: self.steps,
            timeouts: self.timeouts,
        })
    }
}

fn is_path_safe(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Scenario names become artifact file names
fn validate_name(name: &str) -> Result<()> {
    if is_path_safe(name) {
        Ok(())
    } else {
        Err(Error::invalid_scenario(
            name,
            "name must be non-empty and use only ASCII letters, digits, '_' or '-'",
        ))
    }
}

/// Artifact files are `<scenario>_<suffix>`; a suffix without '_' keeps that
/// split unambiguous, so no two scenarios can write the same file
fn validate_suffix(suffix: &str) -> std::result::Result<(), String> {
    if !is_path_safe(suffix) || suffix.contains('_') {
        return Err(format!(
            "capture suffix '{}' must use only ASCII letters, digits or '-'",
            suffix
        ));
    }
    if RESERVED_SUFFIXES.contains(&suffix) {
        return Err(format!("capture suffix '{}' is reserved", suffix));
    }
    Ok(())
}
