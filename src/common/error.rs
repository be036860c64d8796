//! Error types for the verification harness
//!
//! Every failure the engine can hit is a variant of [`Error`]. The runner
//! folds them into the six-way [`ErrorKind`] taxonomy when it builds an
//! [`Outcome`](crate::runner::Outcome), so callers branch on a small closed
//! set instead of matching on messages.

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Startup Errors ===
    #[error("Startup failed: {0}")]
    Startup(#[source] Box<Error>),

    #[error("Failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("No browser executable found. Searched: {searched}. Set [browser] executable in the config or the CHROME environment variable")]
    BrowserNotFound { searched: String },

    // === Step Errors ===
    #[error("Navigation to '{url}' did not commit within {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error("Navigation to '{url}' failed: {reason}")]
    NavigationFailed { url: String, reason: String },

    #[error("Element {locator} did not appear within {timeout_ms}ms")]
    LocatorTimeout { locator: String, timeout_ms: u64 },

    #[error("Element {locator} was still visible after {timeout_ms}ms")]
    StillVisible { locator: String, timeout_ms: u64 },

    #[error("Cannot interact with {locator}: {reason}")]
    Interaction { locator: String, reason: String },

    // === Artifact Errors ===
    #[error("Failed to capture screenshot '{path}': {reason}")]
    Capture { path: String, reason: String },

    // === Session Errors ===
    #[error("Browser session is {0}, expected open")]
    SessionNotOpen(String),

    #[error("Browser protocol error: {0}")]
    Browser(String),

    // === Scenario Errors ===
    #[error("Unknown scenario '{0}'. Run 'uiproof list' to see the built-in catalog")]
    ScenarioNotFound(String),

    #[error("Invalid scenario '{name}': {reason}")]
    InvalidScenario { name: String, reason: String },

    #[error("Failed to parse scenario file '{path}': {error}")]
    ScenarioParse { path: String, error: String },

    #[error("{failed} of {total} scenario(s) failed")]
    RunFailed { failed: usize, total: usize },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The closed set of failure classes reported in an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Base navigation or ready condition never satisfied
    StartupFailure,
    /// An element never satisfied its wait condition
    LocatorTimeout,
    NavigationTimeout,
    /// Element present but not actionable
    InteractionFailure,
    /// Artifact write failed
    CaptureFailure,
    /// Anything else, e.g. a crashed browser process
    UnexpectedFault,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StartupFailure => "StartupFailure",
            Self::LocatorTimeout => "LocatorTimeout",
            Self::NavigationTimeout => "NavigationTimeout",
            Self::InteractionFailure => "InteractionFailure",
            Self::CaptureFailure => "CaptureFailure",
            Self::UnexpectedFault => "UnexpectedFault",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Classify this error for outcome reporting
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Startup(_) | Error::BrowserLaunch(_) | Error::BrowserNotFound { .. } => {
                ErrorKind::StartupFailure
            }
            Error::LocatorTimeout { .. } | Error::StillVisible { .. } => ErrorKind::LocatorTimeout,
            Error::NavigationTimeout { .. } => ErrorKind::NavigationTimeout,
            Error::Interaction { .. } => ErrorKind::InteractionFailure,
            Error::Capture { .. } => ErrorKind::CaptureFailure,
            _ => ErrorKind::UnexpectedFault,
        }
    }

    /// Wrap an error raised while establishing the starting state
    pub fn startup(inner: Error) -> Self {
        match inner {
            already @ Error::Startup(_) => already,
            other => Error::Startup(Box::new(other)),
        }
    }

    /// Create an interaction error
    pub fn interaction(locator: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::Interaction {
            locator: locator.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a capture error
    pub fn capture(path: &std::path::Path, reason: impl fmt::Display) -> Self {
        Self::Capture {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid scenario error
    pub fn invalid_scenario(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidScenario {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a browser not found error with the names that were searched
    pub fn browser_not_found<S: AsRef<str>>(searched: &[S]) -> Self {
        Self::BrowserNotFound {
            searched: searched.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", "),
        }
    }
}
