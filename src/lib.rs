//! uiproof - end-to-end UI verification harness
//!
//! Drives a running web application through a real browser, replays a
//! scripted user flow and records a screenshot proving the resulting state.

pub mod browser;
pub mod cli;
pub mod commands;
pub mod common;
pub mod runner;
pub mod scenario;
pub mod session;

// Re-export commonly used types for tests
pub use common::{Error, ErrorKind, Result};
pub use runner::{Artifact, ArtifactCapturer, ArtifactKind, Outcome, RunReport, ScenarioRunner};
pub use scenario::{Locator, Scenario, Step};
