//! Scenario definitions
//!
//! Scenarios come from two places: the built-in [`catalog`] and YAML files
//! read by [`loader`]. Both produce the same validated [`Scenario`] value.

pub mod catalog;
mod loader;
mod model;

pub use loader::{load_scenario_file, parse_scenario};
pub use model::{Locator, Scenario, ScenarioBuilder, Step, RESERVED_SUFFIXES};
