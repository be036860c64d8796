//! Built-in scenario catalog
//!
//! Each entry is a contract between the harness and the board game list UI:
//! it only holds if the application keeps exposing these roles, names, labels
//! and texts. Base URL and timeouts come from the configuration.

use crate::common::config::Config;
use crate::common::{Error, Result};

use super::model::{Locator, Scenario, ScenarioBuilder, Step};

/// Title that is always present once the mock board game list has loaded
pub const LIST_LANDMARK: &str = "Catan";
/// Query typed into the search box
pub const SEARCH_QUERY: &str = "Catan";
/// Nickname shown in the header of a freshly reset application
pub const CURRENT_NICKNAME: &str = "MockNick";
/// Nickname the edit scenario saves
pub const NEW_NICKNAME: &str = "NewNick";
/// Heading of the gacha dialog
pub const GACHA_PANEL: &str = "ボドゲガチャ";

const SEARCH_SETTLE_MS: u64 = 1_000;
const GACHA_ANIMATION_MS: u64 = 2_000;

/// Names of the built-in scenarios, in catalog order
pub const NAMES: &[&str] = &["smoke", "search", "gacha", "nickname"];

/// Build a catalog scenario by name
pub fn get(name: &str, config: &Config) -> Result<Scenario> {
    match name {
        "smoke" => smoke(config),
        "search" => search(config),
        "gacha" => gacha(config),
        "nickname" => nickname(config),
        _ => Err(Error::ScenarioNotFound(name.to_string())),
    }
}

/// Build every catalog scenario
pub fn all(config: &Config) -> Result<Vec<Scenario>> {
    NAMES.iter().map(|name| get(name, config)).collect()
}

fn base(name: &str, ready_text: &str, config: &Config) -> ScenarioBuilder {
    Scenario::builder(name, config.target.base_url.clone())
        .timeouts(config.timeouts)
        .ready(Step::wait_for(
            Locator::text(ready_text),
            config.timeouts.ready_ms,
        ))
}

/// The list loads and the landmark title is visible
pub fn smoke(config: &Config) -> Result<Scenario> {
    base("smoke", LIST_LANDMARK, config)
        .description("Application loads and shows the board game list")
        .build()
}

/// Type a query into the search box and let the filter settle
pub fn search(config: &Config) -> Result<Scenario> {
    base("search", LIST_LANDMARK, config)
        .description("Filter the board game list by title")
        .step(Step::fill(Locator::label("検索"), SEARCH_QUERY))
        // The list filters on input without an observable completion signal
        .step(Step::pause(SEARCH_SETTLE_MS))
        .build()
}

/// Open the gacha dialog and draw with the default settings
pub fn gacha(config: &Config) -> Result<Scenario> {
    let wait = config.timeouts.wait_ms;
    base("gacha", LIST_LANDMARK, config)
        .description("Open the gacha dialog and draw a random game")
        .step(Step::click(Locator::role("button", "ガチャ")))
        .step(Step::wait_for(Locator::text(GACHA_PANEL), wait))
        .step(Step::click(Locator::role("button", "ガチャ実行")))
        // Result animation
        .step(Step::pause(GACHA_ANIMATION_MS))
        .build()
}

/// Rename the current user through the header menu.
///
/// Mutates shared display state: needs a freshly reset application.
pub fn nickname(config: &Config) -> Result<Scenario> {
    let wait = config.timeouts.wait_ms;
    base("nickname", CURRENT_NICKNAME, config)
        .description("Edit the nickname from the user menu")
        .step(Step::click(Locator::text(CURRENT_NICKNAME)))
        .step(Step::click(Locator::role("menuitem", "ニックネームを編集")))
        .step(Step::wait_for(Locator::text("ニックネームを編集"), wait))
        .step(Step::fill(Locator::label("ニックネーム"), NEW_NICKNAME))
        .step(Step::click(Locator::role("button", "保存")))
        .step(Step::wait_for(Locator::text(NEW_NICKNAME), wait))
        .build()
}
