//! End-to-end integration tests for the scenario engine
//!
//! These tests run the real runner, session manager and executor against an
//! in-memory stand-in for the board game list application:
//! 1. A fake launcher hands out pages backed by shared application state
//! 2. Scenarios from the catalog and from YAML fixtures are run against it
//! 3. Outcomes, artifacts and the open/close bookkeeping are checked
//!
//! A final group drives the `uiproof` binary, and one ignored test uses a
//! real Chrome.

use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uiproof::browser::{BrowserLauncher, ElementHandle, PageDriver};
use uiproof::common::config::{Config, ImageFormat, Timeouts};
use uiproof::runner::{ArtifactCapturer, Outcome, ScenarioRunner};
use uiproof::scenario::{catalog, load_scenario_file, Locator, Scenario, Step};
use uiproof::{Error, ErrorKind, Result};

// ============== Fake application ==============

/// Knobs for inducing failures
#[derive(Debug, Clone)]
struct Behaviour {
    /// The ガチャ button reveals the dialog
    gacha_opens_panel: bool,
    launch_fails: bool,
    server_down: bool,
    screenshot_fails: bool,
    /// Panic when this element id is clicked
    panic_on_click: Option<&'static str>,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            gacha_opens_panel: true,
            launch_fails: false,
            server_down: false,
            screenshot_fails: false,
            panic_on_click: None,
        }
    }
}

/// Server-side state plus bookkeeping; survives across sessions
#[derive(Debug)]
struct Backend {
    nickname: String,
    opens: usize,
    closes: usize,
    aborts: usize,
    log: Vec<String>,
}

struct FakeApp {
    behaviour: Behaviour,
    backend: Mutex<Backend>,
}

impl FakeApp {
    fn new(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            backend: Mutex::new(Backend {
                nickname: catalog::CURRENT_NICKNAME.to_string(),
                opens: 0,
                closes: 0,
                aborts: 0,
                log: Vec::new(),
            }),
        })
    }

    /// Restore the seeded server state
    fn reset(&self) {
        self.backend.lock().unwrap().nickname = catalog::CURRENT_NICKNAME.to_string();
    }

    fn nickname(&self) -> String {
        self.backend.lock().unwrap().nickname.clone()
    }

    fn opens(&self) -> usize {
        self.backend.lock().unwrap().opens
    }

    fn closes(&self) -> usize {
        self.backend.lock().unwrap().closes
    }

    fn aborts(&self) -> usize {
        self.backend.lock().unwrap().aborts
    }

    fn log(&self) -> Vec<String> {
        self.backend.lock().unwrap().log.clone()
    }

    fn record(&self, entry: impl Into<String>) {
        self.backend.lock().unwrap().log.push(entry.into());
    }
}

struct FakeLauncher(Arc<FakeApp>);

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn PageDriver>> {
        if self.0.behaviour.launch_fails {
            return Err(Error::BrowserLaunch("chrome exited with status 1".into()));
        }
        {
            let mut backend = self.0.backend.lock().unwrap();
            backend.opens += 1;
            backend.log.push("open".into());
        }
        Ok(Box::new(FakePage {
            app: self.0.clone(),
            view: View::default(),
        }))
    }
}

/// Client-side state of one page
#[derive(Debug, Default)]
struct View {
    loaded: bool,
    search: String,
    gacha_panel: bool,
    gacha_drawn: bool,
    menu_open: bool,
    editing: Option<String>,
}

const TITLES: &[&str] = &["Catan", "Carcassonne", "Ticket to Ride"];

struct FakePage {
    app: Arc<FakeApp>,
    view: View,
}

impl FakePage {
    fn visible_texts(&self) -> Vec<String> {
        let mut texts: Vec<String> = TITLES
            .iter()
            .filter(|t| t.contains(self.view.search.as_str()))
            .map(|t| t.to_string())
            .collect();
        texts.push(self.app.nickname());
        if self.view.gacha_panel {
            texts.push("ボドゲガチャ".into());
        }
        if self.view.gacha_drawn {
            texts.push("Dominion".into());
        }
        if self.view.editing.is_some() {
            texts.push("ニックネームを編集".into());
        }
        texts
    }

    fn find(&self, locator: &Locator) -> Option<String> {
        let view = &self.view;
        if !view.loaded {
            return None;
        }
        let id = match locator {
            Locator::Role { role, name } => match (role.as_str(), name.as_str()) {
                ("button", "ガチャ") => "gacha-open",
                ("button", "ガチャ実行") if view.gacha_panel => "gacha-run",
                ("button", "閉じる") if view.gacha_panel => "gacha-close",
                ("menuitem", "ニックネームを編集") if view.menu_open => "menu-edit-nickname",
                ("button", "保存") if view.editing.is_some() => "nickname-save",
                _ => return None,
            },
            Locator::Label { label } => match label.as_str() {
                "検索" => "search-input",
                "ニックネーム" if view.editing.is_some() => "nickname-input",
                _ => return None,
            },
            Locator::Text { text } => {
                return self
                    .visible_texts()
                    .iter()
                    .find(|t| t.contains(text.as_str()))
                    .map(|t| format!("text:{}", t));
            }
        };
        Some(id.to_string())
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn goto(&mut self, url: &str, _timeout: Duration) -> Result<()> {
        self.app.record(format!("goto {}", url));
        if self.app.behaviour.server_down {
            return Err(Error::NavigationFailed {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_REFUSED".into(),
            });
        }
        self.view = View {
            loaded: true,
            ..View::default()
        };
        Ok(())
    }

    async fn probe(&mut self, locator: &Locator) -> Result<Option<ElementHandle>> {
        Ok(self.find(locator).map(|id| ElementHandle {
            id,
            tag: "div".into(),
        }))
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<()> {
        if self.app.behaviour.panic_on_click == Some(element.id.as_str()) {
            panic!("renderer crashed on {}", element.id);
        }
        self.app.record(format!("click {}", element.id));

        let nickname_header = format!("text:{}", self.app.nickname());
        match element.id.as_str() {
            "gacha-open" => self.view.gacha_panel = self.app.behaviour.gacha_opens_panel,
            "gacha-run" => self.view.gacha_drawn = true,
            "gacha-close" => {
                self.view.gacha_panel = false;
                self.view.gacha_drawn = false;
            }
            "menu-edit-nickname" => {
                self.view.menu_open = false;
                self.view.editing = Some(self.app.nickname());
            }
            "nickname-save" => {
                if let Some(value) = self.view.editing.take() {
                    self.app.backend.lock().unwrap().nickname = value;
                }
            }
            id if id == nickname_header => self.view.menu_open = true,
            _ => {}
        }
        Ok(())
    }

    async fn fill(&mut self, element: &ElementHandle, value: &str) -> Result<()> {
        match element.id.as_str() {
            "search-input" => self.view.search = value.to_string(),
            "nickname-input" => self.view.editing = Some(value.to_string()),
            other => return Err(Error::interaction(other, "element is not a text-entry control")),
        }
        self.app.record(format!("fill {}={}", element.id, value));
        Ok(())
    }

    async fn screenshot(&mut self, _format: ImageFormat) -> Result<Vec<u8>> {
        if self.app.behaviour.screenshot_fails {
            return Err(Error::Browser("Target closed".into()));
        }
        self.app.record("screenshot");
        Ok(format!("fake-png:{}", self.visible_texts().join("|")).into_bytes())
    }

    async fn close(&mut self) -> Result<()> {
        let mut backend = self.app.backend.lock().unwrap();
        backend.closes += 1;
        backend.log.push("close".into());
        Ok(())
    }

    fn abort(&mut self) {
        self.app.backend.lock().unwrap().aborts += 1;
    }
}

// ============== Test context ==============

/// Runner wired to a fake application and a temporary artifacts directory
struct TestContext {
    app: Arc<FakeApp>,
    runner: ScenarioRunner,
    config: Config,
    artifacts: tempfile::TempDir,
}

impl TestContext {
    fn new(behaviour: Behaviour) -> Self {
        let mut config = Config::default();
        config.timeouts = Timeouts {
            navigation_ms: 1_000,
            ready_ms: 1_000,
            wait_ms: 500,
            poll_interval_ms: 50,
        };
        let artifacts = tempfile::tempdir().expect("Failed to create artifacts dir");
        config.artifacts.dir = artifacts.path().to_path_buf();

        let app = FakeApp::new(behaviour);
        let capturer = ArtifactCapturer::new(artifacts.path(), ImageFormat::Png);
        let runner = ScenarioRunner::new(Arc::new(FakeLauncher(app.clone())), capturer);

        Self {
            app,
            runner,
            config,
            artifacts,
        }
    }

    fn scenario(&self, name: &str) -> Scenario {
        catalog::get(name, &self.config).expect("catalog scenario")
    }

    fn artifact(&self, file_name: &str) -> PathBuf {
        self.artifacts.path().join(file_name)
    }

    fn artifact_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.artifacts.path())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Log entries other than open/goto/close
    fn actions(&self) -> Vec<String> {
        self.app
            .log()
            .into_iter()
            .filter(|e| e != "open" && e != "close" && !e.starts_with("goto "))
            .collect()
    }
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn expect_failure(outcome: &Outcome) -> (ErrorKind, Option<usize>) {
    match outcome {
        Outcome::Failure {
            kind, failed_step, ..
        } => (*kind, *failed_step),
        other => panic!("Expected failure, got {other:?}"),
    }
}

// ============== Catalog scenarios ==============

#[tokio::test(start_paused = true)]
async fn test_smoke_success_writes_one_artifact() {
    let ctx = TestContext::new(Behaviour::default());
    let outcome = ctx.runner.run(&ctx.scenario("smoke")).await;

    assert!(outcome.is_success(), "{outcome:?}");
    assert_eq!(outcome.artifact_path(), Some(ctx.artifact("smoke_result.png").as_path()));
    assert_eq!(ctx.artifact_names(), vec!["smoke_result.png"]);
    assert_eq!(
        ctx.app.log(),
        vec!["open", "goto http://localhost:3000", "screenshot", "close"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_search_fills_query_then_captures() {
    let ctx = TestContext::new(Behaviour::default());
    let outcome = ctx.runner.run(&ctx.scenario("search")).await;

    assert!(outcome.is_success(), "{outcome:?}");
    assert_eq!(ctx.actions(), vec!["fill search-input=Catan", "screenshot"]);

    let shot = std::fs::read_to_string(ctx.artifact("search_result.png")).unwrap();
    assert!(shot.contains("Catan"));
    assert!(!shot.contains("Carcassonne"), "list was not filtered: {shot}");
}

#[tokio::test(start_paused = true)]
async fn test_gacha_opens_panel_before_execute() {
    let ctx = TestContext::new(Behaviour::default());
    let outcome = ctx.runner.run(&ctx.scenario("gacha")).await;

    assert!(outcome.is_success(), "{outcome:?}");
    assert_eq!(
        ctx.actions(),
        vec!["click gacha-open", "click gacha-run", "screenshot"]
    );
    assert!(ctx.artifact("gacha_result.png").exists());
}

#[tokio::test(start_paused = true)]
async fn test_gacha_without_panel_fails_with_locator_timeout() {
    let ctx = TestContext::new(Behaviour {
        gacha_opens_panel: false,
        ..Behaviour::default()
    });
    let outcome = ctx.runner.run(&ctx.scenario("gacha")).await;

    let (kind, step) = expect_failure(&outcome);
    assert_eq!(kind, ErrorKind::LocatorTimeout);
    assert_eq!(step, Some(2));
    if let Outcome::Failure { message, .. } = &outcome {
        assert!(message.contains("ボドゲガチャ"), "{message}");
    }

    // Execute is never clicked once the wait fails
    assert_eq!(ctx.actions(), vec!["click gacha-open", "screenshot"]);
    assert_eq!(ctx.artifact_names(), vec!["gacha_error.png"]);
    assert_eq!((ctx.app.opens(), ctx.app.closes()), (1, 1));
}

#[tokio::test(start_paused = true)]
async fn test_nickname_is_renamed() {
    let ctx = TestContext::new(Behaviour::default());
    let outcome = ctx.runner.run(&ctx.scenario("nickname")).await;

    assert!(outcome.is_success(), "{outcome:?}");
    assert_eq!(ctx.app.nickname(), catalog::NEW_NICKNAME);
    assert_eq!(
        ctx.actions(),
        vec![
            "click text:MockNick",
            "click menu-edit-nickname",
            "fill nickname-input=NewNick",
            "click nickname-save",
            "screenshot",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_sequential_runs_against_reset_app_agree() {
    let ctx = TestContext::new(Behaviour::default());
    let scenario = ctx.scenario("nickname");

    ctx.app.reset();
    let first = ctx.runner.run(&scenario).await;
    ctx.app.reset();
    let second = ctx.runner.run(&scenario).await;

    assert!(first.is_success());
    assert!(second.is_success());
    assert_eq!(first.artifact_path(), second.artifact_path());
    assert_eq!((ctx.app.opens(), ctx.app.closes()), (2, 2));
}

#[tokio::test(start_paused = true)]
async fn test_nickname_without_reset_cannot_start() {
    let ctx = TestContext::new(Behaviour::default());
    let scenario = ctx.scenario("nickname");

    assert!(ctx.runner.run(&scenario).await.is_success());
    // MockNick is gone until the application is reset
    let outcome = ctx.runner.run(&scenario).await;
    assert_eq!(expect_failure(&outcome), (ErrorKind::StartupFailure, None));
}

#[tokio::test(start_paused = true)]
async fn test_run_all_keeps_catalog_order() {
    let ctx = TestContext::new(Behaviour::default());
    let scenarios = catalog::all(&ctx.config).unwrap();

    let report = ctx.runner.run_all(&scenarios).await;

    assert!(report.all_passed());
    assert_eq!(report.passed, 4);
    let names: Vec<_> = report.scenarios.iter().map(|s| s.scenario.as_str()).collect();
    assert_eq!(names, catalog::NAMES);
    assert_eq!((ctx.app.opens(), ctx.app.closes()), (4, 4));
    assert_eq!(
        ctx.artifact_names(),
        vec![
            "gacha_result.png",
            "nickname_result.png",
            "search_result.png",
            "smoke_result.png"
        ]
    );
}

// ============== Failure paths ==============

#[tokio::test(start_paused = true)]
async fn test_launch_failure_is_startup_failure_without_artifact() {
    let ctx = TestContext::new(Behaviour {
        launch_fails: true,
        ..Behaviour::default()
    });
    let outcome = ctx.runner.run(&ctx.scenario("smoke")).await;

    assert_eq!(expect_failure(&outcome), (ErrorKind::StartupFailure, None));
    assert!(outcome.artifact().is_none());
    assert!(ctx.artifact_names().is_empty());
    assert_eq!((ctx.app.opens(), ctx.app.closes()), (0, 0));
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_app_is_startup_failure() {
    let ctx = TestContext::new(Behaviour {
        server_down: true,
        ..Behaviour::default()
    });
    let outcome = ctx.runner.run(&ctx.scenario("search")).await;

    assert_eq!(expect_failure(&outcome), (ErrorKind::StartupFailure, None));
    assert_eq!(ctx.artifact_names(), vec!["search_error.png"]);
    assert_eq!(ctx.app.closes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_panic_in_step_is_unexpected_fault_and_session_closes() {
    let ctx = TestContext::new(Behaviour {
        panic_on_click: Some("gacha-open"),
        ..Behaviour::default()
    });
    let outcome = ctx.runner.run(&ctx.scenario("gacha")).await;

    assert_eq!(expect_failure(&outcome), (ErrorKind::UnexpectedFault, Some(1)));
    assert!(ctx.artifact("gacha_error.png").exists());
    assert_eq!((ctx.app.opens(), ctx.app.closes(), ctx.app.aborts()), (1, 1, 0));
}

#[tokio::test(start_paused = true)]
async fn test_capture_failure_after_success() {
    let ctx = TestContext::new(Behaviour {
        screenshot_fails: true,
        ..Behaviour::default()
    });
    let outcome = ctx.runner.run(&ctx.scenario("smoke")).await;

    assert_eq!(expect_failure(&outcome), (ErrorKind::CaptureFailure, None));
    assert!(outcome.artifact().is_none());
    assert_eq!(ctx.app.closes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_capture_failure_keeps_step_classification() {
    let ctx = TestContext::new(Behaviour {
        gacha_opens_panel: false,
        screenshot_fails: true,
        ..Behaviour::default()
    });
    let outcome = ctx.runner.run(&ctx.scenario("gacha")).await;

    assert_eq!(expect_failure(&outcome), (ErrorKind::LocatorTimeout, Some(2)));
    assert!(outcome.artifact().is_none());
    assert_eq!(ctx.app.closes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_missing_element_bounded_by_timeout() {
    let ctx = TestContext::new(Behaviour::default());
    let scenario = Scenario::builder("missing", ctx.config.target.base_url.clone())
        .timeouts(ctx.config.timeouts)
        .ready(Step::wait_for(Locator::text("Catan"), 1_000))
        .step(Step::wait_for(Locator::text("Azul"), 300))
        .build()
        .unwrap();

    let started = tokio::time::Instant::now();
    let outcome = ctx.runner.run(&scenario).await;
    let elapsed = started.elapsed();

    assert_eq!(expect_failure(&outcome), (ErrorKind::LocatorTimeout, Some(1)));
    assert!(elapsed >= Duration::from_millis(300), "{elapsed:?}");
    assert!(elapsed <= Duration::from_millis(350), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_steps_after_failure_are_skipped() {
    let ctx = TestContext::new(Behaviour::default());
    let scenario = Scenario::builder("ordered", ctx.config.target.base_url.clone())
        .timeouts(ctx.config.timeouts)
        .ready(Step::wait_for(Locator::text("Catan"), 1_000))
        .step(Step::fill(Locator::label("検索"), "Car"))
        .step(Step::fill(Locator::role("button", "ガチャ"), "oops"))
        .step(Step::click(Locator::role("button", "ガチャ")))
        .build()
        .unwrap();

    let outcome = ctx.runner.run(&scenario).await;

    assert_eq!(
        expect_failure(&outcome),
        (ErrorKind::InteractionFailure, Some(2))
    );
    if let Outcome::Failure { message, .. } = &outcome {
        assert!(message.contains("role=button[name=\"ガチャ\"]"), "{message}");
    }
    assert_eq!(ctx.actions(), vec!["fill search-input=Car", "screenshot"]);
}

// ============== YAML scenarios ==============

#[tokio::test(start_paused = true)]
async fn test_yaml_scenario_with_checkpoint_and_hidden_wait() {
    let ctx = TestContext::new(Behaviour::default());
    let scenario = load_scenario_file(&fixture("gacha_close.yaml"), &ctx.config).unwrap();

    let outcome = ctx.runner.run(&scenario).await;

    assert!(outcome.is_success(), "{outcome:?}");
    assert_eq!(
        ctx.artifact_names(),
        vec!["gacha_close_panel.png", "gacha_close_result.png"]
    );
    let panel = std::fs::read_to_string(ctx.artifact("gacha_close_panel.png")).unwrap();
    assert!(panel.contains("ボドゲガチャ"));
    let result = std::fs::read_to_string(ctx.artifact("gacha_close_result.png")).unwrap();
    assert!(!result.contains("ボドゲガチャ"));
}

#[tokio::test(start_paused = true)]
async fn test_yaml_scenario_uses_config_base_url() {
    let mut ctx = TestContext::new(Behaviour::default());
    ctx.config.target.base_url = "http://127.0.0.1:5173".into();
    let scenario = load_scenario_file(&fixture("search.yaml"), &ctx.config).unwrap();
    assert_eq!(scenario.timeouts().wait_ms, 2_000);

    let outcome = ctx.runner.run(&scenario).await;

    assert!(outcome.is_success(), "{outcome:?}");
    assert!(ctx.app.log().contains(&"goto http://127.0.0.1:5173".to_string()));
}

#[test]
fn test_reserved_suffix_fixture_is_rejected() {
    let err = load_scenario_file(&fixture("reserved_suffix.yaml"), &Config::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidScenario { .. }), "{err:?}");
}

// ============== CLI ==============

/// Output from a uiproof invocation
#[derive(Debug)]
struct CliOutput {
    stdout: String,
    stderr: String,
    success: bool,
}

fn run_uiproof(args: &[&str]) -> CliOutput {
    let config = tempfile::NamedTempFile::new().expect("Failed to create config");
    std::fs::write(config.path(), "[target]\nbase_url = \"http://localhost:3000\"\n")
        .expect("Failed to write config");

    let output = Command::new(env!("CARGO_BIN_EXE_uiproof"))
        .arg("--config")
        .arg(config.path())
        .args(args)
        .output()
        .expect("Failed to run uiproof");

    CliOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
    }
}

#[test]
fn test_cli_list_shows_catalog() {
    let output = run_uiproof(&["list"]);
    assert!(output.success, "stderr: {}", output.stderr);
    for name in catalog::NAMES {
        assert!(output.stdout.contains(name), "missing {name}: {}", output.stdout);
    }
}

#[test]
fn test_cli_check_valid_fixtures() {
    let gacha = fixture("gacha_close.yaml");
    let search = fixture("search.yaml");
    let output = run_uiproof(&[
        "check",
        gacha.to_str().unwrap(),
        search.to_str().unwrap(),
    ]);
    assert!(output.success, "stdout: {}\nstderr: {}", output.stdout, output.stderr);
    assert!(output.stdout.contains("gacha_close"));
    assert!(output.stdout.contains("search_yaml"));
}

#[test]
fn test_cli_check_invalid_fixture_fails() {
    let bad = fixture("reserved_suffix.yaml");
    let output = run_uiproof(&["check", bad.to_str().unwrap()]);
    assert!(!output.success);
    assert!(output.stdout.contains("reserved"), "{}", output.stdout);
}

#[test]
fn test_cli_run_unknown_scenario() {
    let output = run_uiproof(&["run", "checkout"]);
    assert!(!output.success);
    assert!(output.stderr.contains("Unknown scenario 'checkout'"), "{}", output.stderr);
}

// ============== Real browser ==============

/// Percent-encode everything but ASCII alphanumerics
fn data_url(html: &str) -> String {
    let mut url = String::from("data:text/html;charset=utf-8,");
    for byte in html.bytes() {
        if byte.is_ascii_alphanumeric() {
            url.push(byte as char);
        } else {
            url.push_str(&format!("%{:02X}", byte));
        }
    }
    url
}

const GACHA_PAGE: &str = r#"<!doctype html>
<html><body>
<header><span id="nick">MockNick</span></header>
<label for="q">検索</label><input id="q">
<ul><li>Catan</li><li>Carcassonne</li></ul>
<button id="open">ガチャ</button>
<div id="panel" role="dialog" hidden>
  <h2>ボドゲガチャ</h2>
  <button id="run">ガチャ実行</button>
  <p id="drawn"></p>
</div>
<script>
document.getElementById('open').onclick = () => { document.getElementById('panel').hidden = false; };
document.getElementById('run').onclick = () => { document.getElementById('drawn').textContent = 'Dominion'; };
</script>
</body></html>"#;

#[tokio::test]
#[ignore = "requires Chrome or Chromium"]
async fn test_chrome_gacha_against_static_page() {
    use uiproof::browser::chrome::ChromeLauncher;
    use uiproof::browser::detect::find_browser;

    let mut config = Config::default();
    config.browser.no_sandbox = true;
    config.target.base_url = data_url(GACHA_PAGE);
    let (executable, _) = find_browser(&config.browser).expect("No browser found");

    let artifacts = tempfile::tempdir().unwrap();
    let launcher = ChromeLauncher::new(
        executable,
        config.browser.clone(),
        Duration::from_millis(config.timeouts.navigation_ms),
    );
    let runner = ScenarioRunner::new(
        Arc::new(launcher),
        ArtifactCapturer::new(artifacts.path(), ImageFormat::Png),
    );

    let search = catalog::search(&config).unwrap();
    let outcome = runner.run(&search).await;
    assert!(outcome.is_success(), "{outcome:?}");

    let gacha = catalog::gacha(&config).unwrap();
    let outcome = runner.run(&gacha).await;
    assert!(outcome.is_success(), "{outcome:?}");

    let png = std::fs::read(artifacts.path().join("gacha_result.png")).unwrap();
    assert!(png.starts_with(b"\x89PNG"));
}

/// A required field inside a dialog that is itself labelled by its title,
/// the way Material UI renders it
const NICKNAME_PAGE: &str = r#"<!doctype html>
<html><body>
<header><button id="nick">MockNick</button></header>
<ul id="menu" role="menu" hidden><li role="menuitem" id="edit">ニックネームを編集</li></ul>
<div id="dialog" role="dialog" aria-labelledby="title" hidden>
  <h2 id="title">ニックネームを編集</h2>
  <label for="field">ニックネーム<span aria-hidden="true"> *</span></label>
  <input id="field" required>
  <button id="save">保存</button>
</div>
<script>
const byId = (id) => document.getElementById(id);
byId('nick').onclick = () => { byId('menu').hidden = false; };
byId('edit').onclick = () => {
  byId('menu').hidden = true;
  byId('field').value = byId('nick').textContent;
  byId('dialog').hidden = false;
};
byId('save').onclick = () => {
  byId('nick').textContent = byId('field').value;
  byId('dialog').hidden = true;
};
</script>
</body></html>"#;

#[tokio::test]
#[ignore = "requires Chrome or Chromium"]
async fn test_chrome_nickname_fills_required_field_in_dialog() {
    use uiproof::browser::chrome::ChromeLauncher;
    use uiproof::browser::detect::find_browser;

    let mut config = Config::default();
    config.browser.no_sandbox = true;
    config.target.base_url = data_url(NICKNAME_PAGE);
    let (executable, _) = find_browser(&config.browser).expect("No browser found");

    let artifacts = tempfile::tempdir().unwrap();
    let launcher = ChromeLauncher::new(
        executable,
        config.browser.clone(),
        Duration::from_millis(config.timeouts.navigation_ms),
    );
    let runner = ScenarioRunner::new(
        Arc::new(launcher),
        ArtifactCapturer::new(artifacts.path(), ImageFormat::Png),
    );

    let nickname = catalog::nickname(&config).unwrap();
    let outcome = runner.run(&nickname).await;
    assert!(outcome.is_success(), "{outcome:?}");
    assert!(artifacts.path().join("nickname_result.png").exists());
}
