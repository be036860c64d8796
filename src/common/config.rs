//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths::{config_path, DEFAULT_ARTIFACTS_DIR};
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Application under test
    #[serde(default)]
    pub target: TargetConfig,

    /// Browser launch settings
    #[serde(default)]
    pub browser: BrowserConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Screenshot output settings
    #[serde(default)]
    pub artifacts: ArtifactConfig,
}

/// Application under test
#[derive(Debug, Deserialize, Clone)]
pub struct TargetConfig {
    /// Base URL the scenarios navigate to first
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

/// Browser launch settings
#[derive(Debug, Deserialize, Clone)]
pub struct BrowserConfig {
    /// Path to a Chrome/Chromium executable (auto-detected when unset)
    #[serde(default)]
    pub executable: Option<PathBuf>,

    /// Run without a visible window
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Pass --no-sandbox (needed in most containers)
    #[serde(default)]
    pub no_sandbox: bool,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Extra command-line arguments for the browser
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            no_sandbox: false,
            window_width: default_window_width(),
            window_height: default_window_height(),
            args: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}

/// Timeout settings in milliseconds
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Timeout for a navigation to commit
    #[serde(default = "default_navigation")]
    pub navigation_ms: u64,

    /// Timeout for the ready condition after the base navigation
    #[serde(default = "default_ready")]
    pub ready_ms: u64,

    /// Default timeout for element waits, clicks and fills
    #[serde(default = "default_wait")]
    pub wait_ms: u64,

    /// How often a pending locator is re-probed
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation_ms: default_navigation(),
            ready_ms: default_ready(),
            wait_ms: default_wait(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl Timeouts {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

fn default_navigation() -> u64 {
    30_000
}
fn default_ready() -> u64 {
    20_000
}
fn default_wait() -> u64 {
    5_000
}
fn default_poll_interval() -> u64 {
    100
}

/// Screenshot image format
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    /// File extension used for artifacts in this format
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }
}

/// Screenshot output settings
#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactConfig {
    /// Directory screenshots are written to
    #[serde(default = "default_artifacts_dir")]
    pub dir: PathBuf,

    #[serde(default)]
    pub format: ImageFormat,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: default_artifacts_dir(),
            format: ImageFormat::default(),
        }
    }
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACTS_DIR)
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path; the file must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.target.base_url.trim().is_empty() {
            return Err(super::Error::Config("target.base_url must not be empty".into()));
        }
        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(super::Error::Config(
                "browser.window_width and browser.window_height must be positive".into(),
            ));
        }
        Ok(())
    }
}
