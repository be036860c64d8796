//! Browser executable detection
//!
//! Resolution order: the configured `browser.executable`, the `CHROME`
//! environment variable, then well-known Chrome/Chromium names on `PATH`.

use std::path::{Path, PathBuf};

use crate::common::config::BrowserConfig;
use crate::common::{Error, Result};

/// Environment variable naming a browser executable
pub const CHROME_ENV: &str = "CHROME";

/// Executable names searched on PATH, most specific first
const CANDIDATES: &[&str] = &[
    "google-chrome-stable",
    "google-chrome",
    "chromium",
    "chromium-browser",
    "chrome",
    "msedge",
];

#[cfg(target_os = "macos")]
const APP_BUNDLES: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

#[cfg(not(target_os = "macos"))]
const APP_BUNDLES: &[&str] = &[];

/// Where a browser executable was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserSource {
    Config,
    Environment,
    Path,
    AppBundle,
}

impl std::fmt::Display for BrowserSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config => write!(f, "config"),
            Self::Environment => write!(f, "${}", CHROME_ENV),
            Self::Path => write!(f, "PATH"),
            Self::AppBundle => write!(f, "application bundle"),
        }
    }
}

/// Find the browser executable to launch
pub fn find_browser(config: &BrowserConfig) -> Result<(PathBuf, BrowserSource)> {
    find_browser_with_env(config, std::env::var_os(CHROME_ENV).map(PathBuf::from))
}

fn find_browser_with_env(
    config: &BrowserConfig,
    env_value: Option<PathBuf>,
) -> Result<(PathBuf, BrowserSource)> {
    // An explicit setting must be honoured or reported, never silently skipped
    if let Some(path) = &config.executable {
        return if is_executable_file(path) {
            Ok((path.clone(), BrowserSource::Config))
        } else {
            Err(Error::Config(format!(
                "browser.executable '{}' does not exist",
                path.display()
            )))
        };
    }

    if let Some(path) = env_value.filter(|p| !p.as_os_str().is_empty()) {
        return if is_executable_file(&path) {
            Ok((path, BrowserSource::Environment))
        } else {
            Err(Error::Config(format!(
                "${} points to '{}', which does not exist",
                CHROME_ENV,
                path.display()
            )))
        };
    }

    for name in CANDIDATES {
        if let Ok(path) = which::which(name) {
            return Ok((path, BrowserSource::Path));
        }
    }

    for bundle in APP_BUNDLES {
        let path = Path::new(bundle);
        if path.exists() {
            return Ok((path.to_path_buf(), BrowserSource::AppBundle));
        }
    }

    let mut searched: Vec<&str> = CANDIDATES.to_vec();
    searched.extend_from_slice(APP_BUNDLES);
    Err(Error::browser_not_found(&searched))
}

fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
