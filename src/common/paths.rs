//! Configuration, log and artifact paths
//!
//! Config and logs live in platform-appropriate locations; artifacts go to a
//! directory relative to the working directory unless configured otherwise.

use std::io;
use std::path::{Path, PathBuf};

/// Name used for the config and data directories
const APP_NAME: &str = "uiproof";

/// Default artifacts directory, relative to the working directory
pub const DEFAULT_ARTIFACTS_DIR: &str = "verification";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/uiproof/`
/// - macOS: `~/Library/Application Support/uiproof/`
/// - Windows: `%APPDATA%\uiproof\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the log directory
pub fn log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().join("logs"))
}

/// Ensure a directory exists, creating parents as needed
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
