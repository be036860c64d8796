//! Screenshot artifacts
//!
//! File names are a pure function of scenario name and artifact kind:
//! `<dir>/<scenario>_<suffix>.<ext>`.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::browser::PageDriver;
use crate::common::config::ImageFormat;
use crate::common::{Error, Result};

/// What an artifact documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "suffix")]
pub enum ArtifactKind {
    /// Final state of a successful run
    Result,
    /// State at the first failure
    Error,
    /// Mid-scenario `capture` step
    Checkpoint(String),
}

impl ArtifactKind {
    pub fn suffix(&self) -> &str {
        match self {
            ArtifactKind::Result => "result",
            ArtifactKind::Error => "error",
            ArtifactKind::Checkpoint(suffix) => suffix,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A written screenshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub scenario: String,
    pub kind: ArtifactKind,
}

/// Writes screenshots into one directory
#[derive(Debug, Clone)]
pub struct ArtifactCapturer {
    dir: PathBuf,
    format: ImageFormat,
}

impl ArtifactCapturer {
    pub fn new(dir: impl Into<PathBuf>, format: ImageFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    /// Deterministic path for an artifact
    pub fn path_for(&self, scenario: &str, kind: &ArtifactKind) -> PathBuf {
        self.dir.join(format!(
            "{}_{}.{}",
            scenario,
            kind.suffix(),
            self.format.extension()
        ))
    }

    /// Screenshot the page and write it, replacing any previous file
    pub async fn capture(
        &self,
        page: &mut dyn PageDriver,
        scenario: &str,
        kind: ArtifactKind,
    ) -> Result<Artifact> {
        let path = self.path_for(scenario, &kind);

        let bytes = page
            .screenshot(self.format)
            .await
            .map_err(|e| Error::capture(&path, e))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::capture(&path, e))?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| Error::capture(&path, e))?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Captured {}", kind);
        Ok(Artifact {
            path,
            scenario: scenario.to_string(),
            kind,
        })
    }
}
