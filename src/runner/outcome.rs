//! Terminal result of one scenario run

use std::path::Path;

use serde::Serialize;

use super::artifact::Artifact;
use crate::common::ErrorKind;

/// Outcome of a run; produced exactly once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success {
        artifact: Artifact,
    },
    Failure {
        kind: ErrorKind,
        message: String,
        /// 1-based index of the declared step that failed; `None` when the
        /// run never got past startup
        failed_step: Option<usize>,
        /// Absent when no screenshot could be taken
        artifact: Option<Artifact>,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            Outcome::Success { artifact } => Some(artifact),
            Outcome::Failure { artifact, .. } => artifact.as_ref(),
        }
    }

    pub fn artifact_path(&self) -> Option<&Path> {
        self.artifact().map(|a| a.path.as_path())
    }
}
