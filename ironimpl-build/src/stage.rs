//! Pipeline stages and artifact lifecycle.

use std::fmt;
use std::path::{Path, PathBuf};

/// Stage of a package-mode build, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuildStage {
    /// Source rendering into the scratch root.
    Generate,
    /// Compiler invocation.
    Compile,
    /// Archive creation.
    Archive,
    /// Scratch root removal.
    Cleanup,
}

impl BuildStage {
    /// Returns the stage name in upper case.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "GENERATE",
            Self::Compile => "COMPILE",
            Self::Archive => "ARCHIVE",
            Self::Cleanup => "CLEANUP",
        }
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an intermediate artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArtifactState {
    /// Source file written.
    Written,
    /// Class file produced.
    Compiled,
    /// Class file stored in the archive.
    Archived,
    /// Scratch files deleted.
    Removed,
}

/// A file produced along the pipeline and its current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    path: PathBuf,
    state: ArtifactState,
}

impl OutputArtifact {
    /// Creates an artifact for a freshly written file.
    #[must_use]
    pub fn written(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: ArtifactState::Written,
        }
    }

    /// Returns the artifact path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> ArtifactState {
        self.state
    }

    /// Moves the artifact to `state` at `path`.
    ///
    /// States only move forward; returns false and leaves the artifact
    /// untouched otherwise.
    pub fn advance(&mut self, state: ArtifactState, path: impl Into<PathBuf>) -> bool {
        if state <= self.state {
            return false;
        }
        self.state = state;
        self.path = path.into();
        true
    }
}
