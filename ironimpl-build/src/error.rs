//! Error types for the build pipeline.

use crate::stage::BuildStage;
use ironimpl_codegen::CodegenError;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for compiler invocations.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The compiler program could not be started.
    #[error("compiler '{}' is not available: {source}", .program.display())]
    ToolchainUnavailable {
        /// Program that was looked up.
        program: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The compiler ran and reported failure.
    #[error("compilation failed ({}): {diagnostics}", exit_description(.code))]
    Failed {
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Captured compiler output.
        diagnostics: String,
    },

    /// The compiler reported success but wrote no class file.
    #[error("compiler produced no class file at '{}'", .path.display())]
    MissingOutput {
        /// Expected class file location.
        path: PathBuf,
    },

    /// The search path cannot be passed to the compiler.
    #[error("invalid search path: {message}")]
    SearchPath {
        /// Error message.
        message: String,
    },

    /// IO error while running the compiler.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Error type for archive writing.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// IO error on an archive or its input.
    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Zip container error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The artifact to archive does not exist.
    #[error("artifact '{}' does not exist", .path.display())]
    MissingArtifact {
        /// Missing artifact path.
        path: PathBuf,
    },
}

impl ArchiveError {
    /// Creates an IO error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Error type for a package-mode build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Source generation failed.
    #[error("generate stage failed: {0}")]
    Generate(#[from] CodegenError),

    /// The scratch root could not be created.
    #[error("failed to create scratch directory under '{}': {source}", .path.display())]
    Scratch {
        /// Parent directory of the scratch root.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Compilation failed.
    #[error("compile stage failed: {0}")]
    Compile(#[from] CompileError),

    /// Archiving failed.
    #[error("archive stage failed: {0}")]
    Archive(#[from] ArchiveError),

    /// The scratch root could not be removed.
    #[error("failed to remove scratch directory '{}': {source}", .path.display())]
    Cleanup {
        /// Scratch root.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Returns the pipeline stage that failed.
    #[must_use]
    pub fn stage(&self) -> BuildStage {
        match self {
            Self::Generate(_) | Self::Scratch { .. } => BuildStage::Generate,
            Self::Compile(_) => BuildStage::Compile,
            Self::Archive(_) => BuildStage::Archive,
            Self::Cleanup { .. } => BuildStage::Cleanup,
        }
    }
}
