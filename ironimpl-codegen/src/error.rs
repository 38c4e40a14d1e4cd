//! Error types for code generation.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Type library parse error.
    #[error("type library parse error: {0}")]
    Parse(#[from] ironimpl_descriptor::ParseError),

    /// Type library lookup or validation error.
    #[error("type library error: {0}")]
    Resolve(#[from] ironimpl_descriptor::LibraryError),

    /// The requested type cannot be implemented.
    #[error("invalid target '{type_name}': {reason}")]
    InvalidTarget {
        /// Qualified name of the rejected type.
        type_name: String,
        /// Why the type was rejected.
        reason: String,
    },

    /// Writing the generated source failed.
    #[error("failed to write '{}': {source}", .path.display())]
    Generation {
        /// Destination file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Creating the package directories failed.
    #[error("failed to create directory '{}': {source}", .path.display())]
    DirectoryCreation {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    /// Creates an invalid target error.
    pub fn invalid_target(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a generation error for the given destination.
    pub fn generation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Generation {
            path: path.into(),
            source,
        }
    }
}
