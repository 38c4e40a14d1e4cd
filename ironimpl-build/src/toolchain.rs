//! Compiler toolchain capability.

use crate::error::CompileError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment variable naming the JDK installation.
pub const JAVA_HOME_ENV: &str = "JAVA_HOME";

/// Outcome of one compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileStatus {
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    /// Captured compiler output.
    pub diagnostics: String,
}

impl CompileStatus {
    /// Creates a successful status with no diagnostics.
    #[must_use]
    pub fn success() -> Self {
        Self {
            code: Some(0),
            diagnostics: String::new(),
        }
    }

    /// Creates a failed status.
    #[must_use]
    pub fn failure(code: Option<i32>, diagnostics: impl Into<String>) -> Self {
        Self {
            code,
            diagnostics: diagnostics.into(),
        }
    }

    /// Returns true if the compiler exited with code zero.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Trait for compilers turning one source file into class files.
pub trait Toolchain {
    /// Returns a short name for logging.
    fn name(&self) -> &str;

    /// Compiles `source` synchronously.
    ///
    /// The class file is expected next to the source file.
    ///
    /// # Arguments
    /// * `source` - Generated source file
    /// * `search_path` - Directories and archives to resolve referenced types
    ///
    /// # Errors
    /// Returns `CompileError::ToolchainUnavailable` if the compiler cannot be
    /// started. A compiler that runs and fails returns `Ok` with a failed status.
    fn compile(&self, source: &Path, search_path: &[PathBuf]) -> Result<CompileStatus, CompileError>;
}

/// Toolchain running the JDK's `javac`.
#[derive(Debug, Clone)]
pub struct JavacToolchain {
    program: PathBuf,
    args: Vec<OsString>,
}

impl JavacToolchain {
    /// Creates a toolchain using the default `javac` program.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program(Self::default_program())
    }

    /// Creates a toolchain running the given program.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds an extra compiler argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Returns the program that will be run.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns `$JAVA_HOME/bin/javac` when `JAVA_HOME` is set, else `javac`
    /// to be looked up on `PATH`.
    #[must_use]
    pub fn default_program() -> PathBuf {
        match std::env::var_os(JAVA_HOME_ENV) {
            Some(home) if !home.is_empty() => Path::new(&home).join("bin").join("javac"),
            _ => PathBuf::from("javac"),
        }
    }
}

impl Default for JavacToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolchain for JavacToolchain {
    fn name(&self) -> &str {
        "javac"
    }

    fn compile(&self, source: &Path, search_path: &[PathBuf]) -> Result<CompileStatus, CompileError> {
        let class_path = std::env::join_paths(search_path).map_err(|e| CompileError::SearchPath {
            message: e.to_string(),
        })?;

        let mut command = Command::new(&self.program);
        command
            .arg("-encoding")
            .arg("UTF-8")
            .arg("-cp")
            .arg(&class_path)
            .args(&self.args)
            .arg(source);

        tracing::debug!("Running {:?}", command);
        let output = command.output().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CompileError::ToolchainUnavailable {
                    program: self.program.clone(),
                    source,
                }
            } else {
                CompileError::Io(source)
            }
        })?;

        let mut diagnostics = String::from_utf8_lossy(&output.stderr).into_owned();
        diagnostics.push_str(&String::from_utf8_lossy(&output.stdout));
        for line in diagnostics.lines().filter(|l| !l.trim().is_empty()) {
            tracing::warn!("javac: {}", line);
        }

        Ok(CompileStatus {
            code: output.status.code(),
            diagnostics,
        })
    }
}
