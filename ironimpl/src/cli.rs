//! Command-line front end.
//!
//! ```text
//! ironimpl -t types.xml com.example.Shape out/
//! ironimpl -t types.xml -jar com.example.Shape shape.jar
//! ```

use clap::Parser;
use ironimpl_build::{BuildError, BuildReport, JavacToolchain, OrchestratorBuilder};
use ironimpl_codegen::java::emitter::DEFAULT_INDENT;
use ironimpl_codegen::{CodegenError, Generator, SourceEmitter};
use ironimpl_descriptor::{LibraryError, ParseError, TypeLibrary};
use std::error::Error as _;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Exit code for a type name that is not in the library.
pub const EXIT_UNRESOLVED_TYPE: u8 = 3;
/// Exit code for a type that cannot be implemented.
pub const EXIT_INVALID_TARGET: u8 = 4;
/// Exit code for a failure writing generated source.
pub const EXIT_GENERATION: u8 = 5;
/// Exit code for an unusable output path.
pub const EXIT_INVALID_PATH: u8 = 6;
/// Exit code for a compiler failure.
pub const EXIT_COMPILE: u8 = 7;
/// Exit code for an archive failure.
pub const EXIT_ARCHIVE: u8 = 8;
/// Exit code for an unreadable or invalid type library.
pub const EXIT_LIBRARY: u8 = 9;

/// IronImpl command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "ironimpl")]
#[command(about = "Generate default-valued Java implementations of interfaces and abstract classes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Compile the implementation and package it into a jar at PATH (also `-jar`)
    #[arg(long)]
    pub jar: bool,

    /// Qualified binary name of the type to implement
    #[arg(value_name = "TYPE")]
    pub type_name: String,

    /// Source root directory, or the jar destination with --jar
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Type library files describing the available types
    #[arg(short = 't', long = "types", value_name = "FILE", env = "IRONIMPL_TYPES", value_delimiter = ',', required = true)]
    pub types: Vec<PathBuf>,

    /// Compiler program used with --jar
    #[arg(long, value_name = "PROGRAM", env = "IRONIMPL_JAVAC")]
    pub javac: Option<PathBuf>,

    /// Additional compiler search path entry
    #[arg(long = "class-path", value_name = "ENTRY")]
    pub class_path: Vec<PathBuf>,

    /// Directory scratch builds are created in
    #[arg(long = "scratch-dir", value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Indentation width of generated code
    #[arg(long, value_name = "N", default_value_t = DEFAULT_INDENT)]
    pub indent: usize,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses arguments, accepting the single-dash `-jar` form.
    ///
    /// # Errors
    /// Returns the clap error for missing or malformed arguments, including
    /// the help and version requests.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }
}

/// Rewrites `-jar` to `--jar` so clap does not read it as `-j -a -r`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| if arg == "-jar" { OsString::from("--jar") } else { arg })
        .collect()
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Source mode: the generated source file.
    Source(PathBuf),
    /// Package mode: the written archive.
    Archive(BuildReport),
}

impl Outcome {
    /// Returns the path of the final output.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Source(path) => path,
            Self::Archive(report) => &report.archive,
        }
    }
}

/// Error type for CLI runs.
#[derive(Debug, Error)]
pub enum CliError {
    /// A type library file could not be read or parsed.
    #[error("cannot load type library '{}': {source}", .path.display())]
    Library {
        /// Library file.
        path: PathBuf,
        /// Parse error.
        #[source]
        source: ParseError,
    },

    /// The merged type library is inconsistent.
    #[error("invalid type library: {0}")]
    InvalidLibrary(#[source] LibraryError),

    /// The output path cannot be used.
    #[error("invalid path '{}': {reason}", .path.display())]
    InvalidPath {
        /// Offending path.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// Source generation failed.
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    /// Package-mode build failed.
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl CliError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Library { .. } | Self::InvalidLibrary(_) => EXIT_LIBRARY,
            Self::InvalidPath { .. } => EXIT_INVALID_PATH,
            Self::Codegen(err) => codegen_exit_code(err),
            Self::Build(err) => match err {
                BuildError::Generate(err) => codegen_exit_code(err),
                BuildError::Scratch { .. } | BuildError::Cleanup { .. } => EXIT_INVALID_PATH,
                BuildError::Compile(_) => EXIT_COMPILE,
                BuildError::Archive(_) => EXIT_ARCHIVE,
            },
        }
    }

    /// Returns a short label naming the kind of failure.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self.exit_code() {
            EXIT_UNRESOLVED_TYPE => "type resolution error",
            EXIT_INVALID_TARGET => "invalid target",
            EXIT_GENERATION => "generation error",
            EXIT_INVALID_PATH => "path error",
            EXIT_COMPILE => "compile error",
            EXIT_ARCHIVE => "archive error",
            _ => "type library error",
        }
    }

    /// Renders the error with every cause not already part of its message.
    #[must_use]
    pub fn report(&self) -> String {
        let mut message = format!("{}: {}", self.category(), self);
        let mut cause = self.source();
        while let Some(err) = cause {
            let text = err.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            cause = err.source();
        }
        message
    }
}

fn codegen_exit_code(err: &CodegenError) -> u8 {
    match err {
        CodegenError::Resolve(LibraryError::TypeNotFound { .. }) => EXIT_UNRESOLVED_TYPE,
        CodegenError::Resolve(_) | CodegenError::Parse(_) => EXIT_LIBRARY,
        CodegenError::InvalidTarget { .. } => EXIT_INVALID_TARGET,
        CodegenError::Generation { .. } => EXIT_GENERATION,
        CodegenError::DirectoryCreation { .. } => EXIT_INVALID_PATH,
    }
}

/// Loads, merges and validates the given type library files.
///
/// # Errors
/// Returns `CliError::Library` for an unreadable file and
/// `CliError::InvalidLibrary` if the merged library is inconsistent.
pub fn load_library(paths: &[PathBuf]) -> Result<TypeLibrary, CliError> {
    let mut library = TypeLibrary::new();
    for path in paths {
        let loaded = ironimpl_descriptor::parse_library_file(path).map_err(|source| CliError::Library {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("Loaded {} types from {}", loaded.len(), path.display());
        library.merge(loaded).map_err(|source| CliError::Library {
            path: path.clone(),
            source,
        })?;
    }
    ironimpl_descriptor::validate_library(&library).map_err(CliError::InvalidLibrary)?;
    Ok(library)
}

/// Runs one invocation.
///
/// # Errors
/// Returns `CliError`; [`CliError::exit_code`] gives the process exit code.
pub fn run(cli: &Cli) -> Result<Outcome, CliError> {
    let library = load_library(&cli.types)?;
    let emitter = SourceEmitter::with_indent(cli.indent);

    if cli.jar {
        if cli.path.is_dir() {
            return Err(CliError::InvalidPath {
                path: cli.path.clone(),
                reason: "archive destination is a directory".to_string(),
            });
        }

        let mut builder = OrchestratorBuilder::new().emitter(emitter);
        if let Some(javac) = &cli.javac {
            builder = builder.toolchain(JavacToolchain::with_program(javac));
        }
        if let Some(dir) = &cli.scratch_dir {
            builder = builder.scratch_parent(dir);
        }
        for entry in &cli.class_path {
            builder = builder.class_path(entry);
        }

        let report = builder
            .build(&library)
            .package_named(&cli.type_name, &cli.path)?;
        Ok(Outcome::Archive(report))
    } else {
        if cli.path.exists() && !cli.path.is_dir() {
            return Err(CliError::InvalidPath {
                path: cli.path.clone(),
                reason: "source root is not a directory".to_string(),
            });
        }

        let path = Generator::new(&library)
            .with_emitter(emitter)
            .implement_named(&cli.type_name, &cli.path)?;
        Ok(Outcome::Source(path))
    }
}
