//! # IronImpl Build
//!
//! Package-mode pipeline: generate a stub, compile it, archive the class.
//!
//! This crate provides:
//! - The GENERATE → COMPILE → ARCHIVE → CLEANUP orchestrator
//! - The [`Toolchain`] capability and a `javac` implementation
//! - The [`ArchiveWriter`] capability and a deterministic jar writer
//! - Scoped scratch directories removed on every exit path

pub mod archive;
pub mod error;
pub mod orchestrator;
pub mod stage;
pub mod toolchain;

pub use archive::{ArchiveEntry, ArchiveWriter, JarWriter, Manifest};
pub use error::{ArchiveError, BuildError, CompileError};
pub use orchestrator::{BuildOrchestrator, BuildReport, OrchestratorBuilder};
pub use stage::{ArtifactState, BuildStage, OutputArtifact};
pub use toolchain::{CompileStatus, JavacToolchain, Toolchain};
