//! Package-mode build orchestration.
//!
//! A build runs GENERATE, COMPILE, ARCHIVE and CLEANUP strictly in order.
//! The first failing stage aborts the build; the scratch root is removed on
//! every path.

use crate::archive::{ArchiveEntry, ArchiveWriter, JarWriter, Manifest};
use crate::error::{BuildError, CompileError};
use crate::stage::{ArtifactState, BuildStage, OutputArtifact};
use crate::toolchain::{JavacToolchain, Toolchain};
use ironimpl_codegen::{Generator, SourceEmitter, class_file_for};
use ironimpl_descriptor::{TypeDescriptor, TypeLibrary};
use std::path::{Path, PathBuf};

/// Prefix of scratch directory names.
pub const SCRATCH_PREFIX: &str = "ironimpl-";

/// Environment variable holding the process's own class search path.
pub const CLASSPATH_ENV: &str = "CLASSPATH";

/// Result of a successful package-mode build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Archive that was written.
    pub archive: PathBuf,
    /// Name of the class entry inside the archive.
    pub class_entry: String,
    /// Main class declared by the manifest.
    pub main_class: String,
    /// Final state of the intermediate artifact.
    pub state: ArtifactState,
}

/// Builder for configuring a [`BuildOrchestrator`].
pub struct OrchestratorBuilder<T = JavacToolchain, A = JarWriter> {
    toolchain: T,
    archive_writer: A,
    scratch_parent: PathBuf,
    class_path: Vec<PathBuf>,
    inherit_class_path: bool,
    emitter: SourceEmitter,
}

impl OrchestratorBuilder {
    /// Creates a builder with `javac`, a deflating jar writer and scratch
    /// directories under the current directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            toolchain: JavacToolchain::new(),
            archive_writer: JarWriter::new(),
            scratch_parent: PathBuf::from("."),
            class_path: Vec::new(),
            inherit_class_path: true,
            emitter: SourceEmitter::new(),
        }
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Toolchain, A: ArchiveWriter> OrchestratorBuilder<T, A> {
    /// Sets the compiler toolchain.
    #[must_use]
    pub fn toolchain<U: Toolchain>(self, toolchain: U) -> OrchestratorBuilder<U, A> {
        OrchestratorBuilder {
            toolchain,
            archive_writer: self.archive_writer,
            scratch_parent: self.scratch_parent,
            class_path: self.class_path,
            inherit_class_path: self.inherit_class_path,
            emitter: self.emitter,
        }
    }

    /// Sets the archive writer.
    #[must_use]
    pub fn archive_writer<B: ArchiveWriter>(self, archive_writer: B) -> OrchestratorBuilder<T, B> {
        OrchestratorBuilder {
            toolchain: self.toolchain,
            archive_writer,
            scratch_parent: self.scratch_parent,
            class_path: self.class_path,
            inherit_class_path: self.inherit_class_path,
            emitter: self.emitter,
        }
    }

    /// Sets the directory scratch roots are created in.
    #[must_use]
    pub fn scratch_parent(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_parent = dir.into();
        self
    }

    /// Appends an entry to the compiler search path.
    #[must_use]
    pub fn class_path(mut self, entry: impl Into<PathBuf>) -> Self {
        self.class_path.push(entry.into());
        self
    }

    /// Sets whether the `CLASSPATH` environment variable is searched.
    #[must_use]
    pub fn inherit_class_path(mut self, inherit: bool) -> Self {
        self.inherit_class_path = inherit;
        self
    }

    /// Sets the source emitter.
    #[must_use]
    pub fn emitter(mut self, emitter: SourceEmitter) -> Self {
        self.emitter = emitter;
        self
    }

    /// Builds an orchestrator over `library`.
    #[must_use]
    pub fn build(self, library: &TypeLibrary) -> BuildOrchestrator<'_, T, A> {
        BuildOrchestrator {
            generator: Generator::new(library).with_emitter(self.emitter),
            toolchain: self.toolchain,
            archive_writer: self.archive_writer,
            scratch_parent: self.scratch_parent,
            class_path: self.class_path,
            inherit_class_path: self.inherit_class_path,
        }
    }
}

/// Runs generate, compile and archive for one target at a time.
pub struct BuildOrchestrator<'a, T = JavacToolchain, A = JarWriter> {
    generator: Generator<'a>,
    toolchain: T,
    archive_writer: A,
    scratch_parent: PathBuf,
    class_path: Vec<PathBuf>,
    inherit_class_path: bool,
}

impl<T: Toolchain, A: ArchiveWriter> BuildOrchestrator<'_, T, A> {
    /// Resolves `type_name` and packages its implementation into `destination`.
    ///
    /// # Errors
    /// Returns `BuildError` naming the stage that failed.
    pub fn package_named(&self, type_name: &str, destination: &Path) -> Result<BuildReport, BuildError> {
        let descriptor = self.generator.resolve_target(type_name)?;
        self.package(&descriptor, destination)
    }

    /// Generates, compiles and archives the implementation of `descriptor`.
    ///
    /// # Errors
    /// Returns `BuildError` naming the stage that failed. Later stages do
    /// not run, and the scratch root is removed either way.
    pub fn package(&self, descriptor: &TypeDescriptor, destination: &Path) -> Result<BuildReport, BuildError> {
        // Rejected targets fail before any directory is created.
        let source = self.generator.render(descriptor)?;

        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(&self.scratch_parent)
            .map_err(|source| BuildError::Scratch {
                path: self.scratch_parent.clone(),
                source,
            })?;
        let scratch_root = scratch.path().to_path_buf();

        tracing::info!("{}: {}", BuildStage::Generate, source.qualified_class_name());
        let source_path = self.generator.write_source(descriptor, &source, &scratch_root)?;
        let mut artifact = OutputArtifact::written(&source_path);

        tracing::info!("{}: {} with {}", BuildStage::Compile, source_path.display(), self.toolchain.name());
        let class_path = self.compile(&source_path, &scratch_root)?;
        artifact.advance(ArtifactState::Compiled, &class_path);

        let class_entry = class_entry_name(descriptor, &source.class_name);
        let manifest = Manifest::new(source.qualified_class_name());
        tracing::info!("{}: {} -> {}", BuildStage::Archive, class_entry, destination.display());
        self.archive_writer.write_archive(
            destination,
            &manifest,
            &ArchiveEntry::new(class_entry.as_str(), &class_path),
        )?;
        artifact.advance(ArtifactState::Archived, destination);

        tracing::info!("{}: {}", BuildStage::Cleanup, scratch_root.display());
        scratch.close().map_err(|source| BuildError::Cleanup {
            path: scratch_root,
            source,
        })?;
        artifact.advance(ArtifactState::Removed, destination);

        Ok(BuildReport {
            archive: destination.to_path_buf(),
            class_entry,
            main_class: manifest.main_class().to_string(),
            state: artifact.state(),
        })
    }

    /// Returns the compiler search path for a build rooted at `scratch_root`:
    /// the scratch root, then `CLASSPATH` entries, then configured entries.
    #[must_use]
    pub fn search_path(&self, scratch_root: &Path) -> Vec<PathBuf> {
        let mut search_path = vec![scratch_root.to_path_buf()];
        if self.inherit_class_path
            && let Some(inherited) = std::env::var_os(CLASSPATH_ENV)
        {
            search_path.extend(std::env::split_paths(&inherited).filter(|p| !p.as_os_str().is_empty()));
        }
        search_path.extend(self.class_path.iter().cloned());
        search_path
    }

    fn compile(&self, source_path: &Path, scratch_root: &Path) -> Result<PathBuf, CompileError> {
        let status = self
            .toolchain
            .compile(source_path, &self.search_path(scratch_root))?;
        if !status.is_success() {
            tracing::warn!(
                "{} failed on {}",
                self.toolchain.name(),
                source_path.display()
            );
            return Err(CompileError::Failed {
                code: status.code,
                diagnostics: status.diagnostics,
            });
        }

        let expected = class_file_for(source_path).unwrap_or_else(|| source_path.with_extension("class"));
        if !expected.is_file() {
            return Err(CompileError::MissingOutput { path: expected });
        }
        Ok(expected)
    }
}

/// Returns the `/`-separated archive entry for the compiled class.
fn class_entry_name(descriptor: &TypeDescriptor, class_name: &str) -> String {
    let mut segments = descriptor.package_segments();
    let file_name = format!("{class_name}.class");
    segments.push(&file_name);
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArchiveError;
    use crate::toolchain::CompileStatus;
    use ironimpl_codegen::CodegenError;
    use ironimpl_descriptor::parse_library;
    use std::cell::RefCell;
    use std::io::Read;

    const LIBRARY: &str = r#"<typeLibrary>
    <type name="com.example.Counter">
        <method name="count" returns="int"/>
    </type>
    <type name="Task"><method name="run"/></type>
</typeLibrary>"#;

    const CLASS_BYTES: &[u8] = &[0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 61];

    /// Writes a fake class file next to the source and records each call.
    #[derive(Default)]
    struct FakeToolchain {
        calls: RefCell<Vec<(PathBuf, Vec<PathBuf>)>>,
    }

    impl Toolchain for FakeToolchain {
        fn name(&self) -> &str {
            "fake"
        }

        fn compile(&self, source: &Path, search_path: &[PathBuf]) -> Result<CompileStatus, CompileError> {
            let text = std::fs::read_to_string(source)?;
            assert!(text.contains("public class"));
            std::fs::write(source.with_extension("class"), CLASS_BYTES)?;
            self.calls
                .borrow_mut()
                .push((source.to_path_buf(), search_path.to_vec()));
            Ok(CompileStatus::success())
        }
    }

    struct FailingToolchain;

    impl Toolchain for FailingToolchain {
        fn name(&self) -> &str {
            "failing"
        }

        fn compile(&self, _source: &Path, _search_path: &[PathBuf]) -> Result<CompileStatus, CompileError> {
            Ok(CompileStatus::failure(Some(1), "CounterImpl.java:1: error: boom"))
        }
    }

    struct SilentToolchain;

    impl Toolchain for SilentToolchain {
        fn name(&self) -> &str {
            "silent"
        }

        fn compile(&self, _source: &Path, _search_path: &[PathBuf]) -> Result<CompileStatus, CompileError> {
            Ok(CompileStatus::success())
        }
    }

    /// Fails every write, recording the entry it was handed.
    #[derive(Default)]
    struct RejectingArchiveWriter {
        entries: RefCell<Vec<ArchiveEntry>>,
    }

    impl ArchiveWriter for RejectingArchiveWriter {
        fn write_archive(
            &self,
            destination: &Path,
            _manifest: &Manifest,
            entry: &ArchiveEntry,
        ) -> Result<(), ArchiveError> {
            assert!(entry.source.is_file());
            self.entries.borrow_mut().push(entry.clone());
            Err(ArchiveError::io(
                destination,
                std::io::Error::other("no space left on device"),
            ))
        }
    }

    fn library() -> TypeLibrary {
        parse_library(LIBRARY).expect("Failed to parse library")
    }

    fn dir_is_empty(path: &Path) -> bool {
        std::fs::read_dir(path)
            .expect("Failed to read dir")
            .next()
            .is_none()
    }

    #[test]
    fn test_package_produces_archive() {
        let library = library();
        let scratch = tempfile::tempdir().expect("Failed to create temp dir");
        let out = tempfile::tempdir().expect("Failed to create temp dir");
        let destination = out.path().join("counter.jar");

        let orchestrator = OrchestratorBuilder::new()
            .toolchain(FakeToolchain::default())
            .scratch_parent(scratch.path())
            .inherit_class_path(false)
            .class_path("lib/extra.jar")
            .build(&library);

        let report = orchestrator
            .package_named("com.example.Counter", &destination)
            .expect("Failed to package");

        assert_eq!(report.archive, destination);
        assert_eq!(report.class_entry, "com/example/CounterImpl.class");
        assert_eq!(report.main_class, "com.example.CounterImpl");
        assert_eq!(report.state, ArtifactState::Removed);

        let file = std::fs::File::open(&destination).expect("Failed to open archive");
        let mut archive = zip::ZipArchive::new(file).expect("Failed to read archive");
        assert_eq!(archive.len(), 2);
        let mut manifest = String::new();
        archive
            .by_name(crate::archive::MANIFEST_PATH)
            .expect("Missing manifest")
            .read_to_string(&mut manifest)
            .expect("Failed to read manifest");
        assert!(manifest.contains("Main-Class: com.example.CounterImpl"));
        let mut bytes = Vec::new();
        archive
            .by_name("com/example/CounterImpl.class")
            .expect("Missing class entry")
            .read_to_end(&mut bytes)
            .expect("Failed to read class entry");
        assert_eq!(bytes, CLASS_BYTES);

        // Scratch root removed.
        assert!(dir_is_empty(scratch.path()));
    }

    #[test]
    fn test_search_path_order() {
        let library = library();
        let scratch = tempfile::tempdir().expect("Failed to create temp dir");
        let out = tempfile::tempdir().expect("Failed to create temp dir");
        let toolchain = FakeToolchain::default();

        let orchestrator = OrchestratorBuilder::new()
            .toolchain(toolchain)
            .scratch_parent(scratch.path())
            .inherit_class_path(false)
            .class_path("lib/a.jar")
            .class_path("lib/b.jar")
            .build(&library);
        orchestrator
            .package_named("Task", &out.path().join("task.jar"))
            .expect("Failed to package");

        let calls = orchestrator.toolchain.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (source, search_path) = &calls[0];
        assert_eq!(source.file_name(), Some(std::ffi::OsStr::new("TaskImpl.java")));
        assert_eq!(search_path.len(), 3);
        assert_eq!(source.parent(), Some(search_path[0].as_path()));
        assert_eq!(search_path[1], PathBuf::from("lib/a.jar"));
        assert_eq!(search_path[2], PathBuf::from("lib/b.jar"));
    }

    #[test]
    fn test_compile_failure_skips_archive() {
        let library = library();
        let scratch = tempfile::tempdir().expect("Failed to create temp dir");
        let out = tempfile::tempdir().expect("Failed to create temp dir");
        let destination = out.path().join("counter.jar");

        let orchestrator = OrchestratorBuilder::new()
            .toolchain(FailingToolchain)
            .scratch_parent(scratch.path())
            .build(&library);
        let err = orchestrator
            .package_named("com.example.Counter", &destination)
            .expect_err("Build should fail");

        assert_eq!(err.stage(), BuildStage::Compile);
        assert!(matches!(
            err,
            BuildError::Compile(CompileError::Failed { code: Some(1), .. })
        ));
        assert!(!destination.exists());
        assert!(dir_is_empty(scratch.path()));
    }

    #[test]
    fn test_archive_failure_removes_scratch() {
        let library = library();
        let scratch = tempfile::tempdir().expect("Failed to create temp dir");
        let out = tempfile::tempdir().expect("Failed to create temp dir");
        let destination = out.path().join("counter.jar");

        let orchestrator = OrchestratorBuilder::new()
            .toolchain(FakeToolchain::default())
            .archive_writer(RejectingArchiveWriter::default())
            .scratch_parent(scratch.path())
            .inherit_class_path(false)
            .build(&library);
        let err = orchestrator
            .package_named("com.example.Counter", &destination)
            .expect_err("Build should fail");

        assert_eq!(err.stage(), BuildStage::Archive);
        assert!(matches!(err, BuildError::Archive(ArchiveError::Io { .. })));
        assert!(err.to_string().contains("archive"));

        let entries = orchestrator.archive_writer.entries.borrow();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "com/example/CounterImpl.class");

        assert!(!destination.exists());
        assert!(dir_is_empty(scratch.path()));
    }

    #[test]
    fn test_missing_class_output() {
        let library = library();
        let scratch = tempfile::tempdir().expect("Failed to create temp dir");
        let out = tempfile::tempdir().expect("Failed to create temp dir");
        let destination = out.path().join("task.jar");

        let orchestrator = OrchestratorBuilder::new()
            .toolchain(SilentToolchain)
            .scratch_parent(scratch.path())
            .build(&library);
        let err = orchestrator
            .package_named("Task", &destination)
            .expect_err("Build should fail");

        assert!(matches!(
            err,
            BuildError::Compile(CompileError::MissingOutput { .. })
        ));
        assert!(!destination.exists());
        assert!(dir_is_empty(scratch.path()));
    }

    #[test]
    fn test_unavailable_toolchain() {
        let library = library();
        let scratch = tempfile::tempdir().expect("Failed to create temp dir");
        let out = tempfile::tempdir().expect("Failed to create temp dir");

        let orchestrator = OrchestratorBuilder::new()
            .toolchain(JavacToolchain::with_program(scratch.path().join("no-such-javac")))
            .scratch_parent(scratch.path())
            .build(&library);
        let err = orchestrator
            .package_named("Task", &out.path().join("task.jar"))
            .expect_err("Build should fail");

        assert!(matches!(
            err,
            BuildError::Compile(CompileError::ToolchainUnavailable { .. })
        ));
        assert!(dir_is_empty(scratch.path()));
    }

    #[test]
    fn test_invalid_target_creates_no_scratch() {
        let library = library();
        let scratch = tempfile::tempdir().expect("Failed to create temp dir");
        let out = tempfile::tempdir().expect("Failed to create temp dir");

        let orchestrator = OrchestratorBuilder::new()
            .toolchain(FakeToolchain::default())
            .scratch_parent(scratch.path())
            .build(&library);
        let err = orchestrator
            .package_named("int", &out.path().join("int.jar"))
            .expect_err("Build should fail");

        assert_eq!(err.stage(), BuildStage::Generate);
        assert!(matches!(
            err,
            BuildError::Generate(CodegenError::InvalidTarget { .. })
        ));
        assert!(dir_is_empty(scratch.path()));
        assert!(dir_is_empty(out.path()));
    }

    #[test]
    fn test_missing_scratch_parent() {
        let library = library();
        let out = tempfile::tempdir().expect("Failed to create temp dir");

        let orchestrator = OrchestratorBuilder::new()
            .toolchain(FakeToolchain::default())
            .scratch_parent(out.path().join("missing"))
            .build(&library);
        let err = orchestrator
            .package_named("Task", &out.path().join("task.jar"))
            .expect_err("Build should fail");

        assert!(matches!(err, BuildError::Scratch { .. }));
    }

    #[test]
    fn test_class_entry_name() {
        let counter = TypeDescriptor::new("com.example.Counter", ironimpl_descriptor::TypeKind::Interface);
        assert_eq!(
            class_entry_name(&counter, "CounterImpl"),
            "com/example/CounterImpl.class"
        );
        let task = TypeDescriptor::new("Task", ironimpl_descriptor::TypeKind::Interface);
        assert_eq!(class_entry_name(&task, "TaskImpl"), "TaskImpl.class");
    }
}
