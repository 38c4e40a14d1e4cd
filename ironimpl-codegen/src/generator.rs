//! Implementation file generation.

use crate::error::CodegenError;
use crate::inspector::TypeInspector;
use crate::java::emitter::{GeneratedSource, SourceEmitter};
use crate::path::{PathResolver, staging_file};
use ironimpl_descriptor::{TypeDescriptor, TypeLibrary};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Generates implementation classes for types of one library.
pub struct Generator<'a> {
    library: &'a TypeLibrary,
    inspector: TypeInspector<'a>,
    emitter: SourceEmitter,
}

impl<'a> Generator<'a> {
    /// Creates a new generator with the default emitter.
    #[must_use]
    pub fn new(library: &'a TypeLibrary) -> Self {
        Self {
            library,
            inspector: TypeInspector::new(library),
            emitter: SourceEmitter::new(),
        }
    }

    /// Replaces the source emitter.
    #[must_use]
    pub fn with_emitter(mut self, emitter: SourceEmitter) -> Self {
        self.emitter = emitter;
        self
    }

    /// Returns the library types are resolved against.
    #[must_use]
    pub fn library(&self) -> &'a TypeLibrary {
        self.library
    }

    /// Renders the implementation of `descriptor` in memory.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidTarget` if the type cannot be implemented.
    pub fn render(&self, descriptor: &TypeDescriptor) -> Result<GeneratedSource, CodegenError> {
        let members = self.inspector.members(descriptor)?;
        Ok(self.emitter.render(descriptor, &members))
    }

    /// Generates the implementation of `descriptor` under `root` and returns
    /// the written file's path.
    ///
    /// The target is validated before anything touches the file system, so a
    /// rejected target creates no directories or files.
    ///
    /// # Errors
    /// Returns `CodegenError` if the target is invalid, a directory cannot be
    /// created, or the file cannot be written.
    pub fn implement(&self, descriptor: &TypeDescriptor, root: &Path) -> Result<PathBuf, CodegenError> {
        let source = self.render(descriptor)?;
        self.write_source(descriptor, &source, root)
    }

    /// Writes an already rendered `source` for `descriptor` under `root`.
    ///
    /// # Errors
    /// Returns `CodegenError` if a directory cannot be created or the file
    /// cannot be written.
    pub fn write_source(
        &self,
        descriptor: &TypeDescriptor,
        source: &GeneratedSource,
        root: &Path,
    ) -> Result<PathBuf, CodegenError> {
        let path = PathResolver::new(root).resolve(descriptor)?;
        write_atomically(&path, source.text.as_bytes())?;

        tracing::info!(
            "Generated {} at {}",
            source.qualified_class_name(),
            path.display()
        );
        Ok(path)
    }

    /// Resolves `type_name` in the library and generates its implementation.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidTarget` for an empty name and
    /// `CodegenError::Resolve` if the name is unknown; otherwise as [`Self::implement`].
    pub fn implement_named(&self, type_name: &str, root: &Path) -> Result<PathBuf, CodegenError> {
        let descriptor = self.resolve_target(type_name)?;
        self.implement(&descriptor, root)
    }

    /// Resolves a target name, rejecting an empty one as an invalid target.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidTarget` or `CodegenError::Resolve`.
    pub fn resolve_target(&self, type_name: &str) -> Result<TypeDescriptor, CodegenError> {
        if type_name.trim().is_empty() {
            return Err(CodegenError::invalid_target(type_name, "no target type given"));
        }
        Ok(self.library.resolve(type_name)?)
    }
}

/// Writes `contents` to a temporary sibling of `path` and renames it into
/// place, so readers never observe a partially written file.
fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), CodegenError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = staging_file(dir)
        .map_err(|e| CodegenError::generation(path, e))?;
    file.write_all(contents)
        .and_then(|()| file.flush())
        .map_err(|e| CodegenError::generation(path, e))?;
    file.persist(path)
        .map_err(|e| CodegenError::generation(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironimpl_descriptor::parse_library;

    const LIBRARY: &str = r#"<typeLibrary>
    <type name="com.example.Counter">
        <method name="increment" returns="int">
            <param name="by" type="int"/>
        </method>
        <method name="reset"/>
        <method name="isZero" returns="boolean"/>
        <method name="label" returns="java.lang.String">
            <throws type="java.io.IOException"/>
            <throws type="java.lang.InterruptedException"/>
        </method>
    </type>
</typeLibrary>"#;

    fn library() -> TypeLibrary {
        parse_library(LIBRARY).expect("Failed to parse library")
    }

    #[test]
    fn test_implement_writes_file() {
        let library = library();
        let generator = Generator::new(&library);
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let path = generator
            .implement_named("com.example.Counter", dir.path())
            .expect("Failed to implement");

        assert_eq!(path, dir.path().join("com/example/CounterImpl.java"));
        let text = std::fs::read_to_string(&path).expect("Failed to read output");
        assert!(text.starts_with("package com.example;\n"));
        assert!(text.contains("public class CounterImpl implements Counter {"));
        assert!(text.contains("public int increment(int by) {\n        return 0;"));
        assert!(text.contains("public void reset() {\n    }"));
        assert!(text.contains("public boolean isZero() {\n        return true;"));
        assert!(text.contains(
            "public java.lang.String label() throws java.io.IOException, java.lang.InterruptedException {\n        return null;"
        ));
    }

    #[test]
    fn test_implement_is_byte_identical() {
        let library = library();
        let generator = Generator::new(&library);
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let path = generator
            .implement_named("com.example.Counter", dir.path())
            .expect("Failed to implement");
        let first = std::fs::read(&path).expect("Failed to read output");
        generator
            .implement_named("com.example.Counter", dir.path())
            .expect("Failed to implement");
        let second = std::fs::read(&path).expect("Failed to read output");

        assert_eq!(first, second);
        // No temporary files left behind.
        assert_eq!(
            std::fs::read_dir(dir.path().join("com/example"))
                .expect("Failed to read dir")
                .count(),
            1
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_generated_file_has_default_mode() {
        use std::os::unix::fs::PermissionsExt;

        let library = library();
        let generator = Generator::new(&library);
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let path = generator
            .implement_named("com.example.Counter", dir.path())
            .expect("Failed to implement");
        let plain = dir.path().join("com/example/plain.txt");
        std::fs::write(&plain, b"x").expect("Failed to write file");

        let mode = |p: &Path| {
            std::fs::metadata(p)
                .expect("Failed to read metadata")
                .permissions()
                .mode()
                & 0o777
        };
        assert_eq!(mode(&path), mode(&plain));
    }

    #[test]
    fn test_write_failure_is_generation_error() {
        let library = library();
        let generator = Generator::new(&library);
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        // A directory occupies the file's path, so the final rename fails.
        let blocked = dir.path().join("com/example/CounterImpl.java");
        std::fs::create_dir_all(blocked.join("child")).expect("Failed to create dir");

        let result = generator.implement_named("com.example.Counter", dir.path());

        match result {
            Err(CodegenError::Generation { path, .. }) => assert_eq!(path, blocked),
            other => panic!("expected generation error, got {other:?}"),
        }
        assert!(blocked.is_dir());
        // The staged file is discarded.
        assert_eq!(
            std::fs::read_dir(dir.path().join("com/example"))
                .expect("Failed to read dir")
                .count(),
            1
        );
    }

    #[test]
    fn test_invalid_target_creates_nothing() {
        let library = library();
        let generator = Generator::new(&library);
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        for name in ["int", "com.example.Counter[]", "  "] {
            let result = generator.implement_named(name, dir.path());
            assert!(
                matches!(result, Err(CodegenError::InvalidTarget { .. })),
                "{name} should be rejected"
            );
        }
        assert_eq!(
            std::fs::read_dir(dir.path()).expect("Failed to read dir").count(),
            0
        );
    }

    #[test]
    fn test_unknown_type() {
        let library = library();
        let generator = Generator::new(&library);
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let result = generator.implement_named("com.example.Missing", dir.path());
        assert!(matches!(result, Err(CodegenError::Resolve(_))));
    }

    #[test]
    fn test_custom_emitter() {
        let library = library();
        let generator = Generator::new(&library).with_emitter(SourceEmitter::with_indent(2));
        let counter = library.resolve("com.example.Counter").expect("Failed to resolve");

        let source = generator.render(&counter).expect("Failed to render");
        assert!(source.text.contains("\n  public void reset() {\n  }\n"));
    }
}
