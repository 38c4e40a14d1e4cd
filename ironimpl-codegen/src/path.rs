//! Output path resolution.

use crate::error::CodegenError;
use crate::java::emitter::SourceEmitter;
use ironimpl_descriptor::TypeDescriptor;
use std::path::{Path, PathBuf};

/// Extension of generated source files.
pub const SOURCE_EXTENSION: &str = "java";

/// Extension of compiled class files.
pub const CLASS_EXTENSION: &str = "class";

/// Name prefix of staged files awaiting a rename into place.
pub const STAGING_PREFIX: &str = ".ironimpl-";

/// Maps targets to implementation file locations under a root directory.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Creates a resolver for the given root directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the implementation file path relative to the root
    /// (`com/example/ShapeImpl.java`), without touching the file system.
    #[must_use]
    pub fn relative_path(descriptor: &TypeDescriptor) -> PathBuf {
        let mut path: PathBuf = descriptor.package_segments().into_iter().collect();
        path.push(format!(
            "{}.{}",
            SourceEmitter::class_name(descriptor),
            SOURCE_EXTENSION
        ));
        path
    }

    /// Returns the package directory of `descriptor` under the root.
    #[must_use]
    pub fn package_dir(&self, descriptor: &TypeDescriptor) -> PathBuf {
        let mut dir = self.root.clone();
        dir.extend(descriptor.package_segments());
        dir
    }

    /// Resolves the implementation file path, creating every missing package
    /// directory. Repeated calls are safe.
    ///
    /// # Errors
    /// Returns `CodegenError::DirectoryCreation` if a directory cannot be created.
    pub fn resolve(&self, descriptor: &TypeDescriptor) -> Result<PathBuf, CodegenError> {
        let dir = self.package_dir(descriptor);
        std::fs::create_dir_all(&dir).map_err(|source| CodegenError::DirectoryCreation {
            path: dir.clone(),
            source,
        })?;
        Ok(self.root.join(Self::relative_path(descriptor)))
    }
}

/// Returns the `.class` file javac writes next to `source`, or `None` if
/// `source` is not a `.java` file.
#[must_use]
pub fn class_file_for(source: &Path) -> Option<PathBuf> {
    match source.extension() {
        Some(ext) if ext == SOURCE_EXTENSION => Some(source.with_extension(CLASS_EXTENSION)),
        _ => None,
    }
}

/// Creates a temporary file in `dir` to be persisted over a final path.
///
/// The file is opened with the same mode as a plain `std::fs::write` would
/// use (`0o666` minus the process umask), so the renamed file is not left
/// owner-only.
///
/// # Errors
/// Returns the I/O error if the file cannot be created.
pub fn staging_file(dir: &Path) -> std::io::Result<tempfile::NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(STAGING_PREFIX);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}
