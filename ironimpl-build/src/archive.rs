//! Archive writing capability.
//!
//! A jar is a zip container whose first entry is a manifest. [`JarWriter`]
//! writes exactly the manifest and one class entry, with fixed timestamps so
//! identical inputs produce identical archives.

use crate::error::ArchiveError;
use ironimpl_codegen::staging_file;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Location of the manifest inside a jar.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Longest manifest line in bytes, excluding the line break.
pub const MANIFEST_LINE_WIDTH: usize = 72;

/// Size of the buffer used to copy entry bytes.
pub const COPY_CHUNK_SIZE: usize = 8 * 1024;

/// Jar manifest declaring the archive's entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    main_class: String,
}

impl Manifest {
    /// Creates a manifest with the given `Main-Class`.
    #[must_use]
    pub fn new(main_class: impl Into<String>) -> Self {
        Self {
            main_class: main_class.into(),
        }
    }

    /// Returns the declared main class.
    #[must_use]
    pub fn main_class(&self) -> &str {
        &self.main_class
    }

    /// Renders the manifest file contents.
    ///
    /// Headers longer than [`MANIFEST_LINE_WIDTH`] bytes continue on lines
    /// starting with a single space.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        push_header(&mut out, "Manifest-Version", "1.0");
        push_header(&mut out, "Main-Class", &self.main_class);
        out.push_str("\r\n");
        out
    }
}

fn push_header(out: &mut String, name: &str, value: &str) {
    let header = format!("{name}: {value}");
    let mut width = 0;
    for c in header.chars() {
        if width + c.len_utf8() > MANIFEST_LINE_WIDTH {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += c.len_utf8();
    }
    out.push_str("\r\n");
}

/// One file to store in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry name inside the archive, `/`-separated.
    pub name: String,
    /// File whose bytes are stored.
    pub source: PathBuf,
}

impl ArchiveEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Trait for writers producing the final archive.
pub trait ArchiveWriter {
    /// Creates or overwrites `destination` with `manifest` and `entry`.
    ///
    /// # Errors
    /// Returns `ArchiveError` if the entry is missing or the archive cannot
    /// be written.
    fn write_archive(
        &self,
        destination: &Path,
        manifest: &Manifest,
        entry: &ArchiveEntry,
    ) -> Result<(), ArchiveError>;
}

/// Zip-backed jar writer.
#[derive(Debug, Clone, Copy)]
pub struct JarWriter {
    compression: CompressionMethod,
}

impl JarWriter {
    /// Creates a writer that deflates entries.
    #[must_use]
    pub fn new() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }

    /// Creates a writer that stores entries uncompressed.
    #[must_use]
    pub fn stored() -> Self {
        Self {
            compression: CompressionMethod::Stored,
        }
    }

    fn options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(self.compression)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644)
    }

    fn write_entries<W: Write + std::io::Seek>(
        &self,
        writer: W,
        manifest: &Manifest,
        entry: &ArchiveEntry,
    ) -> Result<W, ArchiveError> {
        let mut zip = ZipWriter::new(writer);

        zip.start_file(MANIFEST_PATH, self.options())?;
        zip.write_all(manifest.render().as_bytes())
            .map_err(|e| ArchiveError::io(MANIFEST_PATH, e))?;

        zip.start_file(entry.name.as_str(), self.options())?;
        let mut input = File::open(&entry.source).map_err(|e| ArchiveError::io(&entry.source, e))?;
        copy_chunked(&mut input, &mut zip).map_err(|e| ArchiveError::io(&entry.source, e))?;

        Ok(zip.finish()?)
    }
}

impl Default for JarWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveWriter for JarWriter {
    fn write_archive(
        &self,
        destination: &Path,
        manifest: &Manifest,
        entry: &ArchiveEntry,
    ) -> Result<(), ArchiveError> {
        if !entry.source.is_file() {
            return Err(ArchiveError::MissingArtifact {
                path: entry.source.clone(),
            });
        }

        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| ArchiveError::io(dir, e))?;

        // Build next to the destination and rename, so a failed run never
        // leaves a truncated archive behind.
        let staging = staging_file(dir).map_err(|e| ArchiveError::io(dir, e))?;
        let mut staging = self.write_entries(staging, manifest, entry)?;
        staging
            .flush()
            .map_err(|e| ArchiveError::io(destination, e))?;
        staging
            .persist(destination)
            .map_err(|e| ArchiveError::io(destination, e.error))?;

        tracing::info!(
            "Archived {} into {} (Main-Class: {})",
            entry.name,
            destination.display(),
            manifest.main_class()
        );
        Ok(())
    }
}

/// Copies `input` to `output` in [`COPY_CHUNK_SIZE`] chunks, returning the
/// number of bytes copied.
fn copy_chunked<R: Read, W: Write>(input: &mut R, output: &mut W) -> std::io::Result<u64> {
    let mut buf = [0u8; COPY_CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        output.write_all(&buf[..n])?;
        total += n as u64;
    }
}
