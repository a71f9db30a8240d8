//! # Storage Module
//!
//! The generator never touches the filesystem or the database directly. Every
//! read and write goes through a [`Storage`] so the pipeline can run against a
//! real project ([`FsStorage`]) or entirely in memory ([`MemoryStorage`]).
//!
//! All paths handed to a storage are relative to the project root.

mod fs;
mod memory;

pub use fs::FsStorage;
pub use memory::MemoryStorage;

use std::path::Path;

use crate::error::GenerateError;
use crate::planner::ArtifactKind;

/// Access to the target project and its database schema.
pub trait Storage {
    /// Whether the target database already has `table`.
    ///
    /// # Errors
    ///
    /// Implementations backed by I/O may fail.
    fn table_exists(&self, table: &str) -> Result<bool, GenerateError>;

    /// File names of existing artifacts of `kind` whose name contains `pattern`,
    /// sorted.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Io`] if the artifact directory cannot be listed.
    fn list_existing_artifacts(
        &self,
        kind: ArtifactKind,
        pattern: &str,
    ) -> Result<Vec<String>, GenerateError>;

    /// Contents of `path`, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Io`] if the file exists but cannot be read.
    fn read_file(&self, path: &Path) -> Result<Option<String>, GenerateError>;

    /// Create or replace `path` with `content`.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Io`] on write failure.
    fn write_file(&self, path: &Path, content: &str) -> Result<(), GenerateError>;

    /// Append `lines` to `path` as a newline-separated block preceded by a
    /// blank separator line.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Io`] on write failure.
    fn append_lines(&self, path: &Path, lines: &[String]) -> Result<(), GenerateError>;

    /// Create `path` and any missing parents.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Io`] on failure.
    fn ensure_directory(&self, path: &Path) -> Result<(), GenerateError>;
}

/// Render `lines` the way [`Storage::append_lines`] appends them.
pub(crate) fn append_block(lines: &[String]) -> String {
    format!("\n{}\n", lines.join("\n"))
}
