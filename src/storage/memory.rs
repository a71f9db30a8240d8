use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::{append_block, Storage};
use crate::config::PathsConfig;
use crate::error::GenerateError;
use crate::planner::ArtifactKind;

/// In-memory storage for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    paths: PathsConfig,
    tables: BTreeSet<String>,
    files: RefCell<BTreeMap<PathBuf, String>>,
    directories: RefCell<BTreeSet<PathBuf>>,
}

impl MemoryStorage {
    /// Empty storage using the default path layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty storage using a custom path layout.
    #[must_use]
    pub fn with_paths(paths: PathsConfig) -> Self {
        MemoryStorage {
            paths,
            ..Self::default()
        }
    }

    /// Mark `table` as already present in the database.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.tables.insert(table.into());
        self
    }

    /// Seed a file.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.borrow_mut().insert(path.into(), content.into());
        self
    }

    /// Current contents of `path`.
    #[must_use]
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    /// All file paths, sorted.
    #[must_use]
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    /// Whether `path` was created with [`Storage::ensure_directory`].
    #[must_use]
    pub fn has_directory(&self, path: impl AsRef<Path>) -> bool {
        self.directories.borrow().contains(path.as_ref())
    }
}

impl Storage for MemoryStorage {
    fn table_exists(&self, table: &str) -> Result<bool, GenerateError> {
        Ok(self.tables.contains(table))
    }

    fn list_existing_artifacts(
        &self,
        kind: ArtifactKind,
        pattern: &str,
    ) -> Result<Vec<String>, GenerateError> {
        let Some(dir) = self.paths.dir_for(kind) else {
            return Ok(Vec::new());
        };
        let files = self.files.borrow();
        let found = files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| name.contains(pattern))
            .collect();
        Ok(found)
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>, GenerateError> {
        Ok(self.file(path))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), GenerateError> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn append_lines(&self, path: &Path, lines: &[String]) -> Result<(), GenerateError> {
        self.files
            .borrow_mut()
            .entry(path.to_path_buf())
            .or_default()
            .push_str(&append_block(lines));
        Ok(())
    }

    fn ensure_directory(&self, path: &Path) -> Result<(), GenerateError> {
        self.directories.borrow_mut().insert(path.to_path_buf());
        Ok(())
    }
}
