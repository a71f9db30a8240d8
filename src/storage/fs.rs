use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{append_block, Storage};
use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::planner::ArtifactKind;

/// Storage rooted at a project directory on disk.
///
/// Table existence is answered from the `[schema] existing_tables` list in the
/// configuration, since the generator does not connect to the database.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
    config: GeneratorConfig,
    tables: BTreeSet<String>,
}

impl FsStorage {
    /// Create a storage for the project at `root`.
    pub fn new(root: impl Into<PathBuf>, config: GeneratorConfig) -> Self {
        let tables = config.schema.existing_tables.iter().cloned().collect();
        FsStorage {
            root: root.into(),
            config,
            tables,
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Storage for FsStorage {
    fn table_exists(&self, table: &str) -> Result<bool, GenerateError> {
        Ok(self.tables.contains(table))
    }

    fn list_existing_artifacts(
        &self,
        kind: ArtifactKind,
        pattern: &str,
    ) -> Result<Vec<String>, GenerateError> {
        let Some(dir) = self.config.paths.dir_for(kind) else {
            return Ok(Vec::new());
        };
        let dir = self.resolve(dir);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut found = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| GenerateError::io(&dir, e))? {
            let entry = entry.map_err(|e| GenerateError::io(&dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.contains(pattern) {
                found.push(name);
            }
        }
        found.sort();
        debug!(kind = %kind, pattern, matches = found.len(), "listed existing artifacts");
        Ok(found)
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>, GenerateError> {
        let full = self.resolve(path);
        match fs::read_to_string(&full) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GenerateError::io(full, e)),
        }
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), GenerateError> {
        let full = self.resolve(path);
        fs::write(&full, content).map_err(|e| GenerateError::io(full, e))
    }

    fn append_lines(&self, path: &Path, lines: &[String]) -> Result<(), GenerateError> {
        let full = self.resolve(path);
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&full)
            .map_err(|e| GenerateError::io(&full, e))?;
        file.write_all(append_block(lines).as_bytes())
            .map_err(|e| GenerateError::io(full, e))
    }

    fn ensure_directory(&self, path: &Path) -> Result<(), GenerateError> {
        let full = self.resolve(path);
        fs::create_dir_all(&full).map_err(|e| GenerateError::io(full, e))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> FsStorage {
        let mut config = GeneratorConfig::default();
        config.schema.existing_tables = vec!["users".to_string()];
        FsStorage::new(dir.path(), config)
    }

    #[test]
    fn test_read_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        assert_eq!(storage.read_file(Path::new("routes/web.php")).unwrap(), None);
    }

    #[test]
    fn test_write_append_read() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        let path = Path::new("routes/web.php");
        storage.ensure_directory(Path::new("routes")).unwrap();
        storage.write_file(path, "<?php\n").unwrap();
        storage
            .append_lines(path, &["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(
            storage.read_file(path).unwrap().unwrap(),
            "<?php\n\na\nb\n"
        );
    }

    #[test]
    fn test_list_existing_migrations() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        let migrations = Path::new("database/migrations");
        storage.ensure_directory(migrations).unwrap();
        storage
            .write_file(
                &migrations.join("2024_01_01_000000_create_projects_table.php"),
                "",
            )
            .unwrap();
        storage
            .write_file(&migrations.join("2024_01_01_000000_create_tasks_table.php"), "")
            .unwrap();

        let found = storage
            .list_existing_artifacts(ArtifactKind::SchemaDefinition, "create_projects_table")
            .unwrap();
        assert_eq!(found, vec!["2024_01_01_000000_create_projects_table.php"]);
    }

    #[test]
    fn test_list_without_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        assert!(storage
            .list_existing_artifacts(ArtifactKind::SchemaDefinition, "create_")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_table_exists_from_config() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        assert!(storage.table_exists("users").unwrap());
        assert!(!storage.table_exists("projects").unwrap());
    }
}
