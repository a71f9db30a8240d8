//! Registry of generated root entities.
//!
//! A pretty-printed JSON array of entity names kept at
//! `storage/crud_models.json` (configurable). It feeds the dashboard listing
//! only; planning never reads it.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::GenerateError;
use crate::storage::Storage;

/// Ordered, duplicate-free list of root entity names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    entities: Vec<String>,
}

impl Registry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry at `path`. A missing or blank file is an empty registry.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Io`] if the file cannot be read and
    /// [`GenerateError::Registry`] if it is not a JSON array of strings.
    pub fn load(storage: &dyn Storage, path: &Path) -> Result<Self, GenerateError> {
        match storage.read_file(path)? {
            Some(content) if !content.trim().is_empty() => Ok(serde_json::from_str(&content)?),
            _ => Ok(Self::new()),
        }
    }

    /// Write the registry to `path`, creating its directory.
    ///
    /// # Errors
    ///
    /// Storage or serialization failures.
    pub fn save(&self, storage: &dyn Storage, path: &Path) -> Result<(), GenerateError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            storage.ensure_directory(parent)?;
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        storage.write_file(path, &json)
    }

    /// Append `name` unless it is already recorded. Returns whether it was added.
    pub fn record(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entities.push(name.to_string());
        true
    }

    /// Whether `name` is recorded.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entities.iter().any(|e| e == name)
    }

    /// Recorded names, oldest first.
    #[must_use]
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::storage::MemoryStorage;

    const PATH: &str = "storage/crud_models.json";

    #[test]
    fn test_missing_file_is_empty() {
        let storage = MemoryStorage::new();
        assert!(Registry::load(&storage, Path::new(PATH)).unwrap().is_empty());
    }

    #[test]
    fn test_record_is_append_only_and_unique() {
        let mut registry = Registry::new();
        assert!(registry.record("Project"));
        assert!(registry.record("Invoice"));
        assert!(!registry.record("Project"));
        assert_eq!(registry.entities(), ["Project", "Invoice"]);
    }

    #[test]
    fn test_save_then_load() {
        let storage = MemoryStorage::new();
        let mut registry = Registry::new();
        registry.record("Project");
        registry.save(&storage, Path::new(PATH)).unwrap();

        assert!(storage.has_directory("storage"));
        assert_eq!(storage.file(PATH).unwrap(), "[\n  \"Project\"\n]\n");
        assert_eq!(Registry::load(&storage, Path::new(PATH)).unwrap(), registry);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let storage = MemoryStorage::new().with_file(PATH, "{\"not\": \"a list\"}");
        let err = Registry::load(&storage, Path::new(PATH)).unwrap_err();
        assert!(matches!(err, GenerateError::Registry(_)));
    }
}
