//! # Generator configuration
//!
//! An optional `crudforge.toml` at the project root adjusts where artifacts
//! are written and what the target database already contains:
//!
//! ```toml
//! [paths]
//! models = "app/Models"
//! migrations = "database/migrations"
//! web_routes = "routes/web.php"
//!
//! [routes]
//! api_middleware = "auth:sanctum"
//!
//! [schema]
//! existing_tables = ["users", "password_resets"]
//! ```
//!
//! Every key is optional; missing keys take the Laravel defaults below. All
//! paths are relative to the project root.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::GenerateError;
use crate::planner::ArtifactKind;

/// Default config file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "crudforge.toml";

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Output locations
    pub paths: PathsConfig,
    /// Route registration settings
    pub routes: RoutesConfig,
    /// What the target database already has
    pub schema: SchemaConfig,
}

/// Output locations, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Model classes
    pub models: PathBuf,
    /// Migrations
    pub migrations: PathBuf,
    /// Form requests
    pub requests: PathBuf,
    /// Web controllers
    pub web_controllers: PathBuf,
    /// API controllers
    pub api_controllers: PathBuf,
    /// View root; each entity gets a sub-directory
    pub views: PathBuf,
    /// Shared layout file
    pub layout: PathBuf,
    /// Web route file
    pub web_routes: PathBuf,
    /// API route file
    pub api_routes: PathBuf,
    /// Registry of generated entities, read by the dashboard listing
    pub registry: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            models: PathBuf::from("app/Models"),
            migrations: PathBuf::from("database/migrations"),
            requests: PathBuf::from("app/Http/Requests"),
            web_controllers: PathBuf::from("app/Http/Controllers"),
            api_controllers: PathBuf::from("app/Http/Controllers/Api"),
            views: PathBuf::from("resources/views"),
            layout: PathBuf::from("resources/views/layouts/app.blade.php"),
            web_routes: PathBuf::from("routes/web.php"),
            api_routes: PathBuf::from("routes/api.php"),
            registry: PathBuf::from("storage/crud_models.json"),
        }
    }
}

impl PathsConfig {
    /// Directory holding artifacts of `kind`, for kinds stored one file per entity.
    #[must_use]
    pub fn dir_for(&self, kind: ArtifactKind) -> Option<&Path> {
        match kind {
            ArtifactKind::EntityDefinition => Some(&self.models),
            ArtifactKind::SchemaDefinition => Some(&self.migrations),
            ArtifactKind::ValidationRules => Some(&self.requests),
            ArtifactKind::ApiController => Some(&self.api_controllers),
            ArtifactKind::WebController => Some(&self.web_controllers),
            ArtifactKind::ViewSet => Some(&self.views),
            ArtifactKind::RouteSet | ArtifactKind::Layout => None,
        }
    }
}

/// Route registration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Middleware wrapped around API resource routes; empty for none
    pub api_middleware: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        RoutesConfig {
            api_middleware: "auth:sanctum".to_string(),
        }
    }
}

/// Known state of the target database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Tables that already exist; migrations for them are skipped
    pub existing_tables: Vec<String>,
}

impl GeneratorConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the file does not exist, `Ok(Some(config))` if it parses.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Io`] if the file exists but cannot be read, and
    /// [`GenerateError::Config`] if it is not valid configuration.
    pub fn load(path: &Path) -> Result<Option<Self>, GenerateError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(path).map_err(|e| GenerateError::io(path, e))?;
        let config = toml::from_str(&contents).map_err(|e| {
            GenerateError::Config(format!("failed to parse {}: {e}", path.display()))
        })?;
        Ok(Some(config))
    }

    /// Resolve the configuration for a project.
    ///
    /// Priority:
    /// 1. `explicit` path (from `--config`), which must exist
    /// 2. `crudforge.toml` in `root`
    /// 3. Defaults
    ///
    /// # Errors
    ///
    /// Fails if an explicit path is missing or any file found is malformed.
    pub fn resolve(root: &Path, explicit: Option<&Path>) -> Result<Self, GenerateError> {
        if let Some(path) = explicit {
            return Self::load(path)?.ok_or_else(|| {
                GenerateError::Config(format!("config file not found: {}", path.display()))
            });
        }
        Ok(Self::load(&root.join(CONFIG_FILE_NAME))?.unwrap_or_default())
    }
}
