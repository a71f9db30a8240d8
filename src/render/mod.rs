//! # Render Module
//!
//! Turns planned [`ArtifactSpec`]s into concrete file operations. A renderer
//! never touches storage; it returns [`Output`]s and the pipeline applies them.
//!
//! Three kinds of output exist because artifacts differ in how they may
//! treat an existing file:
//!
//! - [`Output::File`] creates or replaces a file owned by one entity
//! - [`Output::Scaffold`] creates a shared file only if it is missing
//! - [`Output::Lines`] adds lines to a shared file through the idempotency guard

mod templates;

pub use templates::{api_route_lines, web_route_lines, TemplateRenderer};

use std::path::{Path, PathBuf};

use crate::error::GenerateError;
use crate::planner::ArtifactSpec;

/// A single file operation produced by a [`Renderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Create or replace `path`
    File {
        /// Path relative to the project root
        path: PathBuf,
        /// Full file content
        content: String,
    },
    /// Create `path` only if it does not exist yet
    Scaffold {
        /// Path relative to the project root
        path: PathBuf,
        /// Full file content
        content: String,
    },
    /// Append the lines of `lines` not already present in `path`
    Lines {
        /// Path relative to the project root
        path: PathBuf,
        /// Candidate lines, in order
        lines: Vec<String>,
    },
}

impl Output {
    /// Target path of the operation.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Output::File { path, .. } | Output::Scaffold { path, .. } | Output::Lines { path, .. } => {
                path
            }
        }
    }
}

/// Produces output text for planned artifacts.
pub trait Renderer {
    /// Render one artifact into file operations.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Render`] if a template fails; this is fatal.
    fn render(&self, artifact: &ArtifactSpec) -> Result<Vec<Output>, GenerateError>;
}
