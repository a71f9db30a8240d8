//! # Idempotency guard
//!
//! Running the generator twice for the same entity must not create a second
//! migration or register the same routes twice. Two checks enforce this:
//!
//! - [`check_schema`] runs while planning. A schema definition is dropped when
//!   the table already exists in the database, or when a migration with the
//!   same logical name (`create_{table}_table`) is already present, even if it
//!   has not been applied yet.
//! - [`merge_route_lines`] runs while emitting. Route files are shared across
//!   entities, so instead of rewriting them the guard reads the current
//!   content and appends only the import and route lines that are not already
//!   there verbatim, inserting the `<?php` preamble first if it is missing.
//!
//! Neither check locks anything; concurrent invocations against one project
//! are not supported.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::error::GenerateError;
use crate::planner::ArtifactKind;
use crate::storage::Storage;

/// Opening tag every route file must start with.
pub const ROUTE_PREAMBLE: &str = "<?php";

/// Logical name of the migration creating `table`.
#[must_use]
pub fn schema_logical_name(table: &str) -> String {
    format!("create_{table}_table")
}

/// Decide whether a schema definition for `table` may be planned.
///
/// # Errors
///
/// Non-fatal [`GenerateError::ArtifactAlreadyExists`] when the table or a
/// migration for it exists; storage errors are passed through.
pub fn check_schema(storage: &dyn Storage, table: &str) -> Result<(), GenerateError> {
    if storage.table_exists(table)? {
        return Err(GenerateError::ArtifactAlreadyExists {
            kind: ArtifactKind::SchemaDefinition,
            name: table.to_string(),
            detail: format!("table '{table}' already exists in the database"),
        });
    }
    let logical = schema_logical_name(table);
    let existing = storage.list_existing_artifacts(ArtifactKind::SchemaDefinition, &logical)?;
    if let Some(first) = existing.first() {
        return Err(GenerateError::ArtifactAlreadyExists {
            kind: ArtifactKind::SchemaDefinition,
            name: table.to_string(),
            detail: format!("migration already present: {first}"),
        });
    }
    Ok(())
}

/// What a line of a route file declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineClass {
    /// `use ...;`
    Import,
    /// `Route::...`
    Route,
    /// Anything else
    Other,
}

/// Classify one (trimmed) route file line.
#[must_use]
pub fn classify_line(line: &str) -> LineClass {
    let line = line.trim();
    if line.starts_with("use ") {
        LineClass::Import
    } else if line.starts_with("Route::") {
        LineClass::Route
    } else {
        LineClass::Other
    }
}

/// Lines from `new_lines` that are not already in `existing`, in order.
///
/// Candidate lines are trimmed and blank ones dropped. A line is kept only if
/// no existing line of the same [`LineClass`] matches it verbatim, and it has
/// not already been kept earlier in the same batch.
#[must_use]
pub fn missing_lines(existing: &str, new_lines: &[String]) -> Vec<String> {
    let mut present: HashSet<(LineClass, &str)> = existing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| (classify_line(line), line))
        .collect();

    let mut missing = Vec::new();
    for line in new_lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        if present.insert((classify_line(line), line)) {
            missing.push(line.to_string());
        }
    }
    missing
}

/// Content with the [`ROUTE_PREAMBLE`] inserted, or `None` if it is already there.
#[must_use]
pub fn with_preamble(content: Option<&str>) -> Option<String> {
    match content {
        None => Some(format!("{ROUTE_PREAMBLE}\n\n")),
        Some(text) if text.trim_start().starts_with(ROUTE_PREAMBLE) => None,
        Some(text) => Some(format!("{ROUTE_PREAMBLE}\n\n{text}")),
    }
}

/// Result of merging lines into a shared route file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMerge {
    /// Whether the preamble had to be written
    pub preamble_inserted: bool,
    /// Lines actually appended
    pub appended: Vec<String>,
}

/// Append the lines of `new_lines` missing from the route file at `path`.
///
/// # Errors
///
/// Storage errors, which are fatal.
pub fn merge_route_lines(
    storage: &dyn Storage,
    path: &Path,
    new_lines: &[String],
) -> Result<RouteMerge, GenerateError> {
    let current = storage.read_file(path)?;
    let mut merge = RouteMerge::default();

    let content = match with_preamble(current.as_deref()) {
        Some(updated) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                storage.ensure_directory(parent)?;
            }
            storage.write_file(path, &updated)?;
            merge.preamble_inserted = true;
            updated
        }
        None => current.unwrap_or_default(),
    };

    merge.appended = missing_lines(&content, new_lines);
    if merge.appended.is_empty() {
        debug!(path = %path.display(), "route file already up to date");
    } else {
        storage.append_lines(path, &merge.appended)?;
    }
    Ok(merge)
}
