//! Error taxonomy for the generation pipeline.
//!
//! Errors are split by how the pipeline reacts to them:
//!
//! - **Fatal** ([`GenerateError::is_fatal`] returns `true`) abort the invocation.
//!   A [`ParseError`] is always raised before anything is written; an I/O error
//!   stops emission where it happened, leaving earlier artifacts in place.
//! - **Non-fatal** skip a single relation or artifact with a warning and let
//!   generation continue.

use std::path::PathBuf;

use thiserror::Error;

use crate::planner::ArtifactKind;

/// Failure to turn a field/relation description into structured specs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input ended while `depth` parenthesised groups were still open.
    #[error("unbalanced parentheses: group opened at position {position} is never closed ({depth} open at end of input)")]
    Unbalanced {
        /// Byte offset of the outermost unclosed `(`
        position: usize,
        /// Nesting depth left open at the end of input
        depth: usize,
    },
    /// A `)` appeared with no matching `(`.
    #[error("unbalanced parentheses: unexpected ')' at position {position}")]
    UnexpectedClose {
        /// Byte offset of the stray `)`
        position: usize,
    },
    /// A token has no `:` between its name and its type.
    #[error("invalid definition '{token}': expected 'name:type'")]
    MissingSeparator {
        /// The offending token, trimmed
        token: String,
    },
    /// The part before the first `:` is empty.
    #[error("invalid definition '{token}': name is empty")]
    EmptyName {
        /// The offending token, trimmed
        token: String,
    },
    /// Nothing follows the `:` of a field token.
    #[error("field '{field}' has no type")]
    EmptyType {
        /// Field name
        field: String,
    },
    /// An enum value carries its own parentheses.
    #[error("enum field '{field}' has an invalid value '{value}'")]
    InvalidEnumValue {
        /// Field name
        field: String,
        /// The offending value, trimmed
        value: String,
    },
    /// `enum()` with nothing usable inside.
    #[error("enum field '{field}' declares no values")]
    EmptyEnum {
        /// Field name
        field: String,
    },
    /// The same field name appears twice in one entity.
    #[error("field '{name}' is declared more than once")]
    DuplicateField {
        /// Field name
        name: String,
    },
}

/// Errors raised while planning, rendering or emitting artifacts.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Malformed field or relation description (fatal).
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A relation kind other than `hasMany` / `belongsTo` (non-fatal).
    #[error("invalid relation type '{kind}' for {related}")]
    UnknownRelationKind {
        /// Related entity as written in the relation token
        related: String,
        /// The unrecognised kind
        kind: String,
    },

    /// The table or artifact is already present (non-fatal).
    #[error("{kind} for '{name}' already exists: {detail}")]
    ArtifactAlreadyExists {
        /// Kind of the artifact that was skipped
        kind: ArtifactKind,
        /// Table or entity name
        name: String,
        /// What was found
        detail: String,
    },

    /// A storage resource could not be read or written (fatal).
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A renderer could not produce output for an artifact (fatal).
    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),

    /// The generator configuration file is malformed (fatal).
    #[error("configuration error: {0}")]
    Config(String),

    /// The entity registry could not be (de)serialized (fatal).
    #[error("registry error: {0}")]
    Registry(#[from] serde_json::Error),
}

impl GenerateError {
    /// Build an [`GenerateError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts the invocation.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            GenerateError::UnknownRelationKind { .. } | GenerateError::ArtifactAlreadyExists { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality_by_variant() {
        let parse = GenerateError::from(ParseError::MissingSeparator {
            token: "name".to_string(),
        });
        assert!(parse.is_fatal());

        let relation = GenerateError::UnknownRelationKind {
            related: "tasks".to_string(),
            kind: "hasOne".to_string(),
        };
        assert!(!relation.is_fatal());

        let exists = GenerateError::ArtifactAlreadyExists {
            kind: ArtifactKind::SchemaDefinition,
            name: "projects".to_string(),
            detail: "table exists".to_string(),
        };
        assert!(!exists.is_fatal());

        let io = GenerateError::io(
            "routes/web.php",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(io.is_fatal());
    }

    #[test]
    fn test_messages_name_the_offender() {
        let err = GenerateError::UnknownRelationKind {
            related: "tasks".to_string(),
            kind: "hasOne".to_string(),
        };
        assert_eq!(err.to_string(), "invalid relation type 'hasOne' for tasks");

        let err = ParseError::Unbalanced {
            position: 12,
            depth: 1,
        };
        assert!(err.to_string().contains("position 12"));
    }
}
