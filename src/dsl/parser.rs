use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::types::{FieldKind, FieldSpec, RelationKind, RelationSpec};
use crate::error::{GenerateError, ParseError};
use crate::naming::canonical_name;

/// `enum(...)` with everything between the outer parentheses captured.
static ENUM_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^enum\s*\((.*)\)$").expect("enum shape regex should be valid")
});

/// Relations parsed from a relation string.
///
/// Tokens with an unknown relation kind do not fail the parse; they are
/// collected in `rejected` so the caller can report them and carry on.
#[derive(Debug, Default)]
pub struct ParsedRelations {
    /// Accepted relations in declaration order, duplicates removed
    pub relations: Vec<RelationSpec>,
    /// [`GenerateError::UnknownRelationKind`] for every rejected token
    pub rejected: Vec<GenerateError>,
}

/// Split a DSL string on commas that are not inside parentheses.
///
/// Tokens are trimmed and empty tokens dropped, so `"a:string, ,b:text"`
/// yields two tokens.
///
/// # Errors
///
/// [`ParseError::UnexpectedClose`] for a `)` without a matching `(`, and
/// [`ParseError::Unbalanced`] when input ends with groups still open.
pub fn split_top_level(raw: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();
    let mut open_positions: Vec<usize> = Vec::new();

    for (position, ch) in raw.char_indices() {
        match ch {
            ',' if open_positions.is_empty() => {
                push_token(&mut tokens, &buffer);
                buffer.clear();
                continue;
            }
            '(' => open_positions.push(position),
            ')' => {
                if open_positions.pop().is_none() {
                    return Err(ParseError::UnexpectedClose { position });
                }
            }
            _ => {}
        }
        buffer.push(ch);
    }

    if let Some(&position) = open_positions.first() {
        return Err(ParseError::Unbalanced {
            position,
            depth: open_positions.len(),
        });
    }
    push_token(&mut tokens, &buffer);
    Ok(tokens)
}

fn push_token(tokens: &mut Vec<String>, buffer: &str) {
    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        tokens.push(trimmed.to_string());
    }
}

/// Split a token on its first colon into `(name, definition)`, both trimmed.
fn split_definition(token: &str) -> Result<(&str, &str), ParseError> {
    let (name, definition) = token
        .split_once(':')
        .ok_or_else(|| ParseError::MissingSeparator {
            token: token.to_string(),
        })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::EmptyName {
            token: token.to_string(),
        });
    }
    Ok((name, definition.trim()))
}

/// Parse a single `name:type` token.
///
/// `status:enum(open, 'closed')` yields an enum with values `open` and
/// `closed`; values are stripped of surrounding spaces and quotes.
///
/// # Errors
///
/// [`ParseError::MissingSeparator`], [`ParseError::EmptyName`],
/// [`ParseError::EmptyType`], [`ParseError::InvalidEnumValue`] or
/// [`ParseError::EmptyEnum`].
pub fn parse_field(token: &str) -> Result<FieldSpec, ParseError> {
    let (name, definition) = split_definition(token)?;
    if definition.is_empty() {
        return Err(ParseError::EmptyType {
            field: name.to_string(),
        });
    }

    let kind = match ENUM_SHAPE.captures(definition) {
        Some(captures) => {
            let inner = captures.get(1).map_or("", |m| m.as_str());
            FieldKind::Enum(parse_enum_values(name, inner)?)
        }
        None => {
            let kind = FieldKind::from_type_name(definition);
            if let FieldKind::Passthrough(type_name) = &kind {
                debug!(field = name, type_name = %type_name, "unrecognized type name, passing through");
            }
            kind
        }
    };

    Ok(FieldSpec::new(name, kind))
}

/// Values between the parentheses of `enum(...)`. Nested groups are rejected.
fn parse_enum_values(field: &str, inner: &str) -> Result<Vec<String>, ParseError> {
    let mut values = Vec::new();
    for raw in inner.split(',') {
        let value = raw.trim_matches(|c: char| c.is_whitespace() || c == '\'' || c == '"');
        if value.contains(['(', ')']) {
            return Err(ParseError::InvalidEnumValue {
                field: field.to_string(),
                value: raw.trim().to_string(),
            });
        }
        if !value.is_empty() {
            values.push(value.to_string());
        }
    }
    if values.is_empty() {
        return Err(ParseError::EmptyEnum {
            field: field.to_string(),
        });
    }
    Ok(values)
}

/// Parse a comma separated field list such as
/// `"name:string, status:enum(open,closed)"`.
///
/// # Errors
///
/// Any [`ParseError`] from splitting or from an individual token, plus
/// [`ParseError::DuplicateField`] when a name repeats.
pub fn parse_fields(raw: &str) -> Result<Vec<FieldSpec>, ParseError> {
    let mut fields: Vec<FieldSpec> = Vec::new();
    for token in split_top_level(raw)? {
        let field = parse_field(&token)?;
        if fields.iter().any(|existing| existing.name == field.name) {
            return Err(ParseError::DuplicateField { name: field.name });
        }
        fields.push(field);
    }
    Ok(fields)
}

/// Parse a single `related:kind` token.
///
/// The related name is normalized to its canonical form (`tasks` -> `Task`).
///
/// # Errors
///
/// Returns a fatal [`GenerateError::Parse`] for a malformed token (including
/// a name with no letters or digits, such as `_`) and a
/// non-fatal [`GenerateError::UnknownRelationKind`] for a kind other than
/// `hasMany` / `belongsTo`.
pub fn parse_relation(token: &str) -> Result<RelationSpec, GenerateError> {
    let (related, keyword) = split_definition(token)?;
    let kind = RelationKind::from_keyword(keyword).ok_or_else(|| {
        GenerateError::UnknownRelationKind {
            related: related.to_string(),
            kind: keyword.to_string(),
        }
    })?;
    let canonical = canonical_name(related);
    if canonical.is_empty() {
        return Err(ParseError::EmptyName {
            token: token.trim().to_string(),
        }
        .into());
    }
    Ok(RelationSpec::new(canonical, kind))
}

/// Parse a comma separated relation list such as `"tasks:hasMany, owner:belongsTo"`.
///
/// # Errors
///
/// Only structural problems are errors. Unknown relation kinds end up in
/// [`ParsedRelations::rejected`].
pub fn parse_relations(raw: &str) -> Result<ParsedRelations, ParseError> {
    let mut parsed = ParsedRelations::default();
    for token in split_top_level(raw)? {
        match parse_relation(&token) {
            Ok(relation) => {
                if parsed.relations.contains(&relation) {
                    warn!(related = %relation.related, kind = %relation.kind, "duplicate relation ignored");
                    continue;
                }
                parsed.relations.push(relation);
            }
            Err(GenerateError::Parse(err)) => return Err(err),
            Err(err) => {
                warn!(error = %err, "skipping relation");
                parsed.rejected.push(err);
            }
        }
    }
    Ok(parsed)
}
