use std::fmt;

/// The closed set of field kinds the DSL understands.
///
/// Schema columns and validation rules are both derived by matching on this
/// type, so a new kind has to be handled in each mapping before the crate
/// compiles again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `string`: short, bounded text
    String,
    /// `text` / `longText`: unbounded text
    Text,
    /// `integer` / `int`
    Integer,
    /// `boolean` / `bool`
    Boolean,
    /// `enum(a, b, ...)`: one of a fixed list of values
    Enum(Vec<String>),
    /// Any other type name, kept verbatim.
    ///
    /// Passed straight through as the column type and validated as a plain
    /// required string. This is the documented fallback for type names the
    /// mapping table does not know.
    Passthrough(String),
}

impl FieldKind {
    /// Map a bare type name to its kind. Never fails: unknown names become
    /// [`FieldKind::Passthrough`].
    #[must_use]
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "string" => FieldKind::String,
            "text" | "longText" => FieldKind::Text,
            "integer" | "int" => FieldKind::Integer,
            "boolean" | "bool" => FieldKind::Boolean,
            other => FieldKind::Passthrough(other.to_string()),
        }
    }

    /// The DSL spelling of this kind.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            FieldKind::String => "string".to_string(),
            FieldKind::Text => "text".to_string(),
            FieldKind::Integer => "integer".to_string(),
            FieldKind::Boolean => "boolean".to_string(),
            FieldKind::Enum(values) => format!("enum({})", values.join(",")),
            FieldKind::Passthrough(name) => name.clone(),
        }
    }
}

/// One parsed `name:type` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    /// Attribute name, non-empty
    pub name: String,
    /// Attribute kind
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Create a field spec.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldSpec {
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.kind.type_name())
    }
}

/// The two relation kinds the generator can wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// One owner, many related rows. Triggers synthesis of the related entity.
    HasMany,
    /// The inverse side; the related entity is assumed to exist.
    BelongsTo,
}

impl RelationKind {
    /// Match the exact, case-sensitive DSL keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "hasMany" => Some(RelationKind::HasMany),
            "belongsTo" => Some(RelationKind::BelongsTo),
            _ => None,
        }
    }

    /// The DSL keyword, which is also the accessor call in the entity definition.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            RelationKind::HasMany => "hasMany",
            RelationKind::BelongsTo => "belongsTo",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One parsed `related:kind` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationSpec {
    /// Canonical (singular StudlyCase) name of the related entity
    pub related: String,
    /// Relation kind
    pub kind: RelationKind,
}

impl RelationSpec {
    /// Create a relation spec. `related` is expected in canonical form.
    pub fn new(related: impl Into<String>, kind: RelationKind) -> Self {
        RelationSpec {
            related: related.into(),
            kind,
        }
    }
}
