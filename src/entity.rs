//! Entity specifications: one named data concept with its fields and relations.

use crate::dsl::{FieldKind, FieldSpec, RelationKind, RelationSpec};
use crate::naming::NameForms;

/// Where an entity in a plan came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityOrigin {
    /// Named on the command line
    Root,
    /// Created by relation expansion for a `hasMany` declared on `owner`
    Synthesized {
        /// Canonical name of the entity that declared the relation
        owner: String,
    },
}

/// A fully named entity ready for planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpec {
    /// Every spelling of the entity name
    pub names: NameForms,
    /// Declared fields, in order
    pub fields: Vec<FieldSpec>,
    /// Declared relations, in order
    pub relations: Vec<RelationSpec>,
    /// Root or synthesized
    pub origin: EntityOrigin,
}

impl EntitySpec {
    /// The entity named by the user.
    pub fn root(name: &str, fields: Vec<FieldSpec>, relations: Vec<RelationSpec>) -> Self {
        EntitySpec {
            names: NameForms::resolve(name),
            fields,
            relations,
            origin: EntityOrigin::Root,
        }
    }

    /// An entity created for the `hasMany` side of `owner`'s relation.
    ///
    /// It gets [`default_fields`] and a single `belongsTo` back to the owner.
    pub fn synthesized(name: &str, owner: &str) -> Self {
        EntitySpec {
            names: NameForms::resolve(name),
            fields: default_fields(),
            relations: vec![RelationSpec::new(owner, RelationKind::BelongsTo)],
            origin: EntityOrigin::Synthesized {
                owner: owner.to_string(),
            },
        }
    }

    /// Canonical singular name, the key of the entity within a plan.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.names.studly
    }

    /// Storage table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.names.snake_plural
    }

    /// Whether the user named this entity directly.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.origin == EntityOrigin::Root
    }

    /// Relations of the given kind, in declaration order.
    pub fn relations_of(&self, kind: RelationKind) -> impl Iterator<Item = &RelationSpec> {
        self.relations.iter().filter(move |r| r.kind == kind)
    }
}

/// Field set given to synthesized entities: `title:string, description:text, status:string`.
#[must_use]
pub fn default_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("title", FieldKind::String),
        FieldSpec::new("description", FieldKind::Text),
        FieldSpec::new("status", FieldKind::String),
    ]
}
