//! # Relation expansion
//!
//! A `hasMany` relation names an entity that may not exist yet. Expansion
//! walks the relation graph starting at the root entity and synthesizes each
//! missing entity with the default field set and a `belongsTo` pointing back
//! at its owner, then expands the synthesized entity in turn.
//!
//! The walk is a breadth-first work queue over a set of names already
//! scheduled. An entity is synthesized at most once, so relation graphs that
//! loop back on themselves terminate after every distinct name has been seen.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::dsl::RelationKind;
use crate::entity::EntitySpec;

/// Expand `root` into the ordered list of entities a plan must cover.
///
/// The root comes first, followed by synthesized entities in the order their
/// owning relations were declared (breadth first).
#[must_use]
pub fn expand(root: EntitySpec) -> Vec<EntitySpec> {
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(root.name().to_string());

    let mut entities = vec![root];
    let mut queue: VecDeque<usize> = VecDeque::from([0]);

    while let Some(index) = queue.pop_front() {
        let owner = entities[index].name().to_string();
        let related: Vec<String> = entities[index]
            .relations_of(RelationKind::HasMany)
            .map(|relation| relation.related.clone())
            .collect();

        for name in related {
            if !seen.insert(name.clone()) {
                debug!(owner = %owner, related = %name, "related entity already in plan, not synthesizing");
                continue;
            }
            debug!(owner = %owner, related = %name, "synthesizing related entity");
            entities.push(EntitySpec::synthesized(&name, &owner));
            queue.push_back(entities.len() - 1);
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{FieldKind, FieldSpec, RelationSpec};
    use crate::entity::{default_fields, EntityOrigin};

    fn project(relations: Vec<RelationSpec>) -> EntitySpec {
        EntitySpec::root(
            "Project",
            vec![FieldSpec::new("name", FieldKind::String)],
            relations,
        )
    }

    #[test]
    fn test_has_many_synthesizes_with_reciprocal() {
        let entities = expand(project(vec![RelationSpec::new(
            "Task",
            RelationKind::HasMany,
        )]));
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].name(), "Project");

        let task = &entities[1];
        assert_eq!(task.name(), "Task");
        assert_eq!(task.fields, default_fields());
        assert_eq!(
            task.relations,
            vec![RelationSpec::new("Project", RelationKind::BelongsTo)]
        );
        assert_eq!(
            task.origin,
            EntityOrigin::Synthesized {
                owner: "Project".to_string()
            }
        );
    }

    #[test]
    fn test_belongs_to_does_not_synthesize() {
        let entities = expand(project(vec![RelationSpec::new(
            "Client",
            RelationKind::BelongsTo,
        )]));
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].relations.len(), 1);
    }

    #[test]
    fn test_discovery_order_follows_declaration() {
        let entities = expand(project(vec![
            RelationSpec::new("Task", RelationKind::HasMany),
            RelationSpec::new("Client", RelationKind::BelongsTo),
            RelationSpec::new("Milestone", RelationKind::HasMany),
        ]));
        let names: Vec<_> = entities.iter().map(EntitySpec::name).collect();
        assert_eq!(names, vec!["Project", "Task", "Milestone"]);
    }

    #[test]
    fn test_self_reference_terminates() {
        let entities = expand(project(vec![RelationSpec::new(
            "Project",
            RelationKind::HasMany,
        )]));
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn test_repeated_relation_synthesizes_once() {
        let entities = expand(project(vec![
            RelationSpec::new("Task", RelationKind::HasMany),
            RelationSpec::new("Task", RelationKind::HasMany),
        ]));
        assert_eq!(entities.len(), 2);
    }
}
