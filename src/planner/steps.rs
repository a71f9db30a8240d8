use chrono::{Local, NaiveDateTime};

use super::plan::{
    ArtifactData, ArtifactKind, Column, ControllerSpec, EntityDefinition, FieldRule, InputKind,
    LayoutSpec, Operation, RelationAccessor, RouteGroup, RouteSet, Rule, SchemaDefinition,
    ValidationRules, ViewField, ViewPage, ViewSet,
};
use crate::dsl::{FieldKind, FieldSpec, RelationKind};
use crate::entity::EntitySpec;
use crate::error::GenerateError;
use crate::guard;
use crate::naming::{capitalize, NameForms};
use crate::storage::Storage;

/// Maximum length enforced on `string` fields.
pub const STRING_MAX_LENGTH: u32 = 255;

/// View name of the shared layout every page extends.
pub const LAYOUT_VIEW: &str = "layouts.app";

/// Invocation-wide planning options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    /// Timestamp prefixed to migration file names
    pub timestamp: NaiveDateTime,
}

impl PlanOptions {
    /// Options stamped with the current local time.
    #[must_use]
    pub fn now() -> Self {
        PlanOptions {
            timestamp: Local::now().naive_local(),
        }
    }

    /// Options stamped with a fixed time.
    #[must_use]
    pub fn at(timestamp: NaiveDateTime) -> Self {
        PlanOptions { timestamp }
    }

    /// Migration file name prefix: `2024_05_01_120000`.
    #[must_use]
    pub fn timestamp_prefix(&self) -> String {
        self.timestamp.format("%Y_%m_%d_%H%M%S").to_string()
    }
}

/// What a step can see while planning one entity.
pub struct PlanContext<'a> {
    /// Storage consulted by the idempotency guard
    pub storage: &'a dyn Storage,
    /// Invocation options
    pub options: &'a PlanOptions,
    /// Every entity in the plan, root first
    pub entities: &'a [EntitySpec],
}

/// Plans one kind of artifact for an entity.
///
/// The [`Planner`](super::Planner) holds one step per [`ArtifactKind`];
/// registering a step for a kind replaces the previous one.
pub trait ArtifactStep {
    /// Kind this step produces.
    fn kind(&self) -> ArtifactKind;

    /// Plan the artifact for `entity`, or `Ok(None)` if it does not apply.
    ///
    /// # Errors
    ///
    /// A non-fatal error skips the artifact; a fatal one aborts planning.
    fn plan(
        &self,
        entity: &EntitySpec,
        ctx: &PlanContext<'_>,
    ) -> Result<Option<ArtifactData>, GenerateError>;
}

/// Schema column for a field.
#[must_use]
pub fn column_for(field: &FieldSpec) -> Column {
    let name = field.name.clone();
    match &field.kind {
        FieldKind::String => Column::String { name },
        FieldKind::Text => Column::Text { name },
        FieldKind::Integer => Column::Integer { name },
        FieldKind::Boolean => Column::Boolean { name },
        FieldKind::Enum(values) => Column::Enum {
            name,
            values: values.clone(),
        },
        FieldKind::Passthrough(column_type) => Column::Passthrough {
            name,
            column_type: column_type.clone(),
        },
    }
}

/// Validation rule for a field.
///
/// Deliberately separate from [`column_for`]: a nullable column may still be
/// required on input and vice versa.
#[must_use]
pub fn rule_for(field: &FieldSpec) -> Rule {
    match &field.kind {
        FieldKind::String => Rule::RequiredString {
            max: STRING_MAX_LENGTH,
        },
        FieldKind::Text => Rule::NullableString,
        FieldKind::Integer => Rule::RequiredInteger,
        FieldKind::Boolean => Rule::RequiredBoolean,
        FieldKind::Enum(values) => Rule::RequiredIn(values.clone()),
        FieldKind::Passthrough(_) => Rule::RequiredGeneric,
    }
}

/// Form input for a field.
#[must_use]
pub fn input_for(field: &FieldSpec) -> InputKind {
    match &field.kind {
        FieldKind::Enum(values) => InputKind::Choice(values.clone()),
        FieldKind::Text => InputKind::MultiLine,
        FieldKind::String
        | FieldKind::Integer
        | FieldKind::Boolean
        | FieldKind::Passthrough(_) => InputKind::SingleLine,
    }
}

/// Nested resource path for a child under a parent: `projects/{project}/tasks`.
#[must_use]
pub fn nested_path(parent: &NameForms, child: &NameForms) -> String {
    format!(
        "{}/{{{}}}/{}",
        parent.snake_plural, parent.snake, child.snake_plural
    )
}

fn controller_name(names: &NameForms) -> String {
    format!("{}Controller", names.studly)
}

fn request_name(names: &NameForms) -> String {
    format!("{}Request", names.studly)
}

/// Model class with fillable attributes and relation accessors.
#[derive(Debug, Default, Clone, Copy)]
pub struct EntityDefinitionStep;

impl ArtifactStep for EntityDefinitionStep {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::EntityDefinition
    }

    fn plan(
        &self,
        entity: &EntitySpec,
        _ctx: &PlanContext<'_>,
    ) -> Result<Option<ArtifactData>, GenerateError> {
        let accessors = entity
            .relations
            .iter()
            .map(|relation| {
                let related = NameForms::resolve(&relation.related);
                let method = match relation.kind {
                    RelationKind::HasMany => related.camel_plural.clone(),
                    RelationKind::BelongsTo => related.camel.clone(),
                };
                RelationAccessor {
                    method,
                    related: related.studly,
                    kind: relation.kind,
                }
            })
            .collect();

        Ok(Some(ArtifactData::EntityDefinition(EntityDefinition {
            class_name: entity.names.studly.clone(),
            fillable: entity.fields.iter().map(|f| f.name.clone()).collect(),
            accessors,
            soft_deletes: true,
        })))
    }
}

/// Migration creating the entity's table, guarded against duplicates.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaDefinitionStep;

impl ArtifactStep for SchemaDefinitionStep {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::SchemaDefinition
    }

    fn plan(
        &self,
        entity: &EntitySpec,
        ctx: &PlanContext<'_>,
    ) -> Result<Option<ArtifactData>, GenerateError> {
        let table = entity.table_name();
        guard::check_schema(ctx.storage, table)?;

        let logical_name = guard::schema_logical_name(table);
        let mut columns = Vec::with_capacity(entity.fields.len() + 3);
        columns.push(Column::Id);
        columns.extend(entity.fields.iter().map(column_for));
        columns.push(Column::SoftDeletes);
        columns.push(Column::Timestamps);

        Ok(Some(ArtifactData::SchemaDefinition(SchemaDefinition {
            table: table.to_string(),
            file_stem: format!("{}_{logical_name}", ctx.options.timestamp_prefix()),
            logical_name,
            columns,
        })))
    }
}

/// Form request with one rule per field.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidationRulesStep;

impl ArtifactStep for ValidationRulesStep {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::ValidationRules
    }

    fn plan(
        &self,
        entity: &EntitySpec,
        _ctx: &PlanContext<'_>,
    ) -> Result<Option<ArtifactData>, GenerateError> {
        let rules = entity
            .fields
            .iter()
            .map(|field| FieldRule {
                field: field.name.clone(),
                rule: rule_for(field),
            })
            .collect();
        Ok(Some(ArtifactData::ValidationRules(ValidationRules {
            class_name: request_name(&entity.names),
            rules,
        })))
    }
}

fn controller_spec(entity: &EntitySpec) -> ControllerSpec {
    ControllerSpec {
        class_name: controller_name(&entity.names),
        model: entity.names.studly.clone(),
        variable: entity.names.camel.clone(),
        request_class: request_name(&entity.names),
        resource: entity.names.snake_plural.clone(),
        operations: Operation::ALL.to_vec(),
    }
}

/// JSON API controller.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApiControllerStep;

impl ArtifactStep for ApiControllerStep {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::ApiController
    }

    fn plan(
        &self,
        entity: &EntitySpec,
        _ctx: &PlanContext<'_>,
    ) -> Result<Option<ArtifactData>, GenerateError> {
        Ok(Some(ArtifactData::ApiController(controller_spec(entity))))
    }
}

/// Web controller backed by views.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebControllerStep;

impl ArtifactStep for WebControllerStep {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::WebController
    }

    fn plan(
        &self,
        entity: &EntitySpec,
        _ctx: &PlanContext<'_>,
    ) -> Result<Option<ArtifactData>, GenerateError> {
        Ok(Some(ArtifactData::WebController(controller_spec(entity))))
    }
}

/// Top-level resource group plus one nested group per `hasMany`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RouteSetStep;

impl ArtifactStep for RouteSetStep {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::RouteSet
    }

    fn plan(
        &self,
        entity: &EntitySpec,
        _ctx: &PlanContext<'_>,
    ) -> Result<Option<ArtifactData>, GenerateError> {
        let mut groups = vec![RouteGroup {
            path: entity.names.snake_plural.clone(),
            controller: controller_name(&entity.names),
            parent: None,
        }];
        for relation in entity.relations_of(RelationKind::HasMany) {
            let child = NameForms::resolve(&relation.related);
            groups.push(RouteGroup {
                path: nested_path(&entity.names, &child),
                controller: controller_name(&child),
                parent: Some(entity.names.studly.clone()),
            });
        }
        Ok(Some(ArtifactData::RouteSet(RouteSet { groups })))
    }
}

/// List/create/edit/show views.
#[derive(Debug, Default, Clone, Copy)]
pub struct ViewSetStep;

impl ArtifactStep for ViewSetStep {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::ViewSet
    }

    fn plan(
        &self,
        entity: &EntitySpec,
        _ctx: &PlanContext<'_>,
    ) -> Result<Option<ArtifactData>, GenerateError> {
        let fields = entity
            .fields
            .iter()
            .map(|field| ViewField {
                name: field.name.clone(),
                label: capitalize(&field.name),
                input: input_for(field),
            })
            .collect();
        Ok(Some(ArtifactData::ViewSet(ViewSet {
            resource: entity.names.snake_plural.clone(),
            title: entity.names.studly_plural.clone(),
            item_variable: entity.names.camel.clone(),
            collection_variable: entity.names.snake_plural.clone(),
            fields,
            pages: ViewPage::ALL.to_vec(),
        })))
    }
}

/// Shared layout, planned once with the root entity.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutStep;

impl ArtifactStep for LayoutStep {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Layout
    }

    fn plan(
        &self,
        entity: &EntitySpec,
        ctx: &PlanContext<'_>,
    ) -> Result<Option<ArtifactData>, GenerateError> {
        if !entity.is_root() {
            return Ok(None);
        }
        Ok(Some(ArtifactData::Layout(LayoutSpec {
            name: LAYOUT_VIEW.to_string(),
            navigation: ctx
                .entities
                .iter()
                .map(|e| e.names.snake_plural.clone())
                .collect(),
        })))
    }
}
