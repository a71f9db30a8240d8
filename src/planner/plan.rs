use std::fmt;

use crate::dsl::RelationKind;
use crate::entity::EntitySpec;

/// Version of the artifact plan layout produced by [`Planner`](super::Planner).
pub const PLAN_VERSION: u32 = 1;

/// Every kind of artifact the generator plans.
///
/// The declaration order is the order artifacts are planned and emitted for
/// each entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArtifactKind {
    /// Data-entity (model) class
    EntityDefinition,
    /// Storage schema (migration)
    SchemaDefinition,
    /// Input validation rules (form request)
    ValidationRules,
    /// JSON API controller
    ApiController,
    /// Interactive web controller
    WebController,
    /// Route registrations
    RouteSet,
    /// List/create/edit/show views
    ViewSet,
    /// Shared view layout, written once and never overwritten
    Layout,
}

impl ArtifactKind {
    /// All kinds, in planning order.
    pub const ALL: [ArtifactKind; 8] = [
        ArtifactKind::EntityDefinition,
        ArtifactKind::SchemaDefinition,
        ArtifactKind::ValidationRules,
        ArtifactKind::ApiController,
        ArtifactKind::WebController,
        ArtifactKind::RouteSet,
        ArtifactKind::ViewSet,
        ArtifactKind::Layout,
    ];

    /// Human readable label used in report lines.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::EntityDefinition => "model",
            ArtifactKind::SchemaDefinition => "migration",
            ArtifactKind::ValidationRules => "form request",
            ArtifactKind::ApiController => "API controller",
            ArtifactKind::WebController => "web controller",
            ArtifactKind::RouteSet => "routes",
            ArtifactKind::ViewSet => "views",
            ArtifactKind::Layout => "layout",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One planned artifact: what to generate and for which entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    /// The entity that owns this artifact
    pub entity: EntitySpec,
    /// Kind-specific data
    pub data: ArtifactData,
}

impl ArtifactSpec {
    /// Kind of this artifact, derived from its data.
    #[must_use]
    pub fn kind(&self) -> ArtifactKind {
        self.data.kind()
    }
}

/// Kind-specific payload of an [`ArtifactSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactData {
    /// Model class
    EntityDefinition(EntityDefinition),
    /// Migration
    SchemaDefinition(SchemaDefinition),
    /// Form request
    ValidationRules(ValidationRules),
    /// API controller
    ApiController(ControllerSpec),
    /// Web controller
    WebController(ControllerSpec),
    /// Route registrations
    RouteSet(RouteSet),
    /// Views
    ViewSet(ViewSet),
    /// Shared layout
    Layout(LayoutSpec),
}

impl ArtifactData {
    /// The [`ArtifactKind`] this payload belongs to.
    #[must_use]
    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactData::EntityDefinition(_) => ArtifactKind::EntityDefinition,
            ArtifactData::SchemaDefinition(_) => ArtifactKind::SchemaDefinition,
            ArtifactData::ValidationRules(_) => ArtifactKind::ValidationRules,
            ArtifactData::ApiController(_) => ArtifactKind::ApiController,
            ArtifactData::WebController(_) => ArtifactKind::WebController,
            ArtifactData::RouteSet(_) => ArtifactKind::RouteSet,
            ArtifactData::ViewSet(_) => ArtifactKind::ViewSet,
            ArtifactData::Layout(_) => ArtifactKind::Layout,
        }
    }
}

/// Model class: mass-assignable attributes and relation accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDefinition {
    /// Class name, e.g. `Project`
    pub class_name: String,
    /// Mass-assignable attribute names (the declared field names)
    pub fillable: Vec<String>,
    /// One accessor per relation
    pub accessors: Vec<RelationAccessor>,
    /// Whether rows are soft deleted
    pub soft_deletes: bool,
}

/// A relation accessor method on a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationAccessor {
    /// Method name: camelCase plural for `hasMany`, singular for `belongsTo`
    pub method: String,
    /// Related model class
    pub related: String,
    /// Relation kind
    pub kind: RelationKind,
}

/// One column of a storage schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// Auto-incrementing primary key
    Id,
    /// Bounded string column
    String {
        /// Column name
        name: String,
    },
    /// Nullable unbounded text column
    Text {
        /// Column name
        name: String,
    },
    /// Integer column
    Integer {
        /// Column name
        name: String,
    },
    /// Boolean column
    Boolean {
        /// Column name
        name: String,
    },
    /// Column constrained to a fixed value list
    Enum {
        /// Column name
        name: String,
        /// Allowed values
        values: Vec<String>,
    },
    /// Column of a type the generator does not interpret
    Passthrough {
        /// Column name
        name: String,
        /// Type name as written in the field definition
        column_type: String,
    },
    /// Soft-delete marker (`deleted_at`)
    SoftDeletes,
    /// `created_at` / `updated_at`
    Timestamps,
}

/// Migration for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDefinition {
    /// Table name
    pub table: String,
    /// Logical name that identifies the migration regardless of timestamp,
    /// e.g. `create_projects_table`
    pub logical_name: String,
    /// File stem including the timestamp prefix
    pub file_stem: String,
    /// Columns in order
    pub columns: Vec<Column>,
}

/// A single validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Required string with a maximum length
    RequiredString {
        /// Maximum length
        max: u32,
    },
    /// Optional string
    NullableString,
    /// Required and restricted to a fixed set of values
    RequiredIn(Vec<String>),
    /// Required integer
    RequiredInteger,
    /// Required boolean
    RequiredBoolean,
    /// Required, validated as a generic string
    RequiredGeneric,
}

impl Rule {
    /// The individual constraints, e.g. `["required", "string", "max:255"]`.
    #[must_use]
    pub fn constraints(&self) -> Vec<String> {
        match self {
            Rule::RequiredString { max } => {
                vec!["required".into(), "string".into(), format!("max:{max}")]
            }
            Rule::NullableString => vec!["nullable".into(), "string".into()],
            Rule::RequiredIn(values) => vec!["required".into(), format!("in:{}", values.join(","))],
            Rule::RequiredInteger => vec!["required".into(), "integer".into()],
            Rule::RequiredBoolean => vec!["required".into(), "boolean".into()],
            Rule::RequiredGeneric => vec!["required".into(), "string".into()],
        }
    }

    /// Whether the field must be present.
    #[must_use]
    pub fn is_required(&self) -> bool {
        !matches!(self, Rule::NullableString)
    }
}

/// Validation rule for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    /// Field name
    pub field: String,
    /// Rule
    pub rule: Rule,
}

/// Form request class with one rule per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    /// Class name, e.g. `ProjectRequest`
    pub class_name: String,
    /// Rules in field order
    pub rules: Vec<FieldRule>,
}

/// The five canonical resource operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// List all rows
    List,
    /// Create a row from a validated request
    Create,
    /// Show one row
    ReadOne,
    /// Update a row from a validated request
    Update,
    /// Delete a row
    Delete,
}

impl Operation {
    /// All operations in controller order.
    pub const ALL: [Operation; 5] = [
        Operation::List,
        Operation::Create,
        Operation::ReadOne,
        Operation::Update,
        Operation::Delete,
    ];
}

/// Controller exposing the resource operations for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSpec {
    /// Controller class name, e.g. `ProjectController`
    pub class_name: String,
    /// Model class name
    pub model: String,
    /// Singular variable identifier, e.g. `project`
    pub variable: String,
    /// Validated request class used by create and update
    pub request_class: String,
    /// Route and view prefix, e.g. `projects`
    pub resource: String,
    /// Exposed operations
    pub operations: Vec<Operation>,
}

/// A resource route group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGroup {
    /// Path, e.g. `projects` or `projects/{project}/tasks`
    pub path: String,
    /// Controller class handling the group
    pub controller: String,
    /// Parent entity for nested groups
    pub parent: Option<String>,
}

/// Route registrations for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSet {
    /// Top-level group first, then one nested group per `hasMany` relation
    pub groups: Vec<RouteGroup>,
}

/// Form input for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// Closed choice list
    Choice(Vec<String>),
    /// Multi-line text input
    MultiLine,
    /// Single-line text input
    SingleLine,
}

/// A field as shown in views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewField {
    /// Field name
    pub name: String,
    /// Display label
    pub label: String,
    /// Input widget
    pub input: InputKind,
}

/// View pages generated for every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewPage {
    /// Table of all rows
    List,
    /// Create form
    Create,
    /// Edit form
    Edit,
    /// Read-only detail page
    Show,
}

impl ViewPage {
    /// All pages.
    pub const ALL: [ViewPage; 4] = [ViewPage::List, ViewPage::Create, ViewPage::Edit, ViewPage::Show];

    /// Template/file name of the page.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            ViewPage::List => "index",
            ViewPage::Create => "create",
            ViewPage::Edit => "edit",
            ViewPage::Show => "show",
        }
    }
}

/// Views for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSet {
    /// View directory and route name prefix, e.g. `projects`
    pub resource: String,
    /// Plural display title, e.g. `Projects`
    pub title: String,
    /// Variable holding one row, e.g. `project`
    pub item_variable: String,
    /// Variable holding the list, e.g. `projects`
    pub collection_variable: String,
    /// Fields in order
    pub fields: Vec<ViewField>,
    /// Pages to generate
    pub pages: Vec<ViewPage>,
}

/// Shared layout every view extends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSpec {
    /// Layout name referenced by views, e.g. `layouts.app`
    pub name: String,
    /// Resource names to link from the navigation bar
    pub navigation: Vec<String>,
}

/// Why an entity's artifact was left out of the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedArtifact {
    /// Entity name
    pub entity: String,
    /// Artifact kind
    pub kind: ArtifactKind,
    /// Reason, as reported to the user
    pub reason: String,
}

/// The ordered set of artifacts for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    /// Layout version, see [`PLAN_VERSION`]
    pub version: u32,
    /// Root first, then synthesized entities in discovery order
    pub entities: Vec<EntitySpec>,
    /// Artifacts in emission order
    pub artifacts: Vec<ArtifactSpec>,
    /// Artifacts the idempotency guard left out
    pub skipped: Vec<SkippedArtifact>,
}

impl GenerationPlan {
    pub(crate) fn new(entities: Vec<EntitySpec>) -> Self {
        GenerationPlan {
            version: PLAN_VERSION,
            entities,
            artifacts: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// The entity the user asked for.
    #[must_use]
    pub fn root(&self) -> Option<&EntitySpec> {
        self.entities.first()
    }

    /// Artifacts of one kind, in plan order.
    pub fn artifacts_of(&self, kind: ArtifactKind) -> impl Iterator<Item = &ArtifactSpec> {
        self.artifacts.iter().filter(move |a| a.kind() == kind)
    }

    /// Whether a schema definition for `table` is already planned.
    #[must_use]
    pub fn plans_table(&self, table: &str) -> bool {
        self.artifacts.iter().any(|a| match &a.data {
            ArtifactData::SchemaDefinition(schema) => schema.table == table,
            _ => false,
        })
    }
}
