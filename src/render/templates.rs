use askama::Template;
use std::path::PathBuf;

use super::{Output, Renderer};
use crate::config::{GeneratorConfig, PathsConfig};
use crate::dsl::RelationKind;
use crate::error::GenerateError;
use crate::naming::capitalize;
use crate::planner::{
    ArtifactData, ArtifactSpec, Column, ControllerSpec, EntityDefinition, InputKind, LayoutSpec,
    Operation, RouteSet, SchemaDefinition, ValidationRules, ViewPage, ViewSet, LAYOUT_VIEW,
};

/// Template data for a model class
#[derive(Template)]
#[template(path = "model.php.txt", escape = "none")]
struct ModelTemplateData {
    class_name: String,
    fillable: String,
    soft_deletes: bool,
    accessors: Vec<AccessorView>,
}

struct AccessorView {
    method: String,
    call: &'static str,
    related: String,
}

/// Template data for a migration
#[derive(Template)]
#[template(path = "migration.php.txt", escape = "none")]
struct MigrationTemplateData {
    table: String,
    columns: Vec<String>,
}

/// Template data for a form request
#[derive(Template)]
#[template(path = "request.php.txt", escape = "none")]
struct RequestTemplateData {
    class_name: String,
    rules: Vec<RuleView>,
}

struct RuleView {
    field: String,
    constraints: String,
}

/// Operations exposed by a controller, as template flags
struct OperationFlags {
    list: bool,
    create: bool,
    read_one: bool,
    update: bool,
    delete: bool,
}

impl OperationFlags {
    fn from_operations(operations: &[Operation]) -> Self {
        OperationFlags {
            list: operations.contains(&Operation::List),
            create: operations.contains(&Operation::Create),
            read_one: operations.contains(&Operation::ReadOne),
            update: operations.contains(&Operation::Update),
            delete: operations.contains(&Operation::Delete),
        }
    }
}

/// Template data for the JSON API controller
#[derive(Template)]
#[template(path = "api_controller.php.txt", escape = "none")]
struct ApiControllerTemplateData<'a> {
    spec: &'a ControllerSpec,
    ops: OperationFlags,
}

/// Template data for the web controller
#[derive(Template)]
#[template(path = "web_controller.php.txt", escape = "none")]
struct WebControllerTemplateData<'a> {
    spec: &'a ControllerSpec,
    ops: OperationFlags,
}

/// Everything the view templates need, with Blade expressions prebuilt
struct ViewModel {
    layout: String,
    title: String,
    collection: String,
    item: String,
    fields: Vec<FieldView>,
    store_url: String,
    update_url: String,
    show_url: String,
    edit_url: String,
    destroy_url: String,
    val_echo: String,
    val_label: String,
}

struct FieldView {
    name: String,
    label: String,
    display: String,
    old_value: String,
    is_choice: bool,
    is_multiline: bool,
    choices: String,
    selected: String,
}

#[derive(Template)]
#[template(path = "views/index.txt", escape = "none")]
struct IndexView<'a> {
    v: &'a ViewModel,
}

#[derive(Template)]
#[template(path = "views/create.txt", escape = "none")]
struct CreateView<'a> {
    v: &'a ViewModel,
}

#[derive(Template)]
#[template(path = "views/edit.txt", escape = "none")]
struct EditView<'a> {
    v: &'a ViewModel,
}

#[derive(Template)]
#[template(path = "views/show.txt", escape = "none")]
struct ShowView<'a> {
    v: &'a ViewModel,
}

/// Template data for the shared layout
#[derive(Template)]
#[template(path = "layout.txt", escape = "none")]
struct LayoutTemplateData {
    app_name: String,
    home_url: String,
    links: Vec<NavLink>,
}

struct NavLink {
    url: String,
    label: String,
}

/// Blade echo of a PHP expression: `{{ expr }}`.
fn echo(expr: &str) -> String {
    format!("{{{{ {expr} }}}}")
}

fn route_url(resource: &str, action: &str, argument: Option<&str>) -> String {
    match argument {
        Some(arg) => echo(&format!("route(\"{resource}.{action}\", ${arg})")),
        None => echo(&format!("route(\"{resource}.{action}\")")),
    }
}

fn quoted_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ensure generated files end with exactly one newline.
fn finish(mut content: String) -> String {
    let trimmed = content.trim_end().len();
    content.truncate(trimmed);
    content.push('\n');
    content
}

/// Migration statement for one column.
fn column_statement(column: &Column) -> String {
    match column {
        Column::Id => "$table->id();".to_string(),
        Column::String { name } => format!("$table->string('{name}');"),
        Column::Text { name } => format!("$table->text('{name}')->nullable();"),
        Column::Integer { name } => format!("$table->integer('{name}');"),
        Column::Boolean { name } => format!("$table->boolean('{name}');"),
        Column::Enum { name, values } => {
            format!("$table->enum('{name}', [{}]);", quoted_list(values))
        }
        Column::Passthrough { name, column_type } => format!("$table->{column_type}('{name}');"),
        Column::SoftDeletes => "$table->softDeletes();".to_string(),
        Column::Timestamps => "$table->timestamps();".to_string(),
    }
}

/// Web route lines for a route set: one import and one resource route per group.
#[must_use]
pub fn web_route_lines(routes: &RouteSet) -> Vec<String> {
    routes
        .groups
        .iter()
        .flat_map(|group| {
            [
                format!("use App\\Http\\Controllers\\{};", group.controller),
                format!(
                    "Route::resource('{}', {}::class);",
                    group.path, group.controller
                ),
            ]
        })
        .collect()
}

/// API route lines for a route set, guarded by `middleware` unless it is empty.
#[must_use]
pub fn api_route_lines(routes: &RouteSet, middleware: &str) -> Vec<String> {
    let prefix = if middleware.is_empty() {
        "Route::".to_string()
    } else {
        format!("Route::middleware('{middleware}')->")
    };
    routes
        .groups
        .iter()
        .flat_map(|group| {
            [
                format!("use App\\Http\\Controllers\\Api\\{};", group.controller),
                format!(
                    "{prefix}apiResource('{}', {}::class);",
                    group.path, group.controller
                ),
            ]
        })
        .collect()
}

/// Renders artifacts for a Laravel project with askama templates.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    paths: PathsConfig,
    api_middleware: String,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

impl TemplateRenderer {
    /// Renderer writing to `paths`, guarding API routes with `api_middleware`.
    pub fn new(paths: PathsConfig, api_middleware: impl Into<String>) -> Self {
        TemplateRenderer {
            paths,
            api_middleware: api_middleware.into(),
        }
    }

    /// Renderer configured from a [`GeneratorConfig`].
    #[must_use]
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.paths.clone(), config.routes.api_middleware.clone())
    }

    fn class_path(dir: &std::path::Path, class_name: &str) -> PathBuf {
        dir.join(format!("{class_name}.php"))
    }

    fn render_model(&self, model: &EntityDefinition) -> Result<Output, GenerateError> {
        let data = ModelTemplateData {
            class_name: model.class_name.clone(),
            fillable: quoted_list(&model.fillable),
            soft_deletes: model.soft_deletes,
            accessors: model
                .accessors
                .iter()
                .map(|a| AccessorView {
                    method: a.method.clone(),
                    call: match a.kind {
                        RelationKind::HasMany => "hasMany",
                        RelationKind::BelongsTo => "belongsTo",
                    },
                    related: a.related.clone(),
                })
                .collect(),
        };
        Ok(Output::File {
            path: Self::class_path(&self.paths.models, &model.class_name),
            content: finish(data.render()?),
        })
    }

    fn render_migration(&self, schema: &SchemaDefinition) -> Result<Output, GenerateError> {
        let data = MigrationTemplateData {
            table: schema.table.clone(),
            columns: schema.columns.iter().map(column_statement).collect(),
        };
        Ok(Output::File {
            path: self.paths.migrations.join(format!("{}.php", schema.file_stem)),
            content: finish(data.render()?),
        })
    }

    fn render_request(&self, rules: &ValidationRules) -> Result<Output, GenerateError> {
        let data = RequestTemplateData {
            class_name: rules.class_name.clone(),
            rules: rules
                .rules
                .iter()
                .map(|r| RuleView {
                    field: r.field.clone(),
                    constraints: r.rule.constraints().join("|"),
                })
                .collect(),
        };
        Ok(Output::File {
            path: Self::class_path(&self.paths.requests, &rules.class_name),
            content: finish(data.render()?),
        })
    }

    fn render_api_controller(&self, spec: &ControllerSpec) -> Result<Output, GenerateError> {
        let data = ApiControllerTemplateData {
            spec,
            ops: OperationFlags::from_operations(&spec.operations),
        };
        Ok(Output::File {
            path: Self::class_path(&self.paths.api_controllers, &spec.class_name),
            content: finish(data.render()?),
        })
    }

    fn render_web_controller(&self, spec: &ControllerSpec) -> Result<Output, GenerateError> {
        let data = WebControllerTemplateData {
            spec,
            ops: OperationFlags::from_operations(&spec.operations),
        };
        Ok(Output::File {
            path: Self::class_path(&self.paths.web_controllers, &spec.class_name),
            content: finish(data.render()?),
        })
    }

    fn render_routes(&self, routes: &RouteSet) -> Vec<Output> {
        vec![
            Output::Lines {
                path: self.paths.web_routes.clone(),
                lines: web_route_lines(routes),
            },
            Output::Lines {
                path: self.paths.api_routes.clone(),
                lines: api_route_lines(routes, &self.api_middleware),
            },
        ]
    }

    fn view_model(views: &ViewSet) -> ViewModel {
        let item = views.item_variable.as_str();
        let resource = views.resource.as_str();
        let fields = views
            .fields
            .iter()
            .map(|field| {
                let name = field.name.as_str();
                let (is_choice, choices) = match &field.input {
                    InputKind::Choice(values) => (true, quoted_list(values)),
                    InputKind::MultiLine | InputKind::SingleLine => (false, String::new()),
                };
                FieldView {
                    name: name.to_string(),
                    label: field.label.clone(),
                    display: echo(&format!("${item}->{name}")),
                    old_value: echo(&format!("old('{name}', ${item}->{name} ?? '')")),
                    is_choice,
                    is_multiline: field.input == InputKind::MultiLine,
                    choices,
                    selected: echo(&format!(
                        "old('{name}', ${item}->{name} ?? '') == $val ? 'selected' : ''"
                    )),
                }
            })
            .collect();

        ViewModel {
            layout: LAYOUT_VIEW.to_string(),
            title: views.title.clone(),
            collection: views.collection_variable.clone(),
            item: item.to_string(),
            fields,
            store_url: route_url(resource, "store", None),
            update_url: route_url(resource, "update", Some(item)),
            show_url: route_url(resource, "show", Some(item)),
            edit_url: route_url(resource, "edit", Some(item)),
            destroy_url: route_url(resource, "destroy", Some(item)),
            val_echo: echo("$val"),
            val_label: echo("ucfirst($val)"),
        }
    }

    fn render_views(&self, views: &ViewSet) -> Result<Vec<Output>, GenerateError> {
        let model = Self::view_model(views);
        let dir = self.paths.views.join(&views.resource);
        views
            .pages
            .iter()
            .map(|page| -> Result<Output, GenerateError> {
                let content = match page {
                    ViewPage::List => IndexView { v: &model }.render()?,
                    ViewPage::Create => CreateView { v: &model }.render()?,
                    ViewPage::Edit => EditView { v: &model }.render()?,
                    ViewPage::Show => ShowView { v: &model }.render()?,
                };
                Ok(Output::File {
                    path: dir.join(format!("{}.blade.php", page.file_name())),
                    content: finish(content),
                })
            })
            .collect()
    }

    fn render_layout(&self, layout: &LayoutSpec) -> Result<Output, GenerateError> {
        let data = LayoutTemplateData {
            app_name: echo("config('app.name', 'Laravel')"),
            home_url: echo("url('/')"),
            links: layout
                .navigation
                .iter()
                .map(|resource| NavLink {
                    url: route_url(resource, "index", None),
                    label: capitalize(&resource.replace('_', " ")),
                })
                .collect(),
        };
        Ok(Output::Scaffold {
            path: self.paths.layout.clone(),
            content: finish(data.render()?),
        })
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, artifact: &ArtifactSpec) -> Result<Vec<Output>, GenerateError> {
        match &artifact.data {
            ArtifactData::EntityDefinition(model) => Ok(vec![self.render_model(model)?]),
            ArtifactData::SchemaDefinition(schema) => Ok(vec![self.render_migration(schema)?]),
            ArtifactData::ValidationRules(rules) => Ok(vec![self.render_request(rules)?]),
            ArtifactData::ApiController(spec) => Ok(vec![self.render_api_controller(spec)?]),
            ArtifactData::WebController(spec) => Ok(vec![self.render_web_controller(spec)?]),
            ArtifactData::RouteSet(routes) => Ok(self.render_routes(routes)),
            ArtifactData::ViewSet(views) => self.render_views(views),
            ArtifactData::Layout(layout) => Ok(vec![self.render_layout(layout)?]),
        }
    }
}
