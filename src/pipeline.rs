//! # Generation pipeline
//!
//! One invocation runs five stages in order:
//!
//! 1. **Parse** the field and relation descriptions ([`crate::dsl`])
//! 2. **Expand** relations into the full entity list ([`crate::relations`])
//! 3. **Plan** artifacts per entity ([`crate::planner`])
//! 4. **Render** every planned artifact ([`crate::render`])
//! 5. **Emit** the outputs through [`Storage`]
//!
//! Nothing is written until stages 1-4 have succeeded, so a malformed
//! description or a failing template leaves the project untouched. Once
//! emission starts there is no rollback: an I/O failure stops the run with the
//! earlier files already in place.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::dsl::{parse_fields, parse_relations};
use crate::entity::EntitySpec;
use crate::error::{GenerateError, ParseError};
use crate::guard;
use crate::naming::canonical_name;
use crate::planner::{ArtifactKind, GenerationPlan, PlanOptions, Planner};
use crate::registry::Registry;
use crate::relations;
use crate::render::{Output, Renderer};
use crate::report::{Report, Status};
use crate::storage::Storage;

/// What the user asked to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Entity name as typed; normalized to singular StudlyCase
    pub entity: String,
    /// Field description, e.g. `name:string,status:enum(open,closed)`
    pub fields: String,
    /// Relation description, e.g. `tasks:hasMany`
    pub relations: Option<String>,
}

impl GenerateRequest {
    /// Request for `entity` with `fields` and no relations.
    pub fn new(entity: impl Into<String>, fields: impl Into<String>) -> Self {
        GenerateRequest {
            entity: entity.into(),
            fields: fields.into(),
            relations: None,
        }
    }

    /// Add a relation description.
    #[must_use]
    pub fn with_relations(mut self, relations: impl Into<String>) -> Self {
        self.relations = Some(relations.into());
        self
    }
}

/// Runs parse, expand, plan, render and emit against one storage.
pub struct Pipeline<'a> {
    storage: &'a dyn Storage,
    renderer: &'a dyn Renderer,
    planner: Planner,
    options: PlanOptions,
    dry_run: bool,
}

impl<'a> Pipeline<'a> {
    /// Pipeline with the default planner, stamped with the current time.
    pub fn new(storage: &'a dyn Storage, renderer: &'a dyn Renderer) -> Self {
        Pipeline {
            storage,
            renderer,
            planner: Planner::default(),
            options: PlanOptions::now(),
            dry_run: false,
        }
    }

    /// Replace the planner.
    #[must_use]
    pub fn with_planner(mut self, planner: Planner) -> Self {
        self.planner = planner;
        self
    }

    /// Replace the planning options.
    #[must_use]
    pub fn with_options(mut self, options: PlanOptions) -> Self {
        self.options = options;
        self
    }

    /// Plan and render without writing anything.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Generate everything for `request`.
    ///
    /// The root entity is recorded in `registry` unless this is a dry run;
    /// the updated registry is returned with the plan. Every decision is
    /// added to `report`, including the fatal error if there is one.
    ///
    /// # Errors
    ///
    /// The first fatal [`GenerateError`]. Non-fatal problems only produce
    /// report lines.
    pub fn run(
        &self,
        request: &GenerateRequest,
        registry: Registry,
        report: &mut Report,
    ) -> Result<(GenerationPlan, Registry), GenerateError> {
        match self.execute(request, registry, report) {
            Ok(result) => Ok(result),
            Err(err) => {
                report.push(Status::Failed, None, request.entity.trim(), Some(err.to_string()));
                Err(err)
            }
        }
    }

    fn execute(
        &self,
        request: &GenerateRequest,
        mut registry: Registry,
        report: &mut Report,
    ) -> Result<(GenerationPlan, Registry), GenerateError> {
        let name = canonical_name(&request.entity);
        if name.is_empty() {
            return Err(ParseError::EmptyName {
                token: request.entity.clone(),
            }
            .into());
        }

        let fields = parse_fields(&request.fields)?;
        let parsed = parse_relations(request.relations.as_deref().unwrap_or_default())?;
        for rejected in &parsed.rejected {
            report.push(Status::Warning, None, name.as_str(), Some(rejected.to_string()));
        }

        let root = EntitySpec::root(&name, fields, parsed.relations);
        let entities = relations::expand(root);
        let plan = self.planner.plan(entities, self.storage, &self.options)?;
        for skipped in &plan.skipped {
            report.push(
                Status::Skipped,
                Some(skipped.kind),
                skipped.entity.as_str(),
                Some(skipped.reason.clone()),
            );
        }

        let mut rendered = Vec::with_capacity(plan.artifacts.len());
        for artifact in &plan.artifacts {
            rendered.push((artifact.kind(), self.renderer.render(artifact)?));
        }
        debug!(artifacts = rendered.len(), "rendered plan");

        let mut pending = HashMap::new();
        for (kind, outputs) in rendered {
            for output in outputs {
                self.emit(kind, output, &mut pending, report)?;
            }
        }

        if !self.dry_run && registry.record(&name) {
            debug!(entity = %name, "recorded in registry");
        }
        Ok((plan, registry))
    }

    /// Write one output. In a dry run, route files are simulated in `pending`
    /// so a line shared by several entities is only counted once.
    fn emit(
        &self,
        kind: ArtifactKind,
        output: Output,
        pending: &mut HashMap<PathBuf, String>,
        report: &mut Report,
    ) -> Result<(), GenerateError> {
        let subject = output.path().display().to_string();

        match output {
            Output::File { path, content } => {
                if self.dry_run {
                    report.push(Status::Planned, Some(kind), subject, None);
                    return Ok(());
                }
                self.ensure_parent(&path)?;
                self.storage.write_file(&path, &content)?;
                info!(kind = %kind, path = %subject, "wrote artifact");
                report.push(Status::Created, Some(kind), subject, None);
            }
            Output::Scaffold { path, content } => {
                if self.storage.read_file(&path)?.is_some() {
                    debug!(kind = %kind, path = %subject, "scaffold already present");
                    report.push(
                        Status::Skipped,
                        Some(kind),
                        subject,
                        Some("already exists".to_string()),
                    );
                    return Ok(());
                }
                if self.dry_run {
                    report.push(Status::Planned, Some(kind), subject, None);
                    return Ok(());
                }
                self.ensure_parent(&path)?;
                self.storage.write_file(&path, &content)?;
                info!(kind = %kind, path = %subject, "wrote scaffold");
                report.push(Status::Created, Some(kind), subject, None);
            }
            Output::Lines { path, lines } => {
                let appended = if self.dry_run {
                    if !pending.contains_key(&path) {
                        let current = self.storage.read_file(&path)?.unwrap_or_default();
                        pending.insert(path.clone(), current);
                    }
                    let content = pending.entry(path).or_default();
                    let missing = guard::missing_lines(content, &lines);
                    for line in &missing {
                        content.push('\n');
                        content.push_str(line);
                    }
                    missing
                } else {
                    guard::merge_route_lines(self.storage, &path, &lines)?.appended
                };

                if appended.is_empty() {
                    warn!(path = %subject, "routes already registered");
                    report.push(
                        Status::Skipped,
                        Some(kind),
                        subject,
                        Some("all lines already present".to_string()),
                    );
                } else {
                    let detail = format!("{} line(s)", appended.len());
                    let status = if self.dry_run {
                        Status::Planned
                    } else {
                        info!(path = %subject, lines = appended.len(), "appended routes");
                        Status::Updated
                    };
                    report.push(status, Some(kind), subject, Some(detail));
                }
            }
        }
        Ok(())
    }

    fn ensure_parent(&self, path: &Path) -> Result<(), GenerateError> {
        match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => self.storage.ensure_directory(parent),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::render::TemplateRenderer;
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;

    fn options(second: u32) -> PlanOptions {
        PlanOptions::at(
            NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(9, 0, second)
                .unwrap(),
        )
    }

    #[test]
    fn test_unknown_relation_kind_is_reported_not_fatal() {
        let storage = MemoryStorage::new();
        let renderer = TemplateRenderer::default();
        let pipeline = Pipeline::new(&storage, &renderer).with_options(options(0));
        let request = GenerateRequest::new("Project", "name:string")
            .with_relations("owner:hasOne, tasks:hasMany");
        let mut report = Report::new();

        let (plan, registry) = pipeline.run(&request, Registry::new(), &mut report).unwrap();
        assert_eq!(plan.entities.len(), 2);
        assert_eq!(report.count(Status::Warning), 1);
        assert!(report.entries()[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("invalid relation type 'hasOne'"));
        assert_eq!(registry.entities(), ["Project"]);
    }

    #[test]
    fn test_parse_error_writes_nothing() {
        let storage = MemoryStorage::new();
        let renderer = TemplateRenderer::default();
        let pipeline = Pipeline::new(&storage, &renderer);
        let mut report = Report::new();

        let err = pipeline
            .run(
                &GenerateRequest::new("Project", "name:enum(open,closed"),
                Registry::new(),
                &mut report,
            )
            .unwrap_err();
        assert!(matches!(err, GenerateError::Parse(ParseError::Unbalanced { .. })));
        assert!(storage.file_paths().is_empty());
        assert!(report.has_failures());
    }

    #[test]
    fn test_blank_entity_name_is_rejected() {
        let storage = MemoryStorage::new();
        let renderer = TemplateRenderer::default();
        let pipeline = Pipeline::new(&storage, &renderer);
        let err = pipeline
            .run(&GenerateRequest::new("  ", "name:string"), Registry::new(), &mut Report::new())
            .unwrap_err();
        assert!(matches!(err, GenerateError::Parse(ParseError::EmptyName { .. })));
    }

    #[test]
    fn test_symbol_only_relation_name_writes_nothing() {
        let storage = MemoryStorage::new();
        let renderer = TemplateRenderer::default();
        let err = Pipeline::new(&storage, &renderer)
            .run(
                &GenerateRequest::new("Project", "name:string").with_relations("_:hasMany"),
                Registry::new(),
                &mut Report::new(),
            )
            .unwrap_err();
        assert!(matches!(err, GenerateError::Parse(ParseError::EmptyName { .. })));
        assert!(storage.file_paths().is_empty());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let storage = MemoryStorage::new();
        let renderer = TemplateRenderer::default();
        let pipeline = Pipeline::new(&storage, &renderer)
            .with_options(options(0))
            .dry_run(true);
        let mut report = Report::new();

        let (plan, registry) = pipeline
            .run(&GenerateRequest::new("Project", "name:string"), Registry::new(), &mut report)
            .unwrap();
        assert!(!plan.artifacts.is_empty());
        assert!(storage.file_paths().is_empty());
        assert!(registry.is_empty());
        assert_eq!(report.count(Status::Created), 0);
        assert!(report.count(Status::Planned) > 0);
    }

    #[test]
    fn test_dry_run_counts_shared_route_lines_once() {
        let request = GenerateRequest::new("Project", "name:string").with_relations("tasks:hasMany");
        let renderer = TemplateRenderer::default();

        let dry_storage = MemoryStorage::new();
        let mut dry = Report::new();
        Pipeline::new(&dry_storage, &renderer)
            .with_options(options(0))
            .dry_run(true)
            .run(&request, Registry::new(), &mut dry)
            .unwrap();

        let real_storage = MemoryStorage::new();
        let mut real = Report::new();
        Pipeline::new(&real_storage, &renderer)
            .with_options(options(0))
            .run(&request, Registry::new(), &mut real)
            .unwrap();

        let route_details = |report: &Report| -> Vec<Option<String>> {
            report
                .entries()
                .iter()
                .filter(|e| e.kind == Some(ArtifactKind::RouteSet))
                .map(|e| e.detail.clone())
                .collect()
        };
        assert_eq!(route_details(&dry), route_details(&real));
    }

    #[test]
    fn test_custom_planner_limits_artifacts() {
        let storage = MemoryStorage::new();
        let renderer = TemplateRenderer::default();
        let mut planner = Planner::new();
        planner.register(Box::new(crate::planner::EntityDefinitionStep));
        let mut report = Report::new();

        let (plan, _) = Pipeline::new(&storage, &renderer)
            .with_planner(planner)
            .with_options(options(0))
            .run(&GenerateRequest::new("Project", "name:string"), Registry::new(), &mut report)
            .unwrap();
        assert!(plan
            .artifacts
            .iter()
            .all(|a| a.kind() == ArtifactKind::EntityDefinition));
        assert_eq!(storage.file_paths(), vec![PathBuf::from("app/Models/Project.php")]);
        assert_eq!(report.count(Status::Created), 1);
    }

    #[test]
    fn test_second_run_skips_schema_routes_and_layout() {
        let storage = MemoryStorage::new();
        let renderer = TemplateRenderer::default();
        let request = GenerateRequest::new("Project", "name:string").with_relations("tasks:hasMany");

        let mut first = Report::new();
        let (_, registry) = Pipeline::new(&storage, &renderer)
            .with_options(options(0))
            .run(&request, Registry::new(), &mut first)
            .unwrap();
        assert_eq!(first.count(Status::Skipped), 0);

        let mut second = Report::new();
        let (plan, registry) = Pipeline::new(&storage, &renderer)
            .with_options(options(30))
            .run(&request, registry, &mut second)
            .unwrap();

        assert_eq!(plan.artifacts_of(ArtifactKind::SchemaDefinition).count(), 0);
        let skipped: Vec<Option<ArtifactKind>> = second
            .entries()
            .iter()
            .filter(|e| e.status == Status::Skipped)
            .map(|e| e.kind)
            .collect();
        // per entity: one migration and both route files; plus the layout
        assert_eq!(
            skipped
                .iter()
                .filter(|k| **k == Some(ArtifactKind::SchemaDefinition))
                .count(),
            2
        );
        assert_eq!(
            skipped
                .iter()
                .filter(|k| **k == Some(ArtifactKind::RouteSet))
                .count(),
            4
        );
        assert!(skipped.contains(&Some(ArtifactKind::Layout)));
        assert_eq!(registry.entities(), ["Project"]);

        let migrations: Vec<_> = storage
            .file_paths()
            .into_iter()
            .filter(|p| p.starts_with("database/migrations"))
            .collect();
        assert_eq!(migrations.len(), 2);
    }
}
