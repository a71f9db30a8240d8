//! # Artifact Planner
//!
//! Turns the expanded entity list into a [`GenerationPlan`]: an ordered list
//! of [`ArtifactSpec`]s describing what to generate, without producing any
//! text. Rendering is a separate concern handled by [`crate::render`].
//!
//! ## Steps
//!
//! Each artifact kind is planned by an [`ArtifactStep`]. The planner keeps one
//! step per kind and runs them in [`ArtifactKind`] order for every entity:
//!
//! | Kind | Step | Notes |
//! |------|------|-------|
//! | model | [`EntityDefinitionStep`] | fillable fields and relation accessors |
//! | migration | [`SchemaDefinitionStep`] | guarded by [`crate::guard::check_schema`] |
//! | form request | [`ValidationRulesStep`] | one rule per field |
//! | API / web controller | [`ApiControllerStep`], [`WebControllerStep`] | five resource operations |
//! | routes | [`RouteSetStep`] | nested groups for `hasMany` |
//! | views | [`ViewSetStep`] | list/create/edit/show |
//! | layout | [`LayoutStep`] | root entity only |
//!
//! Adding an artifact kind means registering a step with [`Planner::register`];
//! the planning loop itself does not change.
//!
//! ## Skips
//!
//! A step returning a non-fatal error (see [`GenerateError::is_fatal`]) skips
//! that single artifact and records a [`SkippedArtifact`]. Any other error
//! aborts planning.

mod plan;
mod steps;

pub use plan::*;
pub use steps::{
    column_for, input_for, nested_path, rule_for, ApiControllerStep, ArtifactStep,
    EntityDefinitionStep, LayoutStep, PlanContext, PlanOptions, RouteSetStep,
    SchemaDefinitionStep, ValidationRulesStep, ViewSetStep, WebControllerStep, LAYOUT_VIEW,
    STRING_MAX_LENGTH,
};

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::entity::EntitySpec;
use crate::error::GenerateError;
use crate::storage::Storage;

/// Plans artifacts for a list of entities with one [`ArtifactStep`] per kind.
pub struct Planner {
    steps: BTreeMap<ArtifactKind, Box<dyn ArtifactStep>>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::with_default_steps()
    }
}

impl Planner {
    /// A planner with no steps.
    #[must_use]
    pub fn new() -> Self {
        Planner {
            steps: BTreeMap::new(),
        }
    }

    /// A planner with a step for every [`ArtifactKind`].
    #[must_use]
    pub fn with_default_steps() -> Self {
        let mut planner = Self::new();
        planner.register(Box::new(EntityDefinitionStep));
        planner.register(Box::new(SchemaDefinitionStep));
        planner.register(Box::new(ValidationRulesStep));
        planner.register(Box::new(ApiControllerStep));
        planner.register(Box::new(WebControllerStep));
        planner.register(Box::new(RouteSetStep));
        planner.register(Box::new(ViewSetStep));
        planner.register(Box::new(LayoutStep));
        planner
    }

    /// Register `step`, returning the step it replaced for the same kind.
    pub fn register(&mut self, step: Box<dyn ArtifactStep>) -> Option<Box<dyn ArtifactStep>> {
        self.steps.insert(step.kind(), step)
    }

    /// Kinds with a registered step, in planning order.
    #[must_use]
    pub fn kinds(&self) -> Vec<ArtifactKind> {
        self.steps.keys().copied().collect()
    }

    /// Plan every artifact for `entities`, root first.
    ///
    /// Artifacts come out grouped by entity, each group in [`ArtifactKind`]
    /// order. At most one schema definition is planned per table.
    ///
    /// # Errors
    ///
    /// The first fatal error returned by a step or by storage.
    pub fn plan(
        &self,
        entities: Vec<EntitySpec>,
        storage: &dyn Storage,
        options: &PlanOptions,
    ) -> Result<GenerationPlan, GenerateError> {
        let mut plan = GenerationPlan::new(entities.clone());

        {
            let ctx = PlanContext {
                storage,
                options,
                entities: &entities,
            };

            for entity in &entities {
                for (kind, step) in &self.steps {
                    match step.plan(entity, &ctx) {
                        Ok(Some(ArtifactData::SchemaDefinition(schema)))
                            if plan.plans_table(&schema.table) =>
                        {
                            debug!(table = %schema.table, "schema already planned in this run");
                            plan.skipped.push(SkippedArtifact {
                                entity: entity.name().to_string(),
                                kind: *kind,
                                reason: format!("table '{}' is already planned", schema.table),
                            });
                        }
                        Ok(Some(data)) => {
                            debug!(entity = %entity.name(), kind = %kind, "planned artifact");
                            plan.artifacts.push(ArtifactSpec {
                                entity: entity.clone(),
                                data,
                            });
                        }
                        Ok(None) => {}
                        Err(err) if !err.is_fatal() => {
                            warn!(entity = %entity.name(), kind = %kind, error = %err, "artifact skipped");
                            plan.skipped.push(SkippedArtifact {
                                entity: entity.name().to_string(),
                                kind: *kind,
                                reason: err.to_string(),
                            });
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }

        info!(
            entities = entities.len(),
            artifacts = plan.artifacts.len(),
            skipped = plan.skipped.len(),
            "generation plan ready"
        );

        Ok(plan)
    }
}
