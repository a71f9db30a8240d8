//! # crudforge
//!
//! **crudforge** generates a coordinated set of CRUD artifacts for a Laravel
//! project from a compact description of an entity:
//!
//! ```bash
//! crudforge generate Project \
//!     --fields "name:string, description:text, status:enum(open, closed)" \
//!     --relations "tasks:hasMany"
//! ```
//!
//! produces a model, a migration, a form request, an API controller, a web
//! controller, route registrations and list/create/edit/show views for
//! `Project`, and the same set for a synthesized `Task` that belongs to it.
//! Running the command again does not create a second migration or register
//! the routes twice.
//!
//! ## Architecture
//!
//! Data flows one way, leaf modules first:
//!
//! - **[`dsl`]** - parses field and relation descriptions
//! - **[`naming`]** - singular/plural/case forms of entity names
//! - **[`relations`]** - synthesizes entities for `hasMany` relations
//! - **[`guard`]** - idempotency checks for migrations and route files
//! - **[`planner`]** - decides which artifacts exist and what data they carry
//! - **[`render`]** - turns planned artifacts into file contents (askama)
//! - **[`storage`]** - filesystem and in-memory backends
//! - **[`pipeline`]** - runs parse, expand, plan, render and emit
//!
//! Around the core: [`config`] (`crudforge.toml`), [`registry`] (generated
//! entity list), [`report`] (per-artifact output lines), [`logging`] and
//! [`cli`].
//!
//! ## Usage from code
//!
//! ```rust,no_run
//! use crudforge::pipeline::{GenerateRequest, Pipeline};
//! use crudforge::registry::Registry;
//! use crudforge::render::TemplateRenderer;
//! use crudforge::report::{print_report, Report};
//! use crudforge::storage::MemoryStorage;
//!
//! let storage = MemoryStorage::new();
//! let renderer = TemplateRenderer::default();
//! let request = GenerateRequest::new("Project", "name:string").with_relations("tasks:hasMany");
//!
//! let mut report = Report::new();
//! let (_plan, _registry) = Pipeline::new(&storage, &renderer)
//!     .run(&request, Registry::new(), &mut report)?;
//! print_report(&report);
//! # Ok::<(), crudforge::error::GenerateError>(())
//! ```

pub mod cli;
pub mod config;
pub mod dsl;
pub mod entity;
pub mod error;
pub mod guard;
pub mod logging;
pub mod naming;
pub mod pipeline;
pub mod planner;
pub mod registry;
pub mod relations;
pub mod render;
pub mod report;
pub mod storage;

pub use error::{GenerateError, ParseError};
pub use pipeline::{GenerateRequest, Pipeline};
