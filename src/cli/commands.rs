use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::pipeline::{GenerateRequest, Pipeline};
use crate::registry::Registry;
use crate::render::TemplateRenderer;
use crate::report::{print_report, Report};
use crate::storage::FsStorage;

/// Command-line interface for crudforge
#[derive(Parser)]
#[command(name = "crudforge")]
#[command(about = "Generate CRUD scaffolding from a compact entity description", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate model, migration, request, controllers, routes and views
    Generate {
        /// Entity name, e.g. `Project` (normalized to singular StudlyCase)
        entity: String,

        /// Field description, e.g. "name:string, status:enum(open, closed)"
        #[arg(short, long)]
        fields: String,

        /// Relation description, e.g. "tasks:hasMany, owner:belongsTo"
        #[arg(short, long)]
        relations: Option<String>,

        /// Project root
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Configuration file (default: <root>/crudforge.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show what would be written without writing anything
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// List the entities generated so far
    List {
        /// Project root
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Configuration file (default: <root>/crudforge.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Parse the process arguments and run the selected command.
///
/// # Errors
///
/// Any fatal error from the command.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(&cli)
}

/// Run an already parsed command line.
///
/// # Errors
///
/// Configuration problems and fatal generation errors.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Generate {
            entity,
            fields,
            relations,
            root,
            config,
            dry_run,
        } => {
            let config = load_config(root, config.as_deref())?;
            let storage = FsStorage::new(root, config.clone());
            let renderer = TemplateRenderer::from_config(&config);
            let registry = Registry::load(&storage, &config.paths.registry)
                .context("Failed to load entity registry")?;

            let mut request = GenerateRequest::new(entity.as_str(), fields.as_str());
            request.relations = relations.clone();

            let mut report = Report::new();
            let outcome = Pipeline::new(&storage, &renderer)
                .dry_run(*dry_run)
                .run(&request, registry, &mut report);
            print_report(&report);

            let (plan, registry) = outcome?;
            if *dry_run {
                println!("\n📝 Dry run: {} artifact(s) planned, nothing written", plan.artifacts.len());
            } else {
                registry
                    .save(&storage, &config.paths.registry)
                    .context("Failed to save entity registry")?;
            }
            Ok(())
        }
        Commands::List { root, config } => {
            let config = load_config(root, config.as_deref())?;
            let storage = FsStorage::new(root, config.clone());
            let registry = Registry::load(&storage, &config.paths.registry)
                .context("Failed to load entity registry")?;
            if registry.is_empty() {
                println!("No entities generated yet");
                return Ok(());
            }
            println!("📋 Generated entities:");
            for name in registry.entities() {
                println!("   {name}");
            }
            Ok(())
        }
    }
}

fn load_config(root: &Path, explicit: Option<&Path>) -> anyhow::Result<GeneratorConfig> {
    if !root.is_dir() {
        bail!("project root {} is not a directory", root.display());
    }
    GeneratorConfig::resolve(root, explicit).context("Failed to load configuration")
}
