//! Unit tests for CLI commands

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::cli::{run, Cli, Commands};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_generate_command_parses() {
    let cli = Cli::try_parse_from([
        "crudforge",
        "generate",
        "Project",
        "--fields",
        "name:string,status:enum(open, closed)",
        "--relations",
        "tasks:hasMany",
        "--dry-run",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            entity,
            fields,
            relations,
            root,
            config,
            dry_run,
        } => {
            assert_eq!(entity, "Project");
            assert_eq!(fields, "name:string,status:enum(open, closed)");
            assert_eq!(relations.as_deref(), Some("tasks:hasMany"));
            assert_eq!(root, PathBuf::from("."));
            assert!(config.is_none());
            assert!(dry_run);
        }
        Commands::List { .. } => panic!("Expected Generate command"),
    }
}

#[test]
fn test_generate_requires_fields() {
    assert!(Cli::try_parse_from(["crudforge", "generate", "Project"]).is_err());
}

#[test]
fn test_list_command_parses() {
    let cli = Cli::try_parse_from(["crudforge", "list", "--root", "app"]).unwrap();
    match cli.command {
        Commands::List { root, .. } => assert_eq!(root, PathBuf::from("app")),
        Commands::Generate { .. } => panic!("Expected List command"),
    }
}

#[test]
fn test_run_generate_records_entity() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_str().unwrap();
    let cli = Cli::try_parse_from([
        "crudforge", "generate", "invoices", "--fields", "number:integer", "--root", root,
    ])
    .unwrap();
    run(&cli).unwrap();

    assert!(dir.path().join("app/Models/Invoice.php").exists());
    let registry = fs::read_to_string(dir.path().join("storage/crud_models.json")).unwrap();
    assert!(registry.contains("\"Invoice\""));
}

#[test]
fn test_run_rejects_missing_root() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");
    let cli = Cli::try_parse_from([
        "crudforge",
        "list",
        "--root",
        missing.to_str().unwrap(),
    ])
    .unwrap();
    let err = run(&cli).unwrap_err();
    assert!(err.to_string().contains("not a directory"));
}
