#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn crudforge(dir: &TempDir, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_crudforge");
    Command::new(exe)
        .current_dir(dir.path())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run cli")
}

#[test]
fn test_cli_generate_creates_artifacts() {
    let dir = TempDir::new().unwrap();
    let output = crudforge(
        &dir,
        &[
            "generate",
            "Project",
            "--fields",
            "name:string,status:enum(open, closed)",
            "--relations",
            "tasks:hasMany",
        ],
    );
    assert!(output.status.success(), "{output:?}");

    let root = dir.path();
    for path in [
        "app/Models/Project.php",
        "app/Models/Task.php",
        "app/Http/Requests/ProjectRequest.php",
        "app/Http/Controllers/ProjectController.php",
        "app/Http/Controllers/Api/TaskController.php",
        "resources/views/projects/index.blade.php",
        "resources/views/tasks/edit.blade.php",
        "resources/views/layouts/app.blade.php",
        "routes/web.php",
        "routes/api.php",
    ] {
        assert!(root.join(path).exists(), "missing {path}");
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✅ Created model app/Models/Project.php"));

    let registry = fs::read_to_string(root.join("storage/crud_models.json")).unwrap();
    assert_eq!(registry, "[\n  \"Project\"\n]\n");
}

#[test]
fn test_cli_rerun_warns_and_succeeds() {
    let dir = TempDir::new().unwrap();
    let args = ["generate", "Project", "--fields", "name:string"];
    assert!(crudforge(&dir, &args).status.success());

    let output = crudforge(&dir, &args);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Skipped migration Project"));
    assert!(stdout.contains("Skipped routes routes/web.php"));

    let list = crudforge(&dir, &["list"]);
    assert!(list.status.success());
    let stdout = String::from_utf8_lossy(&list.stdout);
    assert_eq!(stdout.matches("Project").count(), 1);
}

#[test]
fn test_cli_parse_error_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let output = crudforge(&dir, &["generate", "Project", "--fields", "name:enum(open,closed"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("❌"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_cli_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = crudforge(
        &dir,
        &["generate", "Project", "--fields", "name:string", "--dry-run"],
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Dry run"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
