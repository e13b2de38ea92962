//! Integration tests for Solgraph
//!
//! These run the built binary against solutions written to a temp dir.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use solgraph_indexer::{LoadOptions, load_solution};
use tempfile::TempDir;

const CSHARP_KIND: &str = "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}";

fn manifest(projects: &[(&str, &str)]) -> String {
    let mut text = String::from("Microsoft Visual Studio Solution File, Format Version 12.00\n");
    for (i, (name, path)) in projects.iter().enumerate() {
        text.push_str(&format!(
            "Project(\"{}\") = \"{}\", \"{}\", \"{{AAAAAAAA-0000-0000-0000-{:012}}}\"\nEndProject\n",
            CSHARP_KIND,
            name,
            path,
            i + 1
        ));
    }
    text
}

fn project(references: &[&str]) -> String {
    let items: String = references
        .iter()
        .map(|r| format!("<ProjectReference Include=\"{}\" />", r))
        .collect();
    format!("<Project Sdk=\"Microsoft.NET.Sdk\"><ItemGroup>{}</ItemGroup></Project>", items)
}

fn write(root: &Path, path: &str, content: &str) {
    let full_path = root.join(path);
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full_path, content).unwrap();
}

/// Web -> Services -> Data, Web -> Data, plus an orphan Scratch.
fn clean_solution() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "Shop.sln",
        &manifest(&[
            ("Web", "Web\\Web.csproj"),
            ("Services", "Services\\Services.csproj"),
            ("Data", "Data\\Data.csproj"),
            ("Scratch", "Scratch\\Scratch.csproj"),
        ]),
    );
    write(root, "Web/Web.csproj", &project(&["..\\Services\\Services.csproj", "..\\Data\\Data.csproj"]));
    write(root, "Services/Services.csproj", &project(&["..\\Data\\Data.csproj"]));
    write(root, "Data/Data.csproj", &project(&[]));
    write(root, "Scratch/Scratch.csproj", &project(&[]));
    temp_dir
}

/// A <-> B cycle, with C depending on A.
fn cyclic_solution() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "Loop.sln",
        &manifest(&[("A", "A\\A.csproj"), ("B", "B\\B.csproj"), ("C", "C\\C.csproj")]),
    );
    write(root, "A/A.csproj", &project(&["..\\B\\B.csproj"]));
    write(root, "B/B.csproj", &project(&["..\\A\\A.csproj"]));
    write(root, "C/C.csproj", &project(&["..\\A\\A.csproj"]));
    temp_dir
}

fn solgraph(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_solgraph"))
        .args(args)
        .env_remove("SOLGRAPH_LOG")
        .output()
        .expect("Failed to execute solgraph")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_cli_help() {
    let output = solgraph(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Dependency levels of Visual Studio solutions"));
    assert!(stdout.contains("show"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("serve"));
}

#[test]
fn test_version() {
    let output = solgraph(&["version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Solgraph v"));
}

#[test]
fn test_show_json() {
    let temp_dir = clean_solution();
    let sln = temp_dir.path().join("Shop.sln");

    let output = solgraph(&["show", path_arg(&sln), "--json"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["name"], "Shop.sln");
    assert_eq!(report["project_count"], 4);

    let levels: Vec<Vec<String>> = report["levels"]
        .as_array()
        .unwrap()
        .iter()
        .map(|level| {
            level["projects"]
                .as_array()
                .unwrap()
                .iter()
                .map(|p| p["name"].as_str().unwrap().to_string())
                .collect()
        })
        .collect();
    assert_eq!(levels, vec![vec!["Web"], vec!["Services"], vec!["Data"]]);
    assert_eq!(report["orphans"], serde_json::json!(["Scratch"]));
}

#[test]
fn test_show_text() {
    let temp_dir = clean_solution();
    let sln = temp_dir.path().join("Shop.sln");

    let output = solgraph(&["show", path_arg(&sln)]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Solution: Shop.sln"));
    assert!(stdout.contains("Level 1"));
    assert!(stdout.contains("Level 3"));
    assert!(stdout.contains("1 orphan projects: Scratch"));
}

#[test]
fn test_check_clean_solution() {
    let temp_dir = clean_solution();
    let sln = temp_dir.path().join("Shop.sln");

    let output = solgraph(&["check", path_arg(&sln)]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Shop.sln: no problems"));
}

#[test]
fn test_check_reports_missing_project() {
    let temp_dir = clean_solution();
    fs::remove_file(temp_dir.path().join("Data/Data.csproj")).unwrap();
    let sln = temp_dir.path().join("Shop.sln");

    let output = solgraph(&["check", path_arg(&sln)]);
    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Data.csproj' does not exist"));
    assert!(stdout.contains("Shop.sln: 1 problems"));
}

#[test]
fn test_cycle_reporting_from_config_file() {
    let temp_dir = cyclic_solution();
    let sln = temp_dir.path().join("Loop.sln");

    // Cycles are silent by default.
    let output = solgraph(&["check", path_arg(&sln)]);
    assert!(output.status.success());

    write(temp_dir.path(), "solgraph.toml", "[resolve]\nreport_cycles = true\n");
    let output = solgraph(&["check", path_arg(&sln)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Dependency cycle between A, B"));
}

#[test]
fn test_explicit_config_must_exist() {
    let temp_dir = clean_solution();
    let sln = temp_dir.path().join("Shop.sln");
    let missing = temp_dir.path().join("missing.toml");

    let output = solgraph(&["--config", path_arg(&missing), "check", path_arg(&sln)]);
    assert!(!output.status.success());
}

#[test]
fn test_missing_solution_fails() {
    let temp_dir = TempDir::new().unwrap();
    let sln = temp_dir.path().join("Nothing.sln");

    let output = solgraph(&["show", path_arg(&sln)]);
    assert!(!output.status.success());
}

#[tokio::test]
async fn test_cycle_members_are_unplaced() {
    let temp_dir = cyclic_solution();
    let solution = load_solution(&temp_dir.path().join("Loop.sln"), &LoadOptions::default())
        .await
        .unwrap();

    let levels: Vec<Vec<&str>> = solution
        .levels()
        .iter()
        .map(|level| level.iter().map(|p| p.name.as_str()).collect())
        .collect();
    assert_eq!(levels, vec![vec!["C"]]);

    let unplaced: Vec<&str> = solution.unplaced().map(|p| p.name.as_str()).collect();
    assert_eq!(unplaced, vec!["A", "B"]);
    assert!(!solution.has_problems());
}
