use std::path::Path;

use nssync::code_audit::{self, fixer, AuditOptions};
use nssync::config::{CONFIG_FILE, DEFAULT_REPORT_FILE};
use nssync::project;
use nssync::refactor;
use nssync::selection::{self, RunOptions, SelectionOutcome};
use nssync::ErrorCode;
use tempfile::tempdir;

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn inventory_project(root: &Path) {
    write(&root.join("Inventory.Core.csproj"), "<Project Sdk=\"Microsoft.NET.Sdk\" />");
    write(
        &root.join("Items").join("Item.cs"),
        "using System;\n\nnamespace Inventory.Core.Items\n{\n    public class Item { }\n}\n",
    );
    write(
        &root.join("Items").join("Stock").join("Level.cs"),
        "// stock levels\nnamespace Inventory.Stock\n{\n    /* keep */ public class Level { }\n}\n",
    );
    write(
        &root.join("Warehouse.cs"),
        "namespace Inventory;\n\npublic class Warehouse { }\n",
    );
    write(
        &root.join("obj").join("Debug").join("Generated.cs"),
        "namespace Whatever;\n",
    );
}

#[test]
fn audit_uses_project_file_stem_as_prefix() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("src");
    inventory_project(&root);

    let project = project::resolve_project(&root, None).unwrap();
    assert_eq!(project.name, "Inventory.Core");

    let result = code_audit::audit(&project).unwrap();

    assert_eq!(result.summary.files_scanned, 3);
    let expected: Vec<(&str, &str)> = result
        .discrepancies
        .iter()
        .map(|d| (d.declared.as_str(), d.expected.as_str()))
        .collect();
    assert_eq!(
        expected,
        vec![
            ("Inventory.Stock", "Inventory.Core.Items.Stock"),
            ("Inventory", "Inventory.Core"),
        ]
    );

    let report = std::fs::read_to_string(root.join(DEFAULT_REPORT_FILE)).unwrap();
    let level = root.join("Items").join("Stock").join("Level.cs");
    assert_eq!(
        report.lines().next().unwrap(),
        format!("Inventory.Stock {}", level.display())
    );
}

#[test]
fn audit_twice_doubles_the_report() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("src");
    inventory_project(&root);

    let project = project::resolve_project(&root, None).unwrap();
    code_audit::audit(&project).unwrap();
    code_audit::audit(&project).unwrap();

    let report = std::fs::read_to_string(root.join(DEFAULT_REPORT_FILE)).unwrap();
    assert_eq!(report.lines().count(), 4);
}

#[test]
fn fix_then_audit_is_clean_and_preserves_trivia() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("src");
    inventory_project(&root);

    let project = project::resolve_project(&root, None).unwrap();
    let audit = code_audit::audit_project(&project, &AuditOptions { dry_run: true }).unwrap();
    let fixed = fixer::fix_discrepancies(&project, &audit, false).unwrap();
    assert_eq!(fixed.files_modified, 2);

    let level = root.join("Items").join("Stock").join("Level.cs");
    assert_eq!(
        std::fs::read_to_string(&level).unwrap(),
        "// stock levels\nnamespace Inventory.Core.Items.Stock\n{\n    /* keep */ public class Level { }\n}\n"
    );

    let again = code_audit::audit_project(&project, &AuditOptions { dry_run: true }).unwrap();
    assert!(!again.has_discrepancies());
}

#[test]
fn config_name_and_excludes_apply() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("src");
    inventory_project(&root);
    write(
        &root.join(CONFIG_FILE),
        r#"{ "project_name": "Inventory", "exclude": ["Items/**"] }"#,
    );

    let project = project::resolve_project(&root, None).unwrap();
    assert_eq!(project.name, "Inventory");

    let result = code_audit::audit_project(&project, &AuditOptions { dry_run: true }).unwrap();
    assert_eq!(result.summary.files_scanned, 1);
    assert!(!result.has_discrepancies());
}

#[test]
fn name_override_beats_config() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("src");
    inventory_project(&root);
    write(&root.join(CONFIG_FILE), r#"{ "project_name": "Inventory" }"#);

    let project = project::resolve_project(&root, Some("Acme")).unwrap();
    assert_eq!(project.name, "Acme");
}

#[test]
fn rewrite_finds_containing_project() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("src");
    inventory_project(&root);
    let warehouse = root.join("Warehouse.cs");

    let project = project::containing_project(&warehouse, None).unwrap();
    let result = refactor::rewrite(&warehouse, &project).unwrap();

    assert_eq!(result.previous, "Inventory");
    assert_eq!(result.namespace, "Inventory.Core");
    assert_eq!(
        std::fs::read_to_string(&warehouse).unwrap(),
        "namespace Inventory.Core;\n\npublic class Warehouse { }\n"
    );
}

#[test]
fn rewrite_without_namespace_leaves_bytes_identical() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("src");
    inventory_project(&root);
    let program = root.join("Program.cs");
    let original = "\u{feff}// entry point\npublic static class Program { }\n";
    write(&program, original);

    let project = project::containing_project(&program, None).unwrap();
    let err = refactor::rewrite(&program, &project).unwrap_err();

    assert_eq!(err.code, ErrorCode::NamespaceNotFound);
    assert_eq!(std::fs::read(&program).unwrap(), original.as_bytes());
}

#[test]
fn file_outside_any_project_is_not_found() {
    let dir = tempdir().unwrap();
    let loose = dir.path().join("loose").join("Thing.cs");
    write(&loose, "namespace Loose;\n");

    let err = project::containing_project(&loose, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::ProjectNotFound);
}

#[test]
fn run_processes_projects_and_files_in_order() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("src");
    inventory_project(&root);
    let warehouse = root.join("Warehouse.cs");

    let selections = selection::classify_all(&[root.clone(), warehouse.clone()]).unwrap();
    let outcomes = selection::process(&selections, &RunOptions::default()).unwrap();

    match (&outcomes[0], &outcomes[1]) {
        (SelectionOutcome::Audit(audit), SelectionOutcome::Sync(sync)) => {
            assert_eq!(audit.summary.discrepancies_found, 2);
            assert!(sync.applied);
        }
        other => panic!("unexpected outcomes: {:?}", other),
    }
}

#[test]
fn run_rejects_empty_selection() {
    let err = selection::classify_all(&[]).unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationMissingArgument);
}
