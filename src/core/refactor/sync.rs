//! Namespace sync — rewrite one file's namespace declaration to match its path.
//!
//! 1. Derive the expected namespace from the file's location in its project
//! 2. Parse the file and find its first namespace declaration
//! 3. Splice the expected name over the declared one
//! 4. Re-parse the result, then write it back atomically (or preview it)
//!
//! The file is either fully rewritten or left byte-identical.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::local_files::{self, FileSystem};
use crate::namespace::{self, SourceTree};
use crate::project::ProjectRoot;

/// A computed rewrite for one file, not yet written.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub file: PathBuf,
    pub previous: String,
    pub namespace: String,
    content: String,
}

impl SyncPlan {
    pub fn is_change(&self) -> bool {
        self.previous != self.namespace
    }
}

/// Outcome of syncing one file.
#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    pub file: String,
    pub project: String,
    pub previous: String,
    pub namespace: String,
    pub changed: bool,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub applied: bool,
}

/// Compute the rewrite for `file` without touching disk.
pub fn plan_sync(file: &Path, project: &ProjectRoot) -> Result<SyncPlan> {
    let expected = namespace::derive(&project.root, &project.name, file)?;

    let original = local_files::local().read(file)?;
    let tree = SourceTree::parse(file, &original)?;
    tree.ensure_valid()?;

    let decl = tree
        .namespace()
        .ok_or_else(|| Error::namespace_not_found(file.display().to_string()))?;

    if decl.name == expected {
        return Ok(SyncPlan {
            file: file.to_path_buf(),
            previous: decl.name,
            namespace: expected,
            content: original,
        });
    }

    let content = tree.with_namespace(&decl, &expected);

    let rewritten = SourceTree::parse(file, &content)?;
    let still_valid = !rewritten.has_errors()
        && rewritten.namespace().is_some_and(|d| d.name == expected);
    if !still_valid {
        return Err(Error::source_parse_failed(
            file.display().to_string(),
            None,
            Some(format!(
                "derived namespace '{}' is not a valid C# namespace name",
                expected
            )),
        )
        .with_hint("Rename the offending directory or set project_name in nssync.json"));
    }

    Ok(SyncPlan {
        file: file.to_path_buf(),
        previous: decl.name,
        namespace: expected,
        content,
    })
}

/// Write a planned rewrite. Unchanged plans are not written.
pub fn apply_sync(plan: &SyncPlan) -> Result<bool> {
    if !plan.is_change() {
        return Ok(false);
    }
    local_files::local().write(&plan.file, &plan.content)?;
    Ok(true)
}

/// Sync one file's namespace with its path. With `dry_run`, nothing is written.
pub fn sync_file(file: &Path, project: &ProjectRoot, dry_run: bool) -> Result<SyncResult> {
    let plan = plan_sync(file, project)?;

    let applied = if dry_run { false } else { apply_sync(&plan)? };

    if applied {
        log_status!(
            "sync",
            "{}: {} -> {}",
            file.display(),
            plan.previous,
            plan.namespace
        );
    }

    Ok(SyncResult {
        file: file.display().to_string(),
        project: project.name.clone(),
        changed: plan.is_change(),
        previous: plan.previous,
        namespace: plan.namespace,
        dry_run,
        applied,
    })
}

/// Rewrite `file` in place so its namespace matches its location.
pub fn rewrite(file: &Path, project: &ProjectRoot) -> Result<SyncResult> {
    sync_file(file, project, false)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn rewrites_mismatched_namespace() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Shop");
        let file = root.join("Models").join("Order.cs");
        write(&file, "namespace Legacy\n{\n    public class Order { }\n}\n");

        let project = ProjectRoot::new(&root, "Shop");
        let result = sync_file(&file, &project, false).unwrap();

        assert!(result.changed);
        assert!(result.applied);
        assert_eq!(result.previous, "Legacy");
        assert_eq!(result.namespace, "Shop.Models");
        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "namespace Shop.Models\n{\n    public class Order { }\n}\n"
        );
    }

    #[test]
    fn second_run_is_a_no_op() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Shop");
        let file = root.join("Api").join("Controller.cs");
        write(&file, "namespace Wrong;\n\npublic class Controller { }\n");

        let project = ProjectRoot::new(&root, "Shop");
        sync_file(&file, &project, false).unwrap();
        let first = std::fs::read_to_string(&file).unwrap();

        let again = sync_file(&file, &project, false).unwrap();
        let second = std::fs::read_to_string(&file).unwrap();

        assert_eq!(first, second);
        assert!(!again.changed);
        assert!(!again.applied);
    }

    #[test]
    fn dry_run_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Shop");
        let file = root.join("Order.cs");
        let original = "namespace Legacy;\nclass Order { }\n";
        write(&file, original);

        let project = ProjectRoot::new(&root, "Shop");
        let result = sync_file(&file, &project, true).unwrap();

        assert!(result.changed);
        assert!(!result.applied);
        assert_eq!(result.namespace, "Shop");
        assert_eq!(std::fs::read_to_string(&file).unwrap(), original);
    }

    #[test]
    fn missing_namespace_fails_without_writing() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Shop");
        let file = root.join("Program.cs");
        let original = "public static class Program { public static void Main() { } }\n";
        write(&file, original);

        let project = ProjectRoot::new(&root, "Shop");
        let err = sync_file(&file, &project, false).unwrap_err();

        assert_eq!(err.code, ErrorCode::NamespaceNotFound);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), original);
    }

    #[test]
    fn syntax_error_fails_without_writing() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Shop");
        let file = root.join("Broken.cs");
        let original = "namespace Legacy\n{\n    public class {\n}\n";
        write(&file, original);

        let project = ProjectRoot::new(&root, "Shop");
        let err = sync_file(&file, &project, false).unwrap_err();

        assert_eq!(err.code, ErrorCode::SourceParseFailed);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), original);
    }

    #[test]
    fn non_utf8_file_is_refused_without_writing() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Shop");
        let file = root.join("Legacy.cs");
        let original: &[u8] = b"// r\xe9sum\xe9\nnamespace Legacy;\nclass Legacy { }\n";
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(&file, original).unwrap();

        let project = ProjectRoot::new(&root, "Shop");
        let err = sync_file(&file, &project, false).unwrap_err();

        assert_eq!(err.code, ErrorCode::SourceInvalidEncoding);
        assert_eq!(std::fs::read(&file).unwrap(), original);
    }

    #[test]
    fn invalid_derived_name_fails_without_writing() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Shop");
        let file = root.join("my folder").join("Thing.cs");
        let original = "namespace Legacy;\nclass Thing { }\n";
        write(&file, original);

        let project = ProjectRoot::new(&root, "Shop");
        let err = sync_file(&file, &project, false).unwrap_err();

        assert_eq!(err.code, ErrorCode::SourceParseFailed);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), original);
    }

    #[test]
    fn file_outside_project_fails() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Elsewhere").join("Thing.cs");
        write(&file, "namespace Legacy;\n");

        let project = ProjectRoot::new(dir.path().join("Shop"), "Shop");
        let err = sync_file(&file, &project, false).unwrap_err();
        assert_eq!(err.code, ErrorCode::NamespacePathResolution);
    }

    #[test]
    fn only_the_first_namespace_changes() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("Shop");
        let file = root.join("Multi.cs");
        write(
            &file,
            "namespace First { class A { } }\nnamespace Second { class B { } }\n",
        );

        let project = ProjectRoot::new(&root, "Shop");
        sync_file(&file, &project, false).unwrap();

        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "namespace Shop { class A { } }\nnamespace Second { class B { } }\n"
        );
    }
}
