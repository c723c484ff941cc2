//! Expected-namespace derivation from a file's position under its project.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Separator between namespace segments.
pub const NAMESPACE_SEPARATOR: char = '.';

/// Compute the namespace a file is expected to declare.
///
/// The file's directory is taken relative to `project_root` and each
/// directory segment below the root becomes a namespace segment, prefixed by
/// `project_name`. A file directly in the root yields `project_name` alone.
///
/// Paths are compared lexically after folding `.` and `..` segments;
/// callers pass both paths in the same form (both absolute, or both relative
/// to the same base) and resolve symlinks beforehand if they need to.
pub fn derive(project_root: &Path, project_name: &str, file_path: &Path) -> Result<String> {
    let resolution_error = |problem: &str| {
        Error::namespace_path_resolution(
            file_path.display().to_string(),
            project_root.display().to_string(),
            problem,
        )
    };

    let dir = file_path
        .parent()
        .ok_or_else(|| resolution_error("file path has no parent directory"))?;

    let dir = lexical_normalize(dir);
    let root = lexical_normalize(project_root);
    let relative = dir
        .strip_prefix(&root)
        .map_err(|_| resolution_error("file is not located under the project root"))?;

    let mut namespace = project_name.to_string();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment
                    .to_str()
                    .ok_or_else(|| resolution_error("directory name is not valid UTF-8"))?;
                namespace.push(NAMESPACE_SEPARATOR);
                namespace.push_str(segment);
            }
            Component::CurDir => {}
            _ => return Err(resolution_error("relative path escapes the project root")),
        }
    }

    Ok(namespace)
}

/// Fold `.` and `..` without touching the filesystem. A `..` that cannot be
/// folded (leading, or above the root) is kept.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let folds = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if folds {
                    out.pop();
                } else if !matches!(
                    out.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
