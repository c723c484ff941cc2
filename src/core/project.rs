//! Project resolution: which root directory and logical name a selection
//! belongs to.
//!
//! A C# project is identified by its `*.csproj` file. Its directory is the
//! project root and its file stem is the display name used as namespace
//! prefix. Directories without a project file act as ad-hoc projects named
//! after the directory.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{self, ProjectConfig};
use crate::error::{Error, Result};
use crate::local_files::{self, FileSystem};

pub const PROJECT_FILE_EXTENSION: &str = "csproj";

/// A project root and the logical name its namespaces start with.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRoot {
    pub name: String,
    pub root: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_file: Option<PathBuf>,
    #[serde(skip)]
    pub config: ProjectConfig,
}

impl ProjectRoot {
    /// A project with default settings, for callers that already know both
    /// the root and the name.
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            project_file: None,
            config: ProjectConfig::default(),
        }
    }

    /// Build a project from its root, reading `nssync.json` if present.
    ///
    /// Name precedence: `name_override`, then the config's `project_name`,
    /// then `display_name`.
    pub fn load(
        root: &Path,
        display_name: &str,
        project_file: Option<PathBuf>,
        name_override: Option<&str>,
    ) -> Result<Self> {
        let config = config::read_project_config(root)?;
        let name = name_override
            .map(str::to_string)
            .or_else(|| config.project_name.clone())
            .unwrap_or_else(|| display_name.to_string());

        if name.trim().is_empty() {
            return Err(Error::validation_invalid_argument(
                "name",
                "Project name must not be empty",
                None,
                None,
            ));
        }

        Ok(Self {
            name,
            root: root.to_path_buf(),
            project_file,
            config,
        })
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join(&self.config.report_file)
    }
}

/// Expand `~`, make a CLI path absolute and canonicalize the part of it
/// that exists, so `..` and symlinks resolve the same way for files and
/// projects.
pub fn normalize_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::tilde(raw);
    let absolute = std::path::absolute(Path::new(expanded.as_ref()))
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("resolve path {}", raw))))?;
    Ok(canonicalize_existing(&absolute))
}

/// Canonicalize the longest existing ancestor of `path` and re-append the
/// rest. Paths that do not exist yet (`nssync expected New.cs`) keep their
/// missing tail.
fn canonicalize_existing(path: &Path) -> PathBuf {
    let mut missing = Vec::new();
    let mut current = path;
    loop {
        if let Ok(real) = current.canonicalize() {
            return missing.iter().rev().fold(real, |acc, part| acc.join(part));
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                current = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

pub fn is_project_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == PROJECT_FILE_EXTENSION)
}

/// The single project file directly inside `dir`, if any.
fn project_file_in(dir: &Path) -> Result<Option<PathBuf>> {
    let mut found: Vec<PathBuf> = local_files::local()
        .list(dir)?
        .into_iter()
        .filter(|entry| entry.has_extension(PROJECT_FILE_EXTENSION))
        .map(|entry| entry.path)
        .collect();

    match found.len() {
        0 => Ok(None),
        1 => Ok(found.pop()),
        _ => Err(Error::validation_invalid_argument(
            "project",
            format!("Multiple project files in {}", dir.display()),
            None,
            Some(found.iter().map(|p| p.display().to_string()).collect()),
        )
        .with_hint("Select the .csproj file itself, or pass --project <file.csproj>")),
    }
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::validation_invalid_argument(
                "project",
                format!("Cannot take a project name from {}", path.display()),
                None,
                None,
            )
        })
}

fn from_project_file(path: &Path, name_override: Option<&str>) -> Result<ProjectRoot> {
    let root = path.parent().ok_or_else(|| Error::project_not_found(path.display().to_string()))?;
    let display_name = file_stem(path)?;
    ProjectRoot::load(root, &display_name, Some(path.to_path_buf()), name_override)
}

/// Resolve a selected project: a `.csproj` file or a directory.
pub fn resolve_project(path: &Path, name_override: Option<&str>) -> Result<ProjectRoot> {
    if path.is_file() && is_project_file(path) {
        return from_project_file(path, name_override);
    }

    if !path.is_dir() {
        return Err(Error::project_not_found(path.display().to_string()));
    }

    if let Some(project_file) = project_file_in(path)? {
        return from_project_file(&project_file, name_override);
    }

    let display_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::project_not_found(path.display().to_string()))?;

    ProjectRoot::load(path, &display_name, None, name_override)
}

/// Find the project containing `file` by walking up to the nearest
/// directory that holds a project file.
pub fn containing_project(file: &Path, name_override: Option<&str>) -> Result<ProjectRoot> {
    let mut dir = file.parent();
    while let Some(current) = dir {
        if let Some(project_file) = project_file_in(current)? {
            return from_project_file(&project_file, name_override);
        }
        dir = current.parent();
    }

    Err(Error::project_not_found(file.display().to_string()))
}

/// Resolve the project for a selected source file: explicit `--project`
/// when given, otherwise the containing project.
pub fn resolve_for_file(
    file: &Path,
    project: Option<&Path>,
    name_override: Option<&str>,
) -> Result<ProjectRoot> {
    match project {
        Some(path) => resolve_project(path, name_override),
        None => containing_project(file, name_override),
    }
}
