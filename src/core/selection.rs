//! Mixed selections: a list of paths, each one either a project (audited)
//! or a source file (synced).
//!
//! Entries are handled one after another; each finishes completely, report
//! included, before the next starts. The first error stops the run.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::code_audit::{self, AuditOptions, AuditResult};
use crate::error::{Error, Result};
use crate::project::{self, ProjectRoot};
use crate::refactor::{self, SyncResult};

/// What a selected path stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A project directory or `.csproj` file.
    Project(PathBuf),
    /// A single source file.
    File(PathBuf),
}

impl Selection {
    pub fn classify(path: &Path) -> Result<Self> {
        if path.is_dir() || (path.is_file() && project::is_project_file(path)) {
            return Ok(Selection::Project(path.to_path_buf()));
        }
        if path.is_file() {
            return Ok(Selection::File(path.to_path_buf()));
        }

        Err(Error::validation_invalid_argument(
            "path",
            format!("Path does not exist: {}", path.display()),
            Some(path.display().to_string()),
            None,
        ))
    }

    pub fn path(&self) -> &Path {
        match self {
            Selection::Project(path) | Selection::File(path) => path,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub name: Option<String>,
    pub dry_run: bool,
}

/// Result of processing one selected entry.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionOutcome {
    Audit(AuditResult),
    Sync(SyncResult),
}

impl SelectionOutcome {
    pub fn has_discrepancies(&self) -> bool {
        matches!(self, SelectionOutcome::Audit(result) if result.has_discrepancies())
    }
}

/// Classify every path up front, so a typo fails before any work is done.
pub fn classify_all(paths: &[PathBuf]) -> Result<Vec<Selection>> {
    if paths.is_empty() {
        return Err(Error::validation_missing_argument(vec!["paths".to_string()]));
    }
    paths.iter().map(|p| Selection::classify(p)).collect()
}

/// Process `selections` in order, stopping at the first error.
pub fn process(selections: &[Selection], options: &RunOptions) -> Result<Vec<SelectionOutcome>> {
    let name = options.name.as_deref();
    let mut outcomes = Vec::with_capacity(selections.len());

    for selection in selections {
        let outcome = match selection {
            Selection::Project(path) => {
                let project = project::resolve_project(path, name)?;
                let audit_options = AuditOptions {
                    dry_run: options.dry_run,
                };
                SelectionOutcome::Audit(code_audit::audit_project(&project, &audit_options)?)
            }
            Selection::File(path) => {
                let project: ProjectRoot = project::containing_project(path, name)?;
                SelectionOutcome::Sync(refactor::sync_file(path, &project, options.dry_run)?)
            }
        };
        outcomes.push(outcome);
    }

    Ok(outcomes)
}
