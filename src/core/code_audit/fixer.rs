//! Auto-fix: rewrite every file an audit flagged so its namespace matches
//! its directory.
//!
//! Two modes:
//! - Dry run: returns the planned rewrites without modifying files
//! - Write mode: applies them to disk, one file at a time

use std::path::Path;

use super::{AuditResult, SkippedFile};
use crate::error::Result;
use crate::project::ProjectRoot;
use crate::refactor::{self, SyncResult};

/// Result of running the fixer over one audit.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FixResult {
    pub fixes: Vec<SyncResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
    pub files_modified: usize,
}

/// Sync each discrepant file of `audit`.
///
/// Files that can no longer be rewritten (changed since the audit, say)
/// land in `skipped`; the rest are still fixed.
pub fn fix_discrepancies(
    project: &ProjectRoot,
    audit: &AuditResult,
    dry_run: bool,
) -> Result<FixResult> {
    let mut fixes = Vec::new();
    let mut skipped = Vec::new();

    for discrepancy in &audit.discrepancies {
        let file = Path::new(&discrepancy.file);
        match refactor::sync_file(file, project, dry_run) {
            Ok(result) => fixes.push(result),
            Err(err) => skipped.push(SkippedFile::from_error(file, &err)),
        }
    }

    let files_modified = fixes.iter().filter(|f| f.applied).count();

    if !dry_run {
        log_status!("fix", "Rewrote {} file(s)", files_modified);
    }

    Ok(FixResult {
        fixes,
        skipped,
        files_modified,
    })
}
