//! Namespace audit: compare every source file's declared namespace with the
//! one its location implies.
//!
//! 1. Enumerate source files under the project root
//! 2. Parse each file and take its first namespace declaration
//! 3. Derive the expected namespace from the file's directory
//! 4. Record each mismatch and append it to the project's report file
//!
//! Source files are never modified here; see [`fixer`] for that.

mod findings;
pub mod fixer;
mod report;
mod walk;

use std::path::Path;

pub use findings::{Discrepancy, SkippedFile};
pub use report::ReportWriter;
pub use walk::{relative_display, source_files};

use crate::error::{Error, ErrorCode, Result};
use crate::local_files::{self, FileSystem};
use crate::namespace::{self, SourceTree};
use crate::project::ProjectRoot;

/// Helper for `skip_serializing_if` on zero-value usize fields.
fn is_zero(v: &usize) -> bool {
    *v == 0
}

#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    /// Compare only; leave the report file alone.
    pub dry_run: bool,
}

/// Summary counts for the audit report.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct AuditSummary {
    pub files_scanned: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub files_without_namespace: usize,
    pub discrepancies_found: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub files_skipped: usize,
}

/// Complete result of auditing one project.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuditResult {
    pub project: String,
    pub root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,
    pub summary: AuditSummary,
    pub discrepancies: Vec<Discrepancy>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

impl AuditResult {
    pub fn has_discrepancies(&self) -> bool {
        !self.discrepancies.is_empty()
    }
}

/// Outcome of checking a single file.
enum FileCheck {
    Matches,
    NoNamespace,
    Mismatch(Discrepancy),
}

// ============================================================================
// Public API
// ============================================================================

/// Audit `project` and append its discrepancies to the report file.
pub fn audit(project: &ProjectRoot) -> Result<AuditResult> {
    audit_project(project, &AuditOptions::default())
}

/// Audit every source file of `project`.
///
/// Files that are not UTF-8, fail to parse or sit outside the root are
/// reported as skipped and the audit continues. I/O failures abort it.
pub fn audit_project(project: &ProjectRoot, options: &AuditOptions) -> Result<AuditResult> {
    log_status!(
        "audit",
        "Scanning {} ({})...",
        project.root.display(),
        project.name
    );

    let files = source_files(project)?;

    let report_path = project.report_path();
    let mut report = if options.dry_run {
        None
    } else {
        Some(ReportWriter::open(&report_path)?)
    };

    let mut summary = AuditSummary::default();
    let mut discrepancies = Vec::new();
    let mut skipped = Vec::new();

    for file in &files {
        summary.files_scanned += 1;

        match check_file(project, file) {
            Ok(FileCheck::Matches) => {}
            Ok(FileCheck::NoNamespace) => summary.files_without_namespace += 1,
            Ok(FileCheck::Mismatch(discrepancy)) => {
                if let Some(writer) = report.as_mut() {
                    writer.append(&discrepancy)?;
                }
                discrepancies.push(discrepancy);
            }
            Err(err) if is_skippable(&err) => {
                log_status!("audit", "Skipping {}: {}", file.display(), err.message);
                skipped.push(SkippedFile::from_error(file, &err));
            }
            Err(err) => return Err(err),
        }
    }

    if let Some(writer) = report {
        let appended = writer.finish()?;
        log_status!(
            "audit",
            "Appended {} line(s) to {}",
            appended,
            report_path.display()
        );
    }

    summary.discrepancies_found = discrepancies.len();
    summary.files_skipped = skipped.len();

    log_status!(
        "audit",
        "Complete: {} files, {} discrepancies, {} skipped",
        summary.files_scanned,
        summary.discrepancies_found,
        summary.files_skipped
    );

    Ok(AuditResult {
        project: project.name.clone(),
        root: project.root.display().to_string(),
        report_path: (!options.dry_run).then(|| report_path.display().to_string()),
        summary,
        discrepancies,
        skipped,
    })
}

fn check_file(project: &ProjectRoot, file: &Path) -> Result<FileCheck> {
    let content = local_files::local().read(file)?;
    let tree = SourceTree::parse(file, &content)?;
    tree.ensure_valid()?;

    let Some(decl) = tree.namespace() else {
        return Ok(FileCheck::NoNamespace);
    };

    let expected = namespace::derive(&project.root, &project.name, file)?;
    if decl.name == expected {
        return Ok(FileCheck::Matches);
    }

    Ok(FileCheck::Mismatch(Discrepancy::new(decl.name, expected, file)))
}

fn is_skippable(err: &Error) -> bool {
    matches!(
        err.code,
        ErrorCode::SourceParseFailed
            | ErrorCode::SourceInvalidEncoding
            | ErrorCode::NamespacePathResolution
    )
}

// ============================================================================
// Tests
// ============================================================================
