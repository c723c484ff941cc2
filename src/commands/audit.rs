use clap::Args;
use serde::Serialize;

use nssync::code_audit::{self, fixer, AuditOptions, AuditResult};
use nssync::project;

use super::CmdResult;

#[derive(Args)]
pub struct AuditArgs {
    /// Project directories or .csproj files to audit
    #[arg(required = true)]
    pub projects: Vec<String>,

    /// Override the project name used as namespace prefix
    #[arg(long)]
    pub name: Option<String>,

    /// Rewrite every file whose namespace does not match its directory
    #[arg(long)]
    pub fix: bool,

    /// Report only: no report file append, no rewrites
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
pub struct ProjectAudit {
    #[serde(flatten)]
    pub audit: AuditResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<fixer::FixResult>,
}

impl ProjectAudit {
    /// Discrepancies still present on disk after this command.
    fn outstanding(&self) -> usize {
        let fixed = self.fix.as_ref().map_or(0, |f| f.files_modified);
        self.audit.discrepancies.len().saturating_sub(fixed)
    }
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum AuditOutput {
    #[serde(rename = "audit")]
    Audit {
        dry_run: bool,
        projects: Vec<ProjectAudit>,
    },
}

pub fn run(args: AuditArgs, _global: &super::GlobalArgs) -> CmdResult<AuditOutput> {
    let paths = super::normalize_paths(&args.projects, "projects")?;
    let options = AuditOptions {
        dry_run: args.dry_run,
    };

    let mut projects = Vec::with_capacity(paths.len());
    for path in &paths {
        let project = project::resolve_project(path, args.name.as_deref())?;
        let audit = code_audit::audit_project(&project, &options)?;

        let fix = if args.fix && audit.has_discrepancies() {
            Some(fixer::fix_discrepancies(&project, &audit, args.dry_run)?)
        } else {
            None
        };

        projects.push(ProjectAudit { audit, fix });
    }

    let exit_code = if projects.iter().any(|p| p.outstanding() > 0) {
        1
    } else {
        0
    };

    Ok((
        AuditOutput::Audit {
            dry_run: args.dry_run,
            projects,
        },
        exit_code,
    ))
}
