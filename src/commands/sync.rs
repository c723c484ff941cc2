use clap::Args;
use serde::Serialize;

use nssync::project;
use nssync::refactor::{self, SyncResult};

use super::CmdResult;

#[derive(Args)]
pub struct SyncArgs {
    /// Source files whose namespace should follow their directory
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Project directory or .csproj file (default: nearest containing project)
    #[arg(long)]
    pub project: Option<String>,

    /// Override the project name used as namespace prefix
    #[arg(long)]
    pub name: Option<String>,

    /// Show the rewrite without writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum SyncOutput {
    #[serde(rename = "sync")]
    Sync {
        dry_run: bool,
        files: Vec<SyncResult>,
        files_modified: usize,
    },
}

pub fn run(args: SyncArgs, _global: &super::GlobalArgs) -> CmdResult<SyncOutput> {
    let files = super::normalize_paths(&args.files, "files")?;
    let project_path = args
        .project
        .as_deref()
        .map(project::normalize_path)
        .transpose()?;

    let mut results = Vec::with_capacity(files.len());
    for file in &files {
        let project =
            project::resolve_for_file(file, project_path.as_deref(), args.name.as_deref())?;
        results.push(refactor::sync_file(file, &project, args.dry_run)?);
    }

    let files_modified = results.iter().filter(|r| r.applied).count();

    Ok((
        SyncOutput::Sync {
            dry_run: args.dry_run,
            files: results,
            files_modified,
        },
        0,
    ))
}
