use clap::Args;
use serde::Serialize;

use nssync::{namespace, project};

use super::CmdResult;

#[derive(Args)]
pub struct ExpectedArgs {
    /// Source file to derive the namespace for (need not exist)
    pub file: String,

    /// Project directory or .csproj file (default: nearest containing project)
    #[arg(long)]
    pub project: Option<String>,

    /// Override the project name used as namespace prefix
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum ExpectedOutput {
    #[serde(rename = "expected")]
    Expected {
        file: String,
        project: String,
        root: String,
        namespace: String,
    },
}

pub fn run(args: ExpectedArgs, _global: &super::GlobalArgs) -> CmdResult<ExpectedOutput> {
    let file = project::normalize_path(&args.file)?;
    let project_path = args
        .project
        .as_deref()
        .map(project::normalize_path)
        .transpose()?;

    let project = project::resolve_for_file(&file, project_path.as_deref(), args.name.as_deref())?;
    let namespace = namespace::derive(&project.root, &project.name, &file)?;

    Ok((
        ExpectedOutput::Expected {
            file: file.display().to_string(),
            project: project.name,
            root: project.root.display().to_string(),
            namespace,
        },
        0,
    ))
}
