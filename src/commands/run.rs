use clap::Args;
use serde::Serialize;

use nssync::selection::{self, RunOptions, SelectionOutcome};

use super::CmdResult;

#[derive(Args)]
pub struct RunArgs {
    /// Projects (directories, .csproj files) to audit and source files to sync
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Override the project name used as namespace prefix
    #[arg(long)]
    pub name: Option<String>,

    /// Audit without appending to reports, sync without writing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RunOutput {
    #[serde(rename = "run")]
    Run {
        dry_run: bool,
        outcomes: Vec<SelectionOutcome>,
    },
}

pub fn run(args: RunArgs, _global: &super::GlobalArgs) -> CmdResult<RunOutput> {
    let paths = super::normalize_paths(&args.paths, "paths")?;
    let selections = selection::classify_all(&paths)?;

    let options = RunOptions {
        name: args.name,
        dry_run: args.dry_run,
    };
    let outcomes = selection::process(&selections, &options)?;

    let exit_code = if outcomes.iter().any(SelectionOutcome::has_discrepancies) {
        1
    } else {
        0
    };

    Ok((
        RunOutput::Run {
            dry_run: options.dry_run,
            outcomes,
        },
        exit_code,
    ))
}
