use std::path::PathBuf;

pub type CmdResult<T> = nssync::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod audit;
pub mod expected;
pub mod run;
pub mod sync;

/// Expand and absolutize every CLI path argument.
pub(crate) fn normalize_paths(raw: &[String], field: &str) -> nssync::Result<Vec<PathBuf>> {
    if raw.is_empty() {
        return Err(nssync::Error::validation_missing_argument(vec![
            field.to_string(),
        ]));
    }
    raw.iter()
        .map(|p| nssync::project::normalize_path(p))
        .collect()
}

macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (nssync::Result<serde_json::Value>, i32) {
    crate::tty::status("nssync is working...");

    match command {
        crate::Commands::Audit(args) => dispatch!(args, global, audit),
        crate::Commands::Sync(args) => dispatch!(args, global, sync),
        crate::Commands::Expected(args) => dispatch!(args, global, expected),
        crate::Commands::Run(args) => dispatch!(args, global, run),
    }
}
