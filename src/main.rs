use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{audit, expected, run, sync};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "nssync")]
#[command(version = VERSION)]
#[command(about = "Keep C# namespaces in line with the directory layout")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report files whose namespace does not match their directory
    Audit(audit::AuditArgs),
    /// Rewrite files' namespace declarations to match their directory
    Sync(sync::SyncArgs),
    /// Show the namespace a file's location implies
    Expected(expected::ExpectedArgs),
    /// Audit selected projects and sync selected files, in order
    Run(run::RunArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if output::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
