//! `tunable`: resolve declared parameters from layered sources.
//!
//! Usage: `tunable resolve --schema <file> [--source <file>]... [--set NAME=VALUE]...`

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let args = cli::Cli::parse();

    let mut log_config = tunable_log::Config::from_env();
    log_config.level = args.log_level;
    let _guard = match tunable_log::init_with(log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match commands::run(args.command) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
