use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use modlink_cli::cli::{Cli, Command};
use modlink_cli::commands;
use modlink_cli::logging::{self, Logger};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let printed = match &args.command {
        Command::Version => commands::version::run(&mut std::io::stdout().lock()),
        Command::Completions(opts) => {
            commands::completions::run(opts, &mut std::io::stdout().lock())
        }
        command => return run_logged(&args, command),
    };
    if printed.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Run an engine command with logging installed and surface its error once.
fn run_logged(args: &Cli, command: &Command) -> ExitCode {
    logging::init_subscriber(args.verbose, command.name());
    let log = Arc::new(Logger::new(command.name()));
    let global = &args.global;

    let result = match command {
        Command::Init(opts) => commands::init::run(global, opts, &log),
        Command::Link(opts) => commands::link::run(global, opts, &log),
        Command::Deploy(opts) => commands::deploy::run(global, opts, &log),
        Command::DeployAll(opts) => commands::deploy::run_all(global, opts, &log),
        Command::Repair => commands::deploy::repair(global, &log),
        Command::Remove(opts) => commands::remove::run(global, opts, &log),
        Command::Clean => commands::clean::run(global, &log),
        Command::Version | Command::Completions(_) => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            log.debug(&format!("log file: {}", log.log_path().display()));
            ExitCode::FAILURE
        }
    }
}
