use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod builtins;
mod command;
mod config;
mod error;
mod input;
mod jobs;
mod process;
mod prompt;
mod redirects;
mod shell;
mod signal_handler;
mod status;
mod variables;

use config::{Args, Config, LOG_ENV};
use input::LineReader;
use shell::Shell;

fn print_version() {
    println!("smallsh v{}", env!("CARGO_PKG_VERSION"));
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    if args.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    init_tracing();

    let mut shell = Shell::new(Config::from(&args), LineReader::stdio());
    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("smallsh: {}", e);
            ExitCode::FAILURE
        }
    }
}
