//! Breakdown: turn a directive and a layer into a prompt.
//!
//! This is the main entry point for the `breakdown` CLI. It parses arguments,
//! sets up logging, runs the pipeline, and handles errors with proper exit
//! codes.

use breakdown::cli::{self, Cli};
use breakdown::{exit_codes, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("Warning: {}", err);
    }

    match cli::run(&cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(failure) => {
            if cli.json_errors {
                eprintln!("{}", failure.to_json());
            } else {
                eprintln!("Error: {}", failure);
            }

            ExitCode::from(failure.exit_code() as u8)
        }
    }
}
