//! ReelSync - Movie Library Identification and Remote Sync
//!
//! Entry point for the ReelSync CLI application.

use clap::Parser;
use reelsync::{cli::Cli, error::ExitCode, logging};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    match reelsync::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;
            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
