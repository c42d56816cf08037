//! jagged binary entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    match jagged::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            jagged::ui::output::error(format_args!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
