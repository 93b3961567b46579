use std::process::ExitCode;

use tracing::error;

fn main() -> ExitCode {
    match tagplay::runtime::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "tagplay exiting");
            ExitCode::FAILURE
        }
    }
}
