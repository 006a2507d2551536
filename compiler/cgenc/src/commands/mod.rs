//! Command handlers for the `cgen` CLI.
//!
//! Each submodule implements one command. Handlers print their own output
//! and return the process exit code; `report` renders pipeline errors.

use std::process::ExitCode;

use crate::CompileError;

mod check;
mod explain;
mod generate;

pub use check::check_file;
pub use explain::explain_error;
pub use generate::{generate_file, GenerateOptions};

/// Print `err` to stderr as diagnostics and return the failure exit code.
pub(crate) fn report(err: &CompileError) -> ExitCode {
    let diagnostics = err.diagnostics();
    if diagnostics.is_empty() {
        eprintln!("error: {err}");
    }
    for diag in &diagnostics {
        eprintln!("{diag}");
    }
    if let Some(code) = diagnostics.first().map(|d| d.code) {
        eprintln!();
        eprintln!("For more information about this error, try `cgen explain {code}`.");
    }
    ExitCode::FAILURE
}
