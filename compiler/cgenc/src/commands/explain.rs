//! The `explain` command: display documentation for error codes.

use std::process::ExitCode;

use cgen_diagnostic::{ErrorCode, ErrorDocs};

/// Print the documentation for an error code string.
pub fn explain_error(code_str: &str) -> ExitCode {
    let Ok(code) = code_str.parse::<ErrorCode>() else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX where X is a digit.");
        eprintln!("Known codes: {}", known_codes());
        return ExitCode::FAILURE;
    };

    if let Some(doc) = ErrorDocs::get(code) {
        println!("{doc}");
        ExitCode::SUCCESS
    } else {
        eprintln!("No documentation available for {code}: {}", code.title());
        ExitCode::FAILURE
    }
}

fn known_codes() -> String {
    ErrorDocs::all_codes()
        .map(|code| code.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
