//! The `check` command: parse and resolve a schema without generating code.

use std::path::Path;
use std::process::ExitCode;

use cgen_codegen::CodegenOptions;

use super::report;
use crate::{check_str, read_schema};

/// Check a schema file and print a one-line summary.
pub fn check_file(path: &Path, root_type: Option<String>) -> ExitCode {
    let options = CodegenOptions {
        root_type,
        ..CodegenOptions::default()
    };
    let checked = read_schema(path).and_then(|text| {
        let schema = check_str(&text, &options)?;
        let errors = cgen_codegen::check_names(&schema);
        if errors.is_empty() {
            Ok(schema)
        } else {
            Err(crate::CompileError::Codegen(errors))
        }
    });

    match checked {
        Ok(schema) => {
            println!(
                "{}: ok ({} structs, {} enums, root `{}`)",
                path.display(),
                schema.structs.len(),
                schema.enums.len(),
                schema.root_struct().name
            );
            ExitCode::SUCCESS
        }
        Err(err) => report(&err),
    }
}
