//! The `generate` command: write the Rust module, and optionally the key
//! reference, for a schema.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cgen_codegen::CodegenOptions;

use super::report;
use crate::{check_str, generate, read_schema, CompileError};

/// Where `generate` writes its outputs.
#[derive(Clone, Debug, Default)]
pub struct GenerateOptions {
    pub codegen: CodegenOptions,
    /// Module output path. Standard output when `None`.
    pub output: Option<PathBuf>,
    /// Markdown key reference output path.
    pub docs: Option<PathBuf>,
}

/// Generate code for a schema file.
pub fn generate_file(path: &Path, options: &GenerateOptions) -> ExitCode {
    match run(path, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn run(path: &Path, options: &GenerateOptions) -> Result<(), CompileError> {
    let text = read_schema(path)?;
    let schema = check_str(&text, &options.codegen)?;
    let code = generate(&schema, &options.codegen)?;

    match &options.output {
        Some(output) => write(output, &code)?,
        None => print!("{code}"),
    }
    if let Some(docs) = &options.docs {
        write(docs, &cgen_codegen::docs::emit_reference(&schema))?;
    }
    Ok(())
}

fn write(path: &Path, contents: &str) -> Result<(), CompileError> {
    tracing::debug!(path = %path.display(), bytes = contents.len(), "writing output");
    std::fs::write(path, contents).map_err(|source| CompileError::Io {
        path: path.to_owned(),
        source,
    })
}
