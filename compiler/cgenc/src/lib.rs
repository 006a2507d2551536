//! The cgen schema compiler.
//!
//! Drives the pipeline from schema text to a generated Rust module:
//!
//! ```text
//! schema text ──parse_schema──▶ Schema ──resolve──▶ ResolvedSchema ──generate──▶ Rust source
//!                                                          └──emit_reference──▶ Markdown
//! ```
//!
//! Build scripts call [`compile_file`] and write the result to `OUT_DIR`;
//! the `cgen` binary wraps the same functions in [`commands`].

pub mod commands;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Once;

use cgen_codegen::{CodegenError, CodegenOptions};
use cgen_diagnostic::Diagnostic;
use cgen_ir::{PrimitiveTable, SchemaError};
use cgen_types::ResolvedSchema;
use thiserror::Error;

/// Any failure of the pipeline.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("{}", Joined(.0))]
    Codegen(Vec<CodegenError>),
}

struct Joined<'a>(&'a [CodegenError]);

impl fmt::Display for Joined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl CompileError {
    /// Diagnostics for display. Empty for I/O errors, which have no code.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            CompileError::Io { .. } => Vec::new(),
            CompileError::Schema(err) => vec![err.to_diagnostic()],
            CompileError::Codegen(errors) => errors.iter().map(CodegenError::to_diagnostic).collect(),
        }
    }
}

/// Parse and resolve schema text.
pub fn check_str(text: &str, options: &CodegenOptions) -> Result<ResolvedSchema, CompileError> {
    let schema = cgen_ir::parse_schema(text, &PrimitiveTable::standard(), options.root_type.as_deref())?;
    let resolved = cgen_types::resolve(&schema)?;
    Ok(resolved)
}

/// Generate the Rust module for schema text.
pub fn compile_str(text: &str, options: &CodegenOptions) -> Result<String, CompileError> {
    let resolved = check_str(text, options)?;
    generate(&resolved, options)
}

/// Generate the Rust module for a schema file.
pub fn compile_file(path: impl AsRef<Path>, options: &CodegenOptions) -> Result<String, CompileError> {
    let text = read_schema(path.as_ref())?;
    compile_str(&text, options)
}

/// Generate the Rust module for an already resolved schema.
pub fn generate(schema: &ResolvedSchema, options: &CodegenOptions) -> Result<String, CompileError> {
    let result = cgen_codegen::generate(schema, options);
    if result.has_errors() {
        return Err(CompileError::Codegen(result.errors));
    }
    Ok(result.code)
}

/// Markdown key reference for schema text.
pub fn reference_str(text: &str, options: &CodegenOptions) -> Result<String, CompileError> {
    let resolved = check_str(text, options)?;
    Ok(cgen_codegen::docs::emit_reference(&resolved))
}

pub(crate) fn read_schema(path: &Path) -> Result<String, CompileError> {
    tracing::debug!(path = %path.display(), "reading schema");
    std::fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_owned(),
        source,
    })
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing from `RUST_LOG`.
///
/// Call this once at startup. Safe to call multiple times. Does nothing when
/// `RUST_LOG` is unset. Enable with `RUST_LOG=cgen_ir=debug` or
/// `RUST_LOG=cgen_rt=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
mod tests;
