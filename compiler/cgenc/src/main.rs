//! The `cgen` command-line interface.

use std::path::PathBuf;
use std::process::ExitCode;

use cgen_codegen::CodegenOptions;
use cgenc::commands::{check_file, explain_error, generate_file, GenerateOptions};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cgen", version, about = "Generate typed configuration loaders from a YAML schema")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the Rust module for a schema.
    Generate {
        /// Schema file.
        schema: PathBuf,
        /// Write the module here instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Root struct name, overriding the schema's `options.root`.
        #[arg(long)]
        root_type: Option<String>,
        /// Path of the runtime crate in generated code.
        #[arg(long, default_value = "cgen_rt")]
        runtime_crate: String,
        /// Also write a Markdown reference of configuration keys.
        #[arg(long)]
        docs: Option<PathBuf>,
        /// Omit the `@generated` header comment.
        #[arg(long)]
        no_header: bool,
    },
    /// Check a schema without generating code.
    Check {
        /// Schema file.
        schema: PathBuf,
        /// Root struct name, overriding the schema's `options.root`.
        #[arg(long)]
        root_type: Option<String>,
    },
    /// Explain an error code, such as E2001.
    Explain {
        code: String,
    },
}

fn main() -> ExitCode {
    cgenc::init_tracing();

    match Cli::parse().command {
        Command::Generate {
            schema,
            output,
            root_type,
            runtime_crate,
            docs,
            no_header,
        } => {
            let options = GenerateOptions {
                codegen: CodegenOptions {
                    root_type,
                    runtime_crate,
                    header: !no_header,
                },
                output,
                docs,
            };
            generate_file(&schema, &options)
        }
        Command::Check { schema, root_type } => check_file(&schema, root_type),
        Command::Explain { code } => explain_error(&code),
    }
}
