//! File-based tests for the driver commands.

use std::fs;

use cgen_codegen::CodegenOptions;
use cgenc::commands::{generate_file, GenerateOptions};
use cgenc::{compile_file, CompileError};

const SCHEMA: &str = "\
options: { root: Settings }
structs:
  endpoint:
    fields:
      host: { type: string, default: localhost }
      port: { type: u16, default: 80 }
elements:
  endpoints: list<endpoint>
  retries: { type: u8, default: 3, max: 10 }
";

#[test]
fn compile_file_reads_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.yaml");
    fs::write(&path, SCHEMA).unwrap();

    let code = compile_file(&path, &CodegenOptions::default()).unwrap();
    assert!(code.contains("pub struct Settings {\n"));
    assert!(code.contains("pub struct Endpoint {\n"));
    assert!(code.contains("fn walk_endpoint<X, E, F>("));
}

#[test]
fn generate_writes_module_and_docs() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema.yaml");
    let output = dir.path().join("config.rs");
    let docs = dir.path().join("config.md");
    fs::write(&schema, SCHEMA).unwrap();

    let options = GenerateOptions {
        codegen: CodegenOptions {
            runtime_crate: "crate::rt".to_owned(),
            header: false,
            ..CodegenOptions::default()
        },
        output: Some(output.clone()),
        docs: Some(docs.clone()),
    };
    let _ = generate_file(&schema, &options);

    let code = fs::read_to_string(&output).unwrap();
    assert!(code.starts_with("#[allow(unused_imports)]\nuse crate::rt::IndexMap;\n"));
    let docs = fs::read_to_string(&docs).unwrap();
    assert!(docs.contains("| `endpoints[].host` | `string` | no | `\"localhost\"` |  |\n"));
    assert!(docs.contains("| `retries` | `u8` | no | `3` |  |\n"));
}

#[test]
fn generate_reports_errors_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema.yaml");
    let output = dir.path().join("config.rs");
    fs::write(&schema, "elements:\n  a: strng\n").unwrap();

    let options = GenerateOptions {
        output: Some(output.clone()),
        ..GenerateOptions::default()
    };
    let _ = generate_file(&schema, &options);
    assert!(!output.exists());

    let err = compile_file(&schema, &CodegenOptions::default()).unwrap_err();
    let CompileError::Schema(err) = err else {
        panic!("expected a schema error, got {err:?}");
    };
    assert_eq!(
        err.to_diagnostic().suggestions,
        vec!["did you mean `string`?".to_owned()]
    );
}
