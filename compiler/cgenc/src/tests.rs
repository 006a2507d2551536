use super::*;
use cgen_diagnostic::ErrorCode;
use pretty_assertions::assert_eq;

const SCHEMA: &str = "\
info: { title: demo }
enums:
  Mode: [Fast, Safe]
elements:
  mode: { type: Mode, default: Safe }
  port: { type: u16, default: 8080 }
";

#[test]
fn test_compile_str() {
    let code = compile_str(SCHEMA, &CodegenOptions::default()).unwrap();
    assert!(code.starts_with("// @generated by cgen from schema `demo`. Do not edit.\n"));
    assert!(code.contains("pub struct Config {\n"));
    assert!(code.contains("pub fn load_config("));
    assert!(code.contains("pub fn post_process_config<"));
}

#[test]
fn test_root_type_override() {
    let options = CodegenOptions {
        root_type: Some("Server".to_owned()),
        ..CodegenOptions::default()
    };
    let code = compile_str(SCHEMA, &options).unwrap();
    assert!(code.contains("pub struct Server {\n"));
    assert!(code.contains("pub enum ServerLeaf<'a> {\n"));
}

#[test]
fn test_schema_errors_carry_codes() {
    let cases = [
        ("elements:\n  a: strng\n", ErrorCode::E2001),
        ("elements:\n  a: int\n  a: int\n", ErrorCode::E1001),
        ("elements:\n  a: map<list<int>, int>\n", ErrorCode::E2004),
        ("elements:\n  a: { type: u8, default: 256 }\n", ErrorCode::E2003),
        (
            "structs:\n  a:\n    fields: { b: b }\n  b:\n    fields: { a: a }\nelements:\n  a: a\n",
            ErrorCode::E2002,
        ),
    ];
    for (text, code) in cases {
        let err = compile_str(text, &CodegenOptions::default()).unwrap_err();
        let diagnostics = err.diagnostics();
        assert_eq!(diagnostics.len(), 1, "{text}");
        assert_eq!(diagnostics[0].code, code, "{text}");
    }
}

#[test]
fn test_codegen_error() {
    let err = compile_str("enums:\n  vec: [A]\nelements:\n  a: vec\n", &CodegenOptions::default())
        .unwrap_err();
    assert!(matches!(err, CompileError::Codegen(ref errors) if errors.len() == 1));
    assert_eq!(err.diagnostics()[0].code, ErrorCode::E5001);
    assert_eq!(
        err.to_string(),
        "enums.vec: generated name `Vec` collides with the standard name `Vec` used by generated code"
    );
}

#[test]
fn test_reference_str() {
    let docs = reference_str(SCHEMA, &CodegenOptions::default()).unwrap();
    assert!(docs.starts_with("# demo configuration keys\n"));
    assert!(docs.contains("| `port` | `u16` | no | `8080` |  |\n"));
}

#[test]
fn test_io_error() {
    let err = compile_file("/nonexistent/schema.yaml", &CodegenOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::Io { .. }));
    assert!(err.diagnostics().is_empty());
    assert!(err.to_string().starts_with("/nonexistent/schema.yaml: "));
}
