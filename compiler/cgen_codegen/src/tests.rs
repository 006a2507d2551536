use super::*;
use cgen_ir::{parse_schema, EnumId, PrimitiveTable};
use cgen_types::DefaultValue;
use pretty_assertions::assert_eq;

const SAMPLE: &str = r#"
info:
  title: sample
  version: "1.0"
enums:
  Mode: [Foo, Bar]
structs:
  sub:
    fields:
      am: { type: int, default: 4, description: Counter. }
elements:
  qm: { type: u16, format: hex, default: "0xE001" }
  om: list<sub>
  pm: map<uint, sub>
  rm: optional<string>
  sm: { type: Mode, default: Foo }
  count: { type: int, required: true, min: 1, max: 10 }
"#;

fn resolved(text: &str) -> ResolvedSchema {
    let schema = parse_schema(text, &PrimitiveTable::standard(), None).unwrap();
    cgen_types::resolve(&schema).unwrap()
}

fn generated(text: &str) -> String {
    let result = generate(&resolved(text), &CodegenOptions::default());
    assert!(!result.has_errors(), "{:?}", result.errors);
    result.code
}

#[track_caller]
fn assert_contains(code: &str, snippet: &str) {
    assert!(code.contains(snippet), "missing:\n{snippet}\nin:\n{code}");
}

#[test]
fn test_header() {
    let code = generated(SAMPLE);
    assert!(code.starts_with("// @generated by cgen from schema `sample` 1.0. Do not edit.\n"));

    let options = CodegenOptions {
        header: false,
        ..CodegenOptions::default()
    };
    let code = generate(&resolved(SAMPLE), &options).code;
    assert!(code.starts_with("#[allow(unused_imports)]\nuse cgen_rt::IndexMap;\n"));
}

#[test]
fn test_enum_definition() {
    let code = generated(SAMPLE);
    assert_contains(
        &code,
        "#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]\n\
         #[repr(i32)]\n\
         pub enum Mode {\n    Foo = 0,\n    Bar = 1,\n}\n",
    );
    assert_contains(&code, "    pub const ALL: [Mode; 2] = [Mode::Foo, Mode::Bar];\n");
    assert_contains(&code, "            Mode::Bar => \"Bar\",\n");
    assert_contains(&code, "            1 => Some(Mode::Bar),\n");
    assert_contains(&code, "impl cgen_rt::FromText for Mode {\n");
}

#[test]
fn test_struct_definition_and_default() {
    let code = generated(SAMPLE);
    assert_contains(&code, "pub struct Sub {\n    /// Counter.\n    pub am: i32,\n}\n");
    assert_contains(&code, "    pub om: Vec<Sub>,\n");
    assert_contains(&code, "    pub pm: IndexMap<u32, Sub>,\n");
    assert_contains(&code, "    pub rm: Option<String>,\n");
    assert_contains(&code, "            am: 4,\n");
    assert_contains(&code, "            qm: 57345,\n");
    assert_contains(&code, "            sm: Mode::Foo,\n");

    // Structs come before the structs that use them.
    let sub = code.find("pub struct Sub").unwrap();
    let config = code.find("pub struct Config").unwrap();
    assert!(sub < config);
}

#[test]
fn test_loader() {
    let code = generated(SAMPLE);
    assert_contains(
        &code,
        "        let fields = cgen_rt::load::expect_mapping(node, path)?;\n        \
         cgen_rt::load::check_unknown(fields, &[\"qm\", \"om\", \"pm\", \"rm\", \"sm\", \"count\"], path);\n        \
         let mut value = Self::default();\n        \
         cgen_rt::load::field_radix(fields, \"qm\", path, 16, &mut value.qm)?;\n        \
         cgen_rt::load::field(fields, \"om\", path, &mut value.om)?;\n",
    );
    assert_contains(
        &code,
        "        value.count = cgen_rt::load::required(fields, \"count\", path)?;\n        \
         cgen_rt::load::check_range(path, \"count\", &value.count, Some(1), Some(10))?;\n        \
         Ok(value)\n",
    );
    assert_contains(
        &code,
        "pub fn try_load_config(path: impl AsRef<std::path::Path>) -> Result<Config, cgen_rt::DocumentError> {\n    \
         cgen_rt::try_load_file(path)\n}\n",
    );
}

#[test]
fn test_renderer() {
    let code = generated(SAMPLE);
    assert_contains(&code, "        out.field_radix(\"qm\", self.qm, 16);\n");
    assert_contains(&code, "        out.field(\"om\", &self.om);\n");
    assert_contains(&code, "impl std::fmt::Display for Config {\n");
}

#[test]
fn test_traversal() {
    let code = generated(SAMPLE);
    for variant in [
        "    U16(&'a mut u16),\n",
        "    I32(&'a mut i32),\n",
        "    Str(&'a mut String),\n",
        "    Mode(&'a mut Mode),\n",
    ] {
        assert_contains(&code, variant);
    }
    assert!(!code.contains("OptionalStr"));

    assert_contains(
        &code,
        "pub fn post_process_config<X, E, F>(config: &mut Config, mut visit: F, extra: &mut X) -> Result<(), E>\n\
         where\n    \
         F: FnMut(&cgen_rt::KeyPath, ConfigLeaf<'_>, &mut X) -> Result<(), E>,\n\
         {\n    \
         let mut path = cgen_rt::KeyPath::new();\n    \
         walk_config(config, &mut path, &mut visit, extra)\n}\n",
    );
    assert_contains(
        &code,
        "    path.push(\"om\");\n    \
         for (index, item) in value.om.iter_mut().enumerate() {\n        \
         path.push_index(index);\n        \
         walk_sub(item, path, visit, extra)?;\n        \
         path.pop();\n    }\n    \
         path.pop();\n",
    );
    assert_contains(
        &code,
        "    for (key, item) in value.pm.iter_mut() {\n        \
         path.push(key.to_string());\n",
    );
    assert_contains(
        &code,
        "    if let Some(item) = value.rm.as_mut() {\n        \
         visit(path, ConfigLeaf::Str(item), extra)?;\n    }\n",
    );
    assert_contains(&code, "    visit(path, ConfigLeaf::U16(&mut value.qm), extra)?;\n");
}

#[test]
fn test_recursive_struct() {
    let code = generated(
        "structs:\n  node:\n    fields:\n      value: int\n      next: optional<node>\n\
         elements:\n  head: optional<node>\n",
    );
    assert_contains(&code, "    pub next: Option<Box<Node>>,\n");
    assert_contains(
        &code,
        "    if let Some(item) = value.next.as_mut() {\n        \
         walk_node(item, path, visit, extra)?;\n    }\n",
    );
}

#[test]
fn test_no_leaves() {
    let code = generated("structs:\n  a:\n    fields:\n      b: optional<a>\nelements:\n  a: a\n");
    assert_contains(&code, "    Unused(std::marker::PhantomData<&'a mut ()>),\n");
}

#[test]
fn test_runtime_crate_path() {
    let options = CodegenOptions {
        runtime_crate: "crate::rt".to_owned(),
        ..CodegenOptions::default()
    };
    let code = generate(&resolved(SAMPLE), &options).code;
    assert_contains(&code, "impl crate::rt::Load for Config {\n");
    assert_contains(&code, "use crate::rt::IndexMap;\n");
    assert!(!code.contains("cgen_rt"));
}

#[test]
fn test_name_collisions() {
    let schema = resolved("structs:\n  result:\n    fields: { a: int }\nelements:\n  v: result\n");
    let errors = check_names(&schema);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), ErrorCode::E5001);
    assert_eq!(
        errors[0].to_string(),
        "structs.result: generated name `Result` collides with the standard name `Result` used by generated code"
    );

    let schema = resolved("enums:\n  ConfigLeaf: [A]\nelements:\n  v: ConfigLeaf\n");
    let result = generate(&schema, &CodegenOptions::default());
    assert!(result.has_errors());
    assert!(result.code.is_empty());
    assert!(matches!(
        &result.errors[0],
        CodegenError::NameCollision { name, .. } if name == "ConfigLeaf"
    ));
}

#[test]
fn test_leaf_variant_collisions() {
    let schema = resolved(
        "enums:\n  ListOfStr: [A, B]\nelements:\n  names: list<string>\n  pick: ListOfStr\n",
    );
    let errors = check_names(&schema);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), ErrorCode::E5001);
    assert_eq!(
        errors[0].to_string(),
        "enums.ListOfStr: generated name `ListOfStr` collides with the traversal leaf variant `ConfigLeaf::ListOfStr` for `Vec<String>`"
    );

    let schema = resolved("enums:\n  I32: [A]\nelements:\n  v: I32\n  n: int\n");
    assert!(matches!(
        &check_names(&schema)[..],
        [CodegenError::NameCollision { name, .. }] if name == "I32"
    ));

    // Same name only when the types differ; repeated uses are fine.
    let schema = resolved("enums:\n  ListOfStr: [A]\nelements:\n  a: ListOfStr\n  b: ListOfStr\n");
    assert!(check_names(&schema).is_empty());
}

#[test]
fn test_default_expr() {
    let schema = resolved(SAMPLE);
    let mode = EnumId::new(0);
    let cases = [
        (DefaultValue::Zero, "Default::default()"),
        (DefaultValue::Int(-3), "-3"),
        (DefaultValue::Bool(true), "true"),
        (DefaultValue::Str("a\"b".into()), "String::from(\"a\\\"b\")"),
        (DefaultValue::Enum { id: mode, variant: 1 }, "Mode::Bar"),
        (DefaultValue::List(Vec::new()), "Vec::new()"),
        (
            DefaultValue::List(vec![DefaultValue::Int(0), DefaultValue::Int(1)]),
            "vec![0, 1]",
        ),
        (DefaultValue::Map(Vec::new()), "IndexMap::new()"),
        (
            DefaultValue::Map(vec![(DefaultValue::Str("foo".into()), DefaultValue::Str("bar".into()))]),
            "[(String::from(\"foo\"), String::from(\"bar\"))].into_iter().collect()",
        ),
        (DefaultValue::Present(Box::new(DefaultValue::Int(3))), "Some(3)"),
        (DefaultValue::Absent, "None"),
    ];
    for (value, expected) in cases {
        assert_eq!(rust::default_expr(&schema, &value), expected);
    }
}

#[test]
fn test_reference_docs() {
    let docs = docs::emit_reference(&resolved(SAMPLE));
    assert!(docs.starts_with("# sample configuration keys\n\nSchema version 1.0.\n"));
    assert_contains(&docs, "| `qm` | `u16` | no | `0xE001` |  |\n");
    assert_contains(&docs, "| `sm` | `Mode` | no | `Foo` |  |\n");
    assert_contains(&docs, "| `count` | `i32` | yes |  |  |\n");
    assert_contains(&docs, "\n## `om`\n\n");
    assert_contains(&docs, "| `om[].am` | `i32` | no | `4` | Counter. |\n");
    assert_contains(&docs, "| `pm{}.am` | `i32` | no | `4` | Counter. |\n");
}

#[test]
fn test_reference_docs_recursive() {
    let docs = docs::emit_reference(&resolved(
        "structs:\n  node:\n    fields:\n      value: int\n      next: optional<node>\n\
         elements:\n  head: optional<node>\n",
    ));
    assert_contains(&docs, "| `head.value` | `i32` | no |  |  |\n");
    assert_contains(
        &docs,
        "| `head.next` | `node` | no |  | Recursive `node`; same keys as above. |\n",
    );
}
