use super::*;
use pretty_assertions::assert_eq;

fn build(text: &str) -> Result<Schema, SchemaError> {
    parse_schema(text, &PrimitiveTable::standard(), None)
}

fn field<'s>(schema: &'s Schema, struct_name: &str, name: &str) -> &'s FieldDef {
    let id = schema.lookup_struct(struct_name).unwrap();
    schema.struct_def(id).field(name).unwrap()
}

const SAMPLE: &str = r##"
info:
  title: sample
  version: "1.0"
enums:
  Mode: [Foo, Bar]
  Level:
    type: u8
    variants: { low: 1, mid: 5, high: 10 }
structs:
  sub:
    description: A nested struct.
    fields:
      am: { type: int, default: 0 }
elements:
  types:
    type: test
    required: true
  name: { type: string, default: cgen }
types:
  test:
    type: object
    properties:
      am: char
      qm: { type: u16, format: hex, default: "0xE001" }
      om: list<sub>
      pm: { type: map, keys: uint, values: { $ref: "#/types/sub" } }
      rm: optional<string>
      sm: { type: Mode, default: Foo }
      tm: Level
    required: [am]
"##;

#[test]
fn test_sample_schema() {
    let schema = build(SAMPLE).unwrap();
    assert_eq!(schema.info.title.as_deref(), Some("sample"));
    assert_eq!(schema.root_struct().name, "Config");
    assert_eq!(schema.structs.len(), 3);
    assert_eq!(schema.enums.len(), 2);

    let test = schema.lookup_struct("test").unwrap();
    assert_eq!(field(&schema, "Config", "types").node, SchemaNode::StructRef(test));
    assert!(field(&schema, "Config", "types").required);
    assert!(field(&schema, "test", "am").required);
    assert!(!field(&schema, "test", "om").required);

    let qm = field(&schema, "test", "qm");
    assert_eq!(qm.radix, Some(16));
    assert_eq!(
        qm.node,
        SchemaNode::Scalar {
            kind: ScalarKind::U16,
            radix: 16
        }
    );

    let sub = schema.lookup_struct("sub").unwrap();
    assert_eq!(
        field(&schema, "test", "pm").node,
        SchemaNode::Map {
            key: Box::new(SchemaNode::scalar(ScalarKind::U32)),
            value: Box::new(SchemaNode::StructRef(sub)),
        }
    );
    assert_eq!(
        field(&schema, "test", "rm").node,
        SchemaNode::Optional(Box::new(SchemaNode::Str))
    );

    let level = schema.enum_def(schema.lookup_enum("Level").unwrap());
    assert_eq!(level.repr, ScalarKind::U8);
    assert_eq!(
        level.variants.iter().map(|v| v.value).collect::<Vec<_>>(),
        vec![1, 5, 10]
    );
}

#[test]
fn test_order_is_dependencies_first() {
    let schema = build(SAMPLE).unwrap();
    let names: Vec<_> = schema
        .order
        .iter()
        .map(|id| schema.struct_def(*id).name.as_str())
        .collect();
    assert_eq!(names, vec!["sub", "test", "Config"]);
}

#[test]
fn test_root_override_and_option() {
    let schema = parse_schema(
        "options: { root: Settings }\nelements: { a: int }\n",
        &PrimitiveTable::standard(),
        None,
    )
    .unwrap();
    assert_eq!(schema.root_struct().name, "Settings");

    let schema = parse_schema(
        "elements: { a: int }\n",
        &PrimitiveTable::standard(),
        Some("AppConfig"),
    )
    .unwrap();
    assert_eq!(schema.root_struct().name, "AppConfig");
}

#[test]
fn test_root_from_structs_section() {
    let schema = build("structs:\n  Config:\n    fields: { a: int }\n").unwrap();
    assert_eq!(schema.root_struct().fields.len(), 1);

    let err = build("structs:\n  other:\n    fields: { a: int }\n").unwrap_err();
    assert_eq!(err.code(), cgen_diagnostic::ErrorCode::E1001);
}

#[test]
fn test_list_form_fields() {
    let schema = build(
        "elements:\n  - { name: b, type: bool, default: true }\n  - { name: a, type: int }\n",
    )
    .unwrap();
    let names: Vec<_> = schema
        .root_struct()
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn test_enum_implicit_values() {
    let schema = build(
        "enums:\n  Color: [Red, { Green: 10 }, Blue]\nelements: { c: Color }\n",
    )
    .unwrap();
    let color = schema.enum_def(schema.lookup_enum("Color").unwrap());
    let values: Vec<_> = color.variants.iter().map(|v| (v.name.as_str(), v.value)).collect();
    assert_eq!(values, vec![("Red", 0), ("Green", 10), ("Blue", 11)]);
    assert_eq!(color.repr, ScalarKind::I32);
}

#[test]
fn test_enum_errors() {
    let err = build("enums:\n  E: [A, B, A]\nelements: {}\n").unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateVariant { ref variant, .. } if variant == "A"));

    let err = build("enums:\n  E: { variants: { A: 1, B: 1 } }\nelements: {}\n").unwrap_err();
    assert!(matches!(
        err,
        SchemaError::DuplicateDiscriminant { value: 1, .. }
    ));

    let err = build("enums:\n  E: []\nelements: {}\n").unwrap_err();
    assert!(matches!(err, SchemaError::Malformed { .. }));

    let err = build("enums:\n  E: { type: float, variants: [A] }\nelements: {}\n").unwrap_err();
    assert!(matches!(err, SchemaError::Malformed { .. }));
}

#[test]
fn test_unknown_type_suggests() {
    let err = build("elements: { a: strng }\n").unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnknownType {
            name: "strng".into(),
            location: "elements.a".into(),
            suggestion: Some("string".into()),
        }
    );

    let err = build("elements: { a: list<Widget> }\n").unwrap_err();
    assert!(matches!(err, SchemaError::UnknownType { suggestion: None, .. }));
}

#[test]
fn test_duplicate_names() {
    let err = build(
        "enums:\n  sub: [A]\nstructs:\n  sub:\n    fields: {}\nelements: {}\n",
    )
    .unwrap_err();
    assert_eq!(
        err,
        SchemaError::DuplicateType {
            name: "sub".into(),
            location: "structs.sub".into(),
            first: "enums.sub".into(),
        }
    );

    let err = build("structs:\n  int:\n    fields: {}\nelements: {}\n").unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateType { ref first, .. } if first == "<primitive>"));

    let err = build("elements:\n  - { name: a, type: int }\n  - { name: a, type: bool }\n")
        .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateField { ref field, .. } if field == "a"));
}

#[test]
fn test_duplicate_names_in_mapping_form() {
    let err = build("elements:\n  a: int\n  a: bool\n").unwrap_err();
    assert_eq!(
        err,
        SchemaError::DuplicateField {
            struct_name: "Config".into(),
            field: "a".into(),
            location: "elements.a".into(),
        }
    );

    let err = build("options: { root: Settings }\nelements:\n  a: int\n  a: bool\n").unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateField { ref struct_name, .. } if struct_name == "Settings"));

    let err = build("structs:\n  sub:\n    fields:\n      x: int\n      x: int\nelements: { s: sub }\n")
        .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::DuplicateField { ref struct_name, ref field, .. } if struct_name == "sub" && field == "x"
    ));

    let err = build("structs:\n  s: { fields: {} }\n  s: { fields: {} }\nelements: {}\n").unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateType { ref name, .. } if name == "s"));

    let err = build("enums:\n  E:\n    variants: { A: 1, A: 2 }\nelements: {}\n").unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateVariant { ref variant, .. } if variant == "A"));
}

#[test]
fn test_aliases_expand_and_override() {
    let schema = build(
        "aliases:\n  port: { type: u16, default: 8080, min: 1 }\n  ports: list<port>\n\
         elements:\n  http: port\n  admin: { type: port, default: 9090 }\n  all: ports\n",
    )
    .unwrap();
    let http = field(&schema, "Config", "http");
    assert_eq!(http.node, SchemaNode::scalar(ScalarKind::U16));
    assert_eq!(http.default, Some(Node::Number("8080".into())));
    assert_eq!(http.min, Some(Node::Number("1".into())));
    assert_eq!(http.radix, None);

    let admin = field(&schema, "Config", "admin");
    assert_eq!(admin.default, Some(Node::Number("9090".into())));
    assert_eq!(admin.min, Some(Node::Number("1".into())));

    assert_eq!(
        field(&schema, "Config", "all").node,
        SchemaNode::List(Box::new(SchemaNode::scalar(ScalarKind::U16)))
    );
}

#[test]
fn test_bare_alias_inherits_properties() {
    let schema = build(
        "aliases:\n  reg: { type: u32, format: hex, default: \"0x10\", description: A register. }\n\
         elements:\n  r: reg\n  l: list<reg>\n",
    )
    .unwrap();
    let r = field(&schema, "Config", "r");
    assert_eq!(r.radix, Some(16));
    assert_eq!(
        r.node,
        SchemaNode::Scalar {
            kind: ScalarKind::U32,
            radix: 16
        }
    );
    assert_eq!(r.description.as_deref(), Some("A register."));
    assert_eq!(r.default, Some(Node::Scalar("0x10".into())));

    // Inside a collection only the alias's type applies.
    let l = field(&schema, "Config", "l");
    assert_eq!(l.default, None);
    assert_eq!(l.node, SchemaNode::List(Box::new(SchemaNode::scalar(ScalarKind::U32))));
}

#[test]
fn test_alias_cycle_rejected() {
    let err = build("aliases:\n  a: list<b>\n  b: list<a>\nelements: { x: a }\n").unwrap_err();
    assert!(matches!(err, SchemaError::Malformed { ref message, .. } if message.contains("refers to itself")));
}

#[test]
fn test_required_forms() {
    let schema = build(
        "elements:\n  a: { type: int, use: required }\n  b: { type: int, use: optional }\n  \
         c: { type: int, required: true, use: optional }\n",
    )
    .unwrap();
    assert!(field(&schema, "Config", "a").required);
    assert!(!field(&schema, "Config", "b").required);
    assert!(field(&schema, "Config", "c").required);

    let err = build("elements: { a: { type: int, use: sometimes } }\n").unwrap_err();
    assert!(matches!(err, SchemaError::Malformed { .. }));
}

#[test]
fn test_long_form_collections() {
    let schema = build(
        "elements:\n  l: { type: list, items: int, min_items: 1, maxItems: 3 }\n  \
         o: { type: optional, inner: u32, format: hex }\n",
    )
    .unwrap();
    let l = field(&schema, "Config", "l");
    assert_eq!(l.node, SchemaNode::List(Box::new(SchemaNode::scalar(ScalarKind::I32))));
    assert_eq!((l.min_items, l.max_items), (Some(1), Some(3)));
    assert_eq!(
        field(&schema, "Config", "o").node,
        SchemaNode::Optional(Box::new(SchemaNode::Scalar {
            kind: ScalarKind::U32,
            radix: 16
        }))
    );

    let err = build("elements: { l: { type: list } }\n").unwrap_err();
    assert!(matches!(err, SchemaError::Malformed { ref message, .. } if message.contains("items")));
}

#[test]
fn test_format_errors() {
    let err = build("elements: { a: { type: int, format: roman } }\n").unwrap_err();
    assert_eq!(err.code(), cgen_diagnostic::ErrorCode::E2005);
}

const INLINE: &str = r#"
structs:
  server:
    fields: { port: int }
elements:
  server:
    type: object
    description: The main server.
    properties:
      host: { type: string, default: localhost }
      mode: { type: string, enum: [tcp, udp], default: udp }
      limits:
        type: object
        properties: { rate: int }
    required: [host]
  backups:
    type: list
    items:
      type: object
      properties: { path: string }
  mode: { enum: [low, high] }
"#;

#[test]
fn test_inline_types_are_declared() {
    let schema = build(INLINE).unwrap();
    assert_eq!(schema.structs.len(), 5);
    assert_eq!(schema.enums.len(), 2);

    // `server` is taken, so the inline object gets a suffix.
    let server = schema.lookup_struct("server_1").unwrap();
    let config_server = field(&schema, "Config", "server");
    assert_eq!(config_server.node, SchemaNode::StructRef(server));
    assert!(!config_server.required);
    assert_eq!(
        schema.struct_def(server).description.as_deref(),
        Some("The main server.")
    );
    assert!(field(&schema, "server_1", "host").required);
    assert_eq!(field(&schema, "server_1", "host").location, "elements.server.host");

    let limits = schema.lookup_struct("limits").unwrap();
    assert_eq!(field(&schema, "server_1", "limits").node, SchemaNode::StructRef(limits));

    let backups = schema.lookup_struct("backups").unwrap();
    assert_eq!(
        field(&schema, "Config", "backups").node,
        SchemaNode::List(Box::new(SchemaNode::StructRef(backups)))
    );

    // The root's `mode` is built first and keeps the plain name.
    let mode = schema.lookup_enum("mode").unwrap();
    assert_eq!(field(&schema, "Config", "mode").node, SchemaNode::Enum(mode));
    let inner_mode = schema.lookup_enum("mode_1").unwrap();
    let mode_field = field(&schema, "server_1", "mode");
    assert_eq!(mode_field.node, SchemaNode::Enum(inner_mode));
    assert_eq!(mode_field.default, Some(Node::Scalar("udp".into())));
    let variants: Vec<_> = schema
        .enum_def(inner_mode)
        .variants
        .iter()
        .map(|v| (v.name.as_str(), v.value))
        .collect();
    assert_eq!(variants, [("tcp", 0), ("udp", 1)]);

    let schema = build("elements: { a: { type: object } }\n").unwrap();
    let a = schema.lookup_struct("a").unwrap();
    assert!(schema.struct_def(a).fields.is_empty());
}

#[test]
fn test_inline_alias_declares_once() {
    let schema = build(
        "aliases:\n  level: { type: string, enum: [low, high] }\nelements:\n  a: level\n  b: { type: level, default: high }\n",
    )
    .unwrap();
    assert_eq!(schema.enums.len(), 1);
    let level = schema.lookup_enum("a").unwrap();
    assert_eq!(field(&schema, "Config", "a").node, SchemaNode::Enum(level));
    assert_eq!(field(&schema, "Config", "b").node, SchemaNode::Enum(level));

    let err = build("elements: { a: { type: string, enum: [x, x] } }\n").unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateVariant { ref enum_name, .. } if enum_name == "a"));
}

#[test]
fn test_cycles() {
    let err = build(
        "structs:\n  a: { fields: { b: b } }\n  b: { fields: { a: a } }\nelements: { a: a }\n",
    )
    .unwrap_err();
    assert_eq!(err.code(), cgen_diagnostic::ErrorCode::E2002);

    let schema = build(
        "structs:\n  node: { fields: { children: list<node>, next: optional<node> } }\n\
         elements: { tree: node }\n",
    )
    .unwrap();
    assert_eq!(schema.structs.len(), 2);
}

#[test]
fn test_malformed_documents() {
    assert!(matches!(build(""), Err(SchemaError::Malformed { .. })));
    assert!(matches!(build("- a\n- b\n"), Err(SchemaError::Malformed { .. })));
    assert!(matches!(build("structs: [a]\n"), Err(SchemaError::Malformed { .. })));
    assert!(matches!(build("elements: { a: [int] }\n"), Err(SchemaError::Malformed { .. })));
    assert!(matches!(build(": : :\n  - ["), Err(SchemaError::Malformed { .. })));
}

#[test]
fn test_required_list_must_name_fields() {
    let err = build(
        "types:\n  Config:\n    type: object\n    properties: { a: int }\n    required: [b]\n",
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::Malformed { ref location, .. } if location == "types.Config.required"));
}

#[test]
fn test_edit_distance() {
    assert_eq!(edit_distance("strng", "string"), 1);
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("kitten", "sitting"), 3);
    assert_eq!(closest("bol", ["bool", "int"].into_iter()), Some("bool".to_owned()));
    assert_eq!(closest("zzzz", ["bool", "int"].into_iter()), None);
}
