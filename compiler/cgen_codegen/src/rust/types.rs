//! Type definitions: enums with their trait impls, structs with `Default`.

use cgen_types::{DefaultValue, ResolvedEnum, ResolvedSchema, ResolvedStruct};

use super::string_literal;
use crate::context::CodegenContext;

pub fn emit_enum(ctx: &mut CodegenContext<'_>, def: &ResolvedEnum) {
    let name = def.ident.as_str();
    let repr = def.repr.rust_type();
    let rt = ctx.rt();

    ctx.doc(def.description.as_deref());
    ctx.writeln("#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]");
    ctx.writeln(&format!("#[repr({repr})]"));
    ctx.block(&format!("pub enum {name} {{"), "}", |ctx| {
        for variant in &def.variants {
            ctx.doc(variant.description.as_deref());
            ctx.writeln(&format!("{} = {},", variant.ident, variant.value));
        }
    });
    ctx.newline();

    ctx.block(&format!("impl {name} {{"), "}", |ctx| {
        let all = def
            .variants
            .iter()
            .map(|v| format!("{name}::{}", v.ident))
            .collect::<Vec<_>>()
            .join(", ");
        ctx.writeln("/// Every variant, in declaration order.");
        ctx.writeln(&format!(
            "pub const ALL: [{name}; {}] = [{all}];",
            def.variants.len()
        ));
        ctx.newline();

        ctx.writeln("/// The variant's name in configuration documents.");
        ctx.block("pub fn as_str(self) -> &'static str {", "}", |ctx| {
            ctx.block("match self {", "}", |ctx| {
                for variant in &def.variants {
                    ctx.writeln(&format!(
                        "{name}::{} => {},",
                        variant.ident,
                        string_literal(&variant.name)
                    ));
                }
            });
        });
        ctx.newline();

        ctx.writeln("/// The underlying value.");
        ctx.block(&format!("pub fn value(self) -> {repr} {{"), "}", |ctx| {
            ctx.writeln(&format!("self as {repr}"));
        });
        ctx.newline();

        ctx.writeln("/// The variant with underlying value `value`.");
        ctx.block(
            &format!("pub fn from_value(value: {repr}) -> Option<Self> {{"),
            "}",
            |ctx| {
                ctx.block("match value {", "}", |ctx| {
                    for variant in &def.variants {
                        ctx.writeln(&format!(
                            "{} => Some({name}::{}),",
                            variant.value, variant.ident
                        ));
                    }
                    ctx.writeln("_ => None,");
                });
            },
        );
    });
    ctx.newline();

    if let Some(first) = def.variants.first() {
        ctx.block(&format!("impl Default for {name} {{"), "}", |ctx| {
            ctx.block("fn default() -> Self {", "}", |ctx| {
                ctx.writeln(&format!("{name}::{}", first.ident));
            });
        });
        ctx.newline();
    }

    ctx.block(&format!("impl std::fmt::Display for {name} {{"), "}", |ctx| {
        ctx.block(
            "fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {",
            "}",
            |ctx| ctx.writeln("f.write_str(self.as_str())"),
        );
    });
    ctx.newline();

    // Documents name a variant, or give its underlying value.
    ctx.block(&format!("impl {rt}::FromText for {name} {{"), "}", |ctx| {
        ctx.writeln(&format!(
            "const TYPE_NAME: &'static str = {};",
            string_literal(name)
        ));
        ctx.newline();
        ctx.block(
            &format!("fn from_text(text: &str) -> Result<Self, {rt}::ConversionError> {{"),
            "}",
            |ctx| {
                ctx.writeln("let text = text.trim();");
                ctx.block(
                    "if let Some(variant) = Self::ALL.iter().find(|v| v.as_str() == text) {",
                    "}",
                    |ctx| ctx.writeln("return Ok(*variant);"),
                );
                ctx.writeln(&format!("<{repr} as {rt}::FromText>::from_text(text)"));
                ctx.indent();
                ctx.writeln(".ok()");
                ctx.writeln(".and_then(Self::from_value)");
                ctx.writeln(&format!(
                    ".ok_or_else(|| {rt}::ConversionError::invalid(text, Self::TYPE_NAME))"
                ));
                ctx.dedent();
            },
        );
    });
    ctx.newline();

    ctx.block(&format!("impl {rt}::Load for {name} {{"), "}", |ctx| {
        ctx.block(
            &format!(
                "fn load(node: &{rt}::Node, path: &mut {rt}::KeyPath) -> Result<Self, {rt}::DocumentError> {{"
            ),
            "}",
            |ctx| ctx.writeln(&format!("{rt}::load::scalar(node, path)")),
        );
    });
    ctx.newline();

    ctx.block(&format!("impl {rt}::Render for {name} {{"), "}", |ctx| {
        ctx.block("fn render_flow(&self) -> Option<String> {", "}", |ctx| {
            ctx.writeln(&format!("Some({rt}::render::quote(self.as_str()))"));
        });
    });
    ctx.newline();
}

pub fn emit_struct(ctx: &mut CodegenContext<'_>, def: &ResolvedStruct) {
    let schema = ctx.schema;
    let name = def.ident.as_str();

    ctx.doc(def.description.as_deref());
    ctx.writeln("#[derive(Clone, Debug, PartialEq)]");
    ctx.block(&format!("pub struct {name} {{"), "}", |ctx| {
        for field in &def.fields {
            ctx.doc(field.description.as_deref());
            ctx.writeln(&format!("pub {}: {},", field.ident, schema.field_type(field)));
        }
    });
    ctx.newline();

    ctx.block(&format!("impl Default for {name} {{"), "}", |ctx| {
        ctx.block("fn default() -> Self {", "}", |ctx| {
            ctx.block("Self {", "}", |ctx| {
                for field in &def.fields {
                    ctx.writeln(&format!(
                        "{}: {},",
                        field.ident,
                        default_expr(schema, &field.default)
                    ));
                }
            });
        });
    });
    ctx.newline();
}

/// Rust expression for a default value. Literal types are inferred from the
/// field they initialize.
pub fn default_expr(schema: &ResolvedSchema, value: &DefaultValue) -> String {
    match value {
        DefaultValue::Zero => "Default::default()".to_owned(),
        DefaultValue::Int(value) => value.to_string(),
        DefaultValue::Float { literal, .. } => literal.clone(),
        DefaultValue::Bool(value) => value.to_string(),
        DefaultValue::Str(text) => format!("String::from({})", string_literal(text)),
        DefaultValue::Enum { id, variant } => {
            let def = schema.enum_def(*id);
            format!("{}::{}", def.ident, def.variants[*variant].ident)
        }
        DefaultValue::List(items) if items.is_empty() => "Vec::new()".to_owned(),
        DefaultValue::List(items) => format!(
            "vec![{}]",
            items
                .iter()
                .map(|item| default_expr(schema, item))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        DefaultValue::Map(entries) if entries.is_empty() => "IndexMap::new()".to_owned(),
        DefaultValue::Map(entries) => format!(
            "[{}].into_iter().collect()",
            entries
                .iter()
                .map(|(key, value)| format!(
                    "({}, {})",
                    default_expr(schema, key),
                    default_expr(schema, value)
                ))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        DefaultValue::Present(inner) => format!("Some({})", default_expr(schema, inner)),
        DefaultValue::Absent => "None".to_owned(),
    }
}
