//! `Load` impls and the `load_config` entry points.
//!
//! Each field is one statement, in declaration order. Absent fields keep
//! the value from `Default`; absent required fields fail the load.

use cgen_types::{DefaultValue, ResolvedField, ResolvedStruct, Ty};

use super::string_literal;
use crate::context::CodegenContext;

pub fn emit_load(ctx: &mut CodegenContext<'_>, def: &ResolvedStruct) {
    let rt = ctx.rt();
    let name = def.ident.as_str();

    ctx.block(&format!("impl {rt}::Load for {name} {{"), "}", |ctx| {
        ctx.block(
            &format!(
                "fn load(node: &{rt}::Node, path: &mut {rt}::KeyPath) -> Result<Self, {rt}::DocumentError> {{"
            ),
            "}",
            |ctx| {
                ctx.writeln(&format!("let fields = {rt}::load::expect_mapping(node, path)?;"));
                let known = def
                    .fields
                    .iter()
                    .map(|f| string_literal(&f.name))
                    .collect::<Vec<_>>()
                    .join(", ");
                ctx.writeln(&format!("{rt}::load::check_unknown(fields, &[{known}], path);"));

                if def.fields.is_empty() {
                    ctx.writeln("Ok(Self::default())");
                    return;
                }

                ctx.writeln("let mut value = Self::default();");
                for field in &def.fields {
                    emit_field(ctx, rt, field);
                }
                ctx.writeln("Ok(value)");
            },
        );
    });
    ctx.newline();
}

fn emit_field(ctx: &mut CodegenContext<'_>, rt: &str, field: &ResolvedField) {
    let key = string_literal(&field.name);
    let ident = &field.ident;
    let radix = field.radix;

    match (field.required, radix != 10) {
        (true, false) => ctx.writeln(&format!(
            "value.{ident} = {rt}::load::required(fields, {key}, path)?;"
        )),
        (true, true) => ctx.writeln(&format!(
            "value.{ident} = {rt}::load::required_radix(fields, {key}, path, {radix})?;"
        )),
        (false, false) => ctx.writeln(&format!(
            "{rt}::load::field(fields, {key}, path, &mut value.{ident})?;"
        )),
        (false, true) => ctx.writeln(&format!(
            "{rt}::load::field_radix(fields, {key}, path, {radix}, &mut value.{ident})?;"
        )),
    }

    if field.has_bounds() {
        let min = bound(field.min.as_ref());
        let max = bound(field.max.as_ref());
        if field.ty.is_optional() {
            ctx.block(&format!("if let Some(item) = &value.{ident} {{"), "}", |ctx| {
                ctx.writeln(&format!(
                    "{rt}::load::check_range(path, {key}, item, {min}, {max})?;"
                ));
            });
        } else {
            ctx.writeln(&format!(
                "{rt}::load::check_range(path, {key}, &value.{ident}, {min}, {max})?;"
            ));
        }
    }

    if field.has_item_bounds() && matches!(field.ty, Ty::List(_)) {
        let count = |n: Option<usize>| n.map_or_else(|| "None".to_owned(), |n| format!("Some({n})"));
        ctx.writeln(&format!(
            "{rt}::load::check_items(path, {key}, value.{ident}.len(), {}, {})?;",
            count(field.min_items),
            count(field.max_items)
        ));
    }
}

fn bound(value: Option<&DefaultValue>) -> String {
    match value {
        Some(DefaultValue::Int(n)) => format!("Some({n})"),
        Some(DefaultValue::Float { literal, .. }) => format!("Some({literal})"),
        _ => "None".to_owned(),
    }
}

pub fn emit_entry_points(ctx: &mut CodegenContext<'_>) {
    let rt = ctx.rt();
    let schema = ctx.schema;
    let root = schema.root_struct().ident.as_str();

    ctx.writeln(&format!("/// Load a [`{root}`] from a YAML file."));
    ctx.writeln("///");
    ctx.writeln("/// Returns `None` if the file cannot be read or parsed, a value does not");
    ctx.writeln("/// convert, or a required field is missing. The reason is logged at");
    ctx.writeln("/// `debug` level; [`try_load_config`] returns it instead.");
    ctx.block(
        &format!("pub fn load_config(path: impl AsRef<std::path::Path>) -> Option<{root}> {{"),
        "}",
        |ctx| ctx.writeln(&format!("{rt}::load_file(path)")),
    );
    ctx.newline();

    ctx.writeln(&format!("/// Load a [`{root}`] from a YAML file, reporting why it failed."));
    ctx.block(
        &format!(
            "pub fn try_load_config(path: impl AsRef<std::path::Path>) -> Result<{root}, {rt}::DocumentError> {{"
        ),
        "}",
        |ctx| ctx.writeln(&format!("{rt}::try_load_file(path)")),
    );
    ctx.newline();

    ctx.writeln(&format!("/// Load a [`{root}`] from YAML text. See [`load_config`]."));
    ctx.block(
        &format!("pub fn load_config_str(text: &str) -> Option<{root}> {{"),
        "}",
        |ctx| ctx.writeln(&format!("{rt}::load_str(text)")),
    );
    ctx.newline();

    ctx.writeln(&format!("/// Load a [`{root}`] from YAML text, reporting why it failed."));
    ctx.block(
        &format!("pub fn try_load_config_str(text: &str) -> Result<{root}, {rt}::DocumentError> {{"),
        "}",
        |ctx| ctx.writeln(&format!("{rt}::try_load_str(text)")),
    );
    ctx.newline();
}
