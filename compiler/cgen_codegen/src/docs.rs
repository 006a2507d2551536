//! Markdown reference of configuration keys.
//!
//! One row per leaf key reachable from the root. Struct fields nest with
//! `.`, list elements show as `[]` and map entries as `{}`:
//!
//! ```text
//! | `om[].am` | `i32` | no | `4` | Counter. |
//! ```
//!
//! Top-level leaves come first in one table; every top-level struct or
//! collection of structs then gets its own section.

use std::fmt::Write;

use cgen_ir::StructId;
use cgen_types::{DefaultValue, ResolvedField, ResolvedSchema, Shape, Ty};
use rustc_hash::FxHashSet;

struct Row {
    key: String,
    ty: String,
    required: bool,
    default: String,
    description: String,
}

/// Write the key reference for `schema`.
pub fn emit_reference(schema: &ResolvedSchema) -> String {
    let root = schema.root_struct();
    let mut out = String::new();

    let title = schema.info.title.as_deref().unwrap_or(&root.ident);
    let _ = writeln!(out, "# {title} configuration keys");
    if let Some(version) = &schema.info.version {
        let _ = writeln!(out, "\nSchema version {version}.");
    }
    if let Some(description) = &root.description {
        let _ = writeln!(out, "\n{}", description.trim());
    }

    let mut leaves = Vec::new();
    let mut sections = Vec::new();
    for field in &root.fields {
        let mut rows = Vec::new();
        let mut stack = FxHashSet::default();
        stack.insert(schema.root);
        let key = field.name.clone();
        collect(schema, field, &field.ty, key, true, &mut stack, &mut rows);
        if field.shape() == Shape::Container {
            sections.push((field, rows));
        } else {
            leaves.extend(rows);
        }
    }

    if !leaves.is_empty() {
        out.push('\n');
        write_table(&mut out, &leaves);
    }
    for (field, rows) in sections {
        let _ = writeln!(out, "\n## `{}`\n", field.name);
        if let Some(description) = &field.description {
            let _ = writeln!(out, "{}\n", description.trim());
        }
        if rows.is_empty() {
            out.push_str("No keys.\n");
        } else {
            write_table(&mut out, &rows);
        }
    }
    out
}

/// Rows for `field` at `key`. `ty` is the part of the field's type still to
/// be walked, and `own` is false once inside one of its collections.
/// `stack` holds the structs being expanded, so a recursive struct is
/// named instead of expanded again.
fn collect(
    schema: &ResolvedSchema,
    field: &ResolvedField,
    ty: &Ty,
    key: String,
    own: bool,
    stack: &mut FxHashSet<StructId>,
    rows: &mut Vec<Row>,
) {
    match (ty, ty.shape()) {
        (Ty::Optional(inner), _) => collect(schema, field, inner, key, own, stack, rows),
        (_, Shape::Leaf | Shape::LeafCollection) => rows.push(row(schema, field, ty, key, own)),
        (Ty::Struct(id), _) if stack.contains(id) => {
            let mut row = row(schema, field, ty, key, own);
            row.description = format!("Recursive `{}`; same keys as above.", schema.type_name(ty));
            rows.push(row);
        }
        (Ty::Struct(id), _) => {
            stack.insert(*id);
            for child in &schema.struct_def(*id).fields {
                let key = format!("{key}.{}", child.name);
                collect(schema, child, &child.ty, key, true, stack, rows);
            }
            stack.remove(id);
        }
        (Ty::List(inner), _) => {
            collect(schema, field, inner, format!("{key}[]"), false, stack, rows);
        }
        (Ty::Map(_, inner), _) => {
            collect(schema, field, inner, format!("{key}{{}}"), false, stack, rows);
        }
        (Ty::Scalar(_) | Ty::Str | Ty::Enum(_), _) => {}
    }
}

fn row(schema: &ResolvedSchema, field: &ResolvedField, ty: &Ty, key: String, own: bool) -> Row {
    let (required, default) = if own {
        (field.required, default_text(schema, &field.default, field.radix))
    } else {
        (false, String::new())
    };
    Row {
        key,
        ty: schema.type_name(ty),
        required,
        default,
        description: field
            .description
            .as_deref()
            .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default(),
    }
}

fn write_table(out: &mut String, rows: &[Row]) {
    out.push_str("| Key | Type | Required | Default | Description |\n");
    out.push_str("|-----|------|----------|---------|-------------|\n");
    for row in rows {
        let default = if row.default.is_empty() {
            String::new()
        } else {
            format!("`{}`", row.default)
        };
        let _ = writeln!(
            out,
            "| `{}` | `{}` | {} | {} | {} |",
            row.key,
            row.ty,
            if row.required { "yes" } else { "no" },
            escape(&default),
            escape(&row.description)
        );
    }
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|")
}

/// YAML-style text for a default. Empty when the default is the type's own.
fn default_text(schema: &ResolvedSchema, value: &DefaultValue, radix: u32) -> String {
    match value {
        DefaultValue::Zero | DefaultValue::Absent => String::new(),
        DefaultValue::Int(n) => match radix {
            16 => format!("{}0x{:X}", sign(*n), n.unsigned_abs()),
            8 => format!("{}0o{:o}", sign(*n), n.unsigned_abs()),
            2 => format!("{}0b{:b}", sign(*n), n.unsigned_abs()),
            _ => n.to_string(),
        },
        DefaultValue::Float { value, literal } if literal.contains("::") => value.to_string(),
        DefaultValue::Float { literal, .. } => literal.clone(),
        DefaultValue::Bool(value) => value.to_string(),
        DefaultValue::Str(text) => format!("{text:?}"),
        DefaultValue::Enum { id, variant } => schema.enum_def(*id).variants[*variant].name.clone(),
        DefaultValue::List(items) => format!(
            "[{}]",
            items
                .iter()
                .map(|item| default_text(schema, item, 10))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        DefaultValue::Map(entries) => format!(
            "{{{}}}",
            entries
                .iter()
                .map(|(key, value)| format!(
                    "{}: {}",
                    default_text(schema, key, 10),
                    default_text(schema, value, 10)
                ))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        DefaultValue::Present(inner) => default_text(schema, inner, radix),
    }
}

fn sign(n: i128) -> &'static str {
    if n < 0 {
        "-"
    } else {
        ""
    }
}
