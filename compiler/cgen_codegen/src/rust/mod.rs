//! Rust module emission.
//!
//! The generated module has four sections:
//!
//! - enums, each with its name/value mapping and runtime trait impls
//! - structs in dependency order, each with `Default`, `Load`, `Render`, and
//!   `Display`
//! - the `load_config` entry points for the root struct
//! - the post-processing traversal (`<Root>Leaf`, `post_process_config`)

mod load;
mod render;
pub(crate) mod traverse;
mod types;

use crate::context::CodegenContext;

pub use types::default_expr;

/// Emit the whole module.
pub fn emit_module(ctx: &mut CodegenContext<'_>) {
    let schema = ctx.schema;

    if ctx.options.header {
        emit_header(ctx);
    }
    ctx.writeln("#[allow(unused_imports)]");
    ctx.writeln(&format!("use {}::IndexMap;", ctx.rt()));
    ctx.newline();

    if !schema.enums.is_empty() {
        banner(ctx, "Enums");
        for def in &schema.enums {
            types::emit_enum(ctx, def);
        }
    }

    banner(ctx, "Structs");
    for &id in &schema.order {
        let def = schema.struct_def(id);
        types::emit_struct(ctx, def);
        load::emit_load(ctx, def);
        render::emit_render(ctx, def);
    }

    banner(ctx, "Loading");
    load::emit_entry_points(ctx);

    banner(ctx, "Post-processing");
    traverse::emit_traversal(ctx);
}

fn emit_header(ctx: &mut CodegenContext<'_>) {
    let info = &ctx.schema.info;
    let source = match (&info.title, &info.version) {
        (Some(title), Some(version)) => format!(" from schema `{title}` {version}"),
        (Some(title), None) => format!(" from schema `{title}`"),
        _ => String::new(),
    };
    ctx.writeln(&format!("// @generated by cgen{source}. Do not edit."));
    ctx.newline();
}

fn banner(ctx: &mut CodegenContext<'_>, title: &str) {
    ctx.writeln("// ============================================================================");
    ctx.writeln(&format!("// {title}"));
    ctx.writeln("// ============================================================================");
    ctx.newline();
}

/// A Rust string literal for `text`.
pub(crate) fn string_literal(text: &str) -> String {
    format!("{text:?}")
}
