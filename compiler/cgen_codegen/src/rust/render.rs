//! `Render` and `Display` impls for structs.

use cgen_types::ResolvedStruct;

use super::string_literal;
use crate::context::CodegenContext;

pub fn emit_render(ctx: &mut CodegenContext<'_>, def: &ResolvedStruct) {
    let rt = ctx.rt();
    let name = def.ident.as_str();

    ctx.block(&format!("impl {rt}::Render for {name} {{"), "}", |ctx| {
        if def.fields.is_empty() {
            ctx.block("fn render_flow(&self) -> Option<String> {", "}", |ctx| {
                ctx.writeln("Some(\"{}\".to_owned())");
            });
            return;
        }

        ctx.block("fn render_flow(&self) -> Option<String> {", "}", |ctx| {
            ctx.writeln("None");
        });
        ctx.newline();
        ctx.block(
            &format!("fn render_block(&self, out: &mut {rt}::RenderWriter) {{"),
            "}",
            |ctx| {
                for field in &def.fields {
                    let key = string_literal(&field.name);
                    let ident = &field.ident;
                    let line = match (field.radix, field.ty.is_optional()) {
                        (10, _) => format!("out.field({key}, &self.{ident});"),
                        (radix, false) => format!("out.field_radix({key}, self.{ident}, {radix});"),
                        (radix, true) => {
                            format!("out.field_radix_opt({key}, self.{ident}, {radix});")
                        }
                    };
                    ctx.writeln(&line);
                }
            },
        );
    });
    ctx.newline();

    ctx.block(&format!("impl std::fmt::Display for {name} {{"), "}", |ctx| {
        ctx.block(
            "fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {",
            "}",
            |ctx| ctx.writeln(&format!("f.write_str(&{rt}::render::to_text(self))")),
        );
    });
    ctx.newline();
}
