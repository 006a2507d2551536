//! Code generation context and state.
//!
//! The `CodegenContext` holds the resolved schema, the options, and the
//! output buffer with its indentation.

use cgen_types::ResolvedSchema;

use crate::CodegenOptions;

/// Code generation context.
pub struct CodegenContext<'a> {
    pub schema: &'a ResolvedSchema,
    pub options: &'a CodegenOptions,
    /// Current indentation level.
    indent: usize,
    /// Generated code output.
    output: String,
}

impl<'a> CodegenContext<'a> {
    pub fn new(schema: &'a ResolvedSchema, options: &'a CodegenOptions) -> Self {
        Self {
            schema,
            options,
            indent: 0,
            output: String::with_capacity(16 * 1024),
        }
    }

    /// Path of the runtime crate in generated code.
    #[inline]
    pub fn rt(&self) -> &'a str {
        &self.options.runtime_crate
    }

    /// Name of the traversal's leaf enum, `<Root>Leaf`.
    pub fn leaf_enum(&self) -> String {
        format!("{}Leaf", self.schema.root_struct().ident)
    }

    /// Increase indentation level.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease indentation level.
    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write indentation to output.
    pub fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    /// Write a line to output (with indentation and newline).
    pub fn writeln(&mut self, s: &str) {
        if !s.is_empty() {
            self.write_indent();
            self.output.push_str(s);
        }
        self.output.push('\n');
    }

    /// Write a newline.
    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Write `///` doc lines for `text`, if any.
    pub fn doc(&mut self, text: Option<&str>) {
        let Some(text) = text else {
            return;
        };
        for line in text.trim().lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.writeln("///");
            } else {
                self.writeln(&format!("/// {line}"));
            }
        }
    }

    /// Write `open`, indent, run `body`, dedent, write `close`.
    pub fn block(&mut self, open: &str, close: &str, body: impl FnOnce(&mut Self)) {
        self.writeln(open);
        self.indent();
        body(self);
        self.dedent();
        self.writeln(close);
    }

    /// Take the generated output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgen_ir::{parse_schema, PrimitiveTable};

    fn resolved() -> ResolvedSchema {
        let schema = parse_schema("elements: { a: int }\n", &PrimitiveTable::standard(), None)
            .unwrap();
        cgen_types::resolve(&schema).unwrap()
    }

    #[test]
    fn test_indent_dedent() {
        let schema = resolved();
        let options = CodegenOptions::default();
        let mut ctx = CodegenContext::new(&schema, &options);

        ctx.writeln("line1");
        ctx.indent();
        ctx.writeln("line2");
        ctx.indent();
        ctx.writeln("line3");
        ctx.dedent();
        ctx.writeln("");
        ctx.dedent();
        ctx.writeln("line5");

        let output = ctx.take_output();
        assert_eq!(output, "line1\n    line2\n        line3\n\nline5\n");
    }

    #[test]
    fn test_block_and_doc() {
        let schema = resolved();
        let options = CodegenOptions::default();
        let mut ctx = CodegenContext::new(&schema, &options);

        ctx.doc(Some("First line.\n\nSecond line.\n"));
        ctx.block("fn f() {", "}", |ctx| ctx.writeln("body();"));
        assert_eq!(
            ctx.take_output(),
            "/// First line.\n///\n/// Second line.\nfn f() {\n    body();\n}\n"
        );
        assert_eq!(ctx.leaf_enum(), "ConfigLeaf");
        assert_eq!(ctx.rt(), "cgen_rt");
    }
}
