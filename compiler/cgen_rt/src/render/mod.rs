//! Human-readable serialization.
//!
//! Rendered text is YAML that loads back into an equal value:
//!
//! ```text
//! types:
//!   am: -1
//!   fm: "asdf"
//!   km: [0, 1, 2, 3]
//!   mm:
//!     am: 4
//!   nm: {"foo": "bar", "bar": "foo"}
//!   om:
//!     -
//!       am: 0
//! ```
//!
//! # Layout
//!
//! A value either fits on one line (its *flow* form) or needs an indented
//! block. Scalars, strings, enums, and collections of flow values are flow.
//! Structs with fields, and collections containing them, are block.

use std::fmt::Write;

use indexmap::IndexMap;

use crate::convert::format_radix;
use crate::MapKey;

/// Types that can be written as configuration text.
pub trait Render {
    /// The single-line form, or `None` if the value needs a block.
    fn render_flow(&self) -> Option<String>;

    /// Write the block form, one line per entry, at the writer's indentation.
    fn render_block(&self, out: &mut RenderWriter) {
        if let Some(text) = self.render_flow() {
            out.line(&text);
        }
    }
}

/// Indentation-aware line writer for block output.
#[derive(Default)]
pub struct RenderWriter {
    output: String,
    indent: usize,
}

impl RenderWriter {
    pub fn new() -> Self {
        RenderWriter::default()
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write a line at the current indentation.
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// Write `name: value`, nesting the value as a block if it has no flow form.
    pub fn field<T: Render + ?Sized>(&mut self, name: &str, value: &T) {
        self.entry(&key_text(name), value);
    }

    /// Write an integer field in `radix`, quoted so the prefix survives.
    pub fn field_radix(&mut self, name: &str, value: impl Into<i128>, radix: u32) {
        let text = radix_text(value.into(), radix);
        self.line(&format!("{}: {text}", key_text(name)));
    }

    /// [`field_radix`](Self::field_radix) for optional integers.
    pub fn field_radix_opt<T: Into<i128>>(&mut self, name: &str, value: Option<T>, radix: u32) {
        match value {
            Some(value) => self.field_radix(name, value, radix),
            None => self.line(&format!("{}: null", key_text(name))),
        }
    }

    fn entry<T: Render + ?Sized>(&mut self, key: &str, value: &T) {
        if let Some(text) = value.render_flow() {
            self.line(&format!("{key}: {text}"));
        } else {
            self.line(&format!("{key}:"));
            self.indent();
            value.render_block(self);
            self.dedent();
        }
    }

    fn item<T: Render + ?Sized>(&mut self, value: &T) {
        if let Some(text) = value.render_flow() {
            self.line(&format!("- {text}"));
        } else {
            self.line("-");
            self.indent();
            value.render_block(self);
            self.dedent();
        }
    }

    pub fn finish(self) -> String {
        self.output
    }
}

/// Render a value as a complete document.
pub fn to_text<T: Render + ?Sized>(value: &T) -> String {
    match value.render_flow() {
        Some(text) => text + "\n",
        None => {
            let mut out = RenderWriter::new();
            value.render_block(&mut out);
            out.finish()
        }
    }
}

/// Double-quoted YAML string with escapes.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Field names are written bare when they are plain identifiers.
fn key_text(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if plain {
        name.to_owned()
    } else {
        quote(name)
    }
}

fn radix_text(value: i128, radix: u32) -> String {
    if radix == 10 {
        value.to_string()
    } else {
        quote(&format_radix(value, radix))
    }
}

macro_rules! impl_render_display {
    ($($ty:ty),* $(,)?) => {$(
        impl Render for $ty {
            fn render_flow(&self) -> Option<String> {
                Some(self.to_string())
            }
        }
    )*};
}

// `Display` for floats is the shortest text that parses back exactly.
impl_render_display!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, bool);

impl Render for String {
    fn render_flow(&self) -> Option<String> {
        Some(quote(self))
    }
}

impl Render for str {
    fn render_flow(&self) -> Option<String> {
        Some(quote(self))
    }
}

impl<T: Render> Render for Option<T> {
    fn render_flow(&self) -> Option<String> {
        match self {
            Some(value) => value.render_flow(),
            None => Some("null".to_owned()),
        }
    }

    fn render_block(&self, out: &mut RenderWriter) {
        match self {
            Some(value) => value.render_block(out),
            None => out.line("null"),
        }
    }
}

impl<T: Render + ?Sized> Render for Box<T> {
    fn render_flow(&self) -> Option<String> {
        (**self).render_flow()
    }

    fn render_block(&self, out: &mut RenderWriter) {
        (**self).render_block(out);
    }
}

impl<T: Render> Render for Vec<T> {
    fn render_flow(&self) -> Option<String> {
        let items = self
            .iter()
            .map(Render::render_flow)
            .collect::<Option<Vec<_>>>()?;
        Some(format!("[{}]", items.join(", ")))
    }

    fn render_block(&self, out: &mut RenderWriter) {
        for item in self {
            out.item(item);
        }
    }
}

impl<K: MapKey, V: Render> Render for IndexMap<K, V> {
    fn render_flow(&self) -> Option<String> {
        let entries = self
            .iter()
            .map(|(key, value)| {
                let value = value.render_flow()?;
                Some(format!("{}: {value}", quote(&key.to_string())))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(format!("{{{}}}", entries.join(", ")))
    }

    fn render_block(&self, out: &mut RenderWriter) {
        for (key, value) in self {
            out.entry(&quote(&key.to_string()), value);
        }
    }
}
