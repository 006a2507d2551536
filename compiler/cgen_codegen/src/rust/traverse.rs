//! Post-processing traversal.
//!
//! Emits the `<Root>Leaf` enum with one variant per distinct leaf type
//! reachable from the root, `post_process_config`, and one private `walk_*`
//! function per reachable struct. Walks are depth-first in field declaration
//! order. Absent optionals are skipped. List elements get their index as a
//! path segment and map entries their key.

use cgen_ir::StructId;
use cgen_types::naming::snake_case;
use cgen_types::{ResolvedField, ResolvedSchema, Shape, Ty};
use rustc_hash::{FxHashMap, FxHashSet};

use super::string_literal;
use crate::context::CodegenContext;

/// A leaf type: its variant name and Rust spelling.
pub(crate) struct Leaf {
    pub variant: String,
    pub rust_type: String,
}

pub fn emit_traversal(ctx: &mut CodegenContext<'_>) {
    let schema = ctx.schema;
    let leaves = collect_leaves(schema);
    let walks = walk_names(schema);

    emit_leaf_enum(ctx, &leaves);
    emit_entry(ctx, &walks);
    for &id in &schema.reachable {
        emit_walk(ctx, id, &walks);
    }
}

/// Every leaf reachable from the root with the field it belongs to, in walk
/// order. A type used by several fields appears once per field.
pub(crate) fn leaf_uses(schema: &ResolvedSchema) -> Vec<(Leaf, &ResolvedField)> {
    fn visit<'s>(
        schema: &'s ResolvedSchema,
        field: &'s ResolvedField,
        ty: &Ty,
        out: &mut Vec<(Leaf, &'s ResolvedField)>,
    ) {
        match (ty, ty.shape()) {
            (Ty::Optional(inner), _) => visit(schema, field, inner, out),
            (_, Shape::Leaf | Shape::LeafCollection) => {
                let leaf = Leaf {
                    variant: schema.leaf_name(ty),
                    rust_type: schema.rust_type(ty),
                };
                out.push((leaf, field));
            }
            (Ty::List(inner) | Ty::Map(_, inner), Shape::Container) => {
                visit(schema, field, inner, out);
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    for &id in &schema.reachable {
        for field in &schema.struct_def(id).fields {
            visit(schema, field, &field.ty, &mut out);
        }
    }
    out
}

/// Distinct leaf types, in order of first use.
fn collect_leaves(schema: &ResolvedSchema) -> Vec<Leaf> {
    let mut seen = FxHashSet::default();
    leaf_uses(schema)
        .into_iter()
        .filter_map(|(leaf, _)| seen.insert(leaf.variant.clone()).then_some(leaf))
        .collect()
}

/// `walk_<snake name>` per reachable struct, suffixed if two names meet.
fn walk_names(schema: &ResolvedSchema) -> FxHashMap<StructId, String> {
    let mut taken = FxHashSet::default();
    let mut names = FxHashMap::default();
    for &id in &schema.reachable {
        let base = format!("walk_{}", snake_case(&schema.struct_def(id).ident));
        let mut name = base.clone();
        let mut n = 2;
        while !taken.insert(name.clone()) {
            name = format!("{base}_{n}");
            n += 1;
        }
        names.insert(id, name);
    }
    names
}

fn emit_leaf_enum(ctx: &mut CodegenContext<'_>, leaves: &[Leaf]) {
    let leaf_enum = ctx.leaf_enum();
    let root = ctx.schema.root_struct().ident.as_str();

    ctx.writeln(&format!(
        "/// A mutable reference to one leaf value of a [`{root}`], passed to the"
    ));
    ctx.writeln("/// visitor of [`post_process_config`].");
    ctx.writeln("#[derive(Debug)]");
    ctx.block(&format!("pub enum {leaf_enum}<'a> {{"), "}", |ctx| {
        for leaf in leaves {
            ctx.writeln(&format!("{}(&'a mut {}),", leaf.variant, leaf.rust_type));
        }
        if leaves.is_empty() {
            ctx.writeln("#[doc(hidden)]");
            ctx.writeln("Unused(std::marker::PhantomData<&'a mut ()>),");
        }
    });
    ctx.newline();

    ctx.block(&format!("impl {leaf_enum}<'_> {{"), "}", |ctx| {
        ctx.writeln("/// Rust spelling of the referenced value's type.");
        ctx.block("pub fn kind_name(&self) -> &'static str {", "}", |ctx| {
            ctx.block("match self {", "}", |ctx| {
                for leaf in leaves {
                    ctx.writeln(&format!(
                        "{leaf_enum}::{}(_) => {},",
                        leaf.variant,
                        string_literal(&leaf.rust_type)
                    ));
                }
                if leaves.is_empty() {
                    ctx.writeln(&format!("{leaf_enum}::Unused(_) => \"()\","));
                }
            });
        });
    });
    ctx.newline();
}

fn emit_entry(ctx: &mut CodegenContext<'_>, walks: &FxHashMap<StructId, String>) {
    let rt = ctx.rt();
    let leaf_enum = ctx.leaf_enum();
    let schema = ctx.schema;
    let root = schema.root_struct().ident.as_str();
    let walk = &walks[&schema.root];

    ctx.writeln("/// Call `visit` once for every leaf value in `config`, depth-first in");
    ctx.writeln("/// field declaration order, with the leaf's key path.");
    ctx.writeln("///");
    ctx.writeln("/// Absent optional values are skipped. The first error returned by");
    ctx.writeln("/// `visit` stops the walk and is returned.");
    ctx.writeln(&format!(
        "pub fn post_process_config<X, E, F>(config: &mut {root}, mut visit: F, extra: &mut X) -> Result<(), E>"
    ));
    where_clause(ctx, rt, &leaf_enum);
    ctx.block("{", "}", |ctx| {
        ctx.writeln(&format!("let mut path = {rt}::KeyPath::new();"));
        ctx.writeln(&format!("{walk}(config, &mut path, &mut visit, extra)"));
    });
    ctx.newline();
}

fn where_clause(ctx: &mut CodegenContext<'_>, rt: &str, leaf_enum: &str) {
    ctx.writeln("where");
    ctx.indent();
    ctx.writeln(&format!(
        "F: FnMut(&{rt}::KeyPath, {leaf_enum}<'_>, &mut X) -> Result<(), E>,"
    ));
    ctx.dedent();
}

fn emit_walk(ctx: &mut CodegenContext<'_>, id: StructId, walks: &FxHashMap<StructId, String>) {
    let rt = ctx.rt();
    let leaf_enum = ctx.leaf_enum();
    let schema = ctx.schema;
    let def = schema.struct_def(id);
    let walk = &walks[&id];

    ctx.writeln(&format!(
        "fn {walk}<X, E, F>(value: &mut {}, path: &mut {rt}::KeyPath, visit: &mut F, extra: &mut X) -> Result<(), E>",
        def.ident
    ));
    where_clause(ctx, rt, &leaf_enum);
    ctx.block("{", "}", |ctx| {
        if def.fields.is_empty() {
            ctx.writeln("let _ = (value, path, visit, extra);");
        }
        let walker = Walker {
            schema,
            leaf_enum: &leaf_enum,
            walks,
        };
        for field in &def.fields {
            ctx.writeln(&format!("path.push({});", string_literal(&field.name)));
            walker.emit(ctx, &field.ty, &Place::Field(&field.ident));
            ctx.writeln("path.pop();");
        }
        ctx.writeln("Ok(())");
    });
    ctx.newline();
}

/// Where the value being walked lives.
enum Place<'a> {
    /// `value.<ident>`, owned by the struct being walked.
    Field(&'a str),
    /// `item`, a `&mut` bound by an enclosing loop or `if let`.
    Item,
}

impl Place<'_> {
    fn expr(&self) -> String {
        match self {
            Place::Field(ident) => format!("value.{ident}"),
            Place::Item => "item".to_owned(),
        }
    }

    fn borrow(&self) -> String {
        match self {
            Place::Field(ident) => format!("&mut value.{ident}"),
            Place::Item => "item".to_owned(),
        }
    }
}

struct Walker<'a> {
    schema: &'a ResolvedSchema,
    leaf_enum: &'a str,
    walks: &'a FxHashMap<StructId, String>,
}

impl Walker<'_> {
    fn emit(&self, ctx: &mut CodegenContext<'_>, ty: &Ty, place: &Place<'_>) {
        match (ty, ty.shape()) {
            (Ty::Optional(inner), _) => {
                let open = format!("if let Some(item) = {}.as_mut() {{", place.expr());
                ctx.block(&open, "}", |ctx| self.emit(ctx, inner, &Place::Item));
            }
            (_, Shape::Leaf | Shape::LeafCollection) => {
                ctx.writeln(&format!(
                    "visit(path, {}::{}({}), extra)?;",
                    self.leaf_enum,
                    self.schema.leaf_name(ty),
                    place.borrow()
                ));
            }
            (Ty::Struct(id), _) => {
                ctx.writeln(&format!(
                    "{}({}, path, visit, extra)?;",
                    self.walks[id],
                    place.borrow()
                ));
            }
            (Ty::List(inner), _) => {
                let open = format!(
                    "for (index, item) in {}.iter_mut().enumerate() {{",
                    place.expr()
                );
                ctx.block(&open, "}", |ctx| {
                    ctx.writeln("path.push_index(index);");
                    self.emit(ctx, inner, &Place::Item);
                    ctx.writeln("path.pop();");
                });
            }
            (Ty::Map(_, inner), _) => {
                let open = format!("for (key, item) in {}.iter_mut() {{", place.expr());
                ctx.block(&open, "}", |ctx| {
                    ctx.writeln("path.push(key.to_string());");
                    self.emit(ctx, inner, &Place::Item);
                    ctx.writeln("path.pop();");
                });
            }
            (Ty::Scalar(_) | Ty::Str | Ty::Enum(_), _) => {}
        }
    }
}
