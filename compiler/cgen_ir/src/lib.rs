//! Schema intermediate representation for the cgen schema compiler.
//!
//! A schema document (parsed into a [`cgen_rt::Node`] tree) is turned into a
//! [`Schema`]: a table of struct and enum definitions whose fields are typed
//! by [`SchemaNode`]s. Struct references are resolved to [`StructId`]s, so
//! later phases never look types up by name.
//!
//! # Design
//!
//! - Two passes: every struct and enum name is registered first, then field
//!   types are linked. Declaration order never matters.
//! - Declaration order of structs, fields, enums, and variants is preserved
//!   everywhere; generated code and traversal order depend on it.
//! - Struct cycles are allowed only behind `optional`, `list`, or `map`.
//!   A struct that contains itself by value is rejected.

mod builder;
mod error;
mod graph;
mod primitive;
mod schema;
mod type_expr;

pub use builder::{build_schema, parse_schema, DEFAULT_ROOT};
pub use error::SchemaError;
pub use graph::StructGraph;
pub use primitive::{Primitive, PrimitiveTable};
pub use schema::{
    EnumDef, EnumId, FieldDef, ScalarKind, Schema, SchemaInfo, SchemaNode, StructDef, StructId,
    VariantDef,
};
pub use type_expr::{parse_type_expr, TypeExpr};
