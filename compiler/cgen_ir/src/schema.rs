//! Schema definitions: structs, enums, fields, and the [`SchemaNode`] type tree.

use std::fmt;

use cgen_rt::Node;

use crate::StructGraph;

/// Index of a struct in [`Schema::structs`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct StructId(u32);

/// Index of an enum in [`Schema::enums`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct EnumId(u32);

macro_rules! impl_id {
    ($($id:ident),*) => {$(
        impl $id {
            pub fn new(index: usize) -> Self {
                // Schemas never approach u32::MAX definitions.
                $id(u32::try_from(index).unwrap_or(u32::MAX))
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    )*};
}

impl_id!(StructId, EnumId);

/// Primitive scalar kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScalarKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Extended precision; represented as `f64`.
    LongDouble,
    Bool,
    /// A single byte, loaded as a signed number.
    Char,
}

impl ScalarKind {
    /// The Rust type that holds a value of this kind.
    pub fn rust_type(self) -> &'static str {
        match self {
            ScalarKind::I8 | ScalarKind::Char => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 | ScalarKind::LongDouble => "f64",
            ScalarKind::Bool => "bool",
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(
            self,
            ScalarKind::F32 | ScalarKind::F64 | ScalarKind::LongDouble | ScalarKind::Bool
        )
    }

    pub fn is_float(self) -> bool {
        matches!(
            self,
            ScalarKind::F32 | ScalarKind::F64 | ScalarKind::LongDouble
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::LongDouble => "long double",
            ScalarKind::Char => "char",
            other => other.rust_type(),
        };
        f.write_str(name)
    }
}

/// The type of a field, as declared in the schema.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum SchemaNode {
    /// A primitive number or boolean. `radix` is the parse base of integers.
    Scalar { kind: ScalarKind, radix: u32 },
    Str,
    Enum(EnumId),
    List(Box<SchemaNode>),
    Map {
        key: Box<SchemaNode>,
        value: Box<SchemaNode>,
    },
    StructRef(StructId),
    Optional(Box<SchemaNode>),
    /// A name not yet linked. Never present in a built [`Schema`].
    Unresolved(String),
}

impl SchemaNode {
    pub fn scalar(kind: ScalarKind) -> Self {
        SchemaNode::Scalar { kind, radix: 10 }
    }

    /// Struct references in this node, with whether each is held by value
    /// (not behind a list, map, or optional).
    pub fn struct_refs(&self) -> Vec<(StructId, bool)> {
        fn collect(node: &SchemaNode, by_value: bool, out: &mut Vec<(StructId, bool)>) {
            match node {
                SchemaNode::StructRef(id) => out.push((*id, by_value)),
                SchemaNode::List(inner) | SchemaNode::Optional(inner) => {
                    collect(inner, false, out);
                }
                SchemaNode::Map { key, value } => {
                    collect(key, false, out);
                    collect(value, false, out);
                }
                SchemaNode::Scalar { .. }
                | SchemaNode::Str
                | SchemaNode::Enum(_)
                | SchemaNode::Unresolved(_) => {}
            }
        }

        let mut out = Vec::new();
        collect(self, true, &mut out);
        out
    }
}

/// A field of a struct.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    /// Name as written in the schema and in configuration documents.
    pub name: String,
    pub node: SchemaNode,
    /// Declared default literal, unconverted.
    pub default: Option<Node>,
    pub required: bool,
    /// Radix requested with `format` or `base`; applied to `node` when it is
    /// a scalar or an optional scalar.
    pub radix: Option<u32>,
    pub description: Option<String>,
    /// Numeric bounds, unconverted.
    pub min: Option<Node>,
    pub max: Option<Node>,
    /// Item count bounds for lists.
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    /// Dotted location in the schema document, for diagnostics.
    pub location: String,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, node: SchemaNode, location: impl Into<String>) -> Self {
        FieldDef {
            name: name.into(),
            node,
            default: None,
            required: false,
            radix: None,
            description: None,
            min: None,
            max: None,
            min_items: None,
            max_items: None,
            location: location.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructDef {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDef>,
    pub location: String,
}

impl StructDef {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantDef {
    pub name: String,
    pub value: i64,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub description: Option<String>,
    /// Underlying integer kind.
    pub repr: ScalarKind,
    pub variants: Vec<VariantDef>,
    pub location: String,
}

impl EnumDef {
    pub fn variant(&self, name: &str) -> Option<&VariantDef> {
        self.variants.iter().find(|v| v.name == name)
    }
}

/// Free-text metadata from the schema's `info` section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaInfo {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// A built, fully linked schema.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    pub info: SchemaInfo,
    /// Struct definitions in declaration order. The root struct is among them.
    pub structs: Vec<StructDef>,
    /// Enum definitions in declaration order.
    pub enums: Vec<EnumDef>,
    /// The struct a configuration document loads into.
    pub root: StructId,
    /// Every struct, dependencies before dependents.
    pub order: Vec<StructId>,
}

impl Schema {
    pub fn struct_def(&self, id: StructId) -> &StructDef {
        &self.structs[id.index()]
    }

    pub fn enum_def(&self, id: EnumId) -> &EnumDef {
        &self.enums[id.index()]
    }

    pub fn root_struct(&self) -> &StructDef {
        self.struct_def(self.root)
    }

    pub fn struct_ids(&self) -> impl Iterator<Item = StructId> {
        (0..self.structs.len()).map(StructId::new)
    }

    pub fn enum_ids(&self) -> impl Iterator<Item = EnumId> {
        (0..self.enums.len()).map(EnumId::new)
    }

    pub fn lookup_struct(&self, name: &str) -> Option<StructId> {
        self.structs
            .iter()
            .position(|s| s.name == name)
            .map(StructId::new)
    }

    pub fn lookup_enum(&self, name: &str) -> Option<EnumId> {
        self.enums
            .iter()
            .position(|e| e.name == name)
            .map(EnumId::new)
    }

    /// The struct reference graph.
    pub fn graph(&self) -> StructGraph {
        StructGraph::new(&self.structs)
    }
}
