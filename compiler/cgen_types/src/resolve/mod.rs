//! Schema resolution.
//!
//! [`resolve`] turns a built [`Schema`] into a [`ResolvedSchema`]: every
//! struct, field, enum, and variant gets a Rust identifier, every field a
//! [`Ty`], a checked [`DefaultValue`], and checked bounds.

use cgen_ir::{
    EnumId, FieldDef, ScalarKind, Schema, SchemaError, SchemaInfo, SchemaNode, StructGraph,
    StructId,
};
use cgen_rt::Node;
use rustc_hash::FxHashMap;

use crate::naming::{field_ident, type_ident};
use crate::value::{convert_literal, fits, literal_text};
use crate::{DefaultValue, Shape, Ty};

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedField {
    /// Name in the schema and in documents.
    pub name: String,
    pub ident: String,
    pub ty: Ty,
    /// Held as `Option<Box<T>>`: an optional struct that leads back to its
    /// own container.
    pub boxed: bool,
    pub default: DefaultValue,
    pub required: bool,
    /// Parse and render base of an integer field; 10 unless a format is declared.
    pub radix: u32,
    pub min: Option<DefaultValue>,
    pub max: Option<DefaultValue>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub description: Option<String>,
    pub location: String,
}

impl ResolvedField {
    pub fn shape(&self) -> Shape {
        self.ty.shape()
    }

    pub fn has_bounds(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn has_item_bounds(&self) -> bool {
        self.min_items.is_some() || self.max_items.is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStruct {
    pub name: String,
    pub ident: String,
    pub description: Option<String>,
    pub fields: Vec<ResolvedField>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedVariant {
    pub name: String,
    pub ident: String,
    pub value: i64,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedEnum {
    pub name: String,
    pub ident: String,
    pub description: Option<String>,
    pub repr: ScalarKind,
    pub variants: Vec<ResolvedVariant>,
}

/// A schema ready for code generation.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSchema {
    pub info: SchemaInfo,
    /// In declaration order, indexed by [`StructId`].
    pub structs: Vec<ResolvedStruct>,
    /// In declaration order, indexed by [`EnumId`].
    pub enums: Vec<ResolvedEnum>,
    pub root: StructId,
    /// Dependencies before dependents.
    pub order: Vec<StructId>,
    /// Structs reachable from the root, in declaration order.
    pub reachable: Vec<StructId>,
}

impl ResolvedSchema {
    pub fn struct_def(&self, id: StructId) -> &ResolvedStruct {
        &self.structs[id.index()]
    }

    pub fn enum_def(&self, id: EnumId) -> &ResolvedEnum {
        &self.enums[id.index()]
    }

    pub fn root_struct(&self) -> &ResolvedStruct {
        self.struct_def(self.root)
    }

    /// Rust spelling of `ty`. Maps are the runtime's `IndexMap`, which the
    /// generated module imports.
    pub fn rust_type(&self, ty: &Ty) -> String {
        match ty {
            Ty::Scalar(kind) => kind.rust_type().to_owned(),
            Ty::Str => "String".to_owned(),
            Ty::Enum(id) => self.enum_def(*id).ident.clone(),
            Ty::Struct(id) => self.struct_def(*id).ident.clone(),
            Ty::List(inner) => format!("Vec<{}>", self.rust_type(inner)),
            Ty::Map(key, value) => {
                format!("IndexMap<{}, {}>", self.rust_type(key), self.rust_type(value))
            }
            Ty::Optional(inner) => format!("Option<{}>", self.rust_type(inner)),
        }
    }

    /// Rust spelling of a field's declared type.
    pub fn field_type(&self, field: &ResolvedField) -> String {
        match &field.ty {
            Ty::Optional(inner) if field.boxed => format!("Option<Box<{}>>", self.rust_type(inner)),
            ty => self.rust_type(ty),
        }
    }

    /// Schema spelling of `ty` (`list<sub>`, `map<u32, string>`).
    pub fn type_name(&self, ty: &Ty) -> String {
        spell(
            ty,
            &|id| self.struct_def(id).name.as_str(),
            &|id| self.enum_def(id).name.as_str(),
        )
    }

    /// Variant name for `ty` in the traversal's leaf enum: `I32`, `Str`,
    /// `Mode`, `ListOfStr`, `MapOfStrToStr`, `OptionalU8`.
    pub fn leaf_name(&self, ty: &Ty) -> String {
        match ty {
            Ty::Scalar(kind) => {
                let name = kind.rust_type();
                name[..1].to_ascii_uppercase() + &name[1..]
            }
            Ty::Str => "Str".to_owned(),
            Ty::Enum(id) => self.enum_def(*id).ident.clone(),
            Ty::Struct(id) => self.struct_def(*id).ident.clone(),
            Ty::List(inner) => format!("ListOf{}", self.leaf_name(inner)),
            Ty::Map(key, value) => {
                format!("MapOf{}To{}", self.leaf_name(key), self.leaf_name(value))
            }
            Ty::Optional(inner) => format!("Optional{}", self.leaf_name(inner)),
        }
    }
}

fn spell<'a>(
    ty: &Ty,
    struct_name: &dyn Fn(StructId) -> &'a str,
    enum_name: &dyn Fn(EnumId) -> &'a str,
) -> String {
    match ty {
        Ty::Scalar(kind) => kind.to_string(),
        Ty::Str => "string".to_owned(),
        Ty::Enum(id) => enum_name(*id).to_owned(),
        Ty::Struct(id) => struct_name(*id).to_owned(),
        Ty::List(inner) => format!("list<{}>", spell(inner, struct_name, enum_name)),
        Ty::Map(key, value) => format!(
            "map<{}, {}>",
            spell(key, struct_name, enum_name),
            spell(value, struct_name, enum_name)
        ),
        Ty::Optional(inner) => format!("optional<{}>", spell(inner, struct_name, enum_name)),
    }
}

/// Resolve a built schema.
pub fn resolve(schema: &Schema) -> Result<ResolvedSchema, SchemaError> {
    let mut type_idents: FxHashMap<String, String> = FxHashMap::default();
    let mut claim_type = |ident: &str, name: &str, location: &str| {
        if let Some(first) = type_idents.get(ident) {
            return Err(SchemaError::DuplicateType {
                name: name.to_owned(),
                location: location.to_owned(),
                first: first.clone(),
            });
        }
        type_idents.insert(ident.to_owned(), location.to_owned());
        Ok(())
    };

    let mut enums = Vec::with_capacity(schema.enums.len());
    for def in &schema.enums {
        let ident = ident_for(type_ident(&def.name), &def.name, &def.location)?;
        claim_type(&ident, &def.name, &def.location)?;

        let mut variants: Vec<ResolvedVariant> = Vec::with_capacity(def.variants.len());
        for variant in &def.variants {
            let location = format!("{}.variants.{}", def.location, variant.name);
            let variant_ident = ident_for(type_ident(&variant.name), &variant.name, &location)?;
            if variants.iter().any(|v| v.ident == variant_ident) {
                return Err(SchemaError::DuplicateVariant {
                    enum_name: def.name.clone(),
                    variant: variant.name.clone(),
                    location,
                });
            }
            if !fits(def.repr, variant.value) {
                return Err(SchemaError::TypeMismatch {
                    location,
                    expected: def.repr.to_string(),
                    literal: variant.value.to_string(),
                    reason: "out of range for the enum's type".to_owned(),
                });
            }
            variants.push(ResolvedVariant {
                name: variant.name.clone(),
                ident: variant_ident,
                value: variant.value,
                description: variant.description.clone(),
            });
        }

        enums.push(ResolvedEnum {
            name: def.name.clone(),
            ident,
            description: def.description.clone(),
            repr: def.repr,
            variants,
        });
    }

    let graph = schema.graph();
    let mut structs = Vec::with_capacity(schema.structs.len());
    for (index, def) in schema.structs.iter().enumerate() {
        let id = StructId::new(index);
        let ident = ident_for(type_ident(&def.name), &def.name, &def.location)?;
        claim_type(&ident, &def.name, &def.location)?;

        let mut fields: Vec<ResolvedField> = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            let resolved = resolve_field(schema, &graph, &enums, id, field)?;
            if fields.iter().any(|f| f.ident == resolved.ident) {
                return Err(SchemaError::DuplicateField {
                    struct_name: def.name.clone(),
                    field: field.name.clone(),
                    location: field.location.clone(),
                });
            }
            fields.push(resolved);
        }

        structs.push(ResolvedStruct {
            name: def.name.clone(),
            ident,
            description: def.description.clone(),
            fields,
        });
    }

    let reachable = graph.reachable_from(schema.root);
    tracing::debug!(
        structs = structs.len(),
        enums = enums.len(),
        reachable = reachable.len(),
        "schema resolved"
    );

    Ok(ResolvedSchema {
        info: schema.info.clone(),
        structs,
        enums,
        root: schema.root,
        order: schema.order.clone(),
        reachable,
    })
}

fn ident_for(ident: Option<String>, name: &str, location: &str) -> Result<String, SchemaError> {
    ident.ok_or_else(|| {
        SchemaError::malformed(
            location,
            format!("`{name}` has no letters or digits to form an identifier"),
        )
    })
}

fn resolve_field(
    schema: &Schema,
    graph: &StructGraph,
    enums: &[ResolvedEnum],
    owner: StructId,
    field: &FieldDef,
) -> Result<ResolvedField, SchemaError> {
    let location = field.location.as_str();
    let ident = ident_for(field_ident(&field.name), &field.name, location)?;
    let ty = to_ty(&field.node, schema, location)?;

    let boxed = match &field.node {
        SchemaNode::Optional(inner) => match **inner {
            SchemaNode::StructRef(target) => graph.reaches(target, owner),
            _ => false,
        },
        _ => false,
    };

    let radix = match field.radix {
        None | Some(10) => 10,
        Some(radix @ (2 | 8 | 16)) => {
            if !ty.scalar_kind().is_some_and(ScalarKind::is_integer) {
                return Err(SchemaError::UnsupportedFormat {
                    location: location.to_owned(),
                    detail: format!(
                        "a radix applies only to integer fields, not `{}`",
                        spell_in(schema, &ty)
                    ),
                });
            }
            radix
        }
        Some(other) => {
            return Err(SchemaError::UnsupportedFormat {
                location: location.to_owned(),
                detail: format!("unsupported base {other}; expected 2, 8, 10, or 16"),
            })
        }
    };

    let mismatch = |literal: String, reason: String| SchemaError::TypeMismatch {
        location: location.to_owned(),
        expected: spell_in(schema, &ty),
        literal,
        reason,
    };

    let default = match &field.default {
        None => DefaultValue::Zero,
        Some(node) => convert_literal(&ty, radix, node, enums)
            .map_err(|reason| mismatch(literal_text(node), reason))?,
    };

    let (min, max) = bounds(field, &ty, radix, schema)?;
    if let Some(min) = &min {
        if default.compare(min).is_some_and(std::cmp::Ordering::is_lt) {
            return Err(mismatch(
                default.describe(),
                format!("default is below the minimum {}", min.describe()),
            ));
        }
    }
    if let Some(max) = &max {
        if default.compare(max).is_some_and(std::cmp::Ordering::is_gt) {
            return Err(mismatch(
                default.describe(),
                format!("default is above the maximum {}", max.describe()),
            ));
        }
    }

    if field.min_items.is_some() || field.max_items.is_some() {
        if !matches!(ty, Ty::List(_)) {
            return Err(SchemaError::UnsupportedFormat {
                location: location.to_owned(),
                detail: format!(
                    "item counts apply only to list fields, not `{}`",
                    spell_in(schema, &ty)
                ),
            });
        }
        if let (Some(lo), Some(hi)) = (field.min_items, field.max_items) {
            if lo > hi {
                return Err(SchemaError::malformed(
                    location,
                    format!("min_items {lo} is greater than max_items {hi}"),
                ));
            }
        }
    }

    Ok(ResolvedField {
        name: field.name.clone(),
        ident,
        ty,
        boxed,
        default,
        required: field.required,
        radix,
        min,
        max,
        min_items: field.min_items,
        max_items: field.max_items,
        description: field.description.clone(),
        location: field.location.clone(),
    })
}

type Bounds = (Option<DefaultValue>, Option<DefaultValue>);

fn bounds(field: &FieldDef, ty: &Ty, radix: u32, schema: &Schema) -> Result<Bounds, SchemaError> {
    if field.min.is_none() && field.max.is_none() {
        return Ok((None, None));
    }
    let location = field.location.as_str();
    let kind = match ty.scalar_kind() {
        Some(kind) if kind != ScalarKind::Bool => kind,
        _ => {
            return Err(SchemaError::UnsupportedFormat {
                location: location.to_owned(),
                detail: format!(
                    "`min` and `max` apply only to numeric fields, not `{}`",
                    spell_in(schema, ty)
                ),
            })
        }
    };

    let ty = Ty::Scalar(kind);
    let convert = |node: &Option<Node>| {
        node.as_ref()
            .map(|node| {
                convert_literal(&ty, radix, node, &[]).map_err(|reason| SchemaError::TypeMismatch {
                    location: location.to_owned(),
                    expected: kind.to_string(),
                    literal: literal_text(node),
                    reason,
                })
            })
            .transpose()
    };
    let min = convert(&field.min)?;
    let max = convert(&field.max)?;

    if let (Some(lo), Some(hi)) = (&min, &max) {
        if lo.compare(hi).is_some_and(std::cmp::Ordering::is_gt) {
            return Err(SchemaError::malformed(
                location,
                format!("minimum {} is greater than maximum {}", lo.describe(), hi.describe()),
            ));
        }
    }
    Ok((min, max))
}

fn to_ty(node: &SchemaNode, schema: &Schema, location: &str) -> Result<Ty, SchemaError> {
    Ok(match node {
        SchemaNode::Scalar { kind, .. } => Ty::Scalar(*kind),
        SchemaNode::Str => Ty::Str,
        SchemaNode::Enum(id) => Ty::Enum(*id),
        SchemaNode::StructRef(id) => Ty::Struct(*id),
        SchemaNode::List(inner) => Ty::List(Box::new(to_ty(inner, schema, location)?)),
        SchemaNode::Optional(inner) => Ty::Optional(Box::new(to_ty(inner, schema, location)?)),
        SchemaNode::Map { key, value } => {
            let key = to_ty(key, schema, location)?;
            let hashable = match &key {
                Ty::Scalar(kind) => !kind.is_float(),
                Ty::Str | Ty::Enum(_) => true,
                _ => false,
            };
            if !hashable {
                return Err(SchemaError::InvalidMapKey {
                    location: location.to_owned(),
                    key: spell_in(schema, &key),
                });
            }
            Ty::Map(Box::new(key), Box::new(to_ty(value, schema, location)?))
        }
        SchemaNode::Unresolved(name) => {
            return Err(SchemaError::UnknownType {
                name: name.clone(),
                location: location.to_owned(),
                suggestion: None,
            })
        }
    })
}

fn spell_in(schema: &Schema, ty: &Ty) -> String {
    spell(
        ty,
        &|id| schema.struct_def(id).name.as_str(),
        &|id| schema.enum_def(id).name.as_str(),
    )
}
