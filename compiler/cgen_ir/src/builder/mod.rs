//! Schema IR builder.
//!
//! Turns a parsed schema document into a linked [`Schema`].
//!
//! # Document Layout
//!
//! ```text
//! info:     { title, version, description }
//! options:  { root: Config }
//! aliases:  { name: field-spec }           named field templates
//! enums:    { Name: [A, B] | { type, variants, description } }
//! structs:  { name: { description, fields: { field: field-spec } } }
//! types:    { name: { type: object, properties, required: [..] } | { enum: [..] } | field-spec }
//! elements: { field: field-spec }          fields of the root struct
//! ```
//!
//! A field spec is a type expression string, or a mapping with `type` (or
//! `$ref`), `default`, `required`/`use`, `format`/`base`, `description`,
//! `min`/`max`, `min_items`/`max_items`, and `items`/`keys`/`values`/`inner`
//! for the long forms of `list`, `map`, and `optional`.
//!
//! A field of `type: object` with `properties`, or one carrying an `enum`
//! list, declares a struct or enum of its own named after the field. A name
//! that is already taken gets a `_1`, `_2`, ... suffix.
//!
//! # Passes
//!
//! 1. Declare: every struct, enum, and alias name is registered. Enums are
//!    built completely; struct fields are built with unknown type names left
//!    as [`SchemaNode::Unresolved`].
//! 2. Link: unresolved names become struct or enum references, or an
//!    [`SchemaError::UnknownType`].
//! 3. Check: by-value struct cycles are rejected and the dependency order is
//!    computed.

use cgen_rt::{FromText, Mapping, Node, RepeatedKey};
use rustc_hash::FxHashMap;

use crate::{
    parse_type_expr, EnumDef, EnumId, FieldDef, Primitive, PrimitiveTable, ScalarKind, Schema,
    SchemaError, SchemaInfo, SchemaNode, StructDef, StructGraph, StructId, TypeExpr, VariantDef,
};

/// Name of the root struct when the schema does not choose one.
pub const DEFAULT_ROOT: &str = "Config";

/// Alias chains longer than this are treated as self-referential.
const MAX_ALIAS_DEPTH: usize = 32;

const SECTIONS: &[&str] = &["info", "options", "aliases", "enums", "structs", "types", "elements"];

/// Parse schema text (YAML) and build it.
///
/// `root_override` replaces the root struct name chosen by `options.root`.
pub fn parse_schema(
    text: &str,
    primitives: &PrimitiveTable,
    root_override: Option<&str>,
) -> Result<Schema, SchemaError> {
    let (doc, repeated) = cgen_rt::parse_str_lenient(text)
        .map_err(|err| SchemaError::malformed("<schema>", err.to_string()))?;
    if let Some(repeated) = repeated.first() {
        let root_name = match root_override {
            Some(name) => name.to_owned(),
            None => root_option(doc.as_mapping().and_then(|top| top.get("options")))?,
        };
        return Err(repeated_key(repeated, &root_name));
    }
    build_schema(&doc, primitives, root_override)
}

/// The error for a key written twice in one mapping of the schema.
fn repeated_key(repeated: &RepeatedKey, root_name: &str) -> SchemaError {
    let key = repeated.key.clone();
    let location = repeated.path.describe_child(&key);
    let segments: Vec<&str> = repeated.path.segments().iter().map(String::as_str).collect();
    match segments.as_slice() {
        ["elements"] => SchemaError::DuplicateField {
            struct_name: root_name.to_owned(),
            field: key,
            location,
        },
        ["structs", name, "fields" | "properties"] | ["types", name, "properties"] => {
            SchemaError::DuplicateField {
                struct_name: (*name).to_owned(),
                field: key,
                location,
            }
        }
        ["enums" | "types", name, "variants" | "enum"] => SchemaError::DuplicateVariant {
            enum_name: (*name).to_owned(),
            variant: key,
            location,
        },
        ["aliases" | "enums" | "structs" | "types"] => SchemaError::DuplicateType {
            name: key,
            first: location.clone(),
            location,
        },
        _ => SchemaError::malformed(location, format!("key `{key}` appears more than once")),
    }
}

/// Build a linked schema from a parsed schema document.
pub fn build_schema(
    doc: &Node,
    primitives: &PrimitiveTable,
    root_override: Option<&str>,
) -> Result<Schema, SchemaError> {
    let top = match doc {
        Node::Mapping(top) => top,
        Node::Null => return Err(SchemaError::malformed("<schema>", "schema is empty")),
        other => {
            return Err(SchemaError::malformed(
                "<schema>",
                format!("schema must be a mapping, found a {}", other.kind_name()),
            ))
        }
    };

    for key in top.keys().filter(|k| !SECTIONS.contains(k)) {
        tracing::debug!(section = key, "ignoring unknown schema section");
    }

    let info = build_info(top.get("info"))?;
    let root_name = match root_override {
        Some(name) => name.to_owned(),
        None => root_option(top.get("options"))?,
    };

    let mut builder = Builder {
        primitives,
        aliases: FxHashMap::default(),
        types: FxHashMap::default(),
        structs: Vec::new(),
        enums: Vec::new(),
        pending: Vec::new(),
        hoisted: FxHashMap::default(),
    };
    builder.declare(top, &root_name)?;
    builder.build_fields()?;

    let Builder {
        types,
        mut structs,
        enums,
        ..
    } = builder;

    for def in &mut structs {
        for field in &mut def.fields {
            link(&mut field.node, &field.location, &types, primitives)?;
        }
    }

    let root = match types.get(&root_name) {
        Some((Declared::Struct(id), _)) => *id,
        _ => {
            return Err(SchemaError::malformed(
                "<schema>",
                format!("schema has no `elements` section and no struct named `{root_name}`"),
            ))
        }
    };

    let graph = StructGraph::new(&structs);
    graph.check_cycles()?;
    let order = graph.order();

    tracing::debug!(
        structs = structs.len(),
        enums = enums.len(),
        root = %root_name,
        "schema built"
    );

    Ok(Schema {
        info,
        structs,
        enums,
        root,
        order,
    })
}

#[derive(Copy, Clone, Debug)]
enum Declared {
    Struct(StructId),
    Enum(EnumId),
    Alias,
}

/// A struct whose fields are built after every name is declared.
struct PendingStruct<'a> {
    id: StructId,
    fields: Option<&'a Node>,
    required: Option<&'a Node>,
    location: String,
}

struct Builder<'a> {
    primitives: &'a PrimitiveTable,
    aliases: FxHashMap<&'a str, (&'a Node, String)>,
    /// Every declared name with the location of its declaration.
    types: FxHashMap<String, (Declared, String)>,
    structs: Vec<StructDef>,
    enums: Vec<EnumDef>,
    pending: Vec<PendingStruct<'a>>,
    /// Inline types already declared, by the node holding their members.
    /// An alias used by several fields declares its type once.
    hoisted: FxHashMap<*const Node, String>,
}

impl<'a> Builder<'a> {
    fn declare(&mut self, top: &'a Mapping, root_name: &str) -> Result<(), SchemaError> {
        if let Some(aliases) = section(top, "aliases")? {
            for (name, spec) in aliases.iter() {
                self.declare_alias(name, spec, format!("aliases.{name}"))?;
            }
        }

        if let Some(enums) = section(top, "enums")? {
            for (name, spec) in enums.iter() {
                self.declare_enum(name, spec, format!("enums.{name}"))?;
            }
        }

        if let Some(structs) = section(top, "structs")? {
            for (name, spec) in structs.iter() {
                let location = format!("structs.{name}");
                let spec = expect_mapping(spec, &location)?;
                let fields = spec.get("fields").or_else(|| spec.get("properties"));
                self.declare_struct(
                    name,
                    description(spec, &location)?,
                    fields,
                    spec.get("required"),
                    location,
                )?;
            }
        }

        // Compatibility layout: one section holding objects, enums, and aliases.
        if let Some(types) = section(top, "types")? {
            for (name, spec) in types.iter() {
                let location = format!("types.{name}");
                match spec {
                    Node::Mapping(m) if m.contains_key("enum") => {
                        self.declare_enum(name, spec, location)?;
                    }
                    Node::Mapping(m)
                        if m.contains_key("properties")
                            || m.get("type").and_then(Node::as_text) == Some("object") =>
                    {
                        self.declare_struct(
                            name,
                            description(m, &location)?,
                            m.get("properties"),
                            m.get("required"),
                            location,
                        )?;
                    }
                    _ => self.declare_alias(name, spec, location)?,
                }
            }
        }

        if let Some(elements) = top.get("elements") {
            self.declare_struct(root_name, None, Some(elements), None, "elements".to_owned())?;
        }
        Ok(())
    }

    fn declare_name(
        &mut self,
        name: &str,
        declared: Declared,
        location: &str,
    ) -> Result<(), SchemaError> {
        if self.primitives.contains(name) {
            return Err(SchemaError::DuplicateType {
                name: name.to_owned(),
                location: location.to_owned(),
                first: "<primitive>".to_owned(),
            });
        }
        if let Some((_, first)) = self.types.get(name) {
            return Err(SchemaError::DuplicateType {
                name: name.to_owned(),
                location: location.to_owned(),
                first: first.clone(),
            });
        }
        self.types
            .insert(name.to_owned(), (declared, location.to_owned()));
        Ok(())
    }

    fn declare_alias(
        &mut self,
        name: &'a str,
        spec: &'a Node,
        location: String,
    ) -> Result<(), SchemaError> {
        self.declare_name(name, Declared::Alias, &location)?;
        self.aliases.insert(name, (spec, location));
        Ok(())
    }

    fn declare_struct(
        &mut self,
        name: &str,
        description: Option<String>,
        fields: Option<&'a Node>,
        required: Option<&'a Node>,
        location: String,
    ) -> Result<(), SchemaError> {
        let id = StructId::new(self.structs.len());
        self.declare_name(name, Declared::Struct(id), &location)?;
        self.structs.push(StructDef {
            name: name.to_owned(),
            description,
            fields: Vec::new(),
            location: location.clone(),
        });
        self.pending.push(PendingStruct {
            id,
            fields,
            required,
            location,
        });
        Ok(())
    }

    fn declare_enum(&mut self, name: &str, spec: &Node, location: String) -> Result<(), SchemaError> {
        let id = EnumId::new(self.enums.len());
        self.declare_name(name, Declared::Enum(id), &location)?;
        let def = self.build_enum(name, spec, location)?;
        self.enums.push(def);
        Ok(())
    }

    fn build_enum(&self, name: &str, spec: &Node, location: String) -> Result<EnumDef, SchemaError> {
        match spec {
            Node::Sequence(_) => self.enum_def(name, spec, None, None, location),
            Node::Mapping(m) => {
                let variants = m
                    .get("variants")
                    .or_else(|| m.get("enum"))
                    .ok_or_else(|| {
                        SchemaError::malformed(&location, format!("enum `{name}` has no variants"))
                    })?;
                let description = description(m, &location)?;
                let repr = m.get("type").or_else(|| m.get("repr"));
                self.enum_def(name, variants, repr, description, location)
            }
            other => Err(SchemaError::malformed(
                &location,
                format!(
                    "enum `{name}` must be a list of variants or a mapping, found a {}",
                    other.kind_name()
                ),
            )),
        }
    }

    fn enum_def(
        &self,
        name: &str,
        variants_node: &Node,
        repr: Option<&Node>,
        description: Option<String>,
        location: String,
    ) -> Result<EnumDef, SchemaError> {
        let repr = match repr {
            Some(node) => self.enum_repr(node, &location)?,
            None => ScalarKind::I32,
        };

        let mut def = EnumDef {
            name: name.to_owned(),
            description,
            repr,
            variants: Vec::new(),
            location: location.clone(),
        };

        let mut next = 0_i64;
        for (variant, value, doc) in variant_entries(variants_node, &location)? {
            let variant_location = format!("{location}.variants.{variant}");
            let value = match value {
                Some(node) => integer::<i64>(node, &variant_location, "an integer")?,
                None => next,
            };
            if def.variant(&variant).is_some() {
                return Err(SchemaError::DuplicateVariant {
                    enum_name: name.to_owned(),
                    variant,
                    location: variant_location,
                });
            }
            if let Some(first) = def.variants.iter().find(|v| v.value == value) {
                return Err(SchemaError::DuplicateDiscriminant {
                    enum_name: name.to_owned(),
                    first: first.name.clone(),
                    second: variant,
                    value,
                    location: variant_location,
                });
            }
            next = value.checked_add(1).unwrap_or(value);
            def.variants.push(VariantDef {
                name: variant,
                value,
                description: doc,
            });
        }

        if def.variants.is_empty() {
            return Err(SchemaError::malformed(
                location,
                format!("enum `{name}` has no variants"),
            ));
        }
        Ok(def)
    }

    /// The underlying kind of an enum. Text enums are stored as `i32`.
    fn enum_repr(&self, node: &Node, location: &str) -> Result<ScalarKind, SchemaError> {
        let name = text(node, location)?;
        match self.primitives.lookup(name) {
            Some(Primitive::Str) => Ok(ScalarKind::I32),
            Some(Primitive::Scalar(kind)) if kind.is_integer() => Ok(kind),
            _ => Err(SchemaError::malformed(
                location,
                format!("enum type must be an integer type, found `{name}`"),
            )),
        }
    }

    /// Build the fields of every declared struct, including structs declared
    /// for inline objects along the way.
    fn build_fields(&mut self) -> Result<(), SchemaError> {
        while !self.pending.is_empty() {
            let pending = std::mem::take(&mut self.pending);
            for item in pending {
                self.build_struct_fields(item)?;
            }
        }
        Ok(())
    }

    fn build_struct_fields(&mut self, item: PendingStruct<'a>) -> Result<(), SchemaError> {
        let struct_name = self.structs[item.id.index()].name.clone();
        let mut fields: Vec<FieldDef> = Vec::new();

        let entries: Vec<(String, &Node)> = match item.fields {
            None | Some(Node::Null) => Vec::new(),
            Some(Node::Mapping(m)) => m.iter().map(|(k, v)| (k.to_owned(), v)).collect(),
            Some(Node::Sequence(items)) => items
                .iter()
                .enumerate()
                .map(|(index, spec)| -> Result<(String, &Node), SchemaError> {
                    let name = spec
                        .as_mapping()
                        .and_then(|m| m.get("name"))
                        .and_then(Node::as_text)
                        .ok_or_else(|| {
                            SchemaError::malformed(
                                format!("{}.{index}", item.location),
                                "fields in list form need a `name`",
                            )
                        })?;
                    Ok((name.to_owned(), spec))
                })
                .collect::<Result<_, SchemaError>>()?,
            Some(other) => {
                return Err(SchemaError::malformed(
                    &item.location,
                    format!(
                        "fields of `{struct_name}` must be a mapping or a list, found a {}",
                        other.kind_name()
                    ),
                ))
            }
        };

        for (name, spec) in entries {
            let location = format!("{}.{name}", item.location);
            if fields.iter().any(|f| f.name == name) {
                return Err(SchemaError::DuplicateField {
                    struct_name,
                    field: name,
                    location,
                });
            }
            fields.push(self.build_field(&name, spec, location)?);
        }

        if let Some(required) = item.required {
            let location = format!("{}.required", item.location);
            let names = required.as_sequence().ok_or_else(|| {
                SchemaError::malformed(&location, "`required` must be a list of field names")
            })?;
            for node in names {
                let name = text(node, &location)?;
                let field = fields.iter_mut().find(|f| f.name == name).ok_or_else(|| {
                    SchemaError::malformed(
                        &location,
                        format!("required field `{name}` is not declared in `{struct_name}`"),
                    )
                })?;
                field.required = true;
            }
        }

        self.structs[item.id.index()].fields = fields;
        Ok(())
    }

    fn build_field(&mut self, name: &str, spec: &'a Node, location: String) -> Result<FieldDef, SchemaError> {
        let props = self.props(spec, &location, 0)?;
        let node = self.node_from_props(&props, name, &location, 0)?;
        let mut field = FieldDef::new(name, node, location);
        let location = field.location.clone();

        for &(key, value) in &props.entries {
            match key {
                "type" | "$ref" | "items" | "keys" | "values" | "inner" | "name" | "required"
                | "use" | "properties" | "fields" | "enum" | "repr" => {}
                "default" => field.default = Some(value.clone()),
                "description" | "doc" => field.description = Some(text(value, &location)?.to_owned()),
                "format" => field.radix = Some(format_radix(text(value, &location)?, &location)?),
                "base" => field.radix = Some(integer::<u32>(value, &location, "a radix")?),
                "min" | "minimum" => field.min = Some(scalar_node(value, &location)?),
                "max" | "maximum" => field.max = Some(scalar_node(value, &location)?),
                "min_items" | "minItems" => {
                    field.min_items = Some(integer::<u32>(value, &location, "a count")? as usize);
                }
                "max_items" | "maxItems" => {
                    field.max_items = Some(integer::<u32>(value, &location, "a count")? as usize);
                }
                other => tracing::debug!(location = %location, key = other, "ignoring unknown field property"),
            }
        }

        // `required: bool` wins over the newer `use: required|optional`. A
        // list is the required members of an inline object.
        let flag = props.get("required").filter(|n| n.as_sequence().is_none());
        field.required = match (flag, props.get("use")) {
            (Some(flag), _) => {
                cgen_rt::stob(text(flag, &location)?).map_err(|_| {
                    SchemaError::malformed(&location, "`required` must be `true` or `false`")
                })?
            }
            (None, Some(usage)) => match text(usage, &location)? {
                "required" => true,
                "optional" => false,
                other => {
                    return Err(SchemaError::malformed(
                        &location,
                        format!("`use` must be `required` or `optional`, found `{other}`"),
                    ))
                }
            },
            (None, None) => false,
        };

        if let Some(radix) = field.radix {
            apply_radix(&mut field.node, radix);
        }
        Ok(field)
    }

    /// Field properties with alias references expanded.
    ///
    /// A field naming an alias, bare (`http: port`) or as its `type`, takes
    /// every property of the alias; its own properties override them.
    fn props(&self, spec: &'a Node, location: &str, depth: usize) -> Result<Props<'a>, SchemaError> {
        let mapping = match spec {
            Node::Scalar(name) => {
                return self.alias_props(name.trim(), depth).unwrap_or_else(|| {
                    Ok(Props {
                        entries: vec![("type", spec)],
                    })
                })
            }
            Node::Mapping(m) => m,
            other => {
                return Err(SchemaError::malformed(
                    location,
                    format!(
                        "field spec must be a type name or a mapping, found a {}",
                        other.kind_name()
                    ),
                ))
            }
        };

        let own = Props {
            entries: mapping.iter().collect(),
        };
        let Some(alias) = own.type_name().and_then(|name| self.alias_props(name, depth)) else {
            return Ok(own);
        };

        let mut props = alias?;
        for &(key, value) in &own.entries {
            if key != "type" && key != "$ref" {
                props.set(key, value);
            }
        }
        Ok(props)
    }

    /// Properties of alias `name`, or `None` if `name` is not an alias.
    fn alias_props(&self, name: &str, depth: usize) -> Option<Result<Props<'a>, SchemaError>> {
        let &(spec, ref location) = self.aliases.get(name)?;
        if depth >= MAX_ALIAS_DEPTH {
            return Some(Err(SchemaError::malformed(
                location.clone(),
                format!("alias `{name}` refers to itself"),
            )));
        }
        Some(self.props(spec, location, depth + 1))
    }

    /// The type a field spec describes. Inline objects and enums are declared
    /// under a name derived from `hint`.
    fn node_from_props(
        &mut self,
        props: &Props<'a>,
        hint: &str,
        location: &str,
        depth: usize,
    ) -> Result<SchemaNode, SchemaError> {
        if let Some(variants) = props.get("enum") {
            let name = self.hoist_enum(props, variants, hint, location)?;
            return Ok(SchemaNode::Unresolved(name));
        }

        let type_name = props
            .type_name()
            .ok_or_else(|| SchemaError::malformed(location, "field has no `type`"))?;

        let part = |key: &str| {
            props.get(key).ok_or_else(|| {
                SchemaError::malformed(location, format!("`{type_name}` needs `{key}`"))
            })
        };

        match type_name.trim().to_ascii_lowercase().as_str() {
            "list" | "array" => {
                let items = part("items")?;
                let items = self.node_of_spec(items, hint, &format!("{location}.items"), depth)?;
                Ok(SchemaNode::List(Box::new(items)))
            }
            "map" | "dict" | "dictionary" => {
                let key = match props.get("keys") {
                    Some(spec) => self.node_of_spec(spec, hint, &format!("{location}.keys"), depth)?,
                    None => SchemaNode::Str,
                };
                let value = part("values")?;
                let value = self.node_of_spec(value, hint, &format!("{location}.values"), depth)?;
                Ok(SchemaNode::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            "optional" => {
                let inner = part("inner")?;
                let inner = self.node_of_spec(inner, hint, &format!("{location}.inner"), depth)?;
                Ok(SchemaNode::Optional(Box::new(inner)))
            }
            "object" => {
                let name = self.hoist_struct(props, hint, location)?;
                Ok(SchemaNode::Unresolved(name))
            }
            _ => {
                let expr = parse_type_expr(type_name).map_err(|msg| SchemaError::malformed(location, msg))?;
                self.node_from_expr(&expr, location, depth)
            }
        }
    }

    fn node_of_spec(
        &mut self,
        spec: &'a Node,
        hint: &str,
        location: &str,
        depth: usize,
    ) -> Result<SchemaNode, SchemaError> {
        let props = self.props(spec, location, depth)?;
        self.node_from_props(&props, hint, location, depth)
    }

    /// Declare the struct of an inline object and return its name.
    fn hoist_struct(&mut self, props: &Props<'a>, hint: &str, location: &str) -> Result<String, SchemaError> {
        let fields = props.get("properties").or_else(|| props.get("fields"));
        let key = fields.map(|node| node as *const Node);
        if let Some(name) = key.and_then(|key| self.hoisted.get(&key)) {
            return Ok(name.clone());
        }

        let name = self.unused_name(hint);
        let description = props
            .get("description")
            .map(|node| text(node, location).map(str::to_owned))
            .transpose()?;
        self.declare_struct(&name, description, fields, props.get("required"), location.to_owned())?;
        tracing::debug!(name = %name, location, "declared struct for inline object");
        if let Some(key) = key {
            self.hoisted.insert(key, name.clone());
        }
        Ok(name)
    }

    /// Declare the enum of an inline `enum` list and return its name.
    fn hoist_enum(
        &mut self,
        props: &Props<'a>,
        variants: &'a Node,
        hint: &str,
        location: &str,
    ) -> Result<String, SchemaError> {
        let key = variants as *const Node;
        if let Some(name) = self.hoisted.get(&key) {
            return Ok(name.clone());
        }

        let name = self.unused_name(hint);
        let description = props
            .get("description")
            .map(|node| text(node, location).map(str::to_owned))
            .transpose()?;
        let repr = props.get("type").or_else(|| props.get("repr"));
        let def = self.enum_def(&name, variants, repr, description, location.to_owned())?;
        self.declare_name(&name, Declared::Enum(EnumId::new(self.enums.len())), location)?;
        self.enums.push(def);
        tracing::debug!(name = %name, location, "declared enum for inline variants");
        self.hoisted.insert(key, name.clone());
        Ok(name)
    }

    /// `hint`, or `hint_<n>` for the first `n` whose name is free. Names are
    /// compared the way they become identifiers, so `Server1` takes `server_1`.
    fn unused_name(&self, hint: &str) -> String {
        let squash = |name: &str| -> String {
            name.chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase())
                .collect()
        };
        let taken: Vec<String> = self
            .types
            .keys()
            .map(String::as_str)
            .chain(self.primitives.names())
            .map(squash)
            .collect();

        let mut name = hint.to_owned();
        let mut n = 1;
        while taken.contains(&squash(&name)) {
            name = format!("{hint}_{n}");
            n += 1;
        }
        name
    }

    fn node_from_expr(&mut self, expr: &TypeExpr, location: &str, depth: usize) -> Result<SchemaNode, SchemaError> {
        Ok(match expr {
            TypeExpr::Named(name) => match self.primitives.lookup(name) {
                Some(Primitive::Scalar(kind)) => SchemaNode::scalar(kind),
                Some(Primitive::Str) => SchemaNode::Str,
                None => match self.aliases.get(name.as_str()) {
                    Some(&(spec, ref alias_location)) => {
                        let alias_location = alias_location.clone();
                        if depth >= MAX_ALIAS_DEPTH {
                            return Err(SchemaError::malformed(
                                alias_location,
                                format!("alias `{name}` refers to itself"),
                            ));
                        }
                        self.node_of_spec(spec, name, &alias_location, depth + 1)?
                    }
                    None => SchemaNode::Unresolved(name.clone()),
                },
            },
            TypeExpr::List(inner) => SchemaNode::List(Box::new(self.node_from_expr(inner, location, depth)?)),
            TypeExpr::Map(key, value) => SchemaNode::Map {
                key: Box::new(self.node_from_expr(key, location, depth)?),
                value: Box::new(self.node_from_expr(value, location, depth)?),
            },
            TypeExpr::Optional(inner) => {
                SchemaNode::Optional(Box::new(self.node_from_expr(inner, location, depth)?))
            }
        })
    }
}

/// Ordered field properties; later `set`s replace earlier values.
struct Props<'a> {
    entries: Vec<(&'a str, &'a Node)>,
}

impl<'a> Props<'a> {
    fn get(&self, key: &str) -> Option<&'a Node> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    fn set(&mut self, key: &'a str, value: &'a Node) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// The `type` name, or the last segment of a `$ref` (`#/types/sub` is `sub`).
    fn type_name(&self) -> Option<&'a str> {
        if let Some(name) = self.get("type").and_then(Node::as_text) {
            return Some(name);
        }
        let reference = self.get("$ref").and_then(Node::as_text)?;
        Some(reference.rsplit('/').next().unwrap_or(reference))
    }
}

fn link(
    node: &mut SchemaNode,
    location: &str,
    types: &FxHashMap<String, (Declared, String)>,
    primitives: &PrimitiveTable,
) -> Result<(), SchemaError> {
    match node {
        SchemaNode::Unresolved(name) => {
            *node = match types.get(name.as_str()) {
                Some((Declared::Struct(id), _)) => SchemaNode::StructRef(*id),
                Some((Declared::Enum(id), _)) => SchemaNode::Enum(*id),
                // Aliases are expanded while building fields.
                Some((Declared::Alias, _)) | None => {
                    let candidates = types
                        .keys()
                        .map(String::as_str)
                        .chain(primitives.names());
                    return Err(SchemaError::UnknownType {
                        suggestion: closest(name, candidates),
                        name: std::mem::take(name),
                        location: location.to_owned(),
                    });
                }
            };
        }
        SchemaNode::List(inner) | SchemaNode::Optional(inner) => {
            link(inner, location, types, primitives)?;
        }
        SchemaNode::Map { key, value } => {
            link(key, location, types, primitives)?;
            link(value, location, types, primitives)?;
        }
        SchemaNode::Scalar { .. } | SchemaNode::Str | SchemaNode::Enum(_) | SchemaNode::StructRef(_) => {}
    }
    Ok(())
}

/// Set the radix of a scalar, or of the scalar inside an optional.
///
/// Other shapes keep the requested radix only on the field; the resolver
/// reports it as unsupported.
fn apply_radix(node: &mut SchemaNode, radix: u32) {
    match node {
        SchemaNode::Scalar { radix: r, .. } => *r = radix,
        SchemaNode::Optional(inner) => apply_radix(inner, radix),
        _ => {}
    }
}

fn format_radix(format: &str, location: &str) -> Result<u32, SchemaError> {
    match format.to_ascii_lowercase().as_str() {
        "hex" | "hexadecimal" => Ok(16),
        "oct" | "octal" => Ok(8),
        "bin" | "binary" => Ok(2),
        "dec" | "decimal" => Ok(10),
        other => Err(SchemaError::UnsupportedFormat {
            location: location.to_owned(),
            detail: format!("unknown format `{other}`; expected hex, octal, binary, or decimal"),
        }),
    }
}

/// Variants as `(name, explicit value, description)`.
fn variant_entries<'n>(
    node: &'n Node,
    location: &str,
) -> Result<Vec<(String, Option<&'n Node>, Option<String>)>, SchemaError> {
    let location = format!("{location}.variants");
    match node {
        Node::Sequence(items) => items
            .iter()
            .map(|item| match item {
                Node::Scalar(name) => Ok((name.clone(), None, None)),
                Node::Mapping(m) if m.contains_key("name") => {
                    let name = text(m.get("name").unwrap_or(&Node::Null), &location)?;
                    Ok((name.to_owned(), m.get("value"), description(m, &location)?))
                }
                Node::Mapping(m) if m.len() == 1 => {
                    let (name, value) = m.iter().next().ok_or_else(|| {
                        SchemaError::malformed(&location, "empty variant")
                    })?;
                    Ok((name.to_owned(), Some(value).filter(|v| !v.is_null()), None))
                }
                other => Err(SchemaError::malformed(
                    &location,
                    format!("variant must be a name or a mapping, found a {}", other.kind_name()),
                )),
            })
            .collect(),
        Node::Mapping(m) => Ok(m
            .iter()
            .map(|(name, value)| (name.to_owned(), Some(value).filter(|v| !v.is_null()), None))
            .collect()),
        Node::Null => Ok(Vec::new()),
        other => Err(SchemaError::malformed(
            location,
            format!("variants must be a list or a mapping, found a {}", other.kind_name()),
        )),
    }
}

fn build_info(node: Option<&Node>) -> Result<SchemaInfo, SchemaError> {
    let Some(node) = node else {
        return Ok(SchemaInfo::default());
    };
    let info = expect_mapping(node, "info")?;
    let field = |key: &str| -> Result<Option<String>, SchemaError> {
        info.get(key)
            .map(|v| text(v, &format!("info.{key}")).map(str::to_owned))
            .transpose()
    };
    Ok(SchemaInfo {
        title: field("title")?,
        version: field("version")?,
        description: field("description")?,
    })
}

fn root_option(node: Option<&Node>) -> Result<String, SchemaError> {
    let Some(node) = node else {
        return Ok(DEFAULT_ROOT.to_owned());
    };
    let options = expect_mapping(node, "options")?;
    for key in options.keys().filter(|k| *k != "root") {
        tracing::debug!(option = key, "ignoring unknown schema option");
    }
    match options.get("root") {
        Some(root) => Ok(text(root, "options.root")?.to_owned()),
        None => Ok(DEFAULT_ROOT.to_owned()),
    }
}

fn section<'n>(top: &'n Mapping, name: &str) -> Result<Option<&'n Mapping>, SchemaError> {
    match top.get(name) {
        None | Some(Node::Null) => Ok(None),
        Some(Node::Mapping(m)) => Ok(Some(m)),
        Some(other) => Err(SchemaError::malformed(
            name,
            format!("`{name}` must be a mapping, found a {}", other.kind_name()),
        )),
    }
}

fn expect_mapping<'n>(node: &'n Node, location: &str) -> Result<&'n Mapping, SchemaError> {
    node.as_mapping().ok_or_else(|| {
        SchemaError::malformed(
            location,
            format!("expected a mapping, found a {}", node.kind_name()),
        )
    })
}

fn text<'n>(node: &'n Node, location: &str) -> Result<&'n str, SchemaError> {
    node.as_text().ok_or_else(|| {
        SchemaError::malformed(
            location,
            format!("expected a scalar, found a {}", node.kind_name()),
        )
    })
}

fn scalar_node(node: &Node, location: &str) -> Result<Node, SchemaError> {
    text(node, location)?;
    Ok(node.clone())
}

fn description(m: &Mapping, location: &str) -> Result<Option<String>, SchemaError> {
    m.get("description")
        .map(|d| text(d, location).map(str::to_owned))
        .transpose()
}

/// An integer property; unquoted numbers keep their YAML meaning.
fn integer<T: FromText>(node: &Node, location: &str, what: &str) -> Result<T, SchemaError> {
    let result = match node {
        Node::Number(number) => T::from_number(number),
        _ => T::from_text(text(node, location)?),
    };
    result.map_err(|err| SchemaError::malformed(location, format!("expected {what}: {err}")))
}

/// The candidate closest to `name` by edit distance, if reasonably close.
fn closest<'c>(name: &str, candidates: impl Iterator<Item = &'c str>) -> Option<String> {
    let limit = (name.chars().count() / 3).max(1);
    candidates
        .map(|c| (edit_distance(name, c), c))
        .filter(|(d, _)| *d <= limit)
        .min()
        .map(|(_, c)| c.to_owned())
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != *cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests;
