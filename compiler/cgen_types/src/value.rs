//! Default values and numeric bounds.
//!
//! Literals from the schema are converted with the same `cgen_rt` functions
//! the generated loader uses, so a default the resolver accepts is one the
//! loader would accept from a document.

use std::borrow::Cow;
use std::cmp::Ordering;

use cgen_ir::{EnumId, ScalarKind};
use cgen_rt::{
    from_string, from_string_radix, number_text, stob, ConversionError, FromText, Node,
};
use rustc_hash::FxHashSet;

use crate::{ResolvedEnum, Ty};

/// A checked default value.
#[derive(Clone, PartialEq, Debug)]
pub enum DefaultValue {
    /// No declared default; the type's own `Default`.
    Zero,
    Int(i128),
    Float {
        value: f64,
        /// Rust expression for the value (`1.3`, `f32::INFINITY`).
        literal: String,
    },
    Bool(bool),
    Str(String),
    Enum {
        id: EnumId,
        variant: usize,
    },
    List(Vec<DefaultValue>),
    Map(Vec<(DefaultValue, DefaultValue)>),
    Present(Box<DefaultValue>),
    Absent,
}

impl DefaultValue {
    /// Order two numeric values of the same kind.
    pub fn compare(&self, other: &DefaultValue) -> Option<Ordering> {
        match (self.numeric(), other.numeric()) {
            (Some(DefaultValue::Int(a)), Some(DefaultValue::Int(b))) => Some(a.cmp(b)),
            (
                Some(DefaultValue::Float { value: a, .. }),
                Some(DefaultValue::Float { value: b, .. }),
            ) => a.partial_cmp(b),
            _ => None,
        }
    }

    fn numeric(&self) -> Option<&DefaultValue> {
        match self {
            DefaultValue::Int(_) | DefaultValue::Float { .. } => Some(self),
            DefaultValue::Present(inner) => inner.numeric(),
            _ => None,
        }
    }

    /// Text for messages.
    pub fn describe(&self) -> String {
        match self.numeric() {
            Some(DefaultValue::Int(value)) => value.to_string(),
            Some(DefaultValue::Float { value, .. }) => value.to_string(),
            _ => format!("{self:?}"),
        }
    }
}

/// Convert a schema literal to a value of type `ty`.
///
/// `radix` applies to integer text at this level only; list items and map
/// entries are decimal. Unquoted numbers are read as the loader reads them.
/// The error is a human-readable reason.
pub(crate) fn convert_literal(
    ty: &Ty,
    radix: u32,
    node: &Node,
    enums: &[ResolvedEnum],
) -> Result<DefaultValue, String> {
    match ty {
        Ty::Scalar(kind) => {
            let (text, radix) = scalar_text(node, radix)?;
            scalar(*kind, radix, &text).map_err(|err| err.to_string())
        }
        Ty::Str => match node.as_text() {
            Some(text) => Ok(DefaultValue::Str(text.to_owned())),
            None => Err(format!("expected a scalar, found a {}", node.kind_name())),
        },
        Ty::Enum(id) => {
            let (text, _) = scalar_text(node, 10)?;
            enum_variant(&enums[id.index()], &text)
                .map(|variant| DefaultValue::Enum { id: *id, variant })
        }
        Ty::List(inner) => match node {
            Node::Null => Ok(DefaultValue::List(Vec::new())),
            Node::Sequence(items) => items
                .iter()
                .map(|item| convert_literal(inner, 10, item, enums))
                .collect::<Result<_, _>>()
                .map(DefaultValue::List),
            other => Err(format!("expected a list, found a {}", other.kind_name())),
        },
        Ty::Map(key_ty, value_ty) => match node {
            Node::Null => Ok(DefaultValue::Map(Vec::new())),
            Node::Mapping(entries) => {
                let mut seen = FxHashSet::default();
                let mut out = Vec::with_capacity(entries.len());
                for (key, value) in entries.iter() {
                    let key_value =
                        convert_literal(key_ty, 10, &Node::Scalar(key.to_owned()), enums)?;
                    // Keys are integers, bools, strings, or enums, so Debug text identifies them.
                    if !seen.insert(format!("{key_value:?}")) {
                        return Err(format!("duplicate key `{key}`"));
                    }
                    out.push((key_value, convert_literal(value_ty, 10, value, enums)?));
                }
                Ok(DefaultValue::Map(out))
            }
            other => Err(format!("expected a mapping, found a {}", other.kind_name())),
        },
        Ty::Optional(inner) => match node {
            Node::Null => Ok(DefaultValue::Absent),
            _ => convert_literal(inner, radix, node, enums)
                .map(|value| DefaultValue::Present(Box::new(value))),
        },
        Ty::Struct(_) => match node {
            Node::Null => Ok(DefaultValue::Zero),
            _ => Err("struct fields take their defaults from the struct's own fields".to_owned()),
        },
    }
}

/// Text of a scalar literal and the radix to read it in.
fn scalar_text(node: &Node, radix: u32) -> Result<(Cow<'_, str>, u32), String> {
    match node {
        Node::Scalar(text) => Ok((Cow::Borrowed(text.as_str()), radix)),
        Node::Number(text) => Ok(number_text(text, radix)),
        other => Err(format!("expected a scalar, found a {}", other.kind_name())),
    }
}

/// Convert scalar text of `kind`.
fn scalar(kind: ScalarKind, radix: u32, text: &str) -> Result<DefaultValue, ConversionError> {
    macro_rules! int {
        ($ty:ty) => {
            from_string_radix::<$ty>(text, radix).map(|v| DefaultValue::Int(i128::from(v)))
        };
    }

    match kind {
        ScalarKind::I8 | ScalarKind::Char => int!(i8),
        ScalarKind::I16 => int!(i16),
        ScalarKind::I32 => int!(i32),
        ScalarKind::I64 => int!(i64),
        ScalarKind::U8 => int!(u8),
        ScalarKind::U16 => int!(u16),
        ScalarKind::U32 => int!(u32),
        ScalarKind::U64 => int!(u64),
        ScalarKind::F32 => {
            let value = from_string::<f32>(text)?;
            Ok(DefaultValue::Float {
                value: f64::from(value),
                literal: float_literal(format!("{value:?}"), "f32"),
            })
        }
        ScalarKind::F64 | ScalarKind::LongDouble => {
            let value = from_string::<f64>(text)?;
            Ok(DefaultValue::Float {
                value,
                literal: float_literal(format!("{value:?}"), "f64"),
            })
        }
        ScalarKind::Bool => stob(text).map(DefaultValue::Bool),
    }
}

fn float_literal(debug: String, ty: &str) -> String {
    match debug.as_str() {
        "NaN" => format!("{ty}::NAN"),
        "inf" => format!("{ty}::INFINITY"),
        "-inf" => format!("{ty}::NEG_INFINITY"),
        _ => debug,
    }
}

/// Find a variant by name, or by its underlying value.
fn enum_variant(def: &ResolvedEnum, text: &str) -> Result<usize, String> {
    let text = text.trim();
    if let Some(index) = def.variants.iter().position(|v| v.name == text) {
        return Ok(index);
    }
    if let Ok(value) = i64::from_text(text) {
        if let Some(index) = def.variants.iter().position(|v| v.value == value) {
            return Ok(index);
        }
    }
    Err(format!(
        "expected one of {}",
        def.variants
            .iter()
            .map(|v| format!("`{}`", v.name))
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

/// Whether `value` fits in an integer of `kind`.
pub(crate) fn fits(kind: ScalarKind, value: i64) -> bool {
    let value = i128::from(value);
    let (min, max): (i128, i128) = match kind {
        ScalarKind::I8 | ScalarKind::Char => (i8::MIN.into(), i8::MAX.into()),
        ScalarKind::I16 => (i16::MIN.into(), i16::MAX.into()),
        ScalarKind::I32 => (i32::MIN.into(), i32::MAX.into()),
        ScalarKind::I64 => (i64::MIN.into(), i64::MAX.into()),
        ScalarKind::U8 => (0, u8::MAX.into()),
        ScalarKind::U16 => (0, u16::MAX.into()),
        ScalarKind::U32 => (0, u32::MAX.into()),
        ScalarKind::U64 => (0, u64::MAX.into()),
        _ => return false,
    };
    (min..=max).contains(&value)
}

/// Spelling of a literal for messages.
pub(crate) fn literal_text(node: &Node) -> String {
    match node {
        Node::Scalar(text) | Node::Number(text) => text.clone(),
        other => other.kind_name().to_owned(),
    }
}
