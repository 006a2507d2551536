//! Typed loading of document trees.
//!
//! [`Load`] converts a [`Node`] into a typed value. Generated structs
//! implement it with one call to [`field`] or [`required`] per schema field,
//! in declaration order.
//!
//! # Absent and Null Values
//!
//! - An absent required field fails with [`DocumentError::MissingField`].
//! - An absent non-required field keeps the value already in the slot (the
//!   struct's default).
//! - `null` loads as an empty list, an empty map, `None`, or a struct with
//!   all defaults. It is a shape error for scalars.
//! - Keys not named by the schema are ignored and logged at `debug` level.

use std::fmt::Display;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::convert::{number_text, ConversionError, FromText, FromTextRadix};
use crate::{DocumentError, KeyPath, Mapping, Node};

/// Types that can be loaded from a document node.
pub trait Load: Sized {
    /// Load a value from `node`, located at `path` in the document.
    fn load(node: &Node, path: &mut KeyPath) -> Result<Self, DocumentError>;
}

/// Integer types (and optional integers) that can be loaded in an explicit radix.
pub trait LoadRadix: Sized {
    fn load_radix(node: &Node, path: &mut KeyPath, radix: u32) -> Result<Self, DocumentError>;
}

/// Types usable as map keys in a loaded document.
///
/// Map keys arrive as text, so a key type must parse from text and display
/// back to it.
pub trait MapKey: FromText + Display + Eq + Hash {}

impl<T: FromText + Display + Eq + Hash> MapKey for T {}

static EMPTY: Mapping = Mapping::new();

/// The mapping at `node`. `null` is treated as an empty mapping.
pub fn expect_mapping<'a>(
    node: &'a Node,
    path: &KeyPath,
) -> Result<&'a Mapping, DocumentError> {
    match node {
        Node::Mapping(mapping) => Ok(mapping),
        Node::Null => Ok(&EMPTY),
        other => Err(shape_error(path, "mapping", other)),
    }
}

/// Convert a scalar node with [`FromText`]. Unquoted numbers go through
/// [`FromText::from_number`].
pub fn scalar<T: FromText>(node: &Node, path: &KeyPath) -> Result<T, DocumentError> {
    let result = match node {
        Node::Number(text) => T::from_number(text),
        Node::Scalar(text) => T::from_text(text),
        other => return Err(shape_error(path, "scalar", other)),
    };
    result.map_err(|source| conversion_error(path, source))
}

/// Convert a scalar node with [`FromTextRadix`].
///
/// Quoted text is read in `radix`. Unquoted numbers are too, unless spelled
/// with a radix prefix of their own (`0o17` in a hex field is octal); see
/// [`number_text`].
pub fn radix_value<T: FromTextRadix>(
    node: &Node,
    path: &KeyPath,
    radix: u32,
) -> Result<T, DocumentError> {
    let result = match node {
        Node::Number(text) => {
            let (text, radix) = number_text(text, radix);
            T::from_text_radix(&text, radix)
        }
        Node::Scalar(text) => T::from_text_radix(text, radix),
        other => return Err(shape_error(path, "integer", other)),
    };
    result.map_err(|source| conversion_error(path, source))
}

/// Load field `name` of `fields` into `slot` if it is present.
///
/// When absent, `slot` keeps its current (default) value.
pub fn field<T: Load>(
    fields: &Mapping,
    name: &str,
    path: &mut KeyPath,
    slot: &mut T,
) -> Result<(), DocumentError> {
    if let Some(node) = fields.get(name) {
        *slot = path.scoped(name, |path| T::load(node, path))?;
    }
    Ok(())
}

/// Load required field `name` of `fields`.
pub fn required<T: Load>(
    fields: &Mapping,
    name: &str,
    path: &mut KeyPath,
) -> Result<T, DocumentError> {
    match fields.get(name) {
        Some(node) => path.scoped(name, |path| T::load(node, path)),
        None => Err(DocumentError::MissingField {
            path: path.describe_child(name),
        }),
    }
}

/// [`field`] for integer fields declared with a radix.
pub fn field_radix<T: LoadRadix>(
    fields: &Mapping,
    name: &str,
    path: &mut KeyPath,
    radix: u32,
    slot: &mut T,
) -> Result<(), DocumentError> {
    if let Some(node) = fields.get(name) {
        *slot = path.scoped(name, |path| T::load_radix(node, path, radix))?;
    }
    Ok(())
}

/// [`required`] for integer fields declared with a radix.
pub fn required_radix<T: LoadRadix>(
    fields: &Mapping,
    name: &str,
    path: &mut KeyPath,
    radix: u32,
) -> Result<T, DocumentError> {
    match fields.get(name) {
        Some(node) => path.scoped(name, |path| T::load_radix(node, path, radix)),
        None => Err(DocumentError::MissingField {
            path: path.describe_child(name),
        }),
    }
}

/// Check a loaded numeric field against its declared bounds.
pub fn check_range<T: PartialOrd + Display>(
    path: &KeyPath,
    name: &str,
    value: &T,
    min: Option<T>,
    max: Option<T>,
) -> Result<(), DocumentError> {
    if let Some(min) = min.filter(|min| value < min) {
        return Err(DocumentError::OutOfBounds {
            path: path.describe_child(name),
            detail: format!("{value} is below the minimum {min}"),
        });
    }
    if let Some(max) = max.filter(|max| value > max) {
        return Err(DocumentError::OutOfBounds {
            path: path.describe_child(name),
            detail: format!("{value} is above the maximum {max}"),
        });
    }
    Ok(())
}

/// Check a loaded list field against its declared item counts.
pub fn check_items(
    path: &KeyPath,
    name: &str,
    len: usize,
    min: Option<usize>,
    max: Option<usize>,
) -> Result<(), DocumentError> {
    let detail = match (min, max) {
        (Some(min), _) if len < min => format!("{len} items, at least {min} required"),
        (_, Some(max)) if len > max => format!("{len} items, at most {max} allowed"),
        _ => return Ok(()),
    };
    Err(DocumentError::OutOfBounds {
        path: path.describe_child(name),
        detail,
    })
}

/// Log keys of `fields` that the schema does not name.
pub fn check_unknown(fields: &Mapping, known: &[&str], path: &KeyPath) {
    for key in fields.keys().filter(|key| !known.contains(key)) {
        tracing::debug!(path = %path.describe_child(key), "ignoring unknown key");
    }
}

#[cold]
fn shape_error(path: &KeyPath, expected: &'static str, found: &Node) -> DocumentError {
    DocumentError::UnexpectedShape {
        path: path.describe(),
        expected,
        found: found.kind_name(),
    }
}

#[cold]
fn conversion_error(path: &KeyPath, source: ConversionError) -> DocumentError {
    DocumentError::Conversion {
        path: path.describe(),
        source,
    }
}

macro_rules! impl_load_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Load for $ty {
            fn load(node: &Node, path: &mut KeyPath) -> Result<Self, DocumentError> {
                scalar(node, path)
            }
        }
    )*};
}

impl_load_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, bool, String);

macro_rules! impl_load_radix {
    ($($ty:ty),* $(,)?) => {$(
        impl LoadRadix for $ty {
            fn load_radix(
                node: &Node,
                path: &mut KeyPath,
                radix: u32,
            ) -> Result<Self, DocumentError> {
                radix_value(node, path, radix)
            }
        }

        impl LoadRadix for Option<$ty> {
            fn load_radix(
                node: &Node,
                path: &mut KeyPath,
                radix: u32,
            ) -> Result<Self, DocumentError> {
                if node.is_null() {
                    Ok(None)
                } else {
                    radix_value(node, path, radix).map(Some)
                }
            }
        }
    )*};
}

impl_load_radix!(i8, i16, i32, i64, u8, u16, u32, u64);

impl<T: Load> Load for Option<T> {
    fn load(node: &Node, path: &mut KeyPath) -> Result<Self, DocumentError> {
        if node.is_null() {
            Ok(None)
        } else {
            T::load(node, path).map(Some)
        }
    }
}

impl<T: Load> Load for Box<T> {
    fn load(node: &Node, path: &mut KeyPath) -> Result<Self, DocumentError> {
        T::load(node, path).map(Box::new)
    }
}

impl<T: Load> Load for Vec<T> {
    fn load(node: &Node, path: &mut KeyPath) -> Result<Self, DocumentError> {
        match node {
            Node::Null => Ok(Vec::new()),
            Node::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| path.scoped(index.to_string(), |path| T::load(item, path)))
                .collect(),
            other => Err(shape_error(path, "sequence", other)),
        }
    }
}

impl<K: MapKey, V: Load> Load for IndexMap<K, V> {
    fn load(node: &Node, path: &mut KeyPath) -> Result<Self, DocumentError> {
        let entries = expect_mapping(node, path)?;
        let mut map = IndexMap::with_capacity(entries.len());
        for (text, item) in entries.iter() {
            let (key, value) = path.scoped(text, |path| {
                let key = K::from_text(text).map_err(|source| conversion_error(path, source))?;
                let value = V::load(item, path)?;
                Ok::<_, DocumentError>((key, value))
            })?;
            // `01` and `1` are distinct text but the same integer key.
            if map.insert(key, value).is_some() {
                return Err(DocumentError::DuplicateKey {
                    path: path.describe(),
                    key: text.to_owned(),
                });
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests;
