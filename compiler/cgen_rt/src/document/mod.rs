//! Generic document tree.
//!
//! Configuration text is parsed once into a [`Node`] tree of scalars,
//! sequences, and mappings with string leaves. Typed loading works on this
//! tree only, so the YAML reader is confined to this module.

mod reader;

use std::path::Path;

use crate::convert::number_text;
use crate::{DocumentError, KeyPath};

use self::reader::Raw;

/// A node of a parsed configuration document.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// An explicit `null`, `~`, or an empty value.
    Null,
    /// A scalar the reader kept as text (strings and booleans).
    Scalar(String),
    /// An unquoted scalar YAML reads as a number, spelled as in the
    /// document (`0xE001`, `1001`, `1e3`, `.inf`).
    ///
    /// Kept apart from [`Node::Scalar`] because YAML gives the spelling a
    /// meaning of its own; [`FromText::from_number`](crate::FromText::from_number)
    /// reads it.
    Number(String),
    Sequence(Vec<Node>),
    Mapping(Mapping),
}

impl Node {
    /// Human-readable kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Scalar(_) => "scalar",
            Node::Number(_) => "number",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }

    /// The text of a scalar or number.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Scalar(text) | Node::Number(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }
}

/// An insertion-ordered mapping with string keys.
///
/// Keys are unique. Non-string keys in the source document are converted to
/// their text form while parsing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
}

impl Mapping {
    pub const fn new() -> Self {
        Mapping {
            entries: Vec::new(),
        }
    }

    /// Look up a key. Linear scan; mappings in configuration files are small.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Append an entry. Returns `false` (and keeps the first entry) if the
    /// key is already present.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, node));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, node)| (k.as_str(), node))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A mapping key that appears more than once in a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepeatedKey {
    /// Path of the mapping holding the key.
    pub path: KeyPath,
    pub key: String,
}

/// Parse YAML text into a document tree.
///
/// An empty document parses as [`Node::Null`]. A repeated mapping key is a
/// [`DocumentError::DuplicateKey`].
pub fn parse_str(text: &str) -> Result<Node, DocumentError> {
    let (node, repeated) = parse_str_lenient(text)?;
    match repeated.into_iter().next() {
        Some(RepeatedKey { path, key }) => Err(DocumentError::DuplicateKey {
            path: path.describe(),
            key,
        }),
        None => Ok(node),
    }
}

/// Parse YAML text, keeping the first entry of each repeated mapping key.
///
/// The repeated keys are returned in document order, for callers that
/// report them in their own terms.
pub fn parse_str_lenient(text: &str) -> Result<(Node, Vec<RepeatedKey>), DocumentError> {
    let mut repeated = Vec::new();
    let node = match reader::read(text)? {
        Some(raw) => convert(raw, &mut KeyPath::new(), &mut repeated)?,
        None => Node::Null,
    };
    Ok((node, repeated))
}

/// Read and parse a YAML file.
pub fn parse_file(path: &Path) -> Result<Node, DocumentError> {
    let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::trace!(path = %path.display(), bytes = text.len(), "parsing document");
    parse_str(&text)
}

fn convert(
    raw: Raw,
    trail: &mut KeyPath,
    repeated: &mut Vec<RepeatedKey>,
) -> Result<Node, DocumentError> {
    Ok(match raw {
        Raw::Null => Node::Null,
        Raw::Bool(b) => Node::Scalar(b.to_string()),
        Raw::Number(text) => Node::Number(text),
        Raw::Str(s) => Node::Scalar(s),
        Raw::Sequence(items) => {
            let mut nodes = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                trail.push_index(index);
                nodes.push(convert(item, trail, repeated)?);
                trail.pop();
            }
            Node::Sequence(nodes)
        }
        Raw::Mapping(entries) => {
            let mut mapping = Mapping::new();
            for (key, item) in entries {
                let key = key_text(key, trail)?;
                trail.push(key.clone());
                let node = convert(item, trail, repeated)?;
                trail.pop();
                if !mapping.insert(key.clone(), node) {
                    repeated.push(RepeatedKey {
                        path: trail.clone(),
                        key,
                    });
                }
            }
            Node::Mapping(mapping)
        }
        // Tags carry no meaning for configuration values.
        Raw::Tagged(inner) => convert(*inner, trail, repeated)?,
    })
}

/// Text of a mapping key. Numeric keys with a radix prefix become decimal,
/// so `0x10` and `16` name the same entry.
fn key_text(key: Raw, trail: &KeyPath) -> Result<String, DocumentError> {
    match key {
        Raw::Str(s) => Ok(s),
        Raw::Bool(b) => Ok(b.to_string()),
        Raw::Number(text) => Ok(number_text(&text, 10).0.into_owned()),
        Raw::Tagged(inner) => key_text(*inner, trail),
        other => Err(DocumentError::UnexpectedShape {
            path: trail.describe(),
            expected: "scalar mapping key",
            found: match other {
                Raw::Null => "null",
                Raw::Sequence(_) => "sequence",
                _ => "mapping",
            },
        }),
    }
}

#[cfg(test)]
mod tests;
