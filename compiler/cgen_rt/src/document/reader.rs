//! YAML reading.
//!
//! The YAML reader decodes unquoted numbers while parsing, which loses the
//! spelling a radix field needs: `1001` and `0x3E9` both arrive as 1001.
//! Reading is therefore done twice over the same text. The first pass
//! records the shape of the document; the second asks for the source text
//! of each number, which the reader hands out verbatim for any scalar.
//!
//! Mapping entries are kept as a list so repeated keys survive to be
//! reported with their path.

use std::fmt;

use serde::de::{
    self, DeserializeSeed, Deserializer, EnumAccess, IgnoredAny, MapAccess, SeqAccess,
    VariantAccess, Visitor,
};
use serde::Deserialize;

use crate::DocumentError;

/// A document as the reader produced it.
#[derive(Debug)]
pub(super) enum Raw {
    Null,
    Bool(bool),
    /// Source spelling once both passes are done.
    Number(String),
    Str(String),
    Sequence(Vec<Raw>),
    Mapping(Vec<(Raw, Raw)>),
    /// A node with a local tag; the tag is dropped. Numbers inside keep
    /// their decoded text.
    Tagged(Box<Raw>),
}

impl Raw {
    fn has_numbers(&self) -> bool {
        match self {
            Raw::Number(_) => true,
            Raw::Sequence(items) => items.iter().any(Raw::has_numbers),
            Raw::Mapping(entries) => entries
                .iter()
                .any(|(key, value)| key.has_numbers() || value.has_numbers()),
            Raw::Null | Raw::Bool(_) | Raw::Str(_) | Raw::Tagged(_) => false,
        }
    }
}

/// Read the single document in `text`. `None` when there is none.
pub(super) fn read(text: &str) -> Result<Option<Raw>, DocumentError> {
    let mut documents = serde_yaml::Deserializer::from_str(text);
    let Some(document) = documents.next() else {
        return Ok(None);
    };
    let mut raw = Raw::deserialize(document)?;
    if documents.next().is_some() {
        return Err(DocumentError::MultipleDocuments);
    }

    if raw.has_numbers() {
        if let Some(document) = serde_yaml::Deserializer::from_str(text).next() {
            SourceText(&mut raw).deserialize(document)?;
        }
    }
    Ok(Some(raw))
}

impl<'de> Deserialize<'de> for Raw {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawVisitor)
    }
}

struct RawVisitor;

impl<'de> Visitor<'de> for RawVisitor {
    type Value = Raw;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Raw, E> {
        Ok(Raw::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Raw, E> {
        Ok(Raw::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Raw, D::Error> {
        Raw::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Raw, E> {
        Ok(Raw::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Raw, E> {
        Ok(Raw::Number(v.to_string()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Raw, E> {
        Ok(Raw::Number(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Raw, E> {
        Ok(Raw::Number(v.to_string()))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Raw, E> {
        Ok(Raw::Number(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Raw, E> {
        Ok(Raw::Number(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Raw, E> {
        Ok(Raw::Str(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Raw, E> {
        Ok(Raw::Str(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Raw, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Raw::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Raw, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry()? {
            entries.push(entry);
        }
        Ok(Raw::Mapping(entries))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Raw, A::Error> {
        let (_tag, value): (IgnoredAny, _) = data.variant()?;
        value
            .newtype_variant()
            .map(|inner| Raw::Tagged(Box::new(inner)))
    }
}

/// Second pass: replaces the decoded text of each number with its spelling.
struct SourceText<'r>(&'r mut Raw);

impl<'de> DeserializeSeed<'de> for SourceText<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        if !self.0.has_numbers() {
            return deserializer.deserialize_ignored_any(IgnoredAny).map(drop);
        }
        match self.0 {
            Raw::Number(text) => {
                *text = deserializer.deserialize_str(Spelling)?;
                Ok(())
            }
            Raw::Sequence(items) => deserializer.deserialize_seq(SequenceText(items)),
            Raw::Mapping(entries) => deserializer.deserialize_map(MappingText(entries)),
            Raw::Null | Raw::Bool(_) | Raw::Str(_) | Raw::Tagged(_) => Ok(()),
        }
    }
}

struct Spelling;

impl<'de> Visitor<'de> for Spelling {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_owned())
    }
}

struct SequenceText<'r>(&'r mut Vec<Raw>);

impl<'de> Visitor<'de> for SequenceText<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a sequence of {} items", self.0.len())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        for (index, item) in self.0.iter_mut().enumerate() {
            if seq.next_element_seed(SourceText(item))?.is_none() {
                return Err(de::Error::invalid_length(index, &"the items of the first pass"));
            }
        }
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(())
    }
}

struct MappingText<'r>(&'r mut Vec<(Raw, Raw)>);

impl<'de> Visitor<'de> for MappingText<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a mapping of {} entries", self.0.len())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        for (index, (key, value)) in self.0.iter_mut().enumerate() {
            if map.next_key_seed(SourceText(key))?.is_none() {
                return Err(de::Error::invalid_length(index, &"the entries of the first pass"));
            }
            map.next_value_seed(SourceText(value))?;
        }
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(())
    }
}
