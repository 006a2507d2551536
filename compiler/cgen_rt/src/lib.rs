//! Runtime support for configuration code generated by `cgen`.
//!
//! Generated modules depend on this crate and nothing else. It provides:
//!
//! - [`convert`]: typed string-to-value conversion (`from_string`, `stob`,
//!   `stohex`) with a closed set of supported target types
//! - [`Node`]: the generic document tree a YAML file is parsed into
//! - [`Load`]: conversion of a document tree into typed values, with
//!   [`KeyPath`]-annotated [`DocumentError`]s
//! - [`Render`]: the human-readable serializer, which writes YAML that loads
//!   back into an equal value
//!
//! # Entry Points
//!
//! [`load_file`] and [`load_str`] return `None` on any failure and log the
//! reason through `tracing`. [`try_load_file`] and [`try_load_str`] return the
//! error for callers that want to report it.

pub mod convert;
mod document;
mod error;
pub mod load;
mod path;
pub mod render;

use std::path::Path;

pub use convert::{
    from_string, from_string_radix, number_text, stob, stohex, ConversionError, FromText,
    FromTextRadix,
};
pub use document::{parse_file, parse_str, parse_str_lenient, Mapping, Node, RepeatedKey};
pub use error::DocumentError;
pub use indexmap::IndexMap;
pub use load::{Load, LoadRadix, MapKey};
pub use path::KeyPath;
pub use render::{Render, RenderWriter};

/// Parse and load a configuration file, reporting the failure reason.
pub fn try_load_file<T: Load>(path: impl AsRef<Path>) -> Result<T, DocumentError> {
    let node = parse_file(path.as_ref())?;
    T::load(&node, &mut KeyPath::new())
}

/// Parse and load configuration text, reporting the failure reason.
pub fn try_load_str<T: Load>(text: &str) -> Result<T, DocumentError> {
    let node = parse_str(text)?;
    T::load(&node, &mut KeyPath::new())
}

/// Parse and load a configuration file.
///
/// Returns `None` on any read, parse, conversion, or missing-field failure.
/// The reason is logged at `debug` level.
pub fn load_file<T: Load>(path: impl AsRef<Path>) -> Option<T> {
    let path = path.as_ref();
    match try_load_file(path) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "configuration load failed");
            None
        }
    }
}

/// Parse and load configuration text. See [`load_file`].
pub fn load_str<T: Load>(text: &str) -> Option<T> {
    match try_load_str(text) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(error = %err, "configuration load failed");
            None
        }
    }
}
