use std::path::PathBuf;

use thiserror::Error;

use crate::ConversionError;

/// Failure loading a configuration document.
///
/// Every variant that concerns a value carries the dotted key path of that
/// value (`types.om.1.am`); the document root is spelled `<root>`.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("expected one YAML document, found several")]
    MultipleDocuments,

    #[error("missing required field `{path}`")]
    MissingField { path: String },

    #[error("`{path}`: expected {expected}, found {found}")]
    UnexpectedShape {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{path}`: duplicate key `{key}`")]
    DuplicateKey { path: String, key: String },

    #[error("`{path}`: {source}")]
    Conversion {
        path: String,
        #[source]
        source: ConversionError,
    },

    #[error("`{path}`: {detail}")]
    OutOfBounds { path: String, detail: String },
}

impl DocumentError {
    /// The key path the error refers to, if it concerns a value.
    pub fn path(&self) -> Option<&str> {
        match self {
            DocumentError::Io { .. } | DocumentError::Parse(_) | DocumentError::MultipleDocuments => {
                None
            }
            DocumentError::MissingField { path }
            | DocumentError::UnexpectedShape { path, .. }
            | DocumentError::DuplicateKey { path, .. }
            | DocumentError::Conversion { path, .. }
            | DocumentError::OutOfBounds { path, .. } => Some(path),
        }
    }
}
