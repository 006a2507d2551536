//! Schema errors.
//!
//! Every failure of the builder or the type resolver is a [`SchemaError`].
//! Errors are fatal: generation stops at the first one. Each variant names
//! the offending definition and its location in the schema document, and
//! converts to a [`Diagnostic`] for display.

use cgen_diagnostic::{Diagnostic, ErrorCode};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{location}: {message}")]
    Malformed { location: String, message: String },

    #[error("{location}: unknown type `{name}`")]
    UnknownType {
        name: String,
        location: String,
        /// Closest known name, if any is close.
        suggestion: Option<String>,
    },

    #[error("{location}: type `{name}` is defined more than once")]
    DuplicateType {
        name: String,
        location: String,
        first: String,
    },

    #[error("{location}: struct `{struct_name}` has duplicate field `{field}`")]
    DuplicateField {
        struct_name: String,
        field: String,
        location: String,
    },

    #[error("{location}: enum `{enum_name}` has duplicate variant `{variant}`")]
    DuplicateVariant {
        enum_name: String,
        variant: String,
        location: String,
    },

    #[error("{location}: variants `{first}` and `{second}` of enum `{enum_name}` both have value {value}")]
    DuplicateDiscriminant {
        enum_name: String,
        first: String,
        second: String,
        value: i64,
        location: String,
    },

    #[error("cyclic struct reference: {}", cycle.join(" -> "))]
    CyclicReference {
        /// The struct names on the cycle; the first name is repeated at the end.
        cycle: Vec<String>,
    },

    #[error("{location}: `{literal}` is not a valid {expected}: {reason}")]
    TypeMismatch {
        location: String,
        expected: String,
        literal: String,
        reason: String,
    },

    #[error("{location}: `{key}` cannot be used as a map key")]
    InvalidMapKey { location: String, key: String },

    #[error("{location}: {detail}")]
    UnsupportedFormat { location: String, detail: String },
}

impl SchemaError {
    #[cold]
    pub fn malformed(location: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaError::Malformed {
            location: location.into(),
            message: message.into(),
        }
    }

    /// The error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SchemaError::Malformed { .. } => ErrorCode::E1001,
            SchemaError::DuplicateType { .. } => ErrorCode::E1002,
            SchemaError::DuplicateField { .. } => ErrorCode::E1003,
            SchemaError::DuplicateVariant { .. } => ErrorCode::E1004,
            SchemaError::DuplicateDiscriminant { .. } => ErrorCode::E1005,
            SchemaError::UnknownType { .. } => ErrorCode::E2001,
            SchemaError::CyclicReference { .. } => ErrorCode::E2002,
            SchemaError::TypeMismatch { .. } => ErrorCode::E2003,
            SchemaError::InvalidMapKey { .. } => ErrorCode::E2004,
            SchemaError::UnsupportedFormat { .. } => ErrorCode::E2005,
        }
    }

    /// Convert to a diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code());
        match self {
            SchemaError::Malformed { location, message } => diag
                .with_message(message.clone())
                .with_label(location.clone(), ""),

            SchemaError::UnknownType {
                name,
                location,
                suggestion,
            } => {
                let diag = diag
                    .with_message(format!("unknown type `{name}`"))
                    .with_label(location.clone(), "referenced here")
                    .with_note("types are primitives, or structs and enums declared in the schema");
                match suggestion {
                    Some(s) => diag.with_suggestion(format!("did you mean `{s}`?")),
                    None => diag,
                }
            }

            SchemaError::DuplicateType {
                name,
                location,
                first,
            } => diag
                .with_message(format!("type `{name}` is defined more than once"))
                .with_label(location.clone(), "redefined here")
                .with_secondary_label(first.clone(), "first defined here")
                .with_note("structs and enums share one namespace, compared after case conversion"),

            SchemaError::DuplicateField {
                struct_name,
                field,
                location,
            } => diag
                .with_message(format!("duplicate field `{field}` in struct `{struct_name}`"))
                .with_label(location.clone(), "redefined here")
                .with_suggestion("remove or rename one of the fields"),

            SchemaError::DuplicateVariant {
                enum_name,
                variant,
                location,
            } => diag
                .with_message(format!("duplicate variant `{variant}` in enum `{enum_name}`"))
                .with_label(location.clone(), "redefined here"),

            SchemaError::DuplicateDiscriminant {
                enum_name,
                first,
                second,
                value,
                location,
            } => diag
                .with_message(format!("duplicate value {value} in enum `{enum_name}`"))
                .with_label(location.clone(), format!("`{first}` and `{second}`"))
                .with_note("documents may name a variant by its value, so values must be unique"),

            SchemaError::CyclicReference { cycle } => {
                let diag = diag
                    .with_message("cyclic struct reference")
                    .with_note(format!("cycle: {}", cycle.join(" -> ")))
                    .with_suggestion("make one of the references `optional`, a `list`, or a `map`");
                match cycle.first() {
                    Some(first) => diag.with_label(format!("structs.{first}"), "contains itself"),
                    None => diag,
                }
            }

            SchemaError::TypeMismatch {
                location,
                expected,
                literal,
                reason,
            } => diag
                .with_message(format!("`{literal}` is not a valid {expected}"))
                .with_label(location.clone(), reason.clone()),

            SchemaError::InvalidMapKey { location, key } => diag
                .with_message(format!("`{key}` cannot be used as a map key"))
                .with_label(location.clone(), "")
                .with_note("map keys must be integers, booleans, chars, strings, or enums"),

            SchemaError::UnsupportedFormat { location, detail } => diag
                .with_message(detail.clone())
                .with_label(location.clone(), ""),
        }
    }
}
