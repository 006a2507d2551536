//! Diagnostic system for schema compiler errors.
//!
//! Every generator-time failure is reported as a [`Diagnostic`]:
//! - Error codes for searchability (`cgen explain E2001`)
//! - Clear messages (what went wrong)
//! - A location in the schema document (where it went wrong)
//! - Notes (why it's wrong)
//! - Suggestions (how to fix)
//!
//! Schemas are YAML documents without source spans, so locations are dotted
//! key paths into the schema (`structs.server.fields.port`).

mod diagnostic;
mod error_code;
pub mod errors;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;
pub use errors::ErrorDocs;
