//! Type resolution for the cgen schema compiler.
//!
//! Sits between the schema IR and code generation:
//!
//! ```text
//! Schema (cgen_ir)
//!      ↓
//!   resolve()      identifiers, types, defaults, bounds
//!      ↓
//! ResolvedSchema   → cgen_codegen
//! ```
//!
//! Default literals and bounds are converted with `cgen_rt`, the same
//! conversions generated loaders run, and rejected with
//! [`SchemaError::TypeMismatch`](cgen_ir::SchemaError::TypeMismatch) if they
//! fail.

pub mod naming;
mod resolve;
mod ty;
mod value;

pub use resolve::{
    resolve, ResolvedEnum, ResolvedField, ResolvedSchema, ResolvedStruct, ResolvedVariant,
};
pub use ty::{Shape, Ty};
pub use value::DefaultValue;
