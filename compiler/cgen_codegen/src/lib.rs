//! Rust code generation for the cgen schema compiler.
//!
//! # Architecture
//!
//! ```text
//! ResolvedSchema (cgen_types)
//!        ↓
//!   check_names       (generated names must not collide)
//!        ↓
//!   rust::emit_module (types, loader, serializer, traversal)
//!        ↓
//!   CodegenResult     (Rust source + any errors)
//! ```
//!
//! The emitted module depends only on the runtime crate named by
//! [`CodegenOptions::runtime_crate`].

mod context;
pub mod docs;
pub mod rust;

use cgen_diagnostic::{Diagnostic, ErrorCode};
use cgen_types::ResolvedSchema;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

pub use context::CodegenContext;

/// Options for code generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Overrides the root struct name chosen by the schema.
    pub root_type: Option<String>,
    /// Path of the runtime crate in generated code.
    pub runtime_crate: String,
    /// Write the `@generated` header comment.
    pub header: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        CodegenOptions {
            root_type: None,
            runtime_crate: "cgen_rt".to_owned(),
            header: true,
        }
    }
}

/// Result of code generation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CodegenResult {
    /// Generated Rust code (empty if errors occurred).
    pub code: String,
    /// Errors encountered during codegen.
    pub errors: Vec<CodegenError>,
    /// Whether codegen succeeded.
    pub success: bool,
}

impl CodegenResult {
    /// Create a successful result with generated code.
    pub fn success(code: String) -> Self {
        Self {
            code,
            errors: Vec::new(),
            success: true,
        }
    }

    /// Create an error result.
    pub fn failure(errors: Vec<CodegenError>) -> Self {
        Self {
            code: String::new(),
            errors,
            success: false,
        }
    }

    /// Check if codegen failed.
    pub fn has_errors(&self) -> bool {
        !self.success || !self.errors.is_empty()
    }
}

/// A code generation error.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum CodegenError {
    #[error("{location}: generated name `{name}` collides with {with}")]
    NameCollision {
        name: String,
        location: String,
        with: String,
    },
}

impl CodegenError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CodegenError::NameCollision { .. } => ErrorCode::E5001,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CodegenError::NameCollision {
                name,
                location,
                with,
            } => Diagnostic::error(self.code())
                .with_message(format!("generated name `{name}` collides with {with}"))
                .with_label(location.clone(), "declared here")
                .with_suggestion("rename the type in the schema"),
        }
    }
}

/// Names the generated module uses for its own items or imports.
const RESERVED: &[&str] = &[
    "Box", "Default", "Err", "IndexMap", "None", "Ok", "Option", "Result", "Some", "String", "Vec",
];

/// Check generated type names against the module's own names.
pub fn check_names(schema: &ResolvedSchema) -> Vec<CodegenError> {
    let leaf_enum = format!("{}Leaf", schema.root_struct().ident);
    let mut errors = Vec::new();

    let types = schema
        .structs
        .iter()
        .map(|s| (&s.ident, &s.name, "structs"))
        .chain(schema.enums.iter().map(|e| (&e.ident, &e.name, "enums")));
    for (ident, name, section) in types {
        let with = if RESERVED.contains(&ident.as_str()) {
            format!("the standard name `{ident}` used by generated code")
        } else if *ident == leaf_enum {
            format!("the traversal leaf enum `{leaf_enum}`")
        } else {
            continue;
        };
        errors.push(CodegenError::NameCollision {
            name: ident.clone(),
            location: format!("{section}.{name}"),
            with,
        });
    }

    // Leaf variants are named after their type, so an enum called `I32` or
    // `ListOfStr` would share a variant with the builtin type of that name.
    let mut leaves: FxHashMap<String, String> = FxHashMap::default();
    let mut reported = FxHashSet::default();
    for (leaf, field) in rust::traverse::leaf_uses(schema) {
        let Some(first) = leaves.get(&leaf.variant) else {
            leaves.insert(leaf.variant, leaf.rust_type);
            continue;
        };
        if *first == leaf.rust_type || !reported.insert(leaf.variant.clone()) {
            continue;
        }
        let location = schema
            .enums
            .iter()
            .find(|e| e.ident == leaf.variant)
            .map_or_else(|| field.location.clone(), |e| format!("enums.{}", e.name));
        errors.push(CodegenError::NameCollision {
            with: format!(
                "the traversal leaf variant `{leaf_enum}::{}` for `{first}`",
                leaf.variant
            ),
            name: leaf.variant,
            location,
        });
    }
    errors
}

/// Generate the Rust module for a resolved schema.
pub fn generate(schema: &ResolvedSchema, options: &CodegenOptions) -> CodegenResult {
    let errors = check_names(schema);
    if !errors.is_empty() {
        return CodegenResult::failure(errors);
    }

    let mut ctx = CodegenContext::new(schema, options);
    rust::emit_module(&mut ctx);
    let code = ctx.take_output();
    tracing::debug!(bytes = code.len(), "generated module");
    CodegenResult::success(code)
}

#[cfg(test)]
mod tests;
