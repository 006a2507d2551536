//! Error codes for all schema compiler diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first digit
//! indicating the compiler phase. Used for `cgen explain` lookups and documentation.

use std::fmt;
use std::str::FromStr;

/// Error codes for all schema compiler diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Schema structure errors
/// - E2xxx: Type resolution errors
/// - E5xxx: Code generation errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Schema Structure Errors (E1xxx)
    /// Malformed schema document
    E1001,
    /// Duplicate type name
    E1002,
    /// Duplicate field in a struct
    E1003,
    /// Duplicate variant in an enum
    E1004,
    /// Duplicate underlying value in an enum
    E1005,

    // Type Resolution Errors (E2xxx)
    /// Unknown type name
    E2001,
    /// Cyclic struct reference
    E2002,
    /// Default literal does not convert to the declared type
    E2003,
    /// Map key type is not a hashable scalar
    E2004,
    /// Format or bound not applicable to the field type
    E2005,

    // Code Generation Errors (E5xxx)
    /// Generated name collides with a schema type
    E5001,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    ///
    /// When adding a new variant: add it to the enum, `as_str()`, and here.
    /// The `test_all_variants_classified` test catches any omission.
    pub const ALL: &[ErrorCode] = &[
        // Schema
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        // Type
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        // Codegen
        ErrorCode::E5001,
        // Internal
        ErrorCode::E9001,
    ];

    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E5001 => "E5001",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Short one-line description, used in `cgen explain` listings.
    pub fn title(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "malformed schema",
            ErrorCode::E1002 => "duplicate type name",
            ErrorCode::E1003 => "duplicate field",
            ErrorCode::E1004 => "duplicate enum variant",
            ErrorCode::E1005 => "duplicate enum value",
            ErrorCode::E2001 => "unknown type",
            ErrorCode::E2002 => "cyclic struct reference",
            ErrorCode::E2003 => "default does not match type",
            ErrorCode::E2004 => "invalid map key type",
            ErrorCode::E2005 => "unsupported format",
            ErrorCode::E5001 => "generated name collision",
            ErrorCode::E9001 => "internal compiler error",
        }
    }

    /// Check if this is a schema structure error (E1xxx).
    pub fn is_schema_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is a type resolution error (E2xxx).
    pub fn is_type_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Check if this is a code generation error (E5xxx).
    pub fn is_codegen_error(&self) -> bool {
        self.as_str().starts_with("E5")
    }

    /// Check if this is an internal compiler error (E9xxx).
    pub fn is_internal_error(&self) -> bool {
        self.as_str().starts_with("E9")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = ();

    /// Parse an error code, case-insensitively (`e2001` and `E2001` both work).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == upper)
            .ok_or(())
    }
}
