//! Primitive type alias table.
//!
//! Maps the primitive type names a schema may use to scalar kinds. The
//! standard table accepts C/C++ spellings (`unsigned short`, `long long`),
//! fixed-width spellings (`int16`, `uint64`), and Rust spellings (`i16`, `u64`).

use rustc_hash::FxHashMap;

use crate::ScalarKind;

/// What a primitive name stands for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Primitive {
    Scalar(ScalarKind),
    Str,
}

/// Table of primitive names.
///
/// Lookups ignore case and collapse runs of whitespace, so `Unsigned  Int`
/// finds `unsigned int`.
#[derive(Clone, Debug, Default)]
pub struct PrimitiveTable {
    names: FxHashMap<String, Primitive>,
}

impl PrimitiveTable {
    /// An empty table.
    pub fn new() -> Self {
        PrimitiveTable::default()
    }

    /// The table of all built-in primitive names.
    pub fn standard() -> Self {
        use ScalarKind::{Bool, Char, LongDouble, F32, F64, I16, I32, I64, I8, U16, U32, U64, U8};

        let mut table = PrimitiveTable::new();
        let scalars: &[(&[&str], ScalarKind)] = &[
            (&["char"], Char),
            (&["signed char", "int8", "int8_t", "i8"], I8),
            (&["unsigned char", "uint8", "uint8_t", "u8", "byte"], U8),
            (&["short", "short int", "int16", "int16_t", "i16"], I16),
            (
                &["unsigned short", "unsigned short int", "uint16", "uint16_t", "u16"],
                U16,
            ),
            (
                &["int", "integer", "number", "signed", "int32", "int32_t", "i32"],
                I32,
            ),
            (
                &["unsigned", "unsigned int", "uint", "uint32", "uint32_t", "u32"],
                U32,
            ),
            (
                &["long", "long int", "long long", "int64", "int64_t", "i64"],
                I64,
            ),
            (
                &["unsigned long", "unsigned long long", "uint64", "uint64_t", "u64"],
                U64,
            ),
            (&["float", "f32"], F32),
            (&["double", "f64"], F64),
            (&["long double"], LongDouble),
            (&["bool", "boolean"], Bool),
        ];
        for (names, kind) in scalars {
            for name in *names {
                table.register(name, Primitive::Scalar(*kind));
            }
        }
        for name in ["string", "str", "std::string"] {
            table.register(name, Primitive::Str);
        }
        table
    }

    /// Register (or replace) a primitive name.
    pub fn register(&mut self, name: &str, primitive: Primitive) {
        self.names.insert(normalize(name), primitive);
    }

    pub fn lookup(&self, name: &str) -> Option<Primitive> {
        self.names.get(&normalize(name)).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.names.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
