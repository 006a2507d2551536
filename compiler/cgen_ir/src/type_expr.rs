//! Type expressions in field declarations.
//!
//! A field's `type` is a name or a generic form:
//!
//! ```text
//! u16
//! unsigned long
//! list<string>
//! map<u32, sub>
//! optional<list<Mode>>
//! ```
//!
//! `array`/`vec` are accepted for `list`, `dict`/`dictionary` for `map`, and
//! `option` for `optional`.

use std::fmt;

/// A parsed type expression. Names are not yet looked up.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeExpr {
    Named(String),
    List(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
    Optional(Box<TypeExpr>),
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(name) => f.write_str(name),
            TypeExpr::List(inner) => write!(f, "list<{inner}>"),
            TypeExpr::Map(key, value) => write!(f, "map<{key}, {value}>"),
            TypeExpr::Optional(inner) => write!(f, "optional<{inner}>"),
        }
    }
}

/// Parse a type expression. The error is a human-readable reason.
pub fn parse_type_expr(text: &str) -> Result<TypeExpr, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("empty type".to_owned());
    }

    let Some(open) = text.find('<') else {
        if text.contains(['>', ',']) {
            return Err(format!("unbalanced type expression `{text}`"));
        }
        let name = text.split_whitespace().collect::<Vec<_>>().join(" ");
        return Ok(TypeExpr::Named(name));
    };
    if !text.ends_with('>') {
        return Err(format!("unbalanced type expression `{text}`"));
    }

    let head = text[..open].trim().to_ascii_lowercase();
    let args = split_args(&text[open + 1..text.len() - 1])
        .ok_or_else(|| format!("unbalanced type expression `{text}`"))?;

    let arity = |n: usize| {
        if args.len() == n {
            Ok(())
        } else {
            Err(format!(
                "`{head}` takes {n} type argument{}, found {}",
                if n == 1 { "" } else { "s" },
                args.len()
            ))
        }
    };

    match head.as_str() {
        "list" | "array" | "vec" => {
            arity(1)?;
            Ok(TypeExpr::List(Box::new(parse_type_expr(args[0])?)))
        }
        "map" | "dict" | "dictionary" => {
            arity(2)?;
            Ok(TypeExpr::Map(
                Box::new(parse_type_expr(args[0])?),
                Box::new(parse_type_expr(args[1])?),
            ))
        }
        "optional" | "option" => {
            arity(1)?;
            Ok(TypeExpr::Optional(Box::new(parse_type_expr(args[0])?)))
        }
        _ => Err(format!("unknown generic type `{head}`")),
    }
}

/// Split on top-level commas. `None` if brackets are unbalanced.
fn split_args(text: &str) -> Option<Vec<&str>> {
    let mut args = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                args.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    args.push(&text[start..]);
    Some(args)
}
