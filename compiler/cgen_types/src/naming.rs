//! Schema names to Rust identifiers.
//!
//! Field names become `snake_case`, type and variant names `PascalCase`.
//! Words are split at separators (`-`, `_`, spaces), at lower-to-upper case
//! changes, and at the end of an acronym (`HTTPServer` is `http`, `server`).

/// Split a name into lowercase words.
fn words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

pub fn snake_case(name: &str) -> String {
    words(name).join("_")
}

pub fn pascal_case(name: &str) -> String {
    words(name)
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Rust keywords, strict and reserved.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const NOT_RAW: &[&str] = &["crate", "self", "Self", "super"];

pub fn is_keyword(ident: &str) -> bool {
    KEYWORDS.contains(&ident)
}

/// Make `ident` usable: keywords become raw identifiers (or get a trailing
/// `_` where raw identifiers are not allowed), a leading digit gets a `_`.
fn escape(ident: String) -> Option<String> {
    if ident.is_empty() {
        return None;
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return Some(format!("_{ident}"));
    }
    if NOT_RAW.contains(&ident.as_str()) {
        return Some(ident + "_");
    }
    if is_keyword(&ident) {
        return Some(format!("r#{ident}"));
    }
    Some(ident)
}

/// Field identifier for a schema field name. `None` if the name has no
/// letters or digits.
pub fn field_ident(name: &str) -> Option<String> {
    escape(snake_case(name))
}

/// Type or variant identifier for a schema name.
pub fn type_ident(name: &str) -> Option<String> {
    escape(pascal_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("am"), "am");
        assert_eq!(snake_case("maxConnections"), "max_connections");
        assert_eq!(snake_case("HTTPServer"), "http_server");
        assert_eq!(snake_case("log-level"), "log_level");
        assert_eq!(snake_case("Retry Count"), "retry_count");
        assert_eq!(snake_case("ipv4Addr"), "ipv4_addr");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("sub"), "Sub");
        assert_eq!(pascal_case("test"), "Test");
        assert_eq!(pascal_case("my_struct"), "MyStruct");
        assert_eq!(pascal_case("Mode"), "Mode");
        assert_eq!(pascal_case("HTTPServer"), "HttpServer");
        assert_eq!(pascal_case("low"), "Low");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(field_ident("type").as_deref(), Some("r#type"));
        assert_eq!(field_ident("self").as_deref(), Some("self_"));
        assert_eq!(field_ident("2fa").as_deref(), Some("_2fa"));
        assert_eq!(field_ident("--"), None);
        assert_eq!(type_ident("self").as_deref(), Some("Self_"));
        assert_eq!(type_ident("type").as_deref(), Some("Type"));
    }
}
