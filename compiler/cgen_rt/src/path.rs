//! Key paths into a configuration document.

use std::fmt;

/// Ordered list of segments locating a value in a configuration tree.
///
/// Struct fields contribute their schema name, list elements their decimal
/// index, and map entries their key text. Displays dotted:
/// `types.om.1.am`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    pub fn new() -> Self {
        KeyPath::default()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(index.to_string());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// Run `f` with `segment` appended, removing it again afterwards even
    /// when `f` fails.
    pub fn scoped<T>(
        &mut self,
        segment: impl Into<String>,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.push(segment);
        let result = f(self);
        self.pop();
        result
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Dotted form for messages; the empty path is `<root>`.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            "<root>".to_owned()
        } else {
            self.to_string()
        }
    }

    /// Dotted form of this path with `name` appended.
    pub fn describe_child(&self, name: &str) -> String {
        if self.is_empty() {
            name.to_owned()
        } else {
            format!("{self}.{name}")
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_display() {
        let mut path = KeyPath::new();
        assert_eq!(path.to_string(), "");
        assert_eq!(path.describe(), "<root>");

        path.push("types");
        path.push("om");
        path.push_index(1);
        path.push("am");
        assert_eq!(path.to_string(), "types.om.1.am");
        assert_eq!(path.last(), Some("am"));
        assert_eq!(path.len(), 4);

        assert_eq!(path.pop().as_deref(), Some("am"));
        assert_eq!(path.describe_child("bm"), "types.om.1.bm");
    }

    #[test]
    fn test_scoped_restores_on_error() {
        let mut path = KeyPath::new();
        path.push("a");
        let result: Result<(), String> = path.scoped("b", |p| Err(p.to_string()));
        assert_eq!(result, Err("a.b".to_string()));
        assert_eq!(path.segments(), ["a".to_string()]);
    }
}
