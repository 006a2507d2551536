use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_parse_scalars() {
    let node = parse_str("a: 1\nb: text\nc: true\nd: 1.5\ne:\nf: '0xE001'\n").unwrap();
    let map = node.as_mapping().unwrap();
    assert_eq!(map.get("a"), Some(&Node::Number("1".into())));
    assert_eq!(map.get("b"), Some(&Node::Scalar("text".into())));
    assert_eq!(map.get("c"), Some(&Node::Scalar("true".into())));
    assert_eq!(map.get("d"), Some(&Node::Number("1.5".into())));
    assert_eq!(map.get("e"), Some(&Node::Null));
    assert_eq!(map.get("f"), Some(&Node::Scalar("0xE001".into())));
    assert_eq!(map.get("missing"), None);
}

#[test]
fn test_parse_preserves_key_order() {
    let node = parse_str("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
    let keys: Vec<_> = node.as_mapping().unwrap().keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_parse_numeric_keys_become_text() {
    let node = parse_str("101: a\n102: b\n").unwrap();
    let map = node.as_mapping().unwrap();
    assert_eq!(map.get("101"), Some(&Node::Scalar("a".into())));
    assert_eq!(map.len(), 2);
}

#[test]
fn test_parse_sequence() {
    let node = parse_str("- 1\n- [2, 3]\n- {k: v}\n").unwrap();
    let items = node.as_sequence().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].kind_name(), "number");
    assert_eq!(items[1].kind_name(), "sequence");
    assert_eq!(items[2].kind_name(), "mapping");
}

#[test]
fn test_parse_empty_document() {
    assert_eq!(parse_str("").unwrap(), Node::Null);
}

#[test]
fn test_parse_rejects_colliding_keys() {
    // `1` and `"1"` are different YAML keys but the same text key.
    let err = parse_str("outer:\n  1: a\n  '1': b\n").unwrap_err();
    match err {
        DocumentError::DuplicateKey { path, key } => {
            assert_eq!(path, "outer");
            assert_eq!(key, "1");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parse_keeps_number_spelling() {
    let node = parse_str("a: 0xE001\nb: 1001\nc: 1e3\nd: [-.inf, 0o17]\n0x10: hex key\n").unwrap();
    let map = node.as_mapping().unwrap();
    assert_eq!(map.get("a"), Some(&Node::Number("0xE001".into())));
    assert_eq!(map.get("b"), Some(&Node::Number("1001".into())));
    assert_eq!(map.get("c"), Some(&Node::Number("1e3".into())));
    assert_eq!(
        map.get("d"),
        Some(&Node::Sequence(vec![
            Node::Number("-.inf".into()),
            Node::Number("0o17".into())
        ]))
    );
    // Prefixed keys are stored in decimal.
    assert_eq!(map.get("16").and_then(Node::as_text), Some("hex key"));
}

#[test]
fn test_parse_anchors_and_tags() {
    let node = parse_str("base: &n 0x20\ncopy: *n\ntagged: !custom text\n").unwrap();
    let map = node.as_mapping().unwrap();
    assert_eq!(map.get("copy"), Some(&Node::Number("0x20".into())));
    assert_eq!(map.get("tagged"), Some(&Node::Scalar("text".into())));
}

#[test]
fn test_parse_lenient_reports_repeated_keys() {
    let (node, repeated) = parse_str_lenient("top:\n  a: 1\n  b: 2\n  a: 3\n").unwrap();
    let top = node.as_mapping().unwrap().get("top").unwrap();
    assert_eq!(top.as_mapping().unwrap().get("a"), Some(&Node::Number("1".into())));
    assert_eq!(repeated.len(), 1);
    assert_eq!(repeated[0].path.to_string(), "top");
    assert_eq!(repeated[0].key, "a");

    let err = parse_str("top:\n  a: 1\n  a: 3\n").unwrap_err();
    assert!(matches!(err, DocumentError::DuplicateKey { ref path, ref key } if path == "top" && key == "a"));
}

#[test]
fn test_parse_multiple_documents() {
    assert!(matches!(
        parse_str("a: 1\n---\nb: 2\n"),
        Err(DocumentError::MultipleDocuments)
    ));
    assert_eq!(parse_str("# only a comment\n").unwrap(), Node::Null);
}

#[test]
fn test_parse_invalid_yaml() {
    assert!(matches!(
        parse_str("a: [1, 2"),
        Err(DocumentError::Parse(_))
    ));
}

#[test]
fn test_parse_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_file(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, DocumentError::Io { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn test_mapping_insert_keeps_first() {
    let mut map = Mapping::new();
    assert!(map.insert("k", Node::Scalar("first".into())));
    assert!(!map.insert("k", Node::Scalar("second".into())));
    assert_eq!(map.get("k").and_then(Node::as_text), Some("first"));
}
