use super::*;
use crate::parse_str;
use pretty_assertions::assert_eq;

fn doc(text: &str) -> Node {
    parse_str(text).unwrap()
}

fn load<T: Load>(text: &str) -> Result<T, DocumentError> {
    T::load(&doc(text), &mut KeyPath::new())
}

#[test]
fn test_load_scalars() {
    assert_eq!(load::<i32>("-3").unwrap(), -3);
    assert_eq!(load::<u8>("1").unwrap(), 1);
    assert_eq!(load::<f32>("1.3").unwrap(), 1.3);
    assert!(load::<bool>("TRUE").unwrap());
    assert!(!load::<bool>("'false'").unwrap());
    assert_eq!(load::<String>("asdf").unwrap(), "asdf");
    // The reader decoded these as numbers; strings accept their text.
    assert_eq!(load::<String>("12").unwrap(), "12");
}

#[test]
fn test_load_scalar_errors() {
    assert!(matches!(
        load::<bool>("1"),
        Err(DocumentError::Conversion {
            source: ConversionError::InvalidArgument { .. },
            ..
        })
    ));
    assert!(matches!(
        load::<u8>("300"),
        Err(DocumentError::Conversion {
            source: ConversionError::OutOfRange { .. },
            ..
        })
    ));
    assert!(matches!(
        load::<i32>("[1]"),
        Err(DocumentError::UnexpectedShape { expected: "scalar", found: "sequence", .. })
    ));
    assert!(matches!(
        load::<String>("~"),
        Err(DocumentError::UnexpectedShape { found: "null", .. })
    ));
}

#[test]
fn test_load_vec() {
    assert_eq!(load::<Vec<i32>>("[0, 1, 2, 3]").unwrap(), vec![0, 1, 2, 3]);
    assert_eq!(
        load::<Vec<String>>("[a, b, c, d]").unwrap(),
        vec!["a", "b", "c", "d"]
    );
    assert_eq!(load::<Vec<i32>>("~").unwrap(), Vec::<i32>::new());
    assert!(load::<Vec<i32>>("{a: 1}").is_err());
}

#[test]
fn test_load_vec_error_path() {
    let err = load::<Vec<u8>>("[1, 2, x]").unwrap_err();
    assert_eq!(err.path(), Some("2"));
}

#[test]
fn test_load_map_preserves_order() {
    let map = load::<IndexMap<String, String>>("{foo: bar, bar: foo}").unwrap();
    let entries: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(entries, vec![("foo", "bar"), ("bar", "foo")]);
}

#[test]
fn test_load_map_integer_keys() {
    let map = load::<IndexMap<u32, i32>>("{101: 1, 102: 2}").unwrap();
    assert_eq!(map.get(&101), Some(&1));
    assert_eq!(map.get(&102), Some(&2));
}

#[test]
fn test_load_map_bad_key() {
    let err = load::<IndexMap<u8, i32>>("{x: 1}").unwrap_err();
    assert!(matches!(err, DocumentError::Conversion { .. }));
    assert_eq!(err.path(), Some("x"));
}

#[test]
fn test_load_map_duplicate_after_conversion() {
    let err = load::<IndexMap<u32, i32>>("{'1': 1, '01': 2}").unwrap_err();
    match err {
        DocumentError::DuplicateKey { key, .. } => assert_eq!(key, "01"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_option() {
    assert_eq!(load::<Option<i32>>("~").unwrap(), None);
    assert_eq!(load::<Option<i32>>("5").unwrap(), Some(5));
}

#[test]
fn test_radix_value() {
    let mut path = KeyPath::new();
    let quoted = doc("'0xe001'");
    assert_eq!(u32::load_radix(&quoted, &mut path, 16).unwrap(), 57345);
    let bare = doc("E001");
    assert_eq!(u32::load_radix(&bare, &mut path, 16).unwrap(), 57345);
    let prefixed = doc("0xE001");
    assert_eq!(u32::load_radix(&prefixed, &mut path, 16).unwrap(), 57345);
    assert_eq!(
        Option::<u16>::load_radix(&Node::Null, &mut path, 16).unwrap(),
        None
    );
}

#[test]
fn test_radix_value_unquoted_digits() {
    let mut path = KeyPath::new();
    // Quoted or not, digits in a hex field are hex digits.
    for text in ["1001", "'1001'"] {
        assert_eq!(u32::load_radix(&doc(text), &mut path, 16).unwrap(), 0x1001);
    }
    assert_eq!(
        u64::load_radix(&doc("1e3"), &mut path, 16).unwrap(),
        crate::stohex("1e3").unwrap()
    );
    // A prefix of another radix keeps its own meaning.
    assert_eq!(u32::load_radix(&doc("0o17"), &mut path, 16).unwrap(), 15);
    assert_eq!(u8::load_radix(&doc("101"), &mut path, 2).unwrap(), 5);
}

#[test]
fn test_load_yaml_number_spellings() {
    assert_eq!(load::<u16>("0xE001").unwrap(), 57345);
    assert_eq!(load::<i32>("0o17").unwrap(), 15);
    assert_eq!(load::<f64>("1e3").unwrap(), 1000.0);
    assert_eq!(load::<f32>("-.inf").unwrap(), f32::NEG_INFINITY);
    assert_eq!(load::<String>("0x10").unwrap(), "0x10");
}

#[test]
fn test_field_keeps_default_when_absent() {
    let node = doc("present: 7");
    let fields = expect_mapping(&node, &KeyPath::new()).unwrap();
    let mut path = KeyPath::new();

    let mut present = 1_i32;
    let mut absent = 4_i32;
    field(fields, "present", &mut path, &mut present).unwrap();
    field(fields, "absent", &mut path, &mut absent).unwrap();
    assert_eq!(present, 7);
    assert_eq!(absent, 4);
    assert!(path.is_empty());
}

#[test]
fn test_required_missing() {
    let node = doc("other: 1");
    let fields = expect_mapping(&node, &KeyPath::new()).unwrap();
    let mut path = KeyPath::new();
    path.push("types");

    let err = required::<i32>(fields, "am", &mut path).unwrap_err();
    assert!(matches!(err, DocumentError::MissingField { .. }));
    assert_eq!(err.to_string(), "missing required field `types.am`");
    assert_eq!(path.to_string(), "types");
}

#[test]
fn test_required_error_carries_path() {
    let node = doc("am: nope");
    let fields = expect_mapping(&node, &KeyPath::new()).unwrap();
    let mut path = KeyPath::new();
    path.push("types");

    let err = required::<i32>(fields, "am", &mut path).unwrap_err();
    assert_eq!(err.path(), Some("types.am"));
    assert_eq!(path.len(), 1);
}

#[test]
fn test_expect_mapping_null_is_empty() {
    let mapping = expect_mapping(&Node::Null, &KeyPath::new()).unwrap();
    assert!(mapping.is_empty());
    assert!(expect_mapping(&Node::Scalar("x".into()), &KeyPath::new()).is_err());
}

#[test]
fn test_check_range() {
    let path = KeyPath::new();
    assert!(check_range(&path, "port", &80_u16, Some(1), Some(1024)).is_ok());
    assert!(check_range(&path, "port", &80_u16, None, None).is_ok());

    let err = check_range(&path, "port", &0_u16, Some(1), None).unwrap_err();
    assert_eq!(err.to_string(), "`port`: 0 is below the minimum 1");
    let err = check_range(&path, "ratio", &1.5_f64, None, Some(1.0)).unwrap_err();
    assert_eq!(err.to_string(), "`ratio`: 1.5 is above the maximum 1");
}

#[test]
fn test_check_items() {
    let path = KeyPath::new();
    assert!(check_items(&path, "km", 4, Some(1), Some(4)).is_ok());
    assert!(check_items(&path, "km", 0, Some(1), None).is_err());
    assert!(check_items(&path, "km", 5, None, Some(4)).is_err());
}
