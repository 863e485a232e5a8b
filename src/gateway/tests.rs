use super::*;

fn describe(pattern: &str) -> Descriptor {
    let engine = Engine::init(EngineOptions::default()).unwrap();
    Gateway::new(&engine).describe(&Text::from(pattern)).unwrap()
}

#[test]
fn test_text_renders_both_representations() {
    assert_eq!(Text::from("a+b").to_string(), "a+b");
    assert_eq!(Text::from(b"a+b".to_vec()).to_string(), "a+b");
    assert_eq!(Text::from(vec![b'a', 0xff]).to_str_lossy(), "a\u{fffd}");
    assert!(Text::default().is_empty());
    assert!(Text::Bytes(Vec::new()).is_empty());
}

#[test]
fn test_text_from_raw() {
    assert_eq!(Text::from_raw(b"a+".to_vec()), Text::Str("a+".to_string()));
    assert_eq!(Text::from_raw(vec![0xff, b'(']), Text::Bytes(vec![0xff, b'(']));
}

#[test]
fn test_text_serializes_as_string() {
    let json = serde_json::to_string(&Text::from(b"ab".to_vec())).unwrap();
    assert_eq!(json, r#""ab""#);
}

#[test]
fn test_describe_simple() {
    let info = describe("a+");

    assert!(!info.is_error());
    assert_eq!(info.pattern, Text::from("a+"));
    assert_eq!(info.num_captures, 0);
    assert!(info.prefix.is_empty());
    assert!(info.accel_prefix.is_empty());
    assert!(!info.bytecode.is_empty());
    assert!(info.bytemap.to_string().starts_with("[00-"));
}

#[test]
fn test_describe_parse_error() {
    let info = describe("a(");

    assert!(info.is_error());
    assert!(info.error.to_string().starts_with("failed to parse pattern: "));
    assert_eq!(info.pattern, Text::from("a("));
    assert!(info.bytecode.is_empty());
    assert!(info.bytemap.is_empty());
}

#[test]
fn test_describe_compile_error() {
    let engine = Engine::init(EngineOptions { max_mem: 1 << 12 }).unwrap();
    let info = engine.describe(&Text::from("\\w{100}")).unwrap();

    assert_eq!(info.error, Text::from("failed to compile forward Prog"));
}

#[test]
fn test_describe_prefixes() {
    let info = describe("^abc(d+)");
    assert_eq!(info.prefix.to_string(), "abc");
    assert!(!info.prefix_foldcase);
    assert!(info.accel_prefix.is_empty());
    assert_eq!(info.num_captures, 1);

    let info = describe("(?i)^hello");
    assert_eq!(info.prefix.to_string(), "hello");
    assert!(info.prefix_foldcase);

    let info = describe("hello\\d");
    assert!(info.prefix.is_empty());
    assert_eq!(info.accel_prefix.to_string(), "hello");
    assert!(!info.accel_prefix_foldcase);
}

#[test]
fn test_describe_captures() {
    assert_eq!(describe("(a)(b)(?:c)(?P<name>d)").num_captures, 3);
}

#[test]
fn test_describe_strategies() {
    let info = describe("a+");
    assert!(info.is_one_pass);
    assert!(info.can_bit_state);

    assert!(!describe("[a-z]*[a-z]").is_one_pass);
}

#[test]
fn test_describe_bytes() {
    let engine = Engine::init(EngineOptions::default()).unwrap();
    let gateway = Gateway::new(&engine);

    let info = gateway.describe(&Text::from(b"x+".to_vec())).unwrap();
    assert!(!info.is_error());
    assert_eq!(info.pattern, Text::Bytes(b"x+".to_vec()));

    let info = gateway.describe(&Text::from(vec![b'x', 0xff])).unwrap();
    assert!(info.is_error());
}

#[test]
fn test_describe_is_pure() {
    assert_eq!(describe("(foo|bar)+baz"), describe("(foo|bar)+baz"));
}

#[test]
fn test_load_once() {
    let first = load(EngineOptions::default()).unwrap();
    let second = load(EngineOptions { max_mem: 1 }).unwrap();

    let pattern = Text::from("x{3}");
    assert_eq!(first.describe(&pattern), second.describe(&pattern));
    assert!(!second.describe(&pattern).unwrap().is_error());
}
