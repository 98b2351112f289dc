// tests/parser_tests.rs

use blockconf::ast::{Block, Value};
use blockconf::errors::SyntaxErrorKind;
use blockconf::syntax::TokenKind;
use blockconf::{parse, parse_with, Options, Position};

fn parse_ok(text: &str) -> Block {
    match parse(text) {
        Ok(block) => block,
        Err(e) => panic!("failed to parse {text:?}: {e}"),
    }
}

fn syntax_kind(text: &str) -> SyntaxErrorKind {
    parse(text).expect_err("expected a syntax error").kind
}

// ---
// Accepted documents
// ---

#[test]
fn test_parse_assignment() {
    let root = parse_ok("foo = 123");
    assert_eq!(root.entries.len(), 1);
    assert_eq!(root.entries[0].name(), "foo");
    assert_eq!(root.entries[0].value.as_number(), Some(123.0));
}

#[test]
fn test_parse_empty_and_blank_documents() {
    assert!(parse_ok("").is_empty());
    assert!(parse_ok("\n\n  \n").is_empty());
    assert!(parse_ok("// only a comment\n").is_empty());
}

#[test]
fn test_parse_scalars() {
    let root = parse_ok("a=true\nb=42\nc=\"hi\"\nd=false\ne=-1.5e3");
    assert_eq!(root.entries[0].value.as_bool(), Some(true));
    assert_eq!(root.entries[1].value.as_number(), Some(42.0));
    assert_eq!(root.entries[2].value.as_str(), Some("hi"));
    assert_eq!(root.entries[3].value.as_bool(), Some(false));
    assert_eq!(root.entries[4].value.as_number(), Some(-1500.0));
}

#[test]
fn test_parse_nested_blocks() {
    let root = parse_ok("server {\n  listen {\n    port = 80\n  }\n}");
    let server = root.entries[0].value.as_block().expect("server block");
    let listen = server.entries[0].value.as_block().expect("listen block");
    assert_eq!(listen.entries[0].value.as_number(), Some(80.0));
    assert_eq!(server.start, Position::new(1, 8, 7));
}

#[test]
fn test_parse_blocks_on_one_line() {
    let root = parse_ok("Foo{A=1} Foo{A=2}");
    let named: Vec<_> = root.entries_named("Foo").collect();
    assert_eq!(named.len(), 2);
    let second = named[1].value.as_block().expect("block");
    assert_eq!(second.first("A").and_then(|e| e.value.as_number()), Some(2.0));
}

#[test]
fn test_parse_empty_block() {
    let root = parse_ok("empty {}");
    assert!(root.entries[0].value.as_block().is_some_and(Block::is_empty));
}

#[test]
fn test_parse_lists() {
    let root = parse_ok("items = [1, \"two\", true, [3]]");
    let items = root.entries[0].value.as_list().expect("list");
    assert_eq!(items.len(), 4);
    assert_eq!(items[1].as_str(), Some("two"));
    assert_eq!(items[3].as_list().map(<[Value]>::len), Some(1));
    assert_eq!(parse_ok("e = []").entries[0].value.as_list().map(<[Value]>::len), Some(0));
}

#[test]
fn test_trailing_comma_is_optional() {
    assert_eq!(parse_ok("a = [1, 2,]"), parse_ok("a = [1, 2]"));
}

#[test]
fn test_newlines_inside_lists_are_ignored() {
    let multiline = parse_ok("a = [\n  1,\n  2,\n]");
    assert_eq!(multiline, parse_ok("a = [1, 2]"));
    assert_eq!(parse_ok("a = [\n]"), parse_ok("a = []"));
}

#[test]
fn test_newlines_around_commas_in_lists() {
    let expected = parse_ok("a = [1, 2]");
    assert_eq!(parse_ok("a = [1\n,\n2\n,\n]"), expected);
    assert_eq!(parse_ok("a = [1\n, 2]"), expected);
    assert_eq!(parse_ok("a = [1, 2\n,]"), expected);
}

#[test]
fn test_comments_are_transparent() {
    let with = parse_ok("// header\na = 1 // one\n// between\nb { // open\n  c = 2\n}\n");
    let without = parse_ok("a = 1\nb {\n  c = 2\n}");
    assert_eq!(with, without);
}

#[test]
fn test_positions_are_recorded() {
    let root = parse_ok("\n  answer = 42");
    let entry = &root.entries[0];
    assert_eq!(entry.start, Position::new(2, 3, 3));
    assert_eq!(entry.value.start(), Position::new(2, 12, 12));
}

#[test]
fn test_equality_ignores_positions() {
    assert_eq!(parse_ok("a=1\nb{c=\"x\"}"), parse_ok("\n\n   a = 1\n\n b { c = \"x\" }"));
    assert_ne!(parse_ok("a = 1"), parse_ok("a = 2"));
}

// ---
// Syntax errors
// ---

#[test]
fn test_missing_value_reports_eof() {
    let err = parse("a=").expect_err("missing value");
    assert_eq!(err.kind, SyntaxErrorKind::UnexpectedToken { expected: "a value" });
    assert_eq!(err.found.kind, TokenKind::Eof);
    assert_eq!(err.position(), Position::new(1, 3, 2));
}

#[test]
fn test_unterminated_string() {
    let err = parse("\"oops").expect_err("unterminated");
    assert_eq!(err.kind, SyntaxErrorKind::UnterminatedString);
    assert_eq!(err.found.kind, TokenKind::Invalid);
    assert_eq!(err.position(), Position::start());

    assert_eq!(syntax_kind("a = \"never closed\nb = 1"), SyntaxErrorKind::UnterminatedString);
}

#[test]
fn test_invalid_tokens() {
    assert_eq!(syntax_kind("a = @"), SyntaxErrorKind::InvalidToken);
    assert_eq!(syntax_kind("a = 1e999"), SyntaxErrorKind::InvalidNumber);
    assert_eq!(syntax_kind("a = -"), SyntaxErrorKind::InvalidNumber);
}

#[test]
fn test_bare_identifier_value_is_rejected() {
    let err = parse("mode = fast").expect_err("bare identifier");
    assert_eq!(err.kind, SyntaxErrorKind::UnexpectedToken { expected: "a value" });
    assert_eq!(err.found.text, "fast");
}

#[test]
fn test_structural_errors() {
    assert_eq!(
        syntax_kind("a 1"),
        SyntaxErrorKind::UnexpectedToken { expected: "'=' or '{'" }
    );
    assert_eq!(
        syntax_kind("a { b = 1"),
        SyntaxErrorKind::UnexpectedToken { expected: "'}' or an entry name" }
    );
    assert_eq!(
        syntax_kind("a = [1 2]"),
        SyntaxErrorKind::UnexpectedToken { expected: "',' or ']'" }
    );
    assert_eq!(
        syntax_kind("a = [1\n2]"),
        SyntaxErrorKind::UnexpectedToken { expected: "',' or ']'" }
    );
    assert_eq!(
        syntax_kind("a = [1,,]"),
        SyntaxErrorKind::UnexpectedToken { expected: "a value" }
    );
    assert_eq!(
        syntax_kind("}"),
        SyntaxErrorKind::UnexpectedToken { expected: "an entry name or end of input" }
    );
}

#[test]
fn test_block_is_not_a_value() {
    assert_eq!(
        syntax_kind("a = { b = 1 }"),
        SyntaxErrorKind::UnexpectedToken { expected: "a value" }
    );
}

#[test]
fn test_nesting_limit() {
    let shallow = Options::default().with_max_depth(3);
    assert!(parse_with("a { b { c = [1] } }", &shallow).is_ok());

    let err = parse_with("a { b { c { d = 1 } } }", &shallow).expect_err("too deep");
    assert_eq!(err.kind, SyntaxErrorKind::NestingTooDeep { limit: 3 });
    assert_eq!(err.found.kind, TokenKind::LBrace);

    let lists = format!("a = {}{}", "[".repeat(4), "]".repeat(4));
    assert!(parse_with(&lists, &shallow).is_err());
}

#[test]
fn test_default_nesting_limit_stops_deep_input() {
    let deep = format!("a = {}{}", "[".repeat(10_000), "]".repeat(10_000));
    let err = parse(&deep).expect_err("too deep");
    assert_eq!(err.kind, SyntaxErrorKind::NestingTooDeep { limit: 128 });
}

// ---
// Canonical rendering
// ---

#[test]
fn test_display_is_canonical() {
    let root = parse_ok("b=1\nname=\"a \\\"q\\\"\\n\"\nsrv{port=80\ntags=[\"x\",\"y\",]\ninner{}}");
    assert_eq!(
        root.to_string(),
        "b = 1\nname = \"a \\\"q\\\"\\n\"\nsrv {\n  port = 80\n  tags = [\"x\", \"y\"]\n  inner {}\n}\n"
    );
}

#[test]
fn test_rendered_source_reparses_to_same_tree() {
    let source = "// c\nx = -0.5\ny = [true, [1, 2], \"t\\tab\"]\nz { w { v = 1e21 } }\nz {}";
    let root = parse_ok(source);
    let reparsed = parse_ok(&root.to_string());
    assert_eq!(root, reparsed);
}

#[test]
fn test_ast_serializes_to_json() {
    let root = parse_ok("a = [1, true]");
    let json = serde_json::to_value(&root).expect("serializable");
    assert_eq!(json["entries"][0]["name"]["text"], "a");
    assert_eq!(json["entries"][0]["value"]["type"], "List");
    assert_eq!(json["entries"][0]["value"]["values"][1]["type"], "Bool");
}
