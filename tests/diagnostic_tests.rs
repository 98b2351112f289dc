//! Golden master tests for error messages and diagnostics.
//!
//! These pin the Display text, diagnostic codes and labels so that error
//! presentation stays stable across changes.

use std::collections::HashMap;

use blockconf::errors::ErrorCategory;
use blockconf::{from_str, parse, record, Dynamic, Error};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};

#[derive(Debug, Clone, Default)]
struct Server {
    host: String,
    port: u16,
}
record!(Server { host, port });

fn error_of<T: blockconf::Decode + Default>(source: &str) -> Error {
    match from_str::<T>(source) {
        Ok(_) => panic!("expected {source:?} to fail"),
        Err(e) => e,
    }
}

fn code(diagnostic: &dyn Diagnostic) -> Option<String> {
    diagnostic.code().map(|c| c.to_string())
}

fn help(diagnostic: &dyn Diagnostic) -> Option<String> {
    diagnostic.help().map(|h| h.to_string())
}

fn render(error: Error, source: &str) -> String {
    let report = error.report("input.conf", source);
    let mut out = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .with_width(200)
        .render_report(&mut out, &*report)
        .unwrap();
    out
}

// ---
// Display text
// ---

#[test]
fn test_syntax_error_messages() {
    let err = parse("a=").unwrap_err();
    assert_eq!(err.to_string(), "syntax error at 1:3: expected a value, found end of input");

    let err = parse("a = 1\nb 2").unwrap_err();
    assert_eq!(err.to_string(), "syntax error at 2:3: expected '=' or '{', found number '2'");

    let err = parse("s = \"open").unwrap_err();
    assert_eq!(err.to_string(), "syntax error at 1:5: unterminated string");

    let err = parse("x = [1, \"y\" z]").unwrap_err();
    assert_eq!(
        err.to_string(),
        "syntax error at 1:13: expected ',' or ']', found identifier 'z'"
    );
}

#[test]
fn test_punctuation_is_named_once() {
    let err = parse("a = [1,,]").unwrap_err();
    assert_eq!(err.to_string(), "syntax error at 1:8: expected a value, found ','");

    let err = parse("}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "syntax error at 1:1: expected an entry name or end of input, found '}'"
    );
}

#[test]
fn test_decode_error_messages() {
    let err = error_of::<Server>("port = \"http\"");
    assert_eq!(err.to_string(), "decode error at 1:8 (port): cannot assign string to u16");

    let err = error_of::<Server>("port = 70000");
    assert_eq!(
        err.to_string(),
        "decode error at 1:8 (port): cannot assign number to u16: 70000 is out of range for u16"
    );

    let err = error_of::<Server>("hostname = \"x\"");
    assert_eq!(err.to_string(), "decode error at 1:1: Server has no field named 'hostname'");

    let err = error_of::<Server>("host = \"a\"\nhost = \"b\"");
    assert_eq!(
        err.to_string(),
        "decode error at 1:8 (host): entry is repeated but String holds a single value"
    );

    let err = error_of::<HashMap<String, Vec<Server>>>("pool = 1");
    assert_eq!(
        err.to_string(),
        "decode error at 1:8 (pool): cannot decode number into Vec<Server>"
    );
}

#[test]
fn test_encoding_error_message() {
    let mut value = Dynamic::map();
    let err = blockconf::unmarshal(b"\xc3\x28", &mut value).unwrap_err();
    assert_eq!(
        err.to_string(),
        "input is not valid UTF-8 (first invalid byte at offset 0)"
    );
    assert_eq!(err.category(), ErrorCategory::Encoding);
}

// ---
// Diagnostic metadata
// ---

#[test]
fn test_diagnostic_codes() {
    let cases: &[(&str, &str)] = &[
        ("a =", "blockconf::syntax::unexpected_token"),
        ("a = @", "blockconf::syntax::invalid_token"),
        ("a = \"x", "blockconf::syntax::unterminated_string"),
        ("a = 1e400", "blockconf::syntax::invalid_number"),
    ];
    for (source, expected) in cases {
        let err: Error = parse(source).unwrap_err().into();
        assert_eq!(code(&err).as_deref(), Some(*expected), "{source:?}");
    }

    let err = error_of::<Server>("nope = 1");
    assert_eq!(code(&err).as_deref(), Some("blockconf::decode::unknown_field"));
    let err = error_of::<Server>("port { }");
    assert_eq!(code(&err).as_deref(), Some("blockconf::decode::shape_mismatch"));
    let err = error_of::<Server>("port = true");
    assert_eq!(code(&err).as_deref(), Some("blockconf::decode::type_mismatch"));
}

#[test]
fn test_help_text() {
    let err = error_of::<Server>("nope = 1");
    assert_eq!(help(&err).as_deref(), Some("known fields: host, port"));

    let err = error_of::<Server>("port = 1\nport = 2");
    assert_eq!(
        help(&err).as_deref(),
        Some("declare the destination as a list to collect repeated entries")
    );

    let err: Error = parse("mode = fast").unwrap_err().into();
    assert_eq!(
        help(&err).as_deref(),
        Some("only 'true' and 'false' may appear unquoted as values")
    );
}

#[test]
fn test_labels_point_at_offending_token() {
    let err: Error = parse("a = 1\nb = [1 2]").unwrap_err().into();
    let labels: Vec<_> = err.labels().expect("labels").collect();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].offset(), 13);
    assert_eq!(labels[0].len(), 1);
    assert_eq!(labels[0].label(), Some("expected ',' or ']'"));

    let err: Error = parse("s = \"abc").unwrap_err().into();
    let labels: Vec<_> = err.labels().expect("labels").collect();
    assert_eq!(labels[0].offset(), 4);
    assert_eq!(labels[0].len(), 4);
}

// ---
// Rendered reports
// ---

#[test]
fn test_rendered_report_shows_source_excerpt() {
    let source = "host = \"example.org\"\nport = \"eighty\"\n";
    let out = render(error_of::<Server>(source), source);
    assert!(out.contains("blockconf::decode::type_mismatch"), "{out}");
    assert!(out.contains("input.conf:2:8"), "{out}");
    assert!(out.contains("port = \"eighty\""), "{out}");
    assert!(out.contains("expected u16"), "{out}");
}

#[test]
fn test_rendered_syntax_report() {
    let source = "server {\n  port = \n}";
    let err: Error = parse(source).unwrap_err().into();
    let out = render(err, source);
    assert!(out.contains("blockconf::syntax::unexpected_token"), "{out}");
    assert!(out.contains("expected a value"), "{out}");
    assert!(out.contains("input.conf:2:10"), "{out}");
}
