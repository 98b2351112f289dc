// CLI regression tests. Requires assert_cmd and predicates in [dev-dependencies].

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn blockconf() -> Command {
    let mut cmd = Command::cargo_bin("blockconf").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_decode_prints_json() {
    blockconf()
        .args(["decode", "-"])
        .write_stdin("name = \"api\"\nport = 8080\nserver { tls = true }\n")
        .assert()
        .success()
        .stdout(contains("\"name\": \"api\""))
        .stdout(contains("\"port\": 8080.0"))
        .stdout(contains("\"tls\": true"));
}

#[test]
fn cli_decode_prints_yaml() {
    blockconf()
        .args(["decode", "--format", "yaml", "-"])
        .write_stdin("tags = [\"a\", \"b\"]\n")
        .assert()
        .success()
        .stdout(contains("tags:"))
        .stdout(contains("- a"));
}

#[test]
fn cli_ast_prints_canonical_source() {
    blockconf()
        .args(["ast", "-"])
        .write_stdin("srv{port=80\nhosts=[\"a\",\"b\",]}")
        .assert()
        .success()
        .stdout("srv {\n  port = 80\n  hosts = [\"a\", \"b\"]\n}\n");
}

#[test]
fn cli_ast_json_tags_value_types() {
    blockconf()
        .args(["ast", "--json", "-"])
        .write_stdin("a = true")
        .assert()
        .success()
        .stdout(contains("\"type\": \"Bool\""));
}

#[test]
fn cli_tokens_lists_every_token() {
    blockconf()
        .args(["tokens", "-"])
        .write_stdin("a = 1 // note")
        .assert()
        .success()
        .stdout(contains("Ident").and(contains("Assign")))
        .stdout(contains("Comment").and(contains("\"// note\"")))
        .stdout(contains("Eof"));
}

#[test]
fn cli_check_accepts_valid_file() {
    let path = std::env::temp_dir().join("blockconf_cli_check_valid.conf");
    fs::write(&path, "a = 1\nb { c = [1, 2,] }\n").unwrap();

    blockconf()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let _ = fs::remove_file(&path);
}

#[test]
fn cli_reports_syntax_errors_with_diagnostics() {
    blockconf()
        .args(["check", "-"])
        .write_stdin("a = 1\nb = \n")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("blockconf::syntax::unexpected_token"))
        .stderr(contains("expected a value"));
}

#[test]
fn cli_reports_unterminated_strings() {
    blockconf()
        .args(["decode", "-"])
        .write_stdin("msg = \"oops")
        .assert()
        .failure()
        .stderr(contains("blockconf::syntax::unterminated_string"));
}

#[test]
fn cli_reports_invalid_utf8() {
    blockconf()
        .args(["check", "-"])
        .write_stdin(b"a = \"\xff\"".to_vec())
        .assert()
        .failure()
        .stderr(contains("not valid UTF-8"));
}

#[test]
fn cli_reports_missing_file() {
    blockconf()
        .args(["check", "definitely/not/here.conf"])
        .assert()
        .failure()
        .stderr(contains("failed to read"));
}

#[test]
fn cli_honours_max_depth() {
    blockconf()
        .args(["--max-depth", "1", "check", "-"])
        .write_stdin("a { b { } }")
        .assert()
        .failure()
        .stderr(contains("blockconf::syntax::nesting_too_deep"));
}

#[test]
fn cli_verbose_logs_to_stderr() {
    blockconf()
        .args(["--verbose", "check", "-"])
        .write_stdin("a = 1")
        .assert()
        .success()
        .stderr(contains("parsed document"));
}

#[test]
fn cli_trace_events_name_the_destination() {
    blockconf()
        .args(["check", "-"])
        .env("RUST_LOG", "blockconf=trace")
        .write_stdin("a = 1\nb { c = 2 }")
        .assert()
        .success()
        .stderr(predicate::str::is_match("decoding map entry.*destination=Dynamic").unwrap());
}
