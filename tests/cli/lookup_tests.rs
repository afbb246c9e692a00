//! Tests for the `lookup` and `file` CLI commands

use serde_json::Value;

use crate::common::{closed_port, error_reply, FakeTagsServer, TestWorkspace, FOO_REPLY};

#[test]
fn test_lookup_text_output() {
    let server = FakeTagsServer::with_reply(FOO_REPLY);
    let ws = TestWorkspace::new();
    ws.with_server("c++", "definition", &server.address());

    let output = ws.run_cli_success(&["lookup", "Foo"]);

    assert_eq!(output, "base/foo.h|12| class Foo {\nbase/foo.cc|3| Foo::Foo() {}\n");
    assert!(server.requests()[0].starts_with("(lookup-tag-exact "));
}

#[test]
fn test_lookup_vi_and_json_formats() {
    let server = FakeTagsServer::with_reply(FOO_REPLY);
    let ws = TestWorkspace::new();

    let vi = ws.run_cli_success(&["lookup", "Foo", "-f", "vi", "--server", &server.address()]);
    assert_eq!(vi.lines().next(), Some("Foo\tgtags://base/foo.h\t12"));

    let json = ws.run_cli_success(&["lookup", "Foo", "-f", "json", "--server", &server.address()]);
    let parsed: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);
    assert_eq!(parsed[1]["offset"], 40);
}

#[test]
fn test_lookup_regexp_callers_sends_callgraph_command() {
    let server = FakeTagsServer::with_reply(FOO_REPLY);
    let ws = TestWorkspace::new();
    ws.with_server("java", "callgraph", &server.address());

    ws.run_cli_success(&["lookup", "Fo", "--regexp", "--callers", "-l", "java"]);
    let sent = &server.requests()[0];
    assert!(sent.starts_with("(lookup-tag-prefix-regexp "));
    assert!(sent.contains(r#"(language "java")"#));
    assert!(sent.contains("(callers t)"));
}

#[test]
fn test_lookup_names_for_completion() {
    let server = FakeTagsServer::with_reply(FOO_REPLY);
    let ws = TestWorkspace::new();
    ws.with_server("c++", "definition", &server.address());

    assert_eq!(ws.run_cli_success(&["lookup", "F", "--regexp", "--names"]), "Foo\n");
}

#[test]
fn test_snippet_search_with_corpus_override() {
    let server = FakeTagsServer::with_reply(FOO_REPLY);
    let ws = TestWorkspace::new();
    ws.with_server("c++", "definition", &server.address());

    ws.run_cli_success(&["lookup", "class .*", "--snippet", "--corpus", "chromium"]);
    let sent = &server.requests()[0];
    assert!(sent.starts_with("(lookup-tag-snippet-regexp "));
    assert!(sent.contains(r#"(corpus "chromium")"#));
}

#[test]
fn test_failover_from_dead_server() {
    let server = FakeTagsServer::with_reply(FOO_REPLY);
    let ws = TestWorkspace::new();
    ws.with_server("c++", "definition", &format!("127.0.0.1:{}", closed_port()))
        .with_server("c++", "definition", &server.address());

    let output = ws.run_cli_success(&["file", "base/foo.h"]);
    assert!(output.contains("base/foo.h|12|"));
    assert!(server.requests()[0].contains(r#"(file "base/foo.h")"#));
}

#[test]
fn test_no_servers_exit_code() {
    let ws = TestWorkspace::new();
    let (code, stderr) = ws.run_cli_failure(&["lookup", "Foo"]);
    assert_eq!(code, 5);
    assert!(stderr.contains("No tags servers configured"), "{}", stderr);
}

#[test]
fn test_server_error_exit_code() {
    let server = FakeTagsServer::with_reply(&error_reply("unknown corpus"));
    let ws = TestWorkspace::new();
    ws.with_server("c++", "definition", &server.address());

    let (code, stderr) = ws.run_cli_failure(&["lookup", "Foo"]);
    assert_eq!(code, 4);
    assert!(stderr.contains("unknown corpus"));
}

#[test]
fn test_lookup_writes_vi_tags_file() {
    let server = FakeTagsServer::with_reply(FOO_REPLY);
    let ws = TestWorkspace::new();
    ws.with_server("c++", "definition", &server.address());

    let output = ws.run_cli_success(&["lookup", "Foo", "--tags-file", "tags"]);
    assert_eq!(output, "tags_file: tags\ntags: 2\n");
    assert_eq!(
        ws.read_file("tags"),
        "Foo\tgtags://base/foo.h\t12\nFoo\tgtags://base/foo.cc\t3\n"
    );
}

#[test]
fn test_lookup_long_format() {
    let server = FakeTagsServer::with_reply(FOO_REPLY);
    let ws = TestWorkspace::new();
    ws.with_server("c++", "definition", &server.address());

    let output = ws.run_cli_success(&["lookup", "Foo", "-f", "long"]);
    let first = output.lines().next().unwrap();
    assert!(first.starts_with("base/foo.h|12| "));
    assert_eq!(first.find("Foo"), Some(77));
}

#[test]
fn test_resolve_prefers_project_root() {
    let ws = TestWorkspace::new();
    ws.add_file("checkout/base/foo.h", "");
    ws.add_file("local.cc", "");
    let root = ws.path().join("checkout");
    let root_str = root.to_str().unwrap();

    let output = ws.run_cli_success(&["resolve", "gtags://base/foo.h", "--root", root_str]);
    assert_eq!(output, format!("{}\n", root.join("base/foo.h").display()));

    let output = ws.run_cli_success(&["resolve", "gtags://local.cc", "--root", root_str]);
    assert!(output.trim_end().ends_with("local.cc"));
    assert!(std::path::Path::new(output.trim_end()).exists());

    assert_eq!(ws.run_cli_success(&["resolve", "gtags://nowhere.cc"]), "nowhere.cc\n");
}
