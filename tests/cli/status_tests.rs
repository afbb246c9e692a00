//! Tests for `ping`, `reload` and `update`

use serde_json::Value;

use crate::common::{closed_port, FakeTagsServer, TestWorkspace, OK_REPLY};

#[test]
fn test_ping_text() {
    let server = FakeTagsServer::with_reply(OK_REPLY);
    let ws = TestWorkspace::new();
    ws.with_server("python", "definition", &server.address());

    let output = ws.run_cli_success(&["ping", "-l", "py"]);
    assert_eq!(output, "language: python\ncall_type: definition\nstatus: true\n");
    assert!(server.requests()[0].starts_with("(ping "));
}

#[test]
fn test_reload_json() {
    let server = FakeTagsServer::with_reply(OK_REPLY);
    let ws = TestWorkspace::new();
    ws.with_server("c++", "callgraph", &server.address());

    let output = ws.run_cli_success(&["reload", "/tags/cpp.callers.tags.gz", "--callers", "-f", "json"]);
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["file"], "/tags/cpp.callers.tags.gz");
    assert_eq!(parsed["call_type"], "callgraph");
    assert_eq!(parsed["status"], true);
    assert!(server.requests()[0].ends_with(r#"(file "/tags/cpp.callers.tags.gz"))"#));
}

#[test]
fn test_update_sends_load_update_file() {
    let server = FakeTagsServer::with_reply(OK_REPLY);
    let ws = TestWorkspace::new();

    ws.run_cli_success(&["update", "/tags/delta", "--server", &server.address()]);
    assert!(server.requests()[0].starts_with("(load-update-file "));
}

#[test]
fn test_proxy_flag() {
    let proxy = FakeTagsServer::with_reply(OK_REPLY);
    let ws = TestWorkspace::new();
    ws.with_server("c++", "definition", &format!("127.0.0.1:{}", closed_port()));

    ws.run_cli_success(&["ping", "--proxy", &proxy.address()]);
    assert_eq!(proxy.requests().len(), 1);
}

#[test]
fn test_all_servers_down_exit_code() {
    let ws = TestWorkspace::new();
    ws.with_server("c++", "definition", &format!("127.0.0.1:{}", closed_port()));

    let (code, stderr) = ws.run_cli_failure(&["ping"]);
    assert_eq!(code, 5);
    assert!(stderr.contains("No tags server available"), "{}", stderr);
}

#[test]
fn test_bad_config_exit_code() {
    let ws = TestWorkspace::new();
    ws.write_config("[timeouts]\nconnect_secs = \"soon\"\n");
    let (code, stderr) = ws.run_cli_failure(&["ping"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Configuration error"));
}

#[test]
fn test_ports_table() {
    let ws = TestWorkspace::new();

    let output = ws.run_cli_success(&["ports"]);
    assert_eq!(output.lines().count(), 6);
    assert_eq!(output.lines().next(), Some("c++\tdefinition\t2223\tcpp.tags.gz"));
    assert!(output.contains("python\tcallgraph\t2235\tpython.callers.tags.gz\n"));

    let parsed: Value = serde_json::from_str(&ws.run_cli_success(&["ports", "-f", "json"])).unwrap();
    assert_eq!(parsed[3]["port"], 2234);
    assert_eq!(parsed[3]["tags_file"], "java.callers.tags.gz");
}
