//! Tests for `convert`, `inspect` and `callgraph`

use serde_json::Value;

use crate::common::TestWorkspace;

const ETAGS: &str = "\x0c\nlib/foo.cc,40\nint Foo() {\x7fFoo\x011,0\n\x0c\nlib/Bar.java,12\nclass Bar\x7fBar\x012,8\n";

#[test]
fn test_convert_to_stdout() {
    let ws = TestWorkspace::new();
    ws.add_file("in.etags", ETAGS);

    let output = ws.run_cli_success(&[
        "convert",
        "-i",
        "in.etags",
        "--timestamp",
        "1000",
        "--corpus",
        "demo",
    ]);

    assert!(output.starts_with(
        "(tags-format-version 2)\n(tags-comment \"\")\n(timestamp 1000)\n(tags-corpus-name \"demo\")\n"
    ));
    assert!(output.contains("(descriptor (generic-tag (tag \"Foo\")))"));
    assert!(output.contains("(path \"lib/Bar.java\")\n  (language \"c++\")"));
}

#[test]
fn test_convert_to_file_then_inspect() {
    let ws = TestWorkspace::new();
    ws.add_file("in.etags", ETAGS);
    ws.add_file("deleted.txt", "lib/old.cc\n");

    let summary = ws.run_cli_success(&[
        "convert",
        "-i",
        "in.etags",
        "-o",
        "out/TAGS",
        "--guess-language",
        "--callers",
        "--deletion-list",
        "deleted.txt",
        "-f",
        "json",
    ]);
    let summary: Value = serde_json::from_str(&summary).unwrap();
    assert_eq!(summary["files"], 2);
    assert_eq!(summary["items"], 2);
    assert_eq!(summary["deleted"], 1);

    let written = ws.read_file("out/TAGS");
    assert!(written.contains("(language \"java\")"));
    assert!(written.contains("(call (to (ref (name \"Bar\"))))"));
    assert!(written.ends_with("(deleted \"lib/old.cc\")\n"));

    let inspected = ws.run_cli_success(&["inspect", "out/TAGS", "-f", "json"]);
    let inspected: Value = serde_json::from_str(&inspected).unwrap();
    assert_eq!(inspected["file_count"], 2);
    assert_eq!(inspected["files"][0]["calls"], 1);
    assert_eq!(inspected["deleted"][0], "lib/old.cc");
}

#[test]
fn test_convert_no_header() {
    let ws = TestWorkspace::new();
    ws.add_file("in.etags", ETAGS);
    let output = ws.run_cli_success(&["convert", "-i", "in.etags", "--no-header"]);
    assert!(output.starts_with("(file \n"));
}

#[test]
fn test_convert_missing_input() {
    let ws = TestWorkspace::new();
    let (code, stderr) = ws.run_cli_failure(&["convert", "-i", "absent.etags"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("File not found"));
}

#[test]
fn test_convert_malformed_input() {
    let ws = TestWorkspace::new();
    ws.add_file("bad.etags", "f()\x7ff\x011,0\n");
    let (code, stderr) = ws.run_cli_failure(&["convert", "-i", "bad.etags"]);
    assert_eq!(code, 3);
    assert!(stderr.contains("Malformed etags input at line 1"));
}

#[test]
fn test_inspect_text() {
    let ws = TestWorkspace::new();
    ws.add_file("in.etags", ETAGS);
    ws.run_cli_success(&["convert", "-i", "in.etags", "-o", "TAGS", "--timestamp", "7"]);

    let output = ws.run_cli_success(&["inspect", "TAGS"]);
    assert!(output.contains("timestamp: 7\n"));
    assert!(output.contains("  lib/foo.cc (c++): 1 items, 0 calls\n"));
}

#[test]
fn test_callgraph_writes_and_appends() {
    let ws = TestWorkspace::new();
    ws.add_file("a.cc", "void a() {\n  b();\n}\n");
    ws.add_file("c.py", "c(d)\n");

    let summary = ws.run_cli_success(&["callgraph", "a.cc"]);
    assert!(summary.contains("call_sites: 2"));
    ws.run_cli_success(&["callgraph", "c.py", "--append"]);

    let etags = ws.read_file("TAGSR");
    assert_eq!(
        etags,
        "\x0c\na.cc,20\nvoid a() {\x7fa\x011,0\n  b();\x7fb\x012,11\n\x0c\nc.py,5\nc(d)\x7fc\x011,0\n"
    );
}

#[test]
fn test_callgraph_to_stdout_feeds_convert() {
    let ws = TestWorkspace::new();
    ws.add_file("m.cc", "run();\n");

    let etags = ws.run_cli_success(&["callgraph", "m.cc", "-o", "-"]);
    assert_eq!(etags, "\x0c\nm.cc,7\nrun();\x7frun\x011,0\n");

    ws.add_file("m.etags", &etags);
    let tags = ws.run_cli_success(&["convert", "-i", "m.etags", "--callers", "--no-header"]);
    assert!(tags.contains("(call (to (ref (name \"run\"))))"));
}

#[test]
fn test_callgraph_missing_file_reported() {
    let ws = TestWorkspace::new();
    ws.add_file("a.cc", "f();\n");
    let output = ws.run_cli_success(&["callgraph", "a.cc", "gone.cc", "-f", "json"]);
    let summary: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(summary["files"], 1);
    assert_eq!(summary["failed"][0], "gone.cc");
}
