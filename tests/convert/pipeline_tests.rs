//! Source files → callgraph etags → TAGS → reader

use std::fs;

use semfora_tags::convert::{
    convert_etags, parse_etags, CallgraphExtractor, Descriptor, TagsFile, TagsFileOptions,
};
use tempfile::TempDir;

#[test]
fn test_callgraph_to_tags_file() {
    let dir = TempDir::new().unwrap();
    let main_cc = dir.path().join("main.cc");
    let util_py = dir.path().join("util.py");
    fs::write(&main_cc, "int main() {\n  Init(argc);\n  return Run(Parse(argv));\n}\n").unwrap();
    fs::write(&util_py, "def helper():\n    print(len(x))\n").unwrap();

    let extractor = CallgraphExtractor::new().unwrap();
    let mut etags = Vec::new();
    let stats = extractor
        .extract_paths(&[&main_cc, &util_py], &mut etags)
        .unwrap();
    assert_eq!(stats.files, 2);
    assert_eq!(stats.call_sites, 7);

    let options = TagsFileOptions {
        callers: true,
        guess_language: true,
        timestamp: Some(42),
        ..TagsFileOptions::default()
    };
    let mut tags_text = Vec::new();
    let files = convert_etags(&etags, &mut tags_text, &[], &options).unwrap();
    assert_eq!(files, 2);

    let tags = TagsFile::parse(std::str::from_utf8(&tags_text).unwrap()).unwrap();
    assert_eq!(tags.header.as_ref().unwrap().timestamp, 42);
    assert_eq!(tags.files[0].language, "c++");
    assert_eq!(tags.files[1].language, "python");

    let run_line: Vec<_> = tags.files[0]
        .items
        .iter()
        .filter(|item| item.line == 3)
        .map(|item| item.descriptor.clone())
        .collect();
    assert_eq!(
        run_line,
        vec![
            Descriptor::Call("Run".to_string()),
            Descriptor::Call("Parse".to_string())
        ]
    );
    // "int main() {\n" + "  Init(argc);\n"
    assert_eq!(tags.files[0].items.iter().find(|i| i.line == 3).unwrap().offset, 27);
}

#[test]
fn test_update_file_without_header() {
    let etags = "\x0c\nsrc/a.java,20\nclass A {\x7fA\x011,0\n";
    let options = TagsFileOptions {
        header: false,
        language: "java".to_string(),
        ..TagsFileOptions::default()
    };
    let mut out = Vec::new();
    convert_etags(etags.as_bytes(), &mut out, &["src/old.java".to_string()], &options).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("(file \n  (path \"src/a.java\")"));
    assert!(text.ends_with("(deleted \"src/old.java\")\n"));

    let tags = TagsFile::parse(&text).unwrap();
    assert!(tags.header.is_none());
    assert_eq!(tags.deleted, vec!["src/old.java"]);
}

#[test]
fn test_etags_append_keeps_both_sections() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.c");
    let b = dir.path().join("b.c");
    fs::write(&a, "f();\n").unwrap();
    fs::write(&b, "g();\n").unwrap();
    let out_path = dir.path().join("TAGSR");
    let out_str = out_path.to_str().unwrap();

    let extractor = CallgraphExtractor::new().unwrap();
    {
        let mut out = semfora_tags::fs_utils::open_output(out_str, false).unwrap();
        extractor.extract_paths(&[&a], &mut out).unwrap();
    }
    {
        let mut out = semfora_tags::fs_utils::open_output(out_str, true).unwrap();
        extractor.extract_paths(&[&b], &mut out).unwrap();
    }

    let sections = parse_etags(&fs::read(&out_path).unwrap()).unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].entries[0].tag, "f");
    assert_eq!(sections[1].entries[0].tag, "g");
}
