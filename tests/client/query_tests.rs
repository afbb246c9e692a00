//! TagsClient queries over TCP

use std::thread;

use semfora_tags::{
    CallType, ClientConfig, ConnectionManager, TagRecord, TagsClient, TagsError,
};

use crate::common::{
    dead_endpoint, error_reply, FakeTagsServer, EMPTY_REPLY, FOO_REPLY, OK_REPLY,
};

fn client_for(server: &FakeTagsServer, call_type: CallType) -> TagsClient {
    let mut manager = ConnectionManager::new();
    manager.add_server("c++", call_type, dead_endpoint());
    manager.add_server("c++", call_type, server.endpoint());
    TagsClient::new(manager).with_corpus("test-corpus")
}

#[test]
fn test_exact_lookup_decodes_tags() {
    let server = FakeTagsServer::with_reply(FOO_REPLY);
    let mut client = client_for(&server, CallType::Definition);

    let tags = client
        .find_exact_tag("c++", CallType::Definition, "Foo")
        .unwrap();

    assert_eq!(
        tags[0],
        TagRecord {
            filename: "base/foo.h".to_string(),
            tag: "Foo".to_string(),
            line: 12,
            offset: 340,
            snippet: "class Foo {".to_string(),
        }
    );
    assert_eq!(tags[1].filename, "base/foo.cc");

    let sent = server.requests();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("(lookup-tag-exact (client-type "));
    assert!(sent[0].contains(r#"(corpus "test-corpus")"#));
    assert!(sent[0].contains("(callers nil)"));
    assert!(sent[0].ends_with(r#"(tag "Foo"))"#));
}

#[test]
fn test_callgraph_queries_send_callers_t() {
    let server = FakeTagsServer::with_reply(EMPTY_REPLY);
    let mut client = client_for(&server, CallType::Callgraph);

    let tags = client
        .find_matching_tags("c++", CallType::Callgraph, "Fo")
        .unwrap();
    assert!(tags.is_empty());
    assert!(server.requests()[0].contains("(callers t)"));
}

#[test]
fn test_server_error_is_not_failover() {
    let server = FakeTagsServer::with_reply(&error_reply("no such corpus"));
    let mut client = client_for(&server, CallType::Definition);

    let err = client
        .list_tags_for_file("c++", CallType::Definition, "a.cc")
        .unwrap_err();
    assert!(err.is_server());
    assert_eq!(err.to_string(), "no such corpus");
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn test_garbage_reply_is_parse_error() {
    let server = FakeTagsServer::with_reply("((value (");
    let mut client = client_for(&server, CallType::Definition);
    assert!(matches!(
        client.find_exact_tag("c++", CallType::Definition, "x"),
        Err(TagsError::Parse { .. })
    ));
}

#[test]
fn test_reload_and_update_status() {
    let server = FakeTagsServer::with_reply(OK_REPLY);
    let mut client = client_for(&server, CallType::Definition);

    assert!(client
        .reload_tag_file("c++", CallType::Definition, "/tags/cpp.tags.gz")
        .unwrap()
        .is_symbol("t"));
    assert!(client
        .load_update_file("c++", CallType::Definition, "/tags/cpp.update")
        .unwrap()
        .is_symbol("t"));

    let sent = server.requests();
    assert!(sent[0].starts_with("(reload-tags-file "));
    assert!(sent[1].starts_with("(load-update-file "));
}

#[test]
fn test_config_built_client() {
    let server = FakeTagsServer::with_reply(OK_REPLY);
    let toml = format!(
        "corpus = \"from-config\"\n\n[[servers]]\nlanguage = \"python\"\ncall_type = \"definition\"\nhost = \"127.0.0.1\"\nport = {}\n",
        server.port()
    );
    let config = ClientConfig::from_toml(&toml).unwrap();
    let mut client = config.build_client().unwrap();

    client
        .check_server_status("python", CallType::Definition)
        .unwrap();
    assert!(server.requests()[0].contains(r#"(corpus "from-config")"#));
    assert!(server.requests()[0].contains(r#"(language "python")"#));
}

#[test]
fn test_shared_client_across_threads() {
    let server = FakeTagsServer::with_reply(FOO_REPLY);
    let shared = client_for(&server, CallType::Definition).into_shared();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                shared
                    .lock()
                    .find_exact_tag("c++", CallType::Definition, "Foo")
                    .map(|tags| tags.len())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 2);
    }
    assert_eq!(server.requests().len(), 4);
}
