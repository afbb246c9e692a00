//! High-level tag queries
//!
//! [`TagsClient`] is the context object every query goes through: it holds
//! the client identity, the corpus, the file being edited and the
//! [`ConnectionManager`] with its endpoint tables and selection cursors.
//! Each query builds one command, sends it and decodes the reply. Transport,
//! protocol and server errors reach the caller unchanged.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::connection::{ConnectionManager, TcpTransport, Transport};
use crate::error::Result;
use crate::lang::CallType;
use crate::protocol::{
    decode_response, decode_status, ClientIdentity, CommandKind, CommandRequest, Param, TagRecord,
};
use crate::sexp::Sexp;

pub const DEFAULT_CORPUS: &str = "google3";

/// Where an extra tag produced by a [`GenfileResolver`] is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenfilePlacement {
    /// Before all regular results
    Prepend,
    /// Right after the hit it was derived from
    Append,
}

/// Maps a hit inside a generated file to the tag in its source file.
pub type GenfileResolver = Box<dyn Fn(&TagRecord) -> Option<TagRecord> + Send>;

/// A client shared between threads; callers lock around each query.
pub type SharedTagsClient<T = TcpTransport> = Arc<Mutex<TagsClient<T>>>;

pub struct TagsClient<T: Transport = TcpTransport> {
    manager: ConnectionManager<T>,
    identity: ClientIdentity,
    corpus: String,
    current_file: Option<String>,
    resolvers: Vec<(GenfileResolver, GenfilePlacement)>,
}

impl<T: Transport> TagsClient<T> {
    pub fn new(manager: ConnectionManager<T>) -> Self {
        Self {
            manager,
            identity: ClientIdentity::default(),
            corpus: DEFAULT_CORPUS.to_string(),
            current_file: None,
            resolvers: Vec::new(),
        }
    }

    pub fn with_identity(mut self, identity: ClientIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_corpus(mut self, corpus: impl Into<String>) -> Self {
        self.corpus = corpus.into();
        self
    }

    /// File the user is editing; sent as `(current-file ...)` when set.
    pub fn set_current_file(&mut self, file: Option<String>) {
        self.current_file = file;
    }

    pub fn corpus(&self) -> &str {
        &self.corpus
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    pub fn manager(&self) -> &ConnectionManager<T> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut ConnectionManager<T> {
        &mut self.manager
    }

    pub fn add_genfile_resolver(&mut self, resolver: GenfileResolver, placement: GenfilePlacement) {
        self.resolvers.push((resolver, placement));
    }

    pub fn into_shared(self) -> SharedTagsClient<T> {
        Arc::new(Mutex::new(self))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn find_exact_tag(&mut self, language: &str, call_type: CallType, tag: &str) -> Result<Vec<TagRecord>> {
        self.lookup(CommandKind::LookupTagExact, &[Param::text("tag", tag)], language, call_type)
    }

    /// Tags whose name matches a prefix regular expression.
    pub fn find_matching_tags(&mut self, language: &str, call_type: CallType, pattern: &str) -> Result<Vec<TagRecord>> {
        self.lookup(
            CommandKind::LookupTagPrefixRegexp,
            &[Param::text("tag", pattern)],
            language,
            call_type,
        )
    }

    /// Tags whose source line matches a regular expression.
    pub fn search_tag_snippets(&mut self, language: &str, call_type: CallType, pattern: &str) -> Result<Vec<TagRecord>> {
        self.lookup(
            CommandKind::LookupTagSnippetRegexp,
            &[Param::text("tag", pattern)],
            language,
            call_type,
        )
    }

    pub fn list_tags_for_file(&mut self, language: &str, call_type: CallType, file: &str) -> Result<Vec<TagRecord>> {
        self.lookup(CommandKind::LookupTagsInFile, &[Param::text("file", file)], language, call_type)
    }

    /// Ask the server to reload a tag file. Waits without a data timeout.
    pub fn reload_tag_file(&mut self, language: &str, call_type: CallType, file: &str) -> Result<Sexp> {
        let raw = self.send_raw_with_timeout(
            CommandKind::ReloadTagsFile,
            &[Param::text("file", file)],
            language,
            call_type,
            None,
        )?;
        decode_status(&raw)
    }

    /// Apply an incremental update file without a full reload.
    pub fn load_update_file(&mut self, language: &str, call_type: CallType, file: &str) -> Result<Sexp> {
        let raw = self.send_raw_with_timeout(
            CommandKind::LoadUpdateFile,
            &[Param::text("file", file)],
            language,
            call_type,
            None,
        )?;
        decode_status(&raw)
    }

    /// Liveness check.
    pub fn check_server_status(&mut self, language: &str, call_type: CallType) -> Result<Sexp> {
        let raw = self.send_raw(CommandKind::Ping, &[], language, call_type)?;
        decode_status(&raw)
    }

    /// Send a command and return the undecoded reply.
    pub fn send_raw(
        &mut self,
        kind: CommandKind,
        params: &[Param],
        language: &str,
        call_type: CallType,
    ) -> Result<String> {
        let command = self.build(kind, params, language, call_type);
        self.manager.send_command(language, call_type, &command)
    }

    fn send_raw_with_timeout(
        &mut self,
        kind: CommandKind,
        params: &[Param],
        language: &str,
        call_type: CallType,
        data_timeout: Option<std::time::Duration>,
    ) -> Result<String> {
        let command = self.build(kind, params, language, call_type);
        self.manager
            .send_command_with_timeout(language, call_type, &command, data_timeout)
    }

    fn build(&self, kind: CommandKind, params: &[Param], language: &str, call_type: CallType) -> String {
        CommandRequest {
            command: kind.name(),
            params,
            language,
            call_type,
            client: &self.identity,
            corpus: &self.corpus,
            current_file: self.current_file.as_deref(),
        }
        .build()
    }

    fn lookup(
        &mut self,
        kind: CommandKind,
        params: &[Param],
        language: &str,
        call_type: CallType,
    ) -> Result<Vec<TagRecord>> {
        let raw = self.send_raw(kind, params, language, call_type)?;
        let tags = decode_response(&raw)?;
        tracing::debug!("{} returned {} tags", kind, tags.len());
        Ok(self.apply_resolvers(tags))
    }

    fn apply_resolvers(&self, tags: Vec<TagRecord>) -> Vec<TagRecord> {
        if self.resolvers.is_empty() {
            return tags;
        }

        let mut prepended = Vec::new();
        let mut results = Vec::with_capacity(tags.len());
        for tag in tags {
            let derived: Vec<_> = self
                .resolvers
                .iter()
                .filter_map(|(resolve, placement)| resolve(&tag).map(|t| (t, *placement)))
                .collect();
            results.push(tag);
            for (extra, placement) in derived {
                match placement {
                    GenfilePlacement::Prepend => prepended.push(extra),
                    GenfilePlacement::Append => results.push(extra),
                }
            }
        }
        prepended.extend(results);
        prepended
    }
}
