//! Outgoing command encoding

use std::fmt;

use crate::lang::CallType;
use crate::sexp::quote;

/// Protocol revision spoken by this client.
pub const PROTOCOL_VERSION: u32 = 2;

/// Version reported in `(client-version N)`.
pub const CLIENT_VERSION: u32 = 3;

/// Default `(client-type "...")` identifier.
pub const CLIENT_TYPE: &str = "semfora";

/// Commands understood by tags servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Ping,
    LookupTagExact,
    LookupTagPrefixRegexp,
    LookupTagSnippetRegexp,
    LookupTagsInFile,
    ReloadTagsFile,
    LoadUpdateFile,
}

impl CommandKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::LookupTagExact => "lookup-tag-exact",
            Self::LookupTagPrefixRegexp => "lookup-tag-prefix-regexp",
            Self::LookupTagSnippetRegexp => "lookup-tag-snippet-regexp",
            Self::LookupTagsInFile => "lookup-tags-in-file",
            Self::ReloadTagsFile => "reload-tags-file",
            Self::LoadUpdateFile => "load-update-file",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of a command parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(&quote(s)),
            Self::Int(n) => write!(f, "{}", n),
        }
    }
}

/// One `(name value)` clause appended after the fixed header clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub value: ParamValue,
}

impl Param {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: ParamValue::Text(value.into()),
        }
    }

    pub fn int(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value: ParamValue::Int(value),
        }
    }
}

/// Who is asking: sent with every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub client_type: String,
    pub client_version: u32,
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self {
            client_type: CLIENT_TYPE.to_string(),
            client_version: CLIENT_VERSION,
        }
    }
}

/// Everything needed to render one command line.
#[derive(Debug, Clone)]
pub struct CommandRequest<'a> {
    pub command: &'a str,
    pub params: &'a [Param],
    pub language: &'a str,
    pub call_type: CallType,
    pub client: &'a ClientIdentity,
    pub corpus: &'a str,
    pub current_file: Option<&'a str>,
}

impl CommandRequest<'_> {
    /// Render as a single-line s-expression (no line terminator).
    ///
    /// ```
    /// use semfora_tags::lang::CallType;
    /// use semfora_tags::protocol::{ClientIdentity, CommandRequest};
    ///
    /// let client = ClientIdentity { client_type: "python".into(), client_version: 3 };
    /// let line = CommandRequest {
    ///     command: "ping",
    ///     params: &[],
    ///     language: "c++",
    ///     call_type: CallType::Definition,
    ///     client: &client,
    ///     corpus: "google3",
    ///     current_file: None,
    /// }
    /// .build();
    /// assert!(line.contains("(callers nil)"));
    /// ```
    pub fn build(&self) -> String {
        let mut out = format!(
            "({} (client-type {}) (client-version {}) (protocol-version {}) (corpus {}) (language {}) (callers {})",
            self.command,
            quote(&self.client.client_type),
            self.client.client_version,
            PROTOCOL_VERSION,
            quote(self.corpus),
            quote(self.language),
            if self.call_type.is_callgraph() { "t" } else { "nil" },
        );
        if let Some(file) = self.current_file {
            out.push_str(&format!(" (current-file {})", quote(file)));
        }
        for param in self.params {
            out.push_str(&format!(" ({} {})", param.name, param.value));
        }
        out.push(')');
        out
    }
}
