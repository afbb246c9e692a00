//! Command modules for the semfora-tags CLI
//!
//! ## Architecture
//!
//! - `query` - `lookup` and `file` tag queries
//! - `status` - `ping`, `reload`, `update` and `restart-mixer`
//! - `convert` - etags to TAGS conversion and `inspect`
//! - `callgraph` - call-site extraction
//!
//! Every handler takes its `Args` struct from `cli.rs` and the shared
//! [`CommandContext`], and returns the text to print on stdout.

pub mod callgraph;
pub mod convert;
pub mod query;
pub mod status;

pub use callgraph::run_callgraph;
pub use convert::{run_convert, run_inspect};
pub use query::{run_file, run_lookup, run_resolve};
pub use status::{run_ping, run_ports, run_reload, run_restart_mixer, run_update};

use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::{Cli, OutputFormat};
use crate::config::ClientConfig;
use crate::connection::Endpoint;
use crate::convert::{grep_line, long_list_line, short_list_line, vi_tag_line};
use crate::error::{Result, TagsError};
use crate::lang::{CallType, Language};
use crate::protocol::TagRecord;
use crate::query::TagsClient;
use crate::sexp::Sexp;

/// Column where `--format long` starts the tag name
pub const LONG_LIST_WIDTH: usize = 80;

/// Shared context passed to all command handlers
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub format: OutputFormat,
    pub verbose: bool,
    /// Loaded config with `--corpus` already applied
    pub config: ClientConfig,
    /// Wire language name
    pub language: String,
    pub call_type: CallType,
    /// `--server` endpoints, registered after the configured ones
    pub servers: Vec<Endpoint>,
    pub proxy: Option<Endpoint>,
    pub mixer: bool,
    pub current_file: Option<String>,
}

impl CommandContext {
    /// Load the config named on the command line (or the default) and apply overrides.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => ClientConfig::load_from(path)?,
            None => ClientConfig::load()?,
        };
        Self::with_config(cli, config)
    }

    pub fn with_config(cli: &Cli, mut config: ClientConfig) -> Result<Self> {
        if let Some(corpus) = &cli.corpus {
            config.corpus = corpus.clone();
        }

        let language = wire_language(cli.language.as_deref().unwrap_or(&config.default_language));
        let servers = cli
            .servers
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<Endpoint>>>()?;
        let proxy = cli
            .proxy
            .as_deref()
            .map(str::parse::<Endpoint>)
            .transpose()?;

        Ok(Self {
            format: cli.format,
            verbose: cli.verbose,
            config,
            language,
            call_type: CallType::from_callers(cli.callers),
            servers,
            proxy,
            mixer: cli.mixer,
            current_file: cli.current_file.clone(),
        })
    }

    /// Build a client from the config plus command-line overrides.
    pub fn client(&self) -> Result<TagsClient> {
        let mut client = self.config.build_client()?;
        client.set_current_file(self.current_file.clone());

        let manager = client.manager_mut();
        for endpoint in &self.servers {
            manager.add_server(&self.language, self.call_type, endpoint.clone());
        }
        if self.proxy.is_some() {
            manager.set_proxy(self.proxy.clone());
        }
        if self.mixer {
            manager.set_use_mixer(true);
        }
        Ok(client)
    }
}

/// Canonical wire name for known languages and editor filetypes; anything
/// else is passed through so unlisted languages can still be served.
pub fn wire_language(name: &str) -> String {
    name.parse::<Language>()
        .ok()
        .or_else(|| Language::from_editor_filetype(name))
        .map(|lang| lang.name().to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Encode a JSON value as proper TOON using the rtoon library
pub fn encode_toon(value: &Value) -> String {
    rtoon::encode_default(value).unwrap_or_else(|e| format!("TOON encoding error: {}", e))
}

pub fn to_json_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| TagsError::Output {
        message: format!("JSON serialization failed: {}", e),
    })
}

pub fn to_json_pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| TagsError::Output {
        message: format!("JSON serialization failed: {}", e),
    })
}

/// `t` is true, `nil` is null, other symbols become strings.
pub fn sexp_to_json(value: &Sexp) -> Value {
    match value {
        Sexp::String(s) => Value::String(s.clone()),
        Sexp::Integer(n) => json!(n),
        Sexp::Symbol(s) if s == "t" => Value::Bool(true),
        Sexp::Symbol(s) if s == "nil" => Value::Null,
        Sexp::Symbol(s) => Value::String(s.clone()),
        Sexp::List(items) => Value::Array(items.iter().map(sexp_to_json).collect()),
    }
}

/// Render a structured summary: `key: value` lines for text-like formats.
pub fn render_object(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", to_json_pretty(value)?)),
        OutputFormat::Toon => Ok(format!("{}\n", encode_toon(value))),
        OutputFormat::Text | OutputFormat::Vi | OutputFormat::Grep | OutputFormat::Long => {
            let mut out = String::new();
            if let Value::Object(map) = value {
                for (key, v) in map {
                    match v {
                        Value::String(s) => out.push_str(&format!("{}: {}\n", key, s)),
                        other => out.push_str(&format!("{}: {}\n", key, other)),
                    }
                }
            }
            Ok(out)
        }
    }
}

pub fn render_tags(tags: &[TagRecord], format: OutputFormat) -> Result<String> {
    let lines = |render: fn(&TagRecord) -> String| -> String {
        tags.iter().map(|t| render(t) + "\n").collect()
    };

    match format {
        OutputFormat::Text => Ok(lines(short_list_line)),
        OutputFormat::Vi => Ok(lines(vi_tag_line)),
        OutputFormat::Grep => Ok(lines(grep_line)),
        OutputFormat::Long => Ok(tags
            .iter()
            .map(|t| long_list_line(t, LONG_LIST_WIDTH) + "\n")
            .collect()),
        OutputFormat::Json => Ok(format!("{}\n", to_json_pretty(&to_json_value(&tags)?)?)),
        OutputFormat::Toon => {
            let value = json!({
                "count": tags.len(),
                "tags": to_json_value(&tags)?,
            });
            Ok(format!("{}\n", encode_toon(&value)))
        }
    }
}

pub fn render_names(names: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", to_json_pretty(&json!(names))?)),
        OutputFormat::Toon => Ok(format!("{}\n", encode_toon(&json!({ "names": names })))),
        _ => Ok(names.iter().map(|n| format!("{}\n", n)).collect()),
    }
}
