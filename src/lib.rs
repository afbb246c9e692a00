//! semfora-tags: client library for remote tags servers
//!
//! The crate talks to tags servers over a line-oriented TCP protocol whose
//! messages are s-expressions, and builds the TAGS files those servers load.
//!
//! # Layers
//!
//! - [`sexp`]: s-expression values, parser and string quoting
//! - [`protocol`]: command builder and response decoder
//! - [`connection`]: endpoint tables, failover, proxy and mixer routing
//! - [`query`]: [`TagsClient`], the query context editors talk to
//! - [`convert`]: etags to TAGS conversion, call-site extraction, vi tags
//! - [`config`]: TOML client configuration
//!
//! # Example
//!
//! ```no_run
//! use semfora_tags::{CallType, ConnectionManager, Endpoint, TagsClient};
//!
//! let mut manager = ConnectionManager::new();
//! manager.add_server("c++", CallType::Definition, Endpoint::new("tags1", 2223));
//! manager.add_server("c++", CallType::Definition, Endpoint::new("tags2", 2223));
//!
//! let mut client = TagsClient::new(manager);
//! for tag in client.find_exact_tag("c++", CallType::Definition, "ParseFromString")? {
//!     println!("{}:{}: {}", tag.filename, tag.line, tag.snippet);
//! }
//! # Ok::<(), semfora_tags::TagsError>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod connection;
pub mod convert;
pub mod error;
pub mod fs_utils;
pub mod lang;
pub mod protocol;
pub mod query;
pub mod sexp;

// Re-export commonly used types
pub use cli::{Cli, Commands, OutputFormat};
pub use config::ClientConfig;
pub use connection::{ConnectionManager, Endpoint, TcpTransport, Timeouts, Transport};
pub use error::{Result, TagsError};
pub use lang::{CallType, Language};
pub use protocol::{ClientIdentity, CommandKind, Param, TagRecord};
pub use query::{GenfilePlacement, SharedTagsClient, TagsClient};
pub use sexp::Sexp;
