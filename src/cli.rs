//! CLI argument definitions using clap with subcommand architecture
//!
//! Global options pick the server family (`--language`, `--callers`) and
//! override the config file (`--corpus`, `--server`, `--proxy`, `--mixer`).

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::CONFIG_ENV;

/// Tag lookups against remote tags servers, and TAGS file tooling
#[derive(Parser, Debug)]
#[command(name = "semfora-tags")]
#[command(about = "Look up tags on remote tags servers and build TAGS files")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (applies to all commands)
    #[arg(short, long, default_value = "text", value_enum, global = true)]
    pub format: OutputFormat,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of the platform default
    #[arg(long, value_name = "PATH", env = CONFIG_ENV, global = true)]
    pub config: Option<PathBuf>,

    /// Language of the servers to ask (c++, java, python, or any served name)
    #[arg(short, long, global = true)]
    pub language: Option<String>,

    /// Corpus name sent with every command
    #[arg(long, global = true)]
    pub corpus: Option<String>,

    /// Ask the callgraph servers instead of the definition servers
    #[arg(long, global = true)]
    pub callers: bool,

    /// Extra server for the selected language, tried after configured ones
    #[arg(long = "server", value_name = "HOST:PORT", global = true)]
    pub servers: Vec<String>,

    /// Send every command through this endpoint
    #[arg(long, value_name = "HOST:PORT", global = true)]
    pub proxy: Option<String>,

    /// Route commands through a local mixer
    #[arg(long, global = true)]
    pub mixer: bool,

    /// File being edited, sent as context with each command
    #[arg(long, value_name = "PATH", global = true)]
    pub current_file: Option<String>,
}

// ============================================
// Main Commands Enum
// ============================================

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up a tag by name, name prefix regexp, or snippet regexp
    #[command(visible_alias = "l")]
    Lookup(LookupArgs),

    /// List every tag defined in a file
    File(FileArgs),

    /// Check that a server for the selected language answers
    Ping,

    /// Ask the server to reload its tag file
    Reload(ServerFileArgs),

    /// Ask the server to apply an incremental update file
    Update(ServerFileArgs),

    /// Restart the local mixer
    RestartMixer,

    /// List the conventional server port and tag file of each language
    Ports,

    /// Map a `gtags://` name from a tag result to a local file
    Resolve(ResolveArgs),

    /// Convert etags output into a TAGS file
    Convert(ConvertArgs),

    /// Summarize a TAGS file
    Inspect(InspectArgs),

    /// Extract call sites from source files as etags text
    Callgraph(CallgraphArgs),
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Tag name, or pattern with --regexp / --snippet
    #[arg(value_name = "TAG")]
    pub tag: String,

    /// Treat TAG as a regular expression matched against tag-name prefixes
    #[arg(long, conflicts_with = "snippet")]
    pub regexp: bool,

    /// Treat TAG as a regular expression matched against source lines
    #[arg(long)]
    pub snippet: bool,

    /// Print only the sorted, unique tag names (for completion)
    #[arg(long)]
    pub names: bool,

    /// Write the hits to this vi tags file instead of printing them
    #[arg(long, value_name = "PATH", conflicts_with = "names")]
    pub tags_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Name as it appears in tag output, with or without `gtags://`
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Project checkout searched before the current directory
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct FileArgs {
    /// Path as known to the server
    #[arg(value_name = "PATH")]
    pub path: String,
}

#[derive(Args, Debug)]
pub struct ServerFileArgs {
    /// Path on the server host
    #[arg(value_name = "FILE")]
    pub file: String,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Etags file to read, or '-' for stdin
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// TAGS file to write, or '-' for stdout
    #[arg(short, long, default_value = "-")]
    pub output: String,

    /// Guess each file's language from its extension, falling back to --language
    #[arg(long)]
    pub guess_language: bool,

    /// File listing paths to emit as deleted, one per line
    #[arg(long, value_name = "PATH")]
    pub deletion_list: Option<PathBuf>,

    /// Omit the TAGS header (for update files)
    #[arg(long)]
    pub no_header: bool,

    /// Header timestamp in seconds since the epoch (defaults to now)
    #[arg(long)]
    pub timestamp: Option<u64>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// TAGS file to read
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct CallgraphArgs {
    /// Source files to scan
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Etags file to write, or '-' for stdout
    #[arg(short, long, default_value = "TAGSR")]
    pub output: String,

    /// Append to the output instead of replacing it
    #[arg(long)]
    pub append: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `file|line| snippet` lines
    #[default]
    Text,
    /// TOON (Token-Oriented Object Notation)
    Toon,
    /// JSON for machine parsing
    Json,
    /// vi tags file lines
    Vi,
    /// `gtags://file|line|snippet` grep lines
    Grep,
    /// `file|line|` padded to a fixed column, then tag and snippet
    Long,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
