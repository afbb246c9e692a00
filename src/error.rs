//! Error types and exit codes for semfora-tags

use std::io;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for semfora-tags operations
#[derive(Error, Debug)]
pub enum TagsError {
    /// Malformed s-expression text
    #[error("Unparseable s-expression: {message}")]
    Parse { message: String },

    /// A single connect/send/receive attempt failed
    #[error("Transport error talking to {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    /// Every candidate endpoint was tried and failed
    #[error("No tags server available for {language} ({call_type})")]
    NoAvailableServer { language: String, call_type: String },

    /// No endpoint was ever registered for the key
    #[error("No tags servers configured for {language} ({call_type})")]
    NoConfiguredServers { language: String, call_type: String },

    /// The server answered with an `(error ...)` payload
    #[error("{message}")]
    Server { message: String },

    /// Response shape does not match the protocol version we speak
    #[error("Protocol violation: {message}")]
    Precondition { message: String },

    /// Etags input that cannot be converted
    #[error("Malformed etags input at line {line}: {message}")]
    MalformedEtags { line: usize, message: String },

    #[error("Unsupported language: {name}")]
    UnsupportedLanguage { name: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Rendering results for output failed
    #[error("Output error: {message}")]
    Output { message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl TagsError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// True for failures that come from the network rather than the request.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::NoAvailableServer { .. } | Self::NoConfiguredServers { .. }
        )
    }

    /// True when the server itself rejected the request.
    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// Convert error to appropriate exit code:
    /// - 0: Success
    /// - 1: File not found / IO or output error
    /// - 2: Unsupported language / configuration
    /// - 3: Parse failure, malformed input or protocol violation
    /// - 4: Server rejected the request
    /// - 5: No server reachable
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::FileNotFound { .. } => ExitCode::from(1),
            Self::Io(_) => ExitCode::from(1),
            Self::Output { .. } => ExitCode::from(1),
            Self::UnsupportedLanguage { .. } => ExitCode::from(2),
            Self::Config { .. } => ExitCode::from(2),
            Self::Parse { .. } => ExitCode::from(3),
            Self::Precondition { .. } => ExitCode::from(3),
            Self::MalformedEtags { .. } => ExitCode::from(3),
            Self::Server { .. } => ExitCode::from(4),
            Self::Transport { .. } => ExitCode::from(5),
            Self::NoAvailableServer { .. } => ExitCode::from(5),
            Self::NoConfiguredServers { .. } => ExitCode::from(5),
        }
    }
}

/// Result type alias for semfora-tags operations
pub type Result<T> = std::result::Result<T, TagsError>;
