use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TagsError};

/// A `(host, port)` pair a tags server listens on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn localhost(port: u16) -> Self {
        Self::new("localhost", port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = TagsError;

    /// Parse `host:port`.
    fn from_str(s: &str) -> Result<Self> {
        let (host, port) = s.rsplit_once(':').ok_or_else(|| TagsError::Config {
            message: format!("expected host:port, got '{}'", s),
        })?;
        if host.is_empty() {
            return Err(TagsError::Config {
                message: format!("missing host in '{}'", s),
            });
        }
        let port = port.parse::<u16>().map_err(|_| TagsError::Config {
            message: format!("invalid port in '{}'", s),
        })?;
        Ok(Self::new(host, port))
    }
}
