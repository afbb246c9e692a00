//! Client configuration management.
//!
//! Handles the semfora-tags configuration file at:
//! - Linux: ~/.config/semfora-tags/config.toml
//! - macOS: ~/Library/Application Support/semfora-tags/config.toml
//! - Windows: %APPDATA%\semfora-tags\config.toml
//!
//! ```toml
//! corpus = "google3"
//! default_language = "c++"
//! proxy = "tagsproxy:8080"
//!
//! [timeouts]
//! connect_secs = 10
//! data_secs = 50
//!
//! [mixer]
//! enabled = false
//! port = 2220
//!
//! [[servers]]
//! language = "c++"
//! call_type = "definition"
//! host = "tags1.example.com"
//! port = 2223
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::connection::{
    ConnectionManager, Endpoint, MixerSettings, Timeouts, Transport, DEFAULT_MIXER_COMMAND,
    DEFAULT_MIXER_PORT,
};
use crate::error::{Result, TagsError};
use crate::fs_utils;
use crate::lang::CallType;
use crate::protocol::{ClientIdentity, CLIENT_TYPE, CLIENT_VERSION};
use crate::query::{TagsClient, DEFAULT_CORPUS};

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "SEMFORA_TAGS_CONFIG";

/// Environment variable consulted when the file sets no proxy
pub const PROXY_ENV: &str = "GTAGS_PROXY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_corpus")]
    pub corpus: String,

    #[serde(default = "default_client_type")]
    pub client_type: String,

    #[serde(default = "default_language")]
    pub default_language: String,

    /// `host:port` every command is sent to instead of the server lists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    #[serde(default)]
    pub timeouts: TimeoutConfig,

    #[serde(default)]
    pub mixer: MixerConfig,

    #[serde(default)]
    pub servers: Vec<ServerEntry>,
}

fn default_corpus() -> String {
    DEFAULT_CORPUS.to_string()
}

fn default_client_type() -> String {
    CLIENT_TYPE.to_string()
}

fn default_language() -> String {
    "c++".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            corpus: default_corpus(),
            client_type: default_client_type(),
            default_language: default_language(),
            proxy: None,
            timeouts: TimeoutConfig::default(),
            mixer: MixerConfig::default(),
            servers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_connect_secs")]
    pub connect_secs: u64,
    /// 0 disables the data timeout
    #[serde(default = "default_data_secs")]
    pub data_secs: u64,
}

fn default_connect_secs() -> u64 {
    10
}

fn default_data_secs() -> u64 {
    50
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: default_connect_secs(),
            data_secs: default_data_secs(),
        }
    }
}

impl TimeoutConfig {
    pub fn to_timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_secs(self.connect_secs),
            data: (self.data_secs > 0).then(|| Duration::from_secs(self.data_secs)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixerConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_mixer_port")]
    pub port: u16,
    #[serde(default = "default_mixer_command")]
    pub command: String,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_mixer_port() -> u16 {
    DEFAULT_MIXER_PORT
}

fn default_mixer_command() -> String {
    DEFAULT_MIXER_COMMAND.to_string()
}

fn default_settle_ms() -> u64 {
    1000
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_mixer_port(),
            command: default_mixer_command(),
            settle_ms: default_settle_ms(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl MixerConfig {
    pub fn to_settings(&self) -> MixerSettings {
        MixerSettings {
            enabled: self.enabled,
            port: self.port,
            command: self.command.clone(),
            settle_delay: Duration::from_millis(self.settle_ms),
            retries: self.retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// One candidate server, registered in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub language: String,
    pub call_type: CallType,
    pub host: String,
    pub port: u16,
}

impl ClientConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|d| d.join("semfora-tags").join("config.toml"))
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| TagsError::Config {
            message: format!("Failed to parse config: {}", e),
        })
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| TagsError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;
        fs_utils::write_atomic(path, content.as_bytes())?;
        Ok(())
    }

    /// Proxy from the file, falling back to `GTAGS_PROXY`.
    pub fn effective_proxy(&self) -> Result<Option<Endpoint>> {
        let raw = self
            .proxy
            .clone()
            .or_else(|| std::env::var(PROXY_ENV).ok())
            .filter(|p| !p.trim().is_empty());
        raw.map(|p| p.trim().parse()).transpose()
    }

    pub fn identity(&self) -> ClientIdentity {
        ClientIdentity {
            client_type: self.client_type.clone(),
            client_version: CLIENT_VERSION,
        }
    }

    /// Apply timeouts, mixer, proxy and servers to a manager.
    pub fn configure<T: Transport>(&self, manager: &mut ConnectionManager<T>) -> Result<()> {
        manager.set_timeouts(self.timeouts.to_timeouts());
        manager.set_mixer_settings(self.mixer.to_settings());
        manager.set_proxy(self.effective_proxy()?);
        for server in &self.servers {
            manager.add_server(
                &server.language,
                server.call_type,
                Endpoint::new(server.host.clone(), server.port),
            );
        }
        Ok(())
    }

    pub fn build_manager(&self) -> Result<ConnectionManager> {
        let mut manager = ConnectionManager::new();
        self.configure(&mut manager)?;
        Ok(manager)
    }

    pub fn build_client(&self) -> Result<TagsClient> {
        Ok(TagsClient::new(self.build_manager()?)
            .with_identity(self.identity())
            .with_corpus(self.corpus.clone()))
    }
}
