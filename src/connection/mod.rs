//! Tags server connections
//!
//! # Routing
//!
//! ```text
//!   send_command(language, call_type, command)
//!        │
//!        ├── mixer enabled, no proxy ──► localhost:<mixer port>  (spawn once, bounded retry)
//!        ├── proxy set ─────────────────► proxy endpoint          (single attempt)
//!        └── otherwise ─────────────────► endpoint list for (language, call_type)
//!                                          selected ──fail──► next ──fail──► ... ► NoAvailableServer
//! ```
//!
//! All I/O is blocking and sequential; there is no fan-out across endpoints.

pub mod endpoint;
pub mod manager;
pub mod mixer;
pub mod transport;

pub use endpoint::Endpoint;
pub use manager::ConnectionManager;
pub use mixer::{MixerSettings, DEFAULT_MIXER_COMMAND, DEFAULT_MIXER_PORT};
pub use transport::{
    TcpTransport, Timeouts, Transport, DEFAULT_CONNECT_TIMEOUT, DEFAULT_DATA_TIMEOUT,
};
