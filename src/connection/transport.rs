//! One request/response exchange with a single endpoint

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::endpoint::Endpoint;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DATA_TIMEOUT: Duration = Duration::from_secs(50);

/// Connect and data timeouts applied to every exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    /// `None` waits for the peer to close no matter how long it takes
    pub data: Option<Duration>,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: DEFAULT_CONNECT_TIMEOUT,
            data: Some(DEFAULT_DATA_TIMEOUT),
        }
    }
}

/// Sends one command to one endpoint and returns the raw reply.
///
/// Any `Err` is treated by the connection manager as a transport failure of
/// that endpoint.
pub trait Transport {
    fn exchange(&self, endpoint: &Endpoint, command: &str, timeouts: &Timeouts) -> io::Result<String>;
}

/// Blocking TCP transport speaking the line protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpTransport;

impl TcpTransport {
    fn connect(endpoint: &Endpoint, timeout: Duration) -> io::Result<TcpStream> {
        let mut last_err = None;
        for addr in (endpoint.host.as_str(), endpoint.port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} did not resolve to any address", endpoint.host),
            )
        }))
    }
}

impl Transport for TcpTransport {
    fn exchange(&self, endpoint: &Endpoint, command: &str, timeouts: &Timeouts) -> io::Result<String> {
        let mut stream = Self::connect(endpoint, timeouts.connect)?;
        stream.set_read_timeout(timeouts.data)?;
        stream.set_write_timeout(timeouts.data)?;

        // Legacy servers are line oriented and expect telnet-style CRLF.
        stream.write_all(command.as_bytes())?;
        stream.write_all(b"\r\n")?;
        stream.flush()?;

        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            match stream.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => data.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e)
                    if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
                        && !data.is_empty() =>
                {
                    tracing::debug!(
                        "Data timeout from {} after {} bytes, using what arrived",
                        endpoint,
                        data.len()
                    );
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(decode_reply(&data))
    }
}

/// Reply bytes as text for the s-expression codec.
///
/// Invalid UTF-8 becomes U+FFFD instead of failing the whole reply, so a
/// `TagRecord` snippet from the wire is not byte-exact for such lines.
pub fn decode_reply(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}
