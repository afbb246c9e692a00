//! Endpoint selection and failover

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use crate::error::{Result, TagsError};
use crate::lang::CallType;

use super::endpoint::Endpoint;
use super::mixer::{Mixer, MixerSettings};
use super::transport::{TcpTransport, Timeouts, Transport};

/// Selection state for one (language, call type) pair.
#[derive(Debug, Clone, Default)]
struct Cursor {
    current: Option<Endpoint>,
    /// Index of the first endpoint not yet handed out
    next_index: usize,
}

/// Routes commands to tags servers.
///
/// For each (language, call type) pair the manager keeps an ordered list of
/// candidate endpoints and a cursor into it. A failed endpoint moves the
/// cursor forward and the command is retried on the next candidate; the
/// cursor never moves back, so later calls start from the endpoint that last
/// worked. Only adding or removing endpoints for a pair resets its cursor.
///
/// When the mixer is enabled (and no proxy is set) all commands go to the
/// local mixer instead.
#[derive(Debug)]
pub struct ConnectionManager<T: Transport = TcpTransport> {
    servers: HashMap<CallType, HashMap<String, Vec<Endpoint>>>,
    cursors: HashMap<CallType, HashMap<String, Cursor>>,
    timeouts: Timeouts,
    proxy: Option<Endpoint>,
    mixer: Mixer,
    transport: T,
}

impl ConnectionManager<TcpTransport> {
    pub fn new() -> Self {
        Self::with_transport(TcpTransport)
    }
}

impl Default for ConnectionManager<TcpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> ConnectionManager<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            servers: HashMap::new(),
            cursors: HashMap::new(),
            timeouts: Timeouts::default(),
            proxy: None,
            mixer: Mixer::default(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    pub fn set_timeouts(&mut self, timeouts: Timeouts) {
        self.timeouts = timeouts;
    }

    // ------------------------------------------------------------------
    // Endpoint lists
    // ------------------------------------------------------------------

    /// Append an endpoint to the candidate list.
    pub fn add_server(&mut self, language: &str, call_type: CallType, endpoint: Endpoint) {
        tracing::debug!("Adding {} server for {}: {}", call_type, language, endpoint);
        self.servers
            .entry(call_type)
            .or_default()
            .entry(language.to_string())
            .or_default()
            .push(endpoint);
        self.reset_cursor(language, call_type);
    }

    /// Remove the first matching endpoint. Returns whether one was removed.
    pub fn remove_server(&mut self, language: &str, call_type: CallType, endpoint: &Endpoint) -> bool {
        let Some(list) = self
            .servers
            .get_mut(&call_type)
            .and_then(|langs| langs.get_mut(language))
        else {
            return false;
        };
        let Some(pos) = list.iter().position(|e| e == endpoint) else {
            return false;
        };
        list.remove(pos);
        self.reset_cursor(language, call_type);
        true
    }

    pub fn servers(&self, language: &str, call_type: CallType) -> &[Endpoint] {
        self.servers
            .get(&call_type)
            .and_then(|langs| langs.get(language))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn reset_cursor(&mut self, language: &str, call_type: CallType) {
        if let Some(langs) = self.cursors.get_mut(&call_type) {
            langs.remove(language);
        }
    }

    fn cursor(&mut self, language: &str, call_type: CallType) -> &mut Cursor {
        self.cursors
            .entry(call_type)
            .or_default()
            .entry(language.to_string())
            .or_default()
    }

    /// The endpoint currently in use, selecting the first untried one if
    /// nothing has been selected yet.
    pub fn selected_server(&mut self, language: &str, call_type: CallType) -> Result<Endpoint> {
        if let Some(current) = &self.cursor(language, call_type).current {
            return Ok(current.clone());
        }
        self.next_server(language, call_type)
    }

    /// Advance to the next untried endpoint.
    pub fn next_server(&mut self, language: &str, call_type: CallType) -> Result<Endpoint> {
        let candidates = self.servers(language, call_type).to_vec();
        if candidates.is_empty() {
            return Err(TagsError::NoConfiguredServers {
                language: language.to_string(),
                call_type: call_type.to_string(),
            });
        }

        let cursor = self.cursor(language, call_type);
        let Some(endpoint) = candidates.get(cursor.next_index).cloned() else {
            return Err(TagsError::NoAvailableServer {
                language: language.to_string(),
                call_type: call_type.to_string(),
            });
        };
        cursor.next_index += 1;
        cursor.current = Some(endpoint.clone());

        tracing::info!("Selected {} server for {}: {}", call_type, language, endpoint);
        Ok(endpoint)
    }

    // ------------------------------------------------------------------
    // Proxy and mixer
    // ------------------------------------------------------------------

    /// Send everything to a single explicit endpoint. Disables the mixer path.
    pub fn set_proxy(&mut self, proxy: Option<Endpoint>) {
        self.proxy = proxy;
    }

    pub fn proxy(&self) -> Option<&Endpoint> {
        self.proxy.as_ref()
    }

    pub fn mixer_settings(&self) -> &MixerSettings {
        &self.mixer.settings
    }

    /// Replace all mixer settings. A port change forgets any earlier launch.
    pub fn set_mixer_settings(&mut self, settings: MixerSettings) {
        self.mixer.set_port(settings.port);
        self.mixer.settings = settings;
    }

    pub fn set_use_mixer(&mut self, enabled: bool) {
        self.mixer.settings.enabled = enabled;
    }

    /// Point at a different mixer port. Only a real change invalidates the
    /// launched flag, so the next request spawns a mixer on the new port.
    pub fn set_mixer_port(&mut self, port: u16) {
        self.mixer.set_port(port);
    }

    pub fn mixer_launched(&self) -> bool {
        self.mixer.launched
    }

    /// Forget that a mixer was launched; the next mixer request spawns one.
    pub fn invalidate_mixer(&mut self) {
        self.mixer.launched = false;
    }

    /// Start a fresh mixer that replaces any running instance.
    pub fn restart_mixer(&mut self) -> Result<()> {
        self.mixer.restart()
    }

    fn uses_mixer(&self) -> bool {
        self.mixer.settings.enabled && self.proxy.is_none()
    }

    // ------------------------------------------------------------------
    // Sending
    // ------------------------------------------------------------------

    /// Send a command using the manager's timeouts and return the raw reply.
    pub fn send_command(&mut self, language: &str, call_type: CallType, command: &str) -> Result<String> {
        let timeouts = self.timeouts;
        self.send(language, call_type, command, timeouts)
    }

    /// Send with a one-off data timeout; `None` waits indefinitely.
    pub fn send_command_with_timeout(
        &mut self,
        language: &str,
        call_type: CallType,
        command: &str,
        data_timeout: Option<Duration>,
    ) -> Result<String> {
        let timeouts = Timeouts {
            data: data_timeout,
            ..self.timeouts
        };
        self.send(language, call_type, command, timeouts)
    }

    fn send(&mut self, language: &str, call_type: CallType, command: &str, timeouts: Timeouts) -> Result<String> {
        tracing::debug!("Sending to {} {} server: {}", language, call_type, command);

        if self.uses_mixer() {
            return self.send_via_mixer(command, &timeouts);
        }
        if let Some(proxy) = self.proxy.clone() {
            return self.send_via_proxy(&proxy, language, call_type, command, &timeouts);
        }

        loop {
            let endpoint = self.selected_server(language, call_type)?;
            match self.transport.exchange(&endpoint, command, &timeouts) {
                Ok(reply) => return Ok(reply),
                Err(e) => {
                    tracing::warn!("Tags server {} failed ({}), trying next", endpoint, e);
                    self.next_server(language, call_type)?;
                }
            }
        }
    }

    fn send_via_mixer(&mut self, command: &str, timeouts: &Timeouts) -> Result<String> {
        self.mixer.ensure_launched();
        let endpoint = Endpoint::localhost(self.mixer.settings.port);

        let mut attempt = 0;
        loop {
            match self.transport.exchange(&endpoint, command, timeouts) {
                Ok(reply) => return Ok(reply),
                Err(e) if attempt < self.mixer.settings.retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Mixer at {} failed ({}), retry {}/{}",
                        endpoint,
                        e,
                        attempt,
                        self.mixer.settings.retries
                    );
                    thread::sleep(self.mixer.settings.retry_delay);
                }
                Err(e) => {
                    return Err(TagsError::Transport {
                        endpoint: endpoint.to_string(),
                        source: e,
                    })
                }
            }
        }
    }

    fn send_via_proxy(
        &self,
        proxy: &Endpoint,
        language: &str,
        call_type: CallType,
        command: &str,
        timeouts: &Timeouts,
    ) -> Result<String> {
        self.transport
            .exchange(proxy, command, timeouts)
            .map_err(|e| {
                tracing::warn!("Proxy {} failed: {}", proxy, e);
                TagsError::NoAvailableServer {
                    language: language.to_string(),
                    call_type: call_type.to_string(),
                }
            })
    }
}
