//! Local aggregating proxy ("mixer") process management
//!
//! The mixer fans a client's queries out to the backend servers itself, so
//! when it is in use every command goes to `localhost:<port>` instead of
//! walking the endpoint lists.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use crate::error::{Result, TagsError};

pub const DEFAULT_MIXER_PORT: u16 = 2220;
pub const DEFAULT_MIXER_COMMAND: &str = "gtagsmixer";
pub const DEFAULT_MIXER_SETTLE: Duration = Duration::from_millis(1000);
pub const DEFAULT_MIXER_RETRIES: u32 = 3;
pub const DEFAULT_MIXER_RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixerSettings {
    pub enabled: bool,
    pub port: u16,
    /// Binary name (looked up on `PATH`) or path of the mixer
    pub command: String,
    /// Pause after spawning before the first request
    pub settle_delay: Duration,
    /// Extra attempts after the first failed request
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for MixerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            port: DEFAULT_MIXER_PORT,
            command: DEFAULT_MIXER_COMMAND.to_string(),
            settle_delay: DEFAULT_MIXER_SETTLE,
            retries: DEFAULT_MIXER_RETRIES,
            retry_delay: DEFAULT_MIXER_RETRY_DELAY,
        }
    }
}

/// Mixer settings plus the once-per-lifetime launch flag.
#[derive(Debug, Default)]
pub(crate) struct Mixer {
    pub(crate) settings: MixerSettings,
    pub(crate) launched: bool,
    /// Spawns tried by `ensure_launched`, successful or not
    pub(crate) launch_attempts: u32,
}

impl Mixer {
    /// Spawn the mixer the first time it is needed. A failed spawn is only
    /// logged; the request is still sent to the mixer port.
    pub(crate) fn ensure_launched(&mut self) {
        if self.launched {
            return;
        }
        self.launched = true;
        self.launch_attempts += 1;

        if let Err(e) = self.spawn(&[]) {
            tracing::warn!("Could not start mixer '{}': {}", self.settings.command, e);
            return;
        }
        thread::sleep(self.settings.settle_delay);
    }

    /// Start a mixer that takes over from any running instance.
    pub(crate) fn restart(&mut self) -> Result<()> {
        self.spawn(&["--replace"])?;
        self.launched = true;
        thread::sleep(self.settings.settle_delay);
        Ok(())
    }

    /// Change the port; a new port means a new mixer must be launched.
    pub(crate) fn set_port(&mut self, port: u16) {
        if port != self.settings.port {
            self.settings.port = port;
            self.launched = false;
        }
    }

    fn spawn(&self, extra_args: &[&str]) -> Result<()> {
        let program = resolve_program(&self.settings.command);
        tracing::info!("Launching mixer {} on port {}", program.display(), self.settings.port);

        // Detached: the mixer outlives this client, nothing waits on it.
        Command::new(&program)
            .arg(format!("--port={}", self.settings.port))
            .args(extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|e| TagsError::Config {
                message: format!("failed to launch mixer {}: {}", program.display(), e),
            })
    }
}

fn resolve_program(command: &str) -> PathBuf {
    let path = Path::new(command);
    if path.components().count() > 1 {
        return path.to_path_buf();
    }
    which::which(command).unwrap_or_else(|_| path.to_path_buf())
}
