//! Terminal and desktop backends for period-end side effects.

use std::io::Write;
use std::process::Command;

use pomotick_core::{AmbientPlayer, CoreError, NotificationSink, Permission, SoundPlayer};
use tracing::{debug, info};

type Result<T> = std::result::Result<T, CoreError>;

/// Platform command used to show a desktop notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    NotifySend,
    Osascript,
}

impl Backend {
    /// Detect the notification command available on this machine.
    pub fn detect() -> Option<Self> {
        if cfg!(target_os = "macos") && command_exists("osascript") {
            Some(Self::Osascript)
        } else if cfg!(target_os = "linux") && command_exists("notify-send") {
            Some(Self::NotifySend)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NotifySend => "notify-send",
            Self::Osascript => "osascript",
        }
    }

    fn send(&self, title: &str, body: &str) -> Result<()> {
        let status = match self {
            Self::NotifySend => Command::new("notify-send")
                .args(["--app-name", "pomotick", title, body])
                .status()?,
            Self::Osascript => {
                let script = format!(
                    "display notification \"{}\" with title \"{}\"",
                    escape_applescript(body),
                    escape_applescript(title)
                );
                Command::new("osascript").args(["-e", &script]).status()?
            }
        };
        if !status.success() {
            return Err(CoreError::Io(std::io::Error::other(format!(
                "{} exited with {status}",
                self.name()
            ))));
        }
        Ok(())
    }
}

fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn escape_applescript(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Desktop notifications, permitted when enabled in the config and a
/// backend command exists.
pub struct DesktopNotifier {
    backend: Option<Backend>,
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        let backend = if enabled { Backend::detect() } else { None };
        debug!(backend = ?backend.map(|b| b.name()), enabled, "notification backend");
        Self { backend, enabled }
    }
}

impl NotificationSink for DesktopNotifier {
    fn permission(&self) -> Permission {
        if self.enabled && self.backend.is_some() {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    fn show(&mut self, title: &str, body: &str) -> Result<()> {
        match self.backend {
            Some(backend) => backend.send(title, body),
            None => Err(CoreError::PermissionDenied),
        }
    }
}

/// Rings the terminal bell for any notification sound.
pub struct TerminalBell {
    enabled: bool,
}

impl TerminalBell {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl SoundPlayer for TerminalBell {
    fn play(&mut self, sound_id: &str) -> Result<()> {
        if !self.enabled {
            debug!(sound_id, "bell disabled");
            return Ok(());
        }
        let mut out = std::io::stdout();
        out.write_all(b"\x07")?;
        out.flush()?;
        Ok(())
    }
}

/// The terminal has no audio device of its own; ambient playback is only
/// reported in the log.
#[derive(Default)]
pub struct LoggingAmbientPlayer {
    playing: Option<String>,
}

impl AmbientPlayer for LoggingAmbientPlayer {
    fn play(&mut self, id: &str) -> Result<()> {
        info!(id, "ambient sound playing");
        self.playing = Some(id.to_string());
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if let Some(id) = self.playing.take() {
            info!(id, "ambient sound paused");
        }
        Ok(())
    }
}
