//! Period-end side effects.
//!
//! Sound and notifications are listeners on the controller's event stream.
//! They are best-effort: a failing player is logged and the timer carries on.

use tracing::{debug, warn};

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::sound::is_silent;
use crate::state::AppState;
use crate::timer::PeriodKind;

/// Receives every event the controller emits, after the state change and
/// the snapshot write.
pub trait EventListener {
    fn on_event(&mut self, event: &Event, state: &AppState);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Plays a short notification sound by id.
pub trait SoundPlayer {
    fn play(&mut self, sound_id: &str) -> Result<()>;
}

/// Shows a system notification.
pub trait NotificationSink {
    fn permission(&self) -> Permission;
    fn show(&mut self, title: &str, body: &str) -> Result<()>;
}

/// Background ambient audio.
pub trait AmbientPlayer {
    fn play(&mut self, id: &str) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
}

/// Title and body announcing the end of `finished`.
pub fn period_end_message(finished: PeriodKind) -> (&'static str, &'static str) {
    let title = if finished.is_focus() {
        "Break time!"
    } else {
        "Time to focus!"
    };
    (title, "Your session has ended.")
}

/// Plays the configured sound and shows a notification when a period ends.
pub struct Notifier<P, N> {
    sound: P,
    sink: N,
    denial_logged: bool,
}

impl<P: SoundPlayer, N: NotificationSink> Notifier<P, N> {
    pub fn new(sound: P, sink: N) -> Self {
        Self {
            sound,
            sink,
            denial_logged: false,
        }
    }

    pub fn sound(&self) -> &P {
        &self.sound
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    fn announce(&mut self, finished: PeriodKind, sound_id: &str) {
        if !is_silent(sound_id) {
            if let Err(e) = self.sound.play(sound_id) {
                warn!(error = %e, sound_id, "notification sound failed");
            }
        }

        let (title, body) = period_end_message(finished);
        match self.sink.permission() {
            Permission::Granted => {
                if let Err(e) = self.sink.show(title, body) {
                    warn!(error = %e, "notification failed");
                }
            }
            Permission::Denied => {
                if !self.denial_logged {
                    debug!(error = %CoreError::PermissionDenied, "notifications stay silent");
                    self.denial_logged = true;
                }
            }
        }
    }
}

impl<P: SoundPlayer, N: NotificationSink> EventListener for Notifier<P, N> {
    fn on_event(&mut self, event: &Event, state: &AppState) {
        if let Event::PeriodExpired { finished, .. } = event {
            self.announce(*finished, &state.notification_sound);
        }
    }
}
