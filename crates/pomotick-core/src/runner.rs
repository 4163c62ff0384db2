//! Foreground session loop.
//!
//! Joins the tick source with user commands over one controller. The tick
//! source runs exactly while the clock is running: it is started by
//! `Start`/`Toggle` and cancelled on pause, skip, reset, a non-advancing
//! expiry, and quit. Quitting also stops ambient playback.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::controller::PomodoroController;
use crate::events::Event;
use crate::state::AppState;
use crate::storage::SnapshotStore;
use crate::timer::TickSource;

/// Keyboard-level commands accepted while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Toggle,
    Skip,
    Reset,
    /// Play or pause the selected ambient sound.
    ToggleAmbient,
    Quit,
}

impl Command {
    /// Map a line typed in the terminal to a command.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "" | "p" | "space" | "toggle" => Some(Command::Toggle),
            "start" => Some(Command::Start),
            "pause" => Some(Command::Pause),
            "s" | "skip" => Some(Command::Skip),
            "r" | "reset" => Some(Command::Reset),
            "a" | "ambient" => Some(Command::ToggleAmbient),
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Drive `controller` until `Quit` arrives or the command channel closes.
///
/// `on_update` is called after every command and every tick with the state
/// and the events they produced. On exit the clock is paused and saved.
pub async fn run<S, F>(
    mut controller: PomodoroController<S>,
    tick_interval: Duration,
    mut commands: mpsc::Receiver<Command>,
    mut on_update: F,
) -> PomodoroController<S>
where
    S: SnapshotStore,
    F: FnMut(&AppState, &[Event]),
{
    let (mut ticker, mut ticks) = TickSource::new(tick_interval);
    sync_ticker(&mut ticker, controller.state());

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                if !ticker.is_current(&tick) {
                    debug!("dropping stale tick");
                    continue;
                }
                let events = controller.tick();
                sync_ticker(&mut ticker, controller.state());
                on_update(controller.state(), &events);
            }
            command = commands.recv() => {
                let command = command.unwrap_or(Command::Quit);
                debug!(?command, "command received");
                let events: Vec<Event> = match command {
                    Command::Start => controller.start().into_iter().collect(),
                    Command::Pause => controller.pause().into_iter().collect(),
                    Command::Toggle => controller.toggle_running().into_iter().collect(),
                    Command::Skip => vec![controller.skip()],
                    Command::Reset => vec![controller.reset_timer()],
                    Command::ToggleAmbient => {
                        let selected = controller.state().ambient.id.clone();
                        vec![controller.toggle_ambient(&selected)]
                    }
                    Command::Quit => {
                        let events = shut_down(&mut controller);
                        ticker.cancel();
                        on_update(controller.state(), &events);
                        break;
                    }
                };
                sync_ticker(&mut ticker, controller.state());
                on_update(controller.state(), &events);
            }
        }
    }

    controller
}

/// Stop ambient playback and the clock. The snapshot is written here only
/// when neither step already wrote it.
fn shut_down<S: SnapshotStore>(controller: &mut PomodoroController<S>) -> Vec<Event> {
    let mut events = Vec::new();
    if controller.state().ambient.is_playing {
        let selected = controller.state().ambient.id.clone();
        events.push(controller.toggle_ambient(&selected));
    }
    events.extend(controller.pause());
    if events.is_empty() {
        controller.save();
    }
    events
}

fn sync_ticker(ticker: &mut TickSource, state: &AppState) {
    if state.is_running() {
        ticker.start();
    } else {
        ticker.cancel();
    }
}
