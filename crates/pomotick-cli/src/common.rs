//! Shared setup for command handlers.

use pomotick_core::storage::default_store;
use pomotick_core::{AppState, Config, FileStore, Notifier, PomodoroController};

use crate::backend::{DesktopNotifier, LoggingAmbientPlayer, TerminalBell};

pub type Controller = PomodoroController<FileStore>;

/// Open the stored state with the terminal backends attached.
pub fn open_controller(config: &Config) -> Result<Controller, Box<dyn std::error::Error>> {
    let notifier = Notifier::new(
        TerminalBell::new(config.notifications.bell),
        DesktopNotifier::new(config.notifications.enabled),
    );
    let mut controller = PomodoroController::open(default_store()?)
        .with_listener(notifier)
        .with_ambient_player(LoggingAmbientPlayer::default());
    controller.set_auto_advance(config.timer.auto_advance);
    Ok(controller)
}

/// Text progress bar, `width` cells wide.
pub fn bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

/// One-line summary of the timer, as redrawn by `timer run`.
pub fn status_line(state: &AppState) -> String {
    let mut line = format!(
        "{} {} [{}] {}",
        state.current_period().label(),
        state.clock.display(),
        bar(state.progress(), 20),
        if state.is_running() { "running" } else { "paused" },
    );
    if let Some(task) = state.tasks.active_task() {
        line.push_str(&format!(" | {}", task.text));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(0.0, 4), "----");
        assert_eq!(bar(0.5, 4), "##--");
        assert_eq!(bar(1.5, 4), "####");
    }

    #[test]
    fn status_line_shows_period_and_countdown() {
        let state = AppState::default();
        let line = status_line(&state);
        assert!(line.starts_with("Focus Time 25:00"));
        assert!(line.ends_with("paused"));
    }
}
