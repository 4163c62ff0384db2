//! The single owner of [`AppState`].
//!
//! Every user action and every tick goes through the controller. It applies
//! the state transition, writes a snapshot when the durable state changed,
//! and hands the resulting events to the listeners. Storage and listener
//! failures are logged, never returned to the tick path.

use tracing::{debug, warn};

use crate::calendar::{Calendar, LocalCalendar};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::notify::{AmbientPlayer, EventListener};
use crate::sound::AmbientAction;
use crate::state::{AppState, Settings};
use crate::stats::DayCount;
use crate::storage::{PersistenceGateway, SnapshotStore};
use crate::task::Task;

pub struct PomodoroController<S> {
    state: AppState,
    gateway: PersistenceGateway<S>,
    calendar: Box<dyn Calendar>,
    listeners: Vec<Box<dyn EventListener>>,
    ambient_player: Option<Box<dyn AmbientPlayer>>,
}

impl<S: SnapshotStore> PomodoroController<S> {
    /// Load the stored state (or defaults) using the local calendar.
    pub fn open(store: S) -> Self {
        Self::open_with_calendar(store, Box::new(LocalCalendar))
    }

    pub fn open_with_calendar(store: S, calendar: Box<dyn Calendar>) -> Self {
        let gateway = PersistenceGateway::new(store);
        let state = gateway.load(calendar.today());
        Self {
            state,
            gateway,
            calendar,
            listeners: Vec::new(),
            ambient_player: None,
        }
    }

    pub fn with_listener(mut self, listener: impl EventListener + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn with_ambient_player(mut self, player: impl AmbientPlayer + 'static) -> Self {
        self.ambient_player = Some(Box::new(player));
        self
    }

    pub fn set_auto_advance(&mut self, auto_advance: bool) {
        self.state.auto_advance = auto_advance;
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn gateway(&self) -> &PersistenceGateway<S> {
        &self.gateway
    }

    pub fn last_7_days(&self) -> Vec<DayCount> {
        self.state.stats.last_7_days(self.calendar.today())
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let event = self.state.start()?;
        self.publish(std::slice::from_ref(&event));
        Some(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.state.pause()?;
        self.save();
        self.publish(std::slice::from_ref(&event));
        Some(event)
    }

    pub fn toggle_running(&mut self) -> Option<Event> {
        if self.state.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Advance one second. Period transitions are saved before listeners
    /// see them. Crossing midnight restarts the daily count.
    pub fn tick(&mut self) -> Vec<Event> {
        let today = self.calendar.today();
        let rolled_over = self.state.roll_over(today);
        let events = self.state.tick(today);
        if rolled_over || !events.is_empty() {
            self.save();
        }
        if !events.is_empty() {
            self.publish(&events);
        }
        events
    }

    pub fn skip(&mut self) -> Event {
        let event = self.state.skip();
        self.save();
        self.publish(std::slice::from_ref(&event));
        event
    }

    pub fn reset_timer(&mut self) -> Event {
        let event = self.state.reset_timer();
        self.save();
        self.publish(std::slice::from_ref(&event));
        event
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn apply_settings(&mut self, settings: &Settings) -> Result<Event> {
        let event = self.state.apply_settings(settings)?;
        self.save();
        self.publish(std::slice::from_ref(&event));
        Ok(event)
    }

    pub fn set_theme(&mut self, theme: &str) -> Result<()> {
        self.state.set_theme(theme)?;
        self.save();
        Ok(())
    }

    pub fn set_notification_sound(&mut self, id: &str) -> Result<()> {
        self.state.set_notification_sound(id)?;
        self.save();
        Ok(())
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Add a task; blank text is ignored.
    pub fn add_task(&mut self, text: &str) -> Option<Task> {
        let task = self.state.tasks.add_task(text).cloned()?;
        self.save();
        self.publish(&[Event::TaskAdded { task_id: task.id }]);
        Some(task)
    }

    pub fn remove_task(&mut self, id: u64) -> Result<Task> {
        let task = self.state.tasks.remove_task(id).ok_or_else(|| unknown_task(id))?;
        self.save();
        self.publish(&[Event::TaskRemoved { task_id: id }]);
        Ok(task)
    }

    /// Select a task (toggling off when already active) or clear with `None`.
    /// Returns the new active id.
    pub fn set_active_task(&mut self, id: Option<u64>) -> Result<Option<u64>> {
        if !self.state.tasks.set_active(id) {
            return Err(unknown_task(id.unwrap_or_default()));
        }
        let active = self.state.tasks.active_task_id();
        self.save();
        self.publish(&[Event::ActiveTaskChanged { task_id: active }]);
        Ok(active)
    }

    pub fn toggle_task_completed(&mut self, id: u64) -> Result<bool> {
        let completed = self
            .state
            .tasks
            .toggle_completed(id)
            .ok_or_else(|| unknown_task(id))?;
        self.save();
        self.publish(&[Event::TaskCompletionToggled {
            task_id: id,
            completed,
        }]);
        Ok(completed)
    }

    // ── Ambient sound ────────────────────────────────────────────────

    /// Play/pause the ambient sound, `selected` being the chosen sound id.
    pub fn toggle_ambient(&mut self, selected: &str) -> Event {
        let action = self.state.ambient.toggle(selected);
        self.after_ambient(vec![action])
    }

    /// Choose another ambient sound, swapping it in if one is playing.
    pub fn select_ambient(&mut self, id: &str) -> Event {
        let actions = self.state.ambient.select(id);
        self.after_ambient(actions)
    }

    fn after_ambient(&mut self, actions: Vec<AmbientAction>) -> Event {
        for action in actions {
            let Some(player) = self.ambient_player.as_mut() else {
                debug!(?action, "no ambient player attached");
                continue;
            };
            let outcome = match &action {
                AmbientAction::Play(id) => player.play(id),
                AmbientAction::Pause => player.pause(),
                AmbientAction::Nothing => Ok(()),
            };
            if let Err(e) = outcome {
                warn!(error = %e, ?action, "ambient playback failed");
            }
        }
        self.save();
        let event = Event::AmbientChanged {
            id: self.state.ambient.id.clone(),
            is_playing: self.state.ambient.is_playing,
        };
        self.publish(std::slice::from_ref(&event));
        event
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Write a snapshot. Failures are logged; returns whether it was stored.
    pub fn save(&self) -> bool {
        match self.gateway.save(&self.state) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "could not save state");
                false
            }
        }
    }

    fn publish(&mut self, events: &[Event]) {
        for listener in self.listeners.iter_mut() {
            for event in events {
                listener.on_event(event, &self.state);
            }
        }
    }
}

fn unknown_task(id: u64) -> CoreError {
    CoreError::invalid_input("taskId", format!("no task with id {id}"))
}
