//! Application state.
//!
//! One explicit struct holds everything the timer knows. It is owned by the
//! [`PomodoroController`](crate::controller::PomodoroController) and every
//! operation here is a plain state transition: no I/O, no clocks, no sound.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::sound::{AmbientSound, DEFAULT_NOTIFICATION_SOUND};
use crate::stats::StatsLog;
use crate::task::TaskLedger;
use crate::timer::{Expired, PeriodKind, SchedulerConfig, SessionClock, SessionScheduler, Timers};

pub const DEFAULT_DAILY_GOAL: u32 = 8;
pub const DEFAULT_THEME: &str = "default";

/// Values coming from the settings form. Unset fields keep their current
/// value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub focus: Option<u32>,
    pub short_break: Option<u32>,
    pub long_break: Option<u32>,
    pub long_break_interval: Option<u32>,
    pub daily_goal: Option<u32>,
}

impl Settings {
    pub fn is_empty(&self) -> bool {
        *self == Settings::default()
    }
}

/// Parse a settings form field. Anything that is not a positive integer is
/// rejected.
pub fn parse_positive(field: &str, raw: &str) -> Result<u32> {
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::invalid_input(field, format!("'{raw}' is not a whole number")))?;
    if value == 0 {
        return Err(CoreError::invalid_input(field, "must be greater than zero"));
    }
    Ok(value)
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub clock: SessionClock,
    pub scheduler: SessionScheduler,
    pub tasks: TaskLedger,
    pub stats: StatsLog,
    pub focus_sessions_today: u32,
    pub daily_goal: u32,
    pub theme: String,
    pub notification_sound: String,
    pub ambient: AmbientSound,
    /// Local date of the most recent completed focus period.
    pub last_active_date: Option<NaiveDate>,
    /// Whether the next period keeps running after a natural expiry. Runtime
    /// option, not part of the snapshot.
    pub auto_advance: bool,
}

impl Default for AppState {
    fn default() -> Self {
        let scheduler = SessionScheduler::default();
        Self {
            clock: SessionClock::new(scheduler.current_duration_secs()),
            scheduler,
            tasks: TaskLedger::new(),
            stats: StatsLog::new(),
            focus_sessions_today: 0,
            daily_goal: DEFAULT_DAILY_GOAL,
            theme: DEFAULT_THEME.to_string(),
            notification_sound: DEFAULT_NOTIFICATION_SOUND.to_string(),
            ambient: AmbientSound::default(),
            last_active_date: None,
            auto_advance: true,
        }
    }
}

impl AppState {
    // ── Queries ──────────────────────────────────────────────────────

    pub fn current_period(&self) -> PeriodKind {
        self.scheduler.current_period()
    }

    pub fn progress(&self) -> f64 {
        self.scheduler.progress(&self.clock)
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn goal_reached(&self) -> bool {
        self.focus_sessions_today >= self.daily_goal
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if !self.clock.start() {
            return None;
        }
        Some(Event::TimerStarted {
            period: self.current_period(),
            time_left_secs: self.clock.time_left_secs(),
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.clock.pause() {
            return None;
        }
        Some(Event::TimerPaused {
            period: self.current_period(),
            time_left_secs: self.clock.time_left_secs(),
            at: Utc::now(),
        })
    }

    /// Start when paused, pause when running.
    pub fn toggle_running(&mut self) -> Option<Event> {
        if self.clock.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// One second of wall clock. On expiry the scheduler moves to the next
    /// period and a finished focus period is credited on `today`.
    pub fn tick(&mut self, today: NaiveDate) -> Vec<Event> {
        let Some(Expired) = self.clock.tick() else {
            return Vec::new();
        };
        let mut events = self.scheduler.on_expiry(&mut self.clock, self.auto_advance);
        if events
            .iter()
            .any(|e| matches!(e, Event::FocusCompleted { .. }))
        {
            events.extend(self.credit_focus(today));
        }
        events
    }

    pub fn skip(&mut self) -> Event {
        self.scheduler.skip(&mut self.clock)
    }

    pub fn reset_timer(&mut self) -> Event {
        self.scheduler.reset_timer(&mut self.clock)
    }

    fn credit_focus(&mut self, today: NaiveDate) -> Vec<Event> {
        let mut events = Vec::with_capacity(2);
        if self.last_active_date.is_some_and(|d| d != today) {
            debug!(%today, "new day, daily progress restarts");
            self.focus_sessions_today = 0;
        }
        self.last_active_date = Some(today);
        self.focus_sessions_today = self.focus_sessions_today.saturating_add(1);
        let count = self.stats.record(today);
        events.push(Event::SessionLogged {
            date: today,
            count,
            focus_sessions_today: self.focus_sessions_today,
        });
        if let Some(task) = self.tasks.on_focus_completed() {
            info!(task_id = task.id, pomodoros = task.pomodoros, "pomodoro credited");
            events.push(Event::PomodoroCredited {
                task_id: task.id,
                pomodoros: task.pomodoros,
            });
        }
        events
    }

    /// Restart the daily counter when `today` is a new day.
    ///
    /// A day without a statistics entry counts as new, as does a recorded
    /// `last_active_date` other than `today`. Returns whether it reset.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        let missing_today = !self.stats.has_entry(today);
        let stale_date = self.last_active_date.is_some_and(|d| d != today);
        if (missing_today || stale_date) && self.focus_sessions_today != 0 {
            debug!(%today, previous = self.focus_sessions_today, "daily progress reset");
            self.focus_sessions_today = 0;
            return true;
        }
        false
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Validate and apply settings. Nothing changes when any value is
    /// rejected. The current countdown is reloaded only while paused.
    pub fn apply_settings(&mut self, settings: &Settings) -> Result<Event> {
        let current = *self.scheduler.config();
        let timers = Timers {
            focus: settings.focus.unwrap_or(current.timers.focus),
            short_break: settings.short_break.unwrap_or(current.timers.short_break),
            long_break: settings.long_break.unwrap_or(current.timers.long_break),
        };
        let interval = settings
            .long_break_interval
            .unwrap_or(current.long_break_interval);
        let config = SchedulerConfig::new(timers, interval)?;
        let daily_goal = settings.daily_goal.unwrap_or(self.daily_goal);
        if daily_goal == 0 {
            return Err(CoreError::invalid_input("dailyGoal", "must be greater than zero"));
        }

        self.scheduler.set_config(config);
        self.daily_goal = daily_goal;
        if !self.clock.is_running() {
            self.scheduler.reset_timer(&mut self.clock);
        }
        info!(?timers, interval, daily_goal, "settings applied");
        Ok(Event::SettingsApplied { at: Utc::now() })
    }

    pub fn set_theme(&mut self, theme: &str) -> Result<()> {
        self.theme = non_blank("theme", theme)?;
        Ok(())
    }

    pub fn set_notification_sound(&mut self, id: &str) -> Result<()> {
        self.notification_sound = non_blank("notificationSound", id)?;
        Ok(())
    }
}

fn non_blank(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::invalid_input(field, "must not be empty"));
    }
    Ok(value.to_string())
}
