//! Session scheduler.
//!
//! Decides what follows a finished period. The rotation is driven by
//! `session_count`: a break is long exactly when the count of completed focus
//! periods is a non-zero multiple of `long_break_interval`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::clock::SessionClock;
use crate::error::{CoreError, Result};
use crate::events::Event;

/// Longest accepted period, in minutes.
pub const MAX_DURATION_MIN: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Focus,
    ShortBreak,
    LongBreak,
}

impl PeriodKind {
    pub fn label(self) -> &'static str {
        match self {
            PeriodKind::Focus => "Focus Time",
            PeriodKind::ShortBreak => "Short Break",
            PeriodKind::LongBreak => "Long Break",
        }
    }

    pub fn is_focus(self) -> bool {
        self == PeriodKind::Focus
    }
}

/// Period durations in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timers {
    pub focus: u32,
    #[serde(rename = "break")]
    pub short_break: u32,
    pub long_break: u32,
}

impl Default for Timers {
    fn default() -> Self {
        Self {
            focus: 25,
            short_break: 5,
            long_break: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub timers: Timers,
    pub long_break_interval: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timers: Timers::default(),
            long_break_interval: 4,
        }
    }
}

impl SchedulerConfig {
    /// Build a config, rejecting zero or oversized durations and a zero interval.
    pub fn new(timers: Timers, long_break_interval: u32) -> Result<Self> {
        let config = Self {
            timers,
            long_break_interval,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_minutes("focus", self.timers.focus)?;
        check_minutes("break", self.timers.short_break)?;
        check_minutes("longBreak", self.timers.long_break)?;
        if self.long_break_interval == 0 {
            return Err(CoreError::invalid_input(
                "longBreakInterval",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Configured length of `kind` in seconds.
    pub fn duration_secs(&self, kind: PeriodKind) -> u32 {
        let minutes = match kind {
            PeriodKind::Focus => self.timers.focus,
            PeriodKind::ShortBreak => self.timers.short_break,
            PeriodKind::LongBreak => self.timers.long_break,
        };
        minutes.saturating_mul(60)
    }
}

fn check_minutes(field: &str, minutes: u32) -> Result<()> {
    if minutes == 0 {
        return Err(CoreError::invalid_input(
            field,
            "must be a positive number of minutes",
        ));
    }
    if minutes > MAX_DURATION_MIN {
        return Err(CoreError::invalid_input(
            field,
            format!("must be at most {MAX_DURATION_MIN} minutes"),
        ));
    }
    Ok(())
}

/// Focus/break rotation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionScheduler {
    config: SchedulerConfig,
    is_focus: bool,
    session_count: u32,
}

impl Default for SessionScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl SessionScheduler {
    /// Starts on a focus period with no completed sessions.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            is_focus: true,
            session_count: 0,
        }
    }

    pub(crate) fn restore(config: SchedulerConfig, is_focus: bool, session_count: u32) -> Self {
        Self {
            config,
            is_focus,
            session_count,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn is_focus(&self) -> bool {
        self.is_focus
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    /// The period the clock is currently counting down.
    pub fn current_period(&self) -> PeriodKind {
        if self.is_focus {
            PeriodKind::Focus
        } else if self.long_break_due() {
            PeriodKind::LongBreak
        } else {
            PeriodKind::ShortBreak
        }
    }

    pub fn current_duration_secs(&self) -> u32 {
        self.config.duration_secs(self.current_period())
    }

    /// 0.0 .. 1.0 elapsed fraction of the current period.
    pub fn progress(&self, clock: &SessionClock) -> f64 {
        let total = self.current_duration_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(clock.time_left_secs());
        f64::from(elapsed) / f64::from(total)
    }

    fn long_break_due(&self) -> bool {
        self.session_count > 0 && self.session_count % self.config.long_break_interval == 0
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Handle one `Expired` signal from the clock.
    ///
    /// Emits `FocusCompleted` first when a focus period ended, then
    /// `PeriodExpired`. With `auto_advance` the clock keeps its run state into
    /// the next period, otherwise it is paused.
    pub fn on_expiry(&mut self, clock: &mut SessionClock, auto_advance: bool) -> Vec<Event> {
        let finished = self.current_period();
        let mut events = Vec::with_capacity(2);

        if finished.is_focus() {
            self.session_count = self.session_count.saturating_add(1);
            events.push(Event::FocusCompleted {
                session_count: self.session_count,
                at: Utc::now(),
            });
        }

        if !auto_advance {
            clock.pause();
        }
        self.switch(clock);
        let next = self.current_period();
        info!(
            finished = finished.label(),
            next = next.label(),
            session_count = self.session_count,
            "period expired"
        );
        events.push(Event::PeriodExpired {
            finished,
            next,
            duration_secs: clock.time_left_secs(),
            session_count: self.session_count,
            at: Utc::now(),
        });
        events
    }

    /// Abandon the current period: pause, then move to the next one.
    ///
    /// A skipped focus period is not counted as completed.
    pub fn skip(&mut self, clock: &mut SessionClock) -> Event {
        let from = self.current_period();
        clock.pause();
        self.switch(clock);
        Event::PeriodSkipped {
            from,
            to: self.current_period(),
            at: Utc::now(),
        }
    }

    /// Pause and reload the current period's configured duration.
    pub fn reset_timer(&mut self, clock: &mut SessionClock) -> Event {
        clock.pause();
        clock.reset(self.current_duration_secs());
        debug!(time_left = clock.time_left_secs(), "timer reset");
        Event::TimerReset {
            period: self.current_period(),
            duration_secs: clock.time_left_secs(),
            at: Utc::now(),
        }
    }

    /// Replace durations and interval. The running period is untouched; the
    /// new values apply from the next reset.
    pub fn set_config(&mut self, config: SchedulerConfig) {
        self.config = config;
    }

    fn switch(&mut self, clock: &mut SessionClock) {
        self.is_focus = !self.is_focus;
        clock.reset(self.current_duration_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::clock::Expired;

    fn run_out(clock: &mut SessionClock) {
        clock.start();
        while clock.tick() != Some(Expired) {}
    }

    #[test]
    fn default_durations() {
        let config = SchedulerConfig::default();
        assert_eq!(config.duration_secs(PeriodKind::Focus), 1500);
        assert_eq!(config.duration_secs(PeriodKind::ShortBreak), 300);
        assert_eq!(config.duration_secs(PeriodKind::LongBreak), 900);
    }

    #[test]
    fn rejects_zero_durations_and_interval() {
        let timers = Timers {
            focus: 0,
            ..Timers::default()
        };
        assert!(matches!(
            SchedulerConfig::new(timers, 4),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(SchedulerConfig::new(Timers::default(), 0).is_err());
        let huge = Timers {
            long_break: MAX_DURATION_MIN + 1,
            ..Timers::default()
        };
        assert!(SchedulerConfig::new(huge, 4).is_err());
    }

    #[test]
    fn focus_expiry_counts_session_and_moves_to_break() {
        let mut scheduler = SessionScheduler::default();
        let mut clock = SessionClock::new(2);
        run_out(&mut clock);

        let events = scheduler.on_expiry(&mut clock, true);
        assert_eq!(scheduler.session_count(), 1);
        assert!(!scheduler.is_focus());
        assert_eq!(scheduler.current_period(), PeriodKind::ShortBreak);
        assert_eq!(clock.time_left_secs(), 300);
        assert!(matches!(events[0], Event::FocusCompleted { session_count: 1, .. }));
        assert!(matches!(
            events[1],
            Event::PeriodExpired {
                finished: PeriodKind::Focus,
                next: PeriodKind::ShortBreak,
                ..
            }
        ));
    }

    #[test]
    fn break_expiry_returns_to_focus_without_counting() {
        let config = SchedulerConfig::default();
        let mut scheduler = SessionScheduler::restore(config, false, 2);
        let mut clock = SessionClock::new(1);
        run_out(&mut clock);

        let events = scheduler.on_expiry(&mut clock, true);
        assert_eq!(scheduler.session_count(), 2);
        assert!(scheduler.is_focus());
        assert_eq!(clock.time_left_secs(), 1500);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn long_break_after_interval() {
        let config = SchedulerConfig::default();
        let mut scheduler = SessionScheduler::restore(config, true, 3);
        let mut clock = SessionClock::new(1);
        run_out(&mut clock);

        scheduler.on_expiry(&mut clock, true);
        assert_eq!(scheduler.session_count(), 4);
        assert_eq!(scheduler.current_period(), PeriodKind::LongBreak);
        assert_eq!(clock.time_left_secs(), 15 * 60);
    }

    #[test]
    fn auto_advance_keeps_running() {
        let mut scheduler = SessionScheduler::default();
        let mut clock = SessionClock::new(1);
        run_out(&mut clock);
        scheduler.on_expiry(&mut clock, true);
        assert!(clock.is_running());
    }

    #[test]
    fn without_auto_advance_next_period_is_paused() {
        let mut scheduler = SessionScheduler::default();
        let mut clock = SessionClock::new(1);
        run_out(&mut clock);
        scheduler.on_expiry(&mut clock, false);
        assert!(!clock.is_running());
        assert_eq!(clock.time_left_secs(), 300);
    }

    #[test]
    fn skip_pauses_and_does_not_count() {
        let mut scheduler = SessionScheduler::default();
        let mut clock = SessionClock::new(1500);
        clock.start();
        clock.tick();

        let event = scheduler.skip(&mut clock);
        assert!(!clock.is_running());
        assert_eq!(scheduler.session_count(), 0);
        assert_eq!(scheduler.current_period(), PeriodKind::ShortBreak);
        assert_eq!(clock.time_left_secs(), 300);
        assert!(matches!(
            event,
            Event::PeriodSkipped {
                from: PeriodKind::Focus,
                to: PeriodKind::ShortBreak,
                ..
            }
        ));
    }

    #[test]
    fn config_change_is_not_retroactive() {
        let mut scheduler = SessionScheduler::default();
        let mut clock = SessionClock::new(1500);
        clock.start();
        clock.tick();

        let timers = Timers {
            focus: 50,
            ..Timers::default()
        };
        scheduler.set_config(SchedulerConfig::new(timers, 4).unwrap());
        assert_eq!(clock.time_left_secs(), 1499);

        scheduler.reset_timer(&mut clock);
        assert_eq!(clock.time_left_secs(), 3000);
        assert!(!clock.is_running());
    }

    #[test]
    fn progress_uses_resolved_period() {
        let config = SchedulerConfig::default();
        let scheduler = SessionScheduler::restore(config, false, 4);
        let clock = SessionClock::new(450);
        assert!((scheduler.progress(&clock) - 0.5).abs() < f64::EPSILON);
    }
}
