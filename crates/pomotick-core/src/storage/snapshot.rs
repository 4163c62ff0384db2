//! The durable projection of [`AppState`].
//!
//! Field names follow the stored record (`timeLeft`, `isFocus`, ...). Live
//! parts of the state never reach disk: `isRunning` and
//! `ambientSound.isPlaying` are always written as `false`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::sound::{AmbientSound, DEFAULT_NOTIFICATION_SOUND};
use crate::state::{AppState, DEFAULT_DAILY_GOAL, DEFAULT_THEME};
use crate::stats::StatsLog;
use crate::task::{Task, TaskLedger};
use crate::timer::{SchedulerConfig, SessionClock, SessionScheduler, Timers};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub timers: Timers,
    #[serde(default = "default_interval")]
    pub long_break_interval: u32,
    #[serde(default)]
    pub time_left: u32,
    #[serde(default = "default_true")]
    pub is_focus: bool,
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub session_count: u32,
    #[serde(default)]
    pub focus_sessions_today: u32,
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_notification_sound")]
    pub notification_sound: String,
    #[serde(default)]
    pub ambient_sound: AmbientSound,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub active_task_id: Option<u64>,
    /// Largest task id ever handed out, so removed ids are not reused.
    #[serde(default)]
    pub last_task_id: u64,
    #[serde(default)]
    pub stats: StatsLog,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_date: Option<NaiveDate>,
}

fn default_interval() -> u32 {
    SchedulerConfig::default().long_break_interval
}
fn default_true() -> bool {
    true
}
fn default_daily_goal() -> u32 {
    DEFAULT_DAILY_GOAL
}
fn default_theme() -> String {
    DEFAULT_THEME.into()
}
fn default_notification_sound() -> String {
    DEFAULT_NOTIFICATION_SOUND.into()
}

impl Snapshot {
    /// Project the state for storage, dropping everything transient.
    pub fn capture(state: &AppState) -> Self {
        let config = state.scheduler.config();
        Self {
            timers: config.timers,
            long_break_interval: config.long_break_interval,
            time_left: state.clock.time_left_secs(),
            is_focus: state.scheduler.is_focus(),
            is_running: false,
            session_count: state.scheduler.session_count(),
            focus_sessions_today: state.focus_sessions_today,
            daily_goal: state.daily_goal,
            theme: state.theme.clone(),
            notification_sound: state.notification_sound.clone(),
            ambient_sound: AmbientSound {
                id: state.ambient.id.clone(),
                is_playing: false,
            },
            tasks: state.tasks.tasks().to_vec(),
            active_task_id: state.tasks.active_task_id(),
            last_task_id: state.tasks.last_id(),
            stats: state.stats.clone(),
            last_active_date: state.last_active_date,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::CorruptSnapshot(e.to_string()))
    }

    /// Validate and rebuild a paused state, applying the day rollover for
    /// `today`.
    pub fn into_state(self, today: NaiveDate) -> Result<AppState> {
        let config = SchedulerConfig::new(self.timers, self.long_break_interval)
            .map_err(|e| CoreError::CorruptSnapshot(e.to_string()))?;
        if self.daily_goal == 0 {
            return Err(CoreError::CorruptSnapshot("dailyGoal is zero".into()));
        }
        let mut seen = std::collections::HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.id) {
                return Err(CoreError::CorruptSnapshot(format!(
                    "duplicate task id {}",
                    task.id
                )));
            }
            if task.text.trim().is_empty() {
                return Err(CoreError::CorruptSnapshot(format!(
                    "task {} has no text",
                    task.id
                )));
            }
        }

        let scheduler = SessionScheduler::restore(config, self.is_focus, self.session_count);
        let time_left = if self.time_left == 0 {
            scheduler.current_duration_secs()
        } else {
            self.time_left
        };

        let mut state = AppState {
            clock: SessionClock::new(time_left),
            scheduler,
            tasks: TaskLedger::restore(self.tasks, self.active_task_id, self.last_task_id),
            stats: self.stats,
            focus_sessions_today: self.focus_sessions_today,
            daily_goal: self.daily_goal,
            theme: self.theme,
            notification_sound: self.notification_sound,
            ambient: AmbientSound {
                id: self.ambient_sound.id,
                is_playing: false,
            },
            last_active_date: self.last_active_date,
            auto_advance: true,
        };
        state.roll_over(today);
        Ok(state)
    }
}
