use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::PeriodKind;

/// Every state change in the system produces an Event.
/// The CLI renders them; listeners (sound, notifications) subscribe to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        period: PeriodKind,
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        period: PeriodKind,
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        period: PeriodKind,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// A focus period ran to zero. Credited to the active task and the
    /// statistics log.
    FocusCompleted {
        session_count: u32,
        at: DateTime<Utc>,
    },
    /// Any period ran to zero and the scheduler moved on.
    PeriodExpired {
        finished: PeriodKind,
        next: PeriodKind,
        duration_secs: u32,
        session_count: u32,
        at: DateTime<Utc>,
    },
    PeriodSkipped {
        from: PeriodKind,
        to: PeriodKind,
        at: DateTime<Utc>,
    },
    PomodoroCredited {
        task_id: u64,
        pomodoros: u32,
    },
    SessionLogged {
        date: NaiveDate,
        count: u32,
        focus_sessions_today: u32,
    },
    SettingsApplied {
        at: DateTime<Utc>,
    },
    TaskAdded {
        task_id: u64,
    },
    TaskRemoved {
        task_id: u64,
    },
    ActiveTaskChanged {
        task_id: Option<u64>,
    },
    TaskCompletionToggled {
        task_id: u64,
        completed: bool,
    },
    AmbientChanged {
        id: String,
        is_playing: bool,
    },
}
