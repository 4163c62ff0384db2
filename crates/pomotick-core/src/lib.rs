//! # pomotick core library
//!
//! The business logic of the pomotick Pomodoro timer, independent of any
//! front end. The `pomotick` CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: a one-second [`SessionClock`], the [`SessionScheduler`] that
//!   rotates focus, short and long breaks, and the cancellable [`TickSource`]
//! - **Tasks and statistics**: [`TaskLedger`] credits the active task,
//!   [`StatsLog`] counts completed focus periods per day
//! - **Storage**: one JSON snapshot behind the [`PersistenceGateway`], and a
//!   TOML [`Config`] for runtime preferences
//! - **Controller**: [`PomodoroController`] owns the [`AppState`], persists it
//!   and publishes [`Event`]s to listeners such as the [`Notifier`]
//!
//! The caller drives the clock, either tick by tick or through
//! [`runner::run`].

pub mod calendar;
pub mod controller;
pub mod error;
pub mod events;
pub mod notify;
pub mod runner;
pub mod sound;
pub mod state;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use calendar::{Calendar, FixedCalendar, LocalCalendar};
pub use controller::PomodoroController;
pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use notify::{AmbientPlayer, EventListener, NotificationSink, Notifier, Permission, SoundPlayer};
pub use runner::Command;
pub use sound::{AmbientSound, NO_SOUND};
pub use state::{AppState, Settings};
pub use stats::{DayCount, StatsLog};
pub use storage::{Config, FileStore, MemoryStore, PersistenceGateway, Snapshot, SnapshotStore};
pub use task::{Task, TaskLedger};
pub use timer::{PeriodKind, SchedulerConfig, SessionClock, SessionScheduler, TickSource, Timers};
