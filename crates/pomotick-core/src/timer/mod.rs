mod clock;
mod scheduler;
mod ticker;

pub use clock::{format_mm_ss, Expired, SessionClock};
pub use scheduler::{PeriodKind, SchedulerConfig, SessionScheduler, Timers, MAX_DURATION_MIN};
pub use ticker::{Tick, TickSource, DEFAULT_TICK_INTERVAL};
