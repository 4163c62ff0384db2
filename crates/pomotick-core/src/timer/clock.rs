//! Session clock.
//!
//! A countdown in whole seconds plus a running flag. The clock owns no thread;
//! whoever drives it calls `tick()` once per nominal second.
//!
//! ```text
//! paused --start--> running --tick--> ... --tick--> 0 (Expired, once)
//!    ^                 |
//!    +-----pause-------+
//! ```

/// Signal returned by [`SessionClock::tick`] on the tick that reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClock {
    time_left_secs: u32,
    is_running: bool,
}

impl SessionClock {
    /// A paused clock holding `time_left_secs`.
    pub fn new(time_left_secs: u32) -> Self {
        Self {
            time_left_secs,
            is_running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_mm_ss(self.time_left_secs)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Returns `false` when the clock was already running.
    pub fn start(&mut self) -> bool {
        if self.is_running {
            return false;
        }
        self.is_running = true;
        true
    }

    /// Returns `false` when the clock was already paused.
    pub fn pause(&mut self) -> bool {
        if !self.is_running {
            return false;
        }
        self.is_running = false;
        true
    }

    /// Advance by one second.
    ///
    /// Yields `Some(Expired)` only on the tick that moves the countdown from 1
    /// to 0. A clock sitting at 0 stays there and yields nothing.
    pub fn tick(&mut self) -> Option<Expired> {
        if !self.is_running || self.time_left_secs == 0 {
            return None;
        }
        self.time_left_secs -= 1;
        if self.time_left_secs == 0 {
            Some(Expired)
        } else {
            None
        }
    }

    /// Load a new countdown. Only the scheduler resets the clock.
    pub(crate) fn reset(&mut self, time_left_secs: u32) {
        self.time_left_secs = time_left_secs;
    }
}

pub fn format_mm_ss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
