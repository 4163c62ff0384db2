//! The single repeating tick source.
//!
//! Ticks are produced by a tokio task and delivered over a channel. Each run
//! of the source gets a new generation number; ticks stamped with an older
//! generation are stale and must be dropped by the consumer, so a tick that
//! was already queued when the source was cancelled never reaches the clock.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    generation: u64,
}

#[derive(Debug)]
pub struct TickSource {
    period: Duration,
    generation: u64,
    handle: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Tick>,
}

impl TickSource {
    /// Create a stopped source and the receiving end of its ticks.
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = Self {
            period,
            generation: 0,
            handle: None,
            tx,
        };
        (source, rx)
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Begin emitting ticks, first one a full period from now.
    ///
    /// No-op while already active. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        self.generation += 1;
        let generation = self.generation;
        let period = self.period;
        let tx = self.tx.clone();
        debug!(generation, "tick source started");
        self.handle = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    /// Stop emitting ticks and invalidate any already queued. Safe to call
    /// repeatedly.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            self.generation += 1;
            debug!(generation = self.generation, "tick source cancelled");
        }
    }

    /// Whether `tick` belongs to the current active run.
    pub fn is_current(&self, tick: &Tick) -> bool {
        self.handle.is_some() && tick.generation == self.generation
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
