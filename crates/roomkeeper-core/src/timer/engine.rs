//! Countdown engine.
//!
//! The engine is a wall-clock-based state machine. It never decrements a
//! counter: remaining time is recomputed from the persisted start timestamp on
//! every query, so a restart or a stalled refresh loop loses nothing. It does
//! not own a thread; the caller invokes `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --tick (remaining == 0)--> Expired --start--> Running
//!   ^                                                   |
//!   +--------------------------reset--------------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(3600);
//! engine.start(now_ms);
//! // In a loop:
//! engine.tick(now_ms); // Returns Some(Event::TimerExpired) once
//! ```

use serde::{Deserialize, Serialize};

use crate::events::{at, Event};

/// Persisted countdown state.
///
/// Serialized as `{"durationSeconds", "running", "startEpochMs"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub duration_seconds: u64,
    pub running: bool,
    /// Present whenever `running` is true. Kept after expiry so that the
    /// remaining time stays frozen at zero until the next start.
    pub start_epoch_ms: Option<u64>,
}

impl TimerState {
    pub fn idle(duration_seconds: u64) -> Self {
        Self {
            duration_seconds,
            running: false,
            start_epoch_ms: None,
        }
    }

    /// Restore the `running => start present` invariant.
    pub(crate) fn repaired(mut self) -> Self {
        if self.running && self.start_epoch_ms.is_none() {
            self.running = false;
        }
        self
    }
}

/// Core countdown engine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    state: TimerState,
    default_duration_secs: u64,
}

impl TimerEngine {
    /// Create an idle engine with the configured default duration.
    pub fn new(default_duration_secs: u64) -> Self {
        Self {
            state: TimerState::idle(default_duration_secs),
            default_duration_secs,
        }
    }

    /// Resume from persisted state.
    pub fn restore(state: TimerState, default_duration_secs: u64) -> Self {
        Self {
            state: state.repaired(),
            default_duration_secs,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn duration_ms(&self) -> u64 {
        self.state.duration_seconds.saturating_mul(1000)
    }

    /// Remaining time in milliseconds at `now_ms`. Never mutates, never
    /// negative. A stopped countdown that was started reads 0 until the next
    /// start.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        match (self.state.running, self.state.start_epoch_ms) {
            (true, Some(start)) => {
                let elapsed = now_ms.saturating_sub(start);
                self.duration_ms().saturating_sub(elapsed)
            }
            (false, Some(_)) => 0,
            (_, None) => self.duration_ms(),
        }
    }

    /// True once a countdown has run out and has not been restarted.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        !self.state.running
            && self.state.start_epoch_ms.is_some()
            && self.remaining_ms(now_ms) == 0
    }

    pub fn snapshot(&self, now_ms: u64) -> Event {
        Event::TimerSnapshot {
            running: self.state.running,
            duration_secs: self.state.duration_seconds,
            remaining_ms: self.remaining_ms(now_ms),
            start_epoch_ms: self.state.start_epoch_ms,
            at: at(now_ms),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the countdown. Returns `None` when it is already running.
    pub fn start(&mut self, now_ms: u64) -> Option<Event> {
        if self.state.running {
            return None;
        }
        self.state.running = true;
        self.state.start_epoch_ms = Some(now_ms);
        Some(Event::TimerStarted {
            duration_secs: self.state.duration_seconds,
            start_epoch_ms: now_ms,
            at: at(now_ms),
        })
    }

    /// Call periodically. Returns `Some(Event::TimerExpired)` exactly once,
    /// on the tick that observes the countdown at zero.
    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        if self.state.running && self.remaining_ms(now_ms) == 0 {
            self.state.running = false;
            return Some(Event::TimerExpired {
                duration_secs: self.state.duration_seconds,
                at: at(now_ms),
            });
        }
        None
    }

    /// Back to idle with the configured default duration.
    pub fn reset(&mut self, now_ms: u64) -> Event {
        self.state = TimerState::idle(self.default_duration_secs);
        Event::TimerReset {
            duration_secs: self.state.duration_seconds,
            at: at(now_ms),
        }
    }
}
