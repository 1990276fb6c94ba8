//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It owns no threads
//! and no clock: every command receives `now`, and the caller is
//! responsible for calling `tick()` periodically while running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle(mode) --start--> Running(mode) --pause--> Idle(mode)
//! Running(mode) --tick/resume at zero--> Idle(mode.flip())   [records]
//! any --reset--> Idle(mode)       any --switch--> Idle(mode.flip())
//! ```
//!
//! Remaining time is always recomputed from the absolute deadline, never
//! decremented per tick, so missed ticks (a suspended process) cost nothing.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::mode::SessionMode;
use super::state::{seconds_until, TimerState};
use crate::events::Event;
use crate::history::HistoryRecord;

/// Core timer engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEngine {
    state: TimerState,
}

impl TimerEngine {
    /// Idle in Work mode, primed with the full work duration.
    pub fn new(work_duration_sec: u64, break_duration_sec: u64) -> Self {
        Self {
            state: TimerState::new(work_duration_sec, break_duration_sec),
        }
    }

    /// Continue from a previously persisted state.
    ///
    /// A state claiming to run without a deadline (or idle with one) cannot
    /// be resynced and is loaded as idle, keeping its `seconds_left`.
    pub fn from_state(mut state: TimerState) -> Self {
        if state.is_running != state.end_at_epoch_ms.is_some() {
            state.stop();
        }
        Self { state }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn mode(&self) -> SessionMode {
        self.state.mode
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn seconds_left(&self) -> u64 {
        self.state.seconds_left
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        if self.state.is_running || self.state.seconds_left == 0 {
            return None;
        }
        let secs = self.state.seconds_left;
        let end_at = now
            .timestamp_millis()
            .saturating_add((secs as i64).saturating_mul(1000));
        self.state.is_running = true;
        self.state.end_at_epoch_ms = Some(end_at);
        Some(Event::TimerStarted {
            mode: self.state.mode,
            seconds_left: secs,
            end_at_epoch_ms: end_at,
            at: now.with_timezone(&Utc),
        })
    }

    /// Call periodically while running. Returns `Some(Event::TimerCompleted)`
    /// when the countdown reaches zero.
    pub fn tick(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        self.resync(now)
    }

    /// Re-derive the countdown after the app returns to the foreground.
    /// Identical to `tick`: a deadline that passed while suspended
    /// completes the session here.
    pub fn resume(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        self.resync(now)
    }

    pub fn pause(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        // seconds_left already reflects the deadline as of the last tick.
        self.state.stop();
        Some(Event::TimerPaused {
            mode: self.state.mode,
            seconds_left: self.state.seconds_left,
            at: now.with_timezone(&Utc),
        })
    }

    pub fn reset(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        self.state.stop();
        self.state.seconds_left = self.state.full_duration();
        Some(Event::TimerReset {
            mode: self.state.mode,
            seconds_left: self.state.seconds_left,
            at: now.with_timezone(&Utc),
        })
    }

    pub fn switch_mode(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        let from = self.state.mode;
        self.reset(now);
        self.state.mode = from.flip();
        self.state.seconds_left = self.state.full_duration();
        Some(Event::ModeSwitched {
            from,
            to: self.state.mode,
            seconds_left: self.state.seconds_left,
            at: now.with_timezone(&Utc),
        })
    }

    /// Set the current mode's duration. Ignored while running or for zero.
    pub fn apply_preset(&mut self, minutes: u32, now: DateTime<FixedOffset>) -> Option<Event> {
        if self.state.is_running || minutes == 0 {
            return None;
        }
        let secs = u64::from(minutes) * 60;
        match self.state.mode {
            SessionMode::Work => self.state.work_duration_sec = secs,
            SessionMode::Break => self.state.break_duration_sec = secs,
        }
        self.state.seconds_left = secs;
        Some(Event::PresetApplied {
            mode: self.state.mode,
            minutes,
            seconds_left: secs,
            at: now.with_timezone(&Utc),
        })
    }

    /// Replace both configured durations. Refused while running. An idle
    /// countdown is re-primed with the new full duration of its mode.
    pub fn set_durations(&mut self, work_duration_sec: u64, break_duration_sec: u64) -> bool {
        if self.state.is_running {
            return false;
        }
        self.state.work_duration_sec = work_duration_sec;
        self.state.break_duration_sec = break_duration_sec;
        self.state.seconds_left = self.state.full_duration();
        true
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn resync(&mut self, now: DateTime<FixedOffset>) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        let end_at = self.state.end_at_epoch_ms?;
        self.state.seconds_left = seconds_until(end_at, now.timestamp_millis());
        if self.state.seconds_left == 0 {
            return Some(self.complete(now));
        }
        None
    }

    /// Only reachable from Running; leaves Running before returning, so a
    /// second observer of the same zero crossing sees an idle timer.
    fn complete(&mut self, now: DateTime<FixedOffset>) -> Event {
        let finished = self.state.mode;
        self.state.stop();
        self.state.seconds_left = 0;

        let record = HistoryRecord::new(finished, self.state.duration_for(finished), now);

        self.state.mode = finished.flip();
        self.state.seconds_left = self.state.full_duration();
        Event::TimerCompleted {
            record,
            next_mode: self.state.mode,
            next_seconds_left: self.state.seconds_left,
            at: now.with_timezone(&Utc),
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::from_state(TimerState::default())
    }
}
