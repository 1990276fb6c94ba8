use serde::{Deserialize, Serialize};

use super::mode::SessionMode;

/// The live countdown.
///
/// While running, `end_at_epoch_ms` is the source of truth and
/// `seconds_left` is only a cache refreshed on tick or resume. While idle,
/// `seconds_left` is authoritative and there is no deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: SessionMode,
    pub is_running: bool,
    pub work_duration_sec: u64,
    pub break_duration_sec: u64,
    pub seconds_left: u64,
    #[serde(default)]
    pub end_at_epoch_ms: Option<i64>,
}

impl TimerState {
    /// Idle, in Work mode, primed with the full work duration.
    pub fn new(work_duration_sec: u64, break_duration_sec: u64) -> Self {
        Self {
            mode: SessionMode::Work,
            is_running: false,
            work_duration_sec,
            break_duration_sec,
            seconds_left: work_duration_sec,
            end_at_epoch_ms: None,
        }
    }

    /// Configured full duration for `mode`.
    pub fn duration_for(&self, mode: SessionMode) -> u64 {
        match mode {
            SessionMode::Work => self.work_duration_sec,
            SessionMode::Break => self.break_duration_sec,
        }
    }

    pub fn full_duration(&self) -> u64 {
        self.duration_for(self.mode)
    }

    /// `MM:SS` rendering of `seconds_left`. Minutes are not capped at 59.
    pub fn display(&self) -> String {
        format_clock(self.seconds_left)
    }

    /// Drop any deadline and leave the running state.
    pub(crate) fn stop(&mut self) {
        self.is_running = false;
        self.end_at_epoch_ms = None;
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(
            SessionMode::Work.default_minutes() * 60,
            SessionMode::Break.default_minutes() * 60,
        )
    }
}

/// Whole seconds from `now_ms` until `end_at_ms`, rounded half-up and
/// clamped at zero. A deadline less than 500 ms away reads as 0.
pub fn seconds_until(end_at_ms: i64, now_ms: i64) -> u64 {
    let diff = end_at_ms.saturating_sub(now_ms);
    if diff <= 0 {
        0
    } else {
        (diff.saturating_add(500) / 1000) as u64
    }
}

pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
